// Copyright 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! FIRST, FOLLOW and PREDICT analyses over a grammar.
//!
//! The analyses depend on each other in one direction: FOLLOW is built from
//! FIRST, and PREDICT from both. A `GrammarAnalyzer` owns the caches for all
//! three, fills them on demand, and never invalidates them. It is tied to a
//! single grammar for its whole lifetime.

mod firsts;
mod follows;
mod predicts;
pub mod sets;

use std::collections::BTreeMap;

use super::{Elem, Grammar, ProdKey};
use crate::utils::OrdKey;

use self::firsts::Firsts;
use self::follows::calculate_follows;
use self::predicts::calculate_predicts;

pub use self::sets::{
  FirstElem, FirstSet, FollowSet, PredictSet, StreamTerminal,
};

/// A query named a nonterminal that heads no rule of the grammar.
#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
#[error("nonterminal {0:?} is not defined in the grammar")]
pub struct UnknownSymbolError<NT>(pub NT);

pub struct GrammarAnalyzer<'g, T, NT> {
  grammar: &'g Grammar<T, NT>,
  firsts: Firsts<'g, T, NT>,
  follows: Option<BTreeMap<NT, FollowSet<T>>>,
  predicts: Option<BTreeMap<ProdKey<T, NT>, PredictSet<T>>>,
}

impl<'g, T, NT> GrammarAnalyzer<'g, T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  pub fn new(grammar: &'g Grammar<T, NT>) -> Self {
    GrammarAnalyzer {
      grammar,
      firsts: Firsts::new(grammar),
      follows: None,
      predicts: None,
    }
  }

  pub fn grammar(&self) -> &'g Grammar<T, NT> {
    self.grammar
  }

  fn check_nonterm(&self, nt: &NT) -> Result<(), UnknownSymbolError<NT>> {
    if self.grammar.contains_nonterm(nt) {
      Ok(())
    } else {
      Err(UnknownSymbolError(nt.clone()))
    }
  }

  /// Returns FIRST(nt): the terminals that can begin a string derived from
  /// `nt`, plus ε if `nt` can derive the empty string.
  ///
  /// The walk recurses once per nonterminal along a dependency chain, so a
  /// grammar with chains many thousands of nonterminals deep needs a thread
  /// with a correspondingly large stack.
  pub fn first(
    &mut self,
    nt: &NT,
  ) -> Result<&FirstSet<T>, UnknownSymbolError<NT>> {
    self.check_nonterm(nt)?;
    Ok(self.firsts.first(nt))
  }

  /// Returns FIRST for every nonterminal of the grammar.
  pub fn first_all(&mut self) -> BTreeMap<NT, FirstSet<T>> {
    let grammar = self.grammar;
    grammar
      .nonterminals()
      .map(|nt| (nt.clone(), self.firsts.first(nt).clone()))
      .collect()
  }

  /// Returns FIRST(elems). The empty sequence yields `{ε}`.
  pub fn first_of_sequence(
    &mut self,
    elems: &[Elem<T, NT>],
  ) -> Result<&FirstSet<T>, UnknownSymbolError<NT>> {
    for nt in elems.iter().filter_map(|e| e.as_nonterm()) {
      self.check_nonterm(nt)?;
    }

    Ok(self.firsts.sequence(elems))
  }

  /// Returns true if `elems` can derive the empty string.
  pub fn derives_epsilon(
    &mut self,
    elems: &[Elem<T, NT>],
  ) -> Result<bool, UnknownSymbolError<NT>> {
    Ok(
      self
        .first_of_sequence(elems)?
        .contains(&FirstElem::Epsilon),
    )
  }

  /// Returns FOLLOW for every nonterminal of the grammar. Computed on the
  /// first call.
  pub fn follow_all(&mut self) -> &BTreeMap<NT, FollowSet<T>> {
    let grammar = self.grammar;
    let GrammarAnalyzer {
      firsts, follows, ..
    } = self;
    follows.get_or_insert_with(|| calculate_follows(grammar, firsts))
  }

  pub fn follow(
    &mut self,
    nt: &NT,
  ) -> Result<&FollowSet<T>, UnknownSymbolError<NT>> {
    self.check_nonterm(nt)?;
    self
      .follow_all()
      .get(nt)
      .ok_or_else(|| UnknownSymbolError(nt.clone()))
  }

  /// Returns PREDICT for every production of the grammar, keyed by
  /// production. Computes FOLLOW first if needed.
  pub fn prediction_sets(
    &mut self,
  ) -> &BTreeMap<ProdKey<T, NT>, PredictSet<T>> {
    let grammar = self.grammar;
    let GrammarAnalyzer {
      firsts,
      follows,
      predicts,
      ..
    } = self;
    let follows =
      follows.get_or_insert_with(|| calculate_follows(grammar, firsts));
    predicts.get_or_insert_with(|| calculate_predicts(grammar, firsts, follows))
  }

  /// Returns PREDICT for a single production, or `None` if the grammar has
  /// no such production.
  pub fn predict(&mut self, key: &ProdKey<T, NT>) -> Option<&PredictSet<T>> {
    self.prediction_sets().get(key)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::examples::{make_nullable_prefix, make_number_words};
  use crate::grammar::{NonTerminal, Terminal};

  fn term(s: &str) -> Elem<Terminal, NonTerminal> {
    Elem::Term(Terminal::new(s))
  }

  fn nonterm(s: &str) -> Elem<Terminal, NonTerminal> {
    Elem::NonTerm(NonTerminal::new(s))
  }

  #[test]
  fn test_unknown_symbol_queries() {
    let g = make_nullable_prefix();
    let mut analyzer = GrammarAnalyzer::new(&g);
    let z = NonTerminal::new("Z");

    assert_eq!(analyzer.first(&z), Err(UnknownSymbolError(z.clone())));
    assert_eq!(analyzer.follow(&z), Err(UnknownSymbolError(z.clone())));
    assert_eq!(
      analyzer.first_of_sequence(&[term("a"), nonterm("Z")]),
      Err(UnknownSymbolError(z.clone()))
    );
    assert_eq!(
      UnknownSymbolError(z).to_string(),
      "nonterminal Z is not defined in the grammar"
    );
  }

  #[test]
  fn test_first_of_sequence() {
    let g = make_number_words();
    let mut analyzer = GrammarAnalyzer::new(&g);

    let expected: FirstSet<Terminal> =
      std::iter::once(FirstElem::Epsilon).collect();
    assert_eq!(analyzer.first_of_sequence(&[]), Ok(&expected));

    let expected: FirstSet<Terminal> = vec![
      FirstElem::Term(Terminal::new("cinco")),
      FirstElem::Term(Terminal::new("uno")),
    ]
    .into_iter()
    .collect();
    assert_eq!(
      analyzer.first_of_sequence(&[nonterm("D"), nonterm("C"), term("uno")]),
      Ok(&expected)
    );

    assert_eq!(
      analyzer.derives_epsilon(&[nonterm("C"), nonterm("D")]),
      Ok(true)
    );
    assert_eq!(analyzer.derives_epsilon(&[nonterm("B")]), Ok(false));
    assert_eq!(analyzer.derives_epsilon(&[term("uno")]), Ok(false));
  }

  #[test]
  fn test_predict_lookup() {
    let g = make_nullable_prefix();
    let mut analyzer = GrammarAnalyzer::new(&g);

    let s_c = ProdKey::new(NonTerminal::new("S"), vec![term("c")]);
    let expected: PredictSet<Terminal> =
      std::iter::once(StreamTerminal::Term(Terminal::new("c"))).collect();
    assert_eq!(analyzer.predict(&s_c), Some(&expected));

    let missing = ProdKey::new(NonTerminal::new("S"), vec![term("d")]);
    assert_eq!(analyzer.predict(&missing), None);
  }
}
