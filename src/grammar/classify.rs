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

//! Lifting raw string symbols into tagged grammar elements.
//!
//! Grammars built through `grammar::build` or `Grammar::new` already carry
//! the terminal/nonterminal tag on every element. The classifier is only
//! needed at the edge, when symbols arrive as plain strings.

use std::collections::BTreeMap;

use super::{Elem, Grammar, NonTerminal, Terminal};
use crate::grammar::text::LoadError;

/// Marker for the empty string inside a raw production body.
pub const EPSILON: &str = "ε";

/// Marker for the end of the input. Never valid inside a production body.
pub const END_OF_INPUT: &str = "$";

/// A policy deciding whether a raw symbol names a nonterminal.
pub trait SymbolClassifier {
  fn is_nonterminal(&self, symbol: &str) -> bool;

  /// Tags a raw symbol as a terminal or nonterminal.
  fn classify(&self, symbol: &str) -> Elem<Terminal, NonTerminal> {
    if self.is_nonterminal(symbol) {
      Elem::NonTerm(NonTerminal::new(symbol))
    } else {
      Elem::Term(Terminal::new(symbol))
    }
  }
}

/// The naming convention where a nonterminal is spelled with upper-case
/// alphabetic characters only (`S`, `EXPR`), and anything else is a terminal.
///
/// Under this convention a lower-case nonterminal silently becomes a
/// terminal; callers that cannot guarantee the convention should build
/// grammars with explicit elements instead.
#[derive(Clone, Copy, Default, Debug)]
pub struct UpperCaseClassifier;

impl SymbolClassifier for UpperCaseClassifier {
  fn is_nonterminal(&self, symbol: &str) -> bool {
    !symbol.is_empty()
      && symbol
        .chars()
        .all(|c| c.is_alphabetic() && c.is_uppercase())
  }
}

/// Classifies the symbols of one raw body. `ε` denotes the empty string and
/// is dropped; `$` is rejected.
pub(crate) fn classify_body<C, S>(
  classifier: &C,
  head: &str,
  body: &[S],
) -> Result<Vec<Elem<Terminal, NonTerminal>>, LoadError>
where
  C: SymbolClassifier + ?Sized,
  S: AsRef<str>,
{
  let mut elems = Vec::with_capacity(body.len());
  for symbol in body.iter().map(AsRef::as_ref) {
    match symbol {
      EPSILON => {}
      END_OF_INPUT => {
        return Err(LoadError::ReservedSymbol {
          head: head.to_string(),
          symbol: symbol.to_string(),
        })
      }
      _ => elems.push(classifier.classify(symbol)),
    }
  }
  Ok(elems)
}

/// Builds a grammar from raw string productions, classifying every symbol
/// with `classifier`.
///
/// Fails if a head does not classify as a nonterminal, if a body uses the
/// reserved `$` marker, or if the resulting grammar does not validate
/// (missing start rule, or a nonterminal-shaped symbol without a rule).
pub fn grammar_from_symbols<C, K, S>(
  productions: impl IntoIterator<Item = (K, Vec<Vec<S>>)>,
  start: &str,
  classifier: &C,
) -> Result<Grammar<Terminal, NonTerminal>, LoadError>
where
  C: SymbolClassifier + ?Sized,
  K: AsRef<str>,
  S: AsRef<str>,
{
  if !classifier.is_nonterminal(start) {
    return Err(LoadError::InvalidHead {
      line: None,
      symbol: start.to_string(),
    });
  }

  let mut rules = BTreeMap::new();
  for (head, bodies) in productions {
    let head = head.as_ref();
    if !classifier.is_nonterminal(head) {
      return Err(LoadError::InvalidHead {
        line: None,
        symbol: head.to_string(),
      });
    }

    let classified = bodies
      .iter()
      .map(|body| classify_body(classifier, head, &body[..]))
      .collect::<Result<Vec<_>, _>>()?;
    rules
      .entry(NonTerminal::new(head))
      .or_insert_with(Vec::new)
      .extend(classified);
  }

  Ok(Grammar::new(NonTerminal::new(start), rules)?)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::ConfigurationError;
  use test_case::test_case;

  #[test_case("S", true; "single letter")]
  #[test_case("EXPR", true; "word")]
  #[test_case("Expr", false; "mixed case")]
  #[test_case("a", false; "lower case")]
  #[test_case("A1", false; "digit")]
  #[test_case("", false; "empty")]
  #[test_case("ε", false; "epsilon marker")]
  #[test_case("$", false; "end marker")]
  #[test_case("+", false; "punctuation")]
  fn test_upper_case_classifier(symbol: &str, expected: bool) {
    assert_eq!(UpperCaseClassifier.is_nonterminal(symbol), expected);
  }

  #[test]
  fn test_epsilon_body_is_empty() {
    let g = grammar_from_symbols(
      vec![("S", vec![vec!["A", "b"], vec!["c"]]), ("A", vec![vec!["ε"]])],
      "S",
      &UpperCaseClassifier,
    )
    .unwrap();
    let a_bodies = g
      .try_get_rule(&NonTerminal::new("A"))
      .unwrap()
      .prods()
      .map(|p| p.num_elements())
      .collect::<Vec<_>>();
    assert_eq!(a_bodies, vec![0]);
  }

  #[test]
  fn test_dangling_uppercase_symbol() {
    let err = grammar_from_symbols(
      vec![("S", vec![vec!["Z", "a"]])],
      "S",
      &UpperCaseClassifier,
    )
    .unwrap_err();
    assert!(matches!(
      err,
      LoadError::Config(ConfigurationError::UndefinedNonTerminal { .. })
    ));
  }

  #[test]
  fn test_reserved_end_marker() {
    let err = grammar_from_symbols(
      vec![("S", vec![vec!["a", "$"]])],
      "S",
      &UpperCaseClassifier,
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::ReservedSymbol { .. }));
  }

  #[test]
  fn test_lowercase_head_rejected() {
    let err = grammar_from_symbols(
      vec![("S", vec![vec!["a"]]), ("s", vec![vec!["b"]])],
      "S",
      &UpperCaseClassifier,
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::InvalidHead { .. }));
  }
}
