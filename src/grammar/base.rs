// Copyright 2018 Google LLC
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

pub mod builder;
mod element_types;

use {
  crate::utils::{breadth_first_search, OrdKey, ToDoc},
  derivative::Derivative,
  std::collections::{btree_map, BTreeMap, BTreeSet},
};

use std::fmt::Debug;

pub use element_types::{GrammarSymbol, NonTerminal, Terminal};

/// A single element (terminal or non-terminal).
///
/// The variant is fixed when the grammar is built, so analyses never have to
/// guess the kind of a symbol from its spelling.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Elem<T, NT> {
  Term(T),
  NonTerm(NT),
}

impl<T, NT> Elem<T, NT> {
  /// If this element is a terminal, returns a `Some` value containing a
  /// terminal datum. Returns `None` otherwise.
  pub fn as_term(&self) -> Option<&T> {
    match self {
      Elem::NonTerm(_) => None,
      Elem::Term(t) => Some(t),
    }
  }

  /// Gets an element as a nonterm. Returns a `None` value otherwise.
  pub fn as_nonterm(&self) -> Option<&NT> {
    match self {
      Elem::NonTerm(nt) => Some(nt),
      Elem::Term(_) => None,
    }
  }
}

impl<T, NT> ToDoc for Elem<T, NT>
where
  T: ToDoc,
  NT: ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    match self {
      Elem::NonTerm(nt) => nt.to_doc(da),
      Elem::Term(t) => t.to_doc(da),
    }
  }
}

impl<T, NT> std::fmt::Debug for Elem<T, NT>
where
  T: Debug,
  NT: Debug,
{
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Elem::Term(term) => fmt.write_str(&format!("{:?}", term)),
      Elem::NonTerm(nt) => fmt.write_str(&format!("<{:?}>", nt)),
    }
  }
}

/// Lays out a production body, using `ε` for the empty body.
fn body_to_doc<'a, T, NT, DA>(
  elems: &[Elem<T, NT>],
  da: &'a DA,
) -> pretty::DocBuilder<'a, DA>
where
  T: ToDoc,
  NT: ToDoc,
  DA: pretty::DocAllocator<'a>,
  DA::Doc: Clone,
{
  if elems.is_empty() {
    da.text("ε")
  } else {
    da.intersperse(elems.iter().map(|e| e.to_doc(da)), da.softline())
  }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
struct ProdInner<T, NT> {
  elements: Vec<Elem<T, NT>>,
}

impl<T, NT> ProdInner<T, NT> {
  fn new(elements: Vec<Elem<T, NT>>) -> Self {
    ProdInner { elements }
  }

  pub fn elements_iter(&self) -> impl Iterator<Item = &Elem<T, NT>> + Clone {
    self.elements.iter()
  }
}

impl<T, NT> ToDoc for ProdInner<T, NT>
where
  T: ToDoc,
  NT: ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    body_to_doc(&self.elements, da)
  }
}

/// A key type for production instances.
///
/// A head may own several alternatives, so a production is identified by its
/// head together with its full body.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ProdKey<T, NT> {
  head: NT,
  body: Vec<Elem<T, NT>>,
}

impl<T, NT> ProdKey<T, NT> {
  pub fn new(head: NT, body: Vec<Elem<T, NT>>) -> Self {
    ProdKey { head, body }
  }

  /// Gets the head of this prod key.
  pub fn head(&self) -> &NT {
    &self.head
  }

  /// Gets the body of this prod key.
  pub fn body(&self) -> &[Elem<T, NT>] {
    &self.body
  }
}

impl<T, NT> ToDoc for ProdKey<T, NT>
where
  T: ToDoc,
  NT: ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    self
      .head
      .to_doc(da)
      .append(da.text(" ->"))
      .append(da.softline())
      .append(body_to_doc(&self.body, da))
  }
}

/// A concrete raw rule value as stored inside a Grammar struct.
#[derive(Clone, Debug)]
struct RuleInner<T, NT> {
  head: NT,
  prods: Vec<ProdInner<T, NT>>,
}

impl<T, NT> RuleInner<T, NT> {
  pub fn new(head: NT, prods: Vec<ProdInner<T, NT>>) -> Self {
    RuleInner { head, prods }
  }

  pub fn head(&self) -> &NT {
    &self.head
  }
}

impl<T, NT> ToDoc for RuleInner<T, NT>
where
  T: ToDoc,
  NT: ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    self
      .head
      .to_doc(da)
      .append(da.text(" ->"))
      .append(
        da.softline()
          .append(da.intersperse(
            self.prods.iter().map(|prod| prod.to_doc(da)),
            da.softline().append(da.text("| ")),
          ))
          .nest(2)
          .group(),
      )
  }
}

/// A context-free language grammar.
///
/// This is a context-free grammar consisting of
///
/// - A start nonterminal
/// - A set of rules, each which consist of
///   - A head nonterminal
///   - An ordered set of productions, where each production is a list of
///     elements, each either a terminal or nonterminal.
///
/// Grammars are read-only, and the accessors use the lifetime of the
/// grammar object. Every grammar that has been constructed has passed
/// validation: the start symbol has a rule, and every nonterminal used in a
/// production body has a rule.
#[derive(Clone)]
pub struct Grammar<T, NT> {
  start_symbol: NT,
  rule_set: BTreeMap<NT, RuleInner<T, NT>>,
}

impl<T, NT> std::fmt::Debug for Grammar<T, NT>
where
  T: Debug,
  NT: Debug,
{
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut dbg_struct = f.debug_struct("Grammar");
    dbg_struct.field("Start", &self.start_symbol);
    dbg_struct.field("Rules", &self.rules().collect::<Vec<Rule<T, NT>>>());
    dbg_struct.finish()
  }
}

impl<T, NT> Grammar<T, NT> {
  /// Returns the start nonterminal for this grammar.
  pub fn start_nt(&self) -> &NT {
    &self.start_symbol
  }

  fn get_elements(&self) -> impl Iterator<Item = &Elem<T, NT>> {
    self
      .rule_set
      .values()
      .flat_map(|r| &r.prods)
      .flat_map(|p| p.elements_iter())
  }

  /// Returns an iterator over every nonterminal that heads a rule.
  pub fn nonterminals(&self) -> impl Iterator<Item = &NT> {
    self.rule_set.keys()
  }

  /// Returns an iterator over all of the rules for this grammar.
  pub fn rules(&self) -> impl Iterator<Item = Rule<T, NT>> {
    self.rule_set.values().map(Rule::new)
  }

  /// Gets an iterator over all productions in the grammar.
  pub fn prods(&self) -> impl Iterator<Item = Prod<T, NT>> {
    self.rules().flat_map(|rule| rule.prods())
  }

  /// Returns the number of productions in the grammar.
  pub fn num_prods(&self) -> usize {
    self.rule_set.values().map(|r| r.prods.len()).sum()
  }
}

impl<T, NT> Grammar<T, NT>
where
  T: OrdKey + GrammarSymbol,
  NT: OrdKey + GrammarSymbol,
{
  /// Creates a grammar from a start nonterminal and a mapping from each
  /// nonterminal to its alternative bodies. Bodies given for the same head
  /// more than once are merged in order.
  pub fn new(
    start: NT,
    productions: impl IntoIterator<Item = (NT, Vec<Vec<Elem<T, NT>>>)>,
  ) -> Result<Self, ConfigurationError<NT>> {
    Grammar::from_rules(
      start,
      productions.into_iter().map(|(head, bodies)| {
        RuleInner::new(head, bodies.into_iter().map(ProdInner::new).collect())
      }),
    )
  }

  fn from_rules(
    start: NT,
    rules: impl IntoIterator<Item = RuleInner<T, NT>>,
  ) -> Result<Self, ConfigurationError<NT>> {
    let mut rule_set: BTreeMap<NT, RuleInner<T, NT>> = BTreeMap::new();
    for rule in rules {
      match rule_set.entry(rule.head().clone()) {
        btree_map::Entry::Vacant(vac) => {
          vac.insert(rule);
        }
        btree_map::Entry::Occupied(mut occ) => {
          occ.get_mut().prods.extend(rule.prods);
        }
      }
    }

    let g = Grammar {
      start_symbol: start,
      rule_set,
    };

    g.check_grammar()?;
    g.log_warnings();
    log::debug!(
      "Built grammar with {} rules and {} productions, starting at {:?}.",
      g.rule_set.len(),
      g.num_prods(),
      g.start_symbol
    );
    Ok(g)
  }

  fn check_grammar(&self) -> Result<(), ConfigurationError<NT>> {
    if !self.rule_set.contains_key(&self.start_symbol) {
      return Err(ConfigurationError::MissingStart(self.start_symbol.clone()));
    }

    for rule in self.rule_set.values() {
      if let Some(symbol) = rule.head.reserved_marker() {
        return Err(ConfigurationError::ReservedSymbol {
          head: rule.head.clone(),
          symbol,
        });
      }

      let mut seen_bodies = BTreeSet::new();
      for prod in &rule.prods {
        if let Some(symbol) = prod.elements_iter().find_map(|e| match e {
          Elem::Term(t) => t.reserved_marker(),
          Elem::NonTerm(nt) => nt.reserved_marker(),
        }) {
          return Err(ConfigurationError::ReservedSymbol {
            head: rule.head.clone(),
            symbol,
          });
        }

        if let Some(symbol) = prod
          .elements_iter()
          .filter_map(|e| e.as_nonterm())
          .find(|nt| !self.rule_set.contains_key(nt))
        {
          return Err(ConfigurationError::UndefinedNonTerminal {
            head: rule.head.clone(),
            symbol: symbol.clone(),
          });
        }

        if !seen_bodies.insert(&prod.elements) {
          return Err(ConfigurationError::DuplicateProduction {
            head: rule.head.clone(),
          });
        }
      }
    }

    Ok(())
  }
}

impl<T, NT> Grammar<T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  /// Gets the rule that has the given nonterminal as a head.
  pub fn try_get_rule(&self, nt: &NT) -> Option<Rule<T, NT>> {
    self.rule_set.get(nt).map(Rule::new)
  }

  /// Returns true if the given nonterminal heads a rule of this grammar.
  pub fn contains_nonterm(&self, nt: &NT) -> bool {
    self.rule_set.contains_key(nt)
  }

  /// Returns the set of terminals used anywhere in the grammar.
  pub fn terminals(&self) -> BTreeSet<&T> {
    self.get_elements().filter_map(|e| e.as_term()).collect()
  }

  fn rules_without_prods(&self) -> BTreeSet<&NT> {
    self
      .rule_set
      .values()
      .filter(|r| r.prods.is_empty())
      .map(|r| r.head())
      .collect()
  }

  fn reachable_nonterms(&self) -> BTreeSet<&NT> {
    breadth_first_search(std::iter::once(&self.start_symbol), |nt| {
      self
        .try_get_rule(nt)
        .into_iter()
        .flat_map(|rule| rule.prods())
        .flat_map(|p| p.elements())
        .filter_map(|e| e.as_nonterm())
        .collect::<BTreeSet<_>>()
    })
  }

  fn unreachable_nonterms(&self) -> BTreeSet<&NT> {
    let reachable_nonterms = self.reachable_nonterms();
    self
      .nonterminals()
      .filter(|nt| !reachable_nonterms.contains(nt))
      .collect()
  }

  fn log_warnings(&self) {
    for nt in self.unreachable_nonterms() {
      log::warn!(
        "Nonterminal {:?} is not reachable from start symbol {:?}.",
        nt,
        self.start_symbol
      );
    }

    for nt in self.rules_without_prods() {
      log::warn!("Nonterminal {:?} has no productions.", nt);
    }
  }
}

impl<T, NT> ToDoc for Grammar<T, NT>
where
  T: ToDoc,
  NT: ToDoc,
{
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    let start_entry = da
      .text("Start =")
      .append(da.space())
      .append(self.start_nt().to_doc(da));

    da.intersperse(
      std::iter::once(start_entry)
        .chain(self.rule_set.values().map(|rule| rule.to_doc(da))),
      da.hardline(),
    )
  }
}

/// Errors found while validating a grammar at construction time.
#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
pub enum ConfigurationError<NT> {
  #[error("start nonterminal {0:?} has no rule in the grammar")]
  MissingStart(NT),
  #[error(
    "nonterminal {symbol:?}, used in a production of {head:?}, has no rule \
     in the grammar"
  )]
  UndefinedNonTerminal { head: NT, symbol: NT },
  #[error("nonterminal {head:?} lists the same production more than once")]
  DuplicateProduction { head: NT },
  #[error(
    "a production of {head:?} uses the reserved marker {symbol} as a grammar \
     symbol"
  )]
  ReservedSymbol { head: NT, symbol: &'static str },
}

// ------------

/// A rule within a grammar.
///
/// A rule consists of a head nonterminal, and zero or more different possible
/// productions.
#[derive(Derivative)]
#[derivative(Copy(bound = ""), Clone(bound = ""))]
pub struct Rule<'a, T, NT> {
  rule: &'a RuleInner<T, NT>,
}

impl<'a, T, NT> Rule<'a, T, NT> {
  fn new(rule: &'a RuleInner<T, NT>) -> Self {
    Rule { rule }
  }

  /// Returns the head nonterminal.
  pub fn head(&self) -> &'a NT {
    &self.rule.head
  }

  /// Returns an iterator over the productions of this rule.
  pub fn prods(&self) -> impl Iterator<Item = Prod<'a, T, NT>> {
    let rule: &'a RuleInner<T, NT> = self.rule;
    rule.prods.iter().map(move |prod| Prod::new(&rule.head, prod))
  }
}

impl<'a, T, NT> std::fmt::Debug for Rule<'a, T, NT>
where
  T: Debug,
  NT: Debug,
{
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut dbg_struct = fmt.debug_struct("Rule");
    dbg_struct.field("head", self.head());
    dbg_struct.field("prods", &self.prods().collect::<Vec<_>>());
    dbg_struct.finish()
  }
}

// ------------

/// A single production in a grammar.
///
/// A production has a head, which is a nonterminal which its reduced to, and
/// a sequence of elements, indicating the body of the production.
#[derive(Derivative)]
#[derivative(Copy(bound = ""), Clone(bound = ""))]
pub struct Prod<'a, T, NT> {
  head: &'a NT,
  prod: &'a ProdInner<T, NT>,
}

impl<'a, T, NT> Prod<'a, T, NT> {
  fn new(head: &'a NT, prod: &'a ProdInner<T, NT>) -> Self {
    Prod { head, prod }
  }

  /// Returns the head of this production.
  pub fn head(&self) -> &'a NT {
    self.head
  }

  /// Returns the body of this production as a slice.
  pub fn body(&self) -> &'a [Elem<T, NT>] {
    &self.prod.elements
  }

  /// Returns an iterator over the elements of this production.
  pub fn elements(&self) -> impl Iterator<Item = &'a Elem<T, NT>> + Clone {
    self.prod.elements_iter()
  }

  /// Returns the number of elements in this production.
  pub fn num_elements(&self) -> usize {
    self.prod.elements.len()
  }
}

impl<'a, T, NT> Prod<'a, T, NT>
where
  T: Clone,
  NT: Clone,
{
  /// Returns the `ProdKey` of this production.
  pub fn prod_key(&self) -> ProdKey<T, NT> {
    ProdKey::new(self.head().clone(), self.prod.elements.clone())
  }
}

impl<'a, T, NT> std::fmt::Debug for Prod<'a, T, NT>
where
  T: Debug,
  NT: Debug,
{
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut dbg_struct = fmt.debug_struct("Prod");
    dbg_struct.field("head", self.head());
    dbg_struct.field("elems", &self.body());
    dbg_struct.finish()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::utils::render_flat;

  fn t(s: &str) -> Elem<Terminal, NonTerminal> {
    Elem::Term(Terminal::new(s))
  }

  fn nt(s: &str) -> Elem<Terminal, NonTerminal> {
    Elem::NonTerm(NonTerminal::new(s))
  }

  #[test]
  fn test_new_merges_repeated_heads() {
    let s = NonTerminal::new("S");
    let g = Grammar::new(
      s.clone(),
      vec![
        (s.clone(), vec![vec![t("a")]]),
        (s.clone(), vec![vec![t("b")], vec![]]),
      ],
    )
    .unwrap();

    let bodies = g
      .try_get_rule(&s)
      .unwrap()
      .prods()
      .map(|p| p.body().to_vec())
      .collect::<Vec<_>>();
    assert_eq!(bodies, vec![vec![t("a")], vec![t("b")], vec![]]);
    assert_eq!(g.num_prods(), 3);
  }

  #[test]
  fn test_missing_start() {
    let err = Grammar::new(
      NonTerminal::new("S"),
      vec![(NonTerminal::new("A"), vec![vec![t("a")]])],
    )
    .unwrap_err();
    assert_eq!(err, ConfigurationError::MissingStart(NonTerminal::new("S")));
  }

  #[test]
  fn test_dangling_reference() {
    let err = Grammar::new(
      NonTerminal::new("S"),
      vec![(NonTerminal::new("S"), vec![vec![nt("Z"), t("a")]])],
    )
    .unwrap_err();
    assert_eq!(
      err,
      ConfigurationError::UndefinedNonTerminal {
        head: NonTerminal::new("S"),
        symbol: NonTerminal::new("Z"),
      }
    );
    assert_eq!(
      err.to_string(),
      "nonterminal Z, used in a production of S, has no rule in the grammar"
    );
  }

  #[test]
  fn test_reserved_markers_rejected() {
    let s = NonTerminal::new("S");

    let err = Grammar::new(
      s.clone(),
      vec![(s.clone(), vec![vec![t("$")], vec![t("ε")]])],
    )
    .unwrap_err();
    assert_eq!(
      err,
      ConfigurationError::ReservedSymbol {
        head: s.clone(),
        symbol: "$",
      }
    );

    let err =
      Grammar::new(s.clone(), vec![(s.clone(), vec![vec![t("a"), t("ε")]])])
        .unwrap_err();
    assert_eq!(
      err,
      ConfigurationError::ReservedSymbol {
        head: s.clone(),
        symbol: "ε",
      }
    );
    assert_eq!(
      err.to_string(),
      "a production of S uses the reserved marker ε as a grammar symbol"
    );

    let built: Result<Grammar<Terminal, NonTerminal>, _> =
      builder::build(&s, |gb| {
        gb.add_rule(&s, |rb| {
          rb.add_prod(|pb| {
            pb.add_term(Terminal::new("$"));
          });
        });
      });
    assert_eq!(
      built.unwrap_err(),
      ConfigurationError::ReservedSymbol {
        head: s.clone(),
        symbol: "$",
      }
    );

    let dollar = NonTerminal::new("$");
    let err = Grammar::new(
      s.clone(),
      vec![
        (s.clone(), vec![vec![Elem::NonTerm(dollar.clone())]]),
        (dollar.clone(), vec![vec![t("a")]]),
      ],
    )
    .unwrap_err();
    assert!(matches!(err, ConfigurationError::ReservedSymbol { .. }));
  }

  #[test]
  fn test_terminals() {
    let g = crate::grammar::examples::make_number_words();
    let names = g
      .terminals()
      .into_iter()
      .map(|t| t.name())
      .collect::<Vec<_>>();
    assert_eq!(names, vec!["cinco", "cuatro", "dos", "tres", "uno"]);
  }

  #[test]
  fn test_duplicate_production() {
    let err = Grammar::new(
      NonTerminal::new("S"),
      vec![(NonTerminal::new("S"), vec![vec![t("a")], vec![t("a")]])],
    )
    .unwrap_err();
    assert_eq!(
      err,
      ConfigurationError::DuplicateProduction {
        head: NonTerminal::new("S")
      }
    );
  }

  #[test]
  fn test_unreachable_rules_are_allowed() {
    let g = Grammar::new(
      NonTerminal::new("S"),
      vec![
        (NonTerminal::new("S"), vec![vec![t("a")]]),
        (NonTerminal::new("U"), vec![]),
      ],
    )
    .unwrap();
    assert_eq!(
      g.unreachable_nonterms(),
      vec![&NonTerminal::new("U")].into_iter().collect()
    );
    assert_eq!(
      g.rules_without_prods(),
      vec![&NonTerminal::new("U")].into_iter().collect()
    );
  }

  #[test]
  fn test_prod_key_rendering() {
    let key = ProdKey::new(NonTerminal::new("S"), vec![nt("A"), t("b")]);
    assert_eq!(render_flat(&key), "S -> A b");
    let empty: ProdKey<Terminal, NonTerminal> =
      ProdKey::new(NonTerminal::new("A"), vec![]);
    assert_eq!(render_flat(&empty), "A -> ε");
  }

  #[test]
  fn test_grammar_rendering() {
    let s = NonTerminal::new("S");
    let g = Grammar::new(
      s.clone(),
      vec![
        (s.clone(), vec![vec![nt("A"), t("b")], vec![t("c")]]),
        (NonTerminal::new("A"), vec![vec![]]),
      ],
    )
    .unwrap();
    assert_eq!(render_flat(&g), "Start = S\nA -> ε\nS -> A b | c");
  }
}
