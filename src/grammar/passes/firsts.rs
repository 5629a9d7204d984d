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

//! Memoized FIRST sets.
//!
//! `first(X)` walks the grammar depth first. A nonterminal is marked
//! `InProgress` before its bodies are visited, so recursive references
//! (including left recursion) terminate. Nonterminals that reach each other
//! while in progress form a strongly connected component, tracked Tarjan
//! style through their depth on the visit stack. When the walk returns to
//! the root of a component, the FIRST sets of all its members are solved
//! together by iterating to a fixed point, and only then marked `Done`.

use std::collections::BTreeMap;

use crate::grammar::{Elem, Grammar};
use crate::utils::{change_iter, change_loop, OrdKey, WasChanged};

use super::sets::{FirstElem, FirstSet};

/// The state of a visited nonterminal. A nonterminal that has no entry has
/// not been visited yet.
#[derive(Debug)]
enum FirstState<T> {
  /// On the visit stack at the given depth.
  InProgress { depth: usize },
  Done(FirstSet<T>),
}

/// Returned by `visit` for nonterminals that are already solved, so they
/// never lower the link of their dependents.
const SOLVED_LINK: usize = usize::MAX;

pub(super) struct Firsts<'g, T, NT> {
  grammar: &'g Grammar<T, NT>,
  states: BTreeMap<NT, FirstState<T>>,
  stack: Vec<NT>,
  sequences: BTreeMap<Vec<Elem<T, NT>>, FirstSet<T>>,
}

impl<'g, T, NT> Firsts<'g, T, NT>
where
  T: OrdKey,
  NT: OrdKey,
{
  pub fn new(grammar: &'g Grammar<T, NT>) -> Self {
    Firsts {
      grammar,
      states: BTreeMap::new(),
      stack: Vec::new(),
      sequences: BTreeMap::new(),
    }
  }

  /// Returns FIRST(nt). The nonterminal must head a rule of the grammar.
  pub fn first(&mut self, nt: &NT) -> &FirstSet<T> {
    self.visit(nt);
    self.done_set(nt)
  }

  /// Returns FIRST(elems). Every nonterminal in `elems` must head a rule of
  /// the grammar.
  pub fn sequence(&mut self, elems: &[Elem<T, NT>]) -> &FirstSet<T> {
    debug_assert!(self.stack.is_empty());
    if !self.sequences.contains_key(elems) {
      for nt in elems.iter().filter_map(|e| e.as_nonterm()) {
        self.visit(nt);
      }

      let set = self.scan(elems, &BTreeMap::new());
      self.sequences.insert(elems.to_vec(), set);
    }

    &self.sequences[elems]
  }

  /// Visits `nt` and everything it depends on. Returns the lowest stack
  /// depth reachable from `nt` through in-progress nonterminals.
  fn visit(&mut self, nt: &NT) -> usize {
    match self.states.get(nt) {
      Some(FirstState::Done(_)) => return SOLVED_LINK,
      Some(FirstState::InProgress { depth }) => return *depth,
      None => {}
    }

    let depth = self.stack.len();
    self.stack.push(nt.clone());
    self
      .states
      .insert(nt.clone(), FirstState::InProgress { depth });

    let grammar = self.grammar;
    let mut low_link = depth;
    if let Some(rule) = grammar.try_get_rule(nt) {
      for prod in rule.prods() {
        for dep in prod.elements().filter_map(|e| e.as_nonterm()) {
          low_link = low_link.min(self.visit(dep));
        }
      }
    }

    if low_link == depth {
      let component = self.stack.split_off(depth);
      self.solve_component(component);
    }

    low_link
  }

  fn solve_component(&mut self, component: Vec<NT>) {
    let mut working: BTreeMap<NT, FirstSet<T>> = component
      .iter()
      .map(|nt| (nt.clone(), FirstSet::new()))
      .collect();

    let passes = change_loop(|| {
      change_iter(component.iter(), |nt| {
        let mut computed = FirstSet::new();
        if let Some(rule) = self.grammar.try_get_rule(nt) {
          for prod in rule.prods() {
            computed.extend(self.scan(prod.body(), &working));
          }
        }

        let set = working.get_mut(nt).expect("member of the component");
        let old_len = set.len();
        set.extend(computed);
        WasChanged::from_changed(set.len() != old_len)
      })
    });

    if component.len() > 1 {
      log::debug!(
        "Solved FIRST for recursive nonterminals {:?} in {} passes.",
        component,
        passes
      );
    } else {
      log::trace!("Solved FIRST for {:?} in {} passes.", component, passes);
    }

    for (nt, set) in working {
      self.states.insert(nt, FirstState::Done(set));
    }
  }

  /// Scans `elems` left to right. Terminals stop the scan, nonterminals
  /// contribute their FIRST set without ε and stop it unless nullable.
  /// Reaching the end adds ε.
  fn scan(
    &self,
    elems: &[Elem<T, NT>],
    working: &BTreeMap<NT, FirstSet<T>>,
  ) -> FirstSet<T> {
    let mut result = FirstSet::new();
    for elem in elems {
      match elem {
        Elem::Term(t) => {
          result.insert(FirstElem::Term(t.clone()));
          return result;
        }
        Elem::NonTerm(nt) => {
          let nt_set = self.solved_set(nt, working);
          result.extend(nt_set.iter().filter(|e| !e.is_epsilon()).cloned());
          if !nt_set.contains(&FirstElem::Epsilon) {
            return result;
          }
        }
      }
    }

    result.insert(FirstElem::Epsilon);
    result
  }

  fn solved_set<'a>(
    &'a self,
    nt: &NT,
    working: &'a BTreeMap<NT, FirstSet<T>>,
  ) -> &'a FirstSet<T> {
    match working.get(nt) {
      Some(set) => set,
      None => self.done_set(nt),
    }
  }

  fn done_set(&self, nt: &NT) -> &FirstSet<T> {
    match self.states.get(nt) {
      Some(FirstState::Done(set)) => set,
      state => unreachable!(
        "FIRST({:?}) read before it was solved (state {:?})",
        nt, state
      ),
    }
  }
}
