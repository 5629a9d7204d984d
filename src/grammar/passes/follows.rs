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

use std::collections::BTreeMap;

use crate::grammar::{Elem, Grammar};
use crate::utils::{change_iter, change_loop, CollectMap, OrdKey, WasChanged};

use super::firsts::Firsts;
use super::sets::{FirstElem, FollowSet, StreamTerminal};

pub(super) fn calculate_follows<T, NT>(
  grammar: &Grammar<T, NT>,
  firsts: &mut Firsts<T, NT>,
) -> BTreeMap<NT, FollowSet<T>>
where
  T: OrdKey,
  NT: OrdKey,
{
  calculate_follows_with(grammar, firsts, |_| {})
}

/// Computes FOLLOW for every nonterminal, calling `on_pass` with the
/// current sets after each pass over the productions.
///
/// FOLLOW(head) is read as it stands when a production is visited, so
/// additions can chain within a single pass.
pub(super) fn calculate_follows_with<T, NT, F>(
  grammar: &Grammar<T, NT>,
  firsts: &mut Firsts<T, NT>,
  mut on_pass: F,
) -> BTreeMap<NT, FollowSet<T>>
where
  T: OrdKey,
  NT: OrdKey,
  F: FnMut(&BTreeMap<NT, FollowSet<T>>),
{
  let mut follows = CollectMap::with_keys(grammar.nonterminals().cloned());
  follows.insert(grammar.start_nt().clone(), StreamTerminal::EndOfStream);

  let passes = change_loop(|| {
    let changed = change_iter(grammar.prods(), |prod| {
      let mut changed = WasChanged::Unchanged;
      let body = prod.body();
      for (i, elem) in body.iter().enumerate() {
        if let Elem::NonTerm(nt) = elem {
          let rest_first = firsts.sequence(&body[i + 1..]);
          changed.merge(follows.insert_iter(
            nt.clone(),
            rest_first
              .iter()
              .filter_map(|e| e.as_term())
              .map(|t| StreamTerminal::Term(t.clone())),
          ));

          if rest_first.contains(&FirstElem::Epsilon) {
            changed.merge(follows.insert_from_key_set(nt.clone(), prod.head()));
          }
        }
      }

      changed
    });

    log::trace!("FOLLOW pass finished: {:?}", changed);
    on_pass(follows.as_inner());
    changed
  });

  log::debug!("FOLLOW sets reached a fixed point after {} passes.", passes);
  follows.into_inner()
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::examples::{make_nested_number_words, make_number_words};
  use crate::grammar::{NonTerminal, Terminal};

  fn follow_set(items: &[&str]) -> FollowSet<Terminal> {
    items
      .iter()
      .map(|s| match *s {
        "$" => StreamTerminal::EndOfStream,
        s => StreamTerminal::Term(Terminal::new(s)),
      })
      .collect()
  }

  #[test]
  fn test_number_words_follows() {
    let g = make_number_words();
    let mut firsts = Firsts::new(&g);
    let follows = calculate_follows(&g, &mut firsts);

    let expected = vec![
      ("S", follow_set(&["$", "dos"])),
      ("A", follow_set(&["uno", "tres"])),
      ("B", follow_set(&["cinco", "$", "dos", "uno", "tres"])),
      ("C", follow_set(&["$", "dos", "uno", "tres"])),
      ("D", follow_set(&["uno", "tres", "cuatro"])),
    ]
    .into_iter()
    .map(|(nt, set)| (NonTerminal::new(nt), set))
    .collect::<BTreeMap<_, _>>();
    assert_eq!(follows, expected);
  }

  #[test]
  fn test_follows_only_grow_between_passes() {
    let g = make_nested_number_words();
    let mut firsts = Firsts::new(&g);
    let mut snapshots = Vec::new();
    let follows = calculate_follows_with(&g, &mut firsts, |current| {
      snapshots.push(current.clone());
    });

    assert!(snapshots.len() >= 2);
    for pair in snapshots.windows(2) {
      for (nt, earlier) in &pair[0] {
        assert!(earlier.is_subset(&pair[1][nt]), "FOLLOW({:?}) shrank", nt);
      }
    }
    assert_eq!(snapshots.last(), Some(&follows));
  }
}
