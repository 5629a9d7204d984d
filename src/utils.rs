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

use std::collections::{btree_map, BTreeMap, BTreeSet};

pub trait OrdKey:
  Clone + PartialEq + Eq + PartialOrd + Ord + std::fmt::Debug + 'static
{
}

impl<
    T: Clone + PartialEq + Eq + PartialOrd + Ord + std::fmt::Debug + 'static,
  > OrdKey for T
{
}

pub trait ToDoc {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA, ()>
  where
    DA::Doc: Clone;
}

/// Renders a value through its `ToDoc` implementation, wrapping at `width`.
pub fn render<D: ToDoc + ?Sized>(value: &D, width: usize) -> String {
  let arena = pretty::Arena::new();
  format!("{}", value.to_doc(&arena).into_doc().pretty(width))
}

const FLAT_WIDTH: usize = 1 << 16;

/// Renders a value on a single line.
pub fn render_flat<D: ToDoc + ?Sized>(value: &D) -> String {
  render(value, FLAT_WIDTH)
}

/// A refcounted name type, used to avoid duplicating common string values
/// throughout a grammar.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(std::sync::Arc<String>);

impl Name {
  /// Creates a new Name containing the given string.
  pub fn new(s: &(impl AsRef<str> + ?Sized)) -> Self {
    Name(std::sync::Arc::new(s.as_ref().to_string()))
  }

  /// Returns a reference to the internal ref.
  pub fn str(&self) -> &str {
    &**self.0
  }
}

impl std::fmt::Debug for Name {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    fmt.write_str(&self.0)
  }
}

impl ToDoc for Name {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.text(self.str().to_string())
  }
}

pub fn breadth_first_search<T, InitI, StepI, F>(
  initial: InitI,
  mut f: F,
) -> BTreeSet<T>
where
  T: Ord + Clone,
  InitI: IntoIterator<Item = T>,
  StepI: IntoIterator<Item = T>,
  F: FnMut(&T) -> StepI,
{
  let mut next_set = BTreeSet::new();
  let mut curr_set: BTreeSet<_> = initial.into_iter().collect();
  let mut seen_set = curr_set.clone();

  while !curr_set.is_empty() {
    for next_item in &curr_set {
      for step_item in f(next_item) {
        if !seen_set.contains(&step_item) {
          next_set.insert(step_item.clone());
          seen_set.insert(step_item);
        }
      }
    }

    std::mem::swap(&mut curr_set, &mut next_set);
    next_set.clear();
  }

  seen_set
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum WasChanged {
  Changed,
  Unchanged,
}

impl WasChanged {
  pub fn from_changed(changed: bool) -> Self {
    if changed {
      WasChanged::Changed
    } else {
      WasChanged::Unchanged
    }
  }

  pub fn join(self, other: Self) -> Self {
    match (self, other) {
      (WasChanged::Changed, _) | (_, WasChanged::Changed) => {
        WasChanged::Changed
      }
      _ => WasChanged::Unchanged,
    }
  }

  pub fn merge(&mut self, other: Self) {
    *self = self.join(other);
  }
}

/// Calls `func` until it reports that nothing changed. Returns the number of
/// calls made, including the final unchanged one.
pub fn change_loop<F>(mut func: F) -> usize
where
  F: FnMut() -> WasChanged,
{
  let mut passes = 1;
  while let WasChanged::Changed = func() {
    passes += 1;
  }
  passes
}

pub fn change_iter<I, F>(iter: I, mut func: F) -> WasChanged
where
  I: Iterator,
  F: FnMut(I::Item) -> WasChanged,
{
  let mut changed = WasChanged::Unchanged;
  for item in iter {
    changed = changed.join(func(item));
  }

  changed
}

/// A map from keys to sets of values that only ever grows, reporting whether
/// each insertion changed anything.
#[derive(Clone, Debug)]
pub struct CollectMap<K, V>(BTreeMap<K, BTreeSet<V>>);

impl<K, V> CollectMap<K, V>
where
  K: Ord,
  V: Ord,
{
  /// Creates a map with an empty set for each of the given keys.
  pub fn with_keys(keys: impl IntoIterator<Item = K>) -> Self {
    CollectMap(keys.into_iter().map(|k| (k, BTreeSet::new())).collect())
  }

  pub fn insert(&mut self, key: K, value: V) -> WasChanged {
    match self.0.entry(key) {
      btree_map::Entry::Occupied(mut occ) => {
        WasChanged::from_changed(occ.get_mut().insert(value))
      }
      btree_map::Entry::Vacant(vac) => {
        let mut new_set = BTreeSet::new();
        new_set.insert(value);
        vac.insert(new_set);
        WasChanged::Changed
      }
    }
  }

  pub fn insert_iter(
    &mut self,
    key: K,
    values: impl IntoIterator<Item = V>,
  ) -> WasChanged {
    match self.0.entry(key) {
      btree_map::Entry::Occupied(mut occ) => {
        let set = occ.get_mut();
        change_iter(values.into_iter(), |val| {
          WasChanged::from_changed(set.insert(val))
        })
      }
      btree_map::Entry::Vacant(vac) => {
        let mut val_iter = values.into_iter();
        match val_iter.next() {
          Some(init) => {
            let mut new_set = BTreeSet::new();
            new_set.insert(init);
            new_set.extend(val_iter);
            vac.insert(new_set);
            WasChanged::Changed
          }

          None => WasChanged::Unchanged,
        }
      }
    }
  }

  /// Adds every value currently stored under `src_key` to the set under
  /// `key`.
  pub fn insert_from_key_set(&mut self, key: K, src_key: &K) -> WasChanged
  where
    V: Clone,
  {
    if &key == src_key {
      return WasChanged::Unchanged;
    }

    let (key, mut value) = match self.0.entry(key) {
      btree_map::Entry::Occupied(occ) => occ.remove_entry(),
      btree_map::Entry::Vacant(vac) => (vac.into_key(), BTreeSet::new()),
    };

    let changed_result = if let Some(src_set) = self.0.get(src_key) {
      change_iter(src_set.iter(), |src_value| {
        WasChanged::from_changed(value.insert(src_value.clone()))
      })
    } else {
      WasChanged::Unchanged
    };

    self.0.insert(key, value);

    changed_result
  }

  pub fn as_inner(&self) -> &BTreeMap<K, BTreeSet<V>> {
    &self.0
  }

  pub fn into_inner(self) -> BTreeMap<K, BTreeSet<V>> {
    self.0
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_collect_map_reports_changes() {
    let mut map = CollectMap::with_keys(vec!["a", "b"]);
    assert_eq!(map.insert("a", 1), WasChanged::Changed);
    assert_eq!(map.insert("a", 1), WasChanged::Unchanged);
    assert_eq!(map.insert_iter("b", vec![]), WasChanged::Unchanged);
    assert_eq!(map.insert_iter("b", vec![2, 3]), WasChanged::Changed);
    assert_eq!(map.insert_from_key_set("a", &"b"), WasChanged::Changed);
    assert_eq!(map.insert_from_key_set("a", &"b"), WasChanged::Unchanged);
    assert_eq!(map.insert_from_key_set("a", &"a"), WasChanged::Unchanged);

    let inner = map.into_inner();
    assert_eq!(inner["a"], vec![1, 2, 3].into_iter().collect());
    assert_eq!(inner["b"], vec![2, 3].into_iter().collect());
  }

  #[test]
  fn test_change_loop_counts_passes() {
    let mut remaining = 3;
    let passes = change_loop(|| {
      if remaining == 0 {
        WasChanged::Unchanged
      } else {
        remaining -= 1;
        WasChanged::Changed
      }
    });
    assert_eq!(passes, 4);
  }

  #[test]
  fn test_breadth_first_search_includes_initial() {
    let reached = breadth_first_search(vec![0u32], |&n| {
      if n < 3 {
        vec![n + 1]
      } else {
        vec![]
      }
    });
    assert_eq!(reached, (0..=3).collect());
  }
}
