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

use crate::grammar::{Grammar, ProdKey};
use crate::utils::OrdKey;

use super::firsts::Firsts;
use super::sets::{FirstElem, FollowSet, PredictSet, StreamTerminal};

/// PREDICT(A -> α) is FIRST(α) without ε, plus FOLLOW(A) when α can derive
/// the empty string.
pub(super) fn calculate_predicts<T, NT>(
  grammar: &Grammar<T, NT>,
  firsts: &mut Firsts<T, NT>,
  follows: &BTreeMap<NT, FollowSet<T>>,
) -> BTreeMap<ProdKey<T, NT>, PredictSet<T>>
where
  T: OrdKey,
  NT: OrdKey,
{
  let predicts = grammar
    .prods()
    .map(|prod| {
      let body_first = firsts.sequence(prod.body());
      let mut predict: PredictSet<T> = body_first
        .iter()
        .filter_map(|e| e.as_term())
        .map(|t| StreamTerminal::Term(t.clone()))
        .collect();

      if body_first.contains(&FirstElem::Epsilon) {
        predict.extend(follows.get(prod.head()).into_iter().flatten().cloned());
      }

      (prod.prod_key(), predict)
    })
    .collect::<BTreeMap<_, _>>();

  log::debug!("Computed PREDICT for {} productions.", predicts.len());
  predicts
}
