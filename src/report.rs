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

//! Human readable and JSON renderings of an analysis.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;

use crate::grammar::classify::EPSILON;
use crate::grammar::passes::GrammarAnalyzer;
use crate::utils::{render, render_flat, OrdKey, ToDoc};

/// The results of analyzing a grammar, with every symbol and set rendered
/// as text.
///
/// Productions are listed per head, each body as a list of symbols (`["ε"]`
/// for the empty body), so the map can be loaded again with
/// `grammar_from_symbols`. Set members are sorted by their rendered text, so
/// `$` comes before the terminals and `ε` after them.
#[derive(Serialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct AnalysisReport {
  pub productions: BTreeMap<String, Vec<Vec<String>>>,
  pub first: BTreeMap<String, Vec<String>>,
  pub follow: BTreeMap<String, Vec<String>>,
  pub predict: BTreeMap<String, Vec<String>>,
}

fn render_set<E: ToDoc>(set: &BTreeSet<E>) -> Vec<String> {
  let mut members = set.iter().map(|e| render_flat(e)).collect::<Vec<_>>();
  members.sort();
  members
}

impl AnalysisReport {
  /// Runs every analysis on the analyzer's grammar and collects the results.
  pub fn from_analyzer<T, NT>(analyzer: &mut GrammarAnalyzer<T, NT>) -> Self
  where
    T: OrdKey + ToDoc,
    NT: OrdKey + ToDoc,
  {
    let productions = analyzer
      .grammar()
      .rules()
      .map(|rule| {
        let bodies = rule
          .prods()
          .map(|prod| {
            if prod.body().is_empty() {
              vec![EPSILON.to_string()]
            } else {
              prod.elements().map(|e| render_flat(e)).collect()
            }
          })
          .collect();
        (render_flat(rule.head()), bodies)
      })
      .collect();

    let first = analyzer
      .first_all()
      .iter()
      .map(|(nt, set)| (render_flat(nt), render_set(set)))
      .collect();

    let follow = analyzer
      .follow_all()
      .iter()
      .map(|(nt, set)| (render_flat(nt), render_set(set)))
      .collect();

    let predict = analyzer
      .prediction_sets()
      .iter()
      .map(|(key, set)| (render_flat(key), render_set(set)))
      .collect();

    AnalysisReport {
      productions,
      first,
      follow,
      predict,
    }
  }

  /// Renders the report as text, wrapping long sets at `width`.
  pub fn to_pretty(&self, width: usize) -> String {
    render(self, width)
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }

  pub fn write_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = self.to_json()?;
    std::fs::write(path, json)
  }
}

fn set_to_doc<'a, DA>(
  members: &[String],
  da: &'a DA,
) -> pretty::DocBuilder<'a, DA>
where
  DA: pretty::DocAllocator<'a>,
  DA::Doc: Clone,
{
  da.text("{")
    .append(
      da.intersperse(
        members.iter().map(|m| da.text(m.clone())),
        da.text(",").append(da.softline()),
      )
      .nest(1),
    )
    .append(da.text("}"))
    .group()
}

fn sets_section<'a, DA>(
  title: &str,
  label: &str,
  sets: &BTreeMap<String, Vec<String>>,
  da: &'a DA,
) -> pretty::DocBuilder<'a, DA>
where
  DA: pretty::DocAllocator<'a>,
  DA::Doc: Clone,
{
  let entries = sets.iter().map(|(key, members)| {
    da.text(format!("{}({}) =", label, key))
      .append(da.space())
      .append(set_to_doc(members, da))
  });
  section(title, entries, da)
}

fn section<'a, DA>(
  title: &str,
  entries: impl Iterator<Item = pretty::DocBuilder<'a, DA>>,
  da: &'a DA,
) -> pretty::DocBuilder<'a, DA>
where
  DA: pretty::DocAllocator<'a>,
  DA::Doc: Clone,
{
  da.text(format!("{}:", title)).append(
    da.hardline()
      .append(da.intersperse(entries, da.hardline()))
      .nest(2),
  )
}

impl ToDoc for AnalysisReport {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    let productions = self.productions.iter().flat_map(|(head, bodies)| {
      bodies
        .iter()
        .map(move |body| da.text(format!("{} -> {}", head, body.join(" "))))
    });

    da.intersperse(
      vec![
        section("Productions", productions, da),
        sets_section("FIRST", "FIRST", &self.first, da),
        sets_section("FOLLOW", "FOLLOW", &self.follow, da),
        sets_section("PREDICT", "PREDICT", &self.predict, da),
      ],
      da.hardline().append(da.hardline()),
    )
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::classify::{grammar_from_symbols, UpperCaseClassifier};
  use crate::grammar::examples::{make_nullable_prefix, make_number_words};

  #[test]
  fn test_pretty_report() {
    let g = make_nullable_prefix();
    let report = AnalysisReport::from_analyzer(&mut GrammarAnalyzer::new(&g));

    let expected = "\
Productions:
  A -> ε
  S -> A b
  S -> c

FIRST:
  FIRST(A) = {ε}
  FIRST(S) = {b, c}

FOLLOW:
  FOLLOW(A) = {b}
  FOLLOW(S) = {$}

PREDICT:
  PREDICT(A -> ε) = {b}
  PREDICT(S -> A b) = {b}
  PREDICT(S -> c) = {c}";
    assert_eq!(report.to_pretty(80), expected);
  }

  #[test]
  fn test_narrow_report_wraps_sets() {
    let g = make_number_words();
    let report = AnalysisReport::from_analyzer(&mut GrammarAnalyzer::new(&g));
    let narrow = report.to_pretty(20);
    assert!(narrow.contains("FOLLOW(B) = {$,\n"));
  }

  #[test]
  fn test_set_members_sorted_by_text() {
    let g = make_number_words();
    let report = AnalysisReport::from_analyzer(&mut GrammarAnalyzer::new(&g));

    assert_eq!(report.first["A"], vec!["cuatro", "tres", "ε"]);
    assert_eq!(report.follow["B"][0], "$");
  }

  #[test]
  fn test_json_report() {
    let g = make_nullable_prefix();
    let report = AnalysisReport::from_analyzer(&mut GrammarAnalyzer::new(&g));
    let value: serde_json::Value =
      serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(
      value["productions"]["S"],
      serde_json::json!([["A", "b"], ["c"]])
    );
    assert_eq!(value["productions"]["A"], serde_json::json!([["ε"]]));
    assert_eq!(value["first"]["S"], serde_json::json!(["b", "c"]));
    assert_eq!(value["follow"]["S"], serde_json::json!(["$"]));
    assert_eq!(value["predict"]["A -> ε"], serde_json::json!(["b"]));
  }

  #[test]
  fn test_report_productions_reload() {
    let g = make_number_words();
    let report = AnalysisReport::from_analyzer(&mut GrammarAnalyzer::new(&g));

    let reloaded = grammar_from_symbols(
      report.productions.clone(),
      "S",
      &UpperCaseClassifier,
    )
    .unwrap();
    let reloaded_report =
      AnalysisReport::from_analyzer(&mut GrammarAnalyzer::new(&reloaded));
    assert_eq!(reloaded_report, report);
  }
}
