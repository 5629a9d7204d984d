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

//! A small line-oriented grammar notation.
//!
//! ```text
//! # Comments run to the end of the line.
//! S -> A uno B C | S dos
//! A -> B C D | A tres | ε
//! ```
//!
//! Each line holds one head, an arrow, and alternatives separated by `|`.
//! Symbols are separated by whitespace. An alternative that is empty or
//! consists of `ε` is the empty production. A head may appear on several
//! lines; its alternatives are appended in order. Whether a symbol is a
//! terminal or a nonterminal is decided by a `SymbolClassifier`.

use std::collections::BTreeMap;

use super::classify::{classify_body, SymbolClassifier};
use super::{ConfigurationError, Grammar, NonTerminal, Terminal};

const ARROW: &str = "->";
const ALTERNATIVE: char = '|';
const COMMENT: char = '#';

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
  #[error("line {line}: expected `HEAD -> alternatives`")]
  MissingArrow { line: usize },
  #[error("{}symbol {symbol:?} cannot head a rule", line_prefix(.line))]
  InvalidHead { line: Option<usize>, symbol: String },
  #[error("production of {head} uses the reserved symbol {symbol:?}")]
  ReservedSymbol { head: String, symbol: String },
  #[error("grammar text contains no rules")]
  Empty,
  #[error(transparent)]
  Config(#[from] ConfigurationError<NonTerminal>),
}

fn line_prefix(line: &Option<usize>) -> String {
  match line {
    Some(line) => format!("line {}: ", line),
    None => String::new(),
  }
}

/// Parses grammar text. The start symbol defaults to the head of the first
/// rule in the text.
pub fn parse_grammar<C>(
  text: &str,
  start: Option<&str>,
  classifier: &C,
) -> Result<Grammar<Terminal, NonTerminal>, LoadError>
where
  C: SymbolClassifier + ?Sized,
{
  let mut first_head = None;
  let mut rules: BTreeMap<NonTerminal, Vec<_>> = BTreeMap::new();

  for (index, raw_line) in text.lines().enumerate() {
    let line_no = index + 1;
    let line = match raw_line.find(COMMENT) {
      Some(pos) => &raw_line[..pos],
      None => raw_line,
    }
    .trim();
    if line.is_empty() {
      continue;
    }

    let (head, alternatives) = line
      .split_once(ARROW)
      .ok_or(LoadError::MissingArrow { line: line_no })?;
    let head = head.trim();
    if !classifier.is_nonterminal(head) {
      return Err(LoadError::InvalidHead {
        line: Some(line_no),
        symbol: head.to_string(),
      });
    }

    let mut bodies = Vec::new();
    for alternative in alternatives.split(ALTERNATIVE) {
      let symbols = alternative.split_whitespace().collect::<Vec<_>>();
      bodies.push(classify_body(classifier, head, &symbols)?);
    }

    log::trace!(
      "Line {}: {} alternatives for {:?}.",
      line_no,
      bodies.len(),
      head
    );
    first_head.get_or_insert_with(|| head.to_string());
    rules
      .entry(NonTerminal::new(head))
      .or_default()
      .extend(bodies);
  }

  let start = match (start, first_head) {
    (Some(start), _) => start.to_string(),
    (None, Some(head)) => head,
    (None, None) => return Err(LoadError::Empty),
  };

  Ok(Grammar::new(NonTerminal::new(&start), rules)?)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::grammar::classify::UpperCaseClassifier;
  use crate::grammar::Elem;
  use crate::utils::render_flat;

  #[test]
  fn test_parse_simple_grammar() {
    let g = parse_grammar(
      "# leading comment\nS -> A b | c\n\nA -> ε # trailing comment\n",
      None,
      &UpperCaseClassifier,
    )
    .unwrap();

    assert_eq!(g.start_nt(), &NonTerminal::new("S"));
    assert_eq!(render_flat(&g), "Start = S\nA -> ε\nS -> A b | c");
    let s_first_body = g
      .try_get_rule(&NonTerminal::new("S"))
      .unwrap()
      .prods()
      .next()
      .unwrap()
      .body()
      .to_vec();
    assert_eq!(
      s_first_body,
      vec![
        Elem::NonTerm(NonTerminal::new("A")),
        Elem::Term(Terminal::new("b"))
      ]
    );
  }

  #[test]
  fn test_empty_alternative_is_epsilon() {
    let g = parse_grammar("S -> a S |", None, &UpperCaseClassifier).unwrap();
    assert_eq!(render_flat(&g), "Start = S\nS -> a S | ε");
  }

  #[test]
  fn test_repeated_heads_append() {
    let g = parse_grammar("S -> a\nS -> b", None, &UpperCaseClassifier)
      .unwrap();
    assert_eq!(g.num_prods(), 2);
  }

  #[test]
  fn test_explicit_start() {
    let g = parse_grammar("A -> a\nS -> A", Some("S"), &UpperCaseClassifier)
      .unwrap();
    assert_eq!(g.start_nt(), &NonTerminal::new("S"));
  }

  #[test]
  fn test_missing_arrow() {
    let err =
      parse_grammar("S -> a\nS a b", None, &UpperCaseClassifier).unwrap_err();
    assert!(matches!(err, LoadError::MissingArrow { line: 2 }));
  }

  #[test]
  fn test_invalid_head() {
    let err = parse_grammar("s -> a", None, &UpperCaseClassifier).unwrap_err();
    assert_eq!(err.to_string(), "line 1: symbol \"s\" cannot head a rule");
  }

  #[test]
  fn test_empty_text() {
    let err = parse_grammar("# nothing\n\n", None, &UpperCaseClassifier)
      .unwrap_err();
    assert!(matches!(err, LoadError::Empty));
  }

  #[test]
  fn test_undefined_start() {
    let err =
      parse_grammar("A -> a", Some("S"), &UpperCaseClassifier).unwrap_err();
    assert!(matches!(
      err,
      LoadError::Config(ConfigurationError::MissingStart(_))
    ));
  }
}
