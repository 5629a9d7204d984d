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

//! FIRST, FOLLOW and PREDICT sets for context-free grammars.
//!
//! A grammar is built with `grammar::build`, `Grammar::new`, or loaded from
//! text with `grammar::text::parse_grammar`. A `GrammarAnalyzer` then answers
//! queries over it:
//!
//! ```rust
//! use llsets::grammar::classify::UpperCaseClassifier;
//! use llsets::grammar::passes::{GrammarAnalyzer, StreamTerminal};
//! use llsets::grammar::text::parse_grammar;
//! use llsets::grammar::{NonTerminal, Terminal};
//!
//! let g = parse_grammar("S -> A b | c\nA -> ε", None, &UpperCaseClassifier)
//!   .unwrap();
//! let mut analyzer = GrammarAnalyzer::new(&g);
//! let follow_a = analyzer.follow(&NonTerminal::new("A")).unwrap();
//! assert!(follow_a.contains(&StreamTerminal::Term(Terminal::new("b"))));
//! ```

pub mod grammar;
pub mod report;
pub mod utils;

pub use grammar::passes::{GrammarAnalyzer, UnknownSymbolError};
pub use report::AnalysisReport;
