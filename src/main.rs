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

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use llsets::grammar::classify::UpperCaseClassifier;
use llsets::grammar::text::parse_grammar;
use llsets::{AnalysisReport, GrammarAnalyzer};

/// Prints the FIRST, FOLLOW and PREDICT sets of a grammar.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
  /// File containing the grammar, one `HEAD -> alt | alt` rule per line
  file: PathBuf,

  /// Start symbol (default: first head in the file)
  #[arg(short, long, value_name = "SYMBOL")]
  start: Option<String>,

  /// Also write the results as JSON to this file
  #[arg(long, value_name = "PATH")]
  json: Option<PathBuf>,

  /// Line width for the printed report
  #[arg(short, long, value_name = "COLUMNS", default_value_t = 80)]
  width: usize,
}

fn main() -> anyhow::Result<()> {
  env_logger::init();
  let cli = Cli::parse();

  let text = std::fs::read_to_string(&cli.file)
    .with_context(|| format!("reading {}", cli.file.display()))?;
  let grammar =
    parse_grammar(&text, cli.start.as_deref(), &UpperCaseClassifier)
      .with_context(|| format!("loading grammar {}", cli.file.display()))?;

  let mut analyzer = GrammarAnalyzer::new(&grammar);
  let report = AnalysisReport::from_analyzer(&mut analyzer);
  println!("{}", report.to_pretty(cli.width));

  if let Some(path) = &cli.json {
    report
      .write_json(path)
      .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote JSON report to {}.", path.display());
  }

  Ok(())
}
