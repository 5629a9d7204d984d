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

use crate::grammar::classify::{END_OF_INPUT, EPSILON};
use crate::utils::{Name, ToDoc};

/// A grammar symbol that may collide with the reserved `ε` and `$` markers.
pub trait GrammarSymbol {
  /// Returns the reserved marker this symbol spells, if any.
  fn reserved_marker(&self) -> Option<&'static str>;
}

fn reserved_marker(name: &str) -> Option<&'static str> {
  [EPSILON, END_OF_INPUT].into_iter().find(|m| *m == name)
}

/// A terminal element.
///
/// This is a simple string-backed terminal, used by the textual grammar
/// loader and the symbol classifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal(Name);

impl Terminal {
  pub fn new(s: &str) -> Self {
    Terminal(Name::new(s))
  }

  pub fn name(&self) -> &str {
    self.0.str()
  }
}

impl std::fmt::Debug for Terminal {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    std::fmt::Debug::fmt(&self.0, fmt)
  }
}

impl GrammarSymbol for Terminal {
  fn reserved_marker(&self) -> Option<&'static str> {
    reserved_marker(self.name())
  }
}

impl ToDoc for Terminal {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    self.0.to_doc(da)
  }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerminal(Name);

impl NonTerminal {
  pub fn new(s: &str) -> Self {
    NonTerminal(Name::new(s))
  }

  pub fn name(&self) -> &str {
    self.0.str()
  }
}

impl std::fmt::Debug for NonTerminal {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    std::fmt::Debug::fmt(&self.0, fmt)
  }
}

impl GrammarSymbol for NonTerminal {
  fn reserved_marker(&self) -> Option<&'static str> {
    reserved_marker(self.name())
  }
}

impl ToDoc for NonTerminal {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    self.0.to_doc(da)
  }
}
