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

use std::collections::BTreeSet;

use crate::utils::ToDoc;

/// A member of a FIRST set: a terminal, or the empty string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum FirstElem<T> {
  Epsilon,
  Term(T),
}

impl<T> FirstElem<T> {
  pub fn is_epsilon(&self) -> bool {
    matches!(self, FirstElem::Epsilon)
  }

  pub fn as_term(&self) -> Option<&T> {
    match self {
      FirstElem::Epsilon => None,
      FirstElem::Term(t) => Some(t),
    }
  }
}

impl<T: ToDoc> ToDoc for FirstElem<T> {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    match self {
      FirstElem::Epsilon => da.text("ε"),
      FirstElem::Term(t) => t.to_doc(da),
    }
  }
}

/// A terminal that can appear in a token stream, or the end of the stream.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum StreamTerminal<T> {
  EndOfStream,
  Term(T),
}

impl<T: ToDoc> ToDoc for StreamTerminal<T> {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    match self {
      StreamTerminal::EndOfStream => da.text("$"),
      StreamTerminal::Term(t) => t.to_doc(da),
    }
  }
}

pub type FirstSet<T> = BTreeSet<FirstElem<T>>;
pub type FollowSet<T> = BTreeSet<StreamTerminal<T>>;
pub type PredictSet<T> = BTreeSet<StreamTerminal<T>>;

