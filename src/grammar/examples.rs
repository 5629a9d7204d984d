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

//! Small grammars used by tests and documentation.
//!
//! Nonterminals are upper case and terminals lower case throughout, so the
//! same grammars can also be written in the textual notation.

use crate::grammar::{build, Grammar, NonTerminal, Terminal};

pub type BaseGrammar = Grammar<Terminal, NonTerminal>;

/// `S -> A b | c`, `A -> ε`.
pub fn make_nullable_prefix() -> BaseGrammar {
  let s = NonTerminal::new("S");
  let a = NonTerminal::new("A");

  build(&s, |gb| {
    gb.add_rule(&s, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&a).add_term(Terminal::new("b"));
      })
      .add_prod(|pb| {
        pb.add_term(Terminal::new("c"));
      });
    })
    .add_rule(&a, |rb| {
      rb.add_empty_prod();
    });
  })
  .expect("nullable prefix grammar is valid")
}

/// `S -> A B`, `A -> ε`, `B -> ε`.
pub fn make_nullable_chain() -> BaseGrammar {
  let s = NonTerminal::new("S");
  let a = NonTerminal::new("A");
  let b = NonTerminal::new("B");

  build(&s, |gb| {
    gb.add_rule(&s, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&a).add_nonterm(&b);
      });
    })
    .add_rule(&a, |rb| {
      rb.add_empty_prod();
    })
    .add_rule(&b, |rb| {
      rb.add_empty_prod();
    });
  })
  .expect("nullable chain grammar is valid")
}

/// `S -> S a | b`.
pub fn make_left_recursive() -> BaseGrammar {
  let s = NonTerminal::new("S");

  build(&s, |gb| {
    gb.add_rule(&s, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&s).add_term(Terminal::new("a"));
      })
      .add_prod(|pb| {
        pb.add_term(Terminal::new("b"));
      });
    });
  })
  .expect("left recursive grammar is valid")
}

/// `A -> B y`, `B -> A z | ε`.
///
/// `A` and `B` depend on each other through a nullable prefix, so `y` must
/// reach FIRST(B) no matter which of the two is queried first.
pub fn make_mutual_nullable_cycle() -> BaseGrammar {
  let a = NonTerminal::new("A");
  let b = NonTerminal::new("B");

  build(&a, |gb| {
    gb.add_rule(&a, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&b).add_term(Terminal::new("y"));
      });
    })
    .add_rule(&b, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&a).add_term(Terminal::new("z"));
      })
      .add_empty_prod();
    });
  })
  .expect("mutual nullable cycle grammar is valid")
}

/// A left recursive grammar over number words with chains of nullable
/// nonterminals:
///
/// ```text
/// S -> A uno B C | S dos
/// A -> B C D | A tres | ε
/// B -> D cuatro C tres
/// C -> cinco D B | ε
/// D -> ε
/// ```
pub fn make_number_words() -> BaseGrammar {
  let s = NonTerminal::new("S");
  let a = NonTerminal::new("A");
  let b = NonTerminal::new("B");
  let c = NonTerminal::new("C");
  let d = NonTerminal::new("D");
  let uno = Terminal::new("uno");
  let dos = Terminal::new("dos");
  let tres = Terminal::new("tres");
  let cuatro = Terminal::new("cuatro");
  let cinco = Terminal::new("cinco");

  build(&s, |gb| {
    gb.add_rule(&s, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&a)
          .add_term(&uno)
          .add_nonterm(&b)
          .add_nonterm(&c);
      })
      .add_prod(|pb| {
        pb.add_nonterm(&s).add_term(&dos);
      });
    })
    .add_rule(&a, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&b).add_nonterm(&c).add_nonterm(&d);
      })
      .add_prod(|pb| {
        pb.add_nonterm(&a).add_term(&tres);
      })
      .add_empty_prod();
    })
    .add_rule(&b, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&d)
          .add_term(&cuatro)
          .add_nonterm(&c)
          .add_term(&tres);
      });
    })
    .add_rule(&c, |rb| {
      rb.add_prod(|pb| {
        pb.add_term(&cinco).add_nonterm(&d).add_nonterm(&b);
      })
      .add_empty_prod();
    })
    .add_rule(&d, |rb| {
      rb.add_empty_prod();
    });
  })
  .expect("number words grammar is valid")
}

/// A grammar over number words where nullable nonterminals sit inside
/// other productions:
///
/// ```text
/// S -> A B uno
/// A -> dos B | ε
/// B -> C D | tres
/// C -> cuatro A B | cinco
/// D -> seis | ε
/// ```
pub fn make_nested_number_words() -> BaseGrammar {
  let s = NonTerminal::new("S");
  let a = NonTerminal::new("A");
  let b = NonTerminal::new("B");
  let c = NonTerminal::new("C");
  let d = NonTerminal::new("D");

  build(&s, |gb| {
    gb.add_rule(&s, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&a)
          .add_nonterm(&b)
          .add_term(Terminal::new("uno"));
      });
    })
    .add_rule(&a, |rb| {
      rb.add_prod(|pb| {
        pb.add_term(Terminal::new("dos")).add_nonterm(&b);
      })
      .add_empty_prod();
    })
    .add_rule(&b, |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm(&c).add_nonterm(&d);
      })
      .add_prod(|pb| {
        pb.add_term(Terminal::new("tres"));
      });
    })
    .add_rule(&c, |rb| {
      rb.add_prod(|pb| {
        pb.add_term(Terminal::new("cuatro"))
          .add_nonterm(&a)
          .add_nonterm(&b);
      })
      .add_prod(|pb| {
        pb.add_term(Terminal::new("cinco"));
      });
    })
    .add_rule(&d, |rb| {
      rb.add_prod(|pb| {
        pb.add_term(Terminal::new("seis"));
      })
      .add_empty_prod();
    });
  })
  .expect("nested number words grammar is valid")
}
