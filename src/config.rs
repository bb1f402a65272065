// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::BTreeSet;

use log::debug;

use crate::dfa::core::{DFABuilder, DFABuilding, Result, DFA};
use crate::dfa::dead::DeadStatePolicy;
use crate::dfa::symbol::Symbols;
use crate::dfa::State;

/// One transition declaration: `src` goes to `dest` on `symbs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionDecl {
    /// Source state.
    pub src: State,
    /// Symbol or range of symbols.
    pub symbs: Symbols,
    /// Destination state.
    pub dest: State,
}

impl TransitionDecl {
    /// Creates a declaration.
    pub fn new<S: Into<Symbols>>(src: State, symbs: S, dest: State) -> TransitionDecl {
        TransitionDecl { src, symbs: symbs.into(), dest }
    }
}

/// Type `FAConfig` is a parsed automaton configuration, independent of the
/// text format it was read from. Transitions are applied in order, so a
/// later declaration for the same state and symbol wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FAConfig {
    /// Initial state.
    pub initial: State,
    /// Final states.
    pub finals: BTreeSet<State>,
    /// Alphabet.
    pub alphabet: BTreeSet<char>,
    /// Transition declarations, in declaration order.
    pub transitions: Vec<TransitionDecl>,
}

impl FAConfig {
    /// Builds the `DFA` with exact dead state analysis.
    ///
    /// # Examples
    ///
    /// ```
    /// use automata::config::{FAConfig, TransitionDecl};
    /// use automata::dfa::symbol::Symbols;
    ///
    /// let config = FAConfig {
    ///     initial: 0,
    ///     finals: vec![1].into_iter().collect(),
    ///     alphabet: ('a'..='z').collect(),
    ///     transitions: vec![TransitionDecl::new(0, Symbols::Range('a', 'z'), 1)],
    /// };
    /// let dfa = config.build().unwrap();
    /// assert!(dfa.accepts("m"));
    /// assert!(!dfa.accepts(""));
    /// ```
    pub fn build(&self) -> Result<DFA> {
        self.build_with(DeadStatePolicy::default())
    }

    /// Builds the `DFA` with the given dead state policy.
    ///
    /// # Errors
    ///
    /// Return the first `DFAError` met while adding the transitions.
    pub fn build_with(&self, policy: DeadStatePolicy) -> Result<DFA> {
        debug!("building dfa: {} symbols, {} transition declarations",
               self.alphabet.len(), self.transitions.len());
        let mut dfa = DFABuilder::new()
            .set_dead_states(policy)
            .add_start(self.initial);
        for &symb in self.alphabet.iter() {
            dfa = dfa.add_symbol(symb);
        }
        for &state in self.finals.iter() {
            dfa = dfa.add_final(state);
        }
        for decl in self.transitions.iter() {
            dfa = dfa.add_transition(decl.src, decl.symbs, decl.dest);
        }
        dfa.finalize()
    }
}

/// Builds the `DFA` described by `config`. See `FAConfig::build`.
pub fn build(config: &FAConfig) -> Result<DFA> {
    config.build()
}
