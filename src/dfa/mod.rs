// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;

/// dfa core api
pub mod core;
/// dead state analysis
pub mod dead;
/// dfa core reader
pub mod reader;
/// transition labels
pub mod symbol;

/// A state of an automaton.
pub type State = i64;

/// Transition table: source state, then symbol, to destination state.
pub type Table = HashMap<State, HashMap<char, State>>;
