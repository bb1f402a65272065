// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

#![deny(warnings, missing_docs)]

//! Documentation for automaton api
//!
//! A `DFA` is built from a `config::FAConfig` (or directly with a
//! `dfa::core::DFABuilder`) and then answers acceptance queries.

/// dfa api
pub mod dfa;
/// parsed automaton configuration
pub mod config;
