// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::str::FromStr;

/// Type `Symbols` is the label of a transition declaration: either a single
/// symbol or an inclusive range of symbols written `start-end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbols {
    /// One symbol.
    Single(char),
    /// Every symbol whose code point lies in `[start, end]`.
    Range(char, char),
}

impl Symbols {
    /// Returns `true` if the range is empty, i.e. `start > end`.
    pub fn is_inverted(&self) -> bool {
        match *self {
            Symbols::Single(_) => false,
            Symbols::Range(start, end) => start > end,
        }
    }

    /// Iterates over the symbols in code point order.
    ///
    /// # Examples
    ///
    /// ```
    /// use automata::dfa::symbol::Symbols;
    ///
    /// let symbs: String = Symbols::Range('a', 'e').iter().collect();
    /// assert_eq!(symbs, "abcde");
    /// assert_eq!(Symbols::Single('x').iter().count(), 1);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = char> {
        match *self {
            Symbols::Single(c) => c..=c,
            Symbols::Range(start, end) => start..=end,
        }
    }
}

impl From<char> for Symbols {
    fn from(c: char) -> Symbols {
        Symbols::Single(c)
    }
}

impl fmt::Display for Symbols {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbols::Single(c) => write!(f, "{}", c),
            Symbols::Range(start, end) => write!(f, "{}-{}", start, end),
        }
    }
}

/// Error returned when a token is neither one symbol nor a `start-end` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSymbolsError(pub String);

impl fmt::Display for ParseSymbolsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}' is neither a symbol nor a range", self.0)
    }
}

impl std::error::Error for ParseSymbolsError {}

impl FromStr for Symbols {
    type Err = ParseSymbolsError;

    /// A lone `-` is the symbol `-`; `a-z` is a range.
    fn from_str(token: &str) -> Result<Symbols, ParseSymbolsError> {
        let chars: Vec<char> = token.chars().collect();
        match chars.as_slice() {
            [c] => Ok(Symbols::Single(*c)),
            [start, '-', end] => Ok(Symbols::Range(*start, *end)),
            _ => Err(ParseSymbolsError(token.to_owned())),
        }
    }
}
