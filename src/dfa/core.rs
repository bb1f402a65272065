// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::{BTreeSet, HashSet};
use std::error;
use std::fmt;                          // Formatter, format!, Display, Debug, write!
use std::result;

use itertools::Itertools;              // sorted, join
use log::{debug, trace, warn};

use crate::dfa::dead::{self, DeadStatePolicy};
use crate::dfa::symbol::Symbols;
use crate::dfa::{State, Table};

/// Literal denoting the empty word in test strings.
pub const EMPTY_WORD: &str = "Λ";

/// The `DFAError` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DFAError {
    /// A transition uses the symbol `char` which is not in the alphabet.
    InvalidSymbol(char),
    /// A range `start-end` with `start` after `end`.
    InvalidRange(char, char),
    /// No starting state is specified.
    MissingStartingState,
}

impl fmt::Display for DFAError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DFAError::InvalidSymbol(symb) => write!(f, "Symbol '{}' is not in the alphabet.", symb),
            DFAError::InvalidRange(start, end) => write!(f, "Empty range '{}-{}'.", start, end),
            DFAError::MissingStartingState => write!(f, "Missing starting state."),
        }
    }
}

impl error::Error for DFAError {}

/// Alias for result::Result<T,DFAError>.
pub type Result<T> = result::Result<T, DFAError>;

/// Type `Input` is a test input: either a word, read symbol by symbol, or the
/// explicit empty word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// The empty word, never looked up symbol by symbol.
    Empty,
    /// A (possibly empty) sequence of symbols.
    Word(&'a str),
}

impl<'a> Input<'a> {
    /// Reads a test string, recognizing `EMPTY_WORD`.
    ///
    /// ```
    /// use automata::dfa::core::Input;
    ///
    /// assert_eq!(Input::parse("Λ"), Input::Empty);
    /// assert_eq!(Input::parse("ab"), Input::Word("ab"));
    /// ```
    pub fn parse(token: &'a str) -> Input<'a> {
        if token == EMPTY_WORD {
            Input::Empty
        } else {
            Input::Word(token)
        }
    }
}

impl<'a> fmt::Display for Input<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Input::Empty => write!(f, "{}", EMPTY_WORD),
            Input::Word(word) => write!(f, "{}", word),
        }
    }
}

/// The type `DFA` represents a Deterministic Finite Automaton. The transitions
/// of the automaton are stored in a hashtable indexed by source state, then
/// by symbol.
///
/// A `DFA` can only be obtained from a `DFABuilder` and is immutable, so it
/// can be shared between threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct DFA {
    transitions : Table,
    start       : State,
    finals      : HashSet<State>,
    alphabet    : HashSet<char>,
    dead        : HashSet<State>,
    policy      : DeadStatePolicy,
}

/// The `DFABuilder` follows the builder pattern and allows to create a Deterministic
/// Finite Automaton. The builder is moved at each call so it is necessary to bind
/// to a new variable the return value for each function of the builder.
///
/// The alphabet has to be declared before the transitions that use it: each
/// transition symbol is checked when the transition is added.
///
/// # Errors
///
/// Return an error if a transition uses a symbol outside the alphabet.
///
/// Return an error if the starting state is not specified.
///
/// # Examples
///
/// ```
/// use automata::dfa::core::*;
///
/// // (abc)*
/// let dfa = DFABuilder::new()
///     .add_symbols("abc")
///     .add_start(0)
///     .add_final(0)
///     .add_transition(0, 'a', 1)
///     .add_transition(1, 'b', 2)
///     .add_transition(2, 'c', 0)
///     .finalize()
///     .unwrap();
/// assert!(dfa.accepts("abcabc"));
/// ```
///
/// ```
/// use automata::dfa::core::*;
///
/// let dfa = DFABuilder::new()
///     .add_symbols("ab")
///     .add_start(0)
///     .add_transition(0, 't', 1)
///     .finalize();
/// assert_eq!(dfa.unwrap_err(), DFAError::InvalidSymbol('t'));
/// ```
///
/// ```
/// use automata::dfa::core::*;
///
/// let dfa = DFABuilder::new()
///     .add_symbols("t")
///     .add_final(4)
///     .add_transition(0, 't', 1)
///     .finalize();
/// assert_eq!(dfa.unwrap_err(), DFAError::MissingStartingState);
/// ```
#[derive(Debug, Default)]
pub struct DFABuilder {
    transitions : Table,
    start       : Option<State>,
    finals      : HashSet<State>,
    alphabet    : HashSet<char>,
    dead        : HashSet<State>,
    policy      : DeadStatePolicy,
}

/// DFABuilding is the trait assiociated to the DFABuilder type. Each DFABuilder
/// should implement DFABuilding trait.
///
/// #Errors
///
/// If self contains a DFAError then each function should transfer this error.
pub trait DFABuilding: Sized {
    /// Add a symbol to the alphabet.
    fn add_symbol(self, symb: char) -> Result<DFABuilder>;

    /// Add every symbol of `symbs` to the alphabet.
    fn add_symbols(self, symbs: &str) -> Result<DFABuilder>;

    /// Set the starting state of the DFA. A second call replaces the first one.
    fn add_start(self, state: State) -> Result<DFABuilder>;

    /// Add a final state to the DFA.
    fn add_final(self, state: State) -> Result<DFABuilder>;

    /// Choose how dead states are found. Must be called before adding the
    /// transitions for `DeadStatePolicy::Incremental` to see them.
    fn set_dead_states(self, policy: DeadStatePolicy) -> Result<DFABuilder>;

    /// Add a transition from `src` to `dest` for one symbol or a range of symbols.
    /// A transition already defined for the same source and symbol is replaced.
    ///
    /// # Errors
    ///
    /// Return a DFAError::InvalidSymbol(symb) for the first symbol not in the
    /// alphabet. Return a DFAError::InvalidRange(start,end) if `start > end`.
    fn add_transition<S: Into<Symbols>>(self, src: State, symbs: S, dest: State) -> Result<DFABuilder>;

    /// Finalize the building of the DFA.
    ///
    /// # Errors
    ///
    /// Return a DFAError::MissingStartingState if no starting state is specified.
    fn finalize(self) -> Result<DFA>;
}

impl DFABuilder {
    /// Creates a new DFABuilder with an empty alphabet.
    pub fn new() -> Result<DFABuilder> {
        Ok(DFABuilder::default())
    }
}

impl DFABuilding for DFABuilder {
    fn add_symbol(self, symb: char) -> Result<DFABuilder> {
        Result::<DFABuilder>::Ok(self).add_symbol(symb)
    }

    fn add_symbols(self, symbs: &str) -> Result<DFABuilder> {
        Result::<DFABuilder>::Ok(self).add_symbols(symbs)
    }

    fn add_start(self, state: State) -> Result<DFABuilder> {
        Result::<DFABuilder>::Ok(self).add_start(state)
    }

    fn add_final(self, state: State) -> Result<DFABuilder> {
        Result::<DFABuilder>::Ok(self).add_final(state)
    }

    fn set_dead_states(self, policy: DeadStatePolicy) -> Result<DFABuilder> {
        Result::<DFABuilder>::Ok(self).set_dead_states(policy)
    }

    fn add_transition<S: Into<Symbols>>(self, src: State, symbs: S, dest: State) -> Result<DFABuilder> {
        Result::<DFABuilder>::Ok(self).add_transition(src, symbs, dest)
    }

    fn finalize(self) -> Result<DFA> {
        Result::<DFABuilder>::Ok(self).finalize()
    }
}

/// Implementing DFABuilding trait for Result<DFABuilder> allows
/// to chain the return value of the DFABuilder instead of unwrapping them
/// at each stage of the building process.
impl DFABuilding for Result<DFABuilder> {
    fn add_symbol(self, symb: char) -> Result<DFABuilder> {
        self.map(|mut dfa| {
            dfa.alphabet.insert(symb);
            dfa
        })
    }

    fn add_symbols(self, symbs: &str) -> Result<DFABuilder> {
        self.map(|mut dfa| {
            dfa.alphabet.extend(symbs.chars());
            dfa
        })
    }

    fn add_start(self, state: State) -> Result<DFABuilder> {
        self.map(|mut dfa| {
            dfa.start = Some(state);
            dfa
        })
    }

    fn add_final(self, state: State) -> Result<DFABuilder> {
        self.map(|mut dfa| {
            dfa.finals.insert(state);
            dfa
        })
    }

    fn set_dead_states(self, policy: DeadStatePolicy) -> Result<DFABuilder> {
        self.map(|mut dfa| {
            dfa.policy = policy;
            dfa
        })
    }

    fn add_transition<S: Into<Symbols>>(self, src: State, symbs: S, dest: State) -> Result<DFABuilder> {
        let symbs: Symbols = symbs.into();
        self.and_then(|mut dfa| {
            match symbs {
                Symbols::Range(start, end) if symbs.is_inverted() => {
                    return Err(DFAError::InvalidRange(start, end));
                },
                Symbols::Range(..) => debug!("expanding range {} of state {} to state {}", symbs, src, dest),
                Symbols::Single(_) => {},
            }
            if let Some(symb) = symbs.iter().find(|c| !dfa.alphabet.contains(c)) {
                return Err(DFAError::InvalidSymbol(symb));
            }
            let row = dfa.transitions.entry(src).or_default();
            for symb in symbs.iter() {
                if let Some(prev) = row.insert(symb, dest) {
                    if prev != dest {
                        warn!("transition ({},'{}') redefined: {} replaced by {}", src, symb, prev, dest);
                    }
                }
            }
            if dfa.policy == DeadStatePolicy::Incremental
                && dead::check_incremental(&dfa.transitions, &dfa.finals, &mut dfa.dead, src) {
                debug!("state {} marked dead", src);
            }
            Ok(dfa)
        })
    }

    fn finalize(self) -> Result<DFA> {
        self.and_then(|dfa| {
            let start = dfa.start.ok_or(DFAError::MissingStartingState)?;
            let mut dfa = DFA {
                transitions: dfa.transitions,
                start,
                finals: dfa.finals,
                alphabet: dfa.alphabet,
                dead: dfa.dead,
                policy: dfa.policy,
            };
            match dfa.policy {
                DeadStatePolicy::Exact => {
                    dfa.dead = dead::exact_dead_states(&dfa.transitions, &dfa.finals, dfa.states());
                },
                DeadStatePolicy::Incremental => {},
                DeadStatePolicy::Disabled => dfa.dead.clear(),
            }
            debug!("dfa finalized: {} states, {} dead", dfa.states().len(), dfa.dead.len());
            Ok(dfa)
        })
    }
}

impl DFA {
    /// Test if an input string is a word of the language defined by the DFA.
    /// The empty string is accepted iff the starting state is final.
    ///
    /// A symbol outside the alphabet, a dead state or a missing transition
    /// rejects the input at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use automata::dfa::core::*;
    ///
    /// let dfa = DFABuilder::new()
    ///     .add_symbols("01")
    ///     .add_start(0)
    ///     .add_final(2)
    ///     .add_transition(0, '0', 0)
    ///     .add_transition(0, '1', 1)
    ///     .add_transition(1, '0', 2)
    ///     .add_transition(1, '1', 0)
    ///     .add_transition(2, '0', 2)
    ///     .add_transition(2, '1', 1)
    ///     .finalize()
    ///     .unwrap();
    /// assert!(dfa.accepts("10"));
    /// assert!(!dfa.accepts("1"));
    /// assert!(!dfa.accepts(""));
    /// assert!(!dfa.accepts("102"));
    /// ```
    pub fn accepts(&self, input: &str) -> bool {
        let mut state = self.start;
        for symb in input.chars() {
            if !self.alphabet.contains(&symb) {
                trace!("{:?}: symbol '{}' not in the alphabet", input, symb);
                return false;
            }
            if self.dead.contains(&state) {
                trace!("{:?}: dead state {} reached", input, state);
                return false;
            }
            match self.next(state, symb) {
                Some(next) => state = next,
                None => {
                    trace!("{:?}: no transition ({},'{}')", input, state, symb);
                    return false;
                },
            }
        }
        self.finals.contains(&state)
    }

    /// Test an `Input`: `Input::Empty` is accepted iff the starting state is final.
    pub fn accepts_input(&self, input: Input) -> bool {
        match input {
            Input::Empty => self.finals.contains(&self.start),
            Input::Word(word) => self.accepts(word),
        }
    }

    /// Returns the successor of `state` on `symb`, if defined.
    pub fn next(&self, state: State, symb: char) -> Option<State> {
        self.transitions.get(&state).and_then(|row| row.get(&symb)).cloned()
    }

    /// Returns the starting state.
    pub fn start(&self) -> State {
        self.start
    }

    /// Returns the final states, sorted.
    pub fn finals(&self) -> Vec<State> {
        self.finals.iter().cloned().sorted().collect()
    }

    /// Returns `true` if `state` is final.
    pub fn is_final(&self, state: State) -> bool {
        self.finals.contains(&state)
    }

    /// Returns the alphabet, sorted.
    pub fn alphabet(&self) -> Vec<char> {
        self.alphabet.iter().cloned().sorted().collect()
    }

    /// Returns the realized states: the starting state, the final states and
    /// every state appearing in a transition.
    pub fn states(&self) -> BTreeSet<State> {
        let mut states = BTreeSet::new();
        states.insert(self.start);
        states.extend(self.finals.iter().cloned());
        for (&src, row) in self.transitions.iter() {
            states.insert(src);
            states.extend(row.values().cloned());
        }
        states
    }

    /// Returns the transitions as `(src, symb, dest)`, sorted by source then symbol.
    pub fn transitions(&self) -> Vec<(State, char, State)> {
        self.transitions
            .iter()
            .flat_map(|(&src, row)| row.iter().map(move |(&symb, &dest)| (src, symb, dest)))
            .sorted()
            .collect()
    }

    /// Returns the dead states, sorted. Empty with `DeadStatePolicy::Disabled`.
    pub fn dead_states(&self) -> Vec<State> {
        self.dead.iter().cloned().sorted().collect()
    }

    /// Returns `true` if `state` is marked dead.
    pub fn is_dead(&self, state: State) -> bool {
        self.dead.contains(&state)
    }

    /// Returns the dead state policy the DFA was built with.
    pub fn dead_state_policy(&self) -> DeadStatePolicy {
        self.policy
    }
}

impl fmt::Display for DFA {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "1) set of states: {{{}}}, initial state is state {}.",
                 self.states().iter().map(|s| format!("state {}", s)).join(", "),
                 self.start)?;
        writeln!(f, "2) set of final state(s): {{{}}}",
                 self.finals().iter().map(|s| format!("state {}", s)).join(", "))?;
        writeln!(f, "3) alphabet set: {{{}}}", self.alphabet().iter().join(", "))?;
        writeln!(f, "4) transitions:")?;
        for (src, symb, dest) in self.transitions() {
            writeln!(f, "   {} {} {}", src, symb, dest)?;
        }
        Ok(())
    }
}
