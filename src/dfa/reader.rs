// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::BTreeSet;
use std::error;
use std::fmt;                          // Formatter, format!, Display, Debug, write!
use std::fs;
use std::io;                           // Error
use std::num;                          // ParseIntError
use std::path::Path;
use std::result;

use itertools::Itertools;              // fold_ok
use log::{debug, warn};

use crate::config::{FAConfig, TransitionDecl};
use crate::dfa::core::{DFAError, DFA};
use crate::dfa::dead::DeadStatePolicy;
use crate::dfa::symbol::Symbols;
use crate::dfa::State;

/// Type `DFAReaderError` describes the list of errors that can occur during
/// the parsing of an automaton configuration. Every variant but `Io` and
/// `DFA` means the configuration is malformed.
#[derive(Debug)]
pub enum DFAReaderError {
    /// Error `MissingSection` means the definition ends before the named section.
    MissingSection(&'static str),
    /// Error `UnterminatedSection` means the named section, starting on the
    /// specified line, is not closed by `END`.
    UnterminatedSection(&'static str, usize),
    /// Error `IncompleteTransition` means the transition on the specified line does not contain
    /// one of these elements: source state, symbol, destination state.
    IncompleteTransition(usize),
    /// Error `IllformedTransition` means the transition contains too many elements.
    IllformedTransition(usize),
    /// Error `IllformedSymbol` means a symbol on the specified line is neither
    /// one character nor a `start-end` range.
    IllformedSymbol(usize),
    /// Error `DFA` encapsulates the error of the DFA building process (symbol
    /// outside the alphabet,...) for the definition starting on the specified line.
    DFA(DFAError, usize),
    /// Error `Io` is relative to the input errors (the file does not exist, the file can not be
    /// read,...).
    Io(io::Error),
    /// Error `Parse` is relative to the parsing errors (a state is an integer).
    Parse(num::ParseIntError, usize),
}

impl fmt::Display for DFAReaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DFAReaderError::Io(ref err) => write!(f, "IO error: {}", err),
            DFAReaderError::MissingSection(section) => write!(f, "The definition does not specify the {}.", section),
            DFAReaderError::UnterminatedSection(section, line) => write!(f, "Line {}: {} not terminated by END.", line, section),
            DFAReaderError::IncompleteTransition(line) => write!(f, "Line {}: missing the src, the symbol or the dest state.", line),
            DFAReaderError::IllformedTransition(line) => write!(f, "Line {}: too many elements.", line),
            DFAReaderError::IllformedSymbol(line) => write!(f, "Line {}: neither a symbol nor a range.", line),
            DFAReaderError::DFA(ref err, line) => write!(f, "Line {}: DFAError {}", line, err),
            DFAReaderError::Parse(ref err, line) => write!(f, "Line {}: parse error {}", line, err),
        }
    }
}

impl error::Error for DFAReaderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            DFAReaderError::Io(ref err) => Some(err),
            DFAReaderError::Parse(ref err, _) => Some(err),
            DFAReaderError::DFA(ref err, _) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DFAReaderError {
    fn from(err: io::Error) -> DFAReaderError {
        DFAReaderError::Io(err)
    }
}

/// Alias for result::Result<T,DFAReaderError>.
pub type Result<T> = result::Result<T, DFAReaderError>;

/// Type `Definition` is one automaton read from a configuration: the parsed
/// configuration and the test strings that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// The parsed configuration.
    pub config: FAConfig,
    /// Test strings, in order. May contain `EMPTY_WORD` or be empty.
    pub tests: Vec<String>,
    /// Line where the definition starts.
    pub line: usize,
    /// Number of states announced by the configuration, if any.
    pub num_states: Option<usize>,
}

impl Definition {
    /// Builds the `DFA` of the definition.
    ///
    /// # Errors
    ///
    /// Return a DFAReaderError::DFA if the configuration is rejected by the builder.
    pub fn build(&self, policy: DeadStatePolicy) -> Result<DFA> {
        let dfa = self.config
            .build_with(policy)
            .map_err(|e| DFAReaderError::DFA(e, self.line))?;
        if let Some(n) = self.num_states {
            let realized = dfa.states().len();
            if realized != n {
                warn!("line {}: {} states announced, {} realized", self.line, n, realized);
            }
        }
        Ok(dfa)
    }
}

/// Struct `DFAReader` is an empty structure that reads automaton definitions
/// from a file or from a `&str`.
///
/// Two formats are understood. The batch format holds any number of automata,
/// each introduced by a `FA:` line:
///
/// ```text
/// FA:
/// 0
/// 2
/// 01
/// 0, 0, 0
/// 0, 1, 1
/// END
/// 10
/// END
/// ```
///
/// followed by the initial state, the comma separated final states, the
/// alphabet (one symbol per character), the transitions and the test strings.
/// The keyed format holds a single automaton:
///
/// ```text
/// num_states: 2
/// final_states: 1
/// alphabet: a-z
/// transitions:
/// 0, a-z, 1
/// test_strings:
/// m
/// ```
pub struct DFAReader;

impl DFAReader {
    fn parse_state(contents: &str, line: usize) -> Result<State> {
        contents.trim()
                .parse::<State>()
                .map_err(|e| DFAReaderError::Parse(e, line))
    }

    fn parse_states(contents: &str, line: usize) -> Result<BTreeSet<State>> {
        contents
            .split(',')
            .map(|token| DFAReader::parse_state(token, line))
            .fold_ok(BTreeSet::new(), |mut acc, elt| {
                acc.insert(elt);
                acc
            })
    }

    fn parse_symbols(contents: &str, line: usize) -> Result<Symbols> {
        contents.trim()
                .parse::<Symbols>()
                .map_err(|_| DFAReaderError::IllformedSymbol(line))
    }

    /// Reads `src, symbol-or-range, dest`.
    fn parse_transition(contents: &str, line: usize) -> Result<TransitionDecl> {
        let mut tokens = contents.split(',');
        let mut next = || tokens.next().ok_or(DFAReaderError::IncompleteTransition(line));
        let src = DFAReader::parse_state(next()?, line)?;
        let symbs = DFAReader::parse_symbols(next()?, line)?;
        let dest = DFAReader::parse_state(next()?, line)?;
        if tokens.next().is_some() {
            return Err(DFAReaderError::IllformedTransition(line));
        }
        Ok(TransitionDecl { src, symbs, dest })
    }

    /// Reads a keyed alphabet: comma separated symbols or ranges.
    fn parse_alphabet(contents: &str, line: usize) -> Result<BTreeSet<char>> {
        let mut alphabet = BTreeSet::new();
        for token in contents.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            let symbs = DFAReader::parse_symbols(token, line)?;
            if let Symbols::Range(start, end) = symbs {
                if symbs.is_inverted() {
                    return Err(DFAReaderError::DFA(DFAError::InvalidRange(start, end), line));
                }
            }
            alphabet.extend(symbs.iter());
        }
        Ok(alphabet)
    }

    /// Reads a file and returns its definitions. See `DFAReader::new_from_string`.
    ///
    /// # Errors
    ///
    /// Return a DFAReaderError::Io if the file can not be read.
    pub fn new_from_file<P: AsRef<Path>>(file_path: P) -> Result<Vec<Result<Definition>>> {
        let contents = fs::read_to_string(file_path)?;
        Ok(DFAReader::new_from_string(&contents))
    }

    /// Reads every definition of `contents`, in the batch format if a line
    /// starts with `FA:`, in the keyed format otherwise. Each definition is
    /// read independently: an error in one of them does not prevent reading
    /// the following ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use automata::dfa::reader::*;
    /// use automata::dfa::dead::DeadStatePolicy;
    ///
    /// let contents =
    ///     "FA:\n\
    ///      0\n\
    ///      1\n\
    ///      ab\n\
    ///      0, a, 1\n\
    ///      END\n\
    ///      a\n\
    ///      END";
    /// let defs = DFAReader::new_from_string(contents);
    /// let def = defs[0].as_ref().unwrap();
    /// let dfa = def.build(DeadStatePolicy::Exact).unwrap();
    /// assert!(dfa.accepts(&def.tests[0]));
    /// ```
    pub fn new_from_string(contents: &str) -> Vec<Result<Definition>> {
        if contents.lines().any(|line| line.trim().starts_with("FA:")) {
            DFAReader::read_batch(contents)
        } else {
            vec![DFAReader::read_keyed(contents)]
        }
    }

    /// Reads every `FA:` block of `contents`. Lines before the first block
    /// are ignored. A block is read up to its second `END`; after a malformed
    /// block, reading resumes at the next `FA:` line.
    pub fn read_batch(contents: &str) -> Vec<Result<Definition>> {
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(nline, line)| (nline + 1, line.trim()));
        let mut defs = Vec::new();
        while let Some((header, _)) = lines.by_ref().find(|&(_, line)| line.starts_with("FA:")) {
            let def = DFAReader::read_block(header, &mut lines);
            match def {
                Ok(ref def) => debug!("line {}: read {} transitions, {} tests",
                                      def.line, def.config.transitions.len(), def.tests.len()),
                Err(ref e) => debug!("line {}: block rejected: {}", header, e),
            }
            defs.push(def);
        }
        defs
    }

    /// Reads the block following the `FA:` line `header`, consuming `lines`
    /// up to the `END` closing the test strings.
    fn read_block<'a, I>(header: usize, lines: &mut I) -> Result<Definition>
        where I: Iterator<Item = (usize, &'a str)>
    {
        let mut headers = lines.by_ref().filter(|&(_, line)| !line.is_empty());
        let (nline, initial) = headers.next().ok_or(DFAReaderError::MissingSection("initial state"))?;
        let initial = DFAReader::parse_state(initial, nline)?;
        let (nline, finals) = headers.next().ok_or(DFAReaderError::MissingSection("final states"))?;
        let finals = DFAReader::parse_states(finals, nline)?;
        let (nline, alphabet) = headers.next().ok_or(DFAReaderError::MissingSection("alphabet"))?;
        let alphabet = alphabet.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();

        let mut transitions = Vec::new();
        let end;
        loop {
            let (n, line) = lines.next().ok_or(DFAReaderError::UnterminatedSection("transitions", nline + 1))?;
            if line == "END" {
                end = n;
                break;
            }
            if !line.is_empty() {
                transitions.push(DFAReader::parse_transition(line, n)?);
            }
        }

        // a blank line is the empty word
        let mut tests = Vec::new();
        loop {
            let (_, line) = lines.next().ok_or(DFAReaderError::UnterminatedSection("test strings", end + 1))?;
            if line == "END" {
                break;
            }
            tests.push(line.to_owned());
        }

        Ok(Definition {
            config: FAConfig { initial, finals, alphabet, transitions },
            tests,
            line: header,
            num_states: None,
        })
    }

    /// Reads a keyed definition. The initial state defaults to 0 when no
    /// `initial_state:` line is given.
    pub fn read_keyed(contents: &str) -> Result<Definition> {
        #[derive(PartialEq)]
        enum Section { Header, Transitions, Tests }

        let mut section = Section::Header;
        let mut num_states = None;
        let mut initial = 0;
        let mut finals = None;
        let mut alphabet = None;
        let mut transitions = Vec::new();
        let mut tests = Vec::new();
        for (nline, line) in contents.lines().enumerate().map(|(n, line)| (n + 1, line.trim())) {
            if let Some(value) = line.strip_prefix("num_states:") {
                num_states = match value.trim().parse::<usize>() {
                    Ok(n) => Some(n),
                    Err(e) => {
                        warn!("line {}: state count ignored: {}", nline, e);
                        None
                    },
                };
            } else if let Some(value) = line.strip_prefix("initial_state:") {
                initial = DFAReader::parse_state(value, nline)?;
            } else if let Some(value) = line.strip_prefix("final_states:") {
                finals = Some(DFAReader::parse_states(value, nline)?);
            } else if let Some(value) = line.strip_prefix("alphabet:") {
                alphabet = Some(DFAReader::parse_alphabet(value, nline)?);
            } else if line.starts_with("transitions:") {
                section = Section::Transitions;
            } else if line.starts_with("test_strings:") {
                section = Section::Tests;
            } else if line.is_empty() {
                continue;
            } else if section == Section::Transitions && line.contains(',') {
                transitions.push(DFAReader::parse_transition(line, nline)?);
            } else if section == Section::Tests {
                tests.push(line.to_owned());
            } else {
                warn!("line {}: ignored {:?}", nline, line);
            }
        }
        let finals = finals.ok_or(DFAReaderError::MissingSection("final states"))?;
        let alphabet = alphabet.ok_or(DFAReaderError::MissingSection("alphabet"))?;
        debug!("read keyed definition: {} transitions, {} tests", transitions.len(), tests.len());
        Ok(Definition {
            config: FAConfig { initial, finals, alphabet, transitions },
            tests,
            line: 1,
            num_states,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const BATCH: &str =
        "FA:\n\
         0\n\
         2\n\
         01\n\
         0, 0, 0\n\
         0, 1, 1\n\
         1, 0, 2\n\
         1, 1, 0\n\
         2, 0, 2\n\
         2, 1, 1\n\
         END\n\
         10\n\
         1\n\
         \n\
         Λ\n\
         END\n";

    fn read_one(contents: &str) -> Result<Definition> {
        let mut defs = DFAReader::new_from_string(contents);
        assert_eq!(defs.len(), 1);
        defs.remove(0)
    }

    #[test]
    fn test_batch() {
        let def = read_one(BATCH).unwrap();
        assert_eq!(def.line, 1);
        assert_eq!(def.config.initial, 0);
        assert_eq!(def.config.finals.iter().cloned().collect::<Vec<_>>(), vec![2]);
        assert_eq!(def.config.alphabet.iter().cloned().collect::<String>(), "01");
        assert_eq!(def.config.transitions.len(), 6);
        assert_eq!(def.config.transitions[1], TransitionDecl::new(0, '1', 1));
        assert_eq!(def.tests, vec!["10", "1", "", "Λ"]);
        let dfa = def.build(DeadStatePolicy::Exact).unwrap();
        assert!(dfa.accepts("10"));
        assert!(!dfa.accepts("1"));
    }

    #[test]
    fn test_batch_several_blocks() {
        let contents = format!("ignored preamble\n{}\n{}", BATCH, BATCH);
        let defs = DFAReader::new_from_string(&contents);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].as_ref().unwrap().line, 2);
        assert_eq!(defs[1].as_ref().unwrap().line, 19);
    }

    #[test]
    fn test_batch_error_does_not_stop_reading() {
        let contents = format!("FA:\nx\n{}", BATCH);
        let defs = DFAReader::new_from_string(&contents);
        assert_eq!(defs.len(), 2);
        match defs[0] {
            Err(DFAReaderError::Parse(_, line)) => assert_eq!(line, 2),
            _ => panic!("Parse expected."),
        }
        assert!(defs[1].is_ok());
    }

    #[test]
    fn test_batch_finals_not_a_number() {
        let contents = "FA:\n0\n1, a\n01\nEND\nEND";
        match read_one(contents) {
            Err(DFAReaderError::Parse(_, line)) => assert_eq!(line, 3),
            _ => panic!("Parse expected."),
        }
    }

    #[test]
    fn test_batch_missing_alphabet() {
        match read_one("FA:\n0\n1\n") {
            Err(DFAReaderError::MissingSection(section)) => assert_eq!(section, "alphabet"),
            _ => panic!("MissingSection expected."),
        }
    }

    #[test]
    fn test_batch_unterminated_transitions() {
        match read_one("FA:\n0\n1\nab\n0, a, 1\n") {
            Err(DFAReaderError::UnterminatedSection(section, line)) => {
                assert_eq!(section, "transitions");
                assert_eq!(line, 5);
            },
            _ => panic!("UnterminatedSection expected."),
        }
    }

    #[test]
    fn test_batch_unterminated_tests() {
        match read_one("FA:\n0\n1\nab\n0, a, 1\nEND\na\n") {
            Err(DFAReaderError::UnterminatedSection(section, _)) => assert_eq!(section, "test strings"),
            _ => panic!("UnterminatedSection expected."),
        }
    }

    #[test]
    fn test_transition_incomplete() {
        match read_one("FA:\n0\n1\nab\n0, a\nEND\nEND") {
            Err(DFAReaderError::IncompleteTransition(line)) => assert_eq!(line, 5),
            _ => panic!("IncompleteTransition expected."),
        }
    }

    #[test]
    fn test_transition_with_four_elements() {
        match read_one("FA:\n0\n1\nab\n0, a, 1, 8\nEND\nEND") {
            Err(DFAReaderError::IllformedTransition(line)) => assert_eq!(line, 5),
            _ => panic!("IllformedTransition expected."),
        }
    }

    #[test]
    fn test_transition_with_two_chars() {
        match read_one("FA:\n0\n1\nab\n0, ab, 1\nEND\nEND") {
            Err(DFAReaderError::IllformedSymbol(line)) => assert_eq!(line, 5),
            _ => panic!("IllformedSymbol expected."),
        }
    }

    #[test]
    fn test_transition_dest_not_a_number() {
        match read_one("FA:\n0\n1\nab\n0, a, b\nEND\nEND") {
            Err(DFAReaderError::Parse(_, line)) => assert_eq!(line, 5),
            _ => panic!("Parse expected."),
        }
    }

    #[test]
    fn test_symbol_outside_alphabet() {
        let def = read_one("\nFA:\n0\n1\nab\n0, c, 1\nEND\nEND").unwrap();
        match def.build(DeadStatePolicy::Exact) {
            Err(DFAReaderError::DFA(DFAError::InvalidSymbol('c'), line)) => assert_eq!(line, 2),
            _ => panic!("DFA(InvalidSymbol) expected."),
        }
    }

    #[test]
    fn test_keyed() {
        let contents =
            "num_states: 2\n\
             final_states: 1\n\
             alphabet: a-z, _\n\
             transitions:\n\
             0, a-z, 1\n\
             1, _, 1\n\
             test_strings:\n\
             m\n\
             \n\
             m__\n\
             Λ\n";
        let def = read_one(contents).unwrap();
        assert_eq!(def.num_states, Some(2));
        assert_eq!(def.config.initial, 0);
        assert_eq!(def.config.alphabet.len(), 27);
        assert_eq!(def.config.transitions[0], TransitionDecl::new(0, Symbols::Range('a', 'z'), 1));
        assert_eq!(def.tests, vec!["m", "m__", "Λ"]);
        let dfa = def.build(DeadStatePolicy::Exact).unwrap();
        assert!(dfa.accepts("m__"));
        assert!(!dfa.accepts("_"));
    }

    #[test]
    fn test_keyed_initial_state() {
        let contents =
            "initial_state: 3\n\
             final_states: 3, 4\n\
             alphabet: a\n";
        let def = read_one(contents).unwrap();
        assert_eq!(def.config.initial, 3);
        assert_eq!(def.config.finals.len(), 2);
        assert!(def.config.transitions.is_empty());
        assert!(def.tests.is_empty());
    }

    #[test]
    fn test_keyed_missing_finals() {
        match read_one("alphabet: a\ntransitions:\n0, a, 1\n") {
            Err(DFAReaderError::MissingSection(section)) => assert_eq!(section, "final states"),
            _ => panic!("MissingSection expected."),
        }
    }

    #[test]
    fn test_keyed_inverted_alphabet_range() {
        match read_one("final_states: 1\nalphabet: z-a\n") {
            Err(DFAReaderError::DFA(DFAError::InvalidRange('z', 'a'), line)) => assert_eq!(line, 2),
            _ => panic!("InvalidRange expected."),
        }
    }

    #[test]
    fn test_batch_fa_prefix_inside_block() {
        let contents =
            "FA:\n\
             0\n\
             4\n\
             FA:x\n\
             0, F, 1\n\
             1, A, 2\n\
             2, :, 3\n\
             3, x, 4\n\
             END\n\
             FA:x\n\
             FA:\n\
             END\n\
             FA:\n\
             0\n\
             0\n\
             a\n\
             END\n\
             END";
        let defs = DFAReader::new_from_string(contents);
        assert_eq!(defs.len(), 2);
        let def = defs[0].as_ref().unwrap();
        assert_eq!(def.config.alphabet.iter().cloned().collect::<String>(), ":AFx");
        assert_eq!(def.tests, vec!["FA:x", "FA:"]);
        assert!(def.build(DeadStatePolicy::Exact).unwrap().accepts(&def.tests[0]));
        assert_eq!(defs[1].as_ref().unwrap().line, 13);
    }

    #[test]
    fn test_batch_resumes_at_next_block_after_error() {
        let contents =
            "FA:\n\
             0\n\
             1\n\
             ab\n\
             0, a, b\n\
             1, a, 1\n\
             END\n\
             a\n\
             END\n\
             FA:\n\
             0\n\
             0\n\
             a\n\
             END\n\
             END";
        let defs = DFAReader::new_from_string(contents);
        assert_eq!(defs.len(), 2);
        match defs[0] {
            Err(DFAReaderError::Parse(_, line)) => assert_eq!(line, 5),
            _ => panic!("Parse expected."),
        }
        assert_eq!(defs[1].as_ref().unwrap().line, 10);
    }

    #[test]
    fn test_batch_blank_lines_before_transitions() {
        let contents =
            "FA:\n\
             \n\
             0\n\
             \n\
             1\n\
             \n\
             ab\n\
             \n\
             0, a, 1\n\
             END\n\
             a\n\
             END";
        let def = read_one(contents).unwrap();
        assert_eq!(def.config.initial, 0);
        assert_eq!(def.config.finals.iter().cloned().collect::<Vec<_>>(), vec![1]);
        assert_eq!(def.config.alphabet.iter().cloned().collect::<String>(), "ab");
        assert_eq!(def.config.transitions, vec![TransitionDecl::new(0, 'a', 1)]);
        assert!(def.build(DeadStatePolicy::Exact).unwrap().accepts("a"));
    }

    #[test]
    fn test_keyed_unknown_lines_ignored() {
        let contents =
            "automaton: identifiers\n\
             final_states: 1\n\
             alphabet: a, b\n\
             stray header\n\
             transitions:\n\
             0, a, 1\n\
             no comma here\n\
             1, b, 1\n\
             test_strings:\n\
             ab\n";
        let def = read_one(contents).unwrap();
        assert_eq!(def.config.transitions, vec![TransitionDecl::new(0, 'a', 1),
                                                TransitionDecl::new(1, 'b', 1)]);
        assert_eq!(def.tests, vec!["ab"]);
    }

    #[test]
    fn test_keyed_state_count_is_informational() {
        let contents =
            "num_states: three\n\
             final_states: 1\n\
             alphabet: a\n\
             transitions:\n\
             0, a, 1\n";
        let def = read_one(contents).unwrap();
        assert_eq!(def.num_states, None);
        assert!(def.build(DeadStatePolicy::Exact).unwrap().accepts("a"));
    }

    #[test]
    fn test_read_data_files() {
        let defs = DFAReader::new_from_file("data/fa_configuration.txt").unwrap();
        assert_eq!(defs.len(), 3);
        assert!(defs[0].is_ok());
        match defs[1].as_ref().unwrap().build(DeadStatePolicy::Exact) {
            Err(DFAReaderError::DFA(DFAError::InvalidSymbol('c'), line)) => assert_eq!(line, 22),
            _ => panic!("DFA(InvalidSymbol) expected."),
        }
        assert!(defs[2].as_ref().unwrap().build(DeadStatePolicy::Exact).is_ok());

        let defs = DFAReader::new_from_file("data/fa_configuration2.txt").unwrap();
        assert_eq!(defs.len(), 1);
        assert!(defs[0].is_ok());
    }

    #[test]
    fn test_read_from_fake_file() {
        match DFAReader::new_from_file("fake.txt") {
            Err(DFAReaderError::Io(_)) => {},
            _ => panic!("Io::Error expected."),
        }
    }
}
