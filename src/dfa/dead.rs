// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::dfa::{State, Table};

/// Type `DeadStatePolicy` selects how a `DFA` finds the states from which no
/// final state can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadStatePolicy {
    /// One backward pass from the final states once the table is complete.
    /// A state is dead iff no sequence of transitions leads it to a final state.
    #[default]
    Exact,
    /// A forward check from the source state after every insertion, on the
    /// table as populated so far. A mark is never removed, so a state can be
    /// marked dead before its outgoing transitions are declared: the result
    /// depends on insertion order and may reject accepted words.
    Incremental,
    /// No dead state tracking.
    Disabled,
}

/// Returns `true` if a final state can be reached from `from` by following
/// `table`. `from` itself counts.
pub fn reaches_final(table: &Table, finals: &HashSet<State>, from: State) -> bool {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);
    while let Some(state) = queue.pop_front() {
        if finals.contains(&state) {
            return true;
        }
        if let Some(row) = table.get(&state) {
            for &next in row.values() {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    false
}

/// Returns every state that reaches a final state, computed by a breadth
/// first search from `finals` over the reversed transition graph.
pub fn productive_states(table: &Table, finals: &HashSet<State>) -> HashSet<State> {
    let mut predecessors: HashMap<State, HashSet<State>> = HashMap::new();
    for (&src, row) in table.iter() {
        for &dest in row.values() {
            predecessors.entry(dest).or_default().insert(src);
        }
    }
    let mut productive: HashSet<State> = finals.clone();
    let mut queue: VecDeque<State> = finals.iter().cloned().collect();
    while let Some(state) = queue.pop_front() {
        if let Some(srcs) = predecessors.get(&state) {
            for &src in srcs {
                if productive.insert(src) {
                    queue.push_back(src);
                }
            }
        }
    }
    productive
}

/// Returns the states of `known` that are not productive.
pub fn exact_dead_states<I>(table: &Table, finals: &HashSet<State>, known: I) -> HashSet<State>
    where I: IntoIterator<Item = State>
{
    let productive = productive_states(table, finals);
    known.into_iter().filter(|s| !productive.contains(s)).collect()
}

/// Marks `state` dead if, with the transitions inserted so far, it cannot
/// reach a final state. Final states and states without any transition are
/// left alone. Returns `true` if `state` was newly marked.
pub fn check_incremental(table: &Table,
                         finals: &HashSet<State>,
                         dead: &mut HashSet<State>,
                         state: State) -> bool {
    if !table.contains_key(&state) || finals.contains(&state) {
        return false;
    }
    if reaches_final(table, finals, state) {
        return false;
    }
    dead.insert(state)
}
