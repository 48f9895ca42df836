//! Subset construction: ε-NFA → DFA.

use crate::automaton::dfa::Dfa;
use crate::automaton::epsilon_nfa::EpsilonNfa;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::STATE_LIMIT;
use crate::error::{PrexError, Result};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Convert an ε-NFA to a DFA with the powerset construction.
///
/// DFA states are ε-closed NFA state sets, keyed by their sorted vector. The
/// breadth-first worklist and the sorted alphabet make the numbering a pure
/// function of the input automaton, which downstream enumeration relies on.
pub fn subset_construction(nfa: &EpsilonNfa) -> Result<Dfa> {
    let mut dfa = Dfa::new();

    let start = StateSet::singleton(nfa.start(), nfa.num_states() as usize);
    let initial = nfa.epsilon_closure(&start);
    if initial.is_empty() {
        return Ok(dfa);
    }

    let mut mapping: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut worklist = VecDeque::new();

    let initial_id = dfa.add_state();
    dfa.set_start(initial_id);
    if initial.intersects(nfa.finals()) {
        dfa.add_final(initial_id);
    }
    mapping.insert(initial.to_vec(), initial_id);
    worklist.push_back(initial);

    while let Some(current) = worklist.pop_front() {
        let current_id = *mapping.get(&current.to_vec()).unwrap();

        for &symbol in nfa.alphabet() {
            let next = nfa.move_on_symbol(&current, symbol);
            if next.is_empty() {
                // Undefined transition; the implicit sink.
                continue;
            }
            let key = next.to_vec();
            let next_id = if let Some(&existing) = mapping.get(&key) {
                existing
            } else {
                if mapping.len() >= STATE_LIMIT {
                    return Err(PrexError::TooLarge {
                        states: mapping.len() + 1,
                        limit: STATE_LIMIT,
                    });
                }
                let id = dfa.add_state();
                if next.intersects(nfa.finals()) {
                    dfa.add_final(id);
                }
                mapping.insert(key, id);
                worklist.push_back(next);
                id
            };
            dfa.add_transition(current_id, symbol, next_id);
        }
    }

    Ok(dfa)
}
