//! Epsilon Non-deterministic Finite Automaton.

use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::{is_epsilon, SymbolId, EPSILON};
use std::collections::{BTreeSet, HashMap};

/// An ε-NFA over interned symbols.
///
/// The alphabet is kept sorted so every pass that iterates it (most
/// importantly the subset construction) numbers its output states
/// deterministically.
#[derive(Debug, Clone)]
pub struct EpsilonNfa {
    /// States are numbered `0..num_states`.
    num_states: StateId,
    start: StateId,
    finals: StateSet,
    /// `(source, symbol) -> destinations`; ε uses the `EPSILON` sentinel.
    transitions: HashMap<(StateId, SymbolId), StateSet>,
    /// All symbols except ε, in sorted order.
    alphabet: BTreeSet<SymbolId>,
    /// Per-state ε-closures, filled by `compute_epsilon_closures`.
    closures: Option<Vec<StateSet>>,
}

impl EpsilonNfa {
    pub fn new() -> Self {
        Self {
            num_states: 0,
            start: 0,
            finals: StateSet::default(),
            transitions: HashMap::new(),
            alphabet: BTreeSet::new(),
            closures: None,
        }
    }

    fn ensure_state(&mut self, state: StateId) {
        if state >= self.num_states {
            self.num_states = state + 1;
            self.closures = None;
        }
    }

    pub fn add_transition(&mut self, source: StateId, symbol: SymbolId, destination: StateId) {
        self.ensure_state(source);
        self.ensure_state(destination);
        if !is_epsilon(symbol) {
            self.alphabet.insert(symbol);
        }
        self.transitions
            .entry((source, symbol))
            .or_default()
            .insert(destination);
        self.closures = None;
    }

    pub fn add_epsilon_transition(&mut self, source: StateId, destination: StateId) {
        self.add_transition(source, EPSILON, destination);
    }

    pub fn set_start(&mut self, state: StateId) {
        self.ensure_state(state);
        self.start = state;
    }

    pub fn add_final(&mut self, state: StateId) {
        self.ensure_state(state);
        self.finals.insert(state);
    }

    pub fn num_states(&self) -> StateId {
        self.num_states
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    pub fn alphabet(&self) -> &BTreeSet<SymbolId> {
        &self.alphabet
    }

    fn closure_of(&self, state: StateId) -> StateSet {
        let mut closure = StateSet::with_capacity(self.num_states as usize);
        let mut stack = vec![state];
        while let Some(s) = stack.pop() {
            if closure.contains(s) {
                continue;
            }
            closure.insert(s);
            if let Some(destinations) = self.transitions.get(&(s, EPSILON)) {
                for dest in destinations.iter() {
                    if !closure.contains(dest) {
                        stack.push(dest);
                    }
                }
            }
        }
        closure
    }

    /// Precompute the ε-closure of every state. Subsequent closure queries
    /// reuse the cache.
    pub fn compute_epsilon_closures(&mut self) {
        if self.closures.is_some() {
            return;
        }
        let closures = (0..self.num_states).map(|s| self.closure_of(s)).collect();
        self.closures = Some(closures);
    }

    /// The least superset of `states` closed under ε-transitions.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.num_states as usize);
        if let Some(cached) = &self.closures {
            for state in states.iter() {
                closure.union_with(&cached[state as usize]);
            }
        } else {
            for state in states.iter() {
                closure.union_with(&self.closure_of(state));
            }
        }
        closure
    }

    /// States reachable from `states` on one `symbol` step, ε-closed.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        assert!(!is_epsilon(symbol), "use epsilon_closure for epsilon moves");
        let mut reached = StateSet::with_capacity(self.num_states as usize);
        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                reached.union_with(destinations);
            }
        }
        self.epsilon_closure(&reached)
    }
}

impl Default for EpsilonNfa {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_closure_chain() {
        let mut nfa = EpsilonNfa::new();
        nfa.add_epsilon_transition(0, 1);
        nfa.add_epsilon_transition(1, 2);
        nfa.set_start(0);

        let closure = nfa.epsilon_closure(&StateSet::singleton(0, 3));
        assert_eq!(closure.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cached_closures_match_uncached() {
        let mut nfa = EpsilonNfa::new();
        nfa.add_epsilon_transition(0, 1);
        nfa.add_transition(1, 7, 2);
        nfa.add_epsilon_transition(2, 0);

        let uncached = nfa.epsilon_closure(&StateSet::singleton(2, 3));
        nfa.compute_epsilon_closures();
        let cached = nfa.epsilon_closure(&StateSet::singleton(2, 3));
        assert_eq!(uncached.to_vec(), cached.to_vec());
    }

    #[test]
    fn test_move_on_symbol_applies_closure() {
        let mut nfa = EpsilonNfa::new();
        nfa.add_transition(0, 3, 1);
        nfa.add_transition(0, 3, 2);
        nfa.add_epsilon_transition(1, 4);

        let reached = nfa.move_on_symbol(&StateSet::singleton(0, 5), 3);
        assert_eq!(reached.to_vec(), vec![1, 2, 4]);
    }

    #[test]
    fn test_alphabet_excludes_epsilon() {
        let mut nfa = EpsilonNfa::new();
        nfa.add_transition(0, 5, 1);
        nfa.add_epsilon_transition(1, 2);
        assert_eq!(nfa.alphabet().len(), 1);
        assert!(nfa.alphabet().contains(&5));
    }
}
