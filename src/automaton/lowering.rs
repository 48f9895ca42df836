//! Lowering a PFA to a plain ε-NFA.
//!
//! The lowered automaton tracks *markings*: the set of PFA states holding a
//! token, one per active shuffle arm. A symbol or ε move advances a single
//! token; a λ-fork consumes the token on a shuffle's start state and places
//! one on each arm entry; a λ-join consumes both arm-exit tokens and places
//! one on the accept state. Forks and joins lower to ε-transitions, so every
//! interleaving between arms is admitted while each arm's internal order is
//! preserved. Markings are interned by their sorted state vector, the same
//! canonical-key discipline the subset construction uses.

use crate::automaton::epsilon_nfa::EpsilonNfa;
use crate::automaton::pfa::Pfa;
use crate::automaton::state::StateId;
use crate::automaton::symbol::SymbolId;
use crate::automaton::STATE_LIMIT;
use crate::error::{PrexError, Result};
use indexmap::IndexMap;
use std::collections::{BTreeMap, VecDeque};

/// Eliminate λ-pairs, producing an ε-NFA with the same language.
///
/// Fails with [`PrexError::TooLarge`] when the marking count exceeds the
/// state ceiling; marking counts grow with the product of arm sizes under
/// nested shuffles.
pub fn lower(pfa: &Pfa) -> Result<EpsilonNfa> {
    let mut edges_by_source: Vec<Vec<(SymbolId, StateId)>> =
        vec![Vec::new(); pfa.num_states() as usize];
    for &(src, sym, dst) in pfa.transitions() {
        edges_by_source[src as usize].push((sym, dst));
    }

    // Fork groups fire every λ leaving a shuffle start at once; join groups
    // fire when every arm exit of a shuffle holds a token. Both keyed maps
    // are ordered so marking discovery, and with it state numbering, is
    // deterministic.
    let mut forks: BTreeMap<StateId, Vec<StateId>> = BTreeMap::new();
    let mut joins: BTreeMap<StateId, Vec<StateId>> = BTreeMap::new();
    for pair in pfa.lambda_pairs() {
        forks.entry(pair.fork.from).or_default().push(pair.fork.to);
        joins.entry(pair.join.to).or_default().push(pair.join.from);
    }

    let accepting = |marking: &[StateId]| marking.iter().all(|&s| pfa.finals().contains(s));

    let mut ids: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut worklist: VecDeque<Vec<StateId>> = VecDeque::new();
    let mut nfa = EpsilonNfa::new();

    let initial = vec![pfa.start()];
    ids.insert(initial.clone(), 0);
    nfa.set_start(0);
    if accepting(&initial) {
        nfa.add_final(0);
    }
    worklist.push_back(initial);

    while let Some(marking) = worklist.pop_front() {
        let source_id = *ids.get(&marking).unwrap();

        for &p in &marking {
            for &(sym, dst) in &edges_by_source[p as usize] {
                let next = advance(&marking, &[p], &[dst]);
                let target = intern(next, &accepting, &mut ids, &mut worklist, &mut nfa)?;
                nfa.add_transition(source_id, sym, target);
            }
            if let Some(targets) = forks.get(&p) {
                let next = advance(&marking, &[p], targets);
                let target = intern(next, &accepting, &mut ids, &mut worklist, &mut nfa)?;
                nfa.add_epsilon_transition(source_id, target);
            }
        }

        for (&accept, sources) in &joins {
            if sources.iter().all(|&s| marking.contains(&s)) {
                let next = advance(&marking, sources, &[accept]);
                let target = intern(next, &accepting, &mut ids, &mut worklist, &mut nfa)?;
                nfa.add_epsilon_transition(source_id, target);
            }
        }
    }

    nfa.compute_epsilon_closures();
    Ok(nfa)
}

/// The marking after removing `remove` and adding `add`, in canonical form.
fn advance(marking: &[StateId], remove: &[StateId], add: &[StateId]) -> Vec<StateId> {
    let mut next: Vec<StateId> = marking
        .iter()
        .copied()
        .filter(|s| !remove.contains(s))
        .collect();
    next.extend_from_slice(add);
    next.sort_unstable();
    next.dedup();
    next
}

fn intern(
    marking: Vec<StateId>,
    accepting: &impl Fn(&[StateId]) -> bool,
    ids: &mut IndexMap<Vec<StateId>, StateId>,
    worklist: &mut VecDeque<Vec<StateId>>,
    nfa: &mut EpsilonNfa,
) -> Result<StateId> {
    if let Some(&id) = ids.get(&marking) {
        return Ok(id);
    }
    if ids.len() >= STATE_LIMIT {
        return Err(PrexError::TooLarge {
            states: ids.len() + 1,
            limit: STATE_LIMIT,
        });
    }
    let id = ids.len() as StateId;
    if accepting(&marking) {
        nfa.add_final(id);
    }
    ids.insert(marking.clone(), id);
    worklist.push_back(marking);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::state::StateSet;
    use crate::automaton::symbol::SymbolTable;
    use crate::parser::parse;

    fn lowered(pre: &str) -> (EpsilonNfa, SymbolTable) {
        let mut symbols = SymbolTable::new();
        let pfa = Pfa::from_expr(&parse(pre).unwrap(), &mut symbols);
        (lower(&pfa).unwrap(), symbols)
    }

    fn accepts(nfa: &EpsilonNfa, word: &[SymbolId]) -> bool {
        let start = StateSet::singleton(nfa.start(), nfa.num_states() as usize);
        let mut current = nfa.epsilon_closure(&start);
        for &sym in word {
            current = nfa.move_on_symbol(&current, sym);
            if current.is_empty() {
                return false;
            }
        }
        current.intersects(nfa.finals())
    }

    #[test]
    fn test_concat_order_is_fixed() {
        let (nfa, _) = lowered("A B");
        assert!(accepts(&nfa, &[0, 1]));
        assert!(!accepts(&nfa, &[1, 0]));
        assert!(!accepts(&nfa, &[0]));
    }

    #[test]
    fn test_shuffle_admits_both_orders() {
        let (nfa, symbols) = lowered("A&B");
        assert_eq!(symbols.len(), 2);
        assert!(accepts(&nfa, &[0, 1]));
        assert!(accepts(&nfa, &[1, 0]));
        assert!(!accepts(&nfa, &[0]));
        assert!(!accepts(&nfa, &[0, 0]));
        assert!(!accepts(&nfa, &[0, 1, 1]));
    }

    #[test]
    fn test_shuffle_preserves_arm_order() {
        // A=0 B=1 C=2 D=3
        let (nfa, _) = lowered("(A B)&(C D)");
        assert!(accepts(&nfa, &[0, 1, 2, 3]));
        assert!(accepts(&nfa, &[0, 2, 1, 3]));
        assert!(accepts(&nfa, &[2, 0, 3, 1]));
        assert!(accepts(&nfa, &[2, 3, 0, 1]));
        // B before A violates the left arm's order.
        assert!(!accepts(&nfa, &[1, 0, 2, 3]));
        assert!(!accepts(&nfa, &[2, 3, 1, 0]));
    }

    #[test]
    fn test_starred_shuffle_repeats() {
        let (nfa, _) = lowered("(A&B)*");
        assert!(accepts(&nfa, &[]));
        assert!(accepts(&nfa, &[0, 1]));
        assert!(accepts(&nfa, &[1, 0, 0, 1]));
        assert!(!accepts(&nfa, &[0, 0]));
        assert!(!accepts(&nfa, &[0, 1, 1]));
    }

    #[test]
    fn test_union_of_shuffles() {
        // A=0 B=1 C=2
        let (nfa, _) = lowered("A&B|C");
        assert!(accepts(&nfa, &[2]));
        assert!(accepts(&nfa, &[0, 1]));
        assert!(accepts(&nfa, &[1, 0]));
        assert!(!accepts(&nfa, &[0, 2]));
    }
}
