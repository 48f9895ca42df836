//! Parallel Finite Automaton construction.
//!
//! A PFA is an ε-NFA extended with paired λ-transitions that encode the
//! fork/join structure of the shuffle operator. Each shuffle contributes two
//! [`LambdaPair`]s: entering one arm is mated with the completion of the
//! other. Within an arm the ordinary Thompson wiring preserves total order;
//! the pairs defer the interleaving expansion to the lowering pass.

use crate::ast::Expr;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::{SymbolId, SymbolTable, EPSILON};

/// One λ-transition, `from → to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LambdaEdge {
    pub from: StateId,
    pub to: StateId,
}

/// A mated pair of λ-transitions.
///
/// `fork` leaves a shuffle's start state into one arm; `join` carries the
/// *other* arm's exit into the shuffle's accept state. The mate relation is
/// the symmetric involution `fork ↔ join`. The two pairs of one shuffle share
/// the fork source (the start state) and the join target (the accept state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LambdaPair {
    pub fork: LambdaEdge,
    pub join: LambdaEdge,
}

/// A Parallel Finite Automaton.
#[derive(Debug, Clone)]
pub struct Pfa {
    num_states: StateId,
    start: StateId,
    finals: StateSet,
    /// Symbol and ε transitions; ε is the `EPSILON` sentinel.
    transitions: Vec<(StateId, SymbolId, StateId)>,
    lambda_pairs: Vec<LambdaPair>,
}

impl Pfa {
    /// Build the PFA for an expression tree, interning symbol names as they
    /// appear.
    pub fn from_expr(expr: &Expr, symbols: &mut SymbolTable) -> Pfa {
        let mut builder = Builder {
            next_state: 0,
            transitions: Vec::new(),
            lambda_pairs: Vec::new(),
            symbols,
        };
        let root = builder.fragment(expr);
        let mut finals = StateSet::with_capacity(builder.next_state as usize);
        for &exit in &root.exits {
            finals.insert(exit);
        }
        Pfa {
            num_states: builder.next_state,
            start: root.entry,
            finals,
            transitions: builder.transitions,
            lambda_pairs: builder.lambda_pairs,
        }
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

    /// Symbol and ε transitions as `(source, symbol, destination)` triples.
    pub fn transitions(&self) -> &[(StateId, SymbolId, StateId)] {
        &self.transitions
    }

    pub fn lambda_pairs(&self) -> &[LambdaPair] {
        &self.lambda_pairs
    }
}

/// A subexpression compiles to a fragment with one entry and a set of exits
/// (a singleton for every constructor here).
struct Fragment {
    entry: StateId,
    exits: Vec<StateId>,
}

struct Builder<'t> {
    next_state: StateId,
    transitions: Vec<(StateId, SymbolId, StateId)>,
    lambda_pairs: Vec<LambdaPair>,
    symbols: &'t mut SymbolTable,
}

impl Builder<'_> {
    fn fresh(&mut self) -> StateId {
        let id = self.next_state;
        self.next_state += 1;
        id
    }

    fn add(&mut self, from: StateId, symbol: SymbolId, to: StateId) {
        self.transitions.push((from, symbol, to));
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.add(from, EPSILON, to);
    }

    fn fragment(&mut self, expr: &Expr) -> Fragment {
        match expr {
            Expr::Sym(name) => {
                let entry = self.fresh();
                let exit = self.fresh();
                let id = self.symbols.intern(name);
                self.add(entry, id, exit);
                Fragment {
                    entry,
                    exits: vec![exit],
                }
            }
            Expr::Empty => {
                let state = self.fresh();
                Fragment {
                    entry: state,
                    exits: vec![state],
                }
            }
            Expr::Concat(l, r) => {
                let left = self.fragment(l);
                let right = self.fragment(r);
                for &exit in &left.exits {
                    self.add_epsilon(exit, right.entry);
                }
                Fragment {
                    entry: left.entry,
                    exits: right.exits,
                }
            }
            Expr::Union(l, r) => {
                let left = self.fragment(l);
                let right = self.fragment(r);
                let entry = self.fresh();
                let exit = self.fresh();
                self.add_epsilon(entry, left.entry);
                self.add_epsilon(entry, right.entry);
                for &e in left.exits.iter().chain(&right.exits) {
                    self.add_epsilon(e, exit);
                }
                Fragment {
                    entry,
                    exits: vec![exit],
                }
            }
            Expr::Shuffle(l, r) => {
                let left = self.fragment(l);
                let right = self.fragment(r);
                let left_exit = self.sole_exit(left.exits.clone());
                let right_exit = self.sole_exit(right.exits.clone());
                let start = self.fresh();
                let accept = self.fresh();
                // Entering each arm is mated with the other arm's completion.
                self.lambda_pairs.push(LambdaPair {
                    fork: LambdaEdge {
                        from: start,
                        to: left.entry,
                    },
                    join: LambdaEdge {
                        from: right_exit,
                        to: accept,
                    },
                });
                self.lambda_pairs.push(LambdaPair {
                    fork: LambdaEdge {
                        from: start,
                        to: right.entry,
                    },
                    join: LambdaEdge {
                        from: left_exit,
                        to: accept,
                    },
                });
                Fragment {
                    entry: start,
                    exits: vec![accept],
                }
            }
            Expr::Star(e) => {
                let inner = self.fragment(e);
                let hub = self.fresh();
                self.add_epsilon(hub, inner.entry);
                for &exit in &inner.exits {
                    self.add_epsilon(exit, hub);
                }
                Fragment {
                    entry: hub,
                    exits: vec![hub],
                }
            }
        }
    }

    /// Funnel a fragment's exits into a single state so each λ-join has
    /// exactly one source.
    fn sole_exit(&mut self, exits: Vec<StateId>) -> StateId {
        if let [exit] = exits[..] {
            return exit;
        }
        let collector = self.fresh();
        for exit in exits {
            self.add_epsilon(exit, collector);
        }
        collector
    }
}
