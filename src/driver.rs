//! Driver: compiles an expression, enumerates plans, and routes each plan's
//! symbols through a host-supplied dispatcher.
//!
//! The driver never interprets actions itself. A dispatcher is any
//! `FnMut(namespace, name, scope) -> Result<scope, E>`; its errors abort the
//! current plan and surface unchanged.

use crate::ast::Expr;
use crate::automaton::{
    lower, subset_construction, Cursor, Dfa, EpsilonNfa, Pfa, Plan, SymbolTable,
};
use crate::error::{Result, RunError};
use crate::parser;
use log::{debug, warn};

/// Options recognized by [`compile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Apply Hopcroft minimization before trimming.
    pub minimize: bool,
    /// Suppress the cyclic-automaton warning. Enumeration of a cyclic DFA is
    /// limited to a bounded prefix either way.
    pub allow_infinite: bool,
    /// Prefix passed verbatim to the dispatcher.
    pub namespace: String,
    /// Log pipeline stage sizes at debug level.
    pub verbose: bool,
}

/// A compiled expression and its cached automata.
///
/// The expression tree is built eagerly; PFA, NFA, and DFA are derived on
/// demand and cached. Cached automata are immutable once built; [`reset`]
/// discards them together with the live enumerator.
///
/// [`reset`]: Compiled::reset
pub struct Compiled {
    expr: Expr,
    opts: CompileOptions,
    symbols: SymbolTable,
    pfa: Option<Pfa>,
    nfa: Option<EpsilonNfa>,
    dfa: Option<Dfa>,
    cursor: Option<Cursor>,
    warned: bool,
}

/// Parse a parallel regular expression and wrap it for enumeration.
pub fn compile(pre: &str, opts: CompileOptions) -> Result<Compiled> {
    let expr = parser::parse(pre)?;
    Ok(Compiled {
        expr,
        opts,
        symbols: SymbolTable::new(),
        pfa: None,
        nfa: None,
        dfa: None,
        cursor: None,
        warned: false,
    })
}

impl Compiled {
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn options(&self) -> &CompileOptions {
        &self.opts
    }

    /// Replace the option set. Changing `minimize` or `allow_infinite`
    /// invalidates the cached automata; `namespace` and `verbose` changes
    /// keep them.
    pub fn configure(&mut self, opts: CompileOptions) {
        if opts.minimize != self.opts.minimize || opts.allow_infinite != self.opts.allow_infinite {
            self.reset();
        }
        self.opts = opts;
    }

    /// Discard cached automata and the enumerator; the next access rebuilds
    /// and the next [`next_plan`] restarts from the beginning.
    ///
    /// [`next_plan`]: Compiled::next_plan
    pub fn reset(&mut self) {
        self.pfa = None;
        self.nfa = None;
        self.dfa = None;
        self.cursor = None;
        self.warned = false;
    }

    /// The symbol table populated during automaton construction.
    pub fn symbols(&mut self) -> &SymbolTable {
        self.build_pfa();
        &self.symbols
    }

    /// The parallel finite automaton for the expression.
    pub fn pfa(&mut self) -> &Pfa {
        self.build_pfa();
        self.pfa.as_ref().unwrap()
    }

    /// The lowered ε-NFA.
    pub fn nfa(&mut self) -> Result<&EpsilonNfa> {
        self.build_nfa()?;
        Ok(self.nfa.as_ref().unwrap())
    }

    /// The trimmed (and, with `minimize`, minimal) DFA.
    pub fn dfa(&mut self) -> Result<&Dfa> {
        self.build_dfa()?;
        Ok(self.dfa.as_ref().unwrap())
    }

    fn build_pfa(&mut self) {
        if self.pfa.is_none() {
            let pfa = Pfa::from_expr(&self.expr, &mut self.symbols);
            if self.opts.verbose {
                debug!(
                    "pfa: {} states, {} lambda pairs, {} symbols",
                    pfa.num_states(),
                    pfa.lambda_pairs().len(),
                    self.symbols.len()
                );
            }
            self.pfa = Some(pfa);
        }
    }

    fn build_nfa(&mut self) -> Result<()> {
        if self.nfa.is_none() {
            self.build_pfa();
            let nfa = lower(self.pfa.as_ref().unwrap())?;
            if self.opts.verbose {
                debug!("nfa: {} states", nfa.num_states());
            }
            self.nfa = Some(nfa);
        }
        Ok(())
    }

    fn build_dfa(&mut self) -> Result<()> {
        if self.dfa.is_none() {
            self.build_nfa()?;
            let raw = subset_construction(self.nfa.as_ref().unwrap())?;
            let dfa = if self.opts.minimize {
                raw.minimize().trim()
            } else {
                raw.trim()
            };
            if self.opts.verbose {
                debug!(
                    "dfa: {} states ({} accepting), minimized: {}",
                    dfa.num_states(),
                    dfa.finals().len(),
                    self.opts.minimize
                );
            }
            if !self.opts.allow_infinite && !self.warned && dfa.is_cyclic() {
                warn!("automaton contains cycles; enumeration yields a bounded prefix");
                self.warned = true;
            }
            self.dfa = Some(dfa);
        }
        Ok(())
    }

    /// Produce the next plan, initializing the enumerator on first use.
    /// Returns `Ok(None)` once the language is exhausted (or empty).
    pub fn next_plan(&mut self) -> Result<Option<Plan>> {
        self.build_dfa()?;
        let dfa = self.dfa.as_ref().unwrap();
        let cursor = self.cursor.get_or_insert_with(|| Cursor::new(dfa));
        Ok(cursor.next_plan(dfa, &self.symbols))
    }

    /// Collect every remaining plan. Restarts enumeration from the beginning.
    pub fn plans(&mut self) -> Result<Vec<Plan>> {
        self.cursor = None;
        let mut all = Vec::new();
        while let Some(plan) = self.next_plan()? {
            all.push(plan);
        }
        Ok(all)
    }

    /// Pull one plan and dispatch its symbols in order, threading the scope
    /// through the dispatcher. Stops at the first dispatch error, which is
    /// surfaced unchanged. `Ok(None)` means no plan was available.
    pub fn run_once<S, E, F>(&mut self, scope: S, dispatch: &mut F) -> std::result::Result<Option<S>, RunError<E>>
    where
        F: FnMut(&str, &str, S) -> std::result::Result<S, E>,
    {
        let Some(plan) = self.next_plan()? else {
            return Ok(None);
        };
        let mut scope = scope;
        for name in plan.symbols() {
            scope = dispatch(&self.opts.namespace, name, scope).map_err(RunError::Dispatch)?;
        }
        Ok(Some(scope))
    }

    /// Like [`run_once`], but restarts enumeration when it is exhausted or
    /// not yet begun, so a non-empty language always yields a plan.
    ///
    /// [`run_once`]: Compiled::run_once
    pub fn run_any<S, E, F>(&mut self, scope: S, dispatch: &mut F) -> std::result::Result<Option<S>, RunError<E>>
    where
        F: FnMut(&str, &str, S) -> std::result::Result<S, E>,
    {
        if self.cursor.as_ref().map_or(true, Cursor::is_exhausted) {
            self.cursor = None;
        }
        self.run_once(scope, dispatch)
    }
}
