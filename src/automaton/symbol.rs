//! Symbols and the symbol interning table.

use indexmap::IndexMap;

/// A symbol identifier. Automata carry ids; the [`SymbolTable`] maps them
/// back to names.
pub type SymbolId = u32;

/// Reserved id for the empty transition. Never interned.
pub const EPSILON: SymbolId = u32::MAX;

/// Check whether a symbol id denotes an epsilon transition.
#[inline]
pub fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// Interns symbol names to dense ids in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: IndexMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, interning it on first sight.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.names.len() as SymbolId;
        assert!(id != EPSILON, "symbol table overflow");
        self.names.insert(name.to_string(), id);
        id
    }

    /// The name of an interned symbol. Panics on `EPSILON` or unknown ids.
    pub fn name(&self, id: SymbolId) -> &str {
        self.names
            .get_index(id as usize)
            .map(|(name, _)| name.as_str())
            .unwrap_or_else(|| panic!("unknown symbol id {id}"))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> + '_ {
        self.names
            .iter()
            .map(|(name, &id)| (id, name.as_str()))
    }
}
