// Symbol table: label-name-to-id and id-to-name mapping.

use std::ops::Range;

use hashbrown::HashMap;

use crate::EPSILON;

/// Interned label id.
pub type Symbol = u32;

/// Id of the empty-word label.
pub const EPSILON_SYMBOL: Symbol = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Epsilon,
    Terminal,
    Nonterminal,
}

/// Interned grammar labels.
///
/// Symbols are numbered in three consecutive blocks:
/// 1. Epsilon (index 0) -- the reserved `eps` label
/// 2. Terminals -- in alphabet order
/// 3. Nonterminals -- in box declaration order, starting at
///    `first_nonterminal`
///
/// The block layout lets the engine index per-label and per-box tables
/// directly by symbol.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: Vec<String>,
    index: HashMap<String, Symbol>,
    first_nonterminal: Symbol,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table holding only the epsilon label.
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(EPSILON.to_string(), EPSILON_SYMBOL);
        Self {
            names: vec![EPSILON.to_string()],
            index,
            first_nonterminal: 1,
        }
    }

    /// Add a terminal. Returns `None` if the name is already taken.
    ///
    /// Terminals must all be added before the first nonterminal.
    pub fn add_terminal(&mut self, name: &str) -> Option<Symbol> {
        debug_assert_eq!(
            self.first_nonterminal as usize,
            self.names.len(),
            "terminals must precede nonterminals"
        );
        let symbol = self.push(name)?;
        self.first_nonterminal = symbol + 1;
        Some(symbol)
    }

    /// Add a nonterminal. Returns `None` if the name is already taken.
    pub fn add_nonterminal(&mut self, name: &str) -> Option<Symbol> {
        self.push(name)
    }

    fn push(&mut self, name: &str) -> Option<Symbol> {
        if self.index.contains_key(name) {
            return None;
        }
        let symbol = self.names.len() as Symbol;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), symbol);
        Some(symbol)
    }

    /// Look up a label by name.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.index.get(name).copied()
    }

    /// Name of a symbol. Panics if `symbol` was not issued by this table.
    pub fn name(&self, symbol: Symbol) -> &str {
        &self.names[symbol as usize]
    }

    pub fn kind(&self, symbol: Symbol) -> SymbolKind {
        if symbol == EPSILON_SYMBOL {
            SymbolKind::Epsilon
        } else if symbol < self.first_nonterminal {
            SymbolKind::Terminal
        } else {
            SymbolKind::Nonterminal
        }
    }

    /// Number of symbols, epsilon included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: epsilon is always present.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Terminal symbols, in alphabet order.
    pub fn terminals(&self) -> Range<Symbol> {
        1..self.first_nonterminal
    }

    /// Nonterminal symbols, in declaration order.
    pub fn nonterminals(&self) -> Range<Symbol> {
        self.first_nonterminal..self.names.len() as Symbol
    }

    /// Position of a nonterminal in declaration order.
    pub fn nonterminal_index(&self, symbol: Symbol) -> Option<usize> {
        self.nonterminals()
            .contains(&symbol)
            .then(|| (symbol - self.first_nonterminal) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(terminals: &[&str], nonterminals: &[&str]) -> SymbolTable {
        let mut t = SymbolTable::new();
        for name in terminals {
            t.add_terminal(name).unwrap();
        }
        for name in nonterminals {
            t.add_nonterminal(name).unwrap();
        }
        t
    }

    #[test]
    fn block_layout() {
        let t = table(&["a", "b"], &["S", "T"]);
        assert_eq!(t.len(), 5);
        assert_eq!(t.lookup("eps"), Some(EPSILON_SYMBOL));
        assert_eq!(t.lookup("a"), Some(1));
        assert_eq!(t.lookup("b"), Some(2));
        assert_eq!(t.lookup("S"), Some(3));
        assert_eq!(t.lookup("T"), Some(4));
        assert_eq!(t.terminals(), 1..3);
        assert_eq!(t.nonterminals(), 3..5);
    }

    #[test]
    fn kinds() {
        let t = table(&["a"], &["S"]);
        assert_eq!(t.kind(0), SymbolKind::Epsilon);
        assert_eq!(t.kind(1), SymbolKind::Terminal);
        assert_eq!(t.kind(2), SymbolKind::Nonterminal);
    }

    #[test]
    fn names_round_trip() {
        let t = table(&["open", "close"], &["Expr"]);
        for symbol in 0..t.len() as Symbol {
            assert_eq!(t.lookup(t.name(symbol)), Some(symbol));
        }
    }

    #[test]
    fn reject_duplicates_and_reserved() {
        let mut t = SymbolTable::new();
        assert!(t.add_terminal("a").is_some());
        assert!(t.add_terminal("a").is_none());
        assert!(t.add_terminal("eps").is_none());
        assert!(t.add_nonterminal("a").is_none());
        assert!(t.add_nonterminal("S").is_some());
        assert!(t.add_nonterminal("S").is_none());
    }

    #[test]
    fn nonterminal_index() {
        let t = table(&["a", "b"], &["S", "T"]);
        assert_eq!(t.nonterminal_index(3), Some(0));
        assert_eq!(t.nonterminal_index(4), Some(1));
        assert_eq!(t.nonterminal_index(1), None);
        assert_eq!(t.nonterminal_index(9), None);
    }

    #[test]
    fn no_terminals() {
        let t = table(&[], &["S"]);
        assert!(t.terminals().is_empty());
        assert_eq!(t.lookup("S"), Some(1));
        assert_eq!(t.kind(1), SymbolKind::Nonterminal);
    }
}
