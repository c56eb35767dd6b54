//! Recursive State Machines for context-free path querying.
//!
//! An RSM represents a context-free grammar as a set of finite automata
//! ("boxes"), one per nonterminal. Box transitions are labeled by terminals,
//! by nonterminals (a call into another box) or by the empty word. All
//! states of all boxes share one global numbering `[0, N)`.
//!
//! # Architecture
//!
//! - [`symbols`] -- Label interning (epsilon, terminals, nonterminals)
//! - [`boxes`] -- A single nonterminal's automaton
//! - [`machine`] -- The whole RSM: state ownership, per-label edge index,
//!   epsilon productions, projection to a relation
//! - [`format`] -- Line-oriented grammar text format and its validation

pub mod boxes;
pub mod format;
pub mod machine;
pub mod symbols;

pub use boxes::RsmBox;
pub use machine::{EpsProduction, RecursiveStateMachine};
pub use symbols::{Symbol, SymbolKind, SymbolTable};

/// Reserved label for the empty word.
pub const EPSILON: &str = "eps";

/// Global automaton state id, in `[0, N)`.
pub type StateId = usize;

/// A transition `(from, to)`; the label is implied by where it is stored.
pub type Edge = (StateId, StateId);

/// Error type for grammar parsing and validation.
///
/// Every variant is fatal: a grammar that fails validation is rejected as a
/// whole. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to read grammar: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },
    #[error("line {line}: invalid integer `{token}`")]
    InvalidInteger { line: usize, token: String },
    #[error("line {line}: state {state} is outside [0, {states_number})")]
    StateOutOfRange {
        line: usize,
        state: usize,
        states_number: usize,
    },
    #[error("line {line}: unknown label `{label}`")]
    UnknownLabel { line: usize, label: String },
    #[error("line {line}: epsilon transition {from} -> {to} must go from the initial state to a final state")]
    MisplacedEpsilon { line: usize, from: StateId, to: StateId },
    #[error("line {line}: expected `<from> <to> <label>`, got `{content}`")]
    MalformedTransition { line: usize, content: String },
    #[error("line {line}: symbol `{symbol}` is declared more than once or is reserved")]
    DuplicateSymbol { line: usize, symbol: String },
    #[error("line {line}: state {state} already belongs to another box")]
    StateClaimedTwice { line: usize, state: StateId },
    #[error("line {line}: state {state} is not one of the box's states")]
    StateOutsideBox { line: usize, state: StateId },
    #[error("state {state} does not belong to any box")]
    UnownedState { state: StateId },
    #[error("line {line}: unexpected content after the last box")]
    TrailingContent { line: usize },
}

/// Lookup failure on an already-built RSM.
#[derive(Debug, thiserror::Error)]
pub enum RsmError {
    #[error("unknown nonterminal `{0}`")]
    UnknownNonterminal(String),
    #[error("unknown label `{0}`")]
    UnknownLabel(String),
}
