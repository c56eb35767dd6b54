// Recursive State Machine: boxes, state ownership and the global edge index.

use std::path::Path;

use cfpq_core::graph::LabelGraph;

use crate::boxes::RsmBox;
use crate::format;
use crate::symbols::{EPSILON_SYMBOL, Symbol, SymbolTable};
use crate::{Edge, FormatError, RsmError, StateId};

/// An epsilon transition, i.e. a nonterminal that derives the empty word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpsProduction {
    pub initial_state: StateId,
    pub final_state: StateId,
    pub nonterminal: Symbol,
}

/// A grammar as a set of boxes over a shared state space `[0, N)`.
///
/// Built once (normally by [`RecursiveStateMachine::parse`]) and immutable
/// afterwards. Every state belongs to exactly one box; the per-label edge
/// index is the concatenation, in box order, of every box's transitions for
/// that label.
#[derive(Debug, Clone)]
pub struct RecursiveStateMachine {
    symbols: SymbolTable,
    states_number: usize,
    /// Boxes in nonterminal declaration order.
    boxes: Vec<RsmBox>,
    /// Owning nonterminal of each state.
    state_to_box: Vec<Symbol>,
    /// All transitions of each label, indexed by symbol.
    label_to_edges: Vec<Vec<Edge>>,
}

impl RecursiveStateMachine {
    /// Assemble an RSM from validated parts.
    ///
    /// `state_to_box` must assign an owner to every state in
    /// `[0, states_number)`; the parser guarantees it.
    pub(crate) fn new(
        symbols: SymbolTable,
        states_number: usize,
        boxes: Vec<RsmBox>,
        state_to_box: Vec<Symbol>,
    ) -> Self {
        debug_assert_eq!(state_to_box.len(), states_number);
        let mut label_to_edges = vec![Vec::new(); symbols.len()];
        for b in &boxes {
            for (label, edges) in b.labeled_edges() {
                label_to_edges[label as usize].extend_from_slice(edges);
            }
        }
        Self {
            symbols,
            states_number,
            boxes,
            state_to_box,
            label_to_edges,
        }
    }

    /// Parse a grammar from its text form. See [`crate::format`].
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        format::parse_grammar(text)
    }

    /// Read and parse a grammar file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Total number of automaton states, N.
    pub fn states_number(&self) -> usize {
        self.states_number
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Look up a label by name.
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        self.symbols.lookup(name)
    }

    /// Terminal symbols, in alphabet order.
    pub fn alphabet(&self) -> impl Iterator<Item = Symbol> {
        self.symbols.terminals()
    }

    /// Nonterminal symbols, in box order.
    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> {
        self.symbols.nonterminals()
    }

    /// Boxes in declaration order.
    pub fn boxes(&self) -> &[RsmBox] {
        &self.boxes
    }

    /// Nonterminal owning `state`. Panics if `state >= N`.
    pub fn box_id_from_state(&self, state: StateId) -> Symbol {
        self.state_to_box[state]
    }

    /// Name of the nonterminal owning `state`. Panics if `state >= N`.
    pub fn box_name_from_state(&self, state: StateId) -> &str {
        self.symbols.name(self.box_id_from_state(state))
    }

    /// Box of a nonterminal symbol, or `None` if `nonterminal` is not one.
    pub fn box_by_symbol(&self, nonterminal: Symbol) -> Option<&RsmBox> {
        self.symbols
            .nonterminal_index(nonterminal)
            .map(|idx| &self.boxes[idx])
    }

    /// Box of a nonterminal, by name.
    pub fn box_from_box_id(&self, nonterminal: &str) -> Result<&RsmBox, RsmError> {
        self.symbol(nonterminal)
            .and_then(|symbol| self.box_by_symbol(symbol))
            .ok_or_else(|| RsmError::UnknownNonterminal(nonterminal.to_string()))
    }

    /// Every transition in the RSM carrying `label`: box order, then
    /// declaration order within a box.
    ///
    /// For a nonterminal label these are the call sites of that nonterminal.
    pub fn edges_by_nonterminal(&self, label: Symbol) -> &[Edge] {
        self.label_to_edges
            .get(label as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// [`edges_by_nonterminal`](Self::edges_by_nonterminal), by label name.
    pub fn edges_by_label(&self, label: &str) -> Result<&[Edge], RsmError> {
        self.symbol(label)
            .map(|symbol| self.edges_by_nonterminal(symbol))
            .ok_or_else(|| RsmError::UnknownLabel(label.to_string()))
    }

    /// One entry per epsilon transition, in box order then declaration order.
    pub fn eps_productions(&self) -> Vec<EpsProduction> {
        self.boxes
            .iter()
            .flat_map(|b| {
                b.edges(EPSILON_SYMBOL)
                    .iter()
                    .map(move |&(initial_state, final_state)| EpsProduction {
                        initial_state,
                        final_state,
                        nonterminal: b.nonterminal(),
                    })
            })
            .collect()
    }

    /// Project the RSM onto a relation over its own state space.
    ///
    /// `(v, to)` is set under label `L` iff some box has a transition
    /// `v -L-> to`. Epsilon transitions appear under `eps`.
    pub fn to_relation(&self) -> LabelGraph {
        let mut graph = LabelGraph::new(self.states_number);
        for b in &self.boxes {
            for (label, edges) in b.labeled_edges() {
                let relation = graph.relation_mut(self.symbols.name(label));
                for &(v, to) in edges {
                    relation.insert(v, to);
                }
            }
        }
        graph
    }
}
