// RSM box: one nonterminal's finite automaton.

use hashbrown::HashMap;

use crate::symbols::Symbol;
use crate::{Edge, StateId};

/// The automaton of a single nonterminal.
///
/// Transitions are grouped by label, each group keeping declaration order.
/// The only epsilon transitions a box may hold go from its initial state to
/// one of its final states (an epsilon production); the parser enforces
/// this.
#[derive(Debug, Clone)]
pub struct RsmBox {
    nonterminal: Symbol,
    states: Vec<StateId>,
    initial_state: StateId,
    final_states: Vec<StateId>,
    edges: HashMap<Symbol, Vec<Edge>>,
    /// Labels in order of their first transition, for stable iteration.
    label_order: Vec<Symbol>,
}

impl RsmBox {
    pub(crate) fn new(
        nonterminal: Symbol,
        states: Vec<StateId>,
        initial_state: StateId,
        final_states: Vec<StateId>,
    ) -> Self {
        Self {
            nonterminal,
            states,
            initial_state,
            final_states,
            edges: HashMap::new(),
            label_order: Vec::new(),
        }
    }

    pub(crate) fn add_edge(&mut self, label: Symbol, from: StateId, to: StateId) {
        let group = self.edges.entry(label).or_insert_with(|| {
            self.label_order.push(label);
            Vec::new()
        });
        group.push((from, to));
    }

    /// The nonterminal this box defines.
    pub fn nonterminal(&self) -> Symbol {
        self.nonterminal
    }

    /// States of this box, as declared.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn final_states(&self) -> &[StateId] {
        &self.final_states
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    /// Transitions carrying `label`, in declaration order.
    pub fn edges(&self, label: Symbol) -> &[Edge] {
        self.edges.get(&label).map(Vec::as_slice).unwrap_or_default()
    }

    /// `(label, transitions)` groups, ordered by each label's first use.
    pub fn labeled_edges(&self) -> impl Iterator<Item = (Symbol, &[Edge])> + '_ {
        self.label_order
            .iter()
            .map(|&label| (label, self.edges(label)))
    }

    /// Total number of transitions.
    pub fn transition_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> RsmBox {
        // S -> a S b | a b, with labels a=1, b=2, S=3
        let mut b = RsmBox::new(3, vec![0, 1, 2, 3], 0, vec![3]);
        b.add_edge(1, 0, 1);
        b.add_edge(3, 1, 2);
        b.add_edge(2, 1, 3);
        b.add_edge(2, 2, 3);
        b
    }

    #[test]
    fn edges_keep_declaration_order() {
        let b = sample_box();
        assert_eq!(b.edges(2), &[(1, 3), (2, 3)]);
        assert_eq!(b.edges(1), &[(0, 1)]);
        assert!(b.edges(0).is_empty());
        assert_eq!(b.transition_count(), 4);
    }

    #[test]
    fn labeled_edges_follow_first_use() {
        let b = sample_box();
        let labels: Vec<Symbol> = b.labeled_edges().map(|(label, _)| label).collect();
        assert_eq!(labels, vec![1, 3, 2]);
    }

    #[test]
    fn finals() {
        let b = sample_box();
        assert!(b.is_final(3));
        assert!(!b.is_final(0));
        assert_eq!(b.initial_state(), 0);
        assert_eq!(b.nonterminal(), 3);
    }
}
