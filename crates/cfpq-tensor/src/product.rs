// Product space: (automaton state, graph vertex) <-> packed id.

use cfpq_rsm::StateId;

/// The product of the RSM state space `[0, N)` and the graph vertex set
/// `[0, V)`, packed as `id = state * V + vertex`.
///
/// This is the same row/column decomposition the Kronecker product of an
/// `N`-state relation with a `V`-vertex relation uses, so product ids can be
/// read straight off a Kronecker product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSpace {
    states_number: usize,
    graph_size: usize,
}

impl ProductSpace {
    pub fn new(states_number: usize, graph_size: usize) -> Self {
        Self {
            states_number,
            graph_size,
        }
    }

    pub fn states_number(&self) -> usize {
        self.states_number
    }

    pub fn graph_size(&self) -> usize {
        self.graph_size
    }

    /// Number of product vertices, `N * V`.
    pub fn size(&self) -> usize {
        self.states_number * self.graph_size
    }

    #[inline]
    pub fn encode(&self, state: StateId, vertex: usize) -> usize {
        debug_assert!(state < self.states_number && vertex < self.graph_size);
        state * self.graph_size + vertex
    }

    /// `(state, vertex)` of a product id.
    #[inline]
    pub fn decode(&self, id: usize) -> (StateId, usize) {
        (id / self.graph_size, id % self.graph_size)
    }

    #[inline]
    pub fn state_of(&self, id: usize) -> StateId {
        id / self.graph_size
    }

    #[inline]
    pub fn vertex_of(&self, id: usize) -> usize {
        id % self.graph_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_examples() {
        let space = ProductSpace::new(4, 5);
        assert_eq!(space.size(), 20);
        assert_eq!(space.encode(0, 0), 0);
        assert_eq!(space.encode(0, 4), 4);
        assert_eq!(space.encode(1, 0), 5);
        assert_eq!(space.encode(3, 4), 19);
    }

    #[test]
    fn encoding_is_a_bijection() {
        let space = ProductSpace::new(3, 7);
        let mut seen = vec![false; space.size()];
        for state in 0..3 {
            for vertex in 0..7 {
                let id = space.encode(state, vertex);
                assert!(!seen[id]);
                seen[id] = true;
                assert_eq!(space.decode(id), (state, vertex));
                assert_eq!(space.state_of(id), state);
                assert_eq!(space.vertex_of(id), vertex);
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn single_vertex_graph() {
        let space = ProductSpace::new(4, 1);
        for state in 0..4 {
            assert_eq!(space.encode(state, 0), state);
            assert_eq!(space.decode(state), (state, 0));
        }
    }
}
