// Edge worklist over the product space.

use cfpq_core::relation::SparseRelation;
use cfpq_rsm::Symbol;

use crate::product::ProductSpace;

/// A discovered reachability fact between two product vertices.
///
/// `label` is a terminal for seed edges and a nonterminal for summary edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductEdge {
    pub start: usize,
    pub end: usize,
    pub label: Symbol,
}

/// Anything that accepts new product edges.
///
/// This is the only capability the union-find gets over the queue that
/// drives it.
pub trait EdgeSink {
    fn add_edge(&mut self, start: usize, end: usize, label: Symbol);
}

impl EdgeSink for Vec<ProductEdge> {
    fn add_edge(&mut self, start: usize, end: usize, label: Symbol) {
        self.push(ProductEdge { start, end, label });
    }
}

/// Connectivity structure the queue reports drained edges to.
pub trait Unite {
    /// Merge the components of `v` and `u`, submitting any derived edges to
    /// `sink`. Returns `false` if they were already connected.
    fn unite<S: EdgeSink>(&mut self, v: usize, u: usize, sink: &mut S) -> bool;
}

/// Counters from one [`EdgeQueue::drain`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Entries taken off the queue.
    pub processed: usize,
    /// Entries whose union merged two components.
    pub unions: usize,
}

/// Append-only FIFO of product edges with a read cursor.
///
/// Entries are never removed or reordered once processed; `cursor` only
/// moves forward. Duplicates are allowed: registering a pair twice and
/// uniting an already-connected pair are both no-ops.
#[derive(Debug, Clone, Default)]
pub struct EdgeQueue {
    edges: Vec<ProductEdge>,
    cursor: usize,
}

impl EdgeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries ever appended.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of entries not yet processed.
    pub fn pending(&self) -> usize {
        self.edges.len() - self.cursor
    }

    pub fn is_drained(&self) -> bool {
        self.cursor == self.edges.len()
    }

    /// Reverse the order of the unprocessed entries.
    pub fn reverse_pending(&mut self) {
        self.edges[self.cursor..].reverse();
    }

    /// Take the next unprocessed entry.
    pub fn pop_front(&mut self) -> Option<ProductEdge> {
        let edge = self.edges.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(edge)
    }

    /// Process entries until none remain.
    ///
    /// For each entry, `(vertex(start), vertex(end))` is registered in
    /// `closure[label]`, then `uniter` is asked to unite `start` and `end`;
    /// it may append further entries, which are processed in turn.
    /// `closure` must hold one relation per symbol of the grammar, each over
    /// `space.graph_size()` vertices.
    pub fn drain<U: Unite>(
        &mut self,
        space: ProductSpace,
        uniter: &mut U,
        closure: &mut [SparseRelation],
    ) -> DrainStats {
        let mut stats = DrainStats::default();
        while let Some(edge) = self.pop_front() {
            let from = space.vertex_of(edge.start);
            let to = space.vertex_of(edge.end);
            if closure[edge.label as usize].insert(from, to) {
                tracing::trace!(label = edge.label, from, to, "registered pair");
            }
            if uniter.unite(edge.start, edge.end, self) {
                stats.unions += 1;
            }
            stats.processed += 1;
        }
        stats
    }
}

impl EdgeSink for EdgeQueue {
    fn add_edge(&mut self, start: usize, end: usize, label: Symbol) {
        self.edges.push(ProductEdge { start, end, label });
    }
}
