// Union-find over the product space, with call summarization on union.

use cfpq_rsm::RecursiveStateMachine;

use crate::product::ProductSpace;
use crate::queue::{EdgeSink, Unite};

/// Disjoint-set union over the `N * V` product vertices.
///
/// Each product vertex `(s, v)` starts as a singleton. Besides parent and
/// rank, every set carries two marker lists:
///
/// - `initial`: product ids `(q0, v)` where `q0` is the initial state of some
///   box, i.e. "a call to that box started at vertex `v`";
/// - `finals`: product ids `(qf, v)` where `qf` is a final state of some box,
///   i.e. "a call can end at vertex `v`".
///
/// Marker lists are only meaningful at roots. When two sets merge, every
/// initial marker of one side is paired with every final marker of the other
/// (in both directions) and a nonterminal edge is emitted at each call site
/// of the initial marker's box. A vertex that starts with both markers is
/// paired by [`summarize_nullable`](Self::summarize_nullable).
///
/// Pairing markers across sets ignores which box the final marker belongs
/// to; the engine relies on the queue only ever connecting positions that
/// are reachable from one another within a box.
pub struct DisjointSetUnion<'a> {
    rsm: &'a RecursiveStateMachine,
    space: ProductSpace,
    parent: Vec<usize>,
    rank: Vec<u32>,
    initial: Vec<Vec<usize>>,
    finals: Vec<Vec<usize>>,
}

impl<'a> DisjointSetUnion<'a> {
    /// Singleton sets for every product vertex, with markers seeded from
    /// each box's initial and final states at every graph vertex.
    pub fn new(rsm: &'a RecursiveStateMachine, space: ProductSpace) -> Self {
        let size = space.size();
        let mut initial = vec![Vec::new(); size];
        let mut finals = vec![Vec::new(); size];
        for b in rsm.boxes() {
            for vertex in 0..space.graph_size() {
                let id = space.encode(b.initial_state(), vertex);
                initial[id].push(id);
                for &state in b.final_states() {
                    let id = space.encode(state, vertex);
                    finals[id].push(id);
                }
            }
        }
        Self {
            rsm,
            space,
            parent: (0..size).collect(),
            rank: vec![0; size],
            initial,
            finals,
        }
    }

    /// Number of product vertices.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set, compressing the path to it.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Initial markers of `x`'s set.
    pub fn initial_markers(&mut self, x: usize) -> &[usize] {
        let root = self.find(x);
        &self.initial[root]
    }

    /// Final markers of `x`'s set.
    pub fn final_markers(&mut self, x: usize) -> &[usize] {
        let root = self.find(x);
        &self.finals[root]
    }

    /// Emit the summaries of boxes whose initial state is also final.
    ///
    /// Such a box derives the empty word at every vertex, but its initial and
    /// final markers start in the same singleton set, so no union would ever
    /// pair them. Call this once, before any union. Returns the number of
    /// product vertices summarized.
    pub fn summarize_nullable<S: EdgeSink>(&self, sink: &mut S) -> usize {
        let mut summarized = 0;
        for b in self.rsm.boxes() {
            if !b.is_final(b.initial_state()) {
                continue;
            }
            for vertex in 0..self.space.graph_size() {
                let id = self.space.encode(b.initial_state(), vertex);
                debug_assert_eq!(self.parent[id], id);
                self.summarize(id, id, sink);
                summarized += 1;
            }
        }
        summarized
    }

    /// Emit a summary edge for every (initial marker of `source`, final
    /// marker of `target`, call site) triple. Both arguments must be roots.
    fn summarize<S: EdgeSink>(&self, source: usize, target: usize, sink: &mut S) {
        if self.finals[target].is_empty() {
            return;
        }
        for &marker in &self.initial[source] {
            let (state, from_vertex) = self.space.decode(marker);
            let nonterminal = self.rsm.box_id_from_state(state);
            let call_sites = self.rsm.edges_by_nonterminal(nonterminal);
            if call_sites.is_empty() {
                continue;
            }
            for &end in &self.finals[target] {
                let to_vertex = self.space.vertex_of(end);
                tracing::trace!(nonterminal, from_vertex, to_vertex, "summary");
                for &(call_from, call_to) in call_sites {
                    sink.add_edge(
                        self.space.encode(call_from, from_vertex),
                        self.space.encode(call_to, to_vertex),
                        nonterminal,
                    );
                }
            }
        }
    }
}

impl Unite for DisjointSetUnion<'_> {
    fn unite<S: EdgeSink>(&mut self, v: usize, u: usize, sink: &mut S) -> bool {
        let mut v = self.find(v);
        let mut u = self.find(u);
        if v == u {
            return false;
        }
        // `v` becomes the root.
        if self.rank[v] < self.rank[u] {
            std::mem::swap(&mut v, &mut u);
        }

        self.summarize(u, v, sink);
        self.summarize(v, u, sink);

        let absorbed = std::mem::take(&mut self.initial[u]);
        self.initial[v].extend(absorbed);
        let absorbed = std::mem::take(&mut self.finals[u]);
        self.finals[v].extend(absorbed);

        self.rank[v] = self.rank[v].max(self.rank[u] + 1);
        self.parent[u] = v;
        true
    }
}
