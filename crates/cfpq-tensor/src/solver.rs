// Solver: seed the queue, drain it through the union-find, build the closure.

use std::path::Path;

use cfpq_core::graph::LabelGraph;
use cfpq_core::relation::{Relation, SparseRelation};
use cfpq_rsm::RecursiveStateMachine;

use crate::SolveError;
use crate::dsu::DisjointSetUnion;
use crate::product::ProductSpace;
use crate::queue::{EdgeQueue, EdgeSink};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Order in which seed edges enter the queue.
///
/// The closure does not depend on it; it only changes the order in which
/// unions and summaries happen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedOrder {
    /// Terminals in alphabet order, pairs ascending, then epsilon seeds,
    /// then the summaries of nullable boxes.
    #[default]
    Forward,
    /// The forward order, reversed.
    Reversed,
}

/// Options for a [`TensorSolver`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub seed_order: SeedOrder,
    /// Start the closure from a copy of the input graph. When `false`, the
    /// closure holds only terminal pairs matched by some RSM transition plus
    /// the derived nonterminal pairs.
    pub keep_input_edges: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed_order: SeedOrder::Forward,
            keep_input_edges: true,
        }
    }
}

impl SolverConfig {
    pub fn with_seed_order(mut self, seed_order: SeedOrder) -> Self {
        self.seed_order = seed_order;
        self
    }

    pub fn with_input_edges(mut self, keep: bool) -> Self {
        self.keep_input_edges = keep;
        self
    }
}

/// Counters from one [`TensorSolver::solve_with_stats`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Product vertices, `N * V`.
    pub product_size: usize,
    /// Seed edges: terminal matches, epsilon seeds and the call-site
    /// summaries of boxes that accept the empty word at their initial state.
    pub seeds: usize,
    /// Queue entries processed, seeds included.
    pub processed: usize,
    /// Entries that merged two union-find sets.
    pub unions: usize,
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// CFPQ engine over one graph and one grammar.
///
/// ```
/// use cfpq_core::graph::LabelGraph;
/// use cfpq_rsm::RecursiveStateMachine;
/// use cfpq_tensor::TensorSolver;
///
/// let rsm = RecursiveStateMachine::parse(
///     "a b\nS\n4\n0 1 2 3\n0\n3\n4\n0 1 a\n1 2 S\n1 3 b\n2 3 b\n",
/// ).unwrap();
/// let graph = LabelGraph::parse("0 a 1\n1 b 2\n").unwrap();
///
/// let closure = TensorSolver::new(graph, rsm).solve();
/// assert!(closure.contains("S", 0, 2));
/// assert_eq!(closure.nvals("S"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TensorSolver {
    graph: LabelGraph,
    rsm: RecursiveStateMachine,
    config: SolverConfig,
}

impl TensorSolver {
    pub fn new(graph: LabelGraph, rsm: RecursiveStateMachine) -> Self {
        Self {
            graph,
            rsm,
            config: SolverConfig::default(),
        }
    }

    /// Load a graph edge list and a grammar file.
    pub fn from_files(
        graph_path: impl AsRef<Path>,
        grammar_path: impl AsRef<Path>,
    ) -> Result<Self, SolveError> {
        let graph = LabelGraph::from_txt(graph_path)?;
        let rsm = RecursiveStateMachine::from_file(grammar_path)?;
        Ok(Self::new(graph, rsm))
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn graph(&self) -> &LabelGraph {
        &self.graph
    }

    pub fn rsm(&self) -> &RecursiveStateMachine {
        &self.rsm
    }

    /// Compute the closure: the input graph (per config) plus, for every
    /// nonterminal `X`, every pair `(u, v)` such that some path from `u` to
    /// `v` spells a word derivable from `X`.
    ///
    /// Every nonterminal has a relation in the result, possibly empty.
    /// The input is not modified and repeated calls give equal results.
    pub fn solve(&self) -> LabelGraph {
        self.solve_with_stats().0
    }

    /// [`solve`](Self::solve), also returning run counters.
    pub fn solve_with_stats(&self) -> (LabelGraph, SolveStats) {
        let graph_size = self.graph.size();
        let space = ProductSpace::new(self.rsm.states_number(), graph_size);
        let mut closure = self.initial_closure();
        let mut stats = SolveStats {
            product_size: space.size(),
            ..SolveStats::default()
        };
        if space.size() == 0 {
            return (closure, stats);
        }

        let mut dsu = DisjointSetUnion::new(&self.rsm, space);
        let mut queue = EdgeQueue::new();
        let (terminal_seeds, eps_seeds) = self.seed(space, &mut queue);
        let nullable_vertices = dsu.summarize_nullable(&mut queue);
        if self.config.seed_order == SeedOrder::Reversed {
            queue.reverse_pending();
        }
        stats.seeds = queue.len();
        tracing::debug!(
            states = space.states_number(),
            vertices = graph_size,
            terminal_seeds,
            eps_seeds,
            nullable_vertices,
            "seeded queue"
        );

        let mut derived = vec![SparseRelation::new(graph_size); self.rsm.symbols().len()];
        let drained = queue.drain(space, &mut dsu, &mut derived);
        stats.processed = drained.processed;
        stats.unions = drained.unions;
        tracing::debug!(
            processed = stats.processed,
            unions = stats.unions,
            "queue drained"
        );

        for (symbol, relation) in (0..).zip(&derived) {
            if !relation.is_empty() {
                closure.merge_relation(self.rsm.symbols().name(symbol), relation);
            }
        }
        (closure, stats)
    }

    fn initial_closure(&self) -> LabelGraph {
        let mut closure = if self.config.keep_input_edges {
            self.graph.clone()
        } else {
            LabelGraph::new(self.graph.size())
        };
        for nonterminal in self.rsm.nonterminals() {
            closure.relation_mut(self.rsm.symbols().name(nonterminal));
        }
        closure
    }

    /// Push every terminal match and every epsilon seed, in forward order.
    /// Returns the number of each.
    ///
    /// A terminal match is a true pair of `R[t] ⊗ G[t]`, i.e. an RSM
    /// transition `s -t-> s'` next to a graph edge `u -t-> v`, encoded as
    /// the product edge `(s, u) -> (s', v)`.
    fn seed<S: EdgeSink>(&self, space: ProductSpace, sink: &mut S) -> (usize, usize) {
        let rsm_relation = self.rsm.to_relation();
        let mut terminal_seeds = 0;
        for terminal in self.rsm.alphabet() {
            let name = self.rsm.symbols().name(terminal);
            let (Some(transitions), Some(edges)) = (rsm_relation.get(name), self.graph.get(name))
            else {
                continue;
            };
            let product = transitions.kronecker(edges);
            tracing::trace!(terminal = name, matches = product.nvals(), "kronecker");
            for (start, end) in product.sorted_pairs() {
                sink.add_edge(start, end, terminal);
            }
            terminal_seeds += product.nvals();
        }
        let eps_productions = self.rsm.eps_productions();
        for eps in &eps_productions {
            for vertex in 0..space.graph_size() {
                sink.add_edge(
                    space.encode(eps.initial_state, vertex),
                    space.encode(eps.final_state, vertex),
                    eps.nonterminal,
                );
            }
        }
        (terminal_seeds, eps_productions.len() * space.graph_size())
    }
}
