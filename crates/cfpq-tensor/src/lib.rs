//! Context-free path querying over a union-find of the RSM x graph product.
//!
//! Given an edge-labeled graph and a grammar as a
//! [`RecursiveStateMachine`](cfpq_rsm::RecursiveStateMachine), the solver
//! computes, for every nonterminal, the vertex pairs connected by a
//! derivation of that nonterminal.
//!
//! The engine works on the product space of automaton states and graph
//! vertices. Seed edges (terminal matches found through a Kronecker product,
//! plus epsilon productions) go into an append-only [`EdgeQueue`]. Draining
//! the queue unites the endpoints of every edge in a [`DisjointSetUnion`];
//! whenever a union connects a box's initial position to a final position,
//! a summary edge is emitted at every call site of that box's nonterminal
//! and fed back into the queue. The run ends when the queue is exhausted.
//!
//! # Architecture
//!
//! - [`product`] -- `(state, vertex)` <-> product id encoding
//! - [`queue`] -- Edge worklist, the `EdgeSink` and `Unite` seams
//! - [`dsu`] -- Union-find with initial/final markers and summarization
//! - [`solver`] -- Seeding, draining and closure assembly

use cfpq_core::GraphError;
use cfpq_rsm::FormatError;

pub mod dsu;
pub mod product;
pub mod queue;
pub mod solver;

pub use dsu::DisjointSetUnion;
pub use product::ProductSpace;
pub use queue::{DrainStats, EdgeQueue, EdgeSink, ProductEdge, Unite};
pub use solver::{SeedOrder, SolveStats, SolverConfig, TensorSolver};

/// Error type for building a solver from its input files.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("failed to load graph: {0}")]
    Graph(#[from] GraphError),
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] FormatError),
}
