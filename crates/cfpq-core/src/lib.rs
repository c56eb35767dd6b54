//! Shared storage types for context-free path querying.
//!
//! This crate provides the boolean-relation layer the CFPQ engine runs on:
//! a sparse relation over a fixed vertex domain, and a labeled graph that
//! maps each edge label to one such relation.
//!
//! # Architecture
//!
//! - [`relation`] -- The [`Relation`](relation::Relation) contract and its
//!   hash-set backed [`SparseRelation`](relation::SparseRelation), including
//!   the Kronecker product
//! - [`graph`] -- [`LabelGraph`](graph::LabelGraph) and its plain-text edge
//!   list format

use std::path::PathBuf;

pub mod graph;
pub mod relation;

/// Error type for graph loading.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: vertex {vertex} is outside a graph of {size} vertices")]
    VertexOutOfRange {
        line: usize,
        vertex: usize,
        size: usize,
    },
}
