// Labeled graph: one boolean relation per edge label over a shared vertex set.

use std::path::Path;

use hashbrown::HashMap;

use crate::GraphError;
use crate::relation::{Relation, SparseRelation};

/// A directed, edge-labeled graph over vertices `[0, size)`.
///
/// Each label owns a [`SparseRelation`]; labels without edges are simply
/// absent. Query methods treat an absent label as an empty relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelGraph {
    size: usize,
    relations: HashMap<String, SparseRelation>,
}

impl LabelGraph {
    /// Create a graph with `size` vertices and no edges.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            relations: HashMap::new(),
        }
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The relation for `label`, if any edge carries it.
    pub fn get(&self, label: &str) -> Option<&SparseRelation> {
        self.relations.get(label)
    }

    /// The relation for `label`, created empty if absent.
    pub fn relation_mut(&mut self, label: &str) -> &mut SparseRelation {
        let size = self.size;
        self.relations
            .entry(label.to_owned())
            .or_insert_with(|| SparseRelation::new(size))
    }

    /// Add the edge `u -label-> v`, returning `true` if it is new.
    pub fn set(&mut self, label: &str, u: usize, v: usize) -> bool {
        self.relation_mut(label).insert(u, v)
    }

    pub fn contains(&self, label: &str, u: usize, v: usize) -> bool {
        self.get(label).is_some_and(|r| r.contains(u, v))
    }

    /// Number of edges carrying `label`.
    pub fn nvals(&self, label: &str) -> usize {
        self.get(label).map_or(0, Relation::nvals)
    }

    /// Total number of edges over all labels.
    pub fn edge_count(&self) -> usize {
        self.relations.values().map(Relation::nvals).sum()
    }

    /// All labels present in the graph, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.relations.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Merge `relation` into the relation stored under `label`.
    pub fn merge_relation(&mut self, label: &str, relation: &SparseRelation) {
        debug_assert_eq!(relation.size(), self.size);
        self.relation_mut(label).union_with(relation);
    }

    /// Read a graph from an edge-list file. See [`LabelGraph::parse`].
    pub fn from_txt(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse an edge list with one `<from> <label> <to>` triple per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. The vertex count
    /// is one more than the largest vertex index mentioned.
    pub fn parse(text: &str) -> Result<Self, GraphError> {
        let edges = parse_edges(text)?;
        let size = edges
            .iter()
            .map(|e| e.from.max(e.to) + 1)
            .max()
            .unwrap_or(0);
        Ok(Self::from_edges(size, &edges))
    }

    /// Parse an edge list over a fixed number of vertices.
    ///
    /// Fails if any edge mentions a vertex outside `[0, size)`.
    pub fn parse_with_size(text: &str, size: usize) -> Result<Self, GraphError> {
        let edges = parse_edges(text)?;
        for e in &edges {
            let vertex = e.from.max(e.to);
            if vertex >= size {
                return Err(GraphError::VertexOutOfRange {
                    line: e.line,
                    vertex,
                    size,
                });
            }
        }
        Ok(Self::from_edges(size, &edges))
    }

    fn from_edges(size: usize, edges: &[EdgeLine<'_>]) -> Self {
        let mut graph = Self::new(size);
        for e in edges {
            graph.set(e.label, e.from, e.to);
        }
        graph
    }
}

struct EdgeLine<'a> {
    line: usize,
    from: usize,
    label: &'a str,
    to: usize,
}

fn parse_edges(text: &str) -> Result<Vec<EdgeLine<'_>>, GraphError> {
    let mut edges = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let [from, label, to] = tokens[..] else {
            return Err(GraphError::Parse {
                line,
                message: format!("expected `<from> <label> <to>`, got `{trimmed}`"),
            });
        };
        edges.push(EdgeLine {
            line,
            from: parse_vertex(from, line)?,
            label,
            to: parse_vertex(to, line)?,
        });
    }
    Ok(edges)
}

fn parse_vertex(token: &str, line: usize) -> Result<usize, GraphError> {
    token.parse().map_err(|_| GraphError::Parse {
        line,
        message: format!("invalid vertex `{token}`"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_edge_list() {
        let graph = LabelGraph::parse("0 a 1\n1 b 2\n").unwrap();
        assert_eq!(graph.size(), 3);
        assert!(graph.contains("a", 0, 1));
        assert!(graph.contains("b", 1, 2));
        assert!(!graph.contains("a", 1, 2));
        assert_eq!(graph.nvals("a"), 1);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.labels(), vec!["a", "b"]);
    }

    #[test]
    fn parse_skips_blank_and_comment_lines() {
        let text = "# bamboo\n\n0 a 1\n   \n1 a 2\n";
        let graph = LabelGraph::parse(text).unwrap();
        assert_eq!(graph.size(), 3);
        assert_eq!(graph.nvals("a"), 2);
    }

    #[test]
    fn parse_empty_text() {
        let graph = LabelGraph::parse("").unwrap();
        assert_eq!(graph.size(), 0);
        assert!(graph.labels().is_empty());
    }

    #[test]
    fn duplicate_edges_collapse() {
        let graph = LabelGraph::parse("0 a 1\n0 a 1\n").unwrap();
        assert_eq!(graph.nvals("a"), 1);
    }

    #[test]
    fn reject_wrong_arity() {
        let err = LabelGraph::parse("0 a 1\n0 a\n").unwrap_err();
        assert!(matches!(err, GraphError::Parse { line: 2, .. }));
    }

    #[test]
    fn reject_bad_vertex() {
        let err = LabelGraph::parse("x a 1\n").unwrap_err();
        match err {
            GraphError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("`x`"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_with_size_keeps_isolated_vertices() {
        let graph = LabelGraph::parse_with_size("0 a 1\n", 5).unwrap();
        assert_eq!(graph.size(), 5);
        assert_eq!(graph.get("a").unwrap().size(), 5);
    }

    #[test]
    fn parse_with_size_rejects_out_of_range() {
        let err = LabelGraph::parse_with_size("0 a 1\n1 b 4\n", 4).unwrap_err();
        assert!(matches!(
            err,
            GraphError::VertexOutOfRange {
                line: 2,
                vertex: 4,
                size: 4
            }
        ));
    }

    #[test]
    fn missing_label_is_empty() {
        let graph = LabelGraph::new(2);
        assert_eq!(graph.nvals("S"), 0);
        assert!(!graph.contains("S", 0, 1));
        assert!(graph.get("S").is_none());
    }

    #[test]
    fn merge_relation_unions_pairs() {
        let mut graph = LabelGraph::parse("0 S 1\n").unwrap();
        let mut extra = SparseRelation::new(2);
        extra.set(1, 0);
        extra.set(0, 1);
        graph.merge_relation("S", &extra);
        assert_eq!(graph.nvals("S"), 2);
    }

    #[test]
    fn from_txt_reports_missing_file() {
        let err = LabelGraph::from_txt("/nonexistent/graph.txt").unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }
}
