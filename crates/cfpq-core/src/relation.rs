// Boolean relations over a fixed vertex domain.

use hashbrown::HashSet;

/// A boolean relation over the vertex domain `[0, size)`.
///
/// This is the whole contract the CFPQ engine needs from its storage layer:
/// point query and set, a count of true pairs, iteration over true pairs, and
/// the Kronecker product. A pair, once set, is never unset.
pub trait Relation {
    /// Number of vertices in the domain.
    fn size(&self) -> usize;

    /// Whether `(u, v)` is in the relation.
    fn contains(&self, u: usize, v: usize) -> bool;

    /// Add `(u, v)` to the relation. Setting an existing pair is a no-op.
    fn set(&mut self, u: usize, v: usize);

    /// Number of true pairs.
    fn nvals(&self) -> usize;

    /// Iterate over the true pairs in unspecified order.
    fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_;

    /// Kronecker (tensor) product `self ⊗ other`.
    ///
    /// The result lives over a domain of `self.size() * other.size()`
    /// vertices, with
    ///
    /// ```text
    /// C[i, j] = A[i / |B|, j / |B|] && B[i % |B|, j % |B|]
    /// ```
    ///
    /// Only true pairs of the operands are visited, so the cost is
    /// `nvals(A) * nvals(B)` rather than the square of the product domain.
    fn kronecker(&self, other: &impl Relation) -> SparseRelation {
        let inner = other.size();
        let mut product = SparseRelation::new(self.size() * inner);
        product.pairs.reserve(self.nvals() * other.nvals());
        for (i, j) in self.pairs() {
            for (k, l) in other.pairs() {
                product.pairs.insert((i * inner + k, j * inner + l));
            }
        }
        product
    }
}

/// Hash-set backed [`Relation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseRelation {
    size: usize,
    pairs: HashSet<(usize, usize)>,
}

impl SparseRelation {
    /// Create an empty relation over `[0, size)`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            pairs: HashSet::new(),
        }
    }

    /// Add `(u, v)`, returning `true` if the pair was not present before.
    pub fn insert(&mut self, u: usize, v: usize) -> bool {
        debug_assert!(
            u < self.size && v < self.size,
            "pair ({u}, {v}) outside a domain of {} vertices",
            self.size
        );
        self.pairs.insert((u, v))
    }

    /// True pairs in ascending `(u, v)` order.
    pub fn sorted_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = self.pairs.iter().copied().collect();
        pairs.sort_unstable();
        pairs
    }

    /// Set every pair of `other` in `self`.
    pub fn union_with(&mut self, other: &SparseRelation) {
        debug_assert_eq!(self.size, other.size);
        self.pairs.extend(other.pairs.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Relation for SparseRelation {
    fn size(&self) -> usize {
        self.size
    }

    fn contains(&self, u: usize, v: usize) -> bool {
        self.pairs.contains(&(u, v))
    }

    fn set(&mut self, u: usize, v: usize) {
        self.insert(u, v);
    }

    fn nvals(&self) -> usize {
        self.pairs.len()
    }

    fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(size: usize, pairs: &[(usize, usize)]) -> SparseRelation {
        let mut r = SparseRelation::new(size);
        for &(u, v) in pairs {
            r.set(u, v);
        }
        r
    }

    #[test]
    fn set_is_idempotent() {
        let mut r = SparseRelation::new(3);
        assert!(r.insert(0, 2));
        assert!(!r.insert(0, 2));
        r.set(0, 2);
        assert_eq!(r.nvals(), 1);
        assert!(r.contains(0, 2));
        assert!(!r.contains(2, 0));
    }

    #[test]
    fn sorted_pairs_are_ascending() {
        let r = relation(4, &[(3, 1), (0, 2), (1, 1), (0, 1)]);
        assert_eq!(r.sorted_pairs(), vec![(0, 1), (0, 2), (1, 1), (3, 1)]);
    }

    #[test]
    fn kronecker_matches_definition() {
        let a = relation(3, &[(0, 1), (2, 2), (1, 0)]);
        let b = relation(4, &[(0, 3), (1, 1), (3, 0)]);
        let c = a.kronecker(&b);

        assert_eq!(c.size(), 12);
        assert_eq!(c.nvals(), a.nvals() * b.nvals());
        for i in 0..12 {
            for j in 0..12 {
                let expected = a.contains(i / 4, j / 4) && b.contains(i % 4, j % 4);
                assert_eq!(c.contains(i, j), expected, "mismatch at ({i}, {j})");
            }
        }
    }

    #[test]
    fn kronecker_with_empty_operand() {
        let a = relation(2, &[(0, 1)]);
        let b = SparseRelation::new(5);
        let c = a.kronecker(&b);
        assert_eq!(c.size(), 10);
        assert!(c.is_empty());
    }

    #[test]
    fn union_with_merges_pairs() {
        let mut a = relation(3, &[(0, 1)]);
        let b = relation(3, &[(0, 1), (2, 0)]);
        a.union_with(&b);
        assert_eq!(a.sorted_pairs(), vec![(0, 1), (2, 0)]);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = relation(3, &[(0, 1), (1, 2)]);
        let b = relation(3, &[(1, 2), (0, 1)]);
        assert_eq!(a, b);
        assert_ne!(a, relation(4, &[(0, 1), (1, 2)]));
    }
}
