//! Disjoint-set structure that mints dendrogram labels.
//!
//! Relabeling a dendrogram walks its merge steps through this structure:
//! each union of two distinct components mints a fresh internal label,
//! starting at `observations` and increasing by one per merge, which is the
//! SciPy/MATLAB labeling convention (singletons `0..n-1`, the i-th merge
//! creates `n + i`).
//!
//! `find` applies full path compression, so repeated lookups are O(α(n)).
//! Roots carry an explicit sentinel parent rather than pointing at
//! themselves, because every non-root parent is a minted label and those are
//! only allocated as unions happen.

use crate::error::{Error, Result};

/// Sentinel parent marking a component root.
const NONE: usize = usize::MAX;

/// Label-minting union-find over `2n - 1` slots.
#[derive(Debug)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    next_label: usize,
}

impl UnionFind {
    /// Allocate for `observations` leaves plus the `observations - 1`
    /// internal labels a complete dendrogram mints.
    pub(crate) fn new(observations: usize) -> Self {
        debug_assert!(observations >= 1);
        Self {
            parent: vec![NONE; 2 * observations - 1],
            next_label: observations,
        }
    }

    /// Root of the component containing `x`, with path compression.
    pub(crate) fn find(&mut self, x: usize) -> Result<usize> {
        self.check(x)?;
        let mut root = x;
        while self.parent[root] != NONE {
            root = self.parent[root];
        }
        let mut cur = x;
        while cur != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        Ok(root)
    }

    /// Join the components of `a` and `b` under a freshly minted label and
    /// return it; `None` if they already share a root.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> Result<Option<usize>> {
        let ra = self.find(a)?;
        let rb = self.find(b)?;
        if ra == rb {
            return Ok(None);
        }
        let label = self.next_label;
        debug_assert!(label < self.parent.len());
        self.parent[ra] = label;
        self.parent[rb] = label;
        self.next_label += 1;
        Ok(Some(label))
    }

    #[inline]
    fn check(&self, x: usize) -> Result<()> {
        if x >= self.parent.len() {
            return Err(Error::IndexOutOfRange {
                index: x,
                bound: self.parent.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons_are_their_own_roots() {
        let mut uf = UnionFind::new(4);
        for i in 0..7 {
            assert_eq!(uf.find(i).unwrap(), i);
        }
    }

    #[test]
    fn test_labels_mint_from_observations_up() {
        let mut uf = UnionFind::new(5);
        assert_eq!(uf.union(1, 3).unwrap(), Some(5));
        assert_eq!(uf.union(5, 2).unwrap(), Some(6));
        assert_eq!(uf.union(0, 4).unwrap(), Some(7));
        assert_eq!(uf.union(6, 7).unwrap(), Some(8));
        for k in 0..9 {
            assert_eq!(uf.find(k).unwrap(), 8);
        }
    }

    #[test]
    fn test_union_of_same_component_is_a_noop() {
        let mut uf = UnionFind::new(3);
        assert_eq!(uf.union(0, 1).unwrap(), Some(3));
        assert_eq!(uf.union(0, 1).unwrap(), None);
        assert_eq!(uf.union(1, 3).unwrap(), None);
        // The skipped union minted nothing.
        assert_eq!(uf.union(2, 3).unwrap(), Some(4));
    }

    #[test]
    fn test_out_of_range() {
        let mut uf = UnionFind::new(3);
        assert_eq!(
            uf.find(5).unwrap_err(),
            Error::IndexOutOfRange { index: 5, bound: 5 }
        );
        assert_eq!(
            uf.union(0, 5).unwrap_err(),
            Error::IndexOutOfRange { index: 5, bound: 5 }
        );
    }

    #[test]
    fn test_path_compression_flattens() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1).unwrap(); // 4
        uf.union(4, 2).unwrap(); // 5
        uf.union(5, 3).unwrap(); // 6
        assert_eq!(uf.find(0).unwrap(), 6);
        // After compression, 0 hangs directly off the root.
        assert_eq!(uf.parent[0], 6);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn minted_labels_are_sequential(
            n in 2_usize..16,
            pairs in proptest::collection::vec((0_usize..16, 0_usize..16), 1..40),
        ) {
            let mut uf = UnionFind::new(n);
            let mut expected = n;
            for &(a, b) in &pairs {
                if a < n && b < n {
                    if let Some(label) = uf.union(a, b).unwrap() {
                        prop_assert_eq!(label, expected);
                        expected += 1;
                    }
                }
            }
        }

        #[test]
        fn find_is_stable_across_repeats(
            n in 2_usize..16,
            pairs in proptest::collection::vec((0_usize..16, 0_usize..16), 1..40),
        ) {
            let mut uf = UnionFind::new(n);
            for &(a, b) in &pairs {
                if a < n && b < n {
                    uf.union(a, b).unwrap();
                }
            }
            for x in 0..n {
                let first = uf.find(x).unwrap();
                prop_assert_eq!(uf.find(x).unwrap(), first);
            }
        }
    }
}
