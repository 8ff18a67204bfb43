//! Linkage algorithms: building the dendrogram in sub-cubic time.
//!
//! Three algorithms cover the seven rules, each exploiting a different
//! structural property:
//!
//! | Algorithm | Rules | Time | Lever |
//! |-----------|-------|------|-------|
//! | [`mst`] | Single | Θ(n²) | Merges = minimum-spanning-tree edges |
//! | [`nnchain`] | Single, Complete, Average, Weighted, Ward | Θ(n²) | Reciprocal nearest neighbors are safe to merge early |
//! | [`generic`] | All seven | Θ(n²) best | Lazy nearest-neighbor cache in an indexed heap |
//!
//! [`primitive`] is the Θ(n³) textbook scan, kept as the oracle.
//!
//! [`linkage`] picks the best algorithm for the rule. Use
//! [`linkage_reuse`] to hand the matrix over instead of paying for a
//! defensive clone; the algorithms shred their working copy.
//!
//! The algorithms follow Müllner, "Modern hierarchical, agglomerative
//! clustering algorithms" (arXiv:1109.2378).

mod generic;
mod method;
mod mst;
mod nnchain;
mod primitive;

pub use generic::generic;
pub use method::Linkage;
pub use mst::mst;
pub use nnchain::nnchain;
pub use primitive::primitive;

use crate::dendrogram::Dendrogram;
use crate::error::Result;
use crate::matrix::CondensedMatrix;

/// Cluster `matrix` under `method`, leaving the caller's matrix untouched.
///
/// Returns the canonical dendrogram: labels follow the SciPy convention and
/// order-independent rules are sorted by ascending dissimilarity.
pub fn linkage(matrix: &CondensedMatrix, method: Linkage) -> Result<Dendrogram> {
    linkage_reuse(matrix.clone(), method)
}

/// [`linkage`], but taking ownership of `matrix` so the selected algorithm
/// can use it as working storage directly.
pub fn linkage_reuse(matrix: CondensedMatrix, method: Linkage) -> Result<Dendrogram> {
    match method {
        Linkage::Single => mst(&matrix),
        Linkage::Complete | Linkage::Average | Linkage::Weighted | Linkage::Ward => {
            nnchain(matrix, method)
        }
        Linkage::Centroid | Linkage::Median => generic(matrix, method),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_matrix() -> impl Strategy<Value = CondensedMatrix> {
        (2usize..10)
            .prop_flat_map(|n| {
                proptest::collection::vec(0.0f64..100.0, n * (n - 1) / 2)
            })
            .prop_map(|buf| CondensedMatrix::from_condensed(buf).unwrap())
    }

    proptest! {
        #[test]
        fn dendrogram_has_n_minus_one_steps(matrix in arbitrary_matrix()) {
            for rule in Linkage::ALL {
                let dendrogram = linkage(&matrix, rule).unwrap();
                prop_assert_eq!(dendrogram.len(), matrix.n() - 1);
            }
        }

        #[test]
        fn relabeling_a_canonical_dendrogram_is_a_noop(matrix in arbitrary_matrix()) {
            for rule in Linkage::ALL {
                let canonical = linkage(&matrix, rule).unwrap();
                let again = canonical.relabel(!rule.order_dependent()).unwrap();
                prop_assert!(canonical.eq_within(&again, 0.0));
            }
        }
    }
}
