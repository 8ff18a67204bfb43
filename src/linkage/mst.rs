//! Single linkage via minimum-spanning-tree growth.
//!
//! Single linkage has a special structure: the dendrogram's merges are
//! exactly the edges of a minimum spanning tree over the dissimilarity
//! graph, taken in ascending weight order. Growing that tree Prim-style
//! needs only one O(n) pass per step over the shrinking active set, so the
//! whole run is Θ(n²) time and O(n) extra space, and the input matrix is
//! never written.
//!
//! Each step removes the current node from the active set, folds its matrix
//! row into the running vector of distances-to-the-grown-component, and
//! walks to the closest remaining node.

use crate::active::ActiveList;
use crate::dendrogram::Dendrogram;
use crate::error::Result;
use crate::matrix::CondensedMatrix;

/// Single-linkage dendrogram in Θ(n²), without mutating `matrix`.
pub fn mst(matrix: &CondensedMatrix) -> Result<Dendrogram> {
    let n = matrix.n();
    let mut out = Dendrogram::new(n);
    if n < 2 {
        return Ok(out);
    }

    let mut active = ActiveList::new(n);
    // shortest[k]: distance from cluster k to the grown component. Seeded
    // from row 0; slot 0 is never read once 0 joins the component.
    let mut shortest = vec![0.0f64; n];
    for k in 1..n {
        shortest[k] = unsafe { matrix.get_unchecked(0, k) };
    }

    let mut current = 0;
    for _ in 0..n - 1 {
        active.delete(current);
        let (next, dissimilarity) = active
            .nearest_in(current, matrix, |k, raw| {
                if raw < shortest[k] {
                    shortest[k] = raw;
                }
                shortest[k]
            })
            .expect("active set retains a node for each remaining merge");
        out.push(current, next, dissimilarity);
        current = next;
    }

    // Single linkage is order-independent: canonicalize by ascending
    // dissimilarity.
    out.relabel(true)
}
