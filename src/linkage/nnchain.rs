//! Nearest-neighbor-chain linkage.
//!
//! Works for every *reducible* rule (single, complete, average, weighted,
//! ward): merging two clusters never brings the merged cluster closer to a
//! third than the nearer of its halves was. Under that guarantee, any pair
//! of reciprocal nearest neighbors can be merged immediately without
//! changing the final dendrogram, so the algorithm walks a chain
//!
//! ```text
//! s → nn(s) → nn(nn(s)) → ...
//! ```
//!
//! of strictly decreasing distances until it bounces (reciprocal pair),
//! merges the pair, and resumes from the surviving chain tail. Every index
//! enters the chain O(1) times amortized, giving Θ(n²) overall.
//!
//! The merge order this produces is scrambled relative to dissimilarity,
//! which is fine for reducible rules: the result is canonicalized by
//! sorting before relabeling.

use crate::active::ActiveList;
use crate::dendrogram::Dendrogram;
use crate::error::{Error, Result};
use crate::matrix::CondensedMatrix;

use super::method::Linkage;

/// Dendrogram for a reducible rule in Θ(n²), consuming `matrix` as working
/// storage. Centroid and median are rejected; they need
/// [`generic`](super::generic).
pub fn nnchain(mut matrix: CondensedMatrix, method: Linkage) -> Result<Dendrogram> {
    if method.order_dependent() {
        return Err(Error::InvalidParameter {
            name: "method",
            message: "centroid and median can invert merges; use the generic algorithm",
        });
    }

    let n = matrix.n();
    let mut out = Dendrogram::new(n);
    if n < 2 {
        return Ok(out);
    }

    let squared = method.needs_squared_input();
    if squared {
        matrix.map_in_place(|x| x * x);
    }

    let mut active = ActiveList::new(n);
    let mut size = vec![1usize; n];
    let mut chain: Vec<usize> = Vec::with_capacity(n);

    for _ in 0..n - 1 {
        let mut i;
        let mut j;
        let mut d_ij;
        if chain.len() < 4 {
            chain.clear();
            i = active.first_or_error()?;
            chain.push(i);
            let (candidate, d) = active
                .nearest_in(i, &matrix, |_, raw| raw)
                .expect("at least two clusters remain before each merge");
            j = candidate;
            d_ij = d;
        } else {
            // Drop the pair merged last round and re-extend from the
            // remaining tail of the chain, which is still a valid
            // descending-distance prefix.
            chain.truncate(chain.len() - 2);
            j = chain.pop().expect("chain keeps its tail after a merge");
            i = *chain.last().expect("chain keeps its tail after a merge");
            d_ij = dist(&matrix, i, j);
        }

        // Extend until the chain bounces: the nearest neighbor of the tail
        // is its own predecessor. Seeding the scan with the predecessor's
        // distance makes ties fall back to it, so plateaus terminate.
        loop {
            chain.push(j);
            let (candidate, d) = active
                .nearest_in(j, &matrix, |_, raw| raw)
                .expect("at least two clusters remain before each merge");
            let (next, next_d) = if d < d_ij { (candidate, d) } else { (i, d_ij) };
            i = j;
            j = next;
            d_ij = next_d;
            if chain.len() >= 2 && j == chain[chain.len() - 2] {
                break;
            }
        }

        // Merge the reciprocal pair into the larger index.
        let (a, b) = if i < j { (i, j) } else { (j, i) };
        out.push(a, b, if squared { d_ij.sqrt() } else { d_ij });
        let (size_a, size_b) = (size[a], size[b]);
        active.delete(a);

        // Rewrite row b in place. The matrix only stores row < col, so the
        // remaining clusters fall into three oriented ranges.
        for k in active.iter_within(0..a, 0) {
            let d_ak = unsafe { matrix.get_unchecked(k, a) };
            let cell = unsafe { matrix.cell_unchecked_mut(k, b) };
            method.update(d_ij, d_ak, cell, size_a, size_b, size[k]);
        }
        for k in active.iter_within(a + 1..b, 0) {
            let d_ak = unsafe { matrix.get_unchecked(a, k) };
            let cell = unsafe { matrix.cell_unchecked_mut(k, b) };
            method.update(d_ij, d_ak, cell, size_a, size_b, size[k]);
        }
        for k in active.iter_within(b + 1..n, 0) {
            let d_ak = unsafe { matrix.get_unchecked(a, k) };
            let cell = unsafe { matrix.cell_unchecked_mut(b, k) };
            method.update(d_ij, d_ak, cell, size_a, size_b, size[k]);
        }
        size[b] += size[a];
    }

    out.relabel(true)
}

#[inline]
fn dist(matrix: &CondensedMatrix, i: usize, j: usize) -> f64 {
    if i < j {
        unsafe { matrix.get_unchecked(i, j) }
    } else {
        unsafe { matrix.get_unchecked(j, i) }
    }
}
