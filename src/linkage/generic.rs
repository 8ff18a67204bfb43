//! Priority-queue linkage for every rule, inversions included.
//!
//! Centroid and median are not reducible: a merge can land *below* the
//! merges that produced its children, so the nearest-neighbor chain's
//! reciprocal-pair shortcut is unsound for them. This algorithm instead
//! always merges the globally closest pair, found through an indexed
//! min-heap keyed by each cluster's cached nearest-neighbor distance.
//!
//! # The lazy-underestimate invariant
//!
//! Keeping every cached distance exact would cost Θ(n) heap fixups per
//! merge. Instead the heap stores *underestimates*: a cluster's priority is
//! never above its true current nearest distance. Updates that lower a
//! distance below a cached priority fix the cache immediately (cheap, the
//! cell is in hand); updates that raise one leave the cache stale-low and
//! the top of the heap is repaired lazily, by rescanning only when a popped
//! candidate turns out stale. Priorities that never reach the top are never
//! repaired, which is what makes the best case Θ(n²).
//!
//! Single linkage never raises a distance, so its caches stay exact and the
//! repair loop is skipped outright.
//!
//! Each index's cached nearest neighbor always lies *above* it; index
//! `n - 1` owns no pairs and sits in the heap at +∞, so it is never popped.

use crate::active::ActiveList;
use crate::dendrogram::Dendrogram;
use crate::error::Result;
use crate::heap::IndexHeap;
use crate::matrix::CondensedMatrix;

use super::method::Linkage;

/// Dendrogram for any of the seven rules, consuming `matrix` as working
/// storage. Θ(n²) best case.
pub fn generic(mut matrix: CondensedMatrix, method: Linkage) -> Result<Dendrogram> {
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

    // nearest[i]: cached best neighbor of i among live indices above i.
    let mut nearest: Vec<usize> = (0..n).map(|i| (i + 1).min(n - 1)).collect();
    for i in 0..n - 1 {
        let mut best = i + 1;
        let mut best_d = unsafe { matrix.get_unchecked(i, i + 1) };
        for k in i + 2..n {
            let d = unsafe { matrix.get_unchecked(i, k) };
            if d < best_d {
                best_d = d;
                best = k;
            }
        }
        nearest[i] = best;
    }

    let mut heap = IndexHeap::from_fn(n, |i| {
        if i < n - 1 {
            unsafe { matrix.get_unchecked(i, nearest[i]) }
        } else {
            f64::INFINITY
        }
    });

    for _ in 0..n - 1 {
        debug_assert!(heap.len() >= 2);

        // Repair the top until its cached priority is current, then commit
        // to it. Single linkage keeps its caches exact and skips this.
        if method != Linkage::Single {
            loop {
                let top = heap.peek().expect("heap holds every unmerged cluster");
                let actual = unsafe { matrix.get_unchecked(top, nearest[top]) };
                if heap.priority_of(top)? >= actual {
                    break;
                }
                let mut best = nearest[top];
                let mut best_d = f64::INFINITY;
                for k in active.iter_within(top + 1..n, 0) {
                    let d = unsafe { matrix.get_unchecked(top, k) };
                    if d < best_d {
                        best_d = d;
                        best = k;
                    }
                }
                nearest[top] = best;
                heap.set_priority(top, best_d)?;
            }
        }

        let i = heap.pop().expect("heap holds every unmerged cluster");
        let j = nearest[i];
        debug_assert!(i < j && active.contains(j));
        let d_ij = unsafe { matrix.get_unchecked(i, j) };
        out.push(i, j, if squared { d_ij.sqrt() } else { d_ij });

        let (size_i, size_j) = (size[i], size[j]);
        active.delete(i);

        // Rewrite row j in place across the three oriented ranges, fixing
        // caches that the new distances undercut and retargeting any
        // pointer left dangling at i.
        for k in active.iter_within(0..i, 0) {
            let d_ik = unsafe { matrix.get_unchecked(k, i) };
            let cell = unsafe { matrix.cell_unchecked_mut(k, j) };
            method.update(d_ij, d_ik, cell, size_i, size_j, size[k]);
            let updated = *cell;
            if updated < heap.priority_of(k)? {
                heap.set_priority(k, updated)?;
                nearest[k] = j;
            } else if nearest[k] == i {
                nearest[k] = j;
            }
        }
        for k in active.iter_within(i + 1..j, 0) {
            let d_ik = unsafe { matrix.get_unchecked(i, k) };
            let cell = unsafe { matrix.cell_unchecked_mut(k, j) };
            method.update(d_ij, d_ik, cell, size_i, size_j, size[k]);
            let updated = *cell;
            if updated < heap.priority_of(k)? {
                heap.set_priority(k, updated)?;
                nearest[k] = j;
            }
        }
        let mut row_min = f64::INFINITY;
        let mut row_arg = j;
        for k in active.iter_within(j + 1..n, 0) {
            let d_ik = unsafe { matrix.get_unchecked(i, k) };
            let cell = unsafe { matrix.cell_unchecked_mut(j, k) };
            method.update(d_ij, d_ik, cell, size_i, size_j, size[k]);
            if *cell < row_min {
                row_min = *cell;
                row_arg = k;
            }
        }
        if row_min < heap.priority_of(j)? {
            heap.set_priority(j, row_min)?;
            nearest[j] = row_arg;
        }

        size[j] += size[i];
    }

    out.relabel(!method.order_dependent())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line4() -> CondensedMatrix {
        CondensedMatrix::from_fn(4, |i, j| (j - i) as f64).unwrap()
    }

    #[test]
    fn test_single_link_four_points() {
        let got = generic(line4(), Linkage::Single).unwrap();
        let mut want = Dendrogram::new(4);
        want.push(0, 1, 1.0);
        want.push(2, 4, 1.0);
        want.push(3, 5, 1.0);
        assert_eq!(got, want);
    }

    #[test]
    fn test_complete_link_four_points() {
        let got = generic(line4(), Linkage::Complete).unwrap();
        let mut want = Dendrogram::new(4);
        want.push(0, 1, 1.0);
        want.push(2, 3, 1.0);
        want.push(4, 5, 3.0);
        assert_eq!(got, want);
    }

    #[test]
    fn test_centroid_three_points() {
        // 1-D points at 0, 1, 3: {0, 1} merges first, then {2} joins at the
        // centroid distance |3 - 0.5| = 2.5.
        let pos = [0.0f64, 1.0, 3.0];
        let matrix = CondensedMatrix::from_fn(3, |i, j| (pos[j] - pos[i]).abs()).unwrap();
        let got = generic(matrix, Linkage::Centroid).unwrap();
        assert_eq!(got.len(), 2);
        assert!((got.steps()[0].dissimilarity - 1.0).abs() < 1e-12);
        assert_eq!(
            (got.steps()[1].cluster_a, got.steps()[1].cluster_b),
            (2, 3)
        );
        assert!((got.steps()[1].dissimilarity - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_inversion_order_is_preserved() {
        // An equilateral-ish triangle of close points plus a far point:
        // joining the midpoint cluster to the third point can land below
        // the first merge. The emitted order must keep the inversion.
        let pos: [(f64, f64); 4] = [(0.0, 0.0), (2.0, 0.0), (1.0, 1.8), (10.0, 0.0)];
        let matrix = CondensedMatrix::from_fn(4, |i, j| {
            let (dx, dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
            (dx * dx + dy * dy).sqrt()
        })
        .unwrap();
        let got = generic(matrix, Linkage::Median).unwrap();
        assert_eq!(got.len(), 3);
        // First merge: 0 and 1 at distance 2. Second: their midpoint
        // (1, 0) to 2, at distance 1.8, an inversion kept in place.
        assert!((got.steps()[0].dissimilarity - 2.0).abs() < 1e-12);
        assert!(got.steps()[1].dissimilarity < got.steps()[0].dissimilarity);
    }

    #[test]
    fn test_trivial_sizes() {
        let one = CondensedMatrix::new(1).unwrap();
        assert!(generic(one, Linkage::Centroid).unwrap().is_empty());
    }
}
