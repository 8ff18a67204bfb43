//! Dendrogram: the complete merge history of an agglomerative clustering.
//!
//! A clustering of `n` observations performs exactly `n - 1` merges; the
//! dendrogram records each one as a [`Step`] holding the two cluster labels
//! joined and the dissimilarity at which it happened.
//!
//! ```text
//!         6 (height=1.0)
//!        / \
//!       4   5 (height=0.7)
//!      / \ / \
//!     0  1 2  3 (leaves)
//! ```
//!
//! # Labeling
//!
//! Labels follow the SciPy/MATLAB convention: singletons are `0..n-1` and
//! the i-th merge creates label `n + i`. The linkage algorithms buffer raw
//! steps (leaf indices straight out of the merge loop) and produce the
//! canonical form through [`Dendrogram::relabel`], which walks the steps
//! through a label-minting union-find.
//!
//! # Flat clusterings
//!
//! Key property of the tree: "cut" it to get any number of clusters.
//! [`Dendrogram::cut_at_distance`] bounds the cophenetic distance inside a
//! cluster, [`Dendrogram::cut_to_k`] bounds the cluster count. Both only
//! read the steps.

use crate::error::{Error, Result};
use crate::matrix::CondensedMatrix;
use crate::union_find::UnionFind;

/// Two step dissimilarities within this tolerance compare equal.
const STEP_TOLERANCE: f64 = 1e-15;

/// A single merge: the two clusters joined and the dissimilarity between
/// them at merge time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Smaller cluster label.
    pub cluster_a: usize,
    /// Larger cluster label.
    pub cluster_b: usize,
    /// Dissimilarity between the two clusters when merged.
    pub dissimilarity: f64,
}

impl Step {
    /// Create a step; the smaller label always lands in `cluster_a`.
    pub fn new(a: usize, b: usize, dissimilarity: f64) -> Self {
        let (cluster_a, cluster_b) = if a < b { (a, b) } else { (b, a) };
        Self {
            cluster_a,
            cluster_b,
            dissimilarity,
        }
    }
}

/// Merge history of a hierarchical clustering over `observations` leaves.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    observations: usize,
    steps: Vec<Step>,
}

impl Dendrogram {
    /// Empty dendrogram for `observations` leaves.
    pub fn new(observations: usize) -> Self {
        Self {
            observations,
            steps: Vec::with_capacity(observations.saturating_sub(1)),
        }
    }

    /// Append a merge step.
    pub fn push(&mut self, a: usize, b: usize, dissimilarity: f64) {
        self.steps.push(Step::new(a, b, dissimilarity));
    }

    /// Number of original observations.
    #[inline]
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Number of recorded merges.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The merge steps, in order.
    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True iff both dendrograms describe the same observations and every
    /// corresponding step agrees on its cluster tuple, with dissimilarities
    /// within `tolerance`.
    pub fn eq_within(&self, other: &Dendrogram, tolerance: f64) -> bool {
        self.observations == other.observations
            && self.steps.len() == other.steps.len()
            && self.steps.iter().zip(&other.steps).all(|(a, b)| {
                a.cluster_a == b.cluster_a
                    && a.cluster_b == b.cluster_b
                    && (a.dissimilarity - b.dissimilarity).abs() <= tolerance
            })
    }

    /// Rewrite raw leaf labels into the canonical labeling.
    ///
    /// With `ordered`, the steps are first stably sorted by ascending
    /// dissimilarity; rules whose merge order is meaningful (centroid,
    /// median) must pass `false` so the emitted order survives. Each step's
    /// labels are replaced by the current roots of its clusters and a fresh
    /// internal label is minted per merge.
    pub fn relabel(&self, ordered: bool) -> Result<Dendrogram> {
        let mut steps = self.steps.clone();
        if ordered {
            steps.sort_by(|x, y| x.dissimilarity.total_cmp(&y.dissimilarity));
        }
        let mut uf = UnionFind::new(self.observations.max(1));
        let mut out = Dendrogram::new(self.observations);
        for step in &steps {
            let ra = uf.find(step.cluster_a)?;
            let rb = uf.find(step.cluster_b)?;
            if uf.union(ra, rb)?.is_none() {
                return Err(Error::InvalidParameter {
                    name: "steps",
                    message: "merge joins two clusters that are already one",
                });
            }
            out.push(ra, rb, step.dissimilarity);
        }
        Ok(out)
    }

    /// Cluster assignments with cophenetic distance bounded by `threshold`.
    ///
    /// Applies steps in order until the first one above the threshold, then
    /// labels every leaf by its component, renumbered to consecutive
    /// integers. Expects canonical labels (see [`Dendrogram::relabel`]).
    pub fn cut_at_distance(&self, threshold: f64) -> Result<Vec<usize>> {
        self.cut(|step| step.dissimilarity <= threshold, self.steps.len())
    }

    /// Cluster assignments for at most `k` clusters: the first
    /// `observations - k` steps are applied.
    ///
    /// Counting steps rather than scanning a distance threshold keeps this
    /// correct for centroid/median trees, where an inversion can put a
    /// cheaper merge after a costlier one.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.observations,
            });
        }
        let merges = self.observations.saturating_sub(k).min(self.steps.len());
        self.cut(|_| true, merges)
    }

    fn cut<F: Fn(&Step) -> bool>(&self, apply: F, limit: usize) -> Result<Vec<usize>> {
        let n = self.observations;
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut uf = UnionFind::new(n);
        for step in self.steps.iter().take(limit) {
            if !apply(step) {
                break;
            }
            uf.union(step.cluster_a, step.cluster_b)?;
        }
        let mut roots = Vec::with_capacity(n);
        for leaf in 0..n {
            roots.push(uf.find(leaf)?);
        }
        // Renumber to consecutive integers.
        let mut unique = roots.clone();
        unique.sort_unstable();
        unique.dedup();
        Ok(roots
            .iter()
            .map(|r| unique.binary_search(r).expect("root came from this set"))
            .collect())
    }

    /// The ultrametric this tree induces: for every leaf pair, the
    /// dissimilarity of the step at which they first share an ancestor.
    pub fn cophenetic(&self) -> Result<CondensedMatrix> {
        let n = self.observations;
        let mut matrix = CondensedMatrix::new(n.max(1))?;
        let mut uf = UnionFind::new(n.max(1));
        let mut members: Vec<Vec<usize>> = (0..2 * n.max(1) - 1)
            .map(|i| if i < n { vec![i] } else { Vec::new() })
            .collect();
        for step in &self.steps {
            let ra = uf.find(step.cluster_a)?;
            let rb = uf.find(step.cluster_b)?;
            let label = uf.union(ra, rb)?.ok_or(Error::InvalidParameter {
                name: "steps",
                message: "merge joins two clusters that are already one",
            })?;
            for &x in &members[ra] {
                for &y in &members[rb] {
                    matrix.set(x, y, step.dissimilarity)?;
                }
            }
            let mut joined = core::mem::take(&mut members[ra]);
            joined.append(&mut members[rb]);
            members[label] = joined;
        }
        Ok(matrix)
    }
}

impl PartialEq for Dendrogram {
    fn eq(&self, other: &Self) -> bool {
        self.eq_within(other, STEP_TOLERANCE)
    }
}
