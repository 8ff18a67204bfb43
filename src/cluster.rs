//! Hierarchical (agglomerative) clustering over raw points.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively merging
//! the closest clusters. Unlike K-means you don't need to fix k in
//! advance—cut the tree at any height, or at any cluster count, after the
//! fact.
//!
//! This is the convenience wrapper: it turns points into a
//! [`CondensedMatrix`] under the Euclidean metric and hands off to
//! [`linkage`](crate::linkage()). Work with the matrix API directly when
//! the dissimilarity isn't Euclidean, or when the matrix is cheaper to
//! produce than the points.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"? See the
//! [`Linkage`] table for the seven rules. The default is [`Linkage::Average`],
//! the balanced compromise.
//!
//! # When to Use
//!
//! - **Exploratory analysis**: view cluster structure at multiple granularities
//! - **Unknown k**: cut the dendrogram at different heights to explore
//! - **Small-medium data**: O(n²) space for the distance matrix

use crate::dendrogram::Dendrogram;
use crate::error::{Error, Result};
use crate::linkage::{linkage_reuse, Linkage};
use crate::matrix::CondensedMatrix;
use ndarray::{Array2, ArrayView1};

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage rule.
    linkage: Linkage,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Average,
        }
    }

    /// Set the linkage rule.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Number of clusters this instance cuts to.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Fit and return the full dendrogram.
    pub fn fit_dendrogram(&self, data: &[Vec<f64>]) -> Result<Dendrogram> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = data.len();
        let d = data[0].len();
        if let Some((_, p)) = data.iter().enumerate().find(|(_, p)| p.len() != d) {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: p.len(),
            });
        }

        let mut flat: Vec<f64> = Vec::with_capacity(n * d);
        for point in data {
            flat.extend_from_slice(point);
        }
        let len = flat.len();
        let points = Array2::from_shape_vec((n, d), flat).map_err(|_| Error::DimensionMismatch {
            expected: n * d,
            found: len,
        })?;

        let matrix =
            CondensedMatrix::from_fn(n, |i, j| euclidean(&points.row(i), &points.row(j)))?;
        linkage_reuse(matrix, self.linkage)
    }

    /// Fit and return cluster assignments, one label per input point.
    pub fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit_dendrogram(data)?.cut_to_k(self.n_clusters)
    }
}

/// Euclidean distance between two points.
#[inline]
fn euclidean(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Representative index per cluster: the member with the smallest average
/// dissimilarity to its cluster mates.
///
/// `labels` must assign every index of `matrix` to a consecutive cluster id,
/// as produced by the dendrogram cuts.
pub fn medoids(matrix: &CondensedMatrix, labels: &[usize]) -> Result<Vec<usize>> {
    if labels.len() != matrix.n() {
        return Err(Error::DimensionMismatch {
            expected: matrix.n(),
            found: labels.len(),
        });
    }
    let clusters = labels.iter().map(|&l| l + 1).max().unwrap_or(0);
    let mut out = Vec::with_capacity(clusters);
    for cluster in 0..clusters {
        let members: Vec<usize> = (0..labels.len())
            .filter(|&i| labels[i] == cluster)
            .collect();
        if members.is_empty() {
            return Err(Error::InvalidParameter {
                name: "labels",
                message: "cluster ids must be consecutive from 0",
            });
        }
        let within = matrix.submatrix(&members)?;
        out.push(members[within.medoid()]);
    }
    Ok(out)
}
