//! # agglom
//!
//! Agglomerative hierarchical clustering: sub-cubic linkage algorithms,
//! dendrograms, and flat cluster extraction.
//!
//! This crate consolidates agglomerative clustering primitives for the
//! Tekne stack.
//!
//! Given `n` observations and a symmetric pairwise dissimilarity, the
//! engine produces a [`Dendrogram`]: the complete binary-merge tree
//! recording, for each of the `n - 1` merge steps, which two clusters were
//! joined and at what dissimilarity. Flat clusterings fall out of the tree
//! by cutting at a height ([`Dendrogram::cut_at_distance`]) or bounding the
//! cluster count ([`Dendrogram::cut_to_k`]).
//!
//! ```rust
//! use agglom::{linkage, CondensedMatrix, Linkage};
//!
//! // Four points on a line, |i - j| apart.
//! let matrix = CondensedMatrix::from_fn(4, |i, j| (j - i) as f64).unwrap();
//! let dendrogram = linkage(&matrix, Linkage::Single).unwrap();
//!
//! assert_eq!(dendrogram.len(), 3);
//! let labels = dendrogram.cut_at_distance(1.5).unwrap();
//! assert!(labels.iter().all(|&l| l == labels[0])); // one chained cluster
//! ```
//!
//! Start from raw points instead with [`HierarchicalClustering`], which
//! builds the Euclidean [`CondensedMatrix`] for you.

pub mod cluster;
pub mod dendrogram;
pub mod error;
pub mod linkage;
pub mod matrix;

mod active;
mod heap;
mod union_find;

pub use cluster::{medoids, HierarchicalClustering};
pub use dendrogram::{Dendrogram, Step};
pub use error::{Error, Result};
pub use linkage::{generic, linkage, linkage_reuse, mst, nnchain, primitive, Linkage};
pub use matrix::CondensedMatrix;
