//! Linkage rules: how "distance between clusters" is defined.
//!
//! Every rule is an instance of the Lance–Williams recurrence: after
//! merging clusters I and J, the dissimilarity from I∪J to any third
//! cluster K is a function of `d(I,J)`, `d(I,K)`, `d(J,K)` and the three
//! cluster sizes, so a merge updates a whole matrix row in one pass.
//!
//! | Rule | d(I∪J, K) | Effect |
//! |------|-----------|--------|
//! | Single | min(d_ik, d_jk) | Chaining; elongated clusters |
//! | Complete | max(d_ik, d_jk) | Compact, spherical clusters |
//! | Average | (nᵢ·d_ik + nⱼ·d_jk)/(nᵢ+nⱼ) | Balanced compromise (UPGMA) |
//! | Weighted | (d_ik + d_jk)/2 | Size-blind average (WPGMA) |
//! | Ward | ((nᵢ+nₖ)·d_ik + (nⱼ+nₖ)·d_jk − nₖ·d_ij)/(nᵢ+nⱼ+nₖ) | Minimizes within-cluster variance |
//! | Centroid | (nᵢ·d_ik + nⱼ·d_jk)/(nᵢ+nⱼ) − nᵢ·nⱼ·d_ij/(nᵢ+nⱼ)² | Distance between centroids (UPGMC) |
//! | Median | (d_ik + d_jk)/2 − d_ij/4 | Distance between midpoints (WPGMC) |
//!
//! Two attributes drive the engine, not special cases:
//!
//! - **Squared input** (Ward, Centroid, Median): the formula is algebra over
//!   squared Euclidean distances, so the matrix is squared once up front and
//!   every emitted merge takes a square root.
//! - **Order dependence** (Centroid, Median): a merge can land *below* its
//!   children (an inversion), so the merge order is meaningful and must not
//!   be re-sorted when relabeling.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// Cluster-distance update rule for agglomerative clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage (UPGMA): size-weighted mean distance.
    Average,
    /// Weighted linkage (WPGMA): unweighted mean of the two halves.
    Weighted,
    /// Ward's method: minimize within-cluster variance.
    Ward,
    /// Centroid linkage (UPGMC): distance between cluster centroids.
    Centroid,
    /// Median linkage (WPGMC): distance between cluster midpoints.
    Median,
}

impl Linkage {
    /// All seven rules, in table order.
    pub const ALL: [Linkage; 7] = [
        Linkage::Single,
        Linkage::Complete,
        Linkage::Average,
        Linkage::Weighted,
        Linkage::Ward,
        Linkage::Centroid,
        Linkage::Median,
    ];

    /// True for rules whose formula operates on squared dissimilarities.
    pub fn needs_squared_input(self) -> bool {
        matches!(self, Linkage::Ward | Linkage::Centroid | Linkage::Median)
    }

    /// True for rules that can produce inversions, making the merge order
    /// meaningful.
    pub fn order_dependent(self) -> bool {
        matches!(self, Linkage::Centroid | Linkage::Median)
    }

    /// Overwrite `d_jk` with the dissimilarity between the merged cluster
    /// I∪J and a third cluster K.
    ///
    /// `d_ij` is the merge dissimilarity, `d_ik` the distance from the
    /// removed half, and `d_jk` the cell of the surviving half, rewritten in
    /// place.
    #[inline]
    pub(crate) fn update(
        self,
        d_ij: f64,
        d_ik: f64,
        d_jk: &mut f64,
        n_i: usize,
        n_j: usize,
        n_k: usize,
    ) {
        match self {
            Linkage::Single => {
                if d_ik < *d_jk {
                    *d_jk = d_ik;
                }
            }
            Linkage::Complete => {
                if d_ik > *d_jk {
                    *d_jk = d_ik;
                }
            }
            Linkage::Average => {
                let (ni, nj) = (n_i as f64, n_j as f64);
                *d_jk = (ni * d_ik + nj * *d_jk) / (ni + nj);
            }
            Linkage::Weighted => {
                *d_jk = (d_ik + *d_jk) / 2.0;
            }
            Linkage::Ward => {
                let (ni, nj, nk) = (n_i as f64, n_j as f64, n_k as f64);
                *d_jk = ((ni + nk) * d_ik + (nj + nk) * *d_jk - nk * d_ij) / (ni + nj + nk);
            }
            Linkage::Centroid => {
                let (ni, nj) = (n_i as f64, n_j as f64);
                let total = ni + nj;
                *d_jk = (ni * d_ik + nj * *d_jk) / total - ni * nj * d_ij / (total * total);
            }
            Linkage::Median => {
                *d_jk = (d_ik + *d_jk) / 2.0 - d_ij / 4.0;
            }
        }
    }

    /// Lowercase rule name.
    pub fn name(self) -> &'static str {
        match self {
            Linkage::Single => "single",
            Linkage::Complete => "complete",
            Linkage::Average => "average",
            Linkage::Weighted => "weighted",
            Linkage::Ward => "ward",
            Linkage::Centroid => "centroid",
            Linkage::Median => "median",
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Linkage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Linkage::ALL
            .into_iter()
            .find(|m| s.eq_ignore_ascii_case(m.name()))
            .ok_or(Error::InvalidParameter {
                name: "linkage",
                message: "expected one of single, complete, average, weighted, \
                          ward, centroid, median",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three 1-D points at 0, 1, 3; merging {0} and {1}, updating the
    // distance to {2}. Plain distances are (d01, d02, d12) = (1, 3, 2);
    // the squared-input rules see (1, 9, 4).
    fn updated(rule: Linkage) -> f64 {
        let squared = rule.needs_squared_input();
        let (d_ij, d_ik) = if squared { (1.0, 9.0) } else { (1.0, 3.0) };
        let mut d_jk = if squared { 4.0 } else { 2.0 };
        rule.update(d_ij, d_ik, &mut d_jk, 1, 1, 1);
        if squared {
            d_jk.sqrt()
        } else {
            d_jk
        }
    }

    #[test]
    fn test_formulas_on_singletons() {
        assert_eq!(updated(Linkage::Single), 2.0);
        assert_eq!(updated(Linkage::Complete), 3.0);
        assert_eq!(updated(Linkage::Average), 2.5);
        assert_eq!(updated(Linkage::Weighted), 2.5);
        // Ward: ((1+1)*9 + (1+1)*4 - 1) / 3 = 25/3.
        assert!((updated(Linkage::Ward) - (25.0f64 / 3.0).sqrt()).abs() < 1e-12);
        // Centroid and median both land on the true centroid/midpoint
        // distance |3 - 0.5| = 2.5 here.
        assert!((updated(Linkage::Centroid) - 2.5).abs() < 1e-12);
        assert!((updated(Linkage::Median) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_average_weights_by_size() {
        // |I| = 3, |J| = 1: the average leans toward I's side.
        let mut d_jk = 8.0;
        Linkage::Average.update(0.0, 4.0, &mut d_jk, 3, 1, 2);
        assert_eq!(d_jk, 5.0);
    }

    #[test]
    fn test_attributes() {
        for rule in Linkage::ALL {
            assert_eq!(
                rule.needs_squared_input(),
                matches!(rule, Linkage::Ward | Linkage::Centroid | Linkage::Median),
            );
            assert_eq!(
                rule.order_dependent(),
                matches!(rule, Linkage::Centroid | Linkage::Median),
            );
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for rule in Linkage::ALL {
            assert_eq!(rule.name().parse::<Linkage>().unwrap(), rule);
        }
        assert_eq!("Ward".parse::<Linkage>().unwrap(), Linkage::Ward);
        assert!("upgma".parse::<Linkage>().is_err());
    }
}
