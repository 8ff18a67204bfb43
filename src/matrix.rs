//! Condensed dissimilarity matrix.
//!
//! A symmetric matrix with a zero diagonal is fully determined by its strict
//! upper triangle, so we store only that: `n(n-1)/2` values in one flat
//! buffer. The cell `(i, j)` with `i < j` lives at offset
//!
//! ```text
//! ((2n - 3 - i) * i) / 2 + j - 1
//! ```
//!
//! which lays rows out contiguously:
//!
//! ```text
//!        col 1  2  3  4
//! row 0      [0, 1, 2, 3]
//! row 1         [4, 5, 6]
//! row 2            [7, 8]
//! row 3               [9]
//! ```
//!
//! The clustering algorithms rewrite cells in place millions of times, so the
//! checked accessors have unchecked counterparts for the hot loops and
//! [`CondensedMatrix::cell_mut`] hands out a direct `&mut f64` into a cell.

use crate::error::{Error, Result};

/// Symmetric zero-diagonal dissimilarity matrix stored as its strict upper
/// triangle.
#[derive(Debug, Clone)]
pub struct CondensedMatrix {
    /// Side length.
    n: usize,
    /// Upper triangle, row-major, length `n(n-1)/2`.
    data: Vec<f64>,
}

/// Offset of cell `(i, j)` with `i < j` inside a condensed buffer of side `n`.
#[inline(always)]
fn offset(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    ((2 * n - 3 - i) * i) / 2 + j - 1
}

impl CondensedMatrix {
    /// Create a zero-filled matrix of side `n`. Rejects `n == 0`.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            n,
            data: vec![0.0; n * (n - 1) / 2],
        })
    }

    /// Create a matrix of side `n` filled from `f(i, j)` for all `i < j`.
    ///
    /// A NaN from `f` is rejected with [`Error::NanDissimilarity`].
    pub fn from_fn<F>(n: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let mut data = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = f(i, j);
                if d.is_nan() {
                    return Err(Error::NanDissimilarity { row: i, col: j });
                }
                data.push(d);
            }
        }
        Ok(Self { n, data })
    }

    /// Wrap a user-supplied condensed buffer.
    ///
    /// The length must be `n(n-1)/2` for some integer `n >= 2`; empty and
    /// non-triangular buffers are rejected, as is any NaN entry.
    pub fn from_condensed(data: Vec<f64>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = triangle_side(data.len())
            .ok_or(Error::NonTriangularLength { length: data.len() })?;
        let mut idx = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                if data[idx].is_nan() {
                    return Err(Error::NanDissimilarity { row: i, col: j });
                }
                idx += 1;
            }
        }
        Ok(Self { n, data })
    }

    /// Side length.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Length of the condensed buffer, `n(n-1)/2`.
    #[inline]
    pub fn condensed_len(&self) -> usize {
        self.data.len()
    }

    /// The condensed buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Dissimilarity between `i` and `j`; symmetric, `get(i, i) == 0`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.check(i)?;
        self.check(j)?;
        if i == j {
            return Ok(0.0);
        }
        let (r, c) = if i < j { (i, j) } else { (j, i) };
        Ok(self.data[offset(self.n, r, c)])
    }

    /// Store `v` as the dissimilarity between `i` and `j`.
    ///
    /// The diagonal only accepts `0.0`.
    pub fn set(&mut self, i: usize, j: usize, v: f64) -> Result<()> {
        self.check(i)?;
        self.check(j)?;
        if i == j {
            if v != 0.0 {
                return Err(Error::NonZeroDiagonal { index: i, value: v });
            }
            return Ok(());
        }
        let (r, c) = if i < j { (i, j) } else { (j, i) };
        self.data[offset(self.n, r, c)] = v;
        Ok(())
    }

    /// Read cell `(i, j)` without bounds or orientation checks.
    ///
    /// # Safety
    ///
    /// The caller must guarantee `i < j < n`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, i: usize, j: usize) -> f64 {
        *self.data.get_unchecked(offset(self.n, i, j))
    }

    /// Write cell `(i, j)` without bounds or orientation checks.
    ///
    /// # Safety
    ///
    /// The caller must guarantee `i < j < n`.
    #[inline(always)]
    pub unsafe fn put_unchecked(&mut self, i: usize, j: usize, v: f64) {
        *self.data.get_unchecked_mut(offset(self.n, i, j)) = v;
    }

    /// In-place handle to cell `(i, j)`, so update rules can rewrite it
    /// without re-indexing.
    pub fn cell_mut(&mut self, i: usize, j: usize) -> Result<&mut f64> {
        self.check(i)?;
        self.check(j)?;
        if i == j {
            return Err(Error::InvalidParameter {
                name: "cell",
                message: "the diagonal is virtual and cannot be rewritten",
            });
        }
        let (r, c) = if i < j { (i, j) } else { (j, i) };
        let at = offset(self.n, r, c);
        Ok(&mut self.data[at])
    }

    /// Unchecked variant of [`CondensedMatrix::cell_mut`].
    ///
    /// # Safety
    ///
    /// The caller must guarantee `i < j < n`.
    #[inline(always)]
    pub(crate) unsafe fn cell_unchecked_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        let at = offset(self.n, i, j);
        self.data.get_unchecked_mut(at)
    }

    /// Element-wise transform into a new matrix.
    pub fn map<F: FnMut(f64) -> f64>(&self, mut f: F) -> Self {
        Self {
            n: self.n,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Element-wise transform in place. `map_in_place(|x| x * x)` feeds the
    /// rules that operate on squared dissimilarities.
    pub fn map_in_place<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for x in &mut self.data {
            *x = f(*x);
        }
    }

    /// Restriction of the matrix to `indices`, in the given order.
    pub fn submatrix(&self, indices: &[usize]) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::EmptyInput);
        }
        for &i in indices {
            self.check(i)?;
        }
        let m = indices.len();
        let mut data = Vec::with_capacity(m * (m - 1) / 2);
        for a in 0..m {
            for b in (a + 1)..m {
                data.push(self.get(indices[a], indices[b])?);
            }
        }
        Ok(Self { n: m, data })
    }

    /// Index with the smallest average dissimilarity to all others, computed
    /// in a single pass over the upper triangle. Ties go to the smallest
    /// index.
    pub fn medoid(&self) -> usize {
        let mut sums = vec![0.0f64; self.n];
        let mut idx = 0;
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                let d = self.data[idx];
                sums[i] += d;
                sums[j] += d;
                idx += 1;
            }
        }
        let mut best = 0;
        for (i, &s) in sums.iter().enumerate() {
            if s < sums[best] {
                best = i;
            }
        }
        best
    }

    #[inline]
    fn check(&self, i: usize) -> Result<()> {
        if i >= self.n {
            return Err(Error::IndexOutOfRange {
                index: i,
                bound: self.n,
            });
        }
        Ok(())
    }
}

/// Solve `len == n(n-1)/2` for integer `n >= 2`.
fn triangle_side(len: usize) -> Option<usize> {
    let mut n = 2usize;
    loop {
        let t = n * (n - 1) / 2;
        if t == len {
            return Some(n);
        }
        if t > len {
            return None;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_layout() {
        // Side 4: row-major strict upper triangle.
        assert_eq!(offset(4, 0, 1), 0);
        assert_eq!(offset(4, 0, 2), 1);
        assert_eq!(offset(4, 0, 3), 2);
        assert_eq!(offset(4, 1, 2), 3);
        assert_eq!(offset(4, 1, 3), 4);
        assert_eq!(offset(4, 2, 3), 5);
    }

    #[test]
    fn test_from_fn_matches_generator() {
        let m = CondensedMatrix::from_fn(5, |i, j| (i * 10 + j) as f64).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                let want = if i == j {
                    0.0
                } else if i < j {
                    (i * 10 + j) as f64
                } else {
                    (j * 10 + i) as f64
                };
                assert_eq!(m.get(i, j).unwrap(), want, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_symmetry_and_zero_diagonal() {
        let m = CondensedMatrix::from_fn(6, |i, j| (i + j) as f64 * 0.5).unwrap();
        for i in 0..6 {
            assert_eq!(m.get(i, i).unwrap(), 0.0);
            for j in 0..6 {
                assert_eq!(m.get(i, j).unwrap(), m.get(j, i).unwrap());
            }
        }
    }

    #[test]
    fn test_from_fn_rejects_nan() {
        let err = CondensedMatrix::from_fn(3, |i, j| {
            if (i, j) == (1, 2) {
                f64::NAN
            } else {
                1.0
            }
        })
        .unwrap_err();
        assert_eq!(err, Error::NanDissimilarity { row: 1, col: 2 });
    }

    #[test]
    fn test_from_condensed_valid_lengths() {
        assert_eq!(CondensedMatrix::from_condensed(vec![1.0]).unwrap().n(), 2);
        assert_eq!(
            CondensedMatrix::from_condensed(vec![1.0; 6]).unwrap().n(),
            4
        );
        assert_eq!(
            CondensedMatrix::from_condensed(vec![1.0; 45]).unwrap().n(),
            10
        );
    }

    #[test]
    fn test_from_condensed_rejects_bad_lengths() {
        assert_eq!(
            CondensedMatrix::from_condensed(vec![]).unwrap_err(),
            Error::EmptyInput
        );
        for bad in [2, 4, 5, 7, 8, 9, 11] {
            assert_eq!(
                CondensedMatrix::from_condensed(vec![1.0; bad]).unwrap_err(),
                Error::NonTriangularLength { length: bad },
                "length {bad}"
            );
        }
    }

    #[test]
    fn test_set_and_diagonal_rules() {
        let mut m = CondensedMatrix::new(3).unwrap();
        m.set(2, 0, 4.5).unwrap();
        assert_eq!(m.get(0, 2).unwrap(), 4.5);

        m.set(1, 1, 0.0).unwrap();
        assert_eq!(
            m.set(1, 1, 0.1).unwrap_err(),
            Error::NonZeroDiagonal {
                index: 1,
                value: 0.1
            }
        );
    }

    #[test]
    fn test_out_of_range() {
        let m = CondensedMatrix::new(3).unwrap();
        assert_eq!(
            m.get(0, 3).unwrap_err(),
            Error::IndexOutOfRange { index: 3, bound: 3 }
        );
    }

    #[test]
    fn test_cell_mut_rewrites_in_place() {
        let mut m = CondensedMatrix::from_fn(3, |_, _| 2.0).unwrap();
        *m.cell_mut(2, 1).unwrap() = 7.0;
        assert_eq!(m.get(1, 2).unwrap(), 7.0);
    }

    #[test]
    fn test_map_in_place_squares() {
        let mut m = CondensedMatrix::from_condensed(vec![1.0, 2.0, 3.0]).unwrap();
        m.map_in_place(|x| x * x);
        assert_eq!(m.as_slice(), &[1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_map_leaves_original_alone() {
        let m = CondensedMatrix::from_condensed(vec![1.0, 2.0, 3.0]).unwrap();
        let doubled = m.map(|x| x * 2.0);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(doubled.as_slice(), &[2.0, 4.0, 6.0]);
        assert_eq!(doubled.n(), 3);
        assert_eq!(doubled.condensed_len(), 3);
    }

    #[test]
    fn test_submatrix() {
        // 4 points on a line, |i - j| distances.
        let m = CondensedMatrix::from_fn(4, |i, j| (j - i) as f64).unwrap();
        let s = m.submatrix(&[0, 2, 3]).unwrap();
        assert_eq!(s.n(), 3);
        assert_eq!(s.get(0, 1).unwrap(), 2.0); // d(0, 2)
        assert_eq!(s.get(0, 2).unwrap(), 3.0); // d(0, 3)
        assert_eq!(s.get(1, 2).unwrap(), 1.0); // d(2, 3)
    }

    #[test]
    fn test_medoid_is_most_central() {
        // Points on a line at 0, 1, 2, 3, 10: the median point (index 2)
        // minimizes the summed distance to the others.
        let pos: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 10.0];
        let m = CondensedMatrix::from_fn(5, |i, j| (pos[j] - pos[i]).abs()).unwrap();
        assert_eq!(m.medoid(), 2);
    }

    #[test]
    fn test_medoid_single_point() {
        let m = CondensedMatrix::new(1).unwrap();
        assert_eq!(m.medoid(), 0);
    }
}
