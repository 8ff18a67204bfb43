//! Intrusive doubly-linked list over the still-active cluster indices.
//!
//! Every linkage algorithm keeps shrinking a set of live indices drawn from
//! `0..n`. A tombstoned array would work, but the intrusive links give O(1)
//! arbitrary deletion plus cache-friendly forward iteration, and the chain
//! stays sorted for free because indices are only ever removed.
//!
//! The pred/succ arrays have `n + 1` slots so that splicing out the last
//! element can write `pred[n]` without a branch; that slot is never read.
//! `succ[i] == 0` doubles as the tombstone (index 0 is never anyone's
//! successor).

use crate::error::{Error, Result};
use crate::matrix::CondensedMatrix;

/// Set of still-unmerged cluster indices in `0..n`.
#[derive(Debug)]
pub(crate) struct ActiveList {
    n: usize,
    /// Smallest live index; `n` once the list is empty.
    start: usize,
    pred: Vec<usize>,
    succ: Vec<usize>,
}

impl ActiveList {
    /// Construct with every index in `0..n` live.
    pub(crate) fn new(n: usize) -> Self {
        let mut pred = vec![0; n + 1];
        let mut succ = vec![0; n + 1];
        for i in 0..n {
            succ[i] = i + 1;
            pred[i + 1] = i;
        }
        Self {
            n,
            start: 0,
            pred,
            succ,
        }
    }

    /// True iff `i` has not been deleted.
    #[inline]
    pub(crate) fn contains(&self, i: usize) -> bool {
        i < self.n && self.succ[i] != 0
    }

    /// Smallest live index.
    #[inline]
    pub(crate) fn first(&self) -> Option<usize> {
        if self.start < self.n {
            Some(self.start)
        } else {
            None
        }
    }

    /// Smallest live index, or [`Error::EmptyInput`] if none remain.
    pub(crate) fn first_or_error(&self) -> Result<usize> {
        self.first().ok_or(Error::EmptyInput)
    }

    /// Remove `i` in O(1). Already-absent indices are silently ignored.
    pub(crate) fn delete(&mut self, i: usize) {
        if !self.contains(i) {
            return;
        }
        if i == self.start {
            self.start = self.succ[i];
        } else {
            let p = self.pred[i];
            let s = self.succ[i];
            self.succ[p] = s;
            self.pred[s] = p;
        }
        self.succ[i] = 0;
    }

    /// Live indices in ascending order.
    pub(crate) fn iter(&self) -> ActiveIter<'_> {
        ActiveIter {
            list: self,
            cur: self.start,
            end: self.n,
        }
    }

    /// Live indices in ascending order, skipping `i`.
    pub(crate) fn iter_omit(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.iter().filter(move |&k| k != i)
    }

    /// Live indices within `range`, in ascending order, with the first
    /// `skip` matches dropped.
    pub(crate) fn iter_within(
        &self,
        range: core::ops::Range<usize>,
        skip: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let end = range.end.min(self.n);
        let mut cur = range.start;
        while cur < end && !self.contains(cur) {
            cur += 1;
        }
        if cur >= end {
            cur = self.n;
        }
        ActiveIter {
            list: self,
            cur,
            end,
        }
        .skip(skip)
    }

    /// Live index (other than `i`) minimizing `f`, together with the
    /// minimum. Monotone `<` means ties go to the smallest index.
    pub(crate) fn nearest_to<F>(&self, i: usize, mut f: F) -> Option<(usize, f64)>
    where
        F: FnMut(usize) -> f64,
    {
        let mut best: Option<(usize, f64)> = None;
        for k in self.iter_omit(i) {
            let d = f(k);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((k, d)),
            }
        }
        best
    }

    /// Matrix overload of [`ActiveList::nearest_to`]: scans `matrix[i, k]`
    /// over live `k != i`, passing each raw cell through `transform` before
    /// comparison.
    ///
    /// The transformer sees `(k, raw)` and returns the value to rank; MST
    /// threads its running component-minimum update through it.
    pub(crate) fn nearest_in<F>(
        &self,
        i: usize,
        matrix: &CondensedMatrix,
        mut transform: F,
    ) -> Option<(usize, f64)>
    where
        F: FnMut(usize, f64) -> f64,
    {
        debug_assert!(i < matrix.n());
        self.nearest_to(i, |k| {
            let raw = if i < k {
                unsafe { matrix.get_unchecked(i, k) }
            } else {
                unsafe { matrix.get_unchecked(k, i) }
            };
            transform(k, raw)
        })
    }
}

/// Forward iterator over live indices.
pub(crate) struct ActiveIter<'a> {
    list: &'a ActiveList,
    cur: usize,
    end: usize,
}

impl Iterator for ActiveIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.cur >= self.end {
            return None;
        }
        let at = self.cur;
        self.cur = self.list.succ[at];
        Some(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &ActiveList) -> Vec<usize> {
        list.iter().collect()
    }

    #[test]
    fn test_starts_full() {
        let list = ActiveList::new(5);
        assert_eq!(collect(&list), vec![0, 1, 2, 3, 4]);
        assert_eq!(list.first(), Some(0));
        assert!(list.contains(0) && list.contains(4));
    }

    #[test]
    fn test_delete_middle_and_last() {
        let mut list = ActiveList::new(5);
        list.delete(2);
        list.delete(4);
        assert_eq!(collect(&list), vec![0, 1, 3]);
        assert!(!list.contains(2));
        assert!(!list.contains(4));
    }

    #[test]
    fn test_delete_start_advances() {
        let mut list = ActiveList::new(4);
        list.delete(0);
        assert_eq!(list.first(), Some(1));
        list.delete(1);
        assert_eq!(list.first(), Some(2));
        assert_eq!(collect(&list), vec![2, 3]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut list = ActiveList::new(3);
        list.delete(1);
        list.delete(1);
        assert_eq!(collect(&list), vec![0, 2]);
    }

    #[test]
    fn test_delete_all() {
        let mut list = ActiveList::new(3);
        for i in [1, 0, 2] {
            list.delete(i);
        }
        assert_eq!(collect(&list), Vec::<usize>::new());
        assert_eq!(list.first(), None);
        assert!(list.first_or_error().is_err());
    }

    #[test]
    fn test_iter_omit() {
        let mut list = ActiveList::new(5);
        list.delete(3);
        let got: Vec<usize> = list.iter_omit(1).collect();
        assert_eq!(got, vec![0, 2, 4]);
    }

    #[test]
    fn test_iter_within_range_and_skip() {
        let mut list = ActiveList::new(8);
        list.delete(2);
        list.delete(5);
        let got: Vec<usize> = list.iter_within(1..6, 0).collect();
        assert_eq!(got, vec![1, 3, 4]);
        // skip=1 advances past the first match, excluding a pivot cleanly.
        let got: Vec<usize> = list.iter_within(3..8, 1).collect();
        assert_eq!(got, vec![4, 6, 7]);
        // Range whose start is deleted probes forward to the next live index.
        let got: Vec<usize> = list.iter_within(2..4, 0).collect();
        assert_eq!(got, vec![3]);
    }

    #[test]
    fn test_nearest_to_smallest_index_wins_ties() {
        let list = ActiveList::new(4);
        let d = [5.0, 2.0, 2.0, 9.0];
        assert_eq!(list.nearest_to(3, |k| d[k]), Some((1, 2.0)));
    }

    #[test]
    fn test_nearest_in_matrix() {
        let m = CondensedMatrix::from_condensed(vec![1.0, 2.0, 3.0, 1.5, 2.5, 0.5]).unwrap();
        let mut list = ActiveList::new(4);
        // Nearest to 0 among {1, 2, 3}.
        assert_eq!(list.nearest_in(0, &m, |_, d| d), Some((1, 1.0)));
        list.delete(1);
        assert_eq!(list.nearest_in(0, &m, |_, d| d), Some((2, 2.0)));
    }

    #[test]
    fn test_nearest_in_transformer_sees_every_live_cell() {
        let m = CondensedMatrix::from_condensed(vec![4.0, 1.0, 3.0, 2.0, 5.0, 6.0]).unwrap();
        let mut list = ActiveList::new(4);
        list.delete(0);
        let mut seen = Vec::new();
        let got = list.nearest_in(1, &m, |k, d| {
            seen.push((k, d));
            d
        });
        assert_eq!(seen, vec![(2, 2.0), (3, 5.0)]);
        assert_eq!(got, Some((2, 2.0)));
    }
}
