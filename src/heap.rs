//! Indexed binary min-heap with mutable priorities.
//!
//! A plain `BinaryHeap` cannot lower the priority of an element already
//! inside it, which is exactly what the generic linkage algorithm needs on
//! every merge. This heap keeps a position map `pos[id] -> slot` alongside
//! the heap array so any id's priority can be rewritten and re-sifted in
//! O(log n).
//!
//! Ids are `0..n` and each is popped at most once; a popped id is masked out
//! and further queries against it are a domain violation.

use crate::error::{Error, Result};

/// Priority queue over ids `0..n` with priority-update support.
#[derive(Debug)]
pub(crate) struct IndexHeap {
    /// Heap array of ids, min at slot 0.
    heap: Vec<usize>,
    /// `pos[id]` is the heap slot of `id`; stale once `id` is popped.
    pos: Vec<usize>,
    /// Current priority per id.
    prio: Vec<f64>,
    /// False once an id has been popped.
    live: Vec<bool>,
}

impl IndexHeap {
    /// Build from a priority generator in O(n) by sifting down from the
    /// last interior node.
    pub(crate) fn from_fn<F: FnMut(usize) -> f64>(n: usize, mut priority: F) -> Self {
        let mut h = Self {
            heap: (0..n).collect(),
            pos: (0..n).collect(),
            prio: (0..n).map(&mut priority).collect(),
            live: vec![true; n],
        };
        for slot in (0..n / 2).rev() {
            h.sift_down(slot);
        }
        h
    }

    /// Number of ids still in the heap.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Top id without removal.
    #[inline]
    pub(crate) fn peek(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    /// Remove and return the top id, masking it out.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        let top = *self.heap.first()?;
        let last = self.heap.pop().expect("non-empty heap has a last slot");
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.pos[last] = 0;
            self.sift_down(0);
        }
        self.live[top] = false;
        Some(top)
    }

    /// Current priority of `i`. Popped ids are a domain violation.
    pub(crate) fn priority_of(&self, i: usize) -> Result<f64> {
        self.check(i)?;
        Ok(self.prio[i])
    }

    /// Rewrite the priority of `i` and restore the heap invariant: sift up
    /// on a decrease, down on an increase.
    pub(crate) fn set_priority(&mut self, i: usize, p: f64) -> Result<()> {
        self.check(i)?;
        let old = self.prio[i];
        self.prio[i] = p;
        let slot = self.pos[i];
        if p < old {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
        Ok(())
    }

    /// Heap-order snapshot of the ids.
    #[cfg(test)]
    pub(crate) fn to_vec(&self) -> Vec<usize> {
        self.heap.clone()
    }

    #[inline]
    fn check(&self, i: usize) -> Result<()> {
        if i >= self.prio.len() {
            return Err(Error::IndexOutOfRange {
                index: i,
                bound: self.prio.len(),
            });
        }
        if !self.live[i] {
            return Err(Error::Inactive { index: i });
        }
        Ok(())
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.prio[self.heap[a]] < self.prio[self.heap[b]]
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos[self.heap[a]] = a;
        self.pos[self.heap[b]] = b;
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let mut child = 2 * slot + 1;
            if child >= len {
                break;
            }
            if child + 1 < len && self.less(child + 1, child) {
                child += 1;
            }
            if !self.less(child, slot) {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }
}
