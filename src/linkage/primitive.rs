//! Reference cubic-time linkage.
//!
//! The textbook algorithm: scan every live pair for the global minimum,
//! merge it, rewrite the survivor's row, repeat. Θ(n³) and useless at
//! scale, but its correctness is self-evident, which makes it the oracle
//! the sub-cubic algorithms are checked against.

use crate::active::ActiveList;
use crate::dendrogram::Dendrogram;
use crate::error::Result;
use crate::matrix::CondensedMatrix;

use super::method::Linkage;

/// Dendrogram by exhaustive minimum-pair search; any rule.
pub fn primitive(mut matrix: CondensedMatrix, method: Linkage) -> Result<Dendrogram> {
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

    for _ in 0..n - 1 {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in active.iter() {
            for k in active.iter_within(i + 1..n, 0) {
                let d = unsafe { matrix.get_unchecked(i, k) };
                match best {
                    Some((_, _, bd)) if d >= bd => {}
                    _ => best = Some((i, k, d)),
                }
            }
        }
        let (a, b, d_ab) = best.expect("at least two clusters remain before each merge");
        out.push(a, b, if squared { d_ab.sqrt() } else { d_ab });

        let (size_a, size_b) = (size[a], size[b]);
        active.delete(a);
        for k in active.iter_within(0..a, 0) {
            let d_ak = unsafe { matrix.get_unchecked(k, a) };
            let cell = unsafe { matrix.cell_unchecked_mut(k, b) };
            method.update(d_ab, d_ak, cell, size_a, size_b, size[k]);
        }
        for k in active.iter_within(a + 1..b, 0) {
            let d_ak = unsafe { matrix.get_unchecked(a, k) };
            let cell = unsafe { matrix.cell_unchecked_mut(k, b) };
            method.update(d_ab, d_ak, cell, size_a, size_b, size[k]);
        }
        for k in active.iter_within(b + 1..n, 0) {
            let d_ak = unsafe { matrix.get_unchecked(a, k) };
            let cell = unsafe { matrix.cell_unchecked_mut(b, k) };
            method.update(d_ab, d_ak, cell, size_a, size_b, size[k]);
        }
        size[b] += size[a];
    }

    out.relabel(!method.order_dependent())
}
