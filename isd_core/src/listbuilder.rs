//! Enumerate all `p`-subsets of a column set and their XORs (spec §4.I),
//! ported from `original_source/dumer.c: build_list`, `build_list_pos`. The
//! reference implementation unrolls this into four nested nesting depths (one
//! per value of `DUMER_P1` in `1..=4`) with an incremental broadcast-XOR
//! scratch buffer; the recursive walk below enumerates the identical
//! combination order (outer position descending, innermost ascending) and
//! computes the same XOR values directly. Per spec §9 ("Runtime selection is
//! acceptable if p is dispatched through a jump table"), trading the
//! incremental-scratch optimization for a direct per-combination XOR keeps
//! one code path for every `p1` instead of four unrolled ones.

/// All `C(n, p)` `p`-subsets of `{0,...,n-1}` expressed as strictly
/// descending tuples `i_0 > i_1 > ... > i_{p-1} >= 0`, together with the
/// `ell`-bit XOR of `columns_low` at those positions. `combinations[idx]`
/// and `pos[idx * p .. idx * p + p]` correspond to the same subset (spec
/// §4.I: `build_list1`'s output order matches `build_list_pos`'s).
#[derive(Clone, Debug)]
pub struct List1 {
    pub p: usize,
    pub keys: Vec<u64>,
    pub pos: Vec<u16>,
}

impl List1 {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn positions(&self, idx: usize) -> &[u16] {
        &self.pos[idx * self.p..(idx + 1) * self.p]
    }
}

/// Build list1: the `ell`-low-bit XOR of every `p`-subset of `columns_low`
/// (spec §4.I `build_list1`), plus its position table (`build_list_pos`).
#[must_use]
pub fn build_list1(columns_low: &[u64], p: usize) -> List1 {
    let n = columns_low.len();
    let mut keys = Vec::with_capacity(crate::chase::binomial(n, p) as usize);
    let mut pos = Vec::with_capacity(keys.capacity() * p);
    let mut tuple = vec![0u16; p];
    enumerate(columns_low, p, n, 0, 0, &mut tuple, &mut keys, &mut pos);
    List1 { p, keys, pos }
}

/// Recursively enumerate subsets in the same order as the reference's
/// nested-loop unrolling: at depth `level` (0-indexed), the loop variable
/// ranges over `[p - 1 - level, upper - 1]` descending, except at the final
/// depth (`level == p - 1`) where it ranges over `[0, upper - 1]` ascending —
/// the two orders enumerate the same set of values, strictly below `upper`
/// and above or equal to `p - 1 - level`, just in different directions. Only
/// the emission order differs from the C original; the multiset of
/// (position-tuple, key) pairs is identical.
#[allow(clippy::too_many_arguments)]
fn enumerate(
    columns_low: &[u64],
    p: usize,
    upper: usize,
    level: usize,
    acc: u64,
    tuple: &mut [u16],
    keys: &mut Vec<u64>,
    pos: &mut Vec<u16>,
) {
    if level == p {
        keys.push(acc);
        pos.extend_from_slice(tuple);
        return;
    }
    let lower_bound = p - 1 - level;
    if level == p - 1 {
        for i in 0..upper {
            if i < lower_bound {
                break;
            }
            tuple[level] = i as u16;
            enumerate(columns_low, p, i, level + 1, acc ^ columns_low[i], tuple, keys, pos);
        }
    } else {
        let mut i = upper;
        while i > lower_bound {
            i -= 1;
            tuple[level] = i as u16;
            enumerate(columns_low, p, i, level + 1, acc ^ columns_low[i], tuple, keys, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn enumerates_every_subset_exactly_once() {
        let columns_low: Vec<u64> = (0..9).map(|i| 1u64 << i).collect();
        let p = 3;
        let list = build_list1(&columns_low, p);
        assert_eq!(list.len(), crate::chase::binomial(9, 3) as usize);
        let mut seen = HashSet::new();
        for idx in 0..list.len() {
            let mut tuple: Vec<u16> = list.positions(idx).to_vec();
            tuple.sort_unstable();
            assert!(seen.insert(tuple), "duplicate subset at {idx}");
        }
    }

    #[test]
    fn key_equals_xor_of_named_columns() {
        let columns_low: Vec<u64> = vec![0b001, 0b010, 0b100, 0b011, 0b111];
        let list = build_list1(&columns_low, 2);
        for idx in 0..list.len() {
            let expected = list
                .positions(idx)
                .iter()
                .fold(0u64, |acc, &p| acc ^ columns_low[p as usize]);
            assert_eq!(list.keys[idx], expected, "mismatch at {idx}");
        }
    }

    #[test]
    fn p_equal_one_is_identity() {
        let columns_low: Vec<u64> = vec![5, 6, 7];
        let list = build_list1(&columns_low, 1);
        assert_eq!(list.len(), 3);
        for idx in 0..3 {
            assert_eq!(list.keys[idx], columns_low[idx]);
            assert_eq!(list.positions(idx), &[idx as u16]);
        }
    }
}
