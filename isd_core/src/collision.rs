//! Birthday/meet-in-the-middle collision search over the two halves of the
//! error pattern (spec §4.J), ported from `original_source/dumer.c:
//! find_collisions`, `build_solution`. List1 holds the XOR of every
//! `p1`-subset of the first `n1` columns, sorted by its low `ell` bits so a
//! matching `p2`-subset of the remaining (plus `eps` overlap) columns can be
//! found by lookup instead of a second enumeration.

use crate::binsearch::{bin_search, Lut};
use crate::chase::ChaseSequence;
use crate::listbuilder::List1;
use std::sync::Mutex;

/// Static parameters of one collision search (spec §4.J).
#[derive(Clone, Copy, Debug)]
pub struct Params {
    pub p1: usize,
    pub p2: usize,
    pub ell_bits: u32,
    pub eps: usize,
    pub n1: usize,
    pub doom: bool,
    pub lw: bool,
}

/// List1 sorted by its low-`ell`-bit key, with a prefix LUT over it (spec
/// §4.H/§4.I — this is `shr->list1`/`list1_idx`/`list1_lut` combined).
#[derive(Clone, Debug)]
pub struct PreparedList1 {
    p1: usize,
    keys: Vec<u64>,
    /// `idx[i]` is the index into the *original* `List1` (pre-sort) that
    /// produced `keys[i]`.
    idx: Vec<usize>,
    pos: Vec<u16>,
    lut: Lut,
}

impl PreparedList1 {
    #[must_use]
    pub fn build(list1: &List1, ell_bits: u32, lut_bits: u32) -> Self {
        let mut keys = list1.keys.clone();
        let mut idx: Vec<usize> = (0..keys.len()).collect();
        let sort_bits = ((ell_bits.max(8) + 7) / 8) * 8;
        crate::radixsort::sort(&mut keys, &mut idx, sort_bits);
        let shift = ell_bits.saturating_sub(lut_bits);
        let lut = Lut::build(&keys, lut_bits, shift);
        Self { p1: list1.p, keys, idx, pos: list1.pos.clone(), lut }
    }

    #[inline]
    fn positions(&self, sorted_idx: usize) -> &[u16] {
        let orig = self.idx[sorted_idx];
        &self.pos[orig * self.p1..(orig + 1) * self.p1]
    }
}

/// The accepted error pattern: which list1 entry, which list2 (Chase)
/// combination, and (DOOM only) which cyclic shift produced it.
#[derive(Clone, Debug)]
pub struct Solution {
    pub weight: usize,
    pub list1_sorted_idx: usize,
    pub combo_idx: usize,
    pub shift: usize,
    pub test_syndrome: Vec<u64>,
}

#[inline]
fn xor_inplace(dst: &mut [u64], src: &[u64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Precompute the XOR of `columns2` pairs at distance 1 and distance 2
/// (spec §4.J step 1, `original_source/dumer.c: find_collisions`'s two
/// `xor_avx1` warm-up loops). Entry `i` (for `i < n - 1`) is columns `i` ^
/// `i+1`; entries `n-1 .. n-1+n-2` are columns `i` ^ `i+2`.
#[must_use]
pub fn xor_pairs_table(columns2: &[Vec<u64>], words: usize) -> Vec<Vec<u64>> {
    let n = columns2.len();
    let mut table = Vec::with_capacity(n.saturating_sub(1) + n.saturating_sub(2));
    for i in 0..n.saturating_sub(1) {
        let mut z = vec![0u64; words];
        crate::bitops::xor1(&columns2[i], &columns2[i + 1], &mut z);
        table.push(z);
    }
    for i in 0..n.saturating_sub(2) {
        let mut z = vec![0u64; words];
        crate::bitops::xor1(&columns2[i], &columns2[i + 2], &mut z);
        table.push(z);
    }
    table
}

/// Reconcile the popcount of `test_syndrome`'s high bits with the actual
/// number of distinct physical columns flipped by the union of the two
/// subsets, since a column named by both subsets cancels rather than
/// counting twice (spec §4.J step 5, `dumer.c: find_collisions`'s merge
/// loop). `pos1`/`pos2` must be ascending.
fn reconcile_weight(mut pc: usize, pos1: &[usize], pos2: &[usize]) -> usize {
    let (mut a1, mut a2) = (0, 0);
    while a1 < pos1.len() && a2 < pos2.len() {
        match pos1[a1].cmp(&pos2[a2]) {
            std::cmp::Ordering::Less => {
                pc += 1;
                a1 += 1;
            }
            std::cmp::Ordering::Greater => {
                pc += 1;
                a2 += 1;
            }
            std::cmp::Ordering::Equal => {
                a1 += 1;
                a2 += 1;
            }
        }
    }
    pc + (pos1.len() - a1) + (pos2.len() - a2)
}

/// Run one full sweep of the Chase sequence over list2, probing list1 for a
/// collision at every step (and, for DOOM, every cyclic shift). Returns the
/// first solution found for SD/QC/GO; for LW keeps scanning after an accept,
/// tightening `w_target` via `w_best`, and returns the best found.
#[allow(clippy::too_many_arguments)]
pub fn find_collisions(
    params: &Params,
    words: usize,
    list1: &PreparedList1,
    columns1_full: &[Vec<u64>],
    columns2_full: &[Vec<u64>],
    combos2: &ChaseSequence,
    xor_pairs: &[Vec<u64>],
    s_full: &[Vec<u64>],
    mut w_target: usize,
    w_best: Option<&Mutex<usize>>,
) -> Option<Solution> {
    let mask: u64 = if params.ell_bits >= 64 { u64::MAX } else { (1u64 << params.ell_bits) - 1 };

    let initial_positions: Vec<usize> = combos2.subset(0).iter().map(|&c| c as usize).collect();
    let mut combo_buf = vec![0u64; words];
    fan_in_columns(columns2_full, &initial_positions, &mut combo_buf);

    let mut nosyndrome = combo_buf.clone();
    let mut current = vec![0u64; words];
    if !params.doom {
        crate::bitops::xor1(&nosyndrome, &s_full[0], &mut current);
    }

    let mut test_syndrome = vec![0u64; words];
    let mut best: Option<Solution> = None;

    for n in 0..combos2.len() {
        if n > 0 {
            let diff_idx = combos2.diff[n] as usize;
            xor_inplace(&mut nosyndrome, &xor_pairs[diff_idx]);
            if !params.doom {
                xor_inplace(&mut current, &xor_pairs[diff_idx]);
            }
        }

        let shifts: Box<dyn Iterator<Item = usize>> =
            if params.doom { Box::new(0..s_full.len()) } else { Box::new(std::iter::once(0)) };

        for shift in shifts {
            let current_syndrome: &[u64] = if params.doom {
                crate::bitops::xor1(&nosyndrome, &s_full[shift], &mut current);
                &current
            } else {
                &current
            };

            let s_low = current_syndrome[0] & mask;
            let (lo, hi) = list1.lut.bucket(s_low);
            let mut idx_list = lo + bin_search(&list1.keys[lo..hi], s_low);

            while idx_list < list1.keys.len() && list1.keys[idx_list] == s_low {
                let pos1 = list1.positions(idx_list);
                let mut inputs: Vec<&[u64]> = Vec::with_capacity(pos1.len() + 1);
                inputs.push(current_syndrome);
                for &p in pos1 {
                    inputs.push(&columns1_full[p as usize]);
                }
                crate::bitops::xor_fan_in(&inputs, &mut test_syndrome);

                let pc = crate::bitops::popcount_bounded(&test_syndrome, words, w_target as u64) as usize;
                let pc = if pc <= w_target {
                    let mut pos1_ascending: Vec<usize> = pos1.iter().map(|&p| p as usize).collect();
                    pos1_ascending.sort_unstable();
                    let mut pos2_ascending: Vec<usize> = combos2
                        .subset(n)
                        .iter()
                        .map(|&c| c as usize + params.n1 - params.eps)
                        .collect();
                    pos2_ascending.sort_unstable();
                    reconcile_weight(pc, &pos1_ascending, &pos2_ascending)
                } else {
                    pc
                };

                if pc > 0 && pc <= w_target {
                    let accept = if params.lw {
                        match w_best {
                            Some(lock) => {
                                let mut guard = lock.lock().expect("w_best lock poisoned");
                                if pc >= *guard {
                                    w_target = guard.saturating_sub(1);
                                    false
                                } else {
                                    *guard = pc;
                                    w_target = pc - 1;
                                    true
                                }
                            }
                            None => {
                                w_target = pc - 1;
                                true
                            }
                        }
                    } else {
                        true
                    };

                    if accept {
                        let solution = Solution {
                            weight: pc,
                            list1_sorted_idx: idx_list,
                            combo_idx: n,
                            shift,
                            test_syndrome: test_syndrome.clone(),
                        };
                        if !params.lw {
                            return Some(solution);
                        }
                        best = Some(solution);
                    }
                }
                idx_list += 1;
            }
        }
    }
    best
}

#[inline]
fn fan_in_columns(columns: &[Vec<u64>], positions: &[usize], out: &mut [u64]) {
    out.fill(0);
    for &p in positions {
        xor_inplace(out, &columns[p]);
    }
}

/// Reconstruct the length-`n` codeword from an accepted [`Solution`] (spec
/// §4.J step 6, `dumer.c: build_solution`). `perm` is the column permutation
/// applied before elimination; `left = r - ell_bits` is where the
/// free-column block begins.
#[allow(clippy::too_many_arguments)]
pub fn build_solution(
    n: usize,
    r: usize,
    n1: usize,
    eps: usize,
    left: usize,
    perm: &[usize],
    list1: &PreparedList1,
    combos2: &ChaseSequence,
    solution: &Solution,
) -> Vec<u8> {
    let mut out = vec![0u8; n];
    let shift = solution.shift;
    let shifted = |column_permuted: usize| -> usize {
        column_permuted / r * r + (column_permuted + r - shift) % r
    };

    for &col in list1.positions(solution.list1_sorted_idx) {
        let column_permuted = perm[left + col as usize];
        out[shifted(column_permuted)] ^= 1;
    }
    for &col in combos2.subset(solution.combo_idx) {
        let column_permuted = perm[left + col as usize + n1 - eps];
        out[shifted(column_permuted)] ^= 1;
    }
    for (column, word) in solution.test_syndrome.iter().enumerate().flat_map(|(w, &word)| {
        (0..64).map(move |b| (w * 64 + b, (word >> b) & 1))
    }) {
        if column < r && word != 0 {
            let column_permuted = perm[r - 1 - column];
            out[shifted(column_permuted)] ^= 1;
        }
    }
    out
}
