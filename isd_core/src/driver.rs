//! One ISD iteration (spec §4.K), grounded on `original_source/dumer.c:
//! dumer`, `choose_is`, `get_columns_H_prime(_avx)`, `build_solution`.

use std::sync::Mutex;

use crate::bitmatrix::{avx_padded_words, BitMatrix};
use crate::chase::chase;
use crate::collision::{self, Params as CollisionParams, PreparedList1};
use crate::gauss::echelonize_partial;
use crate::graycode::GrayTables;
use crate::listbuilder::build_list1;
use crate::params::{DOOM, EPS, L, LUT_BITS, LW, MAX_K, P1, P2};
use crate::problem::Problem;
use crate::random::Xoroshiro128Plus;

/// The codeword found, if any, plus its Hamming weight.
#[derive(Clone, Debug)]
pub struct IterationResult {
    pub codeword: Vec<u8>,
    pub weight: usize,
}

/// Mark `count` distinct random column indices with rejection sampling, then
/// swap columns (and the parallel permutation array) so the marked set
/// occupies `[0, count)` (spec §4.K step 1 — explicitly not Fisher-Yates).
fn randomize_information_set(
    a: &mut BitMatrix,
    perm: &mut [usize],
    count: usize,
    rng: &mut Xoroshiro128Plus,
) {
    let n = perm.len();
    let mut marked = vec![false; n];
    let mut picked = 0usize;
    while picked < count {
        let idx = rng.range((n - 1) as u64) as usize;
        if !marked[idx] {
            marked[idx] = true;
            picked += 1;
        }
    }
    let mut scan = count;
    for i in 0..count {
        if marked[i] {
            continue;
        }
        while scan < n && !marked[scan] {
            scan += 1;
        }
        a.swap_cols(i, scan);
        perm.swap(i, scan);
        marked.swap(i, scan);
        scan += 1;
    }
}

/// Copy rows `[start, start + count)` of `m` into AVX-padded buffers (spec
/// §4.C padding contract; `dumer.c: get_columns_H_prime_avx`'s output
/// layout).
fn extract_padded_rows(m: &BitMatrix, start: usize, count: usize) -> Vec<Vec<u64>> {
    let words = avx_padded_words(m.cols());
    (start..start + count)
        .map(|r| {
            let mut buf = vec![0u64; words];
            let src = m.row(r);
            buf[..src.len()].copy_from_slice(src);
            buf
        })
        .collect()
}

/// Run one full ISD iteration: randomize + reduce the information set,
/// extract the split columns, build and sort list1, then hand off to the
/// collision engine. Returns `None` when no candidate of weight `<=
/// problem.w()` (or, for LW, `<= n`) was found this iteration.
pub fn run_iteration(
    problem: &Problem,
    rng: &mut Xoroshiro128Plus,
    gray_tables: &GrayTables,
    w_best: Option<&Mutex<usize>>,
) -> Option<IterationResult> {
    let n = problem.n();
    let k = problem.k();
    let r = problem.r();
    let ell = L.min(r);
    let doom = DOOM && problem.variant() == crate::variant::Variant::Qc;
    let lw = LW && problem.variant() == crate::variant::Variant::Lw;

    let half1 = (k + ell) / 2;
    let half2 = (k + ell) - half1;
    let rstop = r - ell;

    let mut a = problem.build_working_matrix(doom);
    let mut perm: Vec<usize> = (0..n).collect();

    loop {
        randomize_information_set(&mut a, &mut perm, rstop, rng);
        let block = (MAX_K.min(rstop.max(1))).max(1);
        let rank = echelonize_partial(&mut a, rstop, block, gray_tables);
        if rank == rstop {
            break;
        }
    }

    // Transpose so row j of `transposed` is column j of `a`, bit i = a[r-1-i][j].
    let transposed = a.transpose_rev_rows();

    let off1 = r - ell;
    let off2 = off1 + half1 - EPS;
    let words = avx_padded_words(r);

    let mask: u64 = if ell >= 64 { u64::MAX } else { (1u64 << ell) - 1 };
    let columns1_low: Vec<u64> = (0..half1 + EPS)
        .map(|i| transposed.row(off1 + i)[0] & mask)
        .collect();
    let columns1_full = extract_padded_rows(&transposed, off1, half1 + EPS);
    let columns2_full = extract_padded_rows(&transposed, off2, half2 + EPS);

    let s_full = if problem.variant() == crate::variant::Variant::Lw {
        vec![vec![0u64; words]]
    } else if doom {
        extract_padded_rows(&transposed, n, k)
    } else {
        extract_padded_rows(&transposed, n, 1)
    };

    let list1 = build_list1(&columns1_low, P1);
    let prepared1 = PreparedList1::build(&list1, ell as u32, LUT_BITS as u32);
    let combos2 = chase(half2 + EPS, P2);
    let xor_pairs = collision::xor_pairs_table(&columns2_full, words);

    let w_target = if lw { n } else { problem.w() };
    let params = CollisionParams {
        p1: P1,
        p2: P2,
        ell_bits: ell as u32,
        eps: EPS,
        n1: half1,
        doom,
        lw,
    };

    let solution = collision::find_collisions(
        &params,
        words,
        &prepared1,
        &columns1_full,
        &columns2_full,
        &combos2,
        &xor_pairs,
        &s_full,
        w_target,
        w_best,
    )?;

    let left = r - ell;
    let codeword = collision::build_solution(n, r, half1, EPS, left, &perm, &prepared1, &combos2, &solution);
    Some(IterationResult { codeword, weight: solution.weight })
}
