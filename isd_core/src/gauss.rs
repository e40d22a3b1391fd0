//! Method-of-four-Russians partial Gaussian elimination (spec §4.E), ported
//! from `original_source/dumer.c: choose_is`/`fisher_yates_m4ri`'s inner
//! reduction loop. Columns are processed in blocks of up to `k` at a time:
//!
//! 1. `gauss_submatrix` — pivot and locally reduce the block's own `k`
//!    columns against just the block's pivot rows.
//! 2. `make_table` — precompute the XOR of every subset of the block's
//!    pivot rows, built in Gray-code order so each table entry costs one row
//!    XOR instead of up to `k`.
//! 3. `process_rows` — for every row outside the block, look up its `k`-bit
//!    pattern over the block's columns and XOR in the one table entry that
//!    clears them, instead of up to `k` separate row operations.

use crate::bitmatrix::BitMatrix;
use crate::graycode::GrayTables;
use crate::params::MAX_K;

#[inline]
fn xor_row_into(mat: &mut BitMatrix, src: &[u64], dst: usize) {
    for (w, s) in mat.row_mut(dst).iter_mut().zip(src) {
        *w ^= s;
    }
}

/// Partially echelonize `mat` over its first `rstop` columns, in blocks of
/// at most `max_block` (clamped to [`MAX_K`]) columns. Returns the rank
/// actually achieved over those columns: a return value below
/// `rstop.min(mat.rows())` means some column in `[0, rstop)` had no
/// remaining pivot row (the caller's chosen information set was not full
/// rank there and must retry with a different permutation, spec §4.E /
/// `choose_is`'s retry loop).
#[must_use]
pub fn echelonize_partial(
    mat: &mut BitMatrix,
    rstop: usize,
    max_block: usize,
    gray_tables: &GrayTables,
) -> usize {
    let rows = mat.rows();
    let rstop = rstop.min(mat.cols());
    let max_block = max_block.min(MAX_K).max(1);

    let mut rank = 0usize;
    let mut col = 0usize;
    while col < rstop && rank < rows {
        let block = max_block.min(rstop - col);
        let mut pivot_cols: Vec<usize> = Vec::with_capacity(block);
        let mut pivot_rows: Vec<usize> = Vec::with_capacity(block);

        // Step 1: gauss_submatrix.
        for c in col..col + block {
            let found = (rank..rows).find(|&r| mat.get(r, c));
            let Some(r) = found else { continue };
            mat.swap_rows(r, rank);

            // Clean the new pivot row against earlier pivot columns in this
            // block, then clean earlier pivot rows against this column.
            for (bi, &pc) in pivot_cols.iter().enumerate() {
                if mat.get(rank, pc) {
                    let earlier = mat.row(pivot_rows[bi]).to_vec();
                    xor_row_into(mat, &earlier, rank);
                }
            }
            let pivot_row = mat.row(rank).to_vec();
            for &pr in &pivot_rows {
                if mat.get(pr, c) {
                    xor_row_into(mat, &pivot_row, pr);
                }
            }

            pivot_cols.push(c);
            pivot_rows.push(rank);
            rank += 1;
        }

        let block_rank = pivot_rows.len();
        if block_rank == 0 {
            col += block;
            continue;
        }

        // Step 2: make_table, built incrementally in Gray-code order.
        let gt = gray_tables.get(block_rank);
        let wpr = mat.row(0).len();
        let table_size = 1usize << block_rank;
        let mut table: Vec<Vec<u64>> = vec![vec![0u64; wpr]; table_size];
        let mut prev_pattern = 0usize;
        for idx in 1..table_size {
            let pattern = idx ^ (idx >> 1);
            let bit = gt.diff(idx);
            let pivot_row = mat.row(pivot_rows[bit]).to_vec();
            let mut entry = table[prev_pattern].clone();
            for (w, s) in entry.iter_mut().zip(&pivot_row) {
                *w ^= s;
            }
            table[pattern] = entry;
            prev_pattern = pattern;
        }

        // Step 3: process_rows.
        let pivot_start = rank - block_rank;
        for r in 0..rows {
            if r >= pivot_start && r < rank {
                continue;
            }
            let mut pattern = 0usize;
            for (bi, &c) in pivot_cols.iter().enumerate() {
                if mat.get(r, c) {
                    pattern |= 1 << bi;
                }
            }
            if pattern != 0 {
                let combo = &table[pattern];
                for (w, s) in mat.row_mut(r).iter_mut().zip(combo) {
                    *w ^= s;
                }
            }
        }

        col += block;
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_submatrix_holds(mat: &BitMatrix, rank: usize) -> bool {
        for col in 0..rank {
            let ones: Vec<usize> = (0..mat.rows()).filter(|&r| mat.get(r, col)).collect();
            if ones != [col] {
                return false;
            }
        }
        true
    }

    #[test]
    fn full_rank_square_matrix_reduces_to_identity() {
        // A simple full-rank 6x6 matrix: lower-triangular-plus-diagonal.
        let mut mat = BitMatrix::allocate(6, 6);
        for r in 0..6 {
            mat.set(r, r, true);
            if r > 0 {
                mat.set(r, r - 1, true);
            }
        }
        let gray = GrayTables::build_all();
        for block in [1usize, 2, 3] {
            let mut m = mat.clone();
            let rank = echelonize_partial(&mut m, 6, block, &gray);
            assert_eq!(rank, 6, "block size {block}");
            assert!(identity_submatrix_holds(&m, rank), "block size {block}");
        }
    }

    #[test]
    fn singular_matrix_reports_short_rank() {
        // Column 2 is never a pivot: every row has a zero there.
        let mut mat = BitMatrix::allocate(4, 4);
        mat.set(0, 0, true);
        mat.set(1, 1, true);
        mat.set(2, 3, true);
        mat.set(3, 3, true);
        mat.flip(3, 3);
        mat.set(3, 0, true);
        let gray = GrayTables::build_all();
        let rank = echelonize_partial(&mut mat, 4, 2, &gray);
        assert!(rank < 4);
    }

    #[test]
    fn larger_random_full_rank_matrix_reduces_correctly() {
        let mut state = 0xdead_beef_cafe_babeu64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        let n = 20;
        let mut mat = BitMatrix::allocate(n, n);
        loop {
            for r in 0..n {
                for c in 0..n {
                    mat.set(r, c, (next() & 1) == 1);
                }
            }
            let gray = GrayTables::build_all();
            let mut probe = mat.clone();
            let rank = echelonize_partial(&mut probe, n, 3, &gray);
            if rank == n {
                assert!(identity_submatrix_holds(&probe, rank));
                break;
            }
        }
    }
}
