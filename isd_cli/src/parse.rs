//! Input-file parsing (spec §6), grounded on `original_source/isd.c:
//! parse_input_sd/go/qc/lw` and `dumer.c: init_isd`'s indexing of `mat_h`.
//!
//! `init_isd` folds the non-identity block in with
//! `mat_h[i + (n - k) * j]` for SD/GO/LW — column `j`, row `i` sits at flat
//! offset `i + r*j` — which means the file holds `k` lines of `r = n - k`
//! characters each, one physical line per *column* of the working matrix,
//! not one line per row as the field names might suggest. QC instead reads
//! the circulant generator as a single `k`-bit line and expands it with
//! `mat_h[(i - j + k) % k]`.

use std::path::{Path, PathBuf};

use isd_core::bitmatrix::BitMatrix;
use isd_core::{Problem, Variant};

use crate::error::CliError;

struct LineCursor<'a> {
    path: &'a Path,
    lines: std::vec::IntoIter<&'a str>,
}

impl<'a> LineCursor<'a> {
    fn new(path: &'a Path, content: &'a str) -> Self {
        let lines: Vec<&str> =
            content.lines().map(|l| l.trim_end_matches('\r')).filter(|l| !l.starts_with('#')).collect();
        Self { path, lines: lines.into_iter() }
    }

    fn fail(&self, reason: impl Into<String>) -> CliError {
        CliError::Malformed { path: self.path.to_path_buf(), reason: reason.into() }
    }

    fn next_line(&mut self) -> Result<&'a str, CliError> {
        self.lines.next().ok_or_else(|| self.fail("unexpected end of file"))
    }

    fn next_usize(&mut self) -> Result<usize, CliError> {
        let line = self.next_line()?;
        line.trim().parse::<usize>().map_err(|e| self.fail(format!("expected an integer, got `{line}`: {e}")))
    }

    fn next_bits_exact(&mut self, len: usize) -> Result<Vec<u8>, CliError> {
        let line = self.next_line()?;
        if line.len() != len {
            return Err(self.fail(format!("expected {len} bits, got {} on `{line}`", line.len())));
        }
        line.bytes()
            .map(|b| match b {
                b'0' => Ok(0u8),
                b'1' => Ok(1u8),
                other => Err(self.fail(format!("expected '0' or '1', got byte {other}"))),
            })
            .collect()
    }

    /// Reads `cols` lines of `rows` characters each, filling column `j` of
    /// an `rows x cols` matrix from line `j` (spec's column-major layout).
    fn next_column_major_matrix(&mut self, rows: usize, cols: usize) -> Result<BitMatrix, CliError> {
        let mut m = BitMatrix::allocate(rows, cols);
        for j in 0..cols {
            let bits = self.next_bits_exact(rows)?;
            for (i, &bit) in bits.iter().enumerate() {
                if bit != 0 {
                    m.set(i, j, true);
                }
            }
        }
        Ok(m)
    }
}

fn qc_circulant(h: &[u8], k: usize) -> BitMatrix {
    let mut m = BitMatrix::allocate(k, k);
    for j in 0..k {
        for i in 0..k {
            if h[(i + k - j) % k] != 0 {
                m.set(i, j, true);
            }
        }
    }
    m
}

fn parse_sd(cursor: &mut LineCursor) -> Result<Problem, CliError> {
    let n = cursor.next_usize()?;
    let _seed = cursor.next_usize()?;
    let w = cursor.next_usize()?;
    let k = n / 2;
    let extra = cursor.next_column_major_matrix(n - k, k)?;
    let syndrome = cursor.next_bits_exact(n - k)?;
    Ok(Problem::new(Variant::Sd, n, k, w, extra, Some(syndrome))?)
}

fn parse_qc(cursor: &mut LineCursor) -> Result<Problem, CliError> {
    let n = cursor.next_usize()?;
    let w = cursor.next_usize()?;
    let k = n / 2;
    let h = cursor.next_bits_exact(k)?;
    let syndrome = cursor.next_bits_exact(k)?;
    let extra = qc_circulant(&h, k);
    Ok(Problem::new(Variant::Qc, n, k, w, extra, Some(syndrome))?)
}

fn parse_go(cursor: &mut LineCursor) -> Result<Problem, CliError> {
    let n = cursor.next_usize()?;
    let k = cursor.next_usize()?;
    let w = cursor.next_usize()?;
    let extra = cursor.next_column_major_matrix(n - k, k)?;
    let syndrome = cursor.next_bits_exact(n - k)?;
    Ok(Problem::new(Variant::Go, n, k, w, extra, Some(syndrome))?)
}

fn parse_lw(cursor: &mut LineCursor) -> Result<Problem, CliError> {
    let n = cursor.next_usize()?;
    let _seed = cursor.next_usize()?;
    let k = n / 2;
    let extra = cursor.next_column_major_matrix(n - k, k)?;
    Ok(Problem::new(Variant::Lw, n, k, 0, extra, None)?)
}

/// Parse `path` into a [`Problem`] of the given `variant` (spec §6's four
/// input formats).
pub fn parse_problem(path: &Path, variant: Variant) -> Result<Problem, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::InputUnreadable(path.to_path_buf(), e))?;
    let mut cursor = LineCursor::new(path, &content);
    match variant {
        Variant::Sd => parse_sd(&mut cursor),
        Variant::Qc => parse_qc(&mut cursor),
        Variant::Go => parse_go(&mut cursor),
        Variant::Lw => parse_lw(&mut cursor),
    }
}
