//! Problem data model and per-variant working-matrix construction (spec §3,
//! §4.K step 0), grounded on `original_source/dumer.c: init_isd`.

use crate::bitmatrix::BitMatrix;
use crate::error::{EngineError, Result};
use crate::params::{EPS, L};
use crate::variant::Variant;

/// A decoding instance: a linear code's parity-check data plus the target
/// weight (meaningless for [`Variant::Lw`], which searches for a low-weight
/// codeword with no target syndrome).
#[derive(Clone, Debug)]
pub struct Problem {
    variant: Variant,
    n: usize,
    k: usize,
    w: usize,
    /// The non-identity part of the parity-check matrix in systematic form,
    /// `r x k` where `r = n - k`: column `j`, row `i` holds the bit that
    /// augments column `n - k + j` of the working matrix. For QC this is
    /// already expanded from the circulant generator by the caller (spec §3
    /// "QC: H is block-circulant"; the expansion itself is file-format
    /// plumbing, not engine logic, so it lives in the parser).
    parity_extra: BitMatrix,
    /// Target syndrome, `r` bits. `None` only for [`Variant::Lw`].
    syndrome: Option<Vec<u8>>,
}

impl Problem {
    /// # Errors
    /// Returns [`EngineError::InvalidParameters`] if the shapes are
    /// inconsistent with `variant` (e.g. `k != n - k` for QC, a missing or
    /// present syndrome that disagrees with `variant.has_syndrome()`, or a
    /// `parity_extra` matrix of the wrong dimensions).
    ///
    /// Note: this does not check `ε` against the `k + ℓ` split — a `Problem`
    /// is a plain data model usable independently of the driver (e.g. in
    /// matrix-construction tests), so that check lives in
    /// [`validate_eps_fits`] and is run once before a search actually starts.
    pub fn new(
        variant: Variant,
        n: usize,
        k: usize,
        w: usize,
        parity_extra: BitMatrix,
        syndrome: Option<Vec<u8>>,
    ) -> Result<Self> {
        if k == 0 || k >= n {
            return Err(EngineError::InvalidParameters(format!(
                "k must satisfy 0 < k < n, got k={k}, n={n}"
            )));
        }
        let r = n - k;
        if parity_extra.rows() != r || parity_extra.cols() != k {
            return Err(EngineError::InvalidParameters(format!(
                "parity_extra must be {r}x{k}, got {}x{}",
                parity_extra.rows(),
                parity_extra.cols()
            )));
        }
        if variant == Variant::Qc && k != r {
            return Err(EngineError::InvalidParameters(format!(
                "QC requires k == n - k, got k={k}, n-k={r}"
            )));
        }
        match (&syndrome, variant.has_syndrome()) {
            (Some(s), true) if s.len() == r => {}
            (None, false) => {}
            _ => {
                return Err(EngineError::InvalidParameters(
                    "syndrome presence/length must match the variant".to_string(),
                ))
            }
        }
        Ok(Self { variant, n, k, w, parity_extra, syndrome })
    }

    #[inline]
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    #[must_use]
    pub fn r(&self) -> usize {
        self.n - self.k
    }

    #[inline]
    #[must_use]
    pub fn w(&self) -> usize {
        self.w
    }

    /// Build the working matrix `A` for one driver iteration: identity on
    /// the first `r` columns, `parity_extra` on the next `k`, and either one
    /// syndrome column, `k` DOOM-shifted syndrome columns, or none for LW
    /// (spec §3, `dumer.c: init_isd`'s `mzd_write_bit` loops).
    #[must_use]
    pub fn build_working_matrix(&self, doom: bool) -> BitMatrix {
        let r = self.r();
        let extra_cols = match (self.variant, doom) {
            (Variant::Lw, _) => 0,
            (_, true) => self.k,
            (_, false) => 1,
        };
        let mut a = BitMatrix::allocate(r, self.n + extra_cols);
        for i in 0..r {
            a.set(i, i, true);
        }
        for j in 0..self.k {
            for i in 0..r {
                if self.parity_extra.get(i, j) {
                    a.set(i, self.n - self.k + j, true);
                }
            }
        }
        if let Some(s) = &self.syndrome {
            if doom {
                // QC only (enforced in `new`): k == r, so a cyclic shift of
                // the syndrome is the syndrome of the blockwise circularly
                // shifted error pattern.
                for j in 0..self.k {
                    for i in 0..r {
                        let idx = (i + self.k - j) % self.k;
                        if s[idx] != 0 {
                            a.set(i, self.n + j, true);
                        }
                    }
                }
            } else {
                for i in 0..r {
                    if s[i] != 0 {
                        a.set(i, self.n, true);
                    }
                }
            }
        }
        a
    }
}

/// Check that `ε` fits under both halves of the `k + ℓ` split for this
/// problem, mirroring `original_source/isd.c: main`'s fatal
/// `DUMER_EPS > n2 || DUMER_EPS > n1` startup guard. `driver::run_iteration`
/// computes `off2 = off1 + half1 - EPS`, which underflows if `half1 < EPS`
/// (and symmetrically `half2` bounds how far the Chase sweep over the
/// second half can run); call this once before starting a search.
///
/// # Errors
/// Returns [`EngineError::InternalOverrun`] if `ε` exceeds either half.
pub fn validate_eps_fits(problem: &Problem) -> Result<()> {
    let r = problem.r();
    let ell = L.min(r);
    let half1 = (problem.k() + ell) / 2;
    let half2 = (problem.k() + ell) - half1;
    if half1 < EPS || half2 < EPS {
        return Err(EngineError::InternalOverrun(format!(
            "epsilon={EPS} exceeds one of the k+l split halves ({half1}, {half2}); lower ISD_EPS or raise k/l"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_eps_fits_rejects_a_split_too_small_for_epsilon() {
        let extra = BitMatrix::allocate(6, 4);
        let problem = Problem::new(Variant::Sd, 10, 4, 2, extra, Some(vec![0; 6])).unwrap();
        assert!(validate_eps_fits(&problem).is_err());
    }

    #[test]
    fn validate_eps_fits_accepts_a_large_enough_split() {
        let r = 20;
        let k = 70;
        let extra = BitMatrix::allocate(r, k);
        let problem = Problem::new(Variant::Sd, r + k, k, 6, extra, Some(vec![0; r])).unwrap();
        assert!(validate_eps_fits(&problem).is_ok());
    }

    #[test]
    fn rejects_qc_with_mismatched_k_and_r() {
        let extra = BitMatrix::allocate(4, 3);
        let err = Problem::new(Variant::Qc, 10, 3, 2, extra, Some(vec![0; 4]));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_missing_syndrome_for_sd() {
        let extra = BitMatrix::allocate(6, 4);
        let err = Problem::new(Variant::Sd, 10, 4, 2, extra, None);
        assert!(err.is_err());
    }

    #[test]
    fn lw_has_no_syndrome_column() {
        let extra = BitMatrix::allocate(6, 4);
        let problem = Problem::new(Variant::Lw, 10, 4, 0, extra, None).unwrap();
        let a = problem.build_working_matrix(false);
        assert_eq!(a.cols(), 10);
    }

    #[test]
    fn sd_working_matrix_has_identity_and_syndrome_column() {
        let mut extra = BitMatrix::allocate(6, 4);
        extra.set(0, 0, true);
        let syndrome = vec![1u8, 0, 1, 0, 0, 0];
        let problem = Problem::new(Variant::Sd, 10, 4, 2, extra, Some(syndrome)).unwrap();
        let a = problem.build_working_matrix(false);
        assert_eq!(a.cols(), 11);
        for i in 0..6 {
            assert!(a.get(i, i));
        }
        assert!(a.get(0, 6)); // parity_extra[0][0]
        assert!(a.get(0, 10));
        assert!(a.get(2, 10));
        assert!(!a.get(1, 10));
    }

    #[test]
    fn qc_doom_working_matrix_has_k_shift_columns() {
        let extra = BitMatrix::allocate(5, 5);
        let syndrome = vec![1u8, 0, 0, 0, 0];
        let problem = Problem::new(Variant::Qc, 10, 5, 0, extra, Some(syndrome)).unwrap();
        let a = problem.build_working_matrix(true);
        assert_eq!(a.cols(), 15);
    }
}
