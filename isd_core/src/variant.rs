use std::fmt;

/// The four problem variants (spec §1, §9 "tagged variant"). The
/// working-matrix builder (`problem::build_working_matrix`) switches on this;
/// the collision engine conditionally folds in `s_full` or loops over DOOM
/// shifts depending on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Standard syndrome decoding: dense k x k generator-style H, explicit
    /// syndrome s.
    Sd,
    /// Quasi-cyclic: H's right block is a single circulant row, explicit
    /// syndrome s. The only variant DOOM is meaningful for.
    Qc,
    /// Goppa-style: dense k x n H, explicit syndrome s of length n - k.
    Go,
    /// Low-weight codeword search: dense k x n H, no syndrome.
    Lw,
}

impl Variant {
    /// True for the one variant where DOOM (cyclic-shift batching of the
    /// syndrome) is meaningful.
    #[inline]
    #[must_use]
    pub fn supports_doom(self) -> bool {
        matches!(self, Variant::Qc)
    }

    /// True for variants that search against an explicit syndrome, as
    /// opposed to LW's "find any low-weight nonzero codeword".
    #[inline]
    #[must_use]
    pub fn has_syndrome(self) -> bool {
        !matches!(self, Variant::Lw)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Variant::Sd => "SD",
            Variant::Qc => "QC",
            Variant::Go => "GO",
            Variant::Lw => "LW",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SD" => Ok(Variant::Sd),
            "QC" => Ok(Variant::Qc),
            "GO" => Ok(Variant::Go),
            "LW" => Ok(Variant::Lw),
            other => Err(format!("unknown variant `{other}`, expected one of SD, QC, GO, LW")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_display_parse() {
        for v in [Variant::Sd, Variant::Qc, Variant::Go, Variant::Lw] {
            let s = v.to_string();
            assert_eq!(s.parse::<Variant>().unwrap(), v);
        }
    }

    #[test]
    fn doom_only_for_qc() {
        assert!(Variant::Qc.supports_doom());
        assert!(!Variant::Sd.supports_doom());
        assert!(!Variant::Go.supports_doom());
        assert!(!Variant::Lw.supports_doom());
    }

    #[test]
    fn lw_has_no_syndrome() {
        assert!(!Variant::Lw.has_syndrome());
        assert!(Variant::Sd.has_syndrome());
    }
}
