//! Build-time tuning knobs (spec §6). Each constant can be overridden at
//! compile time via an environment variable (`ISD_L=20 cargo build`, etc.),
//! falling back to the documented default otherwise. Overrides are parsed at
//! compile time through `konst`, so an invalid value is a build error rather
//! than a silently-ignored runtime default.

macro_rules! env_or_usize {
    ($env_name:literal, $default:expr) => {{
        use konst::{option, primitive::parse_usize, result};
        option::unwrap_or!(
            option::map!(core::option_env!($env_name), |s| result::unwrap_ctx!(
                parse_usize(s)
            )),
            $default
        )
    }};
}

macro_rules! env_or_bool {
    ($env_name:literal, $default:expr) => {{
        match core::option_env!($env_name) {
            Some(s) => !matches!(s, "0" | "false" | "" | "FALSE" | "False"),
            None => $default,
        }
    }};
}

/// Partial-match bit width `ℓ` (1..=64).
pub const L: usize = env_or_usize!("ISD_L", 16);

/// Total split size `p = p1 + p2`, p ∈ {4..8}.
pub const P: usize = env_or_usize!("ISD_P", 4);
pub const P1: usize = P / 2;
pub const P2: usize = P - P1;

/// Expansion of each half beyond k/2.
pub const EPS: usize = env_or_usize!("ISD_EPS", 40);

/// "Decoding One Out of Many", meaningful only for the QC variant.
pub const DOOM: bool = env_or_bool!("ISD_DOOM", false);

/// Low-weight codeword search mode (no syndrome; continuous tightening of
/// the best-known weight rather than exit-on-first-hit).
pub const LW: bool = env_or_bool!("ISD_LW", false);

/// log2 of the size of the first-list prefix lookup table, clamped to `L`.
pub const LUT_BITS_RAW: usize = env_or_usize!("ISD_LUT_BITS", 11);
pub const LUT_BITS: usize = if LUT_BITS_RAW > L { L } else { LUT_BITS_RAW };
pub const LUT_SHIFT: usize = L - LUT_BITS;

/// When non-zero, each worker runs exactly `ceil((BENCHMARK + thread_id) / T)`
/// driver iterations and the pool reports elapsed wall-clock time instead of
/// looping until a solution is found.
pub const BENCHMARK: usize = env_or_usize!("ISD_BENCHMARK", 0);

/// Upper bound on the four-Russians block width (spec §4.E).
pub const MAX_K: usize = 7;

const fn compile_time_assertions() {
    assert!(L >= 1 && L <= 64, "ISD_L must be in 1..=64");
    assert!(P >= 4 && P <= 8, "ISD_P must be in 4..=8");
    assert!(P1 >= 1 && P2 >= 1, "ISD_P must split into two nonzero halves");
    assert!(LUT_BITS <= L, "ISD_LUT_BITS must be <= ISD_L");
}

const _: () = compile_time_assertions();
