//! Chase's sequence: enumerate all `t`-subsets of `{0,...,n-1}` so that
//! consecutive subsets differ in exactly one position pair that is adjacent
//! or separated by one index (Knuth TAoCP 4A, exercise 45 / "revolving
//! door"), spec §4.F. Ported from `original_source/dumer.c: chase`, which is
//! itself a direct transcription of Knuth's algorithm — the 1-based indexing
//! and the `goto`-driven state machine are kept as the closest-to-source
//! idiomatic Rust allows without inventing a different algorithm shape.

/// `C(n, k)`, the binomial coefficient, used to size `list1`/`list2` and the
/// Chase table (spec §3, `original_source/dumer.c: bincoef`).
#[must_use]
pub fn binomial(n: usize, k: usize) -> u64 {
    let mut res: u64 = 1;
    for i in 0..k {
        res = res * (n - i) as u64 / (i + 1) as u64;
    }
    res
}

/// The output of [`chase`]: `combinations[N*t .. N*t+t]` holds the N-th
/// `t`-subset (ascending, `c[0] < c[1] < ... < c[t-1]`); `diff[N]` packs the
/// (position, length) of the swap between subset `N-1` and subset `N` as
/// `pos + (len - 1) * (n - 1)` — the index into the precomputed XOR-pair
/// table (spec §4.F, §3 "Precomputed XOR-pair table").
#[derive(Clone, Debug)]
pub struct ChaseSequence {
    pub t: usize,
    pub combinations: Vec<u16>,
    pub diff: Vec<u16>,
}

impl ChaseSequence {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.diff.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn subset(&self, n: usize) -> &[u16] {
        &self.combinations[n * self.t..(n + 1) * self.t]
    }
}

/// Build the Chase sequence of all `t`-subsets of `{0,...,n-1}`.
#[must_use]
pub fn chase(n: usize, t: usize) -> ChaseSequence {
    let count = binomial(n, t) as usize;
    let mut combinations = vec![0u16; count * t];
    let mut diff = vec![0u16; count];

    // 1-indexed scratch arrays of length t+2, matching the source exactly.
    let mut c = vec![0i64; t + 2];
    let mut z = vec![0i64; t + 2];
    for j in 1..=t + 1 {
        c[j] = (n - t - 1 + j) as i64;
    }
    let mut r: usize = 1;
    let mut nn: usize = 0;
    let mut diff_pos: i64 = 0;
    let mut diff_len: i64 = 0;

    loop {
        for i in 1..=t {
            combinations[i - 1 + nn * t] = c[i] as u16;
        }
        diff[nn] = (diff_pos + (diff_len - 1) * (n as i64 - 1)) as u16;
        nn += 1;
        let mut j = r;

        'novisit: loop {
            if z[j] != 0 {
                let x = c[j] + 2;
                if x < z[j] {
                    diff_pos = c[j];
                    diff_len = 2;
                    c[j] = x;
                } else if x == z[j] && z[j + 1] != 0 {
                    diff_pos = c[j];
                    diff_len = 2 - (c[j + 1] % 2);
                    c[j] = x - (c[j + 1] % 2);
                } else {
                    z[j] = 0;
                    j += 1;
                    if j <= t {
                        continue 'novisit;
                    }
                    return ChaseSequence { t, combinations, diff };
                }
                r = if c[1] > 0 { 1 } else { j - 1 };
            } else {
                let x = c[j] + (c[j] % 2) - 2;
                if x >= j as i64 {
                    diff_pos = x;
                    diff_len = 2 - (c[j] % 2);
                    c[j] = x;
                    r = 1;
                } else if c[j] == j as i64 {
                    diff_pos = j as i64 - 1;
                    diff_len = 1;
                    c[j] = j as i64 - 1;
                    z[j] = c[j + 1] - ((c[j + 1] + 1) % 2);
                    r = j;
                } else if c[j] < j as i64 {
                    diff_pos = c[j];
                    diff_len = j as i64 - c[j];
                    c[j] = j as i64;
                    z[j] = c[j + 1] - ((c[j + 1] + 1) % 2);
                    r = if j > 2 { j - 1 } else { 1 };
                } else {
                    diff_pos = x;
                    diff_len = 2 - (c[j] % 2);
                    c[j] = x;
                    r = j;
                }
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn binomial_matches_known_values() {
        assert_eq!(binomial(8, 3), 56);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(6, 2), 15);
    }

    #[test]
    fn emits_exactly_binomial_distinct_subsets() {
        let n = 8;
        let t = 3;
        let seq = chase(n, t);
        assert_eq!(seq.len(), binomial(n, t) as usize);
        let mut seen = HashSet::new();
        for idx in 0..seq.len() {
            let mut subset: Vec<u16> = seq.subset(idx).to_vec();
            subset.sort_unstable();
            assert!(seen.insert(subset), "duplicate subset at index {idx}");
        }
        assert_eq!(seen.len(), binomial(n, t) as usize);
    }

    #[test]
    fn consecutive_subsets_have_symmetric_difference_two() {
        let n = 8;
        let t = 3;
        let seq = chase(n, t);
        for idx in 1..seq.len() {
            let prev: HashSet<u16> = seq.subset(idx - 1).iter().copied().collect();
            let cur: HashSet<u16> = seq.subset(idx).iter().copied().collect();
            let sym_diff = prev.symmetric_difference(&cur).count();
            assert_eq!(sym_diff, 2, "subsets {} and {} differ by {sym_diff}", idx - 1, idx);
        }
    }

    #[test]
    fn all_subsets_have_size_t() {
        let seq = chase(7, 4);
        for idx in 0..seq.len() {
            assert_eq!(seq.subset(idx).len(), 4);
        }
    }
}
