// Factor tuples and combination enumeration.
//
// `FactorKey` is the identity of a scale element: the ascending tuple of
// harmonic factors whose product the element sounds (including an embedding
// multiplier, if any). Two elements occupy "the same pitch slot" exactly
// when their keys are equal, regardless of their current ratio, so keys are
// what parent/child linkage is built on (see cps.rs).
//
// Keys have two text forms: the tuple form `(1, 3, 5)` used in scale
// listings, and the star form `1*3*5` used for factor listings and
// transposition labels. `FromStr` accepts either (and bracketed lists) as a
// structured parse; nothing is ever evaluated as an expression.
//
// `combinations` yields k-subsets lexicographically by input position, which
// fixes the order of embedded-set search results.

use crate::error::CpsError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sorted factor tuple; the identity key of a scale element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FactorKey(Vec<u64>);

impl FactorKey {
    pub fn new(mut factors: Vec<u64>) -> Self {
        factors.sort_unstable();
        FactorKey(factors)
    }

    /// Key for `factors` with an optional multiplier folded in. A multiplier
    /// of zero counts as absent.
    pub fn with_multiplier(factors: &[u64], multiplier: Option<u64>) -> Self {
        let mut all = factors.to_vec();
        if let Some(m) = multiplier.filter(|&m| m != 0) {
            all.push(m);
        }
        FactorKey::new(all)
    }

    pub fn factors(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Product of the factors. Fails if it does not fit in a `u64`.
    pub fn product(&self) -> Result<u64, CpsError> {
        checked_product(&self.0)
            .ok_or_else(|| CpsError::invalid(format!("product of {self} overflows u64")))
    }

    /// Star-joined form, e.g. `1*3*5`.
    pub fn stars(&self) -> String {
        join(&self.0, "*")
    }
}

impl fmt::Display for FactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", join(&self.0, ", "))
    }
}

impl FromStr for FactorKey {
    type Err = CpsError;

    /// Accepts `1*3*5`, `(1, 3, 5)`, `[1,3,5]` or `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .or_else(|| trimmed.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')))
            .unwrap_or(trimmed);
        let sep = if inner.contains('*') { '*' } else { ',' };

        let mut factors = Vec::new();
        for part in inner.split(sep) {
            let part = part.trim();
            let factor = part
                .parse::<u64>()
                .map_err(|_| CpsError::invalid(format!("invalid factor {part:?} in {s:?}")))?;
            if factor == 0 {
                return Err(CpsError::invalid(format!("zero factor in {s:?}")));
            }
            factors.push(factor);
        }
        Ok(FactorKey::new(factors))
    }
}

pub(crate) fn join(factors: &[u64], sep: &str) -> String {
    factors
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Product of `factors`, or `None` on `u64` overflow.
pub fn checked_product(factors: &[u64]) -> Option<u64> {
    factors.iter().try_fold(1u64, |acc, &f| acc.checked_mul(f))
}

/// All `k`-element subsets of `items`, preserving the input order within
/// each subset and ordering subsets lexicographically by position.
pub fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(binomial(n, k));
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        out.push(indices.iter().map(|&i| items[i]).collect());

        // Rightmost index that can still advance.
        let Some(pos) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
            return out;
        };
        indices[pos] += 1;
        for j in pos + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// C(n, k).
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_sorted_and_includes_multiplier() {
        let key = FactorKey::with_multiplier(&[7, 1], Some(3));
        assert_eq!(key.factors(), &[1, 3, 7]);
        assert_eq!(key.product().unwrap(), 21);
        assert_eq!(key.to_string(), "(1, 3, 7)");
        assert_eq!(key.stars(), "1*3*7");
    }

    #[test]
    fn zero_multiplier_is_ignored() {
        let key = FactorKey::with_multiplier(&[5, 3], Some(0));
        assert_eq!(key.factors(), &[3, 5]);
        assert_eq!(FactorKey::with_multiplier(&[5, 3], None), key);
    }

    #[test]
    fn parses_every_text_form() {
        let expected = FactorKey::new(vec![1, 3, 13]);
        for text in ["1*3*13", "13*3*1", "(1, 3, 13)", "[1,3,13]", " 1, 3, 13 "] {
            assert_eq!(text.parse::<FactorKey>().unwrap(), expected, "{text}");
        }
        assert!("1*x*3".parse::<FactorKey>().is_err());
        assert!("1*0".parse::<FactorKey>().is_err());
        assert!("".parse::<FactorKey>().is_err());
    }

    #[test]
    fn oversized_products_are_rejected() {
        let big = 1u64 << 30;
        let key = FactorKey::new(vec![big, big + 1, big + 3]);
        assert_eq!(key.product().unwrap_err().kind(), crate::error::ErrorKind::InvalidArgument);
        assert_eq!(checked_product(&[big, big + 1]), Some(big * (big + 1)));
        assert_eq!(checked_product(&[u64::MAX, 2]), None);
        assert_eq!(checked_product(&[]), Some(1));
    }

    #[test]
    fn combinations_follow_positional_order() {
        let combos = combinations(&[1, 3, 5, 7], 2);
        assert_eq!(
            combos,
            vec![
                vec![1, 3],
                vec![1, 5],
                vec![1, 7],
                vec![3, 5],
                vec![3, 7],
                vec![5, 7],
            ]
        );
        // Order follows input position, not value.
        assert_eq!(combinations(&[5, 1, 3], 2), vec![vec![5, 1], vec![5, 3], vec![1, 3]]);
    }

    #[test]
    fn combination_edge_sizes() {
        assert_eq!(combinations(&[1, 3, 5], 0), vec![Vec::<i32>::new()]);
        assert_eq!(combinations(&[1, 3, 5], 3), vec![vec![1, 3, 5]]);
        assert!(combinations(&[1, 3, 5], 4).is_empty());
    }

    #[test]
    fn binomial_matches_enumeration() {
        let six = [1u64, 3, 5, 7, 11, 13];
        for k in 0..=7 {
            assert_eq!(combinations(&six, k).len(), binomial(6, k), "k = {k}");
        }
        assert_eq!(binomial(6, 3), 20);
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(5, 3), 10);
    }
}
