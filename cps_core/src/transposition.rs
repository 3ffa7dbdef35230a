// Reference tones.
//
// A `Transposition` names the tone that sounds as 1/1: an integer divisor
// (typically the product of one element's factors) plus a display label.
// Sets carry the transposition they were last transposed to, and
// common-tone analysis takes one explicitly so that only sets sharing the
// same reference tone are compared (see common_tones.rs).
//
// Tones compare by divisor; the label is display-only.

use crate::element::ScaleElement;
use crate::error::CpsError;
use crate::factors::FactorKey;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transposition {
    divisor: u64,
    label: String,
}

impl Transposition {
    pub fn new(divisor: u64, label: impl Into<String>) -> Result<Self, CpsError> {
        if divisor == 0 {
            return Err(CpsError::invalid("a reference tone cannot have a zero divisor"));
        }
        Ok(Transposition {
            divisor,
            label: label.into(),
        })
    }

    /// The untransposed state: 1/1 = 1.
    pub fn unison() -> Self {
        Transposition {
            divisor: 1,
            label: "1".into(),
        }
    }

    /// Reference tone at the product of `key`, labelled in star form.
    pub fn from_key(key: &FactorKey) -> Result<Self, CpsError> {
        Ok(Transposition {
            divisor: key.product()?,
            label: key.stars(),
        })
    }

    /// Reference tone at `elem`'s own product, so that `elem` sounds as 1/1.
    pub fn from_element(elem: &ScaleElement) -> Self {
        Transposition {
            divisor: elem.original_product(),
            label: elem.key().stars(),
        }
    }

    pub fn divisor(&self) -> u64 {
        self.divisor
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn same_tone(&self, other: &Transposition) -> bool {
        self.divisor == other.divisor
    }
}

impl Default for Transposition {
    fn default() -> Self {
        Transposition::unison()
    }
}

impl fmt::Display for Transposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for Transposition {
    type Err = CpsError;

    /// Parses a factor tuple in any form `FactorKey` accepts (`1*3*5`,
    /// `(1, 3, 5)`) or a bare integer divisor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: FactorKey = s.parse()?;
        Transposition::from_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_star_form() {
        let tone: Transposition = "1*3*13".parse().unwrap();
        assert_eq!(tone.divisor(), 39);
        assert_eq!(tone.label(), "1*3*13");
        assert_eq!(tone.to_string(), "1*3*13");
    }

    #[test]
    fn parses_bare_divisor() {
        let tone: Transposition = "105".parse().unwrap();
        assert_eq!(tone.divisor(), 105);
        assert_eq!(tone.label(), "105");
    }

    #[test]
    fn same_tone_ignores_label() {
        let a = Transposition::new(15, "1*3*5").unwrap();
        let b = Transposition::new(15, "fifteen").unwrap();
        assert!(a.same_tone(&b));
        assert!(!a.same_tone(&Transposition::unison()));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(Transposition::new(0, "0").is_err());
        assert!("3*five".parse::<Transposition>().is_err());
        assert!("0".parse::<Transposition>().is_err());
        assert!("4294967296*4294967296".parse::<Transposition>().is_err());
    }
}
