// Linear note indices for ratios.
//
// Maps an octave-reduced ratio onto an integer step within the octave:
// `round(steps_per_octave * log2(ratio))`. The resolution defaults to 1536
// steps per octave and can be set from config (see config.rs).

use crate::ratio::ExactRatio;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STEPS_PER_OCTAVE: u32 = 1536;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMapping {
    pub steps_per_octave: u32,
}

impl NoteMapping {
    pub fn new(steps_per_octave: u32) -> Self {
        NoteMapping { steps_per_octave }
    }

    /// Step index of `ratio`. Ratios at or below 1/1 map to 0.
    pub fn note_index(&self, ratio: ExactRatio) -> u32 {
        let steps = (ratio.log2() * f64::from(self.steps_per_octave)).round();
        if steps <= 0.0 { 0 } else { steps as u32 }
    }
}

impl Default for NoteMapping {
    fn default() -> Self {
        NoteMapping::new(DEFAULT_STEPS_PER_OCTAVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_endpoints() {
        let mapping = NoteMapping::default();
        assert_eq!(mapping.note_index(ExactRatio::one()), 0);
        assert_eq!(mapping.note_index(ExactRatio::from_integer(2)), 1536);
    }

    #[test]
    fn resolution_is_configurable() {
        let twelve = NoteMapping::new(12);
        // 3/2 is ~7.02 semitones.
        assert_eq!(twelve.note_index(ExactRatio::new(3, 2).unwrap()), 7);
        // 5/4 is ~3.86 semitones.
        assert_eq!(twelve.note_index(ExactRatio::new(5, 4).unwrap()), 4);
    }

    #[test]
    fn indices_increase_with_ratio() {
        let mapping = NoteMapping::default();
        let low = mapping.note_index(ExactRatio::new(65, 64).unwrap());
        let high = mapping.note_index(ExactRatio::new(1001, 512).unwrap());
        assert!(low > 0);
        assert!(low < high);
        assert!(high < 1536);
    }
}
