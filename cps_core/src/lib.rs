// Combination Product Set engine
//
// Builds microtonal scales from harmonic factors: every k-element product of
// a base factor set, octave-reduced to a ratio in [1, 2], optionally
// re-expressed against a chosen 1/1. Finds smaller sets embedded in a larger
// one (hexanies inside an eikosany) and counts the tones sibling sets share.
// All arithmetic is exact; everything is deterministic.
//
// Architecture:
// - ratio.rs: ExactRatio, exact rationals with octave reduction
// - factors.rs: FactorKey (sorted factor tuple, the element identity) and
//   k-combination enumeration
// - element.rs: ScaleElement, one pitch and its transposition
// - transposition.rs: Transposition, the reference tone (1/1) token
// - cps.rs: CombinationProductSet (construction, transposition, parent
//   linkage, relative indexing, embedded-set search)
// - common_tones.rs: shared-tone bucketing across sibling sets
// - notes.rs: ratio -> linear note index mapping
// - format.rs: scale/factor listings, Display, JSON summary
// - config.rs: CpsConfig, JSON-loadable parameters
// - error.rs: CpsError
//
// The library logs through `tracing` and installs no subscriber.

pub mod common_tones;
pub mod config;
pub mod cps;
pub mod element;
pub mod error;
pub mod factors;
pub mod format;
pub mod notes;
pub mod ratio;
pub mod transposition;

pub use common_tones::{CommonToneBuckets, find_common_tones, shared_products};
pub use config::CpsConfig;
pub use cps::{CombinationProductSet, CpsOptions, ParentLink};
pub use element::ScaleElement;
pub use error::{CpsError, ErrorKind};
pub use factors::FactorKey;
pub use format::{ListOptions, ScaleSummary, list_factors, list_scale, summary};
pub use notes::NoteMapping;
pub use ratio::ExactRatio;
pub use transposition::Transposition;
