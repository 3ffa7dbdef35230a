// Data-driven parameters for exploring a CPS.
//
// `CpsConfig` collects everything a front end needs to pick a set and render
// it: the generator factors, choose size and name of the top-level set, the
// shape of the embedded sets to search for, the note-index resolution and
// the column width of tabular listings. It loads from JSON; every field is
// optional in the document and falls back to the 1-3-5-7-11-13 eikosany
// defaults.

use crate::cps::{CombinationProductSet, CpsOptions};
use crate::error::CpsError;
use crate::format::{DEFAULT_COLUMN_WIDTH, ListOptions};
use crate::notes::{DEFAULT_STEPS_PER_OCTAVE, NoteMapping};
use serde::{Deserialize, Serialize};

/// Shape of the sets `find_embedded_sets` looks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingParams {
    /// Base factors per embedded set (4 for hexanies in an eikosany).
    pub subset_size: usize,
    /// Choose size of each embedded set.
    pub inner_choose: usize,
}

impl Default for EmbeddingParams {
    fn default() -> Self {
        EmbeddingParams {
            subset_size: 4,
            inner_choose: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpsConfig {
    pub base_factors: Vec<u64>,
    /// `None` chooses half the factors.
    pub choose: Option<usize>,
    pub name: Option<String>,
    pub embedding: EmbeddingParams,
    pub note_steps_per_octave: u32,
    pub column_width: usize,
}

impl Default for CpsConfig {
    fn default() -> Self {
        CpsConfig {
            base_factors: vec![1, 3, 5, 7, 11, 13],
            choose: None,
            name: Some("1-3-5-7-11-13 Eikosany".into()),
            embedding: EmbeddingParams::default(),
            note_steps_per_octave: DEFAULT_STEPS_PER_OCTAVE,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl CpsConfig {
    pub fn from_json(json: &str) -> Result<Self, CpsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn note_mapping(&self) -> NoteMapping {
        NoteMapping::new(self.note_steps_per_octave)
    }

    /// Untabulated listing options at the configured column width.
    pub fn list_options(&self) -> ListOptions {
        ListOptions::default().with_width(self.column_width)
    }

    /// Build the configured top-level set.
    pub fn build_set(&self) -> Result<CombinationProductSet, CpsError> {
        CombinationProductSet::with_options(
            &self.base_factors,
            CpsOptions {
                choose: self.choose,
                multiplier: None,
                name: self.name.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_the_eikosany() {
        let config = CpsConfig::default();
        let cps = config.build_set().unwrap();
        assert_eq!(cps.len(), 20);
        assert_eq!(cps.name(), "1-3-5-7-11-13 Eikosany");
        assert_eq!(config.note_mapping().steps_per_octave, 1536);
        assert_eq!(config.list_options().column_width, 9);
    }

    #[test]
    fn partial_json_overrides_named_fields_only() {
        let config = CpsConfig::from_json(
            r#"{ "base_factors": [1, 3, 5, 7, 9], "choose": 3, "embedding": { "subset_size": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.base_factors, vec![1, 3, 5, 7, 9]);
        assert_eq!(config.choose, Some(3));
        assert_eq!(config.embedding.subset_size, 3);
        assert_eq!(config.embedding.inner_choose, 2);
        assert_eq!(config.note_steps_per_octave, 1536);
        assert_eq!(config.build_set().unwrap().len(), 10);
    }

    #[test]
    fn json_round_trips() {
        let config = CpsConfig {
            note_steps_per_octave: 1200,
            column_width: 11,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CpsConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = CpsConfig::from_json("{ \"choose\": \"three\" }").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
