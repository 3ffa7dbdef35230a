// Text renderings of a combination product set.
//
// These are the engine's only outputs: per-element lines, scale listings
// and factor listings. A scale listing is either a plain run of ratios or a
// "tabular" row. For an embedded set the tabular row is laid out against the
// parent's slots, so rows for sibling sets line up column-for-column under a
// row for the parent itself, with blank cells where the set has no element.
//
// `summary` gives the same information as a serializable struct for JSON
// output.

use crate::cps::CombinationProductSet;
use crate::element::ScaleElement;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_COLUMN_WIDTH: usize = 9;

/// Layout of a scale listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Fixed-width columns; embedded sets are spread over the parent's slots.
    pub tabular: bool,
    /// Blank cells are plain spaces instead of a leading `.`.
    pub simple: bool,
    /// Comma-separated, unpadded cells.
    pub csv: bool,
    pub column_width: usize,
}

impl ListOptions {
    pub fn table() -> Self {
        ListOptions {
            tabular: true,
            ..Default::default()
        }
    }

    pub fn as_csv(mut self) -> Self {
        self.csv = true;
        self
    }

    pub fn with_simple_blanks(mut self) -> Self {
        self.simple = true;
        self
    }

    pub fn with_width(mut self, column_width: usize) -> Self {
        self.column_width = column_width;
        self
    }

    fn separator(&self) -> &'static str {
        if self.csv { "," } else { " " }
    }

    fn cell(&self, text: &str) -> String {
        if self.csv {
            text.to_string()
        } else {
            format!("{text:<width$}", width = self.column_width)
        }
    }

    fn blank(&self) -> String {
        if self.csv {
            String::new()
        } else if self.simple {
            self.cell("")
        } else {
            self.cell(".")
        }
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            tabular: false,
            simple: false,
            csv: false,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// The set's ratios as one line.
pub fn list_scale(cps: &CombinationProductSet, options: &ListOptions) -> String {
    let sep = options.separator();
    let labels = cps.elements().iter().map(ScaleElement::ratio_label);

    if !options.tabular {
        return labels.collect::<Vec<_>>().join(sep);
    }

    match (cps.parent(), cps.relative_index()) {
        (Some(parent), Some(index)) => {
            let mut row = vec![options.blank(); parent.size()];
            for (label, &slot) in labels.zip(index) {
                if let Some(cell) = row.get_mut(slot) {
                    *cell = options.cell(&label);
                }
            }
            row.join(sep)
        }
        _ => labels
            .map(|label| options.cell(&label))
            .collect::<Vec<_>>()
            .join(sep),
    }
}

/// Comma-separated factor tuples in sorted order, either `(1, 3, 5)` or
/// star-joined `1*3*5`.
pub fn list_factors(cps: &CombinationProductSet, stars: bool) -> String {
    cps.elements()
        .iter()
        .map(|elem| {
            if stars {
                elem.key().stars()
            } else {
                elem.key().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// `<name>, 1/1 = <tone>` followed by one line per element.
impl fmt::Display for CombinationProductSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, 1/1 = {}", self.name(), self.transposition())?;
        for elem in self.elements() {
            write!(f, "\n{elem}")?;
        }
        Ok(())
    }
}

/// Serializable snapshot of a set's current state.
#[derive(Debug, Clone, Serialize)]
pub struct ScaleSummary {
    pub name: String,
    pub transposition: String,
    pub divisor: u64,
    pub base_factors: Vec<u64>,
    pub choose: usize,
    pub multiplier: Option<u64>,
    pub ratios: Vec<String>,
    pub factors: Vec<String>,
    pub parent: Option<String>,
    pub relative_index: Option<Vec<usize>>,
}

pub fn summary(cps: &CombinationProductSet) -> ScaleSummary {
    ScaleSummary {
        name: cps.name().to_string(),
        transposition: cps.transposition().label().to_string(),
        divisor: cps.transposition().divisor(),
        base_factors: cps.base_factors().to_vec(),
        choose: cps.choose_size(),
        multiplier: cps.multiplier(),
        ratios: cps.elements().iter().map(ScaleElement::ratio_label).collect(),
        factors: cps.elements().iter().map(|e| e.key().stars()).collect(),
        parent: cps.parent().map(|p| p.name().to_string()),
        relative_index: cps.relative_index().map(<[usize]>::to_vec),
    }
}
