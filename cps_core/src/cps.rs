// Combination product sets.
//
// A `CombinationProductSet` takes every k-element combination of a base
// factor list, turns each into a `ScaleElement` (optionally carrying a fixed
// embedding multiplier), and keeps the elements sorted by octave-reduced
// ratio. Element identities and count are fixed at construction; only
// ratios, sort order, and the maps derived from sort order ever change.
//
// Derived state, rebuilt whenever the order changes:
// - `identity`: factor key -> current sorted position.
// - `relative_index` (embedded sets only): for each element in sorted order,
//   the position its key occupies in the parent's identity map.
//
// Parent linkage is an owned `ParentLink` snapshot of the parent's name,
// size, reference tone and slot layout, keyed by factor tuple rather than
// object identity. A child built from a parent stays valid on its own; if
// the parent is re-transposed afterwards, `relink` (or `transpose_family`)
// brings the child's snapshot up to date.
//
// `find_embedded_sets` is how hexanies are discovered inside an eikosany:
// each `size`-subset of the base factors, multiplied by each remaining
// factor in turn, is a smaller set whose elements all exist in the parent.
//
// Every mutation computes its new state first and commits only on success,
// so a failed transpose or relink leaves the set unchanged.

use crate::element::ScaleElement;
use crate::error::CpsError;
use crate::factors::{FactorKey, checked_product, combinations, join};
use crate::notes::NoteMapping;
use crate::ratio::ExactRatio;
use crate::transposition::Transposition;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Factor key -> sorted position.
pub type IdentityMap = FxHashMap<FactorKey, usize>;

/// Optional construction parameters.
#[derive(Debug, Clone, Default)]
pub struct CpsOptions {
    /// Elements per combination. Defaults to half the factor count.
    pub choose: Option<usize>,
    /// Extra factor folded into every element (zero counts as absent).
    pub multiplier: Option<u64>,
    /// Display name. Defaults to `unnamed 1-3-5-...`.
    pub name: Option<String>,
}

impl CpsOptions {
    pub fn choose(choose: usize) -> Self {
        CpsOptions {
            choose: Some(choose),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_multiplier(mut self, multiplier: u64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
}

/// Snapshot of the set an embedded set was found in.
#[derive(Debug, Clone)]
pub struct ParentLink {
    name: String,
    size: usize,
    transposition: Transposition,
    slots: IdentityMap,
}

impl ParentLink {
    fn of(parent: &CombinationProductSet) -> Self {
        ParentLink {
            name: parent.name.clone(),
            size: parent.len(),
            transposition: parent.transposition.clone(),
            slots: parent.identity.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of slots (elements) in the parent.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Parent's reference tone when the link was taken.
    pub fn transposition(&self) -> &Transposition {
        &self.transposition
    }

    pub fn slot(&self, key: &FactorKey) -> Option<usize> {
        self.slots.get(key).copied()
    }
}

#[derive(Debug, Clone)]
pub struct CombinationProductSet {
    name: String,
    base_factors: Vec<u64>,
    choose: usize,
    multiplier: Option<u64>,
    elements: Vec<ScaleElement>,
    transposition: Transposition,
    identity: IdentityMap,
    parent: Option<ParentLink>,
    relative_index: Option<Vec<usize>>,
}

impl CombinationProductSet {
    /// A top-level set over `factors`, choosing half of them.
    pub fn new(factors: &[u64]) -> Result<Self, CpsError> {
        Self::build(factors, CpsOptions::default(), None)
    }

    pub fn with_options(factors: &[u64], options: CpsOptions) -> Result<Self, CpsError> {
        Self::build(factors, options, None)
    }

    /// A set linked to `parent`. Every element's factor key must exist in the
    /// parent, otherwise this fails with `MissingParentSlot`.
    pub fn embedded_in(
        parent: &CombinationProductSet,
        factors: &[u64],
        options: CpsOptions,
    ) -> Result<Self, CpsError> {
        Self::build(factors, options, Some(ParentLink::of(parent)))
    }

    fn build(
        factors: &[u64],
        options: CpsOptions,
        parent: Option<ParentLink>,
    ) -> Result<Self, CpsError> {
        validate_factors(factors)?;

        let n = factors.len();
        let choose = options.choose.unwrap_or(n / 2);
        if choose == 0 || choose > n {
            return Err(CpsError::invalid(format!(
                "choose size {choose} is outside 1..={n} for factors {factors:?}"
            )));
        }
        let multiplier = options.multiplier.filter(|&m| m != 0);
        // Every element product divides this one, so no element can overflow
        // once it fits.
        let mut all_factors = factors.to_vec();
        all_factors.extend(multiplier);
        if checked_product(&all_factors).is_none() {
            return Err(CpsError::invalid(format!(
                "product of factors {all_factors:?} overflows u64"
            )));
        }
        let name = options
            .name
            .unwrap_or_else(|| format!("unnamed {}", join(factors, "-")));

        let mut elements = combinations(factors, choose)
            .iter()
            .map(|combo| ScaleElement::new(combo, multiplier))
            .collect::<Result<Vec<_>, _>>()?;
        elements.sort();

        let identity = identity_map(&elements);
        let relative_index = parent
            .as_ref()
            .map(|link| relative_index(&elements, link))
            .transpose()?;

        debug!(
            name = %name,
            factors = ?factors,
            choose,
            multiplier = ?multiplier,
            size = elements.len(),
            embedded = parent.is_some(),
            "built combination product set"
        );

        Ok(CombinationProductSet {
            name,
            base_factors: factors.to_vec(),
            choose,
            multiplier,
            elements,
            transposition: Transposition::unison(),
            identity,
            parent,
            relative_index,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without spaces, e.g. `[1,3,5,7]*11`.
    pub fn compact_name(&self) -> String {
        self.name.replace(' ', "")
    }

    /// Name safe for a CSV cell, e.g. `[1-3-5-7]*11`.
    pub fn csv_name(&self) -> String {
        self.compact_name().replace(',', "-")
    }

    pub fn base_factors(&self) -> &[u64] {
        &self.base_factors
    }

    pub fn choose_size(&self) -> usize {
        self.choose
    }

    pub fn multiplier(&self) -> Option<u64> {
        self.multiplier
    }

    /// Product of the base factors, excluding any multiplier.
    pub fn factor_product(&self) -> u64 {
        // Checked at construction.
        self.base_factors.iter().product()
    }

    /// Elements in ascending ratio order.
    pub fn elements(&self) -> &[ScaleElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn transposition(&self) -> &Transposition {
        &self.transposition
    }

    pub fn identity_map(&self) -> &IdentityMap {
        &self.identity
    }

    /// Current sorted position of the element with this key.
    pub fn position_of(&self, key: &FactorKey) -> Option<usize> {
        self.identity.get(key).copied()
    }

    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// Parent slot of each element, in this set's sorted order.
    pub fn relative_index(&self) -> Option<&[usize]> {
        self.relative_index.as_deref()
    }

    /// Factor key -> parent slot.
    pub fn relative_map(&self) -> Option<FxHashMap<FactorKey, usize>> {
        let index = self.relative_index.as_ref()?;
        Some(
            self.elements
                .iter()
                .zip(index)
                .map(|(elem, &slot)| (elem.key().clone(), slot))
                .collect(),
        )
    }

    /// Octave-reduced ratios in sorted order.
    pub fn ratios(&self) -> Vec<ExactRatio> {
        self.elements.iter().map(ScaleElement::ratio).collect()
    }

    /// Distinct current products (pre-octave-reduction), the basis of
    /// common-tone comparison.
    pub fn products(&self) -> BTreeSet<ExactRatio> {
        self.elements
            .iter()
            .map(ScaleElement::current_product)
            .collect()
    }

    /// One reference tone per element: that element's product as 1/1.
    pub fn transpositions(&self) -> Vec<Transposition> {
        self.elements
            .iter()
            .map(Transposition::from_element)
            .collect()
    }

    pub fn note_indices(&self, mapping: &NoteMapping) -> Vec<u32> {
        self.elements
            .iter()
            .map(|elem| mapping.note_index(elem.ratio()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Transposition and linkage
    // -----------------------------------------------------------------------

    /// Re-express every element relative to `tone`, re-sort, and rebuild the
    /// identity map and relative index.
    ///
    /// An embedded set may only move to the tone its parent snapshot was
    /// taken at, otherwise this fails with `ReferenceMismatch`. To follow a
    /// re-transposed parent, `relink` to it first or use `transpose_family`.
    pub fn transpose(&mut self, tone: &Transposition) -> Result<(), CpsError> {
        if let Some(link) = self
            .parent
            .as_ref()
            .filter(|link| !link.transposition.same_tone(tone))
        {
            return Err(CpsError::ReferenceMismatch {
                set: self.name.clone(),
                expected: link.transposition.label().to_string(),
                found: tone.label().to_string(),
            });
        }

        let mut elements = self.elements.clone();
        for elem in &mut elements {
            elem.transpose_to(tone.divisor())?;
        }
        elements.sort();

        let identity = identity_map(&elements);
        let relative_index = self
            .parent
            .as_ref()
            .map(|link| relative_index(&elements, link))
            .transpose()?;

        debug!(name = %self.name, tone = %tone, divisor = tone.divisor(), "transposed");

        self.elements = elements;
        self.identity = identity;
        self.relative_index = relative_index;
        self.transposition = tone.clone();
        Ok(())
    }

    /// Replace the parent snapshot with `parent`'s current layout and rebuild
    /// the relative index against it.
    pub fn relink(&mut self, parent: &CombinationProductSet) -> Result<(), CpsError> {
        let link = ParentLink::of(parent);
        let index = relative_index(&self.elements, &link)?;
        self.parent = Some(link);
        self.relative_index = Some(index);
        Ok(())
    }

    /// Transpose this set and `children` to `tone`, relinking each child to
    /// the transposed parent first. Stops at the first failing child; the
    /// parent and earlier children keep their new state.
    pub fn transpose_family(
        &mut self,
        children: &mut [CombinationProductSet],
        tone: &Transposition,
    ) -> Result<(), CpsError> {
        self.transpose(tone)?;
        for child in children.iter_mut() {
            child.relink(self)?;
            child.transpose(tone)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Embedding
    // -----------------------------------------------------------------------

    /// Every smaller set embedded in this one: for each `subset_size`-subset
    /// of the base factors (in combination order) and each remaining factor
    /// as multiplier (ascending), a set over the subset choosing
    /// `inner_choose`, linked to `self`. If `tone` is given each child is
    /// transposed to it immediately; it must be `self`'s current tone.
    pub fn find_embedded_sets(
        &self,
        subset_size: usize,
        inner_choose: usize,
        tone: Option<&Transposition>,
    ) -> Result<Vec<CombinationProductSet>, CpsError> {
        let n = self.base_factors.len();
        if subset_size == 0 || subset_size > n {
            return Err(CpsError::invalid(format!(
                "embedded subset size {subset_size} is outside 1..={n}"
            )));
        }

        let link = ParentLink::of(self);
        let mut found = Vec::new();
        for subset in combinations(&self.base_factors, subset_size) {
            let mut embed = subset.clone();
            embed.sort_unstable();
            let mut multipliers: Vec<u64> = self
                .base_factors
                .iter()
                .copied()
                .filter(|f| !subset.contains(f))
                .collect();
            multipliers.sort_unstable();

            for multiplier in multipliers {
                let options = CpsOptions::choose(inner_choose)
                    .with_multiplier(multiplier)
                    .named(format!("[{}]*{multiplier}", join(&embed, ", ")));
                let mut child = Self::build(&embed, options, Some(link.clone()))?;
                if let Some(tone) = tone {
                    child.transpose(tone)?;
                }
                trace!(child = %child.name, index = ?child.relative_index, "embedded set");
                found.push(child);
            }
        }

        debug!(
            parent = %self.name,
            subset_size,
            inner_choose,
            count = found.len(),
            "found embedded sets"
        );
        Ok(found)
    }
}

fn validate_factors(factors: &[u64]) -> Result<(), CpsError> {
    if factors.is_empty() {
        return Err(CpsError::invalid("no factors specified"));
    }
    if factors.contains(&0) {
        return Err(CpsError::invalid(format!("factors must be positive: {factors:?}")));
    }
    let distinct: BTreeSet<u64> = factors.iter().copied().collect();
    if distinct.len() != factors.len() {
        return Err(CpsError::invalid(format!("factors must be distinct: {factors:?}")));
    }
    Ok(())
}

fn identity_map(elements: &[ScaleElement]) -> IdentityMap {
    elements
        .iter()
        .enumerate()
        .map(|(i, elem)| (elem.key().clone(), i))
        .collect()
}

fn relative_index(elements: &[ScaleElement], link: &ParentLink) -> Result<Vec<usize>, CpsError> {
    elements
        .iter()
        .map(|elem| {
            link.slot(elem.key()).ok_or_else(|| CpsError::MissingParentSlot {
                key: elem.key().clone(),
                parent: link.name.clone(),
            })
        })
        .collect()
}
