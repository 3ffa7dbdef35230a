// Printing routines behind the `cps` subcommands.
//
// Every routine renders into a `String` and leaves printing to main.rs.
// Routines that need to transpose work on a clone, so the caller's set is
// never left at some other 1/1.

use cps_core::{
    CombinationProductSet, CommonToneBuckets, CpsError, ListOptions, NoteMapping, Transposition,
    list_factors, list_scale, summary,
};

/// Width of the name column in tabular listings.
const NAME_WIDTH: usize = 19;

fn tabular(layout: &ListOptions) -> ListOptions {
    ListOptions {
        tabular: true,
        ..*layout
    }
}

/// The set's element lines, its ratios and its note indices.
pub fn show(cps: &CombinationProductSet, layout: &ListOptions, mapping: &NoteMapping) -> String {
    format!(
        "{cps}\n\n{:>10} {}\n{:>10} {:?}",
        "ratios:",
        list_scale(cps, layout),
        "notes:",
        cps.note_indices(mapping)
    )
}

pub fn show_json(cps: &CombinationProductSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&summary(cps))
}

/// The whole set at every one of its elements as 1/1.
pub fn transpositions(cps: &CombinationProductSet) -> Result<String, CpsError> {
    let mut cps = cps.clone();
    let mut out = Vec::new();
    for tone in cps.transpositions() {
        cps.transpose(&tone)?;
        out.push(format!("\n-----\n\n{cps}\n"));
    }
    Ok(out.join("\n"))
}

/// Human-readable table of `children` against their parent, followed by
/// their plain ratio lists and their parent slots.
pub fn embedded_table(
    parent: &CombinationProductSet,
    children: &[CombinationProductSet],
    layout: &ListOptions,
) -> String {
    let table = tabular(layout);
    let tone = parent.transposition();
    let mut lines = vec![
        format!("\n=====\n\nSets contained in {}, 1/1 = {tone}:", parent.name()),
        format!("reference:\t\t{}", list_scale(parent, &table)),
    ];
    for child in children {
        lines.push(format!(
            "{}:\t{}\t[{}]",
            child.name(),
            list_scale(child, &table),
            child.factor_product()
        ));
    }

    lines.push(String::new());
    lines.push(format!("1/1 = {tone}:"));
    for child in children {
        lines.push(format!("{}:\t{}", child.name(), list_scale(child, layout)));
    }

    lines.push(String::new());
    for child in children {
        lines.push(format!("{}:\t{:?}", child.name(), child.relative_index().unwrap_or(&[])));
    }
    lines.join("\n")
}

/// The same table as CSV: a header row of the parent's factor tuples, the
/// parent's ratios, then one row per child.
pub fn embedded_csv(parent: &CombinationProductSet, children: &[CombinationProductSet]) -> String {
    let csv = ListOptions::table().as_csv();
    let mut lines = vec![
        format!(
            "{} @ {},{}",
            parent.name(),
            parent.transposition(),
            list_factors(parent, true)
        ),
        format!(",{}", list_scale(parent, &csv)),
    ];
    for child in children {
        lines.push(format!("{},{}", child.csv_name(), list_scale(child, &csv)));
    }
    lines.join("\n")
}

/// Non-empty buckets of a common-tone analysis, most shared tones last.
pub fn common_tones(reference: &CombinationProductSet, buckets: &CommonToneBuckets<'_>) -> String {
    let mut out = format!(
        "Intersections for {} {:?}\n",
        list_scale(reference, &ListOptions::default()),
        reference.relative_index().unwrap_or(&[])
    );
    for (shared, sets) in buckets.iter().filter(|(_, sets)| !sets.is_empty()) {
        out.push_str(&format!("\ncommon tones: {shared} ->\n"));
        for set in sets {
            out.push_str(&format!("    {}\n", set.name()));
        }
    }
    out
}

/// Pick sets out of `sets` by compact name (`[1,3,5,7]*11`) and list them
/// as ratios, as tabular rows, as parent slots and as note indices.
pub fn collect(
    sets: &[CombinationProductSet],
    names: &[String],
    layout: &ListOptions,
    mapping: &NoteMapping,
) -> Result<String, CpsError> {
    let collection = names
        .iter()
        .map(|name| {
            let wanted = name.replace(' ', "");
            sets.iter()
                .find(|set| set.compact_name() == wanted)
                .ok_or_else(|| CpsError::InvalidArgument(format!("no embedded set named {name}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let table = tabular(layout);
    let mut lines = vec!["as ratios".to_string()];
    for set in &collection {
        lines.push(format!("{:<NAME_WIDTH$}\t{}", set.name(), list_scale(set, layout)));
    }

    lines.push(String::new());
    for set in &collection {
        lines.push(format!("{:<NAME_WIDTH$}\t{}", set.name(), list_scale(set, &table)));
    }

    lines.push(String::new());
    lines.push("as offsets".to_string());
    for set in &collection {
        let offsets: Vec<String> = set
            .relative_index()
            .unwrap_or(&[])
            .iter()
            .map(|i| format!("{i:>3}"))
            .collect();
        lines.push(format!("{:<NAME_WIDTH$}\t[{} ]", set.name(), offsets.join(",")));
    }

    lines.push(String::new());
    lines.push("as note values".to_string());
    for set in &collection {
        let notes: Vec<String> = set
            .note_indices(mapping)
            .iter()
            .map(|n| format!("{n:>5}"))
            .collect();
        lines.push(format!("{:<NAME_WIDTH$}\t{}", set.name(), notes.join(",")));
    }
    Ok(lines.join("\n"))
}

/// For every transposition of `parent`: the embedded sets that contain 1/1
/// and those over the base factors whose product is `product`. Then every
/// `product` set across all transpositions on its own.
pub fn tonic_sets(
    parent: &CombinationProductSet,
    subset_size: usize,
    inner_choose: usize,
    product: u64,
    layout: &ListOptions,
) -> Result<String, CpsError> {
    let table = tabular(layout);
    let mut parent = parent.clone();
    let tones: Vec<Transposition> = parent.transpositions();
    let mut lines = Vec::new();
    let mut matching = Vec::new();

    for tone in &tones {
        parent.transpose(tone)?;
        lines.push(format!(
            "\n=====\n\n1/1 sets contained in {}, 1/1 = {tone}:",
            parent.name()
        ));
        lines.push(format!(
            "{:<NAME_WIDTH$}\t{}",
            "Reference:",
            list_scale(&parent, &table)
        ));

        for child in parent.find_embedded_sets(subset_size, inner_choose, Some(tone))? {
            let has_tonic = child.ratios().iter().any(|r| *r == 1u64);
            let row = list_scale(&child, &table);
            if has_tonic || child.factor_product() == product {
                lines.push(format!("{}:\t{row}", child.name()));
            }
            if child.factor_product() == product {
                matching.push(format!("{:<7} {}:\t{row}", tone.label(), child.name()));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "All sets with base-factor product {product} across the transpositions of {}",
        parent.name()
    ));
    lines.extend(matching);
    Ok(lines.join("\n"))
}
