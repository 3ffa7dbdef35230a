// End-to-end checks on the 1-3-5-7-11-13 eikosany: construction, octave
// reduction, repeated transposition, hexany embedding and common tones.

use cps_core::factors::binomial;
use cps_core::{
    CombinationProductSet, CpsConfig, CpsOptions, ErrorKind, ExactRatio, ListOptions,
    Transposition, find_common_tones, list_scale,
};
use std::collections::BTreeSet;

const FACTORS: [u64; 6] = [1, 3, 5, 7, 11, 13];

fn eikosany() -> CombinationProductSet {
    CombinationProductSet::with_options(&FACTORS, CpsOptions::choose(3).named("eikosany")).unwrap()
}

fn tone(s: &str) -> Transposition {
    s.parse().unwrap()
}

#[test]
fn twenty_elements_inside_one_octave() {
    let mut cps = eikosany();
    assert_eq!(cps.len(), binomial(6, 3));

    for t in cps.transpositions() {
        cps.transpose(&t).unwrap();
        for elem in cps.elements() {
            let label = elem.ratio_label();
            assert!(
                (elem.ratio() > 1u64 && elem.ratio() <= 2u64) || label == "1/1",
                "{label} at 1/1 = {t}"
            );
        }
        // The element chosen as 1/1 sorts first.
        assert_eq!(cps.elements()[0].ratio_label(), "1/1");
    }
}

#[test]
fn octave_reduction_is_idempotent() {
    for numer in 1..=64u64 {
        for denom in 1..=16u64 {
            let x = ExactRatio::new(numer, denom).unwrap();
            let once = x.octave_reduce();
            assert_eq!(once.octave_reduce(), once, "{x}");
            assert!(once <= 2u64);
        }
    }
}

#[test]
fn repeated_transposition_matches_a_single_one() {
    for label in ["1*3*5", "7*11*13", "3*5*13"] {
        let t = tone(label);
        let mut once = eikosany();
        once.transpose(&t).unwrap();

        let mut twice = eikosany();
        twice.transpose(&t).unwrap();
        twice.transpose(&t).unwrap();

        assert_eq!(once.ratios(), twice.ratios(), "{label}");
        let plain = ListOptions::default();
        assert_eq!(list_scale(&once, &plain), list_scale(&twice, &plain));
    }
}

#[test]
fn thirty_hexanies_of_six_elements() {
    let cps = eikosany();
    let hexanies = cps.find_embedded_sets(4, 2, None).unwrap();
    assert_eq!(hexanies.len(), binomial(6, 4) * 2);
    assert!(hexanies.iter().all(|h| h.len() == binomial(4, 2)));

    let names: BTreeSet<&str> = hexanies.iter().map(|h| h.name()).collect();
    assert_eq!(names.len(), 30);
}

#[test]
fn relative_indices_survive_retransposition() {
    let t = tone("1*3*5");
    let mut cps = eikosany();
    cps.transpose(&t).unwrap();
    let mut hexanies = cps.find_embedded_sets(4, 2, Some(&t)).unwrap();

    let snapshot: Vec<Vec<usize>> = hexanies
        .iter()
        .map(|h| h.relative_index().unwrap().to_vec())
        .collect();

    for (hex, index) in hexanies.iter().zip(&snapshot) {
        let distinct: BTreeSet<usize> = index.iter().copied().collect();
        assert_eq!(distinct.len(), index.len(), "{}", hex.name());
        assert!(index.iter().all(|&slot| slot < cps.len()));
    }

    // Same divisor again, parent and children together.
    cps.transpose_family(&mut hexanies, &t).unwrap();
    for (hex, index) in hexanies.iter().zip(&snapshot) {
        assert_eq!(hex.relative_index().unwrap(), &index[..], "{}", hex.name());
    }
}

#[test]
fn a_set_compared_with_itself_shares_everything() {
    let t = tone("3*7*11");
    let mut cps = eikosany();
    cps.transpose(&t).unwrap();
    let mut hexanies = cps.find_embedded_sets(4, 2, Some(&t)).unwrap();
    let copy = hexanies[0].clone();
    hexanies.push(copy);

    let buckets = find_common_tones(&hexanies, 0, &t).unwrap();
    assert_eq!(buckets.keys().copied().max(), Some(6));
    assert_eq!(buckets[&6].len(), 1);
    assert_eq!(buckets[&6][0].name(), hexanies[0].name());
    assert_eq!(buckets.values().map(Vec::len).sum::<usize>(), 30);
}

#[test]
fn comparing_an_element_with_an_integer_is_a_type_mismatch() {
    let cps = eikosany();
    let elem = &cps.elements()[0];
    let err = elem.try_cmp(&5u64).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(elem.try_cmp(&cps.elements()[1]).is_ok());
}

#[test]
fn config_drives_a_dekany() {
    let config =
        CpsConfig::from_json(r#"{ "base_factors": [1, 3, 5, 7, 11], "choose": 2, "name": "dekany" }"#)
            .unwrap();
    let dekany = config.build_set().unwrap();
    assert_eq!(dekany.len(), 10);
    assert_eq!(dekany.name(), "dekany");

    // 3-subsets with two remaining multipliers each, choosing 1: 5C3 * 2.
    let triads = dekany.find_embedded_sets(3, 1, None).unwrap();
    assert_eq!(triads.len(), 20);
    assert!(triads.iter().all(|t| t.len() == 3));
}
