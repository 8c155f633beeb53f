mod common;

use std::collections::BTreeSet;

use scout_terminal::ScoutError;
use scout_terminal::catalog::AttributeCatalog;
use scout_terminal::filter::{AgeRange, AttributeRanges, IdentificationCriteria, TextMatch, search};

use common::{mixed_nations, names, squad};

#[test]
fn nationality_options_are_ored_and_ranges_are_anded() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);

    let ident = IdentificationCriteria {
        nationalities: vec!["Brazil".to_string(), "Italy".to_string()],
        ..Default::default()
    };
    let mut ranges = AttributeRanges::unrestricted(&catalog);
    ranges.set("Shooting_goals", 2.0, 10.0).unwrap();

    let results = search(&table, &ident, &ranges).unwrap();
    // Enzo is Italian but has no recorded goals, so the range drops him.
    assert_eq!(names(&table, results.rows()), vec!["Ana Silva", "Bruno Reis"]);
}

#[test]
fn ranges_are_inclusive_at_both_ends() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let mut ranges = AttributeRanges::unrestricted(&catalog);
    ranges.set("Shooting_goals", 10.0, 10.0).unwrap();

    let results = search(&table, &IdentificationCriteria::default(), &ranges).unwrap();
    assert_eq!(results.rows(), &[0, 3]);
}

#[test]
fn unrestricted_search_returns_every_row_in_order() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let results = search(
        &table,
        &IdentificationCriteria::default(),
        &AttributeRanges::unrestricted(&catalog),
    )
    .unwrap();
    assert_eq!(results.rows(), &[0, 1, 2, 3, 4]);
}

#[test]
fn substring_matching_is_the_default_and_token_matching_is_opt_in() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let ranges = AttributeRanges::unrestricted(&catalog);

    let mut ident = IdentificationCriteria {
        nationalities: vec!["Niger".to_string()],
        ..Default::default()
    };
    let loose = search(&table, &ident, &ranges).unwrap();
    assert_eq!(names(&table, loose.rows()), vec!["Dahir Ali"]);

    ident.text_match = TextMatch::Token;
    assert!(search(&table, &ident, &ranges).unwrap().is_empty());
}

#[test]
fn age_and_club_filters_combine() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let ident = IdentificationCriteria {
        age: Some(AgeRange::new(24, 26)),
        clubs: BTreeSet::from(["Real Costa".to_string()]),
        ..Default::default()
    };
    let results = search(&table, &ident, &AttributeRanges::unrestricted(&catalog)).unwrap();
    assert_eq!(names(&table, results.rows()), vec!["Ana Silva", "Caio Lima"]);
}

#[test]
fn position_filter_matches_any_listed_role() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let ident = IdentificationCriteria {
        positions: vec!["Back".to_string(), "Goalkeeper".to_string()],
        ..Default::default()
    };
    let results = search(&table, &ident, &AttributeRanges::unrestricted(&catalog)).unwrap();
    assert_eq!(names(&table, results.rows()), vec!["Bruno Reis", "Caio Lima"]);
}

#[test]
fn unknown_attribute_is_rejected() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let mut ranges = AttributeRanges::unrestricted(&catalog);
    let err = ranges.set("Shooting_penalties", 0.0, 1.0).unwrap_err();
    assert_eq!(
        err,
        ScoutError::InvalidAttribute {
            column: "Shooting_penalties".to_string()
        }
    );
    assert!(!catalog.contains("player"));
}

#[test]
fn inverted_range_is_rejected_before_filtering() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let mut ranges = AttributeRanges::unrestricted(&catalog);
    ranges.set("Passing_pct", 90.0, 60.0).unwrap();
    let err = search(&table, &IdentificationCriteria::default(), &ranges).unwrap_err();
    assert!(matches!(err, ScoutError::InvalidRange { .. }));
}

#[test]
fn full_extent_slider_applies_no_restriction() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let max = catalog.attribute("Shooting_goals").unwrap().max;
    assert_eq!(max, 10.0);

    let ranges = AttributeRanges::from_sliders(&catalog, [("Shooting_goals", 0.0, max)]).unwrap();
    assert_eq!(ranges.get("Shooting_goals"), None);
    // The empty Shooting_goals cell only matters once a range is set.
    let results = search(&table, &IdentificationCriteria::default(), &ranges).unwrap();
    assert_eq!(results.len(), 5);

    let narrowed = AttributeRanges::from_sliders(&catalog, [("Shooting_goals", 0.0, 5.0)]).unwrap();
    let results = search(&table, &IdentificationCriteria::default(), &narrowed).unwrap();
    assert_eq!(names(&table, results.rows()), vec!["Bruno Reis", "Caio Lima"]);
}

#[test]
fn nationality_set_is_ored_then_anded_with_age() {
    let table = mixed_nations();
    let catalog = AttributeCatalog::build(&table);
    let ranges = AttributeRanges::unrestricted(&catalog);

    let mut ident = IdentificationCriteria {
        nationalities: vec!["Brazil".to_string(), "France".to_string()],
        ..Default::default()
    };
    let either = search(&table, &ident, &ranges).unwrap();
    assert_eq!(either.rows(), &[0, 1, 3, 4]);

    ident.age = Some(AgeRange::new(18, 23));
    let both = search(&table, &ident, &ranges).unwrap();
    assert_eq!(names(&table, both.rows()), vec!["Zeca Matos", "Lucien Morel"]);
}

#[test]
fn survivors_keep_dataset_order() {
    let table = mixed_nations();
    let ages: Vec<u32> = table.rows().iter().map(|r| r.age).collect();
    assert_eq!(ages, vec![21, 28, 20, 26, 19]);

    let catalog = AttributeCatalog::build(&table);
    let ident = IdentificationCriteria {
        nationalities: vec!["Brazil".to_string(), "France".to_string()],
        ..Default::default()
    };
    let mut ranges = AttributeRanges::unrestricted(&catalog);
    ranges.set("Shooting_goals", 1.0, 9.0).unwrap();

    let results = search(&table, &ident, &ranges).unwrap();
    // Sorting by name, age or goals would each give a different sequence.
    assert_eq!(
        names(&table, results.rows()),
        vec!["Zeca Matos", "Antoine Roux", "Bruno Alves", "Lucien Morel"]
    );
}
