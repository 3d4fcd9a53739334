//! Integration tests for the shipped rule tables

use moyenne::catalog::{Catalog, Classification};
use moyenne::models::{Track, Variant, Year, YearStatus};

#[test]
fn all_six_tracks_are_present() {
    let catalog = Catalog::embedded();
    for track in Track::ALL {
        assert!(
            catalog.track(track).is_some(),
            "track {track} missing from the tables"
        );
    }
}

#[test]
fn active_years_have_subjects_and_positive_coefficients() {
    let catalog = Catalog::embedded();
    for track in catalog.tracks() {
        for year_table in &track.years {
            if year_table.status != YearStatus::Active {
                continue;
            }
            let year = Year {
                number: year_table.number,
                variant: year_table.variant,
            };
            let subjects = catalog
                .subjects(track.id, &year)
                .expect("active year has a table");
            assert!(
                !subjects.is_empty(),
                "{} is active but empty",
                year.label(track.id)
            );
            for rule in subjects {
                assert!(
                    rule.coefficient > 0.0,
                    "{}: '{}' has coefficient {}",
                    year.label(track.id),
                    rule.name,
                    rule.coefficient
                );
            }
        }
    }
}

#[test]
fn math_year_one_coefficients_match_the_published_table() {
    let catalog = Catalog::embedded();
    let year = Year::new(1);

    for (name, coefficient) in [
        ("analyse", 4.0),
        ("algebre", 2.0),
        ("thermo", 3.0),
        ("stm", 3.0),
        ("mecanique", 3.0),
        ("elect", 3.0),
        ("tarikh l3olom", 1.0),
        ("tarbiya", 1.0),
    ] {
        assert_eq!(
            catalog
                .coefficient(Track::Math, &year, name)
                .expect("listed subject"),
            coefficient,
            "{name}"
        );
    }
}

#[test]
fn physics_year_one_mirrors_math_year_one() {
    let catalog = Catalog::embedded();
    let year = Year::new(1);

    let math = catalog.subjects(Track::Math, &year).expect("math year 1");
    let physics = catalog
        .subjects(Track::Physics, &year)
        .expect("physics year 1");

    assert_eq!(math, physics);
}

#[test]
fn special_subjects_are_direct_regardless_of_track_tables() {
    let catalog = Catalog::embedded();
    assert!(catalog.is_special("vibrations"));
    assert!(catalog.is_special("Optique"));
    assert!(!catalog.is_special("optique"), "special set is exact-match");

    let year = Year::new(2);
    for name in ["vibrations", "Optique"] {
        assert_eq!(
            catalog
                .classify(Track::Physics, &year, name)
                .expect("physics year 2 subject"),
            Classification::DirectAverage
        );
    }
}

#[test]
fn alternate_weighting_marks_exactly_three_years() {
    let catalog = Catalog::embedded();
    let mut flagged = Vec::new();

    for track in catalog.tracks() {
        for year_table in &track.years {
            if year_table.alt_weighting {
                let year = Year {
                    number: year_table.number,
                    variant: year_table.variant,
                };
                flagged.push(year.label(track.id));
            }
        }
    }

    flagged.sort();
    assert_eq!(flagged, ["info2", "info3", "physics3 (+4)"]);
}

#[test]
fn historic_trailing_space_names_survive_loading() {
    let catalog = Catalog::embedded();

    let info_plus_four = Year::with_variant(4, Variant::PlusFour);
    for name in ["Réseau2 ", "GL ", "Poo ", "Web2 "] {
        assert!(
            catalog.subject(Track::Info, &info_plus_four, name).is_ok(),
            "'{name}' (with trailing space) must resolve"
        );
    }

    // The "+5" table carries the same names without the space; the two
    // must stay distinct entries.
    let info_plus_five = Year::with_variant(4, Variant::PlusFive);
    assert!(catalog.subject(Track::Info, &info_plus_five, "GL").is_ok());
    assert!(catalog
        .subject(Track::Info, &info_plus_five, "GL ")
        .is_err());
}

#[test]
fn year_availability_follows_the_tables() {
    let catalog = Catalog::embedded();

    assert_eq!(
        catalog.year_status(Track::Math, &Year::with_variant(4, Variant::PlusFour)),
        YearStatus::NotYetAvailable
    );
    assert_eq!(
        catalog.year_status(Track::Math, &Year::with_variant(4, Variant::PlusFive)),
        YearStatus::Active
    );
    assert_eq!(
        catalog.year_status(Track::Lettres, &Year::new(1)),
        YearStatus::NotYetAvailable
    );
    assert_eq!(
        catalog.year_status(Track::Musique, &Year::new(5)),
        YearStatus::PermanentlyUnsupported
    );
}

#[test]
fn split_years_are_detected_per_track() {
    let catalog = Catalog::embedded();

    assert!(catalog.has_variants(Track::Math, 4));
    assert!(catalog.has_variants(Track::Physics, 3));
    assert!(catalog.has_variants(Track::Sciences, 3));
    assert!(!catalog.has_variants(Track::Math, 1));
    assert!(!catalog.has_variants(Track::Musique, 4));
}

#[test]
fn external_table_file_overrides_the_embedded_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tables.toml");
    std::fs::write(
        &path,
        r#"
version = 99

[[tracks]]
id = "math"
label = "Mathematics"

[[tracks.years]]
number = 1
subjects = [
  { name = "analyse", coefficient = 4.0, components = ["exam1", "exam2", "tutorial"] },
]
"#,
    )
    .expect("write tables");

    let catalog = Catalog::load(Some(&path)).expect("load external tables");
    assert_eq!(catalog.version(), 99);
    assert!(catalog.track(Track::Physics).is_none());

    let missing = dir.path().join("nope.toml");
    assert!(Catalog::load(Some(&missing)).is_err());

    let embedded = Catalog::load(None).expect("embedded fallback");
    assert_eq!(embedded.version(), 1);
}
