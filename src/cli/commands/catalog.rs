//! Rule-table inspection commands (`tracks`, `subjects`)

use moyenne::catalog::{Catalog, Classification};
use moyenne::config::Config;
use moyenne::models::{Track, Variant, Year, YearStatus};

/// List every track with the availability of its years.
pub fn run_tracks(config: &Config) {
    let catalog = match Catalog::load(config.tables_path().as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    println!("Rule tables revision {}", catalog.version());
    for track in catalog.tracks() {
        println!("\n{} ({})", track.label, track.id);
        for year in &track.years {
            let label = Year {
                number: year.number,
                variant: year.variant,
            }
            .label(track.id);
            match year.status {
                YearStatus::Active => {
                    println!("  {label}: {} subjects", year.subjects.len());
                }
                status => println!("  {label}: {}", status.user_message()),
            }
        }
    }
}

/// List one year's subjects with coefficients and grade components.
pub fn run_subjects(config: &Config, track: &str, year_number: u8, variant: Option<&str>) {
    let catalog = match Catalog::load(config.tables_path().as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let Some(track) = Track::parse(track) else {
        eprintln!("✗ Unknown track '{track}'");
        std::process::exit(1);
    };

    let year = match variant {
        Some(v) => match Variant::parse(v) {
            Some(variant) => Year::with_variant(year_number, variant),
            None => {
                eprintln!("✗ '{v}' is not one of +4 or +5");
                std::process::exit(1);
            }
        },
        None => {
            if catalog.has_variants(track, year_number) {
                eprintln!("✗ {track}{year_number} is split; pass --variant +4 or --variant +5");
                std::process::exit(1);
            }
            Year::new(year_number)
        }
    };

    let subjects = match catalog.subjects(track, &year) {
        Ok(subjects) => subjects,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    println!("{}:", year.label(track));
    for rule in subjects {
        let inputs = match catalog.classify(track, &year, &rule.name) {
            Ok(Classification::DirectAverage) => "direct average".to_string(),
            Ok(Classification::Components { components, cc }) => components
                .iter()
                .map(|c| c.label(cc))
                .collect::<Vec<_>>()
                .join(", "),
            Err(e) => {
                eprintln!("✗ {e}");
                std::process::exit(1);
            }
        };
        println!(
            "  {} (coefficient {}): {inputs}",
            rule.name.trim_end(),
            rule.coefficient
        );
    }

    if let Some(group) = catalog.group(track, &year) {
        println!(
            "\nGroup (coefficient {}): {}",
            group.coefficient,
            group.members.join(", ")
        );
    }
}
