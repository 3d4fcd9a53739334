//! Interactive average calculation command

use moyenne::catalog::Catalog;
use moyenne::config::Config;
use moyenne::counter::{FileUsageCounter, UsageCounter};
use moyenne::report::ResultSheet;
use moyenne::session::{Prompt, Session, Step};
use moyenne::warn;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Run one interactive grading session on stdin/stdout.
pub fn run(config: &Config, report: Option<&Path>) {
    let catalog = match Catalog::load(config.tables_path().as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let mut session = Session::new(&catalog);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.is_complete() {
        print_prompt(&catalog, &session.prompt());
        io::stdout().flush().ok();

        let Some(Ok(line)) = lines.next() else {
            eprintln!("\n✗ Input closed; session aborted");
            std::process::exit(1);
        };

        match session.submit(&line) {
            Ok(Step::Continue) => {}
            Ok(Step::Invalid { reason }) => println!("✗ {reason}"),
            Ok(Step::SubjectDone { subject, average }) => {
                println!("✓ {}: {average:.2}", subject.trim_end());
            }
            Err(e) => {
                eprintln!("✗ {e}");
                std::process::exit(1);
            }
        }
    }

    let summary = match session.summary() {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    println!();
    println!("=== {} ===", summary.year.label(summary.track));
    for subject in &summary.subjects {
        let marker = if subject.grouped { " (group)" } else { "" };
        println!(
            "  {} = {:.2} (coefficient {}){marker}",
            subject.name.trim_end(),
            subject.average,
            subject.coefficient
        );
    }
    println!();
    println!("Overall average: {:.2} - {}", summary.overall, summary.verdict);

    // The counter is best-effort; a read-only disk must not lose the result.
    let counter = FileUsageCounter::open(config.counter_path());
    if let Err(e) = counter.record_completion() {
        warn!("Could not record session completion: {e}");
    }

    if let Some(path) = report {
        match ResultSheet::new().write_to_file(&catalog, summary, path) {
            Ok(()) => println!("✓ Result sheet written: {}", path.display()),
            Err(e) => eprintln!("✗ Failed to write result sheet: {e}"),
        }
    }
}

fn print_prompt(catalog: &Catalog, prompt: &Prompt<'_>) {
    match prompt {
        Prompt::Track => {
            println!("Available tracks:");
            for track in catalog.tracks() {
                println!("  {} - {}", track.id, track.label);
            }
            print!("Track: ");
        }
        Prompt::Year { track } => {
            print!("{track} year (1-5): ");
        }
        Prompt::Variant { track, number } => {
            print!("{track}{number} sub-level (+4 or +5): ");
        }
        Prompt::Component { subject, label } => {
            print!("{} - {label}: ", subject.trim_end());
        }
        Prompt::Direct { subject } => {
            print!("{} - average: ", subject.trim_end());
        }
        Prompt::Done => {}
    }
}
