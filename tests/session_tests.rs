//! Integration tests for the interactive grading session

use moyenne::catalog::Catalog;
use moyenne::engine::Verdict;
use moyenne::error::EngineError;
use moyenne::session::{Prompt, Session, Step};
use moyenne::models::Track;

/// Drive a session through a scripted list of answers, panicking on any
/// fatal error or rejected answer.
fn drive(session: &mut Session<'_>, answers: &[&str]) {
    for answer in answers {
        match session.submit(answer).expect("no fatal error") {
            Step::Invalid { reason } => panic!("'{answer}' rejected: {reason}"),
            Step::Continue | Step::SubjectDone { .. } => {}
        }
    }
}

/// Answer every remaining grade prompt with the same value.
fn flood(session: &mut Session<'_>, grade: &str) {
    while !session.is_complete() {
        session.submit(grade).expect("no fatal error");
    }
}

#[test]
fn full_math_year_one_walkthrough() {
    let catalog = Catalog::embedded();
    let mut session = Session::new(&catalog);

    assert_eq!(session.prompt(), Prompt::Track);
    drive(&mut session, &["math", "1"]);
    assert!(matches!(session.prompt(), Prompt::Component { .. }));

    flood(&mut session, "12");

    let summary = session.summary().expect("session complete");
    assert_eq!(summary.track, Track::Math);
    assert_eq!(summary.overall, 12.0);
    assert_eq!(summary.verdict, Verdict::Pass);
    assert_eq!(summary.subjects.len(), 8);
    assert!(summary.subjects.iter().all(|s| !s.grouped));
}

#[test]
fn failing_grades_produce_a_fail_verdict() {
    let catalog = Catalog::embedded();
    let mut session = Session::new(&catalog);
    drive(&mut session, &["info", "1"]);
    flood(&mut session, "7.5");

    let summary = session.summary().expect("session complete");
    assert_eq!(summary.verdict, Verdict::Fail);
    assert_eq!(summary.overall, 7.5);
}

#[test]
fn track_names_accept_english_aliases() {
    let catalog = Catalog::embedded();

    for alias in ["info", "computer science", "INFO"] {
        let mut session = Session::new(&catalog);
        assert_eq!(
            session.submit(alias).expect("track accepted"),
            Step::Continue,
            "alias '{alias}'"
        );
        assert_eq!(session.prompt(), Prompt::Year { track: Track::Info });
    }
}

#[test]
fn bad_answers_re_prompt_without_losing_progress() {
    let catalog = Catalog::embedded();
    let mut session = Session::new(&catalog);

    // Bad track, then good track.
    assert!(matches!(
        session.submit("astronomy").expect("recoverable"),
        Step::Invalid { .. }
    ));
    drive(&mut session, &["physics"]);

    // Bad year, then good year.
    assert!(matches!(
        session.submit("9").expect("recoverable"),
        Step::Invalid { .. }
    ));
    drive(&mut session, &["2"]);

    // Bad grades, then a good one: still on the same subject.
    assert!(matches!(
        session.submit("-3").expect("recoverable"),
        Step::Invalid { .. }
    ));
    assert!(matches!(
        session.submit("vingt").expect("recoverable"),
        Step::Invalid { .. }
    ));
    assert_eq!(session.submit("14").expect("grade"), Step::Continue);
}

#[test]
fn grades_at_the_bounds_are_accepted() {
    let catalog = Catalog::embedded();
    let mut session = Session::new(&catalog);
    drive(&mut session, &["math", "1"]);

    assert_eq!(session.submit("0").expect("lower bound"), Step::Continue);
    assert_eq!(session.submit("20").expect("upper bound"), Step::Continue);
}

#[test]
fn split_year_requires_a_variant_choice() {
    let catalog = Catalog::embedded();
    let mut session = Session::new(&catalog);
    drive(&mut session, &["info", "4"]);

    assert_eq!(
        session.prompt(),
        Prompt::Variant {
            track: Track::Info,
            number: 4
        }
    );
    assert!(matches!(
        session.submit("+6").expect("recoverable"),
        Step::Invalid { .. }
    ));
    drive(&mut session, &["+5"]);
    assert!(matches!(session.prompt(), Prompt::Component { .. }));
}

#[test]
fn pending_and_unsupported_years_abort_with_distinct_errors() {
    let catalog = Catalog::embedded();

    let mut session = Session::new(&catalog);
    drive(&mut session, &["lettres"]);
    let err = session.submit("1").expect_err("lettres is pending");
    assert!(matches!(
        err,
        EngineError::UnsupportedYear { .. }
    ));
    assert!(err.to_string().contains("not available yet"));

    let mut session = Session::new(&catalog);
    drive(&mut session, &["musique"]);
    let err = session.submit("3").expect_err("music is refused");
    assert!(err.to_string().contains("not supported"));
}

#[test]
fn sciences_walkthrough_folds_the_biology_group() {
    let catalog = Catalog::embedded();
    let mut session = Session::new(&catalog);
    drive(&mut session, &["sciences", "1"]);
    flood(&mut session, "14");

    let summary = session.summary().expect("session complete");
    assert_eq!(summary.overall, 14.0);
    assert_eq!(
        summary.subjects.iter().filter(|s| s.grouped).count(),
        4,
        "the four biology subjects fold through the group"
    );
}

#[test]
fn completed_session_rejects_further_answers() {
    let catalog = Catalog::embedded();
    let mut session = Session::new(&catalog);
    drive(&mut session, &["math", "1"]);
    flood(&mut session, "10");

    assert_eq!(session.prompt(), Prompt::Done);
    assert!(matches!(
        session.submit("10").expect("no fatal error"),
        Step::Invalid { .. }
    ));
}

#[test]
fn summary_is_unavailable_before_completion() {
    let catalog = Catalog::embedded();
    let session = Session::new(&catalog);
    assert!(session.summary().is_err());
}
