//! Interactive grading session
//!
//! A pull-model state machine over the rule tables: the caller asks what
//! to prompt for, feeds raw answer strings back in, and receives either a
//! re-prompt, a per-subject average, or the final summary. The session
//! owns all sequencing so every front end walks subjects and components
//! in the same fixed order.

use crate::core::catalog::Catalog;
use crate::core::engine::{compute_subject_average, Accumulator, Verdict};
use crate::core::error::EngineError;
use crate::core::models::{
    parse_grade, FormulaKind, SubjectGrade, SubjectRule, Track, Variant, Year,
};

/// What the session needs from the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// Choose a track.
    Track,
    /// Choose a year number within the track.
    Year {
        /// Track already chosen
        track: Track,
    },
    /// The year splits into "+4"/"+5" curricula; choose one.
    Variant {
        /// Track already chosen
        track: Track,
        /// Year number already chosen
        number: u8,
    },
    /// Enter one grade component for the current subject.
    Component {
        /// Subject being graded
        subject: &'a str,
        /// Prompt label ("Exam 1", "TP", "TD", "CC")
        label: &'static str,
    },
    /// Enter the subject's average directly.
    Direct {
        /// Subject being graded
        subject: &'a str,
    },
    /// Nothing more to ask; the summary is available.
    Done,
}

/// Outcome of feeding one answer to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Answer accepted; ask for the next prompt.
    Continue,
    /// Answer rejected; same prompt again.
    Invalid {
        /// Why the answer was rejected
        reason: String,
    },
    /// The answer completed a subject.
    SubjectDone {
        /// Subject just finished
        subject: String,
        /// Its computed average
        average: f64,
    },
}

/// One graded subject in the final summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectResult {
    /// Subject name
    pub name: String,
    /// Computed subject average
    pub average: f64,
    /// Coefficient from the rule table
    pub coefficient: f64,
    /// Folded via the group rule rather than individually
    pub grouped: bool,
}

/// Final result of a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Track graded
    pub track: Track,
    /// Year graded
    pub year: Year,
    /// Overall weighted average, ceiled to two decimals
    pub overall: f64,
    /// Pass/fail outcome
    pub verdict: Verdict,
    /// Per-subject results in solicitation order
    pub subjects: Vec<SubjectResult>,
}

struct Grading<'a> {
    track: Track,
    year: Year,
    subjects: &'a [SubjectRule],
    accumulator: Accumulator<'a>,
    subject_index: usize,
    component_index: usize,
    record: SubjectGrade,
    results: Vec<SubjectResult>,
}

enum State<'a> {
    ChoosingTrack,
    ChoosingYear { track: Track },
    ChoosingVariant { track: Track, number: u8 },
    Grading(Grading<'a>),
    Complete(Option<Summary>),
}

/// One conversational grading session over a loaded catalog.
pub struct Session<'a> {
    catalog: &'a Catalog,
    state: State<'a>,
}

impl<'a> Session<'a> {
    /// Start a session at track selection.
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            state: State::ChoosingTrack,
        }
    }

    /// Whether the session has produced its summary.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.state, State::Complete(_))
    }

    /// The next question to put to the user.
    #[must_use]
    pub fn prompt(&self) -> Prompt<'_> {
        match &self.state {
            State::ChoosingTrack => Prompt::Track,
            State::ChoosingYear { track } => Prompt::Year { track: *track },
            State::ChoosingVariant { track, number } => Prompt::Variant {
                track: *track,
                number: *number,
            },
            State::Grading(grading) => {
                let rule = &grading.subjects[grading.subject_index];
                if self.is_direct(rule) {
                    Prompt::Direct {
                        subject: &rule.name,
                    }
                } else {
                    Prompt::Component {
                        subject: &rule.name,
                        label: rule.components[grading.component_index].label(rule.cc),
                    }
                }
            }
            State::Complete(_) => Prompt::Done,
        }
    }

    /// Feed one raw answer string to the current prompt.
    ///
    /// # Errors
    ///
    /// Fatal errors abort the session: selecting a pending or permanently
    /// unsupported year surfaces [`EngineError::UnsupportedYear`], and
    /// rule-table inconsistencies surface as they are hit. Malformed
    /// answers are NOT errors; they come back as [`Step::Invalid`] and
    /// the same prompt repeats.
    pub fn submit(&mut self, input: &str) -> Result<Step, EngineError> {
        match &mut self.state {
            State::ChoosingTrack => self.choose_track(input),
            State::ChoosingYear { track } => {
                let track = *track;
                self.choose_year(track, input)
            }
            State::ChoosingVariant { track, number } => {
                let (track, number) = (*track, *number);
                self.choose_variant(track, number, input)
            }
            State::Grading(_) => self.grade(input),
            State::Complete(_) => Ok(Step::Invalid {
                reason: "the session is already complete".to_string(),
            }),
        }
    }

    /// The summary of a completed session.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoSubjectsGraded`] when the session is not
    /// complete or finished without grading anything.
    pub fn summary(&self) -> Result<&Summary, EngineError> {
        match &self.state {
            State::Complete(Some(summary)) => Ok(summary),
            _ => Err(EngineError::NoSubjectsGraded),
        }
    }

    fn is_direct(&self, rule: &SubjectRule) -> bool {
        self.catalog.is_special(&rule.name) || rule.formula == FormulaKind::Direct
    }

    fn choose_track(&mut self, input: &str) -> Result<Step, EngineError> {
        match Track::parse(input) {
            Some(track) if self.catalog.track(track).is_some() => {
                self.state = State::ChoosingYear { track };
                Ok(Step::Continue)
            }
            _ => Ok(Step::Invalid {
                reason: format!("unknown track '{}'", input.trim()),
            }),
        }
    }

    fn choose_year(&mut self, track: Track, input: &str) -> Result<Step, EngineError> {
        let number: u8 = match input.trim().parse() {
            Ok(n) if (1..=5).contains(&n) => n,
            _ => {
                return Ok(Step::Invalid {
                    reason: format!("'{}' is not a year between 1 and 5", input.trim()),
                })
            }
        };

        if self.catalog.has_variants(track, number) {
            self.state = State::ChoosingVariant { track, number };
            Ok(Step::Continue)
        } else {
            self.start_grading(track, Year::new(number))
        }
    }

    fn choose_variant(&mut self, track: Track, number: u8, input: &str) -> Result<Step, EngineError> {
        match Variant::parse(input) {
            Some(variant) => self.start_grading(track, Year::with_variant(number, variant)),
            None => Ok(Step::Invalid {
                reason: format!("'{}' is not one of +4 or +5", input.trim()),
            }),
        }
    }

    fn start_grading(&mut self, track: Track, year: Year) -> Result<Step, EngineError> {
        let subjects = self.catalog.subjects(track, &year)?;
        if subjects.is_empty() {
            self.state = State::Complete(None);
            return Ok(Step::Continue);
        }

        crate::info!(
            "Grading session started for {}",
            year.label(track)
        );
        self.state = State::Grading(Grading {
            track,
            year,
            subjects,
            accumulator: Accumulator::new(self.catalog.group(track, &year)),
            subject_index: 0,
            component_index: 0,
            record: SubjectGrade::new(),
            results: Vec::with_capacity(subjects.len()),
        });
        Ok(Step::Continue)
    }

    fn grade(&mut self, input: &str) -> Result<Step, EngineError> {
        let value = match parse_grade(input) {
            Ok(value) => value,
            // Recoverable: keep the same prompt.
            Err(err) if err.is_recoverable() => {
                return Ok(Step::Invalid {
                    reason: err.to_string(),
                })
            }
            Err(err) => return Err(err),
        };

        let State::Grading(grading) = &mut self.state else {
            unreachable!("grade() is only called in the grading state");
        };

        let rule = &grading.subjects[grading.subject_index];
        let direct = self.catalog.is_special(&rule.name) || rule.formula == FormulaKind::Direct;
        if direct {
            grading.record.direct = Some(value);
        } else {
            grading.record.set(rule.components[grading.component_index], value);
            grading.component_index += 1;
            if grading.component_index < rule.components.len() {
                return Ok(Step::Continue);
            }
        }

        self.finish_subject()
    }

    fn finish_subject(&mut self) -> Result<Step, EngineError> {
        let State::Grading(grading) = &mut self.state else {
            unreachable!("finish_subject() is only called in the grading state");
        };

        let rule = &grading.subjects[grading.subject_index];
        let average = compute_subject_average(
            self.catalog,
            grading.track,
            &grading.year,
            &rule.name,
            &grading.record,
        )?;
        let grouped = grading
            .accumulator
            .record(&rule.name, rule.coefficient, average);
        grading.results.push(SubjectResult {
            name: rule.name.clone(),
            average,
            coefficient: rule.coefficient,
            grouped,
        });
        crate::debug!("'{}' averaged {average:.2}", rule.name);

        let step = Step::SubjectDone {
            subject: rule.name.clone(),
            average,
        };

        grading.subject_index += 1;
        grading.component_index = 0;
        grading.record = SubjectGrade::new();

        if grading.subject_index == grading.subjects.len() {
            let (overall, verdict) = grading.accumulator.finalize()?;
            let summary = Summary {
                track: grading.track,
                year: grading.year,
                overall,
                verdict,
                subjects: std::mem::take(&mut grading.results),
            };
            crate::info!(
                "Session complete: {} overall {overall:.2} ({verdict})",
                summary.year.label(summary.track)
            );
            self.state = State::Complete(Some(summary));
        }

        Ok(step)
    }
}
