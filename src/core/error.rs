//! Error types for the rule engine
//!
//! Two families: recoverable input errors (`InvalidGradeValue`, which the
//! session answers with a re-prompt) and fatal errors that abort the
//! session and surface to the caller. Errors are never swallowed and
//! replaced with a zero average.

use crate::core::models::{Track, Year, YearStatus};
use thiserror::Error;

/// All failures the classification model, averaging engine and session
/// layer can produce.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Classification lookup miss; fatal, aborts the session.
    #[error("unknown subject '{subject}' for {track} year {year}")]
    UnknownSubject {
        /// Track queried
        track: Track,
        /// Year queried
        year: Year,
        /// Subject name as given (exact-string key)
        subject: String,
    },

    /// Grade component arity outside what a formula accepts; fatal and
    /// indicates a rule-table bug, logged for table maintainers.
    #[error("invalid component combination for '{subject}': {detail}")]
    InvalidComponentCombination {
        /// Subject whose components were inconsistent
        subject: String,
        /// What was wrong (missing component, bad arity)
        detail: String,
    },

    /// Non-numeric or out-of-range grade input; recoverable, the session
    /// re-prompts for the same component.
    #[error("invalid grade '{input}': enter a number between 0 and 20")]
    InvalidGradeValue {
        /// The rejected raw input
        input: String,
    },

    /// `finalize` was reached with a zero coefficient sum.
    #[error("no subjects graded")]
    NoSubjectsGraded,

    /// The selected year has no usable subject table. The message is
    /// distinct for not-yet-available and permanently-unsupported years.
    #[error("{track} year {year} is {}", .status.user_message())]
    UnsupportedYear {
        /// Track selected
        track: Track,
        /// Year selected
        year: Year,
        /// Why the year is unusable
        status: YearStatus,
    },

    /// The rule-table file could not be parsed.
    #[error("failed to parse rule tables: {0}")]
    TableParse(#[from] toml::de::Error),

    /// The rule-table file could not be read.
    #[error("failed to read rule tables: {0}")]
    TableRead(#[from] std::io::Error),

    /// The rule-table contents violate a structural invariant.
    #[error("invalid rule table: {0}")]
    TableInvalid(String),
}

impl EngineError {
    /// Whether the session may continue after this error by re-prompting.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidGradeValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_year_messages_are_distinct() {
        let pending = EngineError::UnsupportedYear {
            track: Track::Math,
            year: Year::new(5),
            status: YearStatus::NotYetAvailable,
        };
        let refused = EngineError::UnsupportedYear {
            track: Track::Musique,
            year: Year::new(1),
            status: YearStatus::PermanentlyUnsupported,
        };

        assert_ne!(pending.to_string(), refused.to_string());
        assert!(pending.to_string().contains("not available yet"));
        assert!(refused.to_string().contains("not supported"));
    }

    #[test]
    fn only_grade_input_errors_are_recoverable() {
        let bad_grade = EngineError::InvalidGradeValue {
            input: "21".to_string(),
        };
        assert!(bad_grade.is_recoverable());
        assert!(!EngineError::NoSubjectsGraded.is_recoverable());
    }
}
