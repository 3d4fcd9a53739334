//! Grade input records and validation

use crate::core::error::EngineError;
use crate::core::models::subject::Component;

/// Lowest accepted grade value.
pub const GRADE_MIN: f64 = 0.0;
/// Highest accepted grade value.
pub const GRADE_MAX: f64 = 20.0;

/// Transient per-subject grade record: up to four optional components
/// plus the direct-average slot. Created for one grade-entry pass and
/// discarded once the subject average is folded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubjectGrade {
    /// First exam grade
    pub exam1: Option<f64>,
    /// Second exam grade
    pub exam2: Option<f64>,
    /// Practical (TP) grade
    pub practical: Option<f64>,
    /// Tutorial (TD) or continuous-control (CC) grade
    pub tutorial: Option<f64>,
    /// Directly-entered subject average
    pub direct: Option<f64>,
}

impl SubjectGrade {
    /// An empty record with every component absent.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            exam1: None,
            exam2: None,
            practical: None,
            tutorial: None,
            direct: None,
        }
    }

    /// Read one component slot.
    #[must_use]
    pub const fn get(&self, component: Component) -> Option<f64> {
        match component {
            Component::Exam1 => self.exam1,
            Component::Exam2 => self.exam2,
            Component::Practical => self.practical,
            Component::Tutorial => self.tutorial,
        }
    }

    /// Write one component slot.
    pub fn set(&mut self, component: Component, value: f64) {
        match component {
            Component::Exam1 => self.exam1 = Some(value),
            Component::Exam2 => self.exam2 = Some(value),
            Component::Practical => self.practical = Some(value),
            Component::Tutorial => self.tutorial = Some(value),
        }
    }
}

/// Parse and range-check a raw grade string.
///
/// # Errors
///
/// Returns [`EngineError::InvalidGradeValue`] when the input is not a
/// finite number in `[0, 20]`. This error is recoverable: the caller
/// re-prompts for the same component.
pub fn parse_grade(input: &str) -> Result<f64, EngineError> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| EngineError::InvalidGradeValue {
        input: trimmed.to_string(),
    })?;

    if value.is_finite() && (GRADE_MIN..=GRADE_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(EngineError::InvalidGradeValue {
            input: trimmed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_grades_in_range() {
        assert_eq!(parse_grade("12.5").expect("valid grade"), 12.5);
        assert_eq!(parse_grade(" 0 ").expect("valid grade"), 0.0);
        assert_eq!(parse_grade("20").expect("valid grade"), 20.0);
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!(parse_grade("20.01").is_err());
        assert!(parse_grade("-1").is_err());
        assert!(parse_grade("twelve").is_err());
        assert!(parse_grade("").is_err());
        assert!(parse_grade("NaN").is_err());
        assert!(parse_grade("inf").is_err());
    }

    #[test]
    fn component_slots_round_trip() {
        let mut grades = SubjectGrade::new();
        grades.set(Component::Exam1, 14.0);
        grades.set(Component::Tutorial, 9.5);

        assert_eq!(grades.get(Component::Exam1), Some(14.0));
        assert_eq!(grades.get(Component::Tutorial), Some(9.5));
        assert_eq!(grades.get(Component::Practical), None);
    }
}
