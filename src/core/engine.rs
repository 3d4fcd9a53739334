//! Averaging engine
//!
//! Pure grade arithmetic: per-subject averages dispatched on the
//! subject's formula tag, a weighted accumulator with group folding, and
//! the final pass/fail verdict. All rounding happens in exactly one
//! place, on the overall average, by ceiling to two decimals.

use crate::core::catalog::{Catalog, Classification, GroupRule};
use crate::core::error::EngineError;
use crate::core::models::{Component, FormulaKind, SubjectGrade, Track, Year, GRADE_MAX, GRADE_MIN};
use std::collections::BTreeMap;
use std::fmt;

/// Overall average at or above which the year is passed.
pub const PASS_THRESHOLD: f64 = 10.0;

/// Final outcome of a graded year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Overall average at or above the pass threshold
    Pass,
    /// Overall average below the pass threshold
    Fail,
}

impl Verdict {
    /// Verdict for a rounded overall average.
    #[must_use]
    pub fn from_average(overall: f64) -> Self {
        if overall >= PASS_THRESHOLD {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    /// Short display form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "passed",
            Self::Fail => "failed",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round a value UP to two decimal places. A student sitting exactly on
/// a truncation boundary must never be failed by rounding.
#[must_use]
pub fn ceil2(value: f64) -> f64 {
    (value * 100.0).ceil() / 100.0
}

/// Compute one subject's average from its grade record.
///
/// The formula is chosen by the subject's table entry, never by probing
/// which grades happen to be present.
///
/// # Errors
///
/// Returns [`EngineError::InvalidComponentCombination`] when a required
/// component is missing from the record, [`EngineError::InvalidGradeValue`]
/// when a stored value is outside `[0, 20]`, and the usual lookup errors
/// when the (track, year, subject) triple is unknown.
pub fn compute_subject_average(
    catalog: &Catalog,
    track: Track,
    year: &Year,
    name: &str,
    grades: &SubjectGrade,
) -> Result<f64, EngineError> {
    let rule = catalog.subject(track, year, name)?;

    match catalog.classify(track, year, name)? {
        Classification::DirectAverage => {
            let value = grades
                .direct
                .ok_or_else(|| EngineError::InvalidComponentCombination {
                    subject: name.to_string(),
                    detail: "missing direct average".to_string(),
                })?;
            check_range(value)?;
            Ok(value)
        }
        Classification::Components { components, .. } => {
            let values = collect(name, components, grades)?;
            let alt = catalog
                .year(track, year)
                .is_some_and(|y| y.alt_weighting);
            apply_formula(name, rule.formula, components, &values, alt)
        }
    }
}

/// Pull the required component values out of the record, in order.
fn collect(
    name: &str,
    components: &[Component],
    grades: &SubjectGrade,
) -> Result<Vec<f64>, EngineError> {
    let mut values = Vec::with_capacity(components.len());
    for &component in components {
        let value =
            grades
                .get(component)
                .ok_or_else(|| EngineError::InvalidComponentCombination {
                    subject: name.to_string(),
                    detail: format!("missing {component} grade"),
                })?;
        check_range(value)?;
        values.push(value);
    }
    Ok(values)
}

fn check_range(value: f64) -> Result<(), EngineError> {
    if value.is_finite() && (GRADE_MIN..=GRADE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidGradeValue {
            input: value.to_string(),
        })
    }
}

/// Dispatch on the formula tag. `values` is parallel to `components`,
/// which `collect` has already verified.
fn apply_formula(
    name: &str,
    formula: FormulaKind,
    components: &[Component],
    values: &[f64],
    alt_weighting: bool,
) -> Result<f64, EngineError> {
    let get = |component: Component| -> f64 {
        components
            .iter()
            .position(|&c| c == component)
            .map_or(0.0, |i| values[i])
    };

    let average = match formula {
        FormulaKind::Generic => return generic_average(name, values, alt_weighting),
        // Direct never reaches formula dispatch.
        FormulaKind::Direct => {
            return Err(EngineError::InvalidComponentCombination {
                subject: name.to_string(),
                detail: "direct-average subject routed through components".to_string(),
            })
        }
        FormulaKind::ExamDoubledTutorial => {
            (2.0 * get(Component::Exam1) + get(Component::Tutorial)) / 3.0
        }
        FormulaKind::TutorialAndExams => {
            (get(Component::Tutorial) + get(Component::Exam1) + get(Component::Exam2)) / 3.0
        }
        FormulaKind::ExamsAndPractical => {
            (get(Component::Exam1) + get(Component::Exam2) + get(Component::Practical)) / 3.0
        }
        FormulaKind::SeventyThirty => {
            0.7 * get(Component::Exam1) + 0.3 * get(Component::Practical)
        }
        FormulaKind::EvenPracticalTutorial => {
            (get(Component::Exam1)
                + get(Component::Exam2)
                + 0.5 * get(Component::Practical)
                + 0.5 * get(Component::Tutorial))
                / 3.0
        }
        FormulaKind::SkewedPracticalTutorial => {
            (get(Component::Exam1)
                + get(Component::Exam2)
                + 0.75 * get(Component::Practical)
                + 0.25 * get(Component::Tutorial))
                / 3.0
        }
    };
    Ok(average)
}

/// The arity-based default rule. One value passes through, two or three
/// take their mean, four blend the practical and tutorial into a single
/// third term, with the weighting chosen by the year table.
fn generic_average(name: &str, values: &[f64], alt_weighting: bool) -> Result<f64, EngineError> {
    match values {
        [single] => Ok(*single),
        [a, b] => Ok((a + b) / 2.0),
        [a, b, c] => Ok((a + b + c) / 3.0),
        [exam1, exam2, practical, tutorial] => {
            let third = if alt_weighting {
                0.5 * practical + 0.5 * tutorial
            } else {
                (2.0 * practical + tutorial) / 3.0
            };
            Ok((exam1 + exam2 + third) / 3.0)
        }
        other => Err(EngineError::InvalidComponentCombination {
            subject: name.to_string(),
            detail: format!("{} component grades, expected 1-4", other.len()),
        }),
    }
}

/// Running weighted total for one graded year. Group members are parked
/// until the group is complete, then folded once as their mean under the
/// group coefficient.
#[derive(Debug, Clone)]
pub struct Accumulator<'a> {
    group: Option<&'a GroupRule>,
    weighted_sum: f64,
    coefficient_sum: f64,
    pending_group: BTreeMap<String, f64>,
    group_folded: bool,
}

impl<'a> Accumulator<'a> {
    /// A fresh accumulator; `group` is the year's group rule, if any.
    #[must_use]
    pub fn new(group: Option<&'a GroupRule>) -> Self {
        Self {
            group,
            weighted_sum: 0.0,
            coefficient_sum: 0.0,
            pending_group: BTreeMap::new(),
            group_folded: false,
        }
    }

    /// Fold one subject's average into the running total. Returns `true`
    /// when the subject was routed through the group rule instead of
    /// being weighted individually.
    pub fn record(&mut self, name: &str, coefficient: f64, average: f64) -> bool {
        if let Some(group) = self.group {
            if group.contains(name) {
                self.pending_group.insert(name.to_string(), average);
                if !self.group_folded && self.pending_group.len() == group.members.len() {
                    let mean = self.pending_group.values().sum::<f64>()
                        / self.pending_group.len() as f64;
                    self.weighted_sum += mean * group.coefficient;
                    self.coefficient_sum += group.coefficient;
                    self.group_folded = true;
                }
                return true;
            }
        }
        self.weighted_sum += average * coefficient;
        self.coefficient_sum += coefficient;
        false
    }

    /// Sum of the coefficients folded in so far.
    #[must_use]
    pub const fn coefficient_sum(&self) -> f64 {
        self.coefficient_sum
    }

    /// Close the accumulator: the ceiled overall average and verdict.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoSubjectsGraded`] when nothing has been
    /// folded in, rather than producing a zero average.
    pub fn finalize(&self) -> Result<(f64, Verdict), EngineError> {
        if self.coefficient_sum <= 0.0 {
            return Err(EngineError::NoSubjectsGraded);
        }
        let overall = ceil2(self.weighted_sum / self.coefficient_sum);
        Ok((overall, Verdict::from_average(overall)))
    }
}
