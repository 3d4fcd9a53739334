//! Subject rules: grade components and formula tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// One gradable input to a subject's average, in the fixed solicitation
/// order: first exam, second exam, practical, tutorial/continuous-control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// First exam
    Exam1,
    /// Second exam
    Exam2,
    /// Practical work (TP)
    Practical,
    /// Tutorial (TD) or continuous control (CC)
    Tutorial,
}

impl Component {
    /// All components in solicitation order.
    pub const ALL: [Self; 4] = [Self::Exam1, Self::Exam2, Self::Practical, Self::Tutorial];

    /// Prompt label. Tutorial renders as "CC" for continuous-control
    /// subjects, "TD" otherwise.
    #[must_use]
    pub const fn label(self, cc: bool) -> &'static str {
        match self {
            Self::Exam1 => "Exam 1",
            Self::Exam2 => "Exam 2",
            Self::Practical => "TP",
            Self::Tutorial => {
                if cc {
                    "CC"
                } else {
                    "TD"
                }
            }
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exam1 => "exam1",
            Self::Exam2 => "exam2",
            Self::Practical => "practical",
            Self::Tutorial => "tutorial",
        };
        write!(f, "{name}")
    }
}

/// Averaging formula attached to a subject at table-build time. Dispatch
/// happens on this tag, never on subject-name membership tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormulaKind {
    /// Arity-based formula over the supplied components.
    #[default]
    Generic,
    /// The average is entered as a single number.
    Direct,
    /// `(2*exam1 + tutorial) / 3`
    ExamDoubledTutorial,
    /// `(tutorial + exam1 + exam2) / 3`
    TutorialAndExams,
    /// `(exam1 + exam2 + practical) / 3`
    ExamsAndPractical,
    /// `0.7*exam1 + 0.3*practical` (biology group members)
    SeventyThirty,
    /// `(exam1 + exam2 + 0.5*practical + 0.5*tutorial) / 3`
    EvenPracticalTutorial,
    /// `(exam1 + exam2 + 0.75*practical + 0.25*tutorial) / 3`
    SkewedPracticalTutorial,
}

impl FormulaKind {
    /// The exact component set a bespoke formula consumes, used to
    /// validate tables at load time. `None` means any 1-4 components
    /// (generic) or none at all (direct).
    #[must_use]
    pub const fn required_components(self) -> Option<&'static [Component]> {
        match self {
            Self::Generic | Self::Direct => None,
            Self::ExamDoubledTutorial => Some(&[Component::Exam1, Component::Tutorial]),
            Self::TutorialAndExams => {
                Some(&[Component::Exam1, Component::Exam2, Component::Tutorial])
            }
            Self::ExamsAndPractical => {
                Some(&[Component::Exam1, Component::Exam2, Component::Practical])
            }
            Self::SeventyThirty => Some(&[Component::Exam1, Component::Practical]),
            Self::EvenPracticalTutorial | Self::SkewedPracticalTutorial => Some(&[
                Component::Exam1,
                Component::Exam2,
                Component::Practical,
                Component::Tutorial,
            ]),
        }
    }
}

/// One subject's rule-table entry: its weight, the ordered component set
/// it solicits and the formula used to average them. Names are opaque
/// exact-string keys; historic trailing whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRule {
    /// Subject name, matched exactly (accents, case, trailing spaces)
    pub name: String,

    /// Weight in the overall average
    pub coefficient: f64,

    /// Ordered subset of the four components; empty for direct-average
    /// subjects
    #[serde(default)]
    pub components: Vec<Component>,

    /// Formula tag; defaults to the generic arity-based rule
    #[serde(default)]
    pub formula: FormulaKind,

    /// Tutorial component is prompted as continuous control (CC)
    #[serde(default)]
    pub cc: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_labels_follow_cc_flag() {
        assert_eq!(Component::Tutorial.label(false), "TD");
        assert_eq!(Component::Tutorial.label(true), "CC");
        assert_eq!(Component::Practical.label(true), "TP");
    }

    #[test]
    fn bespoke_formulas_declare_their_components() {
        assert_eq!(
            FormulaKind::SeventyThirty.required_components(),
            Some(&[Component::Exam1, Component::Practical][..])
        );
        assert!(FormulaKind::Generic.required_components().is_none());
    }

    #[test]
    fn subject_rule_deserializes_with_defaults() {
        let rule: SubjectRule = toml::from_str(
            r#"
name = "analyse"
coefficient = 4.0
components = ["exam1", "exam2", "tutorial"]
"#,
        )
        .expect("parse subject rule");

        assert_eq!(rule.formula, FormulaKind::Generic);
        assert!(!rule.cc);
        assert_eq!(
            rule.components,
            vec![Component::Exam1, Component::Exam2, Component::Tutorial]
        );
    }

    #[test]
    fn trailing_whitespace_in_names_is_preserved() {
        let rule: SubjectRule = toml::from_str(
            r#"
name = "GL "
coefficient = 3.0
components = ["exam1", "exam2"]
"#,
        )
        .expect("parse subject rule");

        assert_eq!(rule.name, "GL ");
        assert_ne!(rule.name, "GL");
    }
}
