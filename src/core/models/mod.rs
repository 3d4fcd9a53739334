//! Domain models: tracks, years, subjects and grade inputs

pub mod grade;
pub mod subject;
pub mod track;

pub use grade::{parse_grade, SubjectGrade, GRADE_MAX, GRADE_MIN};
pub use subject::{Component, FormulaKind, SubjectRule};
pub use track::{Track, Variant, Year, YearStatus};
