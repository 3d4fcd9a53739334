//! Subject classification model
//!
//! The full rule table (track → year → subject → coefficient, components,
//! formula tag) ships as embedded TOML and is loaded once into an
//! immutable [`Catalog`]. All lookups are exact-string on subject names:
//! accents, case and historic trailing whitespace are significant, since
//! silently merging near-identical names could change coefficients.

use crate::core::error::EngineError;
use crate::core::models::{Component, FormulaKind, SubjectRule, Track, Variant, Year, YearStatus};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Rule tables compiled into the binary.
const EMBEDDED_TABLES: &str = include_str!("../assets/tables.toml");

/// Top-level rule-table document.
#[derive(Debug, Clone, Deserialize)]
pub struct Tables {
    /// Table schema revision
    pub version: u32,
    /// Subjects that always use direct-average input, independent of any
    /// per-track table
    #[serde(default)]
    pub special_subjects: Vec<String>,
    /// Per-track year tables
    #[serde(default)]
    pub tracks: Vec<TrackTable>,
}

/// One track's year tables.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackTable {
    /// Track identifier
    pub id: Track,
    /// Human-readable label shown in menus
    pub label: String,
    /// Year tables, one per (number, variant)
    #[serde(default)]
    pub years: Vec<YearTable>,
}

/// One year's subject table.
#[derive(Debug, Clone, Deserialize)]
pub struct YearTable {
    /// Nominal year number (1-5)
    pub number: u8,
    /// Sub-level qualifier when the year has two curricula
    #[serde(default)]
    pub variant: Option<Variant>,
    /// Availability of this table
    #[serde(default)]
    pub status: YearStatus,
    /// Uses the alternate 4-component weighting
    /// `(exam1 + exam2 + 0.5*tp + 0.5*td) / 3`
    #[serde(default)]
    pub alt_weighting: bool,
    /// Optional group of subjects folded once as their mean
    #[serde(default)]
    pub group: Option<GroupRule>,
    /// Subjects in solicitation order
    #[serde(default)]
    pub subjects: Vec<SubjectRule>,
}

/// A set of subjects whose averages are folded into the overall total
/// exactly once, as their arithmetic mean with a fixed coefficient,
/// instead of individually.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRule {
    /// Member subject names
    pub members: Vec<String>,
    /// Coefficient applied to the group mean
    pub coefficient: f64,
}

impl GroupRule {
    /// Whether a subject belongs to this group.
    #[must_use]
    pub fn contains(&self, subject: &str) -> bool {
        self.members.iter().any(|m| m == subject)
    }
}

/// Result of classifying one subject: either its ordered component
/// requirements or the direct-average sentinel. Never both, and the
/// component list is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// The average is entered directly as a single number.
    DirectAverage,
    /// The ordered components to solicit.
    Components {
        /// Components in fixed solicitation order
        components: &'a [Component],
        /// Tutorial is prompted as continuous control
        cc: bool,
    },
}

/// Immutable, load-once view over the rule tables. Safe for
/// unsynchronized concurrent reads.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Tables,
    special: HashSet<String>,
}

impl Catalog {
    /// Load the compiled-in rule tables.
    ///
    /// # Panics
    ///
    /// Panics if the embedded tables are invalid. This cannot happen in
    /// practice since they are validated by the test suite and compiled
    /// into the binary.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_TABLES).expect("Failed to parse compiled-in rule tables")
    }

    /// Parse and validate rule tables from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed TOML, or
    /// [`EngineError::TableInvalid`] when the contents violate a
    /// structural invariant (bad component arity or order, mismatched
    /// bespoke formula shapes, unknown group members, duplicate entries).
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        let tables: Tables = toml::from_str(toml_str)?;
        validate(&tables)?;
        let special = tables.special_subjects.iter().cloned().collect();
        Ok(Self { tables, special })
    }

    /// Load rule tables from an external file when a path is given,
    /// otherwise fall back to the embedded tables.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or its contents are
    /// invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        match path {
            Some(p) => Self::from_toml(&fs::read_to_string(p)?),
            None => Ok(Self::embedded()),
        }
    }

    /// Table schema revision.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.tables.version
    }

    /// All track tables, in menu order.
    #[must_use]
    pub fn tracks(&self) -> &[TrackTable] {
        &self.tables.tracks
    }

    /// One track's table, if the track appears in the data.
    #[must_use]
    pub fn track(&self, track: Track) -> Option<&TrackTable> {
        self.tables.tracks.iter().find(|t| t.id == track)
    }

    /// One year's table within a track.
    #[must_use]
    pub fn year(&self, track: Track, year: &Year) -> Option<&YearTable> {
        self.track(track)?
            .years
            .iter()
            .find(|y| y.number == year.number && y.variant == year.variant)
    }

    /// Availability of a (track, year). Years absent from the data are
    /// recognized-but-empty, i.e. not yet available.
    #[must_use]
    pub fn year_status(&self, track: Track, year: &Year) -> YearStatus {
        self.year(track, year)
            .map_or(YearStatus::NotYetAvailable, |y| y.status)
    }

    /// Whether a nominal year number splits into "+4"/"+5" curricula for
    /// this track, which means a sub-level must be chosen.
    #[must_use]
    pub fn has_variants(&self, track: Track, number: u8) -> bool {
        self.track(track).is_some_and(|t| {
            t.years
                .iter()
                .any(|y| y.number == number && y.variant.is_some())
        })
    }

    /// Distinct year numbers present in a track's data, ascending.
    #[must_use]
    pub fn year_numbers(&self, track: Track) -> Vec<u8> {
        let mut numbers: Vec<u8> = self
            .track(track)
            .map(|t| t.years.iter().map(|y| y.number).collect())
            .unwrap_or_default();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    /// The ordered subject table for an active (track, year).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedYear`] when the year is pending
    /// or permanently unsupported.
    pub fn subjects(&self, track: Track, year: &Year) -> Result<&[SubjectRule], EngineError> {
        match self.year(track, year) {
            Some(y) if y.status == YearStatus::Active => Ok(&y.subjects),
            other => Err(EngineError::UnsupportedYear {
                track,
                year: *year,
                status: other.map_or(YearStatus::NotYetAvailable, |y| y.status),
            }),
        }
    }

    /// Look up one subject's rule entry by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSubject`] when the (track, year,
    /// subject) triple has no entry, and [`EngineError::UnsupportedYear`]
    /// when the year itself is unusable.
    pub fn subject(
        &self,
        track: Track,
        year: &Year,
        name: &str,
    ) -> Result<&SubjectRule, EngineError> {
        self.subjects(track, year)?
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| EngineError::UnknownSubject {
                track,
                year: *year,
                subject: name.to_string(),
            })
    }

    /// Coefficient applied to a subject's average in the overall total.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Catalog::subject`].
    pub fn coefficient(&self, track: Track, year: &Year, name: &str) -> Result<f64, EngineError> {
        Ok(self.subject(track, year, name)?.coefficient)
    }

    /// The biology-style group rule for a year, if any.
    #[must_use]
    pub fn group(&self, track: Track, year: &Year) -> Option<&GroupRule> {
        self.year(track, year)?.group.as_ref()
    }

    /// Whether a subject is in the global always-direct-average set.
    /// This override takes priority over every per-track table.
    #[must_use]
    pub fn is_special(&self, name: &str) -> bool {
        self.special.contains(name)
    }

    /// Classify a subject: which ordered components to solicit, or the
    /// direct-average sentinel.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Catalog::subject`].
    pub fn classify(
        &self,
        track: Track,
        year: &Year,
        name: &str,
    ) -> Result<Classification<'_>, EngineError> {
        let rule = self.subject(track, year, name)?;
        if self.is_special(name) || rule.formula == FormulaKind::Direct {
            return Ok(Classification::DirectAverage);
        }
        Ok(Classification::Components {
            components: &rule.components,
            cc: rule.cc,
        })
    }
}

/// Structural validation applied at load time. Violations are table
/// bugs, not user errors, and must be fixed by table maintainers.
fn validate(tables: &Tables) -> Result<(), EngineError> {
    let mut seen_tracks = HashSet::new();
    for track in &tables.tracks {
        if !seen_tracks.insert(track.id) {
            return Err(EngineError::TableInvalid(format!(
                "duplicate track table '{}'",
                track.id
            )));
        }

        let mut seen_years = HashSet::new();
        for year in &track.years {
            if !(1..=5).contains(&year.number) {
                return Err(EngineError::TableInvalid(format!(
                    "{}: year number {} out of range",
                    track.id, year.number
                )));
            }
            if !seen_years.insert((year.number, year.variant)) {
                return Err(EngineError::TableInvalid(format!(
                    "{}: duplicate year entry {}",
                    track.id, year.number
                )));
            }

            validate_year(track.id, year)?;
        }
    }
    Ok(())
}

fn validate_year(track: Track, year: &YearTable) -> Result<(), EngineError> {
    let label = Year {
        number: year.number,
        variant: year.variant,
    }
    .label(track);

    let mut seen_names = HashSet::new();
    for subject in &year.subjects {
        if !seen_names.insert(subject.name.as_str()) {
            return Err(EngineError::TableInvalid(format!(
                "{label}: duplicate subject '{}'",
                subject.name
            )));
        }
        if subject.coefficient <= 0.0 {
            return Err(EngineError::TableInvalid(format!(
                "{label}: subject '{}' has non-positive coefficient",
                subject.name
            )));
        }

        validate_subject(&label, subject)?;
    }

    if let Some(group) = &year.group {
        if group.coefficient <= 0.0 {
            return Err(EngineError::TableInvalid(format!(
                "{label}: group coefficient must be positive"
            )));
        }
        for member in &group.members {
            if !year.subjects.iter().any(|s| &s.name == member) {
                return Err(EngineError::TableInvalid(format!(
                    "{label}: group member '{member}' has no subject entry"
                )));
            }
        }
    }

    Ok(())
}

fn validate_subject(label: &str, subject: &SubjectRule) -> Result<(), EngineError> {
    match subject.formula {
        FormulaKind::Direct => {
            if !subject.components.is_empty() {
                return Err(EngineError::TableInvalid(format!(
                    "{label}: direct-average subject '{}' must not list components",
                    subject.name
                )));
            }
        }
        FormulaKind::Generic => {
            if subject.components.is_empty() || subject.components.len() > 4 {
                return Err(EngineError::TableInvalid(format!(
                    "{label}: subject '{}' needs 1-4 components, has {}",
                    subject.name,
                    subject.components.len()
                )));
            }
            if !subject.components.is_sorted() {
                return Err(EngineError::TableInvalid(format!(
                    "{label}: subject '{}' components out of solicitation order",
                    subject.name
                )));
            }
        }
        bespoke => {
            if let Some(required) = bespoke.required_components() {
                if subject.components != required {
                    return Err(EngineError::TableInvalid(format!(
                        "{label}: subject '{}' components do not match its formula",
                        subject.name
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse_and_validate() {
        let catalog = Catalog::embedded();
        assert_eq!(catalog.version(), 1);
        assert!(catalog.track(Track::Math).is_some());
        assert!(catalog.track(Track::Sciences).is_some());
    }

    #[test]
    fn rejects_direct_subject_with_components() {
        let toml_str = r#"
version = 1

[[tracks]]
id = "math"
label = "Math"

[[tracks.years]]
number = 1

[[tracks.years.subjects]]
name = "broken"
coefficient = 2.0
formula = "direct"
components = ["exam1"]
"#;
        let err = Catalog::from_toml(toml_str).expect_err("must reject");
        assert!(matches!(err, EngineError::TableInvalid(_)));
    }

    #[test]
    fn rejects_components_out_of_order() {
        let toml_str = r#"
version = 1

[[tracks]]
id = "math"
label = "Math"

[[tracks.years]]
number = 1

[[tracks.years.subjects]]
name = "broken"
coefficient = 2.0
components = ["tutorial", "exam1"]
"#;
        let err = Catalog::from_toml(toml_str).expect_err("must reject");
        assert!(matches!(err, EngineError::TableInvalid(_)));
    }

    #[test]
    fn rejects_group_member_without_entry() {
        let toml_str = r#"
version = 1

[[tracks]]
id = "sciences"
label = "Sciences"

[[tracks.years]]
number = 1

[tracks.years.group]
members = ["ghost"]
coefficient = 6.0

[[tracks.years.subjects]]
name = "chimie"
coefficient = 3.0
components = ["exam1", "exam2", "tutorial"]
formula = "tutorial-and-exams"
"#;
        let err = Catalog::from_toml(toml_str).expect_err("must reject");
        assert!(matches!(err, EngineError::TableInvalid(_)));
    }

    #[test]
    fn special_subjects_classify_as_direct_everywhere() {
        let catalog = Catalog::embedded();
        let year = Year::new(2);
        let classification = catalog
            .classify(Track::Physics, &year, "Optique")
            .expect("Optique exists in physics year 2");
        assert_eq!(classification, Classification::DirectAverage);
    }

    #[test]
    fn missing_year_is_not_yet_available() {
        let catalog = Catalog::embedded();
        let status = catalog.year_status(Track::Lettres, &Year::new(3));
        assert_eq!(status, YearStatus::NotYetAvailable);
    }

    #[test]
    fn music_years_are_permanently_unsupported() {
        let catalog = Catalog::embedded();
        let status = catalog.year_status(Track::Musique, &Year::new(1));
        assert_eq!(status, YearStatus::PermanentlyUnsupported);
    }

    #[test]
    fn unknown_subject_lookup_fails() {
        let catalog = Catalog::embedded();
        let err = catalog
            .subject(Track::Math, &Year::new(1), "astrologie")
            .expect_err("no such subject");
        assert!(matches!(err, EngineError::UnknownSubject { .. }));
    }

    #[test]
    fn trailing_space_names_are_distinct_subjects() {
        let catalog = Catalog::embedded();
        let year = Year::with_variant(4, Variant::PlusFour);

        // The "+4" computing table historically carries trailing spaces.
        assert!(catalog.subject(Track::Info, &year, "GL ").is_ok());
        assert!(matches!(
            catalog.subject(Track::Info, &year, "GL"),
            Err(EngineError::UnknownSubject { .. })
        ));
    }

    #[test]
    fn classification_is_component_list_or_direct_never_both() {
        let catalog = Catalog::embedded();
        for track in &catalog.tables.tracks {
            for year_table in &track.years {
                let year = Year {
                    number: year_table.number,
                    variant: year_table.variant,
                };
                for subject in &year_table.subjects {
                    match catalog
                        .classify(track.id, &year, &subject.name)
                        .expect("classify listed subject")
                    {
                        Classification::DirectAverage => {}
                        Classification::Components { components, .. } => {
                            assert!(
                                !components.is_empty(),
                                "{}: '{}' classified with empty components",
                                year.label(track.id),
                                subject.name
                            );
                        }
                    }
                }
            }
        }
    }
}
