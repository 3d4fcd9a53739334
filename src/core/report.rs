//! Result-sheet generator
//!
//! Renders a completed session summary as Markdown through template
//! substitution. The sheet renders well in GitHub, GitLab, and VS Code.

use crate::core::catalog::Catalog;
use crate::core::session::Summary;
use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Embedded Markdown result-sheet template
const RESULT_TEMPLATE: &str = include_str!("templates/result.md");

/// Markdown result-sheet generator
pub struct ResultSheet;

impl ResultSheet {
    /// Create a new result-sheet generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the sheet using template substitution
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn render(&self, catalog: &Catalog, summary: &Summary) -> String {
        let mut output = RESULT_TEMPLATE.to_string();

        let track_label = catalog
            .track(summary.track)
            .map_or_else(|| summary.track.to_string(), |t| t.label.clone());

        output = output.replace("{{year_label}}", &summary.year.label(summary.track));
        output = output.replace("{{track_label}}", &track_label);
        output = output.replace("{{year}}", &summary.year.to_string());
        output = output.replace("{{tables_version}}", &catalog.version().to_string());
        output = output.replace("{{subject_table}}", &Self::subject_table(summary));
        output = output.replace("{{overall}}", &format!("{:.2}", summary.overall));
        output = output.replace("{{verdict}}", summary.verdict.as_str());

        output
    }

    /// Generate the per-subject results table
    fn subject_table(summary: &Summary) -> String {
        let mut table = String::new();

        let _ = writeln!(table, "| Subject | Average | Coefficient | Weighting |");
        table.push_str("|---|---|---|---|\n");

        for subject in &summary.subjects {
            let weighting = if subject.grouped {
                "group"
            } else {
                "individual"
            };
            let _ = writeln!(
                table,
                "| {} | {:.2} | {} | {} |",
                subject.name.trim_end(),
                subject.average,
                subject.coefficient,
                weighting
            );
        }

        table
    }

    /// Render and write the sheet to a file, creating parent directories
    /// as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the file or its directory cannot be written.
    pub fn write_to_file(
        &self,
        catalog: &Catalog,
        summary: &Summary,
        path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render(catalog, summary))?;
        Ok(())
    }
}

impl Default for ResultSheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::Verdict;
    use crate::core::models::{Track, Year};
    use crate::core::session::SubjectResult;

    fn sample_summary() -> Summary {
        Summary {
            track: Track::Math,
            year: Year::new(1),
            overall: 11.73,
            verdict: Verdict::Pass,
            subjects: vec![
                SubjectResult {
                    name: "analyse".to_string(),
                    average: 12.5,
                    coefficient: 4.0,
                    grouped: false,
                },
                SubjectResult {
                    name: "algebre".to_string(),
                    average: 10.2,
                    coefficient: 2.0,
                    grouped: false,
                },
            ],
        }
    }

    #[test]
    fn rendered_sheet_has_no_unreplaced_placeholders() {
        let catalog = Catalog::embedded();
        let sheet = ResultSheet::new().render(&catalog, &sample_summary());

        assert!(!sheet.contains("{{"));
        assert!(sheet.contains("math1"));
        assert!(sheet.contains("**11.73**"));
        assert!(sheet.contains("| analyse | 12.50 | 4 | individual |"));
    }

    #[test]
    fn sheet_is_written_to_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sheets").join("math1.md");

        let catalog = Catalog::embedded();
        ResultSheet::new()
            .write_to_file(&catalog, &sample_summary(), &path)
            .expect("write sheet");

        let contents = std::fs::read_to_string(path).expect("read back");
        assert!(contents.contains("passed"));
    }
}
