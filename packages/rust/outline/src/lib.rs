//! Course outline reader.
//!
//! Parses a tabular course outline (CSV with a header row) into an ordered
//! sequence of validated [`OutlineRow`]s. Column names are normalized
//! through an explicit alias table so historical header spellings keep
//! working, and unknown columns are passed through per row unmodified.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use courseforge_shared::{CourseForgeError, OutlineRow, Result};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Canonical name of the rationale column.
pub const RATIONALE_COLUMN: &str = "What is the rationale for this step";

const MODULE_COLUMN: &str = "Module";
const LESSON_COLUMN: &str = "Lesson";
const STEP_NUMBER_COLUMN: &str = "Step number";
const STEP_TITLE_COLUMN: &str = "Step title";
const TEMPLATE_TYPE_COLUMN: &str = "Template Type";
const CONTENT_OUTLINE_COLUMN: &str = "Content Outline";

/// Historical header spellings collapsed to one canonical column name.
///
/// Consulted once per header cell at normalization time; add new aliases
/// here rather than scattering string comparisons.
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("What is the rationale for this step?", RATIONALE_COLUMN),
];

/// Columns that must be present (after alias resolution) for an outline
/// to be considered well-formed.
const REQUIRED_COLUMNS: &[&str] = &[
    MODULE_COLUMN,
    LESSON_COLUMN,
    STEP_NUMBER_COLUMN,
    STEP_TITLE_COLUMN,
    TEMPLATE_TYPE_COLUMN,
    RATIONALE_COLUMN,
    CONTENT_OUTLINE_COLUMN,
];

/// Resolve a header cell to its canonical column name.
fn canonical_column(name: &str) -> &str {
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| canonical)
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Read a course outline CSV and return its rows in source order.
///
/// Fails with [`CourseForgeError::NotFound`] if the path does not exist,
/// and with [`CourseForgeError::Format`] if the file has no data rows or
/// is missing required columns (the message names them).
pub fn read_outline(path: impl AsRef<Path>) -> Result<Vec<OutlineRow>> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading course outline");

    if !path.exists() {
        return Err(CourseForgeError::not_found(path));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            CourseForgeError::format_error(format!("failed to open outline {}: {e}", path.display()))
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| {
            CourseForgeError::format_error(format!("failed to read outline header: {e}"))
        })?
        .iter()
        .map(|h| canonical_column(h).to_string())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(CourseForgeError::format_error(format!(
            "outline missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            CourseForgeError::format_error(format!("invalid outline row {}: {e}", index + 1))
        })?;
        rows.push(row_from_record(&headers, &record));
    }

    if rows.is_empty() {
        return Err(CourseForgeError::format_error(format!(
            "outline has no data rows: {}",
            path.display()
        )));
    }

    info!(rows = rows.len(), "outline read successfully");
    Ok(rows)
}

/// Build one [`OutlineRow`] from a record, splitting known columns from
/// pass-through extras.
fn row_from_record(headers: &[String], record: &csv::StringRecord) -> OutlineRow {
    let mut row = OutlineRow {
        module: String::new(),
        lesson: String::new(),
        step_number: String::new(),
        step_title: String::new(),
        template_type: String::new(),
        rationale: String::new(),
        content_outline: String::new(),
        extra: BTreeMap::new(),
    };

    for (header, value) in headers.iter().zip(record.iter()) {
        match header.as_str() {
            MODULE_COLUMN => row.module = value.to_string(),
            LESSON_COLUMN => row.lesson = value.to_string(),
            STEP_NUMBER_COLUMN => row.step_number = value.to_string(),
            STEP_TITLE_COLUMN => row.step_title = value.to_string(),
            TEMPLATE_TYPE_COLUMN => row.template_type = value.to_string(),
            RATIONALE_COLUMN => row.rationale = value.to_string(),
            CONTENT_OUTLINE_COLUMN => row.content_outline = value.to_string(),
            other => {
                row.extra.insert(other.to_string(), value.to_string());
            }
        }
    }

    debug!(
        module = %row.module,
        lesson = %row.lesson,
        step = %row.step_number,
        "parsed outline row"
    );
    row
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HEADER: &str = "Module,Lesson,Step number,Step title,Template Type,\
What is the rationale for this step,Content Outline";

    const HEADER_LEGACY: &str = "Module,Lesson,Step number,Step title,Template Type,\
What is the rationale for this step?,Content Outline";

    fn write_temp_csv(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cf-outline-test-{}.csv",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn fixture_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    #[test]
    fn read_returns_rows_in_source_order() {
        let path = write_temp_csv(&format!(
            "{HEADER}\nM1,L1,1,Intro,Article,Why,Points\nM1,L1,2,Basics,Video,,\nM2,L1,1,Advanced,Quiz,,\n"
        ));
        let rows = read_outline(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].step_title, "Intro");
        assert_eq!(rows[1].step_title, "Basics");
        assert_eq!(rows[2].module, "M2");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rationale_alias_resolves_to_canonical_key() {
        let path = write_temp_csv(&format!(
            "{HEADER_LEGACY}\nM1,L1,1,Intro,Article,Because reasons,Outline here\n"
        ));
        let rows = read_outline(&path).unwrap();
        assert_eq!(rows[0].rationale, "Because reasons");
        // The legacy spelling must not leak into the extras
        assert!(rows[0].extra.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_outline("/nonexistent/outline.csv").unwrap_err();
        assert!(matches!(err, CourseForgeError::NotFound { .. }));
    }

    #[test]
    fn header_only_outline_is_format_error() {
        let path = write_temp_csv(&format!("{HEADER}\n"));
        let err = read_outline(&path).unwrap_err();
        assert!(matches!(err, CourseForgeError::Format { .. }));
        assert!(err.to_string().contains("no data rows"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_columns_named_in_error() {
        let path = write_temp_csv(
            "Module,Step title,Template Type\nM1,Intro,Article\n",
        );
        let err = read_outline(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Lesson"));
        assert!(msg.contains("Step number"));
        assert!(msg.contains(RATIONALE_COLUMN));
        assert!(msg.contains("Content Outline"));
        assert!(!msg.contains("Step title,"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn extra_columns_pass_through() {
        let path = write_temp_csv(&format!(
            "{HEADER},Estimated Duration\nM1,L1,1,Intro,Article,,,10 min\n"
        ));
        let rows = read_outline(&path).unwrap();
        assert_eq!(rows[0].extra["Estimated Duration"], "10 min");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn quoted_fields_with_commas() {
        let path = write_temp_csv(&format!(
            "{HEADER}\nM1,L1,1,\"Intro, part one\",Article,\"First, because\",\"a, b, c\"\n"
        ));
        let rows = read_outline(&path).unwrap();
        assert_eq!(rows[0].step_title, "Intro, part one");
        assert_eq!(rows[0].content_outline, "a, b, c");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn valid_fixture_parses() {
        let rows = read_outline(fixture_path("outline/valid_outline.csv")).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].module, "M1");
        assert_eq!(rows[0].step_title, "Intro: Basics");
        assert_eq!(rows[0].template_type, "video");
        assert_eq!(rows[3].template_type, "quiz");
    }

    #[test]
    fn legacy_fixture_parses_with_canonical_rationale() {
        let rows = read_outline(fixture_path("outline/legacy_rationale.csv")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rationale, "Orientation before detail");
        assert!(rows[0].extra.is_empty());
    }
}
