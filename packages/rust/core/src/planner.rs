//! Output path planning for generated artifacts.

use std::path::{Path, PathBuf};

use tracing::info;

use courseforge_shared::{CourseForgeError, OutlineRow, Result};

/// Derive the destination path for a row's artifact and create its
/// directory.
///
/// The destination is `{base}/{module}/{step_number}_{sanitized title}.md`.
/// Intermediate directories are created if absent; calling twice for the
/// same row yields the same path and does not error. There is no collision
/// detection: two rows that sanitize to the same filename overwrite each
/// other.
pub fn plan(row: &OutlineRow, base_output_dir: &Path) -> Result<PathBuf> {
    let sanitized = courseforge_artifacts::sanitize_component(&row.step_title);
    let filename = format!("{}_{}.md", row.step_number, sanitized.trim());

    let dir_path = base_output_dir.join(&row.module);
    std::fs::create_dir_all(&dir_path).map_err(|e| CourseForgeError::io(&dir_path, e))?;

    let file_path = dir_path.join(filename);
    info!(path = %file_path.display(), "planned output path");
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cf-planner-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_row(title: &str) -> OutlineRow {
        OutlineRow {
            module: "M1".into(),
            lesson: "L1".into(),
            step_number: "1".into(),
            step_title: title.into(),
            template_type: "video".into(),
            rationale: String::new(),
            content_outline: String::new(),
            extra: Default::default(),
        }
    }

    #[test]
    fn path_follows_module_and_step_layout() {
        let tmp = temp_dir();
        let path = plan(&make_row("Intro: Basics"), &tmp).unwrap();
        assert!(path.ends_with("M1/1_Intro_ Basics.md"));
        assert!(path.parent().unwrap().exists());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn plan_is_idempotent() {
        let tmp = temp_dir();
        let row = make_row("Basics");
        let first = plan(&row, &tmp).unwrap();
        let second = plan(&row, &tmp).unwrap();
        assert_eq!(first, second);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn special_characters_replaced_with_underscores() {
        let tmp = temp_dir();
        let path = plan(&make_row("a/b:c*d"), &tmp).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, "1_a_b_c_d.md");
        // Still inside base/{module}/
        assert!(path.starts_with(tmp.join("M1")));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn surrounding_whitespace_trimmed_before_extension() {
        let tmp = temp_dir();
        let path = plan(&make_row("  Padded title  "), &tmp).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, "1_Padded title.md");
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn identical_titles_collide_silently() {
        let tmp = temp_dir();
        let a = plan(&make_row("Same?"), &tmp).unwrap();
        let b = plan(&make_row("Same!"), &tmp).unwrap();
        assert_eq!(a, b);
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
