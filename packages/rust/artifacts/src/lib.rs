//! Artifact persistence for generated course content.
//!
//! Writes generated text as frontmatter-tagged markdown files, creates
//! per-run output directories, and persists run bookkeeping (summary JSON
//! and workflow log). Primary artifact writes fail loudly with context;
//! bookkeeping writes are best-effort and only log their failures. The
//! split is visible in the signatures (`Result` vs `Option`).

mod bookkeeping;

pub use bookkeeping::{save_generation_summary, save_workflow_log};

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use courseforge_shared::{ArtifactMeta, CourseForgeError, Result};

/// Frontmatter `target_learner` values longer than this many characters are
/// replaced by a short placeholder to keep the header compact.
const TARGET_LEARNER_MAX_LEN: usize = 500;

const TARGET_LEARNER_PLACEHOLDER: &str = "See separate learner profile document";

/// Timestamp format used in artifact frontmatter.
const GENERATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp suffix format for run output directories.
const RUN_DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// Markdown artifacts
// ---------------------------------------------------------------------------

/// Save generated content as a metadata-tagged markdown file.
///
/// The file starts with a fixed 7-field frontmatter block, followed by an
/// `# {step_title}` heading, followed by the content verbatim. Parent
/// directories are created as needed. Fails with
/// [`CourseForgeError::EmptyContent`] on blank content without touching
/// the filesystem.
pub fn save_markdown(content: &str, meta: &ArtifactMeta, output_path: &Path) -> Result<PathBuf> {
    info!(path = %output_path.display(), "saving content as markdown");

    if content.trim().is_empty() {
        return Err(CourseForgeError::EmptyContent);
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CourseForgeError::io(parent, e))?;
    }

    let generation_date = Local::now().format(GENERATION_DATE_FORMAT).to_string();
    let formatted = format_with_metadata(content, meta, &generation_date);

    std::fs::write(output_path, formatted)
        .map_err(|e| CourseForgeError::io(output_path, e))?;

    debug!(path = %output_path.display(), bytes = content.len(), "artifact written");
    Ok(output_path.to_path_buf())
}

/// Assemble frontmatter + title heading + content into one document.
fn format_with_metadata(content: &str, meta: &ArtifactMeta, generation_date: &str) -> String {
    let step_title = meta.step_title.trim();

    let target_learner = if meta.target_learner.chars().count() > TARGET_LEARNER_MAX_LEN {
        TARGET_LEARNER_PLACEHOLDER
    } else {
        meta.target_learner.as_str()
    };

    format!(
        "---\n\
         module: \"{module}\"\n\
         lesson: \"{lesson}\"\n\
         step_number: \"{step_number}\"\n\
         step_title: \"{step_title}\"\n\
         template_type: \"{template_type}\"\n\
         target_learner: \"{target_learner}\"\n\
         generation_date: \"{generation_date}\"\n\
         ---\n\n\
         # {step_title}\n\n\
         {content}",
        module = meta.module,
        lesson = meta.lesson,
        step_number = meta.step_number,
        template_type = meta.template_type,
    )
}

// ---------------------------------------------------------------------------
// Run directories
// ---------------------------------------------------------------------------

/// Create a fresh output directory for a course run.
///
/// The directory name is the sanitized course name plus a `YYYYMMDD_HHMMSS`
/// timestamp. Timestamp resolution is whole seconds, so two runs started
/// within the same second for the same course share a directory.
pub fn create_output_directory(base_dir: &Path, course_name: &str) -> Result<PathBuf> {
    info!(course = %course_name, "creating output directory");

    let sanitized = sanitize_component(course_name);
    let timestamp = Local::now().format(RUN_DIR_TIMESTAMP_FORMAT).to_string();
    let dir_path = base_dir.join(format!("{sanitized}_{timestamp}"));

    std::fs::create_dir_all(&dir_path).map_err(|e| CourseForgeError::io(&dir_path, e))?;

    info!(path = %dir_path.display(), "output directory created");
    Ok(dir_path)
}

/// Sanitize a name for use as a file or directory component.
///
/// Keeps alphanumerics, spaces, hyphens, and underscores; every other
/// character becomes an underscore.
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
