//! End-to-end batch pipeline: outline → variables → generation → artifacts.
//!
//! Rows are processed sequentially in source order, one at a time. A
//! failing row is logged into the workflow log and counted; the batch
//! continues with the next row. Only outline reading and run-directory
//! creation abort the run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use tracing::{info, instrument, warn};

use courseforge_artifacts::{
    create_output_directory, save_generation_summary, save_markdown, save_workflow_log,
};
use courseforge_markup::RenderOptions;
use courseforge_outline::read_outline;
use courseforge_shared::{ArtifactMeta, OutlineRow, Result, RunId, RunLogEntry, RunSummary};

use crate::context::build_context_from_adjacent_steps;
use crate::generator::{ContentGenerator, GenerationRequest};
use crate::template::{TemplateLibrary, fill_template};
use crate::{planner, resolver};

/// Configuration for one batch generation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the course outline CSV.
    pub outline_path: PathBuf,
    /// Course name (also the topic variable).
    pub course_name: String,
    /// Description of the target learner.
    pub learner_profile: String,
    /// Root directory under which the run directory is created.
    pub output_root: PathBuf,
    /// Optional JSON template library.
    pub template_library_path: Option<PathBuf>,
    /// Also render each saved artifact to HTML (best-effort).
    pub render_html: bool,
    /// Options for the HTML render pass.
    pub render_options: RenderOptions,
}

/// Result of one batch run.
#[derive(Debug)]
pub struct RunReport {
    /// Identifier of this run.
    pub run_id: RunId,
    /// The run's output directory.
    pub output_dir: PathBuf,
    /// Number of outline rows processed.
    pub rows_processed: usize,
    /// Rows that produced an artifact.
    pub succeeded: usize,
    /// Rows that failed (recorded in the workflow log).
    pub failed: usize,
    /// Path of the summary document, if it could be written.
    pub summary_path: Option<PathBuf>,
    /// Path of the workflow log, if it could be written.
    pub log_path: Option<PathBuf>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a row starts processing.
    fn row_started(&self, step: &str, current: usize, total: usize);
    /// Called when a row finishes (successfully or not).
    fn row_finished(&self, step: &str, current: usize, total: usize, ok: bool);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn row_started(&self, _step: &str, _current: usize, _total: usize) {}
    fn row_finished(&self, _step: &str, _current: usize, _total: usize, _ok: bool) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run the full batch pipeline.
///
/// 1. Read and validate the outline
/// 2. Create the run output directory
/// 3. Per row: resolve variables → fill prompt → build context → generate
///    → plan path → save artifact → optional HTML render
/// 4. Write the workflow log and generation summary (best-effort)
#[instrument(skip_all, fields(outline = %config.outline_path.display(), course = %config.course_name))]
pub fn run_batch(
    config: &RunConfig,
    generator: &dyn ContentGenerator,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();
    let start_time = Local::now();
    let run_id = RunId::new();

    info!(%run_id, "starting generation run");

    progress.phase("Reading outline");
    let rows = read_outline(&config.outline_path)?;

    progress.phase("Creating output directory");
    let output_dir = create_output_directory(&config.output_root, &config.course_name)?;

    let templates = match &config.template_library_path {
        Some(path) => TemplateLibrary::load(path),
        None => TemplateLibrary::empty(),
    };

    let total = rows.len();
    let mut log_entries: Vec<RunLogEntry> = Vec::new();
    let mut processed_rows: Vec<serde_json::Value> = Vec::new();
    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for (index, row) in rows.iter().enumerate() {
        let step = step_label(row);
        progress.row_started(&step, index + 1, total);
        log_entries.push(RunLogEntry::now(step.clone(), "started", "Generating content"));

        match process_row(config, generator, &templates, &rows, index, &output_dir) {
            Ok(artifact_path) => {
                succeeded += 1;
                log_entries.push(RunLogEntry::now(
                    step.clone(),
                    "completed",
                    format!("Saved artifact to {}", artifact_path.display()),
                ));
                processed_rows.push(serde_json::json!({
                    "step": step,
                    "status": "completed",
                    "output_file": artifact_path.display().to_string(),
                }));
                progress.row_finished(&step, index + 1, total, true);
            }
            Err(e) => {
                failed += 1;
                warn!(step = %step, error = %e, "row failed, continuing with next");
                log_entries.push(RunLogEntry::now(step.clone(), "error", e.to_string()));
                processed_rows.push(serde_json::json!({
                    "step": step,
                    "status": "error",
                    "error": e.to_string(),
                }));
                progress.row_finished(&step, index + 1, total, false);
            }
        }
    }

    progress.phase("Writing run bookkeeping");

    let log_path = save_workflow_log(&output_dir, &log_entries);

    let mut summary = RunSummary::new();
    summary.insert("run_id".into(), run_id.to_string().into());
    summary.insert("course_name".into(), config.course_name.clone().into());
    summary.insert(
        "outline".into(),
        config.outline_path.display().to_string().into(),
    );
    summary.insert(
        "output_dir".into(),
        output_dir.display().to_string().into(),
    );
    summary.insert("status".into(), "completed".into());
    summary.insert("start_time".into(), start_time.to_rfc3339().into());
    summary.insert("end_time".into(), Local::now().to_rfc3339().into());
    summary.insert("total_rows".into(), total.into());
    summary.insert("success_count".into(), succeeded.into());
    summary.insert("error_count".into(), failed.into());
    summary.insert(
        "processed_rows".into(),
        serde_json::Value::Array(processed_rows),
    );
    if let Some(path) = &log_path {
        summary.insert("workflow_log".into(), path.display().to_string().into());
    }

    let summary_path = save_generation_summary(&output_dir, &summary);

    let report = RunReport {
        run_id,
        output_dir,
        rows_processed: total,
        succeeded,
        failed,
        summary_path,
        log_path,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        run_id = %report.run_id,
        rows = report.rows_processed,
        succeeded = report.succeeded,
        failed = report.failed,
        elapsed_ms = report.elapsed.as_millis(),
        "generation run complete"
    );

    Ok(report)
}

/// Process one outline row through resolve → generate → save → render.
fn process_row(
    config: &RunConfig,
    generator: &dyn ContentGenerator,
    templates: &TemplateLibrary,
    rows: &[OutlineRow],
    index: usize,
    output_dir: &Path,
) -> Result<PathBuf> {
    let row = &rows[index];
    let variables = resolver::resolve(row, &config.course_name, &config.learner_profile);

    let template = templates.select(&variables.template_type);
    let prompt = fill_template(template, &variables);
    let step_context = build_context_from_adjacent_steps(rows, index);

    let request = GenerationRequest {
        prompt,
        variables: &variables,
        step_context,
    };
    let content = generator.generate(&request)?;

    let artifact_path = planner::plan(row, output_dir)?;
    let meta = ArtifactMeta::from(&variables);
    let saved = save_markdown(&content, &meta, &artifact_path)?;

    if config.render_html {
        let html_path = html_output_path(output_dir, row, &saved);
        // Best-effort: a failed render never fails the row.
        if !courseforge_markup::convert_markdown_file(&saved, &html_path, &config.render_options) {
            warn!(path = %saved.display(), "HTML render failed for artifact");
        }
    }

    Ok(saved)
}

/// Mirror the artifact layout under `html/` with an `.html` extension.
fn html_output_path(output_dir: &Path, row: &OutlineRow, artifact_path: &Path) -> PathBuf {
    let stem = artifact_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());
    output_dir
        .join("html")
        .join(&row.module)
        .join(format!("{stem}.html"))
}

fn step_label(row: &OutlineRow) -> String {
    format!(
        "Module {}, Lesson {}, Step {}",
        row.module, row.lesson, row.step_number
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
