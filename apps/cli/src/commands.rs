//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use courseforge_core::pipeline::{ProgressReporter, RunConfig, RunReport, run_batch};
use courseforge_core::DraftGenerator;
use courseforge_markup::RenderOptions;
use courseforge_shared::{AppConfig, expand_home, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CourseForge — batch course-content generation.
#[derive(Parser)]
#[command(
    name = "courseforge",
    version,
    about = "Turn a tabular course outline into markdown artifacts and styled HTML.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run a batch generation pass over a course outline.
    Generate {
        /// Path to the outline CSV.
        outline: String,

        /// Course name (also the topic for prompt substitution).
        #[arg(short, long)]
        course: String,

        /// Path to a learner-profile document.
        #[arg(short, long)]
        learner_profile: Option<String>,

        /// Output root directory (defaults to the configured output_dir).
        #[arg(short, long)]
        out: Option<String>,

        /// Path to a JSON template library (defaults to the configured one).
        #[arg(long)]
        templates: Option<String>,

        /// Also render each artifact to HTML under <run>/html/.
        #[arg(long)]
        render: bool,
    },

    /// Render a markdown file or directory to HTML.
    Render {
        /// Markdown file or directory to convert.
        input: String,

        /// Output file or directory (defaults to alongside the input).
        #[arg(short, long)]
        out: Option<String>,

        /// Module number for the metadata block.
        #[arg(long)]
        module: Option<u32>,

        /// Lesson number for the metadata block.
        #[arg(long)]
        lesson: Option<u32>,

        /// Keep real image tags instead of placeholder blocks.
        #[arg(long)]
        keep_images: bool,

        /// Insert per-section audio narration blocks.
        #[arg(long)]
        audio: bool,
    },

    /// Read an outline and report what a run would process.
    Validate {
        /// Path to the outline CSV.
        outline: String,
    },

    /// Render a side-by-side comparison of original and enhanced markdown.
    Compare {
        /// Path to the original markdown file.
        original: String,

        /// Path to the enhanced markdown file.
        enhanced: String,

        /// Output HTML path.
        #[arg(short, long, default_value = "comparison.html")]
        out: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "courseforge=info",
        1 => "courseforge=debug",
        _ => "courseforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            outline,
            course,
            learner_profile,
            out,
            templates,
            render,
        } => cmd_generate(
            &outline,
            &course,
            learner_profile.as_deref(),
            out.as_deref(),
            templates.as_deref(),
            render,
        ),
        Command::Render {
            input,
            out,
            module,
            lesson,
            keep_images,
            audio,
        } => cmd_render(&input, out.as_deref(), module, lesson, keep_images, audio),
        Command::Validate { outline } => cmd_validate(&outline),
        Command::Compare {
            original,
            enhanced,
            out,
        } => cmd_compare(&original, &enhanced, &out),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

fn cmd_generate(
    outline: &str,
    course: &str,
    learner_profile: Option<&str>,
    out: Option<&str>,
    templates: Option<&str>,
    render: bool,
) -> Result<()> {
    let config = load_config()?;

    // A learner profile flag names a file; its contents become the variable.
    let profile_path = learner_profile
        .map(String::from)
        .unwrap_or_else(|| config.defaults.learner_profile.clone());
    let learner_profile = if profile_path.is_empty() {
        String::new()
    } else {
        std::fs::read_to_string(expand_home(&profile_path))
            .map_err(|e| eyre!("cannot read learner profile '{profile_path}': {e}"))?
    };

    let output_root = match out {
        Some(path) => PathBuf::from(path),
        None => expand_home(&config.defaults.output_dir),
    };

    let template_library_path = templates
        .map(PathBuf::from)
        .or_else(|| {
            if config.templates.path.is_empty() {
                None
            } else {
                Some(expand_home(&config.templates.path))
            }
        });

    let run_config = RunConfig {
        outline_path: PathBuf::from(outline),
        course_name: course.to_string(),
        learner_profile,
        output_root,
        template_library_path,
        render_html: render,
        render_options: render_options_from(&config, None, None),
    };

    info!(outline, course, render, "starting batch generation");

    let reporter = CliProgress::new();
    let report = run_batch(&run_config, &DraftGenerator, &reporter)?;

    println!();
    println!("  Generation run complete!");
    println!("  Run:       {}", report.run_id);
    println!("  Rows:      {}", report.rows_processed);
    println!("  Succeeded: {}", report.succeeded);
    println!("  Failed:    {}", report.failed);
    println!("  Output:    {}", report.output_dir.display());
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn render_options_from(
    config: &AppConfig,
    module: Option<u32>,
    lesson: Option<u32>,
) -> RenderOptions {
    RenderOptions {
        module,
        lesson,
        use_standardized_images: config.render.use_standardized_images,
        include_audio: config.render.include_audio,
        css: None,
    }
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

fn cmd_render(
    input: &str,
    out: Option<&str>,
    module: Option<u32>,
    lesson: Option<u32>,
    keep_images: bool,
    audio: bool,
) -> Result<()> {
    let config = load_config()?;
    let mut opts = render_options_from(&config, module, lesson);
    if keep_images {
        opts.use_standardized_images = false;
    }
    if audio {
        opts.include_audio = true;
    }

    let input_path = PathBuf::from(input);
    if input_path.is_dir() {
        let output_dir = out
            .map(PathBuf::from)
            .unwrap_or_else(|| input_path.join("html"));
        let (converted, failed) = render_directory(&input_path, &output_dir, &opts);
        println!("Converted {converted} file(s) to {}", output_dir.display());
        if failed > 0 {
            println!("Skipped {failed} file(s) that failed to convert");
        }
        return Ok(());
    }

    if !input_path.exists() {
        return Err(eyre!("input '{input}' does not exist"));
    }

    let output_path = out
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.with_extension("html"));

    if courseforge_markup::convert_markdown_file(&input_path, &output_path, &opts) {
        println!("Wrote {}", output_path.display());
        Ok(())
    } else {
        Err(eyre!("failed to convert '{input}'"))
    }
}

/// Convert every `.md` file under `input_dir`, mirroring the layout under
/// `output_dir`. One bad file is skipped, not fatal.
fn render_directory(input_dir: &Path, output_dir: &Path, opts: &RenderOptions) -> (usize, usize) {
    let mut converted = 0usize;
    let mut failed = 0usize;
    let mut stack = vec![input_dir.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "cannot read directory, skipping");
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                // Don't recurse into our own output
                if path != *output_dir {
                    stack.push(path);
                }
            } else if path.extension().is_some_and(|ext| ext == "md") {
                let relative = path.strip_prefix(input_dir).unwrap_or(&path);
                let target = output_dir.join(relative).with_extension("html");
                if courseforge_markup::convert_markdown_file(&path, &target, opts) {
                    converted += 1;
                } else {
                    failed += 1;
                }
            }
        }
    }

    (converted, failed)
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn cmd_validate(outline: &str) -> Result<()> {
    let rows = courseforge_outline::read_outline(outline)?;

    let mut modules: Vec<&str> = rows.iter().map(|r| r.module.as_str()).collect();
    modules.sort_unstable();
    modules.dedup();

    println!("Outline OK: {} row(s), {} module(s)", rows.len(), modules.len());
    for row in &rows {
        println!(
            "  {} / {} / step {}: {} [{}]",
            row.module, row.lesson, row.step_number, row.step_title, row.template_type
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// compare
// ---------------------------------------------------------------------------

fn cmd_compare(original: &str, enhanced: &str, out: &str) -> Result<()> {
    let original_content = std::fs::read_to_string(original)
        .map_err(|e| eyre!("cannot read '{original}': {e}"))?;
    let enhanced_content = std::fs::read_to_string(enhanced)
        .map_err(|e| eyre!("cannot read '{enhanced}': {e}"))?;

    let html = courseforge_markup::comparison_report(&original_content, &enhanced_content, None);

    let out_path = PathBuf::from(out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&out_path, html)?;
    println!("Wrote {}", out_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn row_started(&self, step: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Generating [{current}/{total}] {step}"));
    }

    fn row_finished(&self, _step: &str, _current: usize, _total: usize, _ok: bool) {}

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
