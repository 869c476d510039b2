//! Markdown-to-HTML rendering for persisted course artifacts.
//!
//! Converts markdown artifacts into complete styled HTML documents using
//! `pulldown-cmark`, with optional image-placeholder substitution, audio
//! narration blocks, content-type scaffolding, and hidden metadata tags.
//!
//! The renderer operates without the actual media assets present: image
//! references are normalized to an `images/` directory and then suppressed
//! in favor of labeled placeholder blocks.

mod scaffold;
mod transforms;

pub use scaffold::{EnhancementDetails, comparison_report, generate_content_html};
pub use transforms::{insert_audio_players, placeholder_images, standardize_image_paths};

use std::path::Path;
use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser, html};
use regex::Regex;
use tracing::{debug, error, info};

/// Marker replaced with the rendered content fragment.
const CONTENT_MARKER: &str = "<!-- Content will be inserted here -->";

/// Title used when the markdown has no level-1 heading.
const DEFAULT_TITLE: &str = "Converted Content";

/// Generator name stamped into the hidden metadata block.
const GENERATOR_NAME: &str = "CourseForge";

/// Default stylesheet for rendered documents.
const DEFAULT_CSS: &str = r#"
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            padding: 20px;
            max-width: 800px;
            margin: 0 auto;
        }
        h1, h2, h3, h4, h5, h6 {
            margin-top: 1.5em;
            margin-bottom: 0.5em;
            color: #333;
        }
        h1 { font-size: 2em; }
        h2 { font-size: 1.5em; }
        h3 { font-size: 1.2em; }
        p { margin-bottom: 1em; }
        img {
            max-width: 100%;
            height: auto;
            display: block;
            margin: 1em auto;
        }
        pre {
            background-color: #f5f5f5;
            padding: 1em;
            border-radius: 5px;
            overflow-x: auto;
        }
        code {
            background-color: #f5f5f5;
            padding: 0.2em 0.4em;
            border-radius: 3px;
        }
        blockquote {
            border-left: 4px solid #ddd;
            padding-left: 1em;
            color: #666;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            margin: 1em 0;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #f2f2f2;
        }
        .image-placeholder {
            background-color: #eee;
            border: 1px dashed #aaa;
            padding: 20px;
            text-align: center;
            margin: 1em 0;
            color: #666;
        }
        .audio-player {
            background-color: #f9f9f9;
            border: 1px solid #ddd;
            padding: 10px;
            margin: 1em 0;
        }
"#;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for [`render`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Module number stamped into the metadata block.
    pub module: Option<u32>,
    /// Lesson number stamped into the metadata block.
    pub lesson: Option<u32>,
    /// Rewrite image references to `images/` and render placeholder blocks
    /// instead of `<img>` tags.
    pub use_standardized_images: bool,
    /// Insert an audio-player block after each heading of level 1–3.
    pub include_audio: bool,
    /// Stylesheet override (defaults to the built-in stylesheet).
    pub css: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module: None,
            lesson: None,
            use_standardized_images: true,
            include_audio: false,
            css: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").expect("H1 regex"));

static BODY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<body[^>]*>").expect("body tag regex"));

/// Convert markdown content to a complete styled HTML document.
///
/// The document title comes from the first level-1 heading (falling back to
/// a fixed placeholder), and the rendered fragment is substituted at a
/// single marker in the base document. Rendering is deterministic: the same
/// input and options always produce the same output.
pub fn render(markdown: &str, opts: &RenderOptions) -> String {
    // Persisted artifacts carry a frontmatter header; it is metadata, not
    // content, and must not surface in the rendered document.
    let markdown = strip_frontmatter(markdown);
    let title = extract_title(markdown).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let base = html_base(&title, opts.css.as_deref());

    // Phase 1: normalize image paths in the markdown source.
    let markdown = if opts.use_standardized_images {
        standardize_image_paths(markdown)
    } else {
        markdown.to_string()
    };

    let mut content = markdown_to_html(&markdown);

    // Phase 2: suppress real image tags in favor of placeholder blocks.
    if opts.use_standardized_images {
        content = placeholder_images(&content);
    }

    if opts.include_audio {
        content = insert_audio_players(&content);
    }

    let mut metadata: Vec<(String, String)> = vec![
        ("generator".into(), GENERATOR_NAME.into()),
        ("version".into(), env!("CARGO_PKG_VERSION").into()),
    ];
    if let Some(module) = opts.module {
        metadata.push(("module".into(), module.to_string()));
    }
    if let Some(lesson) = opts.lesson {
        metadata.push(("lesson".into(), lesson.to_string()));
    }
    let content = inject_metadata(&content, &metadata);

    debug!(title = %title, len = content.len(), "rendered markdown to HTML");
    base.replace(CONTENT_MARKER, &content)
}

/// Convert markdown to an HTML fragment (tables and strikethrough enabled).
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Build the base HTML document with the content marker in place.
pub fn html_base(title: &str, css: Option<&str>) -> String {
    let css = css.unwrap_or(DEFAULT_CSS);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
             <meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>{title}</title>\n\
             <style>\n{css}\n    </style>\n\
         </head>\n\
         <body>\n\
             <div class=\"content\">\n\
                 {CONTENT_MARKER}\n\
             </div>\n\
         </body>\n\
         </html>\n"
    )
}

/// Inject metadata as a hidden block of `<meta>` tags.
///
/// Inserted immediately after the opening `<body>` tag, or prepended when
/// the fragment has none.
pub fn inject_metadata(html: &str, metadata: &[(String, String)]) -> String {
    let mut meta_html = String::from("<div class='metadata' style='display:none;'>\n");
    for (key, value) in metadata {
        meta_html.push_str(&format!("  <meta name='{key}' content='{value}'>\n"));
    }
    meta_html.push_str("</div>\n");

    if let Some(m) = BODY_TAG_RE.find(html) {
        let mut out = String::with_capacity(html.len() + meta_html.len() + 1);
        out.push_str(&html[..m.end()]);
        out.push('\n');
        out.push_str(&meta_html);
        out.push_str(&html[m.end()..]);
        out
    } else {
        format!("{meta_html}{html}")
    }
}

/// Extract the title from the first level-1 heading.
fn extract_title(markdown: &str) -> Option<String> {
    H1_RE.captures(markdown).map(|c| c[1].trim().to_string())
}

/// Strip a leading YAML frontmatter block, if present.
fn strip_frontmatter(markdown: &str) -> &str {
    let Some(rest) = markdown.strip_prefix("---\n") else {
        return markdown;
    };
    // A real frontmatter block has no blank lines; a leading thematic
    // break followed by content does.
    match rest.find("\n---\n") {
        Some(pos) if !rest[..pos].contains("\n\n") => {
            rest[pos + 5..].trim_start_matches('\n')
        }
        _ => markdown,
    }
}

// ---------------------------------------------------------------------------
// File-level conversion
// ---------------------------------------------------------------------------

/// Read one markdown file, render it, and write one HTML file.
///
/// Creates parent directories as needed. Failures are logged and reported
/// as `false` so a batch render pass can skip one bad file and continue.
pub fn convert_markdown_file(input_path: &Path, output_path: &Path, opts: &RenderOptions) -> bool {
    let markdown = match std::fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            error!(path = %input_path.display(), error = %e, "failed to read markdown file");
            return false;
        }
    };

    let html = render(&markdown, opts);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            error!(path = %parent.display(), error = %e, "failed to create output directory");
            return false;
        }
    }

    if let Err(e) = std::fs::write(output_path, html) {
        error!(path = %output_path.display(), error = %e, "failed to write HTML file");
        return false;
    }

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        "converted markdown to HTML"
    );
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
