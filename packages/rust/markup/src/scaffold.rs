//! Content-type scaffolding and the enhancement comparison report.
//!
//! Scaffolding wraps the markdown body with type-specific controls before
//! conversion: a video iframe with placeholder caption, quiz submit
//! controls with a hidden results block, or an assignment textarea with a
//! submit control. Unknown types pass through unwrapped.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{RenderOptions, html_base, markdown_to_html, render};

/// Structured details about a content-enhancement pass, rendered at the top
/// of the comparison report.
#[derive(Debug, Clone, Default)]
pub struct EnhancementDetails {
    /// Human-readable descriptions of the changes made.
    pub changes: Vec<String>,
    /// Named metrics (counts, scores) about the enhancement.
    pub metrics: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Content-type scaffolding
// ---------------------------------------------------------------------------

/// Generate HTML with formatting appropriate for the declared content type.
///
/// `video`, `quiz`, and `assignment`/`exercise` (case-insensitive) get
/// type-specific scaffolding around the markdown body; any other type is
/// rendered as-is.
pub fn generate_content_html(
    content: &str,
    content_type: &str,
    title: &str,
    use_standardized_images: bool,
) -> String {
    debug!(content_type, title, "generating typed content HTML");

    let wrapped = match content_type.to_lowercase().as_str() {
        "video" => format!(
            "# {title}\n\n\
             ## Video\n\n\
             <div class=\"video-container\">\n\
             <iframe src=\"about:blank\" data-src=\"video/placeholder.mp4\" allowfullscreen></iframe>\n\
             <p class=\"video-placeholder\">Video: {title}</p>\n\
             </div>\n\n\
             {content}\n"
        ),
        "quiz" => format!(
            "# {title} - Quiz\n\n\
             {content}\n\n\
             <div class=\"quiz-controls\">\n\
             <button class=\"submit-quiz\">Submit Answers</button>\n\
             <div class=\"quiz-results\" style=\"display:none;\">\n\
             <h3>Quiz Results</h3>\n\
             <p>Your score: <span class=\"score\">0</span>%</p>\n\
             </div>\n\
             </div>\n"
        ),
        "assignment" | "exercise" => format!(
            "# {title} - Assignment\n\n\
             {content}\n\n\
             <div class=\"assignment-submission\">\n\
             <h3>Submit Your Work</h3>\n\
             <textarea placeholder=\"Enter your response here...\"></textarea>\n\
             <button class=\"submit-assignment\">Submit Assignment</button>\n\
             </div>\n"
        ),
        _ => content.to_string(),
    };

    let opts = RenderOptions {
        use_standardized_images,
        ..RenderOptions::default()
    };
    render(&wrapped, &opts)
}

// ---------------------------------------------------------------------------
// Enhancement comparison report
// ---------------------------------------------------------------------------

/// Render a single HTML document comparing original and enhanced content
/// side by side, preceded by an enhancement-details block when supplied.
pub fn comparison_report(
    original_content: &str,
    enhanced_content: &str,
    details: Option<&EnhancementDetails>,
) -> String {
    let base = html_base("Content Enhancement Comparison", None);

    let original_html = markdown_to_html(original_content);
    let enhanced_html = markdown_to_html(enhanced_content);

    let mut comparison = String::from("<h1>Content Enhancement Comparison</h1>\n");

    if let Some(details) = details {
        comparison.push_str("<div class='enhancement-details'>\n");
        comparison.push_str("<h2>Enhancement Details</h2>\n");

        if !details.changes.is_empty() {
            comparison.push_str("<h3>Changes Made</h3>\n<ul>\n");
            for change in &details.changes {
                comparison.push_str(&format!("<li>{change}</li>\n"));
            }
            comparison.push_str("</ul>\n");
        }

        if !details.metrics.is_empty() {
            comparison.push_str("<h3>Metrics</h3>\n<ul>\n");
            for (key, value) in &details.metrics {
                comparison.push_str(&format!("<li><strong>{key}:</strong> {value}</li>\n"));
            }
            comparison.push_str("</ul>\n");
        }

        comparison.push_str("</div>\n");
    }

    comparison.push_str(
        "<h2>Side-by-Side Comparison</h2>\n\
         <div class=\"comparison-container\" style=\"display: flex; gap: 20px;\">\n\
         <div class=\"original\" style=\"flex: 1;\">\n\
         <h3>Original Content</h3>\n\
         <div class=\"content-box\" style=\"border: 1px solid #ccc; padding: 15px; background-color: #f9f9f9;\">\n",
    );
    comparison.push_str(&original_html);
    comparison.push_str(
        "</div>\n\
         </div>\n\
         <div class=\"enhanced\" style=\"flex: 1;\">\n\
         <h3>Enhanced Content</h3>\n\
         <div class=\"content-box\" style=\"border: 1px solid #ccc; padding: 15px; background-color: #f9f9f9;\">\n",
    );
    comparison.push_str(&enhanced_html);
    comparison.push_str(
        "</div>\n\
         </div>\n\
         </div>\n",
    );

    base.replace("<!-- Content will be inserted here -->", &comparison)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
