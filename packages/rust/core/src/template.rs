//! Prompt template library and variable substitution.
//!
//! Templates live in a JSON file of the shape
//! `{"templates": {"<id>": {"content": "...", "variables": [...]}}}` and
//! use `{{name}}` placeholders. Loading is best-effort: a missing or
//! unreadable library yields an empty one (logged) so a batch never fails
//! over template plumbing, and a built-in fallback template is used when no
//! library template matches the row's declared type.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use courseforge_shared::VariableSet;

/// Built-in fallback prompt used when the library has no matching template.
pub const FALLBACK_TEMPLATE: &str = "\
You are a professional curriculum developer creating new original educational content.

YOUR TASK:
Create a complete, original lesson about {{topic}} for {{target_learner}} in {{course_name}}.
This lesson should teach {{objective}} through practical activities and clear explanations.

CONTENT OUTLINE TO COVER:
{{content_outline}}

RATIONALE FOR THIS STEP:
{{rationale}}

INSTRUCTIONS:
1. Generate completely new, original educational content
2. Write as a complete, ready-to-use lesson, not template placeholders
3. Include clear explanations, examples, and activities
4. Use age-appropriate language for {{target_learner}}
";

/// One loadable prompt template.
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    /// The template text with `{{name}}` placeholders.
    pub content: String,
    /// Placeholder names the template expects (informational).
    #[serde(default)]
    pub variables: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: HashMap<String, Template>,
}

/// A set of prompt templates keyed by id (matched against the row's
/// template type, lowercased).
#[derive(Debug, Default)]
pub struct TemplateLibrary {
    templates: HashMap<String, Template>,
}

impl TemplateLibrary {
    /// An empty library; every lookup falls back to [`FALLBACK_TEMPLATE`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the library from a JSON file.
    ///
    /// Best-effort: a missing or invalid file yields an empty library and a
    /// warning, never an error.
    pub fn load(path: &Path) -> Self {
        info!(path = %path.display(), "loading template library");

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "template library not readable, using fallback only");
                return Self::empty();
            }
        };

        match serde_json::from_str::<TemplateFile>(&content) {
            Ok(file) => {
                info!(count = file.templates.len(), "template library loaded");
                Self {
                    templates: file.templates,
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid template library, using fallback only");
                Self::empty()
            }
        }
    }

    /// Look up a template by id.
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    /// Select the template content for a row's declared type, falling back
    /// to the built-in template when none matches.
    pub fn select(&self, template_type: &str) -> &str {
        match self.templates.get(&template_type.to_lowercase()) {
            Some(template) => &template.content,
            None => {
                warn!(template_type, "no library template for type, using fallback");
                FALLBACK_TEMPLATE
            }
        }
    }
}

/// Substitute every `{{name}}` placeholder with its value from the
/// variable set. Unknown placeholders are left intact.
pub fn fill_template(template: &str, variables: &VariableSet) -> String {
    let mut prompt = template.to_string();
    for (key, value) in variables.as_pairs() {
        prompt = prompt.replace(&format!("{{{{{key}}}}}"), value);
    }
    prompt
}
