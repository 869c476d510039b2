//! The content-generator seam.
//!
//! The actual LLM client lives outside this crate; the pipeline hands it a
//! resolved prompt plus the variable set and receives text back. The
//! [`DraftGenerator`] is a deterministic offline implementation used for
//! dry runs and tests.

use courseforge_shared::{Result, VariableSet};

/// Everything a generator needs for one step: the filled prompt template,
/// the resolved variables, and continuity context from adjacent steps.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// Prompt with all `{{placeholders}}` substituted.
    pub prompt: String,
    /// The resolved variable set for the row.
    pub variables: &'a VariableSet,
    /// Context describing the previous and next steps (may be empty).
    pub step_context: String,
}

/// External collaborator that turns a generation request into content.
///
/// Failures are the generator's own responsibility to signal, via
/// [`CourseForgeError::Generation`](courseforge_shared::CourseForgeError::Generation).
/// Retry and backoff are the caller's concern, not the pipeline's.
pub trait ContentGenerator {
    /// Generate content for one step.
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String>;
}

/// Offline generator producing a deterministic lesson skeleton from the
/// variable set. Useful for previewing a run's structure without an LLM.
#[derive(Debug, Default, Clone, Copy)]
pub struct DraftGenerator;

impl ContentGenerator for DraftGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        let vars = request.variables;
        let mut content = String::new();

        content.push_str("## Overview\n\n");
        content.push_str(&vars.objective);
        content.push_str(".\n");

        if !vars.rationale.is_empty() {
            content.push_str(&format!("\nWhy this step matters: {}\n", vars.rationale));
        }

        content.push_str("\n## Key Points\n\n");
        if vars.content_outline.is_empty() {
            content.push_str("- To be developed.\n");
        } else {
            for item in vars.content_outline.split(';') {
                let item = item.trim();
                if !item.is_empty() {
                    content.push_str(&format!("- {item}\n"));
                }
            }
        }

        content.push_str(&format!(
            "\n## Summary\n\nThis step covers {} as part of lesson {} in module {} of {}.\n",
            vars.step_title, vars.lesson, vars.module, vars.course_name
        ));

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(variables: &VariableSet) -> GenerationRequest<'_> {
        GenerationRequest {
            prompt: String::new(),
            variables,
            step_context: String::new(),
        }
    }

    fn make_variables() -> VariableSet {
        VariableSet {
            topic: "Photography".into(),
            objective: "Learn about Aperture".into(),
            rationale: String::new(),
            content_outline: String::new(),
            target_learner: "Beginners".into(),
            course_name: "Photography 101".into(),
            module: "M1".into(),
            lesson: "L1".into(),
            step_number: "1".into(),
            step_title: "Aperture".into(),
            template_type: "article".into(),
        }
    }

    #[test]
    fn draft_is_never_empty() {
        let vars = make_variables();
        let content = DraftGenerator.generate(&make_request(&vars)).unwrap();
        assert!(!content.trim().is_empty());
        assert!(content.contains("Learn about Aperture"));
    }

    #[test]
    fn draft_lists_outline_items() {
        let mut vars = make_variables();
        vars.content_outline = "f-stops; depth of field; bokeh".into();
        let content = DraftGenerator.generate(&make_request(&vars)).unwrap();
        assert!(content.contains("- f-stops\n"));
        assert!(content.contains("- depth of field\n"));
        assert!(content.contains("- bokeh\n"));
    }

    #[test]
    fn draft_is_deterministic() {
        let vars = make_variables();
        let a = DraftGenerator.generate(&make_request(&vars)).unwrap();
        let b = DraftGenerator.generate(&make_request(&vars)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn draft_includes_rationale_when_present() {
        let mut vars = make_variables();
        vars.rationale = "Exposure comes first".into();
        let content = DraftGenerator.generate(&make_request(&vars)).unwrap();
        assert!(content.contains("Why this step matters: Exposure comes first"));
    }
}
