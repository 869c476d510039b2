//! Variable resolution: outline row + course settings → substitution context.

use tracing::info;

use courseforge_shared::{OutlineRow, VariableSet};

/// Resolve an outline row and course-level settings into a flat variable
/// set for template substitution.
///
/// Pure function of its inputs; missing fields default to empty strings and
/// never fail. `objective` is always non-empty: it is derived from the step
/// title, falling back to a generic phrase when the title is blank. The
/// rationale and content outline do not change the objective template, but
/// both are carried through separately for the generator to use.
pub fn resolve(row: &OutlineRow, course_name: &str, learner_profile: &str) -> VariableSet {
    info!(
        module = %row.module,
        lesson = %row.lesson,
        step = %row.step_number,
        "extracting variables"
    );

    let rationale = row.rationale.trim().to_string();
    let content_outline = row.content_outline.trim().to_string();

    let objective = if row.step_title.trim().is_empty() {
        "Learn about this topic".to_string()
    } else {
        format!("Learn about {}", row.step_title)
    };

    let variables = VariableSet {
        topic: course_name.to_string(),
        objective,
        rationale,
        content_outline,
        target_learner: learner_profile.to_string(),
        course_name: course_name.to_string(),
        module: row.module.clone(),
        lesson: row.lesson.clone(),
        step_number: row.step_number.clone(),
        step_title: row.step_title.clone(),
        template_type: row.template_type.clone(),
    };

    // Non-breaking hyphens are replaced in log output only, to avoid
    // console encoding issues; the variables themselves are untouched.
    info!(
        topic = %course_name,
        step_title = %variables.step_title.replace('\u{2011}', "-"),
        template_type = %variables.template_type.replace('\u{2011}', "-"),
        "variables extracted"
    );

    variables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row() -> OutlineRow {
        OutlineRow {
            module: "M1".into(),
            lesson: "L1".into(),
            step_number: "1".into(),
            step_title: "Intro: Basics".into(),
            template_type: "video".into(),
            rationale: String::new(),
            content_outline: String::new(),
            extra: Default::default(),
        }
    }

    #[test]
    fn objective_derived_from_step_title() {
        let vars = resolve(&make_row(), "Photography", "");
        assert_eq!(vars.objective, "Learn about Intro: Basics");
    }

    #[test]
    fn objective_non_empty_without_rationale_or_outline() {
        let vars = resolve(&make_row(), "Photography", "");
        assert!(vars.rationale.is_empty());
        assert!(vars.content_outline.is_empty());
        assert!(!vars.objective.is_empty());
    }

    #[test]
    fn objective_ignores_rationale_and_outline() {
        let mut row = make_row();
        row.rationale = "Because context matters".into();
        row.content_outline = "a; b; c".into();
        let vars = resolve(&row, "Photography", "");
        // Same template either way; both values still carried separately
        assert_eq!(vars.objective, "Learn about Intro: Basics");
        assert_eq!(vars.rationale, "Because context matters");
        assert_eq!(vars.content_outline, "a; b; c");
    }

    #[test]
    fn blank_title_falls_back_to_generic_objective() {
        let mut row = make_row();
        row.step_title = "  ".into();
        let vars = resolve(&row, "Photography", "");
        assert_eq!(vars.objective, "Learn about this topic");
    }

    #[test]
    fn rationale_and_outline_trimmed() {
        let mut row = make_row();
        row.rationale = "  why  ".into();
        row.content_outline = "\noutline\n".into();
        let vars = resolve(&row, "Photography", "");
        assert_eq!(vars.rationale, "why");
        assert_eq!(vars.content_outline, "outline");
    }

    #[test]
    fn course_settings_copied_through() {
        let vars = resolve(&make_row(), "Photography", "Adult beginners");
        assert_eq!(vars.topic, "Photography");
        assert_eq!(vars.course_name, "Photography");
        assert_eq!(vars.target_learner, "Adult beginners");
        assert_eq!(vars.template_type, "video");
    }
}
