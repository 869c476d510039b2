//! Educational-continuity context from adjacent outline steps.

use tracing::{debug, info};

use courseforge_shared::OutlineRow;

/// Build a context string describing the previous and next steps around
/// `current`, for the generator to keep lessons continuous.
///
/// Steps in the same module and lesson are preferred in both directions;
/// when none exists, the immediately adjacent row is used with a
/// `(different lesson)` label. Returns an empty string when the index is
/// out of range or there are no neighbors.
pub fn build_context_from_adjacent_steps(rows: &[OutlineRow], current: usize) -> String {
    info!(row = current, "building context from adjacent steps");

    if current >= rows.len() {
        debug!(row = current, "row index out of range for context building");
        return String::new();
    }

    let current_row = &rows[current];

    let mut previous_context = String::new();
    for i in (0..current).rev() {
        let row = &rows[i];
        if row.module == current_row.module && row.lesson == current_row.lesson {
            previous_context = format_step_context(row, "Previous step");
            break;
        }
        // Provisional fallback: the immediately previous step, kept unless a
        // same-lesson step turns up further back.
        if i + 1 == current {
            previous_context = format_step_context(row, "Previous step (different lesson)");
        }
    }

    let mut next_context = String::new();
    for (i, row) in rows.iter().enumerate().skip(current + 1) {
        if row.module == current_row.module && row.lesson == current_row.lesson {
            next_context = format_step_context(row, "Next step");
            break;
        }
        if i == current + 1 {
            next_context = format_step_context(row, "Next step (different lesson)");
        }
    }

    let mut parts = Vec::new();
    if !previous_context.is_empty() {
        parts.push(previous_context);
    }
    if !next_context.is_empty() {
        parts.push(next_context);
    }

    if parts.is_empty() {
        debug!("no adjacent steps found for context building");
        return String::new();
    }

    parts.join("\n\n")
}

/// Format one step's information for use in context.
fn format_step_context(row: &OutlineRow, prefix: &str) -> String {
    let mut content = String::new();
    if !row.rationale.is_empty() {
        content.push_str(&row.rationale);
    }
    if !row.content_outline.is_empty() {
        if !content.is_empty() {
            content.push_str(". ");
        }
        content.push_str(&row.content_outline);
    }
    if content.is_empty() {
        content.push_str("No content available");
    }

    format!("{prefix}: {}\n{content}", row.step_title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(module: &str, lesson: &str, step: &str, title: &str) -> OutlineRow {
        OutlineRow {
            module: module.into(),
            lesson: lesson.into(),
            step_number: step.into(),
            step_title: title.into(),
            template_type: "Article".into(),
            rationale: String::new(),
            content_outline: String::new(),
            extra: Default::default(),
        }
    }

    #[test]
    fn middle_step_gets_both_neighbors() {
        let rows = vec![
            make_row("M1", "L1", "1", "First"),
            make_row("M1", "L1", "2", "Second"),
            make_row("M1", "L1", "3", "Third"),
        ];
        let context = build_context_from_adjacent_steps(&rows, 1);
        assert!(context.contains("Previous step: First"));
        assert!(context.contains("Next step: Third"));
    }

    #[test]
    fn same_lesson_preferred_over_nearer_neighbor() {
        let rows = vec![
            make_row("M1", "L1", "1", "Same lesson"),
            make_row("M1", "L2", "1", "Other lesson"),
            make_row("M1", "L1", "2", "Current"),
        ];
        let context = build_context_from_adjacent_steps(&rows, 2);
        assert!(context.contains("Previous step: Same lesson"));
        assert!(!context.contains("Other lesson"));
    }

    #[test]
    fn falls_back_to_immediate_neighbor_with_label() {
        let rows = vec![
            make_row("M1", "L1", "3", "Last of L1"),
            make_row("M1", "L2", "1", "Current"),
        ];
        let context = build_context_from_adjacent_steps(&rows, 1);
        assert!(context.contains("Previous step (different lesson): Last of L1"));
    }

    #[test]
    fn rationale_and_outline_joined() {
        let mut prev = make_row("M1", "L1", "1", "First");
        prev.rationale = "Why it matters".into();
        prev.content_outline = "Key points".into();
        let rows = vec![prev, make_row("M1", "L1", "2", "Current")];

        let context = build_context_from_adjacent_steps(&rows, 1);
        assert!(context.contains("Why it matters. Key points"));
    }

    #[test]
    fn empty_step_content_labeled() {
        let rows = vec![
            make_row("M1", "L1", "1", "First"),
            make_row("M1", "L1", "2", "Current"),
        ];
        let context = build_context_from_adjacent_steps(&rows, 1);
        assert!(context.contains("No content available"));
    }

    #[test]
    fn single_row_has_no_context() {
        let rows = vec![make_row("M1", "L1", "1", "Only")];
        assert_eq!(build_context_from_adjacent_steps(&rows, 0), "");
    }

    #[test]
    fn out_of_range_index_is_empty() {
        let rows = vec![make_row("M1", "L1", "1", "Only")];
        assert_eq!(build_context_from_adjacent_steps(&rows, 5), "");
    }
}
