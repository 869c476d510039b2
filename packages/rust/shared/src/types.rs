//! Core domain types for CourseForge generation runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for batch-run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// OutlineRow
// ---------------------------------------------------------------------------

/// One validated row of the course outline, a single unit of generation work.
///
/// Constructed by the outline reader and immutable afterwards. The rationale
/// column is already unified to its canonical key; columns outside the known
/// set are carried in [`OutlineRow::extra`] untouched so future outline
/// columns don't break parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineRow {
    /// Module identifier (e.g., `M1`).
    pub module: String,
    /// Lesson identifier within the module.
    pub lesson: String,
    /// Step number within the lesson.
    pub step_number: String,
    /// Human-readable step title.
    pub step_title: String,
    /// Declared content type (article, video, quiz, ...).
    pub template_type: String,
    /// Rationale for the step (may be empty).
    pub rationale: String,
    /// Content outline for the step (may be empty).
    pub content_outline: String,
    /// All other columns, passed through unmodified.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// VariableSet
// ---------------------------------------------------------------------------

/// Resolved substitution context for one outline row.
///
/// Owned by the calling job; passed to the content generator for prompt
/// substitution and to the artifact writer as metadata. `objective` is
/// always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSet {
    /// Course topic (same as the course name).
    pub topic: String,
    /// Learning objective derived from the step title.
    pub objective: String,
    /// Rationale carried from the outline row.
    pub rationale: String,
    /// Content outline carried from the outline row.
    pub content_outline: String,
    /// Description of the target learner.
    pub target_learner: String,
    /// Course name.
    pub course_name: String,
    /// Module identifier.
    pub module: String,
    /// Lesson identifier.
    pub lesson: String,
    /// Step number.
    pub step_number: String,
    /// Step title.
    pub step_title: String,
    /// Declared content type.
    pub template_type: String,
}

impl VariableSet {
    /// The variable names and values as substitution pairs, in a fixed order.
    pub fn as_pairs(&self) -> [(&'static str, &str); 11] {
        [
            ("topic", &self.topic),
            ("objective", &self.objective),
            ("rationale", &self.rationale),
            ("content_outline", &self.content_outline),
            ("target_learner", &self.target_learner),
            ("course_name", &self.course_name),
            ("module", &self.module),
            ("lesson", &self.lesson),
            ("step_number", &self.step_number),
            ("step_title", &self.step_title),
            ("template_type", &self.template_type),
        ]
    }
}

// ---------------------------------------------------------------------------
// ArtifactMeta
// ---------------------------------------------------------------------------

/// Frontmatter source for one persisted artifact.
///
/// `generation_date` is not a field here; it is stamped at write time by
/// the artifact writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub module: String,
    pub lesson: String,
    pub step_number: String,
    pub step_title: String,
    pub template_type: String,
    pub target_learner: String,
}

impl From<&VariableSet> for ArtifactMeta {
    fn from(vars: &VariableSet) -> Self {
        Self {
            module: vars.module.clone(),
            lesson: vars.lesson.clone(),
            step_number: vars.step_number.clone(),
            step_title: vars.step_title.clone(),
            template_type: vars.template_type.clone(),
            target_learner: vars.target_learner.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run bookkeeping
// ---------------------------------------------------------------------------

/// Arbitrary key→value result map, persisted as one JSON document per run.
pub type RunSummary = serde_json::Map<String, serde_json::Value>;

/// One entry in the append-only workflow log, rendered as a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogEntry {
    /// Local timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Step identifier (e.g., `Module M1, Lesson L2, Step 3`).
    pub step: String,
    /// Free-form status (`started`, `completed`, `error`).
    pub status: String,
    /// Human-readable message.
    pub message: String,
}

impl RunLogEntry {
    /// Create an entry stamped with the current local time.
    pub fn now(step: impl Into<String>, status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            step: step.into(),
            status: status.into(),
            message: message.into(),
        }
    }
}
