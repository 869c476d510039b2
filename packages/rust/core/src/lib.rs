//! Core pipeline for CourseForge: variable resolution, output planning,
//! prompt templates, adjacent-step context, the generator seam, and the
//! batch run loop.

pub mod context;
pub mod generator;
pub mod pipeline;
pub mod planner;
pub mod resolver;
pub mod template;

pub use generator::{ContentGenerator, DraftGenerator, GenerationRequest};
pub use pipeline::{ProgressReporter, RunConfig, RunReport, SilentProgress, run_batch};
pub use planner::plan;
pub use resolver::resolve;
pub use template::{TemplateLibrary, fill_template};
