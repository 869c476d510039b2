//! Error types for CourseForge.
//!
//! Library crates use [`CourseForgeError`] via `thiserror`.
//! App crates (cli) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all CourseForge operations.
#[derive(Debug, thiserror::Error)]
pub enum CourseForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A referenced input path does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Structurally invalid input (empty outline, missing required columns).
    #[error("format error: {message}")]
    Format { message: String },

    /// Attempted to persist blank content.
    #[error("no content provided to save")]
    EmptyContent,

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Content generator failure crossing the generator seam.
    #[error("generation error: {0}")]
    Generation(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CourseForgeError>;

impl CourseForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a format error from any displayable message.
    pub fn format_error(msg: impl Into<String>) -> Self {
        Self::Format {
            message: msg.into(),
        }
    }

    /// Create a not-found error for a path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CourseForgeError::config("missing output directory");
        assert_eq!(err.to_string(), "config error: missing output directory");

        let err = CourseForgeError::format_error("missing required columns: Module, Lesson");
        assert!(err.to_string().contains("Module, Lesson"));

        let err = CourseForgeError::EmptyContent;
        assert_eq!(err.to_string(), "no content provided to save");
    }

    #[test]
    fn not_found_includes_path() {
        let err = CourseForgeError::not_found("/tmp/missing_outline.csv");
        assert!(err.to_string().contains("missing_outline.csv"));
    }
}
