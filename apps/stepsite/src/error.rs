//! Errors surfaced by the `stepsite` commands.

use std::path::PathBuf;
use stepsite_core::{ContentError, SequenceError};
use thiserror::Error;

/// A content file that failed to parse.
#[derive(Debug)]
pub struct PageFailure {
    pub path: PathBuf,
    pub error: ContentError,
}

fn list_failures(failures: &[PageFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("\n  - {}: {}", f.path.display(), f.error))
        .collect()
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Content {
        path: PathBuf,
        #[source]
        source: ContentError,
    },

    #[error("{} content file(s) failed validation{}", .0.len(), list_failures(.0))]
    Pages(Vec<PageFailure>),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid listen address `{0}`")]
    ListenAddr(String),

    #[error("output file `{0}` would be written by more than one source")]
    SlugCollision(String),

    #[error(
        "refusing to clean {}: it contains {}",
        .out_dir.display(),
        .protected.display()
    )]
    UnsafeClean { out_dir: PathBuf, protected: PathBuf },

    #[error("{0} problem(s) found")]
    CheckFailed(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
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
    fn pages_error_lists_each_failure() {
        let err = AppError::Pages(vec![
            PageFailure {
                path: PathBuf::from("tutorial/step-1.md"),
                error: ContentError::MissingFrontMatter,
            },
            PageFailure {
                path: PathBuf::from("pages/about.md"),
                error: ContentError::MissingField("title"),
            },
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 content file(s) failed validation\n  - tutorial/step-1.md: "));
        assert!(text.contains("\n  - pages/about.md: "));
        assert_eq!(text.lines().count(), 3);
    }
}
