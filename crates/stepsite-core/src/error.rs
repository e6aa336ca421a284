//! # Error Types
//!
//! Build-time validation errors for tutorial content.
//!
//! There is no runtime error path in a rendered site: everything that can go
//! wrong is caught here, while content is loaded, and reported with enough
//! context for an author to fix the source file.

use thiserror::Error;

/// Errors raised while parsing a single content file.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The file does not open with a `---` fence.
    #[error("missing front-matter: the first line must be `---`")]
    MissingFrontMatter,

    /// The opening fence has no matching closing `---` line.
    #[error("unterminated front-matter: no closing `---` line")]
    UnterminatedFrontMatter,

    /// A required key is absent (or empty, for string keys).
    #[error("missing required front-matter field `{0}`")]
    MissingField(&'static str),

    /// `step` or `total_steps` violates `1 <= step <= total_steps`.
    #[error("invalid step {step}: must satisfy 1 <= step <= total_steps ({total_steps})")]
    InvalidStep { step: u32, total_steps: u32 },

    /// The front-matter block is not valid YAML for the schema.
    #[error("malformed front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A partial reference in the body is malformed.
    #[error("line {line}: {kind}")]
    Partial { line: usize, kind: PartialError },
}

/// Ways a partial reference can be misused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartialError {
    #[error("unterminated partial tag (missing `}}}}`)")]
    UnterminatedTag,

    #[error("`{{{{#{0}}}}}` is never closed")]
    UnclosedBlock(String),

    #[error("closing tag `{{{{/{0}}}}}` has no matching opening tag")]
    StrayClose(String),

    #[error("unknown partial `{0}`")]
    UnknownPartial(String),

    #[error("partial `{0}` requires a label=\"...\" argument")]
    MissingLabel(String),

    #[error("partial `{0}` is used more than once on the same page")]
    Duplicate(String),
}
