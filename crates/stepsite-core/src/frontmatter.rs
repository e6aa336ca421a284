//! # Front-matter
//!
//! The metadata block that precedes every content file:
//!
//! ```text
//! ---
//! title: Configuration Updates
//! description: Change a running service's configuration
//! step: 4
//! total_steps: 7
//! ---
//! body...
//! ```
//!
//! The block is YAML. Keys other than the ones below are ignored so that a
//! file can carry layout hints for other tools.

use crate::error::ContentError;
use crate::navigation::Position;
use serde::{Deserialize, Serialize};

/// Fence line that opens and closes the block.
pub const FENCE: &str = "---";

/// Split a source file into its YAML block and its body.
///
/// The first line must be the fence; the block ends at the next line that
/// is exactly the fence (trailing whitespace allowed). A UTF-8 BOM is
/// skipped.
pub fn split(source: &str) -> Result<(&str, &str), ContentError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');

    let first = lines.next().ok_or(ContentError::MissingFrontMatter)?;
    if first.trim_end() != FENCE {
        return Err(ContentError::MissingFrontMatter);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == FENCE {
            let yaml = &source[start..offset];
            let body = &source[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(ContentError::UnterminatedFrontMatter)
}

/// Number of source lines consumed by the front-matter block, fences included.
///
/// Body line `n` (1-based) is source line `n + front_matter_lines(..)`.
pub fn front_matter_lines(source: &str, body: &str) -> usize {
    let head_len = source.len().saturating_sub(body.len());
    source[..head_len].matches('\n').count()
}

// =============================================================================
// STEP PAGE METADATA
// =============================================================================

/// As written by the author; every key optional so absence can be reported
/// by name rather than as a generic YAML error.
#[derive(Debug, Default, Deserialize)]
struct RawStepMeta {
    title: Option<String>,
    description: Option<String>,
    step: Option<u32>,
    total_steps: Option<u32>,
}

/// Validated metadata of a tutorial step page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Human-readable page title.
    pub title: String,
    /// Human-readable summary, used for the `description` meta tag.
    pub description: String,
    /// 1-based position in the sequence.
    pub step: u32,
    /// Length of the sequence; identical on every page.
    pub total_steps: u32,
}

impl FrontMatter {
    /// Build validated metadata.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        step: u32,
        total_steps: u32,
    ) -> Result<Self, ContentError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ContentError::MissingField("title"));
        }
        Position::new(step, total_steps)?;

        Ok(Self {
            title,
            description: description.into(),
            step,
            total_steps,
        })
    }

    /// Parse and validate the YAML block of a step page.
    pub fn parse(yaml: &str) -> Result<Self, ContentError> {
        let raw: RawStepMeta = if yaml.trim().is_empty() {
            RawStepMeta::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        let title = raw.title.ok_or(ContentError::MissingField("title"))?;
        let description = raw
            .description
            .ok_or(ContentError::MissingField("description"))?;
        let step = raw.step.ok_or(ContentError::MissingField("step"))?;
        let total_steps = raw
            .total_steps
            .ok_or(ContentError::MissingField("total_steps"))?;

        Self::new(title, description, step, total_steps)
    }

    /// Position of this page in its sequence.
    #[must_use]
    pub fn position(&self) -> Position {
        Position::from_validated(self.step, self.total_steps)
    }
}

// =============================================================================
// DOCUMENT METADATA
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawDocumentMeta {
    title: Option<String>,
    description: Option<String>,
}

/// Metadata of a standalone document (policy pages and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub title: String,
    pub description: Option<String>,
}

impl DocumentMeta {
    /// Parse the YAML block of a document. Only `title` is required.
    pub fn parse(yaml: &str) -> Result<Self, ContentError> {
        let raw: RawDocumentMeta = if yaml.trim().is_empty() {
            RawDocumentMeta::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ContentError::MissingField("title"))?;

        Ok(Self {
            title,
            description: raw.description,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
