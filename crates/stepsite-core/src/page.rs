//! # Pages
//!
//! The two kinds of content file: tutorial steps and standalone documents.

use crate::error::ContentError;
use crate::frontmatter::{self, DocumentMeta, FrontMatter};
use crate::navigation::Position;
use crate::partials::{self, Body};
use serde::{Deserialize, Serialize};

/// One step of a tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialPage {
    /// Source file stem; the page is written as `{slug}.html`.
    pub slug: String,
    pub front: FrontMatter,
    pub body: Body,
}

impl TutorialPage {
    /// Parse a step page from its source text.
    pub fn parse(slug: impl Into<String>, source: &str) -> Result<Self, ContentError> {
        let (yaml, body) = frontmatter::split(source)?;
        let front = FrontMatter::parse(yaml)?;
        let first_body_line = frontmatter::front_matter_lines(source, body) + 1;
        let body = partials::scan(body, first_body_line)?;

        Ok(Self {
            slug: slug.into(),
            front,
            body,
        })
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.front.position()
    }

    #[must_use]
    pub fn step(&self) -> u32 {
        self.front.step
    }
}

/// A page outside the tutorial (the Code of Conduct, for instance).
///
/// Documents have no navigation and their body is plain markdown: partial
/// references are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub slug: String,
    pub meta: DocumentMeta,
    pub markdown: String,
}

impl Document {
    /// Parse a document from its source text.
    pub fn parse(slug: impl Into<String>, source: &str) -> Result<Self, ContentError> {
        let (yaml, body) = frontmatter::split(source)?;
        let meta = DocumentMeta::parse(yaml)?;

        Ok(Self {
            slug: slug.into(),
            meta,
            markdown: body.to_string(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
