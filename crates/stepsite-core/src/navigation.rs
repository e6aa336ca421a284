//! # Navigation
//!
//! Linear position within a tutorial and the previous/advance links derived
//! from it. The only "state machine" in a tutorial is the step number inside
//! `[1, total_steps]`; transitions are static links fixed at build time.

use crate::error::ContentError;
use crate::partials::ButtonLabels;
use serde::{Deserialize, Serialize};

/// Link text used when a page does not supply its own label.
pub const DEFAULT_PREVIOUS_LABEL: &str = "Previous";

/// Link text used when a page does not supply its own label.
pub const DEFAULT_ADVANCE_LABEL: &str = "Next";

// =============================================================================
// POSITION
// =============================================================================

/// A validated `step` within `1..=total_steps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    step: u32,
    total_steps: u32,
}

impl Position {
    /// Create a position, enforcing `1 <= step <= total_steps`.
    pub fn new(step: u32, total_steps: u32) -> Result<Self, ContentError> {
        if step == 0 || total_steps == 0 || step > total_steps {
            return Err(ContentError::InvalidStep { step, total_steps });
        }
        Ok(Self { step, total_steps })
    }

    /// Only for values already checked by [`Position::new`].
    pub(crate) fn from_validated(step: u32, total_steps: u32) -> Self {
        Self { step, total_steps }
    }

    #[must_use]
    pub fn step(&self) -> u32 {
        self.step
    }

    #[must_use]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// True for step 1, which has no previous control.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.step == 1
    }

    /// True for the final step, which has no advance control.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.step == self.total_steps
    }

    /// The preceding step, if any.
    #[must_use]
    pub fn previous(&self) -> Option<u32> {
        (!self.is_first()).then(|| self.step - 1)
    }

    /// The following step, if any.
    #[must_use]
    pub fn next(&self) -> Option<u32> {
        (!self.is_last()).then(|| self.step + 1)
    }
}

// =============================================================================
// LINKS
// =============================================================================

/// How output pages are addressed.
///
/// Every page is written as `{slug}.html`; `base_path` is the URL prefix the
/// site is served under and always starts and ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStyle {
    base_path: String,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self::new("/")
    }
}

impl LinkStyle {
    /// Create a link style, normalising `base_path` to `/.../`.
    #[must_use]
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_matches('/');
        let base_path = if trimmed.is_empty() {
            String::from("/")
        } else {
            format!("/{trimmed}/")
        };
        Self { base_path }
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Href of the page with the given slug.
    #[must_use]
    pub fn href(&self, slug: &str) -> String {
        format!("{}{}.html", self.base_path, slug)
    }

    /// Href of a step when only its number is known.
    ///
    /// Used when rendering a single page outside of its sequence, where
    /// neighbours are assumed to follow the `step-{n}` naming convention.
    #[must_use]
    pub fn standalone_href(&self, step: u32) -> String {
        self.href(&format!("step-{step}"))
    }
}

/// A navigation control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub label: String,
}

/// The previous/advance controls of one page.
///
/// `previous` is `None` on the first step and `advance` is `None` on the last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub previous: Option<Link>,
    pub advance: Option<Link>,
}

impl Navigation {
    /// Build navigation for `position`.
    ///
    /// `href_for` maps a neighbouring step number to its href; a neighbour
    /// it cannot resolve gets no control. Labels come from the page's button
    /// partials, falling back to the defaults.
    pub fn build<F>(position: Position, labels: &ButtonLabels, href_for: F) -> Self
    where
        F: Fn(u32) -> Option<String>,
    {
        let previous = position.previous().and_then(|step| {
            href_for(step).map(|href| Link {
                href,
                label: labels
                    .previous
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PREVIOUS_LABEL.to_string()),
            })
        });

        let advance = position.next().and_then(|step| {
            href_for(step).map(|href| Link {
                href,
                label: labels
                    .advance
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ADVANCE_LABEL.to_string()),
            })
        });

        Self { previous, advance }
    }

    /// Navigation for a page rendered outside of its sequence.
    #[must_use]
    pub fn standalone(position: Position, labels: &ButtonLabels, style: &LinkStyle) -> Self {
        Self::build(position, labels, |step| Some(style.standalone_href(step)))
    }
}

// =============================================================================
// TESTS
// =============================================================================
