//! # stepsite-core
//!
//! The logic behind step-sequenced tutorial sites.
//!
//! A tutorial is a fixed, linear run of pages. Each page carries YAML
//! front-matter (`title`, `description`, `step`, `total_steps`) and a
//! markdown body that may reference three partials: an editor block for a
//! code sample, and labels for the previous/advance buttons.
//!
//! ```text
//! source text ──► frontmatter::split ──► FrontMatter::parse
//!                          │
//!                          └──────────► partials::scan ──► TutorialPage
//!
//! Vec<TutorialPage> ──► TutorialSequence::from_pages ──► render_all ──► HTML
//! ```
//!
//! This crate does no I/O. Reading the content directory and writing the
//! output belongs to the `stepsite` binary.

pub mod error;
pub mod frontmatter;
pub mod navigation;
pub mod page;
pub mod partials;
pub mod render;
pub mod sequence;

pub use error::{ContentError, PartialError};
pub use frontmatter::{DocumentMeta, FrontMatter};
pub use navigation::{Link, LinkStyle, Navigation, Position};
pub use page::{Document, TutorialPage};
pub use partials::{Body, ButtonLabels, Segment};
pub use render::{RenderOptions, render_document, render_redirect, render_step};
pub use sequence::{SequenceError, TutorialSequence, Violation};
