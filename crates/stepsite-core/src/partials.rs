//! # Partials
//!
//! Scans a step page body for references to the three reusable fragments a
//! tutorial page may include:
//!
//! ```text
//! {{#partials/editor}}
//! [server]
//! tcp-backlog = 128
//! {{/partials/editor}}
//!
//! {{> partials/previous_button label="Back"}}
//! {{> partials/advance_button label="Apply the change"}}
//! ```
//!
//! The editor block is kept verbatim and displayed as a code sample. Button
//! references only carry a label; the controls themselves are placed by the
//! renderer according to the page position.
//!
//! Any `{{ ... }}` whose name does not start with `partials/` is plain text.
//! Tutorials about configuration templating quote such tags all the time.

use crate::error::{ContentError, PartialError};
use serde::{Deserialize, Serialize};

/// Block partial showing literal text as a code sample.
pub const EDITOR: &str = "partials/editor";

/// Inline partial labelling the "advance" control.
pub const ADVANCE_BUTTON: &str = "partials/advance_button";

/// Inline partial labelling the "previous" control.
pub const PREVIOUS_BUTTON: &str = "partials/previous_button";

const PARTIAL_PREFIX: &str = "partials/";
const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A piece of page body, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Author prose, rendered as markdown.
    Markdown(String),
    /// Literal text for the editor partial.
    Editor(String),
}

/// Labels supplied by button partials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLabels {
    pub previous: Option<String>,
    pub advance: Option<String>,
}

/// A scanned page body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub segments: Vec<Segment>,
    pub buttons: ButtonLabels,
}

impl Body {
    /// All editor snippets on the page, in order.
    pub fn editor_snippets(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Editor(text) => Some(text.as_str()),
            Segment::Markdown(_) => None,
        })
    }
}

/// Parsed `{{ ... }}` directive.
enum Directive<'a> {
    Block(&'a str),
    Inline { name: &'a str, args: &'a str },
    Close(&'a str),
}

/// Classify the inside of a tag. `None` means "not a partial, keep as text".
fn classify(inner: &str) -> Option<Directive<'_>> {
    let inner = inner.trim();
    let mut chars = inner.chars();
    let sigil = chars.next()?;
    let rest = chars.as_str().trim_start();
    if !rest.starts_with(PARTIAL_PREFIX) {
        return None;
    }

    match sigil {
        '#' => Some(Directive::Block(rest.trim_end())),
        '/' => Some(Directive::Close(rest.trim_end())),
        '>' => {
            let (name, args) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            Some(Directive::Inline {
                name,
                args: args.trim(),
            })
        }
        _ => None,
    }
}

/// True when the text right after `{{` names a partial.
fn looks_like_partial(after_open: &str) -> bool {
    let trimmed = after_open.trim_start();
    let mut chars = trimmed.chars();
    matches!(chars.next(), Some('#' | '/' | '>'))
        && chars.as_str().trim_start().starts_with(PARTIAL_PREFIX)
}

/// Extract the value of `label="..."` (or single-quoted).
fn parse_label(args: &str) -> Option<String> {
    let value = args.strip_prefix("label")?.trim_start().strip_prefix('=')?;
    let value = value.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &value[quote.len_utf8()..];
    let end = rest.find(quote)?;
    if !rest[end + quote.len_utf8()..].trim().is_empty() {
        return None;
    }
    Some(rest[..end].to_string())
}

/// Drop whitespace-only lines at both ends, keep everything in between.
fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    lines[start..end.max(start)].join("\n")
}

/// Find the tag closing block `name` at or after `from`, accepting the same
/// whitespace variants as opening tags. Returns the tag's start and end.
fn find_block_close(body: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut cursor = from;
    while let Some(found) = body[cursor..].find(OPEN) {
        let start = cursor + found;
        let after_open = &body[start + OPEN.len()..];
        let close_rel = after_open.find(CLOSE)?;
        if let Some(Directive::Close(closed)) = classify(&after_open[..close_rel]) {
            if closed == name {
                return Some((start, start + OPEN.len() + close_rel + CLOSE.len()));
            }
        }
        cursor = start + OPEN.len();
    }
    None
}

fn line_of(body: &str, offset: usize, first_line: usize) -> usize {
    first_line + body[..offset].matches('\n').count()
}

fn partial_error(body: &str, offset: usize, first_line: usize, kind: PartialError) -> ContentError {
    ContentError::Partial {
        line: line_of(body, offset, first_line),
        kind,
    }
}

/// Scan a page body.
///
/// `first_line` is the source line number of the first body line, so errors
/// point at the right place in the file.
pub fn scan(body: &str, first_line: usize) -> Result<Body, ContentError> {
    let mut segments = Vec::new();
    let mut buttons = ButtonLabels::default();
    let mut prose = String::new();
    let mut cursor = 0;

    while let Some(found) = body[cursor..].find(OPEN) {
        let tag_start = cursor + found;
        let after_open = &body[tag_start + OPEN.len()..];

        if !looks_like_partial(after_open) {
            prose.push_str(&body[cursor..tag_start + OPEN.len()]);
            cursor = tag_start + OPEN.len();
            continue;
        }

        let Some(close_rel) = after_open.find(CLOSE) else {
            return Err(partial_error(body, tag_start, first_line, PartialError::UnterminatedTag));
        };
        let tag_end = tag_start + OPEN.len() + close_rel + CLOSE.len();
        let inner = &after_open[..close_rel];

        prose.push_str(&body[cursor..tag_start]);
        cursor = tag_end;

        match classify(inner) {
            Some(Directive::Block(name)) => {
                if name != EDITOR {
                    return Err(partial_error(
                        body,
                        tag_start,
                        first_line,
                        PartialError::UnknownPartial(name.to_string()),
                    ));
                }
                let Some((close_start, close_end)) = find_block_close(body, tag_end, EDITOR) else {
                    return Err(partial_error(
                        body,
                        tag_start,
                        first_line,
                        PartialError::UnclosedBlock(name.to_string()),
                    ));
                };

                if !prose.trim().is_empty() {
                    segments.push(Segment::Markdown(std::mem::take(&mut prose)));
                } else {
                    prose.clear();
                }
                let literal = &body[tag_end..close_start];
                segments.push(Segment::Editor(trim_blank_lines(literal)));
                cursor = close_end;
            }
            Some(Directive::Inline { name, args }) => {
                let slot = match name {
                    ADVANCE_BUTTON => &mut buttons.advance,
                    PREVIOUS_BUTTON => &mut buttons.previous,
                    _ => {
                        return Err(partial_error(
                            body,
                            tag_start,
                            first_line,
                            PartialError::UnknownPartial(name.to_string()),
                        ));
                    }
                };
                if slot.is_some() {
                    return Err(partial_error(
                        body,
                        tag_start,
                        first_line,
                        PartialError::Duplicate(name.to_string()),
                    ));
                }
                let label = parse_label(args).ok_or_else(|| {
                    partial_error(
                        body,
                        tag_start,
                        first_line,
                        PartialError::MissingLabel(name.to_string()),
                    )
                })?;
                *slot = Some(label);
            }
            Some(Directive::Close(name)) => {
                return Err(partial_error(
                    body,
                    tag_start,
                    first_line,
                    PartialError::StrayClose(name.to_string()),
                ));
            }
            None => prose.push_str(&body[tag_start..tag_end]),
        }
    }

    prose.push_str(&body[cursor..]);
    if !prose.trim().is_empty() {
        segments.push(Segment::Markdown(prose));
    }

    Ok(Body { segments, buttons })
}

// =============================================================================
// TESTS
// =============================================================================
