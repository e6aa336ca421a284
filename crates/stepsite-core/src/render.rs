//! # Render
//!
//! Turns parsed pages into complete HTML documents.
//!
//! Output is a pure function of its input: the same page, navigation and
//! options always produce byte-identical HTML.

use crate::navigation::{LinkStyle, Navigation};
use crate::page::{Document, TutorialPage};
use crate::partials::Segment;
use pulldown_cmark::{Options, Parser};

/// CSS class of the previous control.
pub const PREVIOUS_CLASS: &str = "previous-button";

/// CSS class of the advance control.
pub const ADVANCE_CLASS: &str = "advance-button";

/// Site-wide rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Appended to every `<title>`.
    pub site_title: String,
    pub link_style: LinkStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            site_title: String::from("Tutorial"),
            link_style: LinkStyle::default(),
        }
    }
}

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render author markdown to an HTML fragment.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// The editor partial: literal text shown as a code sample.
#[must_use]
pub fn render_editor(text: &str) -> String {
    format!(
        "<div class=\"editor\"><pre><code>{}</code></pre></div>\n",
        escape_html(text)
    )
}

fn render_navigation(nav: &Navigation) -> String {
    let mut out = String::from("<nav class=\"step-navigation\">\n");
    if let Some(link) = &nav.previous {
        out.push_str(&format!(
            "<a class=\"{PREVIOUS_CLASS}\" href=\"{}\" rel=\"prev\">{}</a>\n",
            escape_html(&link.href),
            escape_html(&link.label)
        ));
    }
    if let Some(link) = &nav.advance {
        out.push_str(&format!(
            "<a class=\"{ADVANCE_CLASS}\" href=\"{}\" rel=\"next\">{}</a>\n",
            escape_html(&link.href),
            escape_html(&link.label)
        ));
    }
    out.push_str("</nav>\n");
    out
}

fn head(title: &str, description: Option<&str>, options: &RenderOptions) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>{} | {}</title>\n",
        escape_html(title),
        escape_html(&options.site_title)
    ));
    if let Some(description) = description {
        out.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(description)
        ));
    }
    out.push_str("</head>\n<body>\n");
    out
}

const FOOT: &str = "</body>\n</html>\n";

/// Render one tutorial step as a complete HTML document.
///
/// The navigation footer always follows the body; a control is present only
/// when `nav` carries a link for it.
#[must_use]
pub fn render_step(page: &TutorialPage, nav: &Navigation, options: &RenderOptions) -> String {
    let front = &page.front;
    let mut out = head(&front.title, Some(&front.description), options);

    out.push_str(&format!(
        "<main class=\"tutorial-step\" data-step=\"{}\" data-total-steps=\"{}\">\n",
        front.step, front.total_steps
    ));
    out.push_str(&format!(
        "<header>\n<h1>{}</h1>\n<p class=\"step-counter\">Step {} of {}</p>\n</header>\n",
        escape_html(&front.title),
        front.step,
        front.total_steps
    ));

    out.push_str("<section class=\"step-body\">\n");
    for segment in &page.body.segments {
        match segment {
            Segment::Markdown(text) => out.push_str(&markdown_to_html(text)),
            Segment::Editor(text) => out.push_str(&render_editor(text)),
        }
    }
    out.push_str("</section>\n");

    out.push_str(&render_navigation(nav));
    out.push_str("</main>\n");
    out.push_str(FOOT);
    out
}

/// Render a standalone document.
#[must_use]
pub fn render_document(doc: &Document, options: &RenderOptions) -> String {
    let mut out = head(&doc.meta.title, doc.meta.description.as_deref(), options);
    out.push_str("<main class=\"document\">\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html(&doc.meta.title)));
    out.push_str(&markdown_to_html(&doc.markdown));
    out.push_str("</main>\n");
    out.push_str(FOOT);
    out
}

/// A page that immediately sends the browser to `href`.
#[must_use]
pub fn render_redirect(href: &str) -> String {
    let href = escape_html(href);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"0; url={href}\">\n\
         <link rel=\"canonical\" href=\"{href}\">\n</head>\n<body>\n\
         <a href=\"{href}\">Start the tutorial</a>\n</body>\n</html>\n"
    )
}

// =============================================================================
// TESTS
// =============================================================================
