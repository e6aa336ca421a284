//! # Site
//!
//! File I/O around `stepsite-core`: reading a content directory into a
//! validated [`Site`], rendering it, and writing the output directory.

use crate::config::SiteConfig;
use crate::error::{AppError, PageFailure};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use stepsite_core::{
    Document, LinkStyle, RenderOptions, TutorialPage, TutorialSequence, render_document,
    render_redirect,
};

/// Output file that redirects to the first step.
pub const INDEX_FILE: &str = "index.html";

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

// =============================================================================
// LOADING
// =============================================================================

/// A fully validated content directory.
#[derive(Debug, Clone)]
pub struct Site {
    pub sequence: TutorialSequence,
    pub documents: Vec<Document>,
}

/// Page slug: the file stem.
#[must_use]
pub fn slug_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Markdown files directly inside `dir`, sorted by name.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir).map_err(|e| AppError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AppError::io(dir, e))?.path();
        let is_markdown = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext));
        if is_markdown && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read and parse a single step page.
pub fn read_step_page(path: &Path) -> Result<TutorialPage, AppError> {
    let source = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    TutorialPage::parse(slug_of(path), &source).map_err(|source| AppError::Content {
        path: path.to_path_buf(),
        source,
    })
}

fn read_document(path: &Path) -> Result<Document, AppError> {
    let source = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Document::parse(slug_of(path), &source).map_err(|source| AppError::Content {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse every file with `read`, collecting all content failures.
fn read_all<T>(
    files: &[PathBuf],
    read: fn(&Path) -> Result<T, AppError>,
    failures: &mut Vec<PageFailure>,
) -> Result<Vec<T>, AppError> {
    let mut parsed = Vec::with_capacity(files.len());
    for path in files {
        match read(path) {
            Ok(item) => {
                tracing::debug!(path = %path.display(), "parsed");
                parsed.push(item);
            }
            Err(AppError::Content { path, source }) => failures.push(PageFailure {
                path,
                error: source,
            }),
            Err(other) => return Err(other),
        }
    }
    Ok(parsed)
}

/// Every step, every document and the index redirect must map to a
/// distinct output file.
fn check_output_names(
    sequence: &TutorialSequence,
    documents: &[Document],
) -> Result<(), AppError> {
    let mut seen = BTreeSet::from([INDEX_FILE.to_string()]);
    let slugs = sequence
        .pages()
        .map(|page| page.slug.as_str())
        .chain(documents.iter().map(|doc| doc.slug.as_str()));
    for slug in slugs {
        let name = format!("{slug}.html");
        if !seen.insert(name.clone()) {
            return Err(AppError::SlugCollision(name));
        }
    }
    Ok(())
}

/// Load and validate a content directory.
///
/// Every malformed file is reported at once; the sequence is validated only
/// when all files parse.
pub fn load_site(content_dir: &Path, config: &SiteConfig) -> Result<Site, AppError> {
    let tutorial_dir = config.tutorial_path(content_dir);
    let pages_dir = config.pages_path(content_dir);

    let step_files = markdown_files(&tutorial_dir)?;
    let document_files = if pages_dir.is_dir() {
        markdown_files(&pages_dir)?
    } else {
        tracing::debug!(dir = %pages_dir.display(), "no documents directory");
        Vec::new()
    };

    let mut failures = Vec::new();
    let pages = read_all(&step_files, read_step_page, &mut failures)?;
    let documents = read_all(&document_files, read_document, &mut failures)?;
    if !failures.is_empty() {
        return Err(AppError::Pages(failures));
    }

    let sequence = TutorialSequence::from_pages(pages)?;
    check_output_names(&sequence, &documents)?;
    tracing::info!(
        steps = sequence.len(),
        documents = documents.len(),
        "content validated"
    );

    Ok(Site {
        sequence,
        documents,
    })
}

// =============================================================================
// RENDERING
// =============================================================================

/// Rendered output, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct RenderedSite {
    files: BTreeMap<String, String>,
    link_style: LinkStyle,
    start_href: Option<String>,
}

impl RenderedSite {
    /// HTML of an output file, e.g. `configuration-updates.html`.
    #[must_use]
    pub fn get(&self, file: &str) -> Option<&str> {
        self.files.get(file).map(String::as_str)
    }

    /// Output file names in sorted order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        self.link_style.base_path()
    }

    /// Href of step 1.
    #[must_use]
    pub fn start_href(&self) -> Option<&str> {
        self.start_href.as_deref()
    }
}

impl Site {
    /// Render every step, every document and the index redirect.
    pub fn render(&self, options: &RenderOptions) -> Result<RenderedSite, AppError> {
        let mut files = BTreeMap::new();
        let mut insert = |name: String, html: String| -> Result<(), AppError> {
            if files.insert(name.clone(), html).is_some() {
                return Err(AppError::SlugCollision(name));
            }
            Ok(())
        };

        for (slug, html) in self.sequence.render_all(options) {
            insert(format!("{slug}.html"), html)?;
        }
        for doc in &self.documents {
            insert(format!("{}.html", doc.slug), render_document(doc, options))?;
        }

        let start_href = self
            .sequence
            .first()
            .map(|page| options.link_style.href(&page.slug));
        if let Some(href) = &start_href {
            insert(INDEX_FILE.to_string(), render_redirect(href))?;
        }

        Ok(RenderedSite {
            files,
            link_style: options.link_style.clone(),
            start_href,
        })
    }
}

/// Summary of a `build` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub files_written: usize,
}

/// Refuse to delete `out_dir` when it is, or contains, any of `protected`.
///
/// Paths that do not exist cannot be lost and are skipped.
pub fn ensure_safe_to_clean(out_dir: &Path, protected: &[PathBuf]) -> Result<(), AppError> {
    let Ok(out_canonical) = out_dir.canonicalize() else {
        return Ok(());
    };
    for path in protected {
        let Ok(canonical) = path.canonicalize() else {
            continue;
        };
        if canonical.starts_with(&out_canonical) {
            return Err(AppError::UnsafeClean {
                out_dir: out_dir.to_path_buf(),
                protected: path.clone(),
            });
        }
    }
    Ok(())
}

/// Write rendered files to `out_dir`.
///
/// With `clean`, the directory is removed first unless it holds one of the
/// `protected` paths (content sources).
pub fn write_site(
    rendered: &RenderedSite,
    out_dir: &Path,
    clean: bool,
    protected: &[PathBuf],
) -> Result<BuildReport, AppError> {
    if clean && out_dir.exists() {
        ensure_safe_to_clean(out_dir, protected)?;
        tracing::info!(dir = %out_dir.display(), "cleaning output directory");
        std::fs::remove_dir_all(out_dir).map_err(|e| AppError::io(out_dir, e))?;
    }
    std::fs::create_dir_all(out_dir).map_err(|e| AppError::io(out_dir, e))?;

    for (name, html) in &rendered.files {
        let path = out_dir.join(name);
        std::fs::write(&path, html).map_err(|e| AppError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = html.len(), "wrote");
    }

    Ok(BuildReport {
        output_dir: out_dir.to_path_buf(),
        files_written: rendered.files.len(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_file_stem() {
        assert_eq!(slug_of(Path::new("/x/tutorial/step-4.md")), "step-4");
        assert_eq!(slug_of(Path::new("code-of-conduct.markdown")), "code-of-conduct");
    }

    #[test]
    fn document_named_like_a_step_collides() {
        let step = TutorialPage::parse(
            "intro",
            "---\ntitle: a\ndescription: b\nstep: 1\ntotal_steps: 1\n---\n",
        )
        .unwrap();
        let doc = Document::parse("intro", "---\ntitle: Intro\n---\n").unwrap();
        let site = Site {
            sequence: TutorialSequence::from_pages(vec![step]).unwrap(),
            documents: vec![doc],
        };
        let result = site.render(&RenderOptions::default());
        assert!(matches!(result, Err(AppError::SlugCollision(name)) if name == "intro.html"));
    }

    #[test]
    fn step_named_index_collides_with_redirect() {
        let step = TutorialPage::parse(
            "index",
            "---\ntitle: a\ndescription: b\nstep: 1\ntotal_steps: 1\n---\n",
        )
        .unwrap();
        let sequence = TutorialSequence::from_pages(vec![step]).unwrap();
        let result = check_output_names(&sequence, &[]);
        assert!(matches!(result, Err(AppError::SlugCollision(name)) if name == INDEX_FILE));
    }

    #[test]
    fn clean_refuses_parent_of_protected_dir() {
        let temp = tempfile::tempdir().unwrap();
        let content = temp.path().join("site");
        let tutorial = content.join("tutorial");
        std::fs::create_dir_all(&tutorial).unwrap();
        let protected = vec![content.clone(), tutorial];

        assert!(matches!(
            ensure_safe_to_clean(temp.path(), &protected),
            Err(AppError::UnsafeClean { .. })
        ));
        assert!(matches!(
            ensure_safe_to_clean(&content, &protected),
            Err(AppError::UnsafeClean { .. })
        ));
        assert!(ensure_safe_to_clean(&content.join("public"), &protected).is_ok());
        std::fs::create_dir_all(content.join("public")).unwrap();
        assert!(ensure_safe_to_clean(&content.join("public"), &protected).is_ok());
    }
}
