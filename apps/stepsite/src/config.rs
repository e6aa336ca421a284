//! # Site Configuration
//!
//! Optional `stepsite.yaml` at the root of the content directory:
//!
//! ```yaml
//! site_title: Try Habitat
//! tutorial_dir: tutorial
//! pages_dir: pages
//! output_dir: build
//! base_path: /try/
//! listen: 127.0.0.1:4567
//! ```
//!
//! Every key has a default. Relative directories are resolved against the
//! content directory. Command-line flags override file values.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use stepsite_core::{LinkStyle, RenderOptions};

/// File name looked up in the content directory.
pub const CONFIG_FILE: &str = "stepsite.yaml";

/// Default preview address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:4567";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Appended to every page `<title>`.
    pub site_title: String,
    /// Directory of step pages.
    pub tutorial_dir: PathBuf,
    /// Directory of standalone documents. May be absent.
    pub pages_dir: PathBuf,
    /// Where `build` writes HTML.
    pub output_dir: PathBuf,
    /// URL prefix the site is served under.
    pub base_path: String,
    /// Preview server address.
    pub listen: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: String::from("Tutorial"),
            tutorial_dir: PathBuf::from("tutorial"),
            pages_dir: PathBuf::from("pages"),
            output_dir: PathBuf::from("build"),
            base_path: String::from("/"),
            listen: String::from(DEFAULT_LISTEN),
        }
    }
}

impl SiteConfig {
    /// Load configuration for `content_dir`.
    ///
    /// An explicit path must exist. Without one, `stepsite.yaml` in the
    /// content directory is used when present, defaults otherwise.
    pub fn load(content_dir: &Path, explicit: Option<&Path>) -> Result<Self, AppError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = content_dir.join(CONFIG_FILE);
                if !candidate.is_file() {
                    tracing::debug!(dir = %content_dir.display(), "no config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
        let config = Self::from_yaml(&text, &path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration text; `path` is only used for error reporting.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, AppError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve a configured directory against the content directory.
    #[must_use]
    pub fn resolve(&self, content_dir: &Path, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            content_dir.join(dir)
        }
    }

    #[must_use]
    pub fn tutorial_path(&self, content_dir: &Path) -> PathBuf {
        self.resolve(content_dir, &self.tutorial_dir)
    }

    #[must_use]
    pub fn pages_path(&self, content_dir: &Path) -> PathBuf {
        self.resolve(content_dir, &self.pages_dir)
    }

    #[must_use]
    pub fn output_path(&self, content_dir: &Path) -> PathBuf {
        self.resolve(content_dir, &self.output_dir)
    }

    #[must_use]
    pub fn link_style(&self) -> LinkStyle {
        LinkStyle::new(&self.base_path)
    }

    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            site_title: self.site_title.clone(),
            link_style: self.link_style(),
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        self.listen
            .parse()
            .map_err(|_| AppError::ListenAddr(self.listen.clone()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
