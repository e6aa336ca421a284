//! # CLI Module
//!
//! Command-line interface for stepsite.
//!
//! Each subcommand has a `cmd_*` function so integration tests can drive the
//! commands without spawning a process.

use crate::api;
use crate::config::SiteConfig;
use crate::error::AppError;
use crate::site::{self, BuildReport, load_site, write_site};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stepsite_core::{Navigation, TutorialPage, render_step};

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "stepsite")]
#[command(version, about = "Validate and render step-by-step tutorial sites")]
pub struct Cli {
    /// Content directory (holds tutorial/, pages/ and stepsite.yaml)
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub content: PathBuf,

    /// Config file (defaults to <content>/stepsite.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate front-matter, partials and the step sequence
    Check {
        #[arg(long)]
        json: bool,
    },

    /// Validate and write the rendered site
    Build {
        /// Output directory (overrides output_dir from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Remove the output directory before writing
        #[arg(long)]
        clean: bool,
    },

    /// Render a single step page to stdout
    Render {
        file: PathBuf,

        /// Print the parsed page and navigation as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// List the tutorial steps in order
    List {
        #[arg(long)]
        json: bool,
    },

    /// Serve the rendered site for local preview
    Serve {
        /// Listen address (overrides listen from config)
        #[arg(short, long)]
        listen: Option<String>,
    },
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let content = cli.content.as_path();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Check { json } => cmd_check(content, config, json),
        Commands::Build { output, clean } => {
            cmd_build(content, config, output.as_deref(), clean).map(|_| ())
        }
        Commands::Render { file, json } => cmd_render(content, config, &file, json),
        Commands::List { json } => cmd_list(content, config, json),
        Commands::Serve { listen } => cmd_serve(content, config, listen).await,
    }
}

// =============================================================================
// CHECK
// =============================================================================

/// Result of validating a content directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub steps: usize,
    pub documents: usize,
    pub problems: Vec<String>,
}

impl CheckReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Validate without rendering. Content problems land in the report;
/// anything else (unreadable directory, bad config) is an error.
pub fn check_report(content: &Path, config_path: Option<&Path>) -> Result<CheckReport, AppError> {
    let config = SiteConfig::load(content, config_path)?;

    match load_site(content, &config) {
        Ok(site) => Ok(CheckReport {
            steps: site.sequence.len(),
            documents: site.documents.len(),
            problems: Vec::new(),
        }),
        Err(AppError::Pages(failures)) => Ok(CheckReport {
            problems: failures
                .iter()
                .map(|f| format!("{}: {}", f.path.display(), f.error))
                .collect(),
            ..CheckReport::default()
        }),
        Err(AppError::Sequence(err)) => Ok(CheckReport {
            problems: err.violations.iter().map(|v| v.to_string()).collect(),
            ..CheckReport::default()
        }),
        Err(err @ AppError::SlugCollision(_)) => Ok(CheckReport {
            problems: vec![err.to_string()],
            ..CheckReport::default()
        }),
        Err(other) => Err(other),
    }
}

pub fn cmd_check(content: &Path, config_path: Option<&Path>, json: bool) -> Result<(), AppError> {
    let report = check_report(content, config_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_ok() {
        println!(
            "OK: {} step(s), {} document(s)",
            report.steps, report.documents
        );
    } else {
        for problem in &report.problems {
            println!("error: {problem}");
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(AppError::CheckFailed(report.problems.len()))
    }
}

// =============================================================================
// BUILD
// =============================================================================

pub fn cmd_build(
    content: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
    clean: bool,
) -> Result<BuildReport, AppError> {
    let config = SiteConfig::load(content, config_path)?;
    let site = load_site(content, &config)?;
    let rendered = site.render(&config.render_options())?;

    let out_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_path(content));
    let protected = [
        content.to_path_buf(),
        config.tutorial_path(content),
        config.pages_path(content),
    ];
    let report = write_site(&rendered, &out_dir, clean, &protected)?;

    tracing::info!(
        dir = %report.output_dir.display(),
        files = report.files_written,
        "build complete"
    );
    println!(
        "Wrote {} file(s) to {}",
        report.files_written,
        report.output_dir.display()
    );
    Ok(report)
}

// =============================================================================
// RENDER
// =============================================================================

/// Parse `file` as a step page and build its standalone navigation.
pub fn standalone_page(
    content: &Path,
    config_path: Option<&Path>,
    file: &Path,
) -> Result<(TutorialPage, Navigation, SiteConfig), AppError> {
    let config = SiteConfig::load(content, config_path)?;
    let page = site::read_step_page(file)?;
    let nav = Navigation::standalone(page.position(), &page.body.buttons, &config.link_style());
    Ok((page, nav, config))
}

/// Render one step page in isolation.
pub fn render_file(
    content: &Path,
    config_path: Option<&Path>,
    file: &Path,
) -> Result<String, AppError> {
    let (page, nav, config) = standalone_page(content, config_path, file)?;
    Ok(render_step(&page, &nav, &config.render_options()))
}

#[derive(Serialize)]
struct RenderedPageJson<'a> {
    page: &'a TutorialPage,
    navigation: &'a Navigation,
}

pub fn cmd_render(
    content: &Path,
    config_path: Option<&Path>,
    file: &Path,
    json: bool,
) -> Result<(), AppError> {
    if json {
        let (page, navigation, _) = standalone_page(content, config_path, file)?;
        let value = RenderedPageJson {
            page: &page,
            navigation: &navigation,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render_file(content, config_path, file)?);
    }
    Ok(())
}

// =============================================================================
// LIST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub step: u32,
    pub slug: String,
    pub title: String,
}

pub fn list_steps(content: &Path, config_path: Option<&Path>) -> Result<Vec<StepSummary>, AppError> {
    let config = SiteConfig::load(content, config_path)?;
    let site = load_site(content, &config)?;
    Ok(site
        .sequence
        .pages()
        .map(|page| StepSummary {
            step: page.step(),
            slug: page.slug.clone(),
            title: page.front.title.clone(),
        })
        .collect())
}

pub fn cmd_list(content: &Path, config_path: Option<&Path>, json: bool) -> Result<(), AppError> {
    let steps = list_steps(content, config_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    let total = steps.len();
    for summary in &steps {
        println!(
            "{:>3}/{:<3} {:<28} {}",
            summary.step, total, summary.slug, summary.title
        );
    }
    Ok(())
}

// =============================================================================
// SERVE
// =============================================================================

pub async fn cmd_serve(
    content: &Path,
    config_path: Option<&Path>,
    listen: Option<String>,
) -> Result<(), AppError> {
    let mut config = SiteConfig::load(content, config_path)?;
    if let Some(listen) = listen {
        config.listen = listen;
    }
    let addr = config.listen_addr()?;

    let site = load_site(content, &config)?;
    let rendered = site.render(&config.render_options())?;
    if let Some(href) = rendered.start_href() {
        println!("Preview at http://{addr}{href}");
    }

    api::serve(addr, Arc::new(rendered)).await
}
