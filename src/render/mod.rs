//! HTML output with Tera.
//!
//! A page is the [`PAGE_TEMPLATE`] (or a user-supplied replacement) rendered
//! with this context:
//!
//! | Variable  | Content                                              |
//! |-----------|------------------------------------------------------|
//! | `title`   | page title                                           |
//! | `now`     | generation timestamp, `YYYY.MM.DD HH:MM:SS`          |
//! | `dotdata` | the graph in DOT, as a JavaScript string literal     |
//! | `notes`   | optional text shown above the graph                  |
//! | `nav`     | links to the sibling pages of the same tag           |
//! | `nav2`    | links to the other tags                              |
//! | `viz_js`  | `src` of the script that lays out and draws the DOT  |
//!
//! Autoescaping is on; `dotdata` is already a JSON string and must be used
//! with `| safe`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};
use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::core::HeatVizError;
use crate::graph::Graph;
use crate::graph::dot::to_dot;

/// The built-in page template.
pub const PAGE_TEMPLATE: &str = include_str!("page.html");

const PAGE: &str = "page.html";

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub url: String,
    pub label: String,
}

impl NavLink {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

/// Everything one page shows.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub graph: &'a Graph,
    pub notes: Option<&'a str>,
    pub nav: &'a [NavLink],
    pub nav2: &'a [NavLink],
}

/// Renders graphs into HTML pages.
///
/// The timestamp is taken once, so every page of a run shows the same time.
pub struct PageRenderer {
    tera: Tera,
    now: String,
    viz_js: String,
}

impl PageRenderer {
    /// Renderer for the configured template, or the built-in one.
    ///
    /// # Errors
    ///
    /// Fails if the custom template cannot be read or does not compile.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        match &config.template {
            Some(path) => {
                let template = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read page template {}", path.display())
                })?;
                debug!("Using page template {}", path.display());
                Ok(Self::from_template(&template, &config.viz_js)?)
            }
            None => Ok(Self::from_template(PAGE_TEMPLATE, &config.viz_js)?),
        }
    }

    /// Renderer for template text.
    pub fn from_template(template: &str, viz_js: &str) -> Result<Self, HeatVizError> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE, template).map_err(|e| HeatVizError::RenderError {
            page: PAGE.to_string(),
            reason: tera_reason(&e),
        })?;

        Ok(Self {
            tera,
            now: chrono::Local::now().format("%Y.%m.%d %H:%M:%S").to_string(),
            viz_js: viz_js.to_string(),
        })
    }

    /// Render one page.
    pub fn render(&self, view: &PageView<'_>) -> Result<String, HeatVizError> {
        let render_error = |reason: String| HeatVizError::RenderError {
            page: view.title.to_string(),
            reason,
        };

        let dotdata = dot_literal(&to_dot(view.graph)).map_err(|e| render_error(e.to_string()))?;

        let mut context = TeraContext::new();
        context.insert("title", view.title);
        context.insert("now", &self.now);
        context.insert("dotdata", &dotdata);
        context.insert("notes", &view.notes);
        context.insert("nav", view.nav);
        context.insert("nav2", view.nav2);
        context.insert("viz_js", &self.viz_js);

        self.tera.render(PAGE, &context).map_err(|e| render_error(tera_reason(&e)))
    }

    /// Render one page and write it to `path`.
    pub fn write(&self, path: &Path, view: &PageView<'_>) -> Result<()> {
        let html = self.render(view)?;
        write_page(path, &html)
    }
}

/// Write a rendered page, creating parent directories as needed.
///
/// # Errors
///
/// Any I/O failure, with the path in the error context.
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Copy the configured viz.js file into `dir` unless it is already there.
pub fn copy_viz_js(source: &Path, dir: &Path) -> Result<()> {
    let file_name = source.file_name().with_context(|| {
        format!("viz.js path {} has no file name", source.display())
    })?;
    let target = dir.join(file_name);
    if target.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    fs::copy(source, &target).with_context(|| {
        format!("Failed to copy {} to {}", source.display(), target.display())
    })?;
    debug!("Copied {} to {}", source.display(), target.display());
    Ok(())
}

/// Warn when the script pages load from `viz_js` is not in `dir`.
///
/// Absolute URLs are not checked. Returns whether the warning was logged.
pub fn warn_if_viz_js_missing(viz_js: &str, dir: &Path) -> bool {
    if ["http://", "https://", "//"].iter().any(|scheme| viz_js.starts_with(scheme)) {
        return false;
    }
    let expected = dir.join(viz_js);
    if expected.exists() {
        return false;
    }
    warn!(
        "{} not found; pages will show no graph until it is there (set [render] viz_js_file to copy it)",
        expected.display()
    );
    true
}

/// DOT text as a JSON string literal that is safe inside a `<script>`.
fn dot_literal(dot: &str) -> serde_json::Result<String> {
    Ok(serde_json::to_string(dot)?.replace("</", "<\\/"))
}

fn tera_reason(error: &tera::Error) -> String {
    let mut reason = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
