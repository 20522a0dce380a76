//! User configuration for heat-viz.
//!
//! Every command-line option has a built-in default, which an optional TOML
//! file can replace. Flags given on the command line win over both.
//!
//! # Location
//!
//! `~/.heat-viz/config.toml`, or the file named by `--config` /
//! `HEAT_VIZ_CONFIG`. A missing default file is not an error; a missing file
//! that was asked for explicitly is.
//!
//! # Format
//!
//! ```toml
//! [template]
//! output = "heat-deps.html"
//! filter = ".*"
//! tags = ["controller", "compute", "storage"]
//!
//! [roles]
//! output_dir = "graphs"
//! exclude = ["Monitoring", "Basenode"]
//!
//! [render]
//! template = "/path/to/page.html"     # replaces the built-in page
//! viz_js = "../../viz.js"             # script src used by the pages
//! viz_js_file = "/opt/viz/viz.js"     # copied next to every page
//! ```
//!
//! Without `viz_js_file` nothing is copied: pages stay blank until `viz_js`
//! resolves, and a warning names the missing file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::HeatVizError;
use crate::decorate::DEFAULT_TAGS;
use crate::edges::InclusionFilter;

/// Name of the configuration directory under the home directory.
pub const CONFIG_DIR: &str = ".heat-viz";
/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";

/// Role-graph nodes hidden from the `simple` page unless configured otherwise.
pub const DEFAULT_EXCLUDES: &[&str] =
    &["Monitoring", "Basenode", "SecurityLevel-Base", "Devex", "ufw", "perf-target"];

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub template: TemplateConfig,
    pub roles: RolesConfig,
    pub render: RenderConfig,
}

/// Defaults for `heat-viz template`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub output: PathBuf,
    pub filter: String,
    pub tags: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("heat-deps.html"),
            filter: InclusionFilter::MATCH_ALL.to_string(),
            tags: DEFAULT_TAGS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Defaults for `heat-viz roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    pub output_dir: PathBuf,
    pub exclude: Vec<String>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("graphs"),
            exclude: DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Page rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Custom page template
    pub template: Option<PathBuf>,
    /// `src` of the layout script
    pub viz_js: String,
    /// Local copy of the layout script to place next to the pages
    pub viz_js_file: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: None,
            viz_js: "viz.js".to_string(),
            viz_js_file: None,
        }
    }
}

impl Config {
    /// Load from `path` if given, otherwise from the default location.
    ///
    /// # Errors
    ///
    /// - [`HeatVizError::ConfigError`] if an explicit `path` does not exist
    /// - read or parse failures of an existing file
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(HeatVizError::ConfigError {
                        message: format!("Config file {} does not exist", path.display()),
                    }
                    .into());
                }
                Self::load_from(&path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `~/.heat-viz/config.toml`, if a home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}
