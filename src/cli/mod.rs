//! Command-line interface for heat-viz.
//!
//! # Commands
//!
//! - `template` - Graph one Heat or CloudFormation template ([`template`])
//! - `roles` - Graph role manifest directories ([`roles`])
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Errors only
//! - `--config` / `-c` - Configuration file (also `HEAT_VIZ_CONFIG`)
//!
//! Logging goes to stderr so that nothing but results reaches stdout.
//! Without `--verbose` or `--quiet` the filter comes from `RUST_LOG`, and
//! falls back to `info`.
//!
//! # Examples
//!
//! ```bash
//! heat-viz template overcloud.yaml -o overcloud.html -f '^Controller'
//! heat-viz -v roles chef/prod/roles chef/stage/roles -o graphs
//! ```

pub mod roles;
pub mod template;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Settings derived from the global flags, applied once before a command
/// runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` means `RUST_LOG` or `info`
    pub log_level: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr tracing subscriber.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Dependency graph visualizer for Heat templates and role manifests.
#[derive(Parser, Debug)]
#[command(
    name = "heat-viz",
    about = "Visualize dependencies in Heat templates and role manifests",
    version,
    long_about = "heat-viz draws the dependency graph of an OpenStack Heat (HOT or CFN) template, \
                  or of a set of role manifest directories, as HTML pages rendered in the browser."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file, instead of ~/.heat-viz/config.toml
    #[arg(short, long, global = true, env = "HEAT_VIZ_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Graph the deployments, configs and servers of a template.
    ///
    /// See [`template::TemplateCommand`].
    Template(template::TemplateCommand),

    /// Graph role manifest directories into a tree of pages.
    ///
    /// See [`roles::RolesCommand`].
    Roles(roles::RolesCommand),
}

impl Cli {
    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(&config)
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with explicit global settings.
    pub fn execute_with_config(self, cli_config: &CliConfig) -> Result<()> {
        cli_config.init_logging();
        let config = Config::load_with_optional(cli_config.config_path.clone())?;

        match self.command {
            Commands::Template(cmd) => cmd.execute(&config),
            Commands::Roles(cmd) => cmd.execute(&config),
        }
    }
}
