//! Shared helpers for the integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use heat_viz::test_utils::{CFN_JSON, HOT_CHAIN, HOT_WEB, write_role, write_template};

/// A temporary working directory with its own, empty, configuration file.
///
/// Commands run inside the directory and never see the user's
/// `~/.heat-viz/config.toml` or `RUST_LOG`.
pub struct TestProject {
    dir: TempDir,
    config: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        heat_viz::test_utils::init_test_logging(None);
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("heat-viz.toml");
        fs::write(&config, "").unwrap();
        Self {
            dir,
            config,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Replace the configuration file content.
    pub fn write_config(&self, content: &str) {
        fs::write(&self.config, content).unwrap();
    }

    pub fn template(&self, name: &str, content: &str) -> PathBuf {
        write_template(self.path(), name, content)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("heat-viz").unwrap();
        cmd.current_dir(self.path())
            .env("HEAT_VIZ_CONFIG", &self.config)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}
