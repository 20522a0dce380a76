//! Test utilities for heat-viz
//!
//! Logging setup and small fixtures shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use heat_viz::test_utils::{init_test_logging, write_template, HOT_CHAIN};
//!
//! init_test_logging(None);
//! let dir = tempfile::TempDir::new().unwrap();
//! let path = write_template(dir.path(), "stack.yaml", HOT_CHAIN);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` if given, otherwise `RUST_LOG`; with neither, tests run
/// without a subscriber.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// HOT template: a deployment consuming a config consuming a server.
pub const HOT_CHAIN: &str = r"heat_template_version: 2013-05-23
description: Deployment chain
resources:
  D1:
    type: OS::Heat::StructuredDeployment
    properties:
      config: {get_resource: C1}
  C1:
    type: OS::Heat::StructuredConfig
    properties:
      config: {get_resource: S1}
  S1:
    type: OS::Nova::Server
";

/// HOT template with web and db resources and one dangling dependency.
pub const HOT_WEB: &str = r"heat_template_version: queens
resources:
  web-a:
    type: OS::Heat::SoftwareDeployment
    depends_on: [db-b, web-b, web-missing]
    properties:
      signal_transport: NO_SIGNAL
  web-b:
    type: OS::Heat::SoftwareConfig
  db-b:
    type: OS::Nova::Server
  web-volume:
    type: OS::Cinder::Volume
";

/// CloudFormation-style template in JSON.
pub const CFN_JSON: &str = r#"{
  "HeatTemplateFormatVersion": "2012-12-12",
  "Resources": {
    "ControllerDeployment": {
      "Type": "OS::Heat::StructuredDeployment",
      "DependsOn": "ControllerServer",
      "Properties": {"config": {"Ref": "ControllerConfig"}}
    },
    "ControllerConfig": {"Type": "OS::Heat::StructuredConfig"},
    "ControllerServer": {"Type": "AWS::EC2::Instance"}
  }
}
"#;

/// Write a template file into `dir` and return its path.
pub fn write_template(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write template fixture");
    path
}

/// Write `<dir>/<name>.json` as a role manifest, creating `dir` if needed.
pub fn write_role(dir: &Path, name: &str, run_list: &[&str]) -> PathBuf {
    fs::create_dir_all(dir).expect("failed to create role directory");
    let manifest = serde_json::json!({
        "name": name,
        "description": format!("{name} role"),
        "run_list": run_list,
    });
    let path = dir.join(format!("{name}.json"));
    fs::write(&path, manifest.to_string()).expect("failed to write role fixture");
    path
}
