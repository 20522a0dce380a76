use predicates::prelude::*;

use crate::common::{HOT_CHAIN, HOT_WEB, TestProject};

#[test]
fn test_config_supplies_defaults() {
    let project = TestProject::new();
    project.template("web.yaml", HOT_WEB);
    project.write_config(
        r#"
[template]
output = "from-config.html"
filter = "^web-"
"#,
    );

    project
        .cmd()
        .args(["template", "web.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-config.html"));

    let html = project.read("from-config.html");
    assert!(html.contains("filtered"));
}

#[test]
fn test_flags_override_config() {
    let project = TestProject::new();
    project.template("web.yaml", HOT_WEB);
    project.write_config("[template]\noutput = \"from-config.html\"\n");

    project.cmd().args(["template", "web.yaml", "-o", "from-flag.html"]).assert().success();

    assert!(project.path().join("from-flag.html").exists());
    assert!(!project.path().join("from-config.html").exists());
}

#[test]
fn test_config_flag_wins_over_environment() {
    let project = TestProject::new();
    project.template("stack.yaml", HOT_CHAIN);
    std::fs::write(project.path().join("other.toml"), "[template]\noutput = \"other.html\"\n")
        .unwrap();

    project.cmd().args(["--config", "other.toml", "template", "stack.yaml"]).assert().success();

    assert!(project.path().join("other.html").exists());
}

#[test]
fn test_custom_page_template_and_viz_js() {
    let project = TestProject::new();
    project.template("stack.yaml", HOT_CHAIN);
    std::fs::write(project.path().join("page.html"), "<h1>{{ title }}</h1><pre>{{ dotdata | safe }}</pre>")
        .unwrap();
    std::fs::write(project.path().join("viz-local.js"), "// layout").unwrap();
    project.write_config(
        r#"
[render]
template = "page.html"
viz_js_file = "viz-local.js"
"#,
    );

    project.cmd().args(["template", "stack.yaml", "-o", "out/deps.html"]).assert().success();

    let html = project.read("out/deps.html");
    assert!(html.starts_with("<h1>Heat dependencies - stack.yaml</h1><pre>\"digraph {"));
    assert!(project.path().join("out/viz-local.js").exists());
}

#[test]
fn test_missing_explicit_config_fails() {
    let project = TestProject::new();
    project.template("stack.yaml", HOT_CHAIN);

    project
        .cmd()
        .args(["--config", "missing.toml", "template", "stack.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_invalid_config_fails() {
    let project = TestProject::new();
    project.template("stack.yaml", HOT_CHAIN);
    project.write_config("[template\n");

    project
        .cmd()
        .args(["template", "stack.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
