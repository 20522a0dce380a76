use predicates::prelude::*;

use crate::common::{CFN_JSON, HOT_CHAIN, HOT_WEB, TestProject};

#[test]
fn test_template_default_output() {
    let project = TestProject::new();
    project.template("stack.yaml", HOT_CHAIN);

    project
        .cmd()
        .args(["template", "stack.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack.yaml (HOT template): 3 nodes, 2 edges"));

    let html = project.read("heat-deps.html");
    assert!(html.contains("<title>Heat dependencies - stack.yaml</title>"));
    assert!(html.contains(r#"\"C1\" -> \"D1\""#));
    assert!(html.contains(r#"\"S1\" -> \"C1\""#));
    assert!(html.contains("shape=box3d"));
    assert!(html.contains("shape=oval"));
    assert!(html.contains("ranksep=2.0"));
    // no dropped edges, no notes
    assert!(!html.contains("Dropped"));
}

#[test]
fn test_template_output_flag_creates_directories() {
    let project = TestProject::new();
    project.template("stack.yaml", HOT_CHAIN);

    project.cmd().args(["template", "stack.yaml", "-o", "out/deps.html"]).assert().success();

    assert!(project.path().join("out/deps.html").exists());
    assert!(!project.path().join("heat-deps.html").exists());
}

#[test]
fn test_template_filter_drops_edges() {
    let project = TestProject::new();
    project.template("web.yaml", HOT_WEB);

    project
        .cmd()
        .args(["template", "web.yaml", "-f", "^web-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 edges dropped"))
        .stderr(predicate::str::contains("filtered by '^web-'"))
        .stderr(predicate::str::contains("unknown node web-missing"));

    let html = project.read("heat-deps.html");
    assert!(html.contains(r#"\"web-a\" -> \"web-b\""#));
    assert!(!html.contains(r#"\"web-a\" -> \"db-b\""#));
    assert!(html.contains("Dropped 2 edges"));
    assert!(!html.contains("web-volume"));
}

#[test]
fn test_template_tags_color_nodes() {
    let project = TestProject::new();
    project.template("web.yaml", HOT_WEB);

    project.cmd().args(["template", "web.yaml", "-t", "db,web"]).assert().success();

    let html = project.read("heat-deps.html");
    // two tags: hues 0 and 180 degrees at 40% saturation
    assert!(html.contains(r#"\"db-b\" [label=\"db-b\", shape=box3d, style=filled, fillcolor=\"0.000,0.400,1.000\""#));
    assert!(html.contains(r#"fillcolor=\"0.500,0.400,1.000\""#));
}

#[test]
fn test_template_cfn_json() {
    let project = TestProject::new();
    project.template("stack.json", CFN_JSON);

    project
        .cmd()
        .args(["template", "stack.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(CFN template): 3 nodes, 2 edges"));

    let html = project.read("heat-deps.html");
    assert!(html.contains(r#"\"ControllerDeployment\" -> \"ControllerServer\""#));
    assert!(html.contains(r#"\"ControllerConfig\" -> \"ControllerDeployment\""#));
}

#[test]
fn test_template_verbose_logs_decisions() {
    let project = TestProject::new();
    project.template("web.yaml", HOT_WEB);

    project
        .cmd()
        .args(["-v", "template", "web.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("is a HOT template"));
}

#[test]
fn test_template_quiet_hides_warnings() {
    let project = TestProject::new();
    project.template("web.yaml", HOT_WEB);

    project
        .cmd()
        .args(["-q", "template", "web.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_template_warns_without_viz_js() {
    let project = TestProject::new();
    project.template("stack.yaml", HOT_CHAIN);

    project
        .cmd()
        .args(["template", "stack.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("viz.js not found"));

    std::fs::write(project.path().join("viz.js"), "// layout").unwrap();
    project
        .cmd()
        .args(["template", "stack.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("viz.js not found").not());
}
