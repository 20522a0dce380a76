use predicates::prelude::*;

use crate::common::{TestProject, write_role};

#[test]
fn test_template_requires_file_argument() {
    let project = TestProject::new();
    project
        .cmd()
        .arg("template")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_template() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["template", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input path not found: nope.yaml"));
    assert!(!project.path().join("heat-deps.html").exists());
}

#[test]
fn test_unrecognized_dialect() {
    let project = TestProject::new();
    project.template("typo.yaml", "heat_template_version: 2013-05-32\nresources: {}\n");

    project
        .cmd()
        .args(["template", "typo.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2013-05-32"))
        .stderr(predicate::str::contains("Did you mean '2013-05-23'?"));
}

#[test]
fn test_template_without_marker() {
    let project = TestProject::new();
    project.template("bare.yaml", "resources: {}\n");

    project
        .cmd()
        .args(["template", "bare.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<none>"));
}

#[test]
fn test_unparsable_template() {
    let project = TestProject::new();
    project.template("broken.yaml", "resources: [unclosed\n");

    project
        .cmd()
        .args(["template", "broken.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid template syntax"));
}

#[test]
fn test_unclassifiable_resource_type() {
    let project = TestProject::new();
    project.template(
        "odd.yaml",
        "heat_template_version: 2014-10-16\nresources:\n  X:\n    type: OS::Heat::SoftwareComponent\n",
    );

    project
        .cmd()
        .args(["template", "odd.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OS::Heat::SoftwareComponent"));
}

#[test]
fn test_invalid_filter() {
    let project = TestProject::new();
    project.template("stack.yaml", crate::common::HOT_CHAIN);

    project
        .cmd()
        .args(["template", "stack.yaml", "-f", "web-("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("web-("));
}

#[test]
fn test_roles_not_a_directory() {
    let project = TestProject::new();
    std::fs::write(project.path().join("role.json"), "{}").unwrap();

    project
        .cmd()
        .args(["roles", "role.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory: role.json"));
}

#[test]
fn test_roles_bad_manifest() {
    let project = TestProject::new();
    let dir = project.path().join("chef/prod/roles");
    write_role(&dir, "ok", &[]);
    std::fs::write(dir.join("bad.json"), "{ not json").unwrap();

    project
        .cmd()
        .args(["roles", "chef/prod/roles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.json"));
}
