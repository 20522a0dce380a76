use predicates::prelude::*;

use crate::common::{TestProject, write_role};

fn write_roles(project: &TestProject) {
    let prod = project.path().join("chef/prod/roles");
    write_role(&prod, "nova-api", &["role[nova-api-core]", "role[Basenode]", "recipe[nova::api]"]);
    write_role(&prod, "nova-api-core", &["recipe[nova::common]"]);
    write_role(&prod, "Basenode", &["recipe[ufw]", "recipe[ntp]"]);

    let stage = project.path().join("chef/stage/roles");
    write_role(&stage, "nova-api", &["recipe[nova::api]"]);
}

#[test]
fn test_roles_page_tree() {
    let project = TestProject::new();
    write_roles(&project);

    project
        .cmd()
        .args(["roles", "chef/prod/roles", "chef/stage/roles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 roles, 3 tags"));

    for tag in ["merged", "prod", "stage"] {
        for page in ["simple", "main", "focus-role-nova-api", "focus-recipe-nova--api"] {
            let path = project.path().join(format!("graphs/{tag}/{page}.html"));
            assert!(path.exists(), "missing {}", path.display());
        }
    }
    assert!(project.path().join("graphs/prod/focus-role-Basenode.html").exists());
    assert!(!project.path().join("graphs/stage/focus-role-Basenode.html").exists());
}

#[test]
fn test_roles_merged_takes_last_run_list() {
    let project = TestProject::new();
    write_roles(&project);

    project.cmd().args(["roles", "chef/prod/roles", "chef/stage/roles"]).assert().success();

    let merged = project.read("graphs/merged/main.html");
    assert!(merged.contains(r#"\"role[nova-api]\" -> \"recipe[nova::api]\""#));
    assert!(!merged.contains(r#"\"role[nova-api]\" -> \"role[Basenode]\""#));
    assert!(merged.contains("Chef roles - merged - main"));
}

#[test]
fn test_roles_simple_page_excludes() {
    let project = TestProject::new();
    write_roles(&project);

    project.cmd().args(["roles", "chef/prod/roles"]).assert().success();

    let simple = project.read("graphs/prod/simple.html");
    assert!(!simple.contains("recipe[ntp]"));
    assert!(simple.contains("recipe[nova::common]"));
    assert!(simple.contains(
        "Excludes Monitoring, Basenode, SecurityLevel-Base, Devex, ufw and perf-target."
    ));

    let main = project.read("graphs/prod/main.html");
    assert!(main.contains("recipe[ntp]"));
    // name -> name-core edges are drawn black and thick
    assert!(main.contains(r#"\"role[nova-api]\" -> \"role[nova-api-core]\" [color=\"black\", penwidth=4.0]"#));
}

#[test]
fn test_roles_custom_excludes_and_output() {
    let project = TestProject::new();
    write_roles(&project);

    project
        .cmd()
        .args(["roles", "chef/prod/roles", "-o", "site", "--exclude", "nova-api-core"])
        .assert()
        .success();

    let simple = project.read("site/prod/simple.html");
    assert!(simple.contains("Excludes nova-api-core."));
    assert!(!simple.contains("recipe[nova::common]"));
    assert!(simple.contains("recipe[ntp]"));
}

#[test]
fn test_roles_focus_page() {
    let project = TestProject::new();
    write_roles(&project);

    project.cmd().args(["roles", "chef/prod/roles"]).assert().success();

    let focus = project.read("graphs/prod/focus-role-Basenode.html");
    assert!(focus.contains("recipe[ufw]"));
    assert!(focus.contains(r#"\"role[nova-api]\" -> \"role[Basenode]\""#));
    assert!(!focus.contains("recipe[nova::common]"));
}

#[test]
fn test_roles_require_a_directory() {
    let project = TestProject::new();
    project.cmd().arg("roles").assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_roles_warn_without_viz_js() {
    let project = TestProject::new();
    write_roles(&project);

    project
        .cmd()
        .args(["roles", "chef/prod/roles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("merged/viz.js not found"))
        .stderr(predicate::str::contains("prod/viz.js not found"));
}
