use assert_cmd::Command;
use predicates::prelude::*;
use showyourwork::git::is_git_installed;
use showyourwork::test_utils::{ConfigFixture, ProjectFixture};

fn syw(project: &ProjectFixture) -> Command {
    let mut cmd = Command::cargo_bin("syw").unwrap();
    cmd.arg("--dir")
        .arg(project.repo())
        .arg("--workflow-root")
        .arg(project.tool())
        .env_remove("RUST_LOG")
        .env_remove("SNAKEMAKE_RUN_TYPE");
    cmd
}

#[test]
fn test_render_prints_merged_config() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::basic()).unwrap();

    syw(&project)
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("manuscript_name: paper"));
    assert!(project.file_exists(".showyourwork/showyourwork.yml"));
}

#[test]
fn test_resolve_preprocess_writes_json() {
    if !is_git_installed() {
        return;
    }
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::empty()).unwrap();

    let output = syw(&project)
        .args(["--quiet", "resolve", "--run-type", "preprocess"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let printed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(printed["manuscript_name"], "ms");
    assert_eq!(printed["git_sha"], "unknown");
    assert!(project.file_exists(".showyourwork/config.json"));
}

#[test]
fn test_resolve_reports_config_errors() {
    if !is_git_installed() {
        return;
    }
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::overlapping_sync()).unwrap();

    syw(&project)
        .args(["resolve", "--run-type", "preprocess"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error parsing the config"));
}

#[test]
fn test_deps_for_file() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::basic()).unwrap();

    syw(&project)
        .args(["deps", "src/scripts/plot.py"])
        .assert()
        .success()
        .stdout("src/data/results.dat\nsrc/scripts/simulate.py\n");
}

#[test]
fn test_deps_cycle_fails() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::circular_dependencies()).unwrap();

    syw(&project)
        .args(["deps", "src/scripts/a.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency through file"));
}

#[test]
fn test_missing_config_fails() {
    let project = ProjectFixture::new().unwrap();

    syw(&project)
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("showyourwork.yml"));
}
