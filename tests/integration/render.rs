use showyourwork::config::render_config;
use showyourwork::test_utils::{ConfigFixture, ProjectFixture};

#[test]
fn test_render_templated_config() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::templated()).unwrap();

    let paths = project.paths();
    let config = render_config(project.repo(), &paths.user).unwrap();

    assert_eq!(config["manuscript_name"], "paper");
    assert_eq!(config["dependencies"]["src/scripts/a.py"], "src/data/a.dat");
    assert_eq!(config["dependencies"]["src/scripts/b.py"], "src/data/b.dat");
}

#[test]
fn test_render_merges_overlay_and_records_result() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::basic()).unwrap();
    project
        .write_overlay("cache:\n  main:\n    external_archive_id: 10.5281/zenodo.7\n")
        .unwrap();

    let paths = project.paths();
    let config = render_config(project.repo(), &paths.user).unwrap();
    assert_eq!(config["cache"]["main"]["external_archive_id"], "10.5281/zenodo.7");

    let merged = project.read_file(".showyourwork/showyourwork.yml").unwrap();
    assert!(merged.contains("manuscript_name: paper"));
    assert!(merged.contains("10.5281/zenodo.7"));
}

#[test]
fn test_render_normalizes_list_of_mappings() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::basic()).unwrap();

    let paths = project.paths();
    let config = render_config(project.repo(), &paths.user).unwrap();
    let deps = config["dependencies"].as_object().unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!(deps["src/scripts/plot.py"], serde_json::json!(["src/data/results.dat"]));
}
