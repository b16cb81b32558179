use serde_json::json;
use showyourwork::config::edit_yaml;
use showyourwork::config::resolver::ResolveContext;
use showyourwork::config::{
    CacheBranchState, RunEnv, RunType, SyncSpec, branch_state, record_branch_state, resolve,
};
use showyourwork::core::SywError;
use showyourwork::git::RepoMetadata;
use showyourwork::test_utils::{ConfigFixture, ProjectFixture, StaticRepoInfo, init_test_logging};

fn resolve_with(project: &ProjectFixture, run_type: RunType, repo: &StaticRepoInfo) -> anyhow::Result<showyourwork::config::Config> {
    let paths = project.paths();
    let env = RunEnv::default().with_run_type(run_type);
    let ctx = ResolveContext {
        paths: &paths,
        env: &env,
        repo,
        tool_version: "0.4.3",
    };
    resolve(run_type, &ctx)
}

#[test]
fn test_preprocess_then_build() {
    init_test_logging(None);
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::basic()).unwrap();
    let repo = StaticRepoInfo::github("owner", "my_paper");

    let config = resolve_with(&project, RunType::Preprocess, &repo).unwrap();
    assert_eq!(config["ms_tex"], "src/tex/paper.tex");
    assert_eq!(config["verbose"], true);
    assert_eq!(config["stamp"]["text"], r"{\faGithub}/owner/my{\_}paper");
    assert_eq!(config["tex_files_in"].as_array().unwrap().len(), 2);
    assert!(project.file_exists(".showyourwork/config.json"));

    // A later stage on another branch sees the new branch without re-preprocessing
    let feature = StaticRepoInfo::new(RepoMetadata {
        branch: "feature".to_string(),
        ..RepoMetadata::default()
    });
    let config = resolve_with(&project, RunType::Build, &feature).unwrap();
    assert_eq!(config["git_branch"], "feature");
    assert_eq!(config["ms_pdf"], "paper.pdf");
    assert_eq!(config["cache"]["feature"], json!({"external_archive_id": null, "sandbox_flag": null}));
}

#[test]
fn test_empty_config_defaults() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::empty()).unwrap();

    let config = resolve_with(&project, RunType::Preprocess, &StaticRepoInfo::default()).unwrap();
    assert_eq!(config["manuscript_name"], "ms");
    assert_eq!(config["stamp"]["enabled"], true);
    assert_eq!(config["dag"]["engine"], "sfdp");
    assert_eq!(config["synctex"], true);
    assert_eq!(config["git_branch"], "unknown");
}

#[test]
fn test_sync_section_round_trips() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::with_sync()).unwrap();

    let config = resolve_with(&project, RunType::Preprocess, &StaticRepoInfo::default()).unwrap();
    let sync = SyncSpec::from_config(&config).unwrap();
    assert_eq!(sync.id.as_deref(), Some("63d2a1b0f3"));
    assert_eq!(sync.push, vec!["src/tex/ms.tex", "src/tex/figures"]);
    assert!(sync.auto_sync);
}

#[test]
fn test_overlapping_sync_is_fatal_and_nothing_is_persisted() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::overlapping_sync()).unwrap();

    let err = resolve_with(&project, RunType::Preprocess, &StaticRepoInfo::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<SywError>(), Some(SywError::ConfigError { .. })));
    assert!(!project.file_exists(".showyourwork/config.json"));
}

#[test]
fn test_build_without_preprocess_fails() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::empty()).unwrap();

    let err = resolve_with(&project, RunType::Build, &StaticRepoInfo::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<SywError>(), Some(SywError::ConfigNotFound { .. })));
}

#[test]
fn test_recorded_cache_state_is_picked_up() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::empty()).unwrap();
    let overlay = project.repo().join("zenodo.yml");

    let state = CacheBranchState {
        external_archive_id: Some("10.5281/zenodo.99".to_string()),
        sandbox_flag: None,
    };
    record_branch_state(&overlay, "main", &state).unwrap();

    let config =
        resolve_with(&project, RunType::Preprocess, &StaticRepoInfo::github("owner", "paper")).unwrap();
    assert_eq!(branch_state(&config, "main"), Some(state));
}

#[test]
fn test_overlay_can_be_disabled() {
    let project = ProjectFixture::new().unwrap();
    project.write_file("showyourwork.yml", "cache_on_zenodo: false\n").unwrap();
    edit_yaml(&project.repo().join("zenodo.yml"), |contents| {
        if let Some(mapping) = contents.as_mapping_mut() {
            mapping.insert("manuscript_name".into(), "from_overlay".into());
        }
        Ok(())
    })
    .unwrap();

    let config = resolve_with(&project, RunType::Preprocess, &StaticRepoInfo::default()).unwrap();
    assert_eq!(config["manuscript_name"], "ms");
}
