use showyourwork::config::render_config;
use showyourwork::core::SywError;
use showyourwork::dependencies::{closure, closure_map, dependency_map_from_config};
use showyourwork::test_utils::{ConfigFixture, ProjectFixture};

#[test]
fn test_closure_from_configuration() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::basic()).unwrap();

    let paths = project.paths();
    let config = render_config(project.repo(), &paths.user).unwrap();
    let map = dependency_map_from_config(&config).unwrap();

    let deps = closure("src/scripts/plot.py", &map).unwrap();
    assert_eq!(deps.len(), 2);
    assert!(deps.contains("src/data/results.dat"));
    assert!(deps.contains("src/scripts/simulate.py"));

    let all = closure_map(&map).unwrap();
    assert_eq!(all["src/data/results.dat"].len(), 1);
}

#[test]
fn test_circular_configuration() {
    let project = ProjectFixture::new().unwrap();
    project.write_config(&ConfigFixture::circular_dependencies()).unwrap();

    let paths = project.paths();
    let config = render_config(project.repo(), &paths.user).unwrap();
    let map = dependency_map_from_config(&config).unwrap();

    let err = closure("src/scripts/a.py", &map).unwrap_err();
    match err.downcast_ref::<SywError>() {
        Some(SywError::CircularDependency { chain }) => {
            assert_eq!(chain.first(), chain.last());
            assert_eq!(chain.len(), 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
