//! Loading configuration files from disk.

use std::path::Path;

use preload_push::config::{load_config, ConfigError};
use preload_push::push::compile_rules;

#[test]
fn test_sample_config_loads_and_compiles() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("preload-push.toml");
    let config = load_config(&path).unwrap();

    assert_eq!(config.push.max_pushes_per_request, 16);
    assert_eq!(config.site.index_files, ["index.html", "index.htm"]);

    let rules = compile_rules(&config.push).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].resources[1].headers.get("accept").unwrap(), "text/css");
    assert_eq!(rules[1].path, "/docs/index.html");
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        r#"
        [site]
        index_files = []

        [[push.rules]]
        path = "/app/"

          [[push.rules.resources]]
          path = "https://cdn.example.com/app.js"
        "#,
    )
    .unwrap();

    match load_config(&path) {
        Err(ConfigError::Validation(errors)) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field.clone()).collect();
            assert_eq!(
                fields,
                ["site.index_files", "push.rules[0].resources[0].path"]
            );
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}
