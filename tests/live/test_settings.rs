//! Test: layered settings and `init` in an isolated directory

use std::fs;
use tempfile::TempDir;
use treesense::Settings;
use treesense::config::CONFIG_DIR;

#[test]
fn test_init_writes_loadable_template() {
    let temp_dir = TempDir::new().unwrap();
    let path = Settings::init_config_file(temp_dir.path(), false).expect("init");

    assert_eq!(path, temp_dir.path().join(CONFIG_DIR).join("settings.toml"));
    let settings = Settings::load_from(&path).expect("template should parse");
    assert_eq!(settings.markup.entity_tag, "BehaviorTree");
    assert_eq!(settings.markup.id_attribute, "ID");
    assert_eq!(settings.native.declaration_keyword, "class");
    assert_eq!(settings.file_watch.debounce_ms, 200);
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();
    Settings::init_config_file(temp_dir.path(), false).unwrap();

    let err = Settings::init_config_file(temp_dir.path(), false).unwrap_err();
    assert!(err.to_string().contains("--force"));
    assert!(Settings::init_config_file(temp_dir.path(), true).is_ok());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    fs::write(
        &path,
        r#"
[markup]
entity_tag = "Tree"

[file_watch]
debounce_ms = 75
"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.markup.entity_tag, "Tree");
    assert_eq!(settings.markup.id_attribute, "ID");
    assert_eq!(settings.file_watch.debounce().as_millis(), 75);
    assert_eq!(settings.indexing.tree_extensions, vec!["xml"]);
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    fs::write(&path, "[file_watch]\ndebounce_ms = \"soon\"\n").unwrap();

    assert!(Settings::load_from(&path).is_err());
}
