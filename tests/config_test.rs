use apideref::config::*;
use apideref::errors::DerefError;
use tempfile::TempDir;

#[test]
fn test_default_options_enable_dereferencing() {
    let options = DerefOptions::default();
    assert!(options.resolve_refs);
    assert!(options.dereference_refs);
    assert!(options.enabled());
}

#[test]
fn test_either_flag_disables() {
    let no_deref = DerefOptions {
        dereference_refs: false,
        ..DerefOptions::default()
    };
    let no_resolve = DerefOptions {
        resolve_refs: false,
        ..DerefOptions::default()
    };
    assert!(!no_deref.enabled());
    assert!(!no_resolve.enabled());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_options(&dir.path().join(OPTIONS_FILENAME)).unwrap();
    assert_eq!(loaded, DerefOptions::default());
}

#[test]
fn test_save_and_load_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(OPTIONS_FILENAME);
    let options = DerefOptions {
        resolve_refs: true,
        dereference_refs: false,
    };
    save_options(&path, &options).unwrap();
    let loaded = load_options(&path).unwrap();
    assert_eq!(options, loaded);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_options_use_parser_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(OPTIONS_FILENAME);
    std::fs::write(&path, r#"{ "dereference$Refs": false }"#).unwrap();

    let loaded = load_options(&path).unwrap();
    assert!(loaded.resolve_refs);
    assert!(!loaded.dereference_refs);

    let json = serde_json::to_value(&loaded).unwrap();
    assert_eq!(json["resolve$Refs"], serde_json::json!(true));
    assert_eq!(json["dereference$Refs"], serde_json::json!(false));
}

#[test]
fn test_malformed_options_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(OPTIONS_FILENAME);
    std::fs::write(&path, "{ not json").unwrap();

    match load_options(&path) {
        Err(DerefError::Config { message }) => assert!(message.contains("failed to parse")),
        other => panic!("expected config error, got {:?}", other),
    }
}
