//! Loading configuration files from disk

use groovyscope_core::{ConversionMode, CoreConfig, GroovyscopeError, ParseConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_empty_object_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("groovyscope.json");
    fs::write(&path, "{}").unwrap();

    let config = CoreConfig::load(&path).unwrap();
    assert!(config.parse.attribute_positions);
    assert!(config.parse.attribute_comments);
    assert!(config.resolver.cache_unsolved);
    assert!(config.resolver.extra_default_imports.is_empty());
}

#[test]
fn test_partial_sections_keep_remaining_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("groovyscope.json");
    fs::write(
        &path,
        r#"{
            "parse": { "attribute_comments": false },
            "resolver": { "extra_default_imports": ["org.gradle.api."] }
        }"#,
    )
    .unwrap();

    let config = CoreConfig::load(&path).unwrap();
    assert!(!config.parse.attribute_comments);
    assert!(config.parse.attribute_positions);
    assert_eq!(config.resolver.extra_default_imports, vec!["org.gradle.api."]);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = CoreConfig::load(&temp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, GroovyscopeError::Io(_)));
}

#[test]
fn test_malformed_json_is_json_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.json");
    fs::write(&path, "{ parse: ").unwrap();

    let err = CoreConfig::load(&path).unwrap_err();
    assert!(matches!(err, GroovyscopeError::Json(_)));
}

#[test]
fn test_mode_names_parse_case_insensitively() {
    assert_eq!("STRICT".parse::<ConversionMode>().unwrap(), ConversionMode::Strict);
    assert_eq!(" lenient ".parse::<ConversionMode>().unwrap(), ConversionMode::Lenient);
    assert!(matches!(
        "paranoid".parse::<ConversionMode>(),
        Err(GroovyscopeError::Config(_))
    ));
    assert!(ParseConfig::strict().is_strict());
    assert!(!ParseConfig::lenient().is_strict());
}
