//! Tests for loading emitter configuration from disk

use std::fs;

use pattern_emitter::*;
use tempfile::TempDir;

#[test]
fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("emitter.yaml");
    fs::write(&path, "emitter:\n  match_cache: false\n  max_listeners: 3\n").unwrap();

    let config = ConfigLoader::load_from_path(&path).unwrap();
    assert!(!config.match_cache);
    assert!(config.fast_path);
    assert_eq!(config.max_listeners, 3);
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("emitter.json");
    fs::write(&path, r#"{"emitter": {"fast_path": false}}"#).unwrap();

    let config = ConfigLoader::load_from_path(&path).unwrap();
    assert!(!config.fast_path);
    assert!(config.match_cache);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::load_from_path(&dir.path().join("absent.yaml")).unwrap();
    assert_eq!(config, EmitterConfig::default());
}

#[test]
fn test_unsupported_extension_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("emitter.toml");
    fs::write(&path, "[emitter]\n").unwrap();

    let result = ConfigLoader::load_from_path(&path);
    assert!(matches!(result, Err(EmitterError::InvalidConfiguration(_))));
}

#[test]
fn test_invalid_max_listeners_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("emitter.yml");
    fs::write(&path, "emitter:\n  max_listeners: 5000000\n").unwrap();

    let result = ConfigLoader::load_from_path(&path);
    assert!(matches!(result, Err(EmitterError::InvalidConfiguration(_))));
}

#[test]
fn test_loaded_config_drives_emitter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("emitter.yaml");
    fs::write(&path, "emitter:\n  match_cache: false\n").unwrap();

    let config = ConfigLoader::load_from_path(&path).unwrap();
    let emitter: PatternEmitter<()> = PatternEmitter::with_config(config);
    emitter.on(Pattern::new("^a").unwrap(), Listener::infallible(|_| {}));

    assert!(emitter.emit("abc", &()).unwrap());
    assert!(emitter.emit("abc", &()).unwrap());
    assert_eq!(emitter.cache_stats().hits, 0);
    assert!(!emitter.config().match_cache);
}
