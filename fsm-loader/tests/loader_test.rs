// Integration tests for loading definitions from disk

use fsm_engine::DfaError;
use fsm_loader::{DefinitionLoader, LoaderConfig, LoaderError};
use std::path::Path;

const EVEN_ONES_JSON: &str = r#"{
    "states": ["S0", "S1"],
    "alphabet": ["0", "1"],
    "startState": "S0",
    "acceptStates": ["S0"],
    "transitions": {
        "S0": {"0": "S0", "1": "S1"},
        "S1": {"0": "S1", "1": "S0"}
    }
}"#;

const PARTIAL_JSON: &str = r#"{
    "states": ["S0", "S1"],
    "alphabet": ["0", "1"],
    "startState": "S0",
    "acceptStates": ["S0"],
    "transitions": {
        "S0": {"0": "S0"}
    }
}"#;

const AB_STAR_C_YAML: &str = r#"
states: [q0, q1, q2, dead]
alphabet: [a, b, c]
startState: q0
acceptStates: [q2]
transitions:
  q0: {a: q1, b: dead, c: q2}
  q1: {a: dead, b: q0, c: dead}
  q2: {a: dead, b: dead, c: dead}
  dead: {a: dead, b: dead, c: dead}
"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_json_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write(temp_dir.path(), "even_ones.json", EVEN_ONES_JSON);

    let dfa = DefinitionLoader::default().load(&path).unwrap();
    assert!(dfa.accept_str(""));
    assert!(!dfa.accept_str("1"));
    assert!(dfa.accept_str("11"));
    assert!(dfa.accept_str("101"));
    assert!(!dfa.accept_str("111"));
    assert!(!dfa.accept_str("2"));
}

#[test]
fn test_load_yaml_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write(temp_dir.path(), "ab_star_c.yml", AB_STAR_C_YAML);

    let dfa = DefinitionLoader::default().load(&path).unwrap();
    assert!(dfa.accept_str("ababc"));
    assert!(!dfa.accept_str("ababac"));
}

#[test]
fn test_load_definition_does_not_validate() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write(temp_dir.path(), "partial.json", PARTIAL_JSON);

    let loader = DefinitionLoader::default();
    let definition = loader.load_definition(&path).unwrap();
    assert_eq!(definition.transition_count(), 1);

    let err = loader.load(&path).unwrap_err();
    assert_eq!(
        err.dfa_error(),
        Some(&DfaError::MissingTransition {
            state: "S0".to_string(),
            symbol: "1".to_string(),
        })
    );
    assert!(err.to_string().contains("partial.json"));
}

#[test]
fn test_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let err = DefinitionLoader::default()
        .load(&temp_dir.path().join("absent.json"))
        .unwrap_err();
    assert!(matches!(err, LoaderError::Io(..)));
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write(temp_dir.path(), "dfa.txt", EVEN_ONES_JSON);

    let err = DefinitionLoader::default().load(&path).unwrap_err();
    assert!(matches!(err, LoaderError::UnsupportedFormat(p) if p == path));
}

#[test]
fn test_malformed_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write(temp_dir.path(), "broken.json", "{\"states\": [");

    let err = DefinitionLoader::default().load(&path).unwrap_err();
    assert!(matches!(err, LoaderError::Parse { .. }));
}

#[test]
fn test_file_size_limit() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write(temp_dir.path(), "even_ones.json", EVEN_ONES_JSON);

    let loader = DefinitionLoader::new(LoaderConfig {
        max_file_size: 16,
        ..Default::default()
    });
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, LoaderError::FileTooLarge { max: 16, .. }));

    let unlimited = DefinitionLoader::new(LoaderConfig {
        max_file_size: 0,
        ..Default::default()
    });
    assert!(unlimited.load(&path).is_ok());
}

#[test]
fn test_load_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path(), "a_even_ones.json", EVEN_ONES_JSON);
    write(temp_dir.path(), "b_ab_star_c.yaml", AB_STAR_C_YAML);
    write(temp_dir.path(), "c_partial.json", PARTIAL_JSON);
    write(temp_dir.path(), "notes.txt", "not a definition");
    std::fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

    let report = DefinitionLoader::default()
        .load_dir(temp_dir.path())
        .unwrap();

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(!report.is_clean());
    assert!(report.loaded[0].0.ends_with("a_even_ones.json"));
    assert!(report.loaded[1].0.ends_with("b_ab_star_c.yaml"));
    assert!(report.failed[0].0.ends_with("c_partial.json"));
}

#[test]
fn test_load_dir_missing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let err = DefinitionLoader::default()
        .load_dir(&temp_dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, LoaderError::Io(..)));
}

#[test]
fn test_shipped_samples_are_valid() {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data");
    let report = DefinitionLoader::default().load_dir(&data_dir).unwrap();

    assert!(report.is_clean(), "failed: {:?}", report.failed);
    assert_eq!(report.loaded.len(), 2);
}
