use evogene::config::ConfigManager;
use evogene::error::ErrorKind;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_save_then_load() {
    let manager = ConfigManager::new();
    manager
        .update(|c| {
            c.search.seed = Some(99);
            c.archive.relax_index_string_mutation = true;
            c.mutation.delta_start = 8;
        })
        .unwrap();

    let file = NamedTempFile::new().unwrap();
    manager.save_to_file(file.path()).unwrap();

    let loaded = ConfigManager::new();
    loaded.load_from_file(file.path()).unwrap();
    assert_eq!(loaded.get().unwrap(), manager.get().unwrap());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[archive]\nlength_mutation_probability = 0.25").unwrap();

    let manager = ConfigManager::new();
    manager.load_from_file(file.path()).unwrap();
    let config = manager.get().unwrap();
    assert_eq!(config.archive.length_mutation_probability, 0.25);
    assert_eq!(config.mutation.delta_start, 6);
    assert_eq!(config.search.worker_count, 1);
}

#[test]
fn test_invalid_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[search]\nworker_count = 2\nworker_index = 2").unwrap();

    let manager = ConfigManager::new();
    let err = manager.load_from_file(file.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(manager.get().unwrap().search.worker_count, 1);
}
