use groovyscope_core::logging::init_logging_in;
use tempfile::TempDir;

#[test]
fn test_log_file_is_written_under_directory() {
    let dir = TempDir::new().unwrap();
    let logs = dir.path().join("logs");
    let guard = init_logging_in(&logs, "resolver", false);
    tracing::info!("resolver started");
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(&logs).unwrap().flatten().collect();
    assert_eq!(files.len(), 1);
    assert!(
        files[0]
            .file_name()
            .to_string_lossy()
            .starts_with("resolver")
    );
}
