//! Integration tests for the check and init commands

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tsdocbot::{check_repository, write_default_config};
use tsdocbot_core::config::{Config, CONFIG_FILE_NAME};
use tsdocbot_core::DeclarationKind;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dirs");
    }
    fs::write(path, content).expect("Failed to write file");
}

#[test]
fn test_check_reports_missing_documentation() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(
        dir.path(),
        "src/wallet.ts",
        "/** A wallet. */\nexport class Wallet {\n  connect(): void {}\n}\n",
    );
    write(dir.path(), "src/done.ts", "/** Done. */\nfunction done() {}\n");
    write(dir.path(), "src/broken.ts", "class {{{\n");

    let report = check_repository(dir.path(), &Config::default()).expect("Check failed");

    assert_eq!(report.missing_count(), 1);
    assert_eq!(report.documented_count(), 2);
    assert_eq!(report.skipped, vec![PathBuf::from("src/broken.ts")]);

    let wallet = report
        .files
        .iter()
        .find(|f| f.path == Path::new("src/wallet.ts"))
        .expect("Expected wallet.ts");
    assert_eq!(wallet.missing.len(), 1);
    assert_eq!(wallet.missing[0].line, 3);
    assert_eq!(wallet.missing[0].kind, DeclarationKind::Method);
    assert_eq!(wallet.missing[0].name, "Wallet.connect");
}

#[test]
fn test_check_clean_repository() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/done.ts", "/** Done. */\nfunction done() {}\n");

    let report = check_repository(dir.path(), &Config::default()).expect("Check failed");
    assert_eq!(report.missing_count(), 0);
}

#[test]
fn test_init_writes_loadable_config_once() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let written = write_default_config(dir.path()).expect("Init failed");
    assert_eq!(written, Some(dir.path().join(CONFIG_FILE_NAME)));

    let content = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).expect("Failed to read");
    let config = Config::from_toml_str(&content).expect("Failed to parse written config");
    assert_eq!(config.generator.branch_prefix, "docs-update");
    assert!(config.validate().is_ok());

    assert_eq!(write_default_config(dir.path()).expect("Init failed"), None);
}
