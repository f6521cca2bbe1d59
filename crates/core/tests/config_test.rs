use tsdocbot_core::config::{Config, GeneratorConfig, LlmConfig, CONFIG_FILE_NAME};

#[test]
fn test_generator_config_defaults() {
    let config = GeneratorConfig::default();
    assert_eq!(config.branch_prefix, "docs-update");
    assert_eq!(
        config.commit_message_template,
        "docs: add JSDoc comments to {file}"
    );
    assert_eq!(config.pull_request_labels, vec!["documentation", "automated-pr"]);
    assert!(config.pull_request_reviewers.is_empty());
}

#[test]
fn test_config_validation_llm_provider() {
    let mut config = Config::default();

    // Valid providers
    config.llm.provider = "openai".to_string();
    assert!(config.validate().is_ok());

    config.llm.provider = "mock".to_string();
    assert!(config.validate().is_ok());

    // Invalid provider
    config.llm.provider = "invalid".to_string();
    let result = config.validate();
    assert!(result.is_err());
}

#[test]
fn test_llm_api_key_prefers_config() {
    let config = LlmConfig {
        api_key: Some("sk-from-config".to_string()),
        ..Default::default()
    };
    assert_eq!(config.resolve_api_key(), Some("sk-from-config".to_string()));
}

#[test]
fn test_load_reads_repository_config_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[files]\nroot_directory = \"src\"\nexcluded_files = [\"src/generated.ts\"]\n",
    )
    .expect("Failed to write config");

    let config = Config::load(None, dir.path()).expect("Failed to load config");
    assert_eq!(config.files.root_directory, "src");
    assert_eq!(config.files.excluded_files, vec!["src/generated.ts"]);
}
