use brochure_common::observability::LogFormat;
use brochure_config::{DEFAULT_CHAT_MODEL, SettingsLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const CLEAN_ENV: [(&str, Option<&str>); 6] = [
    ("OPENAI_API_KEY", None),
    ("OPENAI_CHAT_MODEL", None),
    ("MAX_PAGES", None),
    ("MAX_CHARS_PER_PAGE", None),
    ("BROCHURE__MAX_PAGES", None),
    ("BROCHURE__OPENAI_API_KEY", None),
];

#[test]
#[serial]
fn defaults_without_any_source() {
    temp_env::with_vars(CLEAN_ENV, || {
        let settings = SettingsLoader::new().load().expect("defaults load");
        assert_eq!(settings.openai_chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(settings.max_pages, 5);
        assert_eq!(settings.max_chars_per_page, 2000);
        assert_eq!(settings.http_retries, 0);
        assert_eq!(settings.log_format, LogFormat::Text);
        assert!(settings.openai_api_key.is_none());
    });
}

#[test]
#[serial]
fn file_values_and_env_expansion() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "brochure.yaml",
        r#"
openai_api_key: "${TEST_BROCHURE_KEY}"
openai_chat_model: "gpt-4o"
max_pages: 3
max_chars_per_page: 1500
log_format: json
"#,
    );

    let mut env = CLEAN_ENV.to_vec();
    env.push(("TEST_BROCHURE_KEY", Some("sk-from-env")));
    temp_env::with_vars(env, || {
        let settings = SettingsLoader::new().with_file(&p).load().expect("load");
        assert_eq!(settings.require_api_key().unwrap(), "sk-from-env");
        assert_eq!(settings.openai_chat_model, "gpt-4o");
        assert_eq!(settings.max_pages, 3);
        assert_eq!(settings.max_chars_per_page, 1500);
        assert_eq!(settings.log_format, LogFormat::Json);
    });
}

#[test]
#[serial]
fn legacy_names_override_file_and_prefixed_names_override_both() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "brochure.yaml", "max_pages: 3\n");

    let mut env = CLEAN_ENV.to_vec();
    env.retain(|(k, _)| *k != "MAX_PAGES" && *k != "OPENAI_API_KEY");
    env.push(("MAX_PAGES", Some("4")));
    env.push(("OPENAI_API_KEY", Some("sk-legacy")));
    temp_env::with_vars(env.clone(), || {
        let settings = SettingsLoader::new().with_file(&p).load().expect("load");
        assert_eq!(settings.max_pages, 4);
        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-legacy"));
    });

    env.retain(|(k, _)| *k != "BROCHURE__MAX_PAGES");
    env.push(("BROCHURE__MAX_PAGES", Some("2")));
    temp_env::with_vars(env, || {
        let settings = SettingsLoader::new().with_file(&p).load().expect("load");
        assert_eq!(settings.max_pages, 2);
    });
}

#[test]
#[serial]
fn optional_file_may_be_missing() {
    temp_env::with_vars(CLEAN_ENV, || {
        let settings = SettingsLoader::new()
            .with_optional_file("/definitely/not/here/brochure.yaml")
            .load()
            .expect("missing optional file is fine");
        assert_eq!(settings.max_pages, 5);
    });
}

#[test]
#[serial]
fn required_file_must_exist() {
    temp_env::with_vars(CLEAN_ENV, || {
        let err = SettingsLoader::new()
            .with_file("/definitely/not/here/brochure.yaml")
            .load()
            .unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    });
}

#[test]
#[serial]
fn invalid_limits_fail_the_load() {
    temp_env::with_vars(CLEAN_ENV, || {
        let err = SettingsLoader::new()
            .with_yaml_str("max_chars_per_page: 0")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("max_chars_per_page"));
    });
}
