//! Process-wide settings for the brochure service.
//!
//! [`Settings`] is read once at startup and then shared read-only (usually as
//! `Arc<Settings>`) with every component that needs a limit, a model name or
//! a credential. [`SettingsLoader`] hides the `config` crate wiring.
//!
//! Precedence, lowest to highest:
//!
//! 1. built-in defaults
//! 2. YAML files added with [`SettingsLoader::with_file`] / [`SettingsLoader::with_optional_file`]
//! 3. inline YAML added with [`SettingsLoader::with_yaml_str`]
//! 4. flat legacy variables: `OPENAI_API_KEY`, `OPENAI_CHAT_MODEL`, `MAX_PAGES`, `MAX_CHARS_PER_PAGE`
//! 5. `BROCHURE__`-prefixed variables, e.g. `BROCHURE__MAX_PAGES=3`
//!
//! String values may reference other variables as `${VAR}`; references are
//! expanded after merging.
use brochure_common::observability::LogFormat;
use brochure_common::{BrochureError, Result};
use config::{Config, Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Variables honoured without the `BROCHURE__` prefix.
const LEGACY_ENV_KEYS: [&str; 4] = [
    "OPENAI_API_KEY",
    "OPENAI_CHAT_MODEL",
    "MAX_PAGES",
    "MAX_CHARS_PER_PAGE",
];

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// OpenAI credential. Optional at load time, required per request.
    pub openai_api_key: Option<String>,
    pub openai_chat_model: String,
    pub openai_base_url: String,
    /// Maximum sub-pages per bundle (the landing page is not counted).
    pub max_pages: usize,
    /// Per-page character cap applied to cleaned text.
    pub max_chars_per_page: usize,
    pub fetch_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    /// Retry budget for outgoing HTTP calls; zero disables retries.
    pub http_retries: usize,
    pub bind_addr: String,
    pub log_format: LogFormat,
    pub log_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_chat_model: DEFAULT_CHAT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            max_pages: 5,
            max_chars_per_page: 2000,
            fetch_timeout_secs: 20,
            llm_timeout_secs: 60,
            http_retries: 0,
            bind_addr: "127.0.0.1:8000".to_string(),
            log_format: LogFormat::Text,
            log_dir: None,
        }
    }
}

impl Settings {
    /// The API credential, or a configuration error when it is absent or blank.
    ///
    /// ```
    /// use brochure_config::Settings;
    ///
    /// let settings = Settings::default();
    /// assert!(settings.require_api_key().is_err());
    ///
    /// let settings = Settings { openai_api_key: Some("sk-test".into()), ..Settings::default() };
    /// assert_eq!(settings.require_api_key().unwrap(), "sk-test");
    /// ```
    pub fn require_api_key(&self) -> Result<&str> {
        match self.openai_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(BrochureError::Configuration(
                "OPENAI_API_KEY is not set. Create a .env file or export it.".to_string(),
            )),
        }
    }

    /// Reject settings no request could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.max_chars_per_page == 0 {
            return Err(BrochureError::Configuration(
                "max_chars_per_page must be greater than zero".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 || self.llm_timeout_secs == 0 {
            return Err(BrochureError::Configuration(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.openai_chat_model.trim().is_empty() {
            return Err(BrochureError::Configuration(
                "openai_chat_model must not be empty".to_string(),
            ));
        }
        Url::parse(&self.openai_base_url).map_err(|e| {
            BrochureError::Configuration(format!(
                "invalid openai_base_url {:?}: {e}",
                self.openai_base_url
            ))
        })?;
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    fn expand_env(&mut self) {
        if let Some(key) = self.openai_api_key.as_mut() {
            *key = expand_env_str(key);
        }
        self.openai_chat_model = expand_env_str(&self.openai_chat_model);
        self.openai_base_url = expand_env_str(&self.openai_base_url);
        self.bind_addr = expand_env_str(&self.bind_addr);
        if let Some(dir) = self.log_dir.as_mut() {
            *dir = expand_env_str(dir);
        }
    }
}

/// Expand `$VAR` / `${VAR}` references, following chains up to a fixed depth.
/// Unknown variables are left as written.
fn expand_env_str(raw: &str) -> String {
    if !raw.contains('$') {
        return raw.to_string();
    }
    let mut cur = raw.to_string();
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        let expanded = match shellexpand::env(&cur) {
            Ok(cow) => cow.into_owned(),
            Err(_) => cur.clone(),
        };
        if expanded == cur {
            break;
        }
        cur = expanded;
    }
    cur
}

fn legacy_env() -> Map<String, String> {
    LEGACY_ENV_KEYS
        .iter()
        .filter_map(|key| {
            std::env::var(key)
                .ok()
                .map(|value| (key.to_ascii_lowercase(), value))
        })
        .collect()
}

/// Builder over the `config` crate: YAML files, inline YAML, environment.
pub struct SettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Start with no sources; environment overlays are added by [`SettingsLoader::load`].
    ///
    /// ```
    /// use brochure_config::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_yaml_str("max_pages: 2\nopenai_chat_model: gpt-4o")
    ///     .load()
    ///     .expect("valid settings");
    ///
    /// assert_eq!(settings.max_pages, 2);
    /// assert_eq!(settings.openai_chat_model, "gpt-4o");
    /// assert_eq!(settings.max_chars_per_page, 2000);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`SettingsLoader::with_file`] but silently skipped when missing, so
    /// deployments can rely purely on environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` references and validate.
    pub fn load(self) -> Result<Settings> {
        let cfg = self
            .builder
            .add_source(Environment::default().source(Some(legacy_env())))
            .add_source(Environment::with_prefix("BROCHURE").separator("__"))
            .build()
            .map_err(|e| BrochureError::Configuration(e.to_string()))?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .map_err(|e| BrochureError::Configuration(e.to_string()))?;
        settings.expand_env();
        settings.validate()?;

        tracing::debug!(
            model = %settings.openai_chat_model,
            max_pages = settings.max_pages,
            max_chars_per_page = settings.max_chars_per_page,
            has_api_key = settings.openai_api_key.is_some(),
            "settings.loaded"
        );
        Ok(settings)
    }
}
