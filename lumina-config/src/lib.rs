//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Settings merge three sources, later wins: built-in defaults, an optional
//! YAML file, and `LUMINA_`-prefixed environment variables (`__` as the
//! nesting separator, e.g. `LUMINA_PROVIDERS__GROQ_API_KEY`). String values
//! may reference other environment variables with `${VAR}` placeholders.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level runtime configuration for the Lumina service.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub providers: ProviderSettings,
    #[serde(default)]
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Credentials and model names for the four external providers.
///
/// All four credentials are required; [`Settings::validate`] rejects a
/// configuration that leaves any of them empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub groq_api_key: String,
    #[serde(default)]
    pub tavily_api_key: String,
    #[serde(default)]
    pub mistral_api_key: String,
    #[serde(default)]
    pub google_api_key: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_ocr_model")]
    pub ocr_model: String,
}

/// Tunable caps. Defaults match the documented service contract.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_cache_capacity")]
    pub search_cache_capacity: usize,
    #[serde(default = "default_batch_cap")]
    pub batch_claim_cap: usize,
    #[serde(default = "default_video_max_bytes")]
    pub video_max_bytes: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            search_cache_capacity: default_cache_capacity(),
            batch_claim_cap: default_batch_cap(),
            video_max_bytes: default_video_max_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}
fn default_chat_model() -> String {
    "gemma2-9b-it".into()
}
fn default_vision_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_ocr_model() -> String {
    "mistral-ocr-latest".into()
}
fn default_cache_capacity() -> usize {
    50
}
fn default_batch_cap() -> usize {
    10
}
fn default_video_max_bytes() -> usize {
    15 * 1024 * 1024
}

impl Settings {
    /// Ensure every required provider credential is present.
    ///
    /// Returns a single error naming all missing keys so operators fix the
    /// environment in one pass instead of replaying startup per key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("providers.groq_api_key", &self.providers.groq_api_key),
            ("providers.tavily_api_key", &self.providers.tavily_api_key),
            ("providers.mistral_api_key", &self.providers.mistral_api_key),
            ("providers.google_api_key", &self.providers.google_api_key),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| *k)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(format!(
                "missing required credentials: {}",
                missing.join(", ")
            )))
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
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
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct SettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Start with sensible defaults: `LUMINA_` env overrides always apply.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(
            Environment::with_prefix("LUMINA")
                .prefix_separator("_")
                .separator("__"),
        );
        Self { builder }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    /// Missing files are tolerated so env-only deployments work.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use lumina_config::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// providers:
    ///   groq_api_key: "a"
    ///   tavily_api_key: "b"
    ///   mistral_api_key: "c"
    ///   google_api_key: "d"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(settings.server.port, 8000);
    /// assert!(settings.validate().is_ok());
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded recursively (depth-capped, so
    /// cyclic definitions terminate) before the strongly typed structs are
    /// materialised.
    pub fn load(self) -> Result<Settings, ConfigError> {
        let cfg = self.builder.build()?;

        // Through serde_json::Value first so env expansion sees every string.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: Settings =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
