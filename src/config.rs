use crate::logging::{get_logger, LogCategory};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable carrying the generation-service API key.
///
/// The key is read from the environment only and never persisted into the
/// config file on disk.
pub const API_KEY_ENV: &str = "SHELLSPEAK_API_KEY";

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // Safe default: show the generated command instead of running it
    #[serde(default = "default_auto_execute")]
    pub auto_execute: bool,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,

    #[serde(default = "default_backoff_cap_secs")]
    pub backoff_cap_secs: u64,
}

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_auto_execute() -> bool {
    false
}

fn default_request_timeout() -> u64 {
    30000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_secs() -> u64 {
    4
}

fn default_backoff_cap_secs() -> u64 {
    10
}

impl Config {
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        if let Some(path) = &config_path {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(path) {
                    match serde_json::from_str::<Config>(&content) {
                        Ok(config) => {
                            if let Err(e) = Self::validate_config(&config) {
                                eprintln!(
                                    "Warning: Invalid configuration detected: {}. Using defaults.",
                                    e
                                );
                                return Self::create_default_config(config_path.clone());
                            }
                            return config;
                        }
                        Err(e) => {
                            eprintln!(
                                "Warning: Failed to parse configuration: {}. Recreating with defaults.",
                                e
                            );
                            return Self::create_default_config(config_path.clone());
                        }
                    }
                }
            }
        }

        Self::create_default_config(config_path)
    }

    fn create_default_config(config_path: Option<PathBuf>) -> Self {
        let default_config = Self {
            model: default_model(),
            api_url: default_api_url(),
            temperature: default_temperature(),
            auto_execute: default_auto_execute(),
            request_timeout_ms: default_request_timeout(),
            max_attempts: default_max_attempts(),
            backoff_base_secs: default_backoff_base_secs(),
            backoff_cap_secs: default_backoff_cap_secs(),
        };

        if let Some(path) = config_path {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                let _ = fs::write(
                    path,
                    serde_json::to_string_pretty(&default_config).unwrap_or_default(),
                );
            }
        }

        default_config
    }

    fn validate_config(config: &Config) -> Result<()> {
        if config.model.trim().is_empty() {
            return Err(anyhow!("model name cannot be empty"));
        }

        if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
            return Err(anyhow!("api_url must be a valid HTTP/HTTPS URL"));
        }

        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(anyhow!("temperature must be between 0.0 and 2.0"));
        }

        if config.request_timeout_ms == 0 {
            return Err(anyhow!("request_timeout_ms must be greater than 0"));
        }

        if config.request_timeout_ms > 600000 {
            return Err(anyhow!("request_timeout_ms cannot exceed 10 minutes (600000ms)"));
        }

        if config.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be at least 1"));
        }

        if config.backoff_base_secs > config.backoff_cap_secs {
            return Err(anyhow!("backoff_base_secs cannot exceed backoff_cap_secs"));
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        Self::validate_config(self)?;

        let config_path =
            Self::get_config_path().ok_or_else(|| anyhow!("Could not find config directory"))?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        if let Ok(logger) = get_logger() {
            if let Ok(logger_guard) = logger.lock() {
                let _ = logger_guard.log_info(
                    LogCategory::Configuration,
                    "Configuration saved successfully",
                );
            }
        }

        Ok(())
    }

    /// API key for the generation service, taken from the environment.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
    }

    /// Display the current configuration in a user-friendly format
    pub fn display(&self) {
        println!("Shellspeak Configuration:");
        println!("Model: {}", self.model);
        println!("API URL: {}", self.api_url);
        println!("Temperature: {}", self.temperature);
        println!(
            "Auto-execute: {}",
            if self.auto_execute { "enabled" } else { "disabled" }
        );
        println!("Request timeout: {}ms", self.request_timeout_ms);
        println!(
            "Retry policy: {} attempts, backoff {}s-{}s",
            self.max_attempts, self.backoff_base_secs, self.backoff_cap_secs
        );
        println!(
            "API key ({}): {}",
            API_KEY_ENV,
            if self.api_key().is_some() { "********" } else { "not set" }
        );
    }

    fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("shellspeak");
            path.push("config.json");
            path
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            model: "test-model".to_string(),
            api_url: "https://api.example.com/v1/chat/completions".to_string(),
            temperature: 0.2,
            auto_execute: false,
            request_timeout_ms: 30000,
            max_attempts: 3,
            backoff_base_secs: 4,
            backoff_cap_secs: 10,
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = Config::create_default_config(None);

        assert_eq!(config.model, "llama3-8b-8192");
        assert_eq!(config.temperature, 0.2);
        assert!(!config.auto_execute);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff_base_secs, 4);
        assert_eq!(config.backoff_cap_secs, 10);
    }

    #[test]
    fn test_config_validation_valid() {
        let config = create_test_config();
        assert!(Config::validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = create_test_config();
        config.model = "".to_string();

        let result = Config::validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("model name cannot be empty"));
    }

    #[test]
    fn test_config_validation_invalid_url() {
        let mut config = create_test_config();
        config.api_url = "not-a-url".to_string();

        assert!(Config::validate_config(&config).is_err());
    }

    #[test]
    fn test_config_validation_zero_attempts() {
        let mut config = create_test_config();
        config.max_attempts = 0;

        assert!(Config::validate_config(&config).is_err());
    }

    #[test]
    fn test_config_validation_backoff_ordering() {
        let mut config = create_test_config();
        config.backoff_base_secs = 20;
        config.backoff_cap_secs = 10;

        assert!(Config::validate_config(&config).is_err());
    }

    #[test]
    fn test_serde_defaults() {
        // Missing fields pick up defaults when deserializing.
        let json = r#"{ "model": "custom" }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.model, "custom");
        assert_eq!(config.api_url, default_api_url());
        assert_eq!(config.temperature, 0.2);
        assert!(!config.auto_execute);
        assert_eq!(config.backoff_cap_secs, 10);
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = create_test_config();
        let json = serde_json::to_string_pretty(&config).unwrap();

        assert!(!json.contains("api_key"));
        assert!(!json.contains(API_KEY_ENV));
    }
}
