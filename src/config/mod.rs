use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::storage::{StorageFormat, UnknownFormat};

const DEFAULT_HH_BASE_URL: &str = "https://api.hh.ru/";
const DEFAULT_HH_USER_AGENT: &str = "job-parser/0.1 (vacancy search)";
const DEFAULT_SJ_BASE_URL: &str = "https://api.superjob.ru/2.0/";
const DEFAULT_JSON_PATH: &str = "saved_vacancies/json_vacancies.json";
const DEFAULT_CSV_PATH: &str = "saved_vacancies/csv_vacancies.csv";

/// Top-level configuration for the tool.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let sources = SourcesConfig {
            headhunter_base_url: env_or("HH_BASE_URL", DEFAULT_HH_BASE_URL),
            headhunter_user_agent: env_or("HH_USER_AGENT", DEFAULT_HH_USER_AGENT),
            superjob_base_url: env_or("SJ_BASE_URL", DEFAULT_SJ_BASE_URL),
            superjob_api_key: env::var("SJ_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
        };

        let default_format = env_or("VACANCY_STORAGE_FORMAT", "json")
            .parse::<StorageFormat>()
            .map_err(|source| ConfigError::InvalidStorageFormat { source })?;

        let storage = StorageConfig {
            json_path: PathBuf::from(env_or("VACANCY_JSON_PATH", DEFAULT_JSON_PATH)),
            csv_path: PathBuf::from(env_or("VACANCY_CSV_PATH", DEFAULT_CSV_PATH)),
            default_format,
        };

        let log_level = env_or("APP_LOG_LEVEL", "info");

        Ok(Self {
            sources,
            storage,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Endpoints and credentials for the job platforms.
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub headhunter_base_url: String,
    pub headhunter_user_agent: String,
    pub superjob_base_url: String,
    pub superjob_api_key: Option<String>,
}

/// Where saved vacancies live and which encoding new saves use.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub default_format: StorageFormat,
}

impl StorageConfig {
    pub fn path_for(&self, format: StorageFormat) -> &PathBuf {
        match format {
            StorageFormat::Json => &self.json_path,
            StorageFormat::Csv => &self.csv_path,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidStorageFormat { source: UnknownFormat },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidStorageFormat { source } => {
                write!(f, "VACANCY_STORAGE_FORMAT is invalid: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidStorageFormat { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "HH_BASE_URL",
            "HH_USER_AGENT",
            "SJ_BASE_URL",
            "SJ_API_KEY",
            "VACANCY_JSON_PATH",
            "VACANCY_CSV_PATH",
            "VACANCY_STORAGE_FORMAT",
            "APP_LOG_LEVEL",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.sources.headhunter_base_url, "https://api.hh.ru/");
        assert_eq!(config.sources.superjob_base_url, "https://api.superjob.ru/2.0/");
        assert!(config.sources.superjob_api_key.is_none());
        assert_eq!(config.storage.default_format, StorageFormat::Json);
        assert_eq!(
            config.storage.path_for(StorageFormat::Csv),
            &PathBuf::from("saved_vacancies/csv_vacancies.csv")
        );
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_overrides_and_ignores_blank_api_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VACANCY_STORAGE_FORMAT", "CSV");
        env::set_var("VACANCY_JSON_PATH", "/tmp/vacancies.json");
        env::set_var("SJ_API_KEY", "   ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.storage.default_format, StorageFormat::Csv);
        assert_eq!(config.storage.json_path, PathBuf::from("/tmp/vacancies.json"));
        assert!(config.sources.superjob_api_key.is_none());

        env::set_var("SJ_API_KEY", "v3.r.key");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.sources.superjob_api_key.as_deref(), Some("v3.r.key"));
        reset_env();
    }

    #[test]
    fn rejects_unknown_storage_format() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VACANCY_STORAGE_FORMAT", "xml");
        let err = AppConfig::load().expect_err("xml is not a format");
        assert!(err.to_string().contains("VACANCY_STORAGE_FORMAT"));
        reset_env();
    }
}
