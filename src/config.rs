use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::list_query::PageSize;

pub const ENV_PREFIX: &str = "UMRAH_ADMIN_";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    const BASE_URL: &str = "http://localhost:8000/api";
    const TIMEOUT_SECS: u64 = 30;

    fn default() -> Self {
        ApiConfig {
            base_url: Self::BASE_URL.to_string(),
            timeout_secs: Self::TIMEOUT_SECS,
        }
    }

    fn ensure_valid(&mut self) {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            eprintln!(
                "Config error: api.base_url is empty - using default of '{}'",
                Self::BASE_URL
            );
            self.base_url = Self::BASE_URL.to_string();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = Self::TIMEOUT_SECS;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub default_page_size: u32,
}

impl ListConfig {
    fn default() -> Self {
        ListConfig {
            default_page_size: PageSize::default().get(),
        }
    }

    fn ensure_valid(&mut self) {
        if PageSize::from_value(self.default_page_size).is_none() {
            eprintln!(
                "Config error: list.default_page_size of {} is not one of 10/25/50/100 - using {}",
                self.default_page_size,
                PageSize::default().get()
            );
            self.default_page_size = PageSize::default().get();
        }
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::from_value(self.default_page_size).unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    const LEVEL: &str = "info";

    fn default() -> Self {
        LoggingConfig {
            level: Self::LEVEL.to_string(),
        }
    }

    fn ensure_valid(&mut self) {
        let original = self.level.clone();
        self.level = self.level.trim().to_ascii_lowercase();
        if !Self::LOG_LEVELS.contains(&self.level.as_str()) {
            eprintln!(
                "Config error: log level of '{}' is invalid - using default of '{}'",
                original,
                Self::LEVEL
            );
            self.level = Self::LEVEL.to_string();
        }
    }

    pub fn tracing_level(&self) -> tracing::Level {
        match self.level.as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub list: ListConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api: ApiConfig::default(),
            list: ListConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "umrah", "umrah-admin")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Defaults, then the TOML file (if any), then `UMRAH_ADMIN_*` variables.
pub fn figment(config_path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_figment(figment(default_config_path().as_deref()))
    }

    /// Malformed sources fall back to defaults rather than failing startup.
    pub fn from_figment(figment: Figment) -> Self {
        let mut config = figment.extract().unwrap_or_else(|err| {
            eprintln!("Could not load configuration: {err}. Using default configuration.");
            AppConfig::default()
        });
        config.ensure_valid();
        config
    }

    fn ensure_valid(&mut self) {
        self.api.ensure_valid();
        self.list.ensure_valid();
        self.logging.ensure_valid();
    }
}
