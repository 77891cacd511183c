use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub http: HttpConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    pub listen_addr: String,
    pub dev_mode: bool, // error pages carry diagnostic detail when set
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: String, // "memory" or "http"
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::WebError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| crate::error::WebError::Config(e.to_string()))
    }

    pub fn default() -> Self {
        Self {
            http: HttpConfig {
                listen_addr: "0.0.0.0:8080".to_string(),
                dev_mode: false,
            },
            store: StoreConfig {
                backend: "memory".to_string(),
                base_url: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
