use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const DEFAULT_API_URL: &str = "https://www.boredapi.com/api/activity";
const DEFAULT_DATABASE: &str = "activities.db";

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiConfig,
    #[serde(default)]
    storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiConfig {
    url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StorageConfig {
    database: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    /// SQLite file. Embedded in a `sqlite:` URL, so it must not contain
    /// `?`, `#` or `%`.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        ConfigFile::default().into()
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            api_url: file.api.url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            database_path: file
                .storage
                .database
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
                .into(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config_file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config_file.into())
    }

    /// An explicit path must exist; otherwise `config.toml` is used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
