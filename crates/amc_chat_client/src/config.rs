//! Client config load/save for `~/.amc-chat/config.yaml`.
//! Sections: `server.*` (where the API lives), `chat.*`, `voice.*`.

use std::path::{Path, PathBuf};

use crate::client::{resolve_base_url, DEFAULT_PORT};
use crate::locale::Language;

/// Server section (host, port, base_url).
///
/// `host` is the machine the client runs on; the API is expected on the same
/// host. `base_url` overrides both when set.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Chat section (initial language).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

/// Voice section (speech-to-text command, `{locale}` is substituted).
///
/// The command is split on whitespace only; quotes are not interpreted, so an
/// argument containing spaces needs a wrapper script.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VoiceSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// Full client config.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub chat: ChatSection,
    #[serde(default)]
    pub voice: VoiceSection,
}

impl Config {
    /// API base URL: explicit `base_url`, else derived from host and port.
    pub fn base_url(&self) -> String {
        if let Some(url) = self.server.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return url.trim().to_string();
        }
        let host = self.server.host.as_deref().unwrap_or("localhost");
        resolve_base_url(host, self.server.port.unwrap_or(DEFAULT_PORT))
    }

    pub fn language(&self) -> Language {
        self.chat.language.unwrap_or_default()
    }
}

/// Where `amc-chat` looks for its config when no path is given:
/// `.amc-chat/config.yaml` under the user's home directory.
pub fn default_config_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".amc-chat").join("config.yaml"))
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Load config, treating a missing file as the default config.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load(path)
    } else {
        Ok(Config::default())
    }
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
