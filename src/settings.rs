use crate::proxmox::error::{ProxmoxError, Result};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.yaml";
pub const DEFAULT_PORT: u16 = 8006;

/// Settings keys that may be replaced by an environment variable.
const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("proxmox_host", "PROXMOX_HOST"),
    ("user", "PROXMOX_USER"),
    ("password", "PROXMOX_PASSWORD"),
    ("verify_ssl", "PROXMOX_VERIFY_SSL"),
    ("token_name", "PROXMOX_TOKEN_NAME"),
    ("token_value", "PROXMOX_TOKEN_VALUE"),
];

/// Raw settings as read from the YAML file, after environment overrides.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub proxmox_host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub verify_ssl: Option<bool>,
    pub port: Option<u16>,
    pub target_node: Option<String>,
    pub storage: Option<String>,
    pub token_name: Option<String>,
    pub token_value: Option<String>,
}

#[derive(Clone, PartialEq)]
pub enum Credentials {
    Password(String),
    ApiToken { name: String, value: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password(_) => f.write_str("Password(***)"),
            Credentials::ApiToken { name, .. } => write!(f, "ApiToken({}=***)", name),
        }
    }
}

/// Fully resolved connection settings for one invocation.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    pub host: String,
    pub user: String,
    pub credentials: Credentials,
    pub verify_ssl: bool,
    pub port: u16,
    pub target_node: Option<String>,
    pub storage: Option<String>,
}

impl Settings {
    /// Reads `path` as YAML and applies overrides from `env`.
    ///
    /// A variable only overrides its key when it is set and non-empty.
    pub fn load<F>(path: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Config::builder().add_source(File::new(path, FileFormat::Yaml).required(true));

        for (key, var) in ENV_OVERRIDES {
            let value = env(var).filter(|v| !v.is_empty());
            s = s.set_override_option(key, value)?;
        }

        Ok(s.build()?.try_deserialize()?)
    }

    pub fn resolve(self) -> Result<ConnectionProfile> {
        let host = non_empty(self.proxmox_host)
            .ok_or_else(|| ProxmoxError::Config("proxmox_host is required".to_string()))?;
        let user = non_empty(self.user)
            .ok_or_else(|| ProxmoxError::Config("user is required".to_string()))?;

        let credentials = match (
            non_empty(self.token_name),
            non_empty(self.token_value),
            non_empty(self.password),
        ) {
            (Some(name), Some(value), _) => Credentials::ApiToken { name, value },
            (_, _, Some(password)) => Credentials::Password(password),
            _ => {
                return Err(ProxmoxError::Config(
                    "password (or token_name and token_value) is required".to_string(),
                ))
            }
        };

        Ok(ConnectionProfile {
            host,
            user,
            credentials,
            verify_ssl: self.verify_ssl.unwrap_or(true),
            port: self.port.unwrap_or(DEFAULT_PORT),
            target_node: non_empty(self.target_node),
            storage: non_empty(self.storage),
        })
    }
}

impl ConnectionProfile {
    pub fn target_node(&self) -> Result<&str> {
        self.target_node
            .as_deref()
            .ok_or_else(|| ProxmoxError::Config("target_node is not configured".to_string()))
    }

    pub fn storage(&self) -> Result<&str> {
        self.storage
            .as_deref()
            .ok_or_else(|| ProxmoxError::Config("storage is not configured".to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
