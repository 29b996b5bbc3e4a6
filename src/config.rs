use std::{env, fmt, fs, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::errors::CustomError;

pub const DEFAULT_PLANNER_URL: &str = "https://api.brianknows.org";

/// The ENS controller rejects a registration until its commitment has aged
/// past the contract's minimum commitment age.
pub const DEFAULT_ENS_COMMIT_DELAY: Duration = Duration::from_secs(60);

/// Raw construction parameters; every field may be absent.
#[derive(Clone, Debug, Default)]
pub struct ConfigParams {
    pub planner_api_key: Option<String>,
    pub planner_base_url: Option<String>,
    pub custody_api_key_name: Option<String>,
    pub custody_api_key_private_key: Option<String>,
    pub custody_key_file: Option<PathBuf>,
    pub custody_options: CustodyOptions,
    pub ens_commit_delay: Option<Duration>,
    pub faucet_url: Option<String>,
    pub port: Option<u16>,
}

/// Options passed through to the custody adapter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustodyOptions {
    pub use_server_signer: bool,
    pub debugging: bool,
    pub base_path: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub enum CustodyCredentials {
    ApiKey(ApiKeyPair),
    File(PathBuf),
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyPair {
    pub name: String,
    pub private_key: String,
}

impl fmt::Debug for ApiKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyPair")
            .field("name", &self.name)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for CustodyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustodyCredentials::ApiKey(pair) => f.debug_tuple("ApiKey").field(pair).finish(),
            CustodyCredentials::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl CustodyCredentials {
    /// Load the key pair, reading the credentials file when needed.
    pub fn resolve(&self) -> Result<ApiKeyPair, CustomError> {
        match self {
            CustodyCredentials::ApiKey(pair) => Ok(pair.clone()),
            CustodyCredentials::File(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    CustomError::ConfigError(format!(
                        "failed to read credentials file {}: {e}",
                        path.display()
                    ))
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    CustomError::ConfigError(format!(
                        "malformed credentials file {}: {e}",
                        path.display()
                    ))
                })
            }
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub planner_api_key: String,
    pub planner_base_url: String,
    pub custody_credentials: CustodyCredentials,
    pub custody_options: CustodyOptions,
    pub ens_commit_delay: Duration,
    pub faucet_url: Option<String>,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("planner_api_key", &"<redacted>")
            .field("planner_base_url", &self.planner_base_url)
            .field("custody_credentials", &self.custody_credentials)
            .field("custody_options", &self.custody_options)
            .field("ens_commit_delay", &self.ens_commit_delay)
            .field("faucet_url", &self.faucet_url)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    pub fn new(params: ConfigParams) -> Result<Self, CustomError> {
        let planner_api_key = non_blank(params.planner_api_key)
            .ok_or_else(|| CustomError::ConfigError("planner API key is required".to_string()))?;

        let key_pair = match (
            non_blank(params.custody_api_key_name),
            non_blank(params.custody_api_key_private_key),
        ) {
            (Some(name), Some(private_key)) => Some(ApiKeyPair { name, private_key }),
            _ => None,
        };
        let custody_credentials = match (key_pair, params.custody_key_file) {
            (Some(pair), _) => CustodyCredentials::ApiKey(pair),
            (None, Some(path)) if !path.as_os_str().is_empty() => CustodyCredentials::File(path),
            _ => {
                return Err(CustomError::ConfigError(
                    "custody credentials require either an API key name and private key or a key file path"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            planner_api_key,
            planner_base_url: non_blank(params.planner_base_url)
                .unwrap_or_else(|| DEFAULT_PLANNER_URL.to_string()),
            custody_credentials,
            custody_options: params.custody_options,
            ens_commit_delay: params.ens_commit_delay.unwrap_or(DEFAULT_ENS_COMMIT_DELAY),
            faucet_url: non_blank(params.faucet_url),
            port: params.port.unwrap_or(8080),
        })
    }

    pub fn from_env() -> Result<Self, CustomError> {
        let ens_commit_delay = match env::var("ENS_COMMIT_DELAY_SECS").ok() {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
                CustomError::ConfigError(format!("invalid ENS_COMMIT_DELAY_SECS: {raw}"))
            })?)),
            None => None,
        };
        let port = match env::var("PORT").ok() {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| CustomError::ConfigError(format!("invalid PORT: {raw}")))?,
            ),
            None => None,
        };

        Self::new(ConfigParams {
            planner_api_key: env::var("PLANNER_API_KEY").ok(),
            planner_base_url: env::var("PLANNER_API_URL").ok(),
            custody_api_key_name: env::var("CUSTODY_API_KEY_NAME").ok(),
            custody_api_key_private_key: env::var("CUSTODY_API_KEY_PRIVATE_KEY").ok(),
            custody_key_file: env::var("CUSTODY_KEY_FILE").ok().map(PathBuf::from),
            custody_options: CustodyOptions {
                use_server_signer: env_flag("CUSTODY_USE_SERVER_SIGNER"),
                debugging: env_flag("CUSTODY_DEBUGGING"),
                base_path: env::var("CUSTODY_BASE_PATH").ok(),
            },
            ens_commit_delay,
            faucet_url: env::var("FAUCET_URL").ok(),
            port,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
