use crate::constants::{
    CONSOLE_PATH, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, LOGIN_PATH,
};
use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;
use tracing::error;

/// One portal account and the machines leased under it.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub password: String,
    #[serde(rename = "machines")]
    pub machine_ids: Vec<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Profile>),
    One(Profile),
}

impl From<OneOrMany> for Vec<Profile> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(profiles) => profiles,
            OneOrMany::One(profile) => vec![profile],
        }
    }
}

/// Where the portal lives and how requests to it are shaped.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let machines = self
            .machine_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let username = serde_json::to_string(&self.username).map_err(|_| fmt::Error)?;
        write!(
            f,
            "{{\"username\":{},\"password\":\"[REDACTED]\",\"machines\":[{}]}}",
            username, machines
        )
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("machine_ids", &self.machine_ids)
            .finish()
    }
}

impl fmt::Display for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout_secs\":{}}}",
            self.base_url, self.timeout_secs
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

/// Parses profiles given on the command line: a single object or an array.
pub fn parse_profiles(raw: &str) -> Result<Vec<Profile>, ConfigError> {
    let parsed: OneOrMany = serde_json::from_str(raw.trim())?;
    Ok(parsed.into())
}

/// Parses the `FC_PROFILES` value. Anything not already an array is wrapped in
/// brackets first, so `{..},{..}` is accepted as well as a lone object.
pub fn parse_env_profiles(raw: &str) -> Result<Vec<Profile>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Missing);
    }
    let wrapped = if trimmed.starts_with('[') {
        trimmed.to_string()
    } else {
        format!("[{}]", trimmed)
    };
    Ok(serde_json::from_str(&wrapped)?)
}

/// Picks the profile source: the command line wins, `FC_PROFILES` is the fallback.
/// Empty values count as absent.
pub fn resolve_profiles(
    cli_value: Option<&str>,
    env_value: Option<&str>,
) -> Result<Vec<Profile>, ConfigError> {
    match (cli_value, env_value) {
        (Some(raw), _) if !raw.trim().is_empty() => parse_profiles(raw),
        (_, Some(raw)) => parse_env_profiles(raw),
        _ => Err(ConfigError::Missing),
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalConfig {
    pub fn new() -> Self {
        PortalConfig {
            base_url: get_env_or_default("FC_BASE_URL", String::from(DEFAULT_BASE_URL)),
            timeout_secs: get_env_or_default("FC_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            user_agent: get_env_or_default("FC_USER_AGENT", String::from(DEFAULT_USER_AGENT)),
        }
    }

    /// Same defaults as [`PortalConfig::new`] pointed at another host.
    pub fn with_base_url(base_url: &str) -> Self {
        PortalConfig {
            base_url: base_url.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidValue(format!("base url {}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue(format!(
                "base url {} must be http or https",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin(), path)
    }

    pub fn login_url(&self) -> String {
        self.url(LOGIN_PATH)
    }

    pub fn console_url(&self) -> String {
        self.url(CONSOLE_PATH)
    }
}
