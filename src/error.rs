/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/
use std::fmt;
use std::fmt::{Display, Formatter};

/// Problems with the profile input. Always fatal, raised before any request.
#[derive(Debug)]
pub enum ConfigError {
    Missing,
    InvalidJson(serde_json::Error),
    InvalidValue(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing => write!(f, "no profiles provided via --config or FC_PROFILES"),
            ConfigError::InvalidJson(e) => write!(f, "invalid profile json: {e}"),
            ConfigError::InvalidValue(msg) => write!(f, "invalid configuration value: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidJson(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::InvalidJson(e)
    }
}

/// Login failures. Recovered per profile: the profile is skipped.
#[derive(Debug)]
pub enum AuthError {
    Network(reqwest::Error),
    Rejected,
    Console(reqwest::Error),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Network(e) => write!(f, "login request failed: {e}"),
            AuthError::Rejected => write!(f, "login rejected, check username and password"),
            AuthError::Console(e) => write!(f, "console page unreachable after login: {e}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Network(e) | AuthError::Console(e) => Some(e),
            AuthError::Rejected => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Network(e)
    }
}

/// Per-machine failures that do not stop the run.
#[derive(Debug)]
pub enum RenewError {
    Transport(reqwest::Error),
    Malformed {
        body: String,
        source: serde_json::Error,
    },
}

impl Display for RenewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RenewError::Transport(e) => write!(f, "renewal request failed: {e}"),
            RenewError::Malformed { source, .. } => {
                write!(f, "unexpected renewal response body: {source}")
            }
        }
    }
}

impl std::error::Error for RenewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenewError::Transport(e) => Some(e),
            RenewError::Malformed { source, .. } => Some(source),
        }
    }
}

impl From<reqwest::Error> for RenewError {
    fn from(e: reqwest::Error) -> Self {
        RenewError::Transport(e)
    }
}

/// Errors that abort the whole run.
#[derive(Debug)]
pub enum RunError {
    UnrecognizedMessage { machine_id: u64, message: String },
    Client(anyhow::Error),
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RunError::UnrecognizedMessage { machine_id, message } => write!(
                f,
                "unrecognized renewal response for machine {machine_id}: {message}"
            ),
            RunError::Client(e) => write!(f, "http client error: {e:#}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<anyhow::Error> for RunError {
    fn from(e: anyhow::Error) -> Self {
        RunError::Client(e)
    }
}
