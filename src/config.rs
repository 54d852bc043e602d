// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`Config`] loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET_FILE` | File holding the HMAC secret (secret store mount) | - |
//! | `JWT_SECRET` | HMAC secret, used when no secret file is configured | Required without file |
//! | `JWT_ISSUER` | Value of the `iss` claim on issued tokens | `nginx` |
//! | `JWT_VALIDITY_SECS` | Seconds added to issuance time for `exp` | `600` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain; enables HTTPS with `TLS_KEY_PATH` | - |
//! | `TLS_KEY_PATH` | PEM private key | - |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{
    env, fmt, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

/// Environment variable naming a file that contains the signing secret.
///
/// Preferred over [`JWT_SECRET_ENV`] so the secret can come from a mounted
/// secret store instead of the process environment. A single trailing
/// newline is stripped.
pub const JWT_SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";

/// Environment variable holding the signing secret inline.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable for the `iss` claim.
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";

/// Environment variable for the token validity window in seconds.
pub const JWT_VALIDITY_SECS_ENV: &str = "JWT_VALIDITY_SECS";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_ISSUER: &str = "nginx";
pub const DEFAULT_VALIDITY_SECS: u64 = 600;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no signing secret configured (set JWT_SECRET_FILE or JWT_SECRET)")]
    MissingSecret,
    #[error("signing secret is empty")]
    EmptySecret,
    #[error("failed to read secret file {}: {source}", path.display())]
    SecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JWT_VALIDITY_SECS must be a positive number of seconds, got {0:?}")]
    InvalidValidity(String),
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

/// Secret and claim settings shared by issuance and validation.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: Vec<u8>,
    pub issuer: String,
    pub validity: Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("validity", &self.validity)
            .finish()
    }
}

/// PEM files for serving HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON output; anything else is pretty.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::from_value(env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tokens: TokenSettings,
    pub bind: SocketAddr,
    pub tls: Option<TlsPaths>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match lookup(JWT_SECRET_FILE_ENV) {
            Some(path) => read_secret_file(Path::new(&path))?,
            None => lookup(JWT_SECRET_ENV)
                .ok_or(ConfigError::MissingSecret)?
                .into_bytes(),
        };
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let issuer = lookup(JWT_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let validity = match lookup(JWT_VALIDITY_SECS_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidValidity(raw)),
            },
            None => Duration::from_secs(DEFAULT_VALIDITY_SECS),
        };

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let bind_str = format!("{host}:{port}");
        let bind = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(bind_str))?;

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            tokens: TokenSettings {
                secret,
                issuer,
                validity,
            },
            bind,
            tls,
        })
    }
}

fn read_secret_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let mut secret = fs::read(path).map_err(|source| ConfigError::SecretFile {
        path: path.to_path_buf(),
        source,
    })?;

    if secret.ends_with(b"\n") {
        secret.pop();
        if secret.ends_with(b"\r") {
            secret.pop();
        }
    }
    Ok(secret)
}
