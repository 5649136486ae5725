// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`ServiceConfig`] loaded from them once at startup. An invalid value stops
//! the process before it starts serving.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind IP (v4 or v6) | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `CHAIN_ID` | Hex chain id mixed into every digest | Scorum mainnet |
//! | `BLOCKCHAIN_RPC_URL` | Blockchain read API (JSON-RPC over HTTP) | `https://prodnet.scorum.com` |
//! | `AUTHORITY_TIMEOUT_MS` | Deadline of one authority lookup | `5000` |
//! | `MAX_REQUEST_SIZE` | Maximum request body in bytes | `25000000` |
//! | `MAX_FOLLOWS` | Follow limit per account | `5000` |
//! | `ADMIN_ACCOUNT` | Account allowed to run admin operations | `admin` |
//! | `MEDIA_BASE_URL` | Prefix of uploaded media URLs | `https://media.scorum.blog` |
//! | `TLS_CERT_PATH` | PEM certificate chain; HTTPS when set with the key | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::digest::{ChainId, ChainIdError, MAINNET_CHAIN_ID};
use crate::store::StoreConfig;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Hex chain id. Decoded once; every digest is bound to it.
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";

pub const BLOCKCHAIN_RPC_URL_ENV: &str = "BLOCKCHAIN_RPC_URL";
pub const AUTHORITY_TIMEOUT_MS_ENV: &str = "AUTHORITY_TIMEOUT_MS";
pub const MAX_REQUEST_SIZE_ENV: &str = "MAX_REQUEST_SIZE";
pub const MAX_FOLLOWS_ENV: &str = "MAX_FOLLOWS";
pub const ADMIN_ACCOUNT_ENV: &str = "ADMIN_ACCOUNT";
pub const MEDIA_BASE_URL_ENV: &str = "MEDIA_BASE_URL";

/// Both TLS variables must be set to serve HTTPS.
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BLOCKCHAIN_RPC_URL: &str = "https://prodnet.scorum.com";
pub const DEFAULT_AUTHORITY_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 25_000_000;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid CHAIN_ID: {0}")]
    ChainId(#[from] ChainIdError),

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected json or pretty, got {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Immutable service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub chain_id: ChainId,
    pub blockchain_rpc_url: String,
    pub authority_timeout: Duration,
    pub max_request_size: usize,
    pub store: StoreConfig,
    pub tls: Option<TlsConfig>,
    pub log_format: LogFormat,
}

fn parse<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let ip: IpAddr = parse(HOST_ENV, lookup(HOST_ENV), DEFAULT_HOST)?;
        let port: u16 = parse(PORT_ENV, lookup(PORT_ENV), DEFAULT_PORT)?;
        let bind_addr = SocketAddr::new(ip, port);

        let chain_id = ChainId::from_hex(
            &lookup(CHAIN_ID_ENV).unwrap_or_else(|| MAINNET_CHAIN_ID.to_string()),
        )?;

        let timeout_ms: u64 = parse(
            AUTHORITY_TIMEOUT_MS_ENV,
            lookup(AUTHORITY_TIMEOUT_MS_ENV),
            DEFAULT_AUTHORITY_TIMEOUT.as_millis() as u64,
        )?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: AUTHORITY_TIMEOUT_MS_ENV,
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let defaults = StoreConfig::default();
        let store = StoreConfig {
            max_follows: parse(MAX_FOLLOWS_ENV, lookup(MAX_FOLLOWS_ENV), defaults.max_follows)?,
            admin_account: lookup(ADMIN_ACCOUNT_ENV).unwrap_or(defaults.admin_account),
            media_base_url: lookup(MEDIA_BASE_URL_ENV)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.media_base_url),
            notifications_limit: defaults.notifications_limit,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        Ok(Self {
            bind_addr,
            chain_id,
            blockchain_rpc_url: lookup(BLOCKCHAIN_RPC_URL_ENV)
                .unwrap_or_else(|| DEFAULT_BLOCKCHAIN_RPC_URL.to_string()),
            authority_timeout: Duration::from_millis(timeout_ms),
            max_request_size: parse(
                MAX_REQUEST_SIZE_ENV,
                lookup(MAX_REQUEST_SIZE_ENV),
                DEFAULT_MAX_REQUEST_SIZE,
            )?,
            store,
            tls,
            log_format: parse(LOG_FORMAT_ENV, lookup(LOG_FORMAT_ENV), LogFormat::Pretty)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::auth::digest::TESTNET_CHAIN_ID;

    fn load(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.chain_id, ChainId::mainnet());
        assert_eq!(config.authority_timeout, Duration::from_secs(5));
        assert_eq!(config.max_request_size, 25_000_000);
        assert_eq!(config.store.max_follows, 5000);
        assert_eq!(config.store.admin_account, "admin");
        assert_eq!(config.tls, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (CHAIN_ID_ENV, TESTNET_CHAIN_ID),
            (AUTHORITY_TIMEOUT_MS_ENV, "250"),
            (MAX_FOLLOWS_ENV, "10"),
            (MEDIA_BASE_URL_ENV, "https://cdn.example/"),
            (TLS_CERT_PATH_ENV, "/tls/cert.pem"),
            (TLS_KEY_PATH_ENV, "/tls/key.pem"),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.chain_id, ChainId::from_hex(TESTNET_CHAIN_ID).unwrap());
        assert_eq!(config.authority_timeout, Duration::from_millis(250));
        assert_eq!(config.store.max_follows, 10);
        assert_eq!(config.store.media_base_url, "https://cdn.example");
        assert_eq!(config.tls.unwrap().key_path, PathBuf::from("/tls/key.pem"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn ipv6_host() {
        let config = load(&[(HOST_ENV, "::"), (PORT_ENV, "9000")]).unwrap();
        assert_eq!(config.bind_addr, "[::]:9000".parse().unwrap());

        let config = load(&[(HOST_ENV, "::1")]).unwrap();
        assert_eq!(config.bind_addr, "[::1]:8080".parse().unwrap());
    }

    #[test]
    fn invalid_values_fail() {
        assert!(matches!(load(&[(CHAIN_ID_ENV, "xyz")]), Err(ConfigError::ChainId(_))));
        assert!(matches!(
            load(&[(HOST_ENV, "localhost:80")]),
            Err(ConfigError::Invalid { name: HOST_ENV, .. })
        ));
        assert!(matches!(
            load(&[(PORT_ENV, "http")]),
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(AUTHORITY_TIMEOUT_MS_ENV, "0")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(load(&[(LOG_FORMAT_ENV, "xml")]), Err(ConfigError::Invalid { .. })));
        assert!(matches!(
            load(&[(TLS_CERT_PATH_ENV, "/tls/cert.pem")]),
            Err(ConfigError::PartialTls)
        ));
    }
}
