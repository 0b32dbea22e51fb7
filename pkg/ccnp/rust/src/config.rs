// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::warn;
use serde::Deserialize;

use crate::container_id::MOUNTINFO_PATH;

pub const DEFAULT_SOCKET_PATH: &str = "/run/ccnp/uds/ccnp-server.sock";
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

fn default_mountinfo_path() -> PathBuf {
    PathBuf::from(MOUNTINFO_PATH)
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Unix socket the CCNP agent listens on.
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    /// Mount info of the calling process, used to resolve the container ID.
    #[serde(default = "default_mountinfo_path")]
    pub mountinfo_path: PathBuf,
    /// Deadline for one report round trip, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            mountinfo_path: default_mountinfo_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Built-in defaults overridden by `CCNP_SOCKET`, `CCNP_MOUNTINFO` and
    /// `CCNP_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Request deadline. A zero `timeout_ms` falls back to
    /// [`DEFAULT_TIMEOUT_MS`].
    pub fn timeout(&self) -> Duration {
        if self.timeout_ms == 0 {
            warn!("timeout_ms is zero, using {DEFAULT_TIMEOUT_MS}ms");
            return Duration::from_millis(DEFAULT_TIMEOUT_MS);
        }
        Duration::from_millis(self.timeout_ms)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env::var_os("CCNP_SOCKET") {
            self.socket_path = PathBuf::from(path);
        }
        if let Some(path) = env::var_os("CCNP_MOUNTINFO") {
            self.mountinfo_path = PathBuf::from(path);
        }
        if let Ok(value) = env::var("CCNP_TIMEOUT_MS") {
            match value.parse::<u64>() {
                Ok(ms) if ms > 0 => self.timeout_ms = ms,
                _ => warn!("ignoring invalid CCNP_TIMEOUT_MS value {value:?}"),
            }
        }
        self
    }
}

/// Loads the client configuration.
///
/// Values come from the YAML file at `path` when given, then from the
/// environment.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => parse_config(path)?,
        None => ClientConfig::default(),
    };
    let config = config.with_env_overrides();

    if config.timeout_ms == 0 {
        bail!("timeout_ms must be greater than zero");
    }
    Ok(config)
}

fn parse_config(path: &Path) -> Result<ClientConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    // An empty document deserializes as null, which means "all defaults".
    let config: Option<ClientConfig> =
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ENV_VARS: [&str; 3] = ["CCNP_SOCKET", "CCNP_MOUNTINFO", "CCNP_TIMEOUT_MS"];

    fn without_env<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars_unset(ENV_VARS, f)
    }

    #[test]
    fn test_defaults() {
        let config = without_env(ClientConfig::from_env);
        assert_eq!(config.socket_path, Path::new(DEFAULT_SOCKET_PATH));
        assert_eq!(config.mountinfo_path, Path::new("/proc/self/mountinfo"));
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_env_overrides() {
        let config = temp_env::with_vars(
            [
                ("CCNP_SOCKET", Some("/tmp/agent.sock")),
                ("CCNP_MOUNTINFO", Some("/tmp/mountinfo")),
                ("CCNP_TIMEOUT_MS", Some("250")),
            ],
            ClientConfig::from_env,
        );
        assert_eq!(config.socket_path, Path::new("/tmp/agent.sock"));
        assert_eq!(config.mountinfo_path, Path::new("/tmp/mountinfo"));
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_env_timeout_is_ignored() {
        for value in ["soon", "0", "-5"] {
            let config = temp_env::with_var("CCNP_TIMEOUT_MS", Some(value), ClientConfig::from_env);
            assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS, "value {value}");
        }
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = ClientConfig {
            timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccnp.yaml");
        fs::write(
            &path,
            "socket_path: /var/run/ccnp.sock\ntimeout_ms: 3000\n",
        )
        .unwrap();

        let config = without_env(|| load_config(Some(&path))).unwrap();
        assert_eq!(config.socket_path, Path::new("/var/run/ccnp.sock"));
        assert_eq!(config.mountinfo_path, Path::new("/proc/self/mountinfo"));
        assert_eq!(config.timeout_ms, 3000);
    }

    #[test]
    fn test_env_wins_over_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccnp.yaml");
        fs::write(&path, "socket_path: /var/run/ccnp.sock\n").unwrap();

        let config = temp_env::with_var("CCNP_SOCKET", Some("/tmp/other.sock"), || {
            load_config(Some(&path))
        })
        .unwrap();
        assert_eq!(config.socket_path, Path::new("/tmp/other.sock"));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccnp.yaml");
        fs::write(&path, "").unwrap();

        let config = without_env(|| load_config(Some(&path))).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccnp.yaml");
        fs::write(&path, "timeout_ms: 0\n").unwrap();

        assert!(without_env(|| load_config(Some(&path))).is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccnp.yaml");
        fs::write(&path, "timeout_ms: [").unwrap();

        assert!(without_env(|| load_config(Some(&path))).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Some(Path::new("/nonexistent/ccnp.yaml"))).is_err());
    }
}
