//! Runtime Configuration
//!
//! `CollectorConfig` tunes the collection pipeline and is read from
//! `SPLIT_COLLECTOR_*` environment variables; `NodeConfig` describes the
//! member a `split-node` process plays and is parsed from its arguments.

use anyhow::Result;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_REQUEST_TIMEOUT_MS: &str = "SPLIT_COLLECTOR_REQUEST_TIMEOUT_MS";
pub const ENV_INITIAL_BACKOFF_MS: &str = "SPLIT_COLLECTOR_INITIAL_BACKOFF_MS";
pub const ENV_MAX_BACKOFF_MS: &str = "SPLIT_COLLECTOR_MAX_BACKOFF_MS";
pub const ENV_MAX_CONNECT_ATTEMPTS: &str = "SPLIT_COLLECTOR_MAX_CONNECT_ATTEMPTS";
/// `0` disables the per-peer deadline.
pub const ENV_PEER_DEADLINE_MS: &str = "SPLIT_COLLECTOR_PEER_DEADLINE_MS";
pub const ENV_SEQUENTIAL: &str = "SPLIT_COLLECTOR_SEQUENTIAL";

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Timeout of a single handshake, ping or find request.
    pub request_timeout: Duration,
    /// Delay after the first failed connection attempt; doubles per attempt.
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// `None` keeps retrying until the peer deadline or cancellation.
    pub max_connect_attempts: Option<u32>,
    /// Upper bound on one peer's connect + query pipeline. `None` waits forever.
    pub peer_deadline: Option<Duration>,
    /// Run peer pipelines concurrently instead of one after another.
    pub concurrent: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(500),
            initial_backoff: Duration::from_millis(150),
            max_backoff: Duration::from_millis(1200),
            max_connect_attempts: None,
            peer_deadline: Some(Duration::from_secs(30)),
            concurrent: true,
        }
    }
}

impl CollectorConfig {
    /// Defaults overridden by whichever `SPLIT_COLLECTOR_*` variables are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64>(&lookup, ENV_REQUEST_TIMEOUT_MS)? {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_INITIAL_BACKOFF_MS)? {
            config.initial_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_MAX_BACKOFF_MS)? {
            config.max_backoff = Duration::from_millis(ms);
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, ENV_MAX_CONNECT_ATTEMPTS)? {
            config.max_connect_attempts = Some(attempts);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_PEER_DEADLINE_MS)? {
            config.peer_deadline = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(sequential) = parse_var::<bool>(&lookup, ENV_SEQUENTIAL)? {
            config.concurrent = !sequential;
        }

        if config.initial_backoff.is_zero() {
            return Err(anyhow::anyhow!(
                "{} must be at least 1ms",
                ENV_INITIAL_BACKOFF_MS
            ));
        }
        if config.max_backoff < config.initial_backoff {
            return Err(anyhow::anyhow!(
                "{} ({:?}) is smaller than {} ({:?})",
                ENV_MAX_BACKOFF_MS,
                config.max_backoff,
                ENV_INITIAL_BACKOFF_MS,
                config.initial_backoff
            ));
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, raw, e)),
        None => Ok(None),
    }
}

/// Identity of one `split-node` process.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub bind: SocketAddr,
    pub self_index: usize,
    /// Every member's endpoint in index order, self included.
    pub members: Vec<SocketAddr>,
}

impl NodeConfig {
    /// Parses `--bind <addr:port> --self-index <n> --member <addr:port>...`
    /// (arguments after the program name).
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut bind: Option<SocketAddr> = None;
        let mut self_index: Option<usize> = None;
        let mut members: Vec<SocketAddr> = vec![];

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    bind = Some(flag_value(args, i)?.parse()?);
                    i += 2;
                }
                "--self-index" => {
                    self_index = Some(flag_value(args, i)?.parse()?);
                    i += 2;
                }
                "--member" => {
                    members.push(flag_value(args, i)?.parse()?);
                    i += 2;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument {}", other);
                    i += 1;
                }
            }
        }

        let bind = bind.ok_or_else(|| anyhow::anyhow!("--bind is required"))?;
        let self_index = self_index.ok_or_else(|| anyhow::anyhow!("--self-index is required"))?;
        if members.is_empty() {
            return Err(anyhow::anyhow!("at least one --member is required"));
        }

        Ok(Self {
            bind,
            self_index,
            members,
        })
    }
}

fn flag_value(args: &[String], i: usize) -> Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} expects a value", args[i]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = CollectorConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.request_timeout, Duration::from_millis(500));
        assert_eq!(config.initial_backoff, Duration::from_millis(150));
        assert_eq!(config.max_backoff, Duration::from_millis(1200));
        assert_eq!(config.max_connect_attempts, None);
        assert_eq!(config.peer_deadline, Some(Duration::from_secs(30)));
        assert!(config.concurrent);
    }

    #[test]
    fn test_env_overrides() {
        let config = CollectorConfig::from_lookup(lookup(&[
            (ENV_REQUEST_TIMEOUT_MS, "250"),
            (ENV_MAX_CONNECT_ATTEMPTS, "4"),
            (ENV_PEER_DEADLINE_MS, "0"),
            (ENV_SEQUENTIAL, "true"),
        ]))
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.max_connect_attempts, Some(4));
        assert_eq!(config.peer_deadline, None, "0 disables the deadline");
        assert!(!config.concurrent);
    }

    #[test]
    fn test_env_invalid_value() {
        let result = CollectorConfig::from_lookup(lookup(&[(ENV_INITIAL_BACKOFF_MS, "soon")]));

        let err = result.unwrap_err().to_string();
        assert!(err.contains(ENV_INITIAL_BACKOFF_MS), "{}", err);
    }

    #[test]
    fn test_backoff_bounds_checked() {
        let result = CollectorConfig::from_lookup(lookup(&[
            (ENV_INITIAL_BACKOFF_MS, "500"),
            (ENV_MAX_BACKOFF_MS, "100"),
        ]));

        assert!(result.is_err());
    }

    #[test]
    fn test_zero_initial_backoff_rejected() {
        let result = CollectorConfig::from_lookup(lookup(&[(ENV_INITIAL_BACKOFF_MS, "0")]));

        let err = result.unwrap_err().to_string();
        assert!(err.contains(ENV_INITIAL_BACKOFF_MS), "{}", err);
    }

    #[test]
    fn test_node_config_from_args() {
        let config = NodeConfig::from_args(&args(&[
            "--bind",
            "127.0.0.1:6001",
            "--self-index",
            "1",
            "--member",
            "127.0.0.1:6000",
            "--member",
            "127.0.0.1:6001",
        ]))
        .unwrap();

        assert_eq!(config.bind, "127.0.0.1:6001".parse().unwrap());
        assert_eq!(config.self_index, 1);
        assert_eq!(config.members.len(), 2);
    }

    #[test]
    fn test_node_config_missing_value() {
        let result = NodeConfig::from_args(&args(&["--bind"]));

        assert!(result.is_err());
    }

    #[test]
    fn test_node_config_requires_members() {
        let result =
            NodeConfig::from_args(&args(&["--bind", "127.0.0.1:6000", "--self-index", "0"]));

        assert!(result.unwrap_err().to_string().contains("--member"));
    }
}
