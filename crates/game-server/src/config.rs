use std::path::Path;

use anyhow::{Context, Result};

use crate::args::Args;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub sessions: Sessions,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Server {
    #[serde(default = "defaults::host")]
    pub host: String,
    #[serde(default = "defaults::port")]
    pub port: u16,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Sessions {
    #[serde(default = "defaults::max_sessions")]
    pub max_sessions: usize,

    /// Fixed seed for the session store. Omit for a clock-seeded store.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Server {
    fn default() -> Self {
        Self { host: defaults::host(), port: defaults::port() }
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Self { max_sessions: defaults::max_sessions(), seed: None }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Load the file named by `--config` (if any), then apply flag overrides.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::from_toml(path)?,
            None => Self::default(),
        };
        if let Some(host) = &args.host {
            cfg.server.host = host.clone();
        }
        if let Some(port) = args.port {
            cfg.server.port = port;
        }
        if let Some(max) = args.max_sessions {
            cfg.sessions.max_sessions = max;
        }
        if args.seed.is_some() {
            cfg.sessions.seed = args.seed;
        }
        Ok(cfg)
    }
}

mod defaults {
    pub fn host() -> String { "0.0.0.0".to_string() }
    pub fn port() -> u16 { 3001 }
    pub fn max_sessions() -> usize { 10_000 }
}
