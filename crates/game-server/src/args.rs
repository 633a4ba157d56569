use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
pub struct Args {
    /// Optional TOML configuration file; command-line values take precedence.
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    pub config: Option<PathBuf>,
    /// Host interface to bind (default 0.0.0.0).
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind (default 3001).
    #[arg(long)]
    pub port: Option<u16>,
    /// Maximum number of live game sessions.
    #[arg(long)]
    pub max_sessions: Option<usize>,
    /// Seed for session ids and tile spawns, for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Optional tracing filter, e.g. "info", "debug".
    #[arg(long, default_value = "info")]
    pub log: String,
}
