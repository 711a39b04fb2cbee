use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{IntegralError, Result};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> Result<usize> {
    match env_opt(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| IntegralError::Config(format!("{}={:?}: {}", key, v, e))),
        None => Ok(default),
    }
}

/// Environment keys read by [`Config::from_env`].
pub const WORKERS_KEY: &str = "INTEGRAL_WORKERS";
pub const OUTPUT_DIR_KEY: &str = "INTEGRAL_OUTPUT_DIR";

/// Runtime settings for the batch tool (call `load_dotenv()` first).
///
/// The engine never reads the environment itself; the binary resolves these
/// values and passes the worker count in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Requested worker threads. 0 = hardware concurrency.
    pub workers: usize,
    /// Where `.integral` files are written. `None` = next to each input.
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            workers: env_usize(WORKERS_KEY, 0)?,
            output_dir: env_opt(OUTPUT_DIR_KEY).map(PathBuf::from),
        })
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  workers:     {}",
            if self.workers == 0 { "auto".to_string() } else { self.workers.to_string() }
        );
        tracing::info!(
            "  output_dir:  {}",
            self.output_dir
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(next to input)".to_string())
        );
    }
}
