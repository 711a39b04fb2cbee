use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::warn;

use integral_core::Config;

/// Compute per-channel integral images (summed-area tables) for grid files.
///
/// Each input is a grid text file; results are written as `<stem>.integral`
/// next to the input or into `--output-dir`.
#[derive(Parser, Debug)]
#[command(name = "integral-image", version, about)]
pub struct CliArgs {
    /// Input grid files
    #[arg(short = 'i', long = "input", num_args = 1.., required = true)]
    pub inputs: Vec<PathBuf>,

    /// Worker threads (0 = one per CPU core). Overrides INTEGRAL_WORKERS.
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Directory for result files. Overrides INTEGRAL_OUTPUT_DIR.
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Print a JSON run report to stdout
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Layer command-line overrides on top of the environment config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(threads) = self.threads {
            config.workers = threads;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        config
    }

    /// Inputs in command-line order with repeats dropped. A path given twice
    /// would share one identifier, mixing both grids' channels in one result.
    pub fn unique_inputs(&self) -> Vec<&PathBuf> {
        let mut seen = HashSet::new();
        self.inputs
            .iter()
            .filter(|path| {
                let first = seen.insert(*path);
                if !first {
                    warn!(input = %path.display(), "Duplicate input ignored");
                }
                first
            })
            .collect()
    }
}

/// The tool refuses thread counts the machine cannot run, unlike the engine
/// which clamps them.
pub fn validate_threads(requested: usize, hardware: usize) -> Result<usize> {
    if requested > hardware {
        bail!(
            "unsupported thread number specified: {}; allowed thread number: {}",
            requested,
            hardware
        );
    }
    Ok(requested)
}
