mod cli;
mod output;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use integral_compute::engine::hardware_concurrency;
use integral_compute::{ComputationEngine, EngineConfig, EngineMetrics};
use integral_core::config::load_dotenv;
use integral_core::format::read_grid;
use integral_core::{Config, Grid};

use crate::cli::{validate_threads, CliArgs};
use crate::output::{write_on_disk, FileReport, FileStatus};

/// Summary printed with `--json`.
#[derive(Debug, Serialize)]
struct RunReport {
    files: Vec<FileReport>,
    metrics: EngineMetrics,
}

fn load_grid(path: &Path) -> Result<Grid> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_grid(BufReader::new(file)).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = args.apply(Config::from_env().context("failed to load configuration")?);
    let workers = validate_threads(config.workers, hardware_concurrency())?;
    config.log_summary();

    let engine_config = EngineConfig {
        worker_threads: workers,
    };
    let mut engine = ComputationEngine::from_config(&engine_config).context("failed to start computation engine")?;

    let reports = Arc::new(Mutex::new(Vec::<FileReport>::new()));
    let sink = Arc::clone(&reports);
    let output_dir = config.output_dir.clone();
    engine.set_on_complete(move |tasks| {
        let report = write_on_disk(tasks, output_dir.as_deref());
        if let Ok(mut reports) = sink.lock() {
            reports.push(report);
        }
    });

    let inputs = args.unique_inputs();
    let mut skipped = Vec::new();
    for path in &inputs {
        let id = path.display().to_string();
        match load_grid(path) {
            Ok(grid) => {
                if grid.channels() == 0 {
                    warn!(input = %id, "Grid has no channels; no result will be written");
                    skipped.push(FileReport {
                        input: id,
                        status: FileStatus::NoChannels,
                    });
                    continue;
                }
                info!(input = %id, "Enqueued {}x{}x{} {} grid", grid.rows(), grid.cols(), grid.channels(), grid.element_type());
                engine.enqueue(&id, Arc::new(grid))?;
            }
            Err(e) => {
                error!("Unable to process: {}: {:#}", id, e);
                skipped.push(FileReport {
                    input: id,
                    status: FileStatus::Unreadable {
                        error: format!("{:#}", e),
                    },
                });
            }
        }
    }

    engine.wait_for_complete();

    let mut files = reports.lock().map(|r| r.clone()).unwrap_or_default();
    files.extend(skipped);
    files.sort_by(|a, b| a.input.cmp(&b.input));

    let failed = files.iter().filter(|f| !f.is_ok()).count();
    if args.json {
        let report = RunReport {
            files,
            metrics: engine.metrics(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} inputs failed", failed, inputs.len());
    }
    Ok(())
}
