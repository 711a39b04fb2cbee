use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use integral_compute::ComputeTask;
use integral_core::format::write_integral;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Written { output: PathBuf, channels: usize },
    ChannelsFailed { failures: Vec<String> },
    WriteFailed { output: PathBuf, error: String },
    Unreadable { error: String },
    /// The grid has zero channels, so nothing is computed or written.
    NoChannels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub input: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, FileStatus::Written { .. })
    }
}

/// `<dir>/<stem>.integral`, where `<dir>` defaults to the input's directory.
pub fn output_path(input: &str, output_dir: Option<&Path>) -> PathBuf {
    let target = Path::new(input).with_extension("integral");
    match (output_dir, target.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => target,
    }
}

/// Merge one grid's channel results into its `.integral` file.
pub fn write_on_disk(tasks: &[ComputeTask], output_dir: Option<&Path>) -> FileReport {
    let input = tasks.first().map(|t| t.id().to_string()).unwrap_or_default();

    let failures: Vec<String> = tasks
        .iter()
        .filter_map(|t| t.result().err().map(|e| format!("channel {}: {}", t.channel(), e)))
        .collect();
    if !failures.is_empty() {
        error!(input = %input, "Not writing result, {} channel(s) failed: {:?}", failures.len(), failures);
        return FileReport {
            input,
            status: FileStatus::ChannelsFailed { failures },
        };
    }

    let output = output_path(&input, output_dir);
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("{}: merging...", name);

    let written = File::create(&output)
        .map_err(integral_core::IntegralError::from)
        .and_then(|file| write_integral(BufWriter::new(file), tasks.iter().map(|t| t.output())));
    let status = match written {
        Ok(()) => {
            info!("{}: merge complete", name);
            FileStatus::Written {
                output,
                channels: tasks.len(),
            }
        }
        Err(e) => {
            error!(output = %output.display(), "Failed to write result: {}", e);
            FileStatus::WriteFailed {
                output,
                error: e.to_string(),
            }
        }
    };
    FileReport { input, status }
}
