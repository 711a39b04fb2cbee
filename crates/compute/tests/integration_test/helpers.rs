use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rand::distributions::uniform::SampleUniform;
use rand::Rng;

use integral_compute::{ComputationEngine, TransformError};
use integral_core::format::{read_grid, read_integral};
use integral_core::grid::Sample;
use integral_core::{ChannelBuffer, Grid};

/// Directory holding the fixture grids.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn load_grid(name: &str) -> Grid {
    let path = data_dir().join(format!("{}.txt", name));
    let file = File::open(&path).unwrap_or_else(|e| panic!("open {}: {}", path.display(), e));
    read_grid(BufReader::new(file)).unwrap()
}

pub fn load_expected(name: &str) -> Vec<ChannelBuffer> {
    let path = data_dir().join("expected").join(format!("{}.integral", name));
    let file = File::open(&path).unwrap_or_else(|e| panic!("open {}: {}", path.display(), e));
    read_integral(BufReader::new(file)).unwrap()
}

/// Per-channel results delivered for one identifier.
pub type Delivered = Vec<Result<ChannelBuffer, TransformError>>;

/// Run a single grid through a fresh engine and return what the callback saw.
pub fn compute(id: &str, grid: Grid, workers: usize) -> Vec<(String, Delivered)> {
    compute_many(vec![(id.to_string(), grid)], workers)
}

/// Run several grids through one engine.
pub fn compute_many(grids: Vec<(String, Grid)>, workers: usize) -> Vec<(String, Delivered)> {
    let mut engine = ComputationEngine::new(workers).unwrap();
    let out = Arc::new(Mutex::new(Vec::<(String, Delivered)>::new()));
    let sink = Arc::clone(&out);
    engine.set_on_complete(move |tasks| {
        let delivered: Delivered = tasks.iter().map(|t| t.result().cloned()).collect();
        sink.lock().unwrap().push((tasks[0].id().to_string(), delivered));
    });

    for (id, grid) in grids {
        engine.enqueue(&id, Arc::new(grid)).unwrap();
    }
    engine.wait_for_complete();

    let delivered = out.lock().unwrap().clone();
    delivered
}

/// Inclusion–exclusion summed-area table of one channel.
pub fn reference_sat(grid: &Grid, channel: usize) -> ChannelBuffer {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut sat = ChannelBuffer::new(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            let mut v = grid.sample(i, j, channel).unwrap();
            if i > 0 {
                v += sat.get(i - 1, j).unwrap();
            }
            if j > 0 {
                v += sat.get(i, j - 1).unwrap();
            }
            if i > 0 && j > 0 {
                v -= sat.get(i - 1, j - 1).unwrap();
            }
            sat.set(i, j, v);
        }
    }
    sat
}

/// Uniformly random grid with samples in `[low, high]`.
pub fn random_grid<T, R>(rng: &mut R, rows: usize, cols: usize, channels: usize, low: T, high: T) -> Grid
where
    T: Sample + SampleUniform + PartialOrd,
    R: Rng,
{
    let samples: Vec<T> = (0..rows * cols * channels)
        .map(|_| rng.gen_range(low..=high))
        .collect();
    Grid::from_samples(rows, cols, channels, samples).unwrap()
}
