//! Per-channel summed-area (prefix sum) transform.

use integral_core::grid::Sample;
use integral_core::{ChannelBuffer, ElementType, Grid, SampleSlice};

/// Error raised while transforming one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("Unsupported element type: {0}")]
    UnsupportedElementType(ElementType),
    #[error("Channel {channel} out of range for {channels}-channel grid")]
    ChannelOutOfRange { channel: usize, channels: usize },
    #[error("Output buffer is {actual_rows}x{actual_cols}, grid is {rows}x{cols}")]
    BufferShape {
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
    #[error("Task has not been executed")]
    NotExecuted,
}

/// A per-channel computation the engine runs on its workers.
///
/// [`PrefixSum`] is the production kernel; the trait exists so the engine can
/// be driven with instrumented kernels.
pub trait ChannelKernel: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Compute `channel` of `grid` into `dst`, which is `rows × cols`.
    fn compute(&self, grid: &Grid, channel: usize, dst: &mut ChannelBuffer) -> Result<(), TransformError>;
}

/// Inclusive 2D prefix sum in double precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixSum;

impl ChannelKernel for PrefixSum {
    fn name(&self) -> &str {
        "prefix_sum"
    }

    fn compute(&self, grid: &Grid, channel: usize, dst: &mut ChannelBuffer) -> Result<(), TransformError> {
        prefix_sum_into(grid, channel, dst)
    }
}

/// Compute the summed-area table of one channel into a fresh buffer.
pub fn prefix_sum(grid: &Grid, channel: usize) -> Result<ChannelBuffer, TransformError> {
    let mut dst = ChannelBuffer::new(grid.rows(), grid.cols());
    prefix_sum_into(grid, channel, &mut dst)?;
    Ok(dst)
}

/// Compute the summed-area table of one channel into `dst`.
///
/// `dst[i][j]` receives the sum of every sample of `channel` at `(k, m)` with
/// `k <= i` and `m <= j`. The element type is matched once; the sweep itself
/// is monomorphised per sample type.
pub fn prefix_sum_into(grid: &Grid, channel: usize, dst: &mut ChannelBuffer) -> Result<(), TransformError> {
    if channel >= grid.channels() {
        return Err(TransformError::ChannelOutOfRange {
            channel,
            channels: grid.channels(),
        });
    }
    if dst.rows() != grid.rows() || dst.cols() != grid.cols() {
        return Err(TransformError::BufferShape {
            rows: grid.rows(),
            cols: grid.cols(),
            actual_rows: dst.rows(),
            actual_cols: dst.cols(),
        });
    }

    match grid.samples() {
        SampleSlice::U8(src) => sweep(src, grid, channel, dst),
        SampleSlice::U16(src) => sweep(src, grid, channel, dst),
        SampleSlice::I16(src) => sweep(src, grid, channel, dst),
        other => return Err(TransformError::UnsupportedElementType(other.element_type())),
    }
    Ok(())
}

/// Single row-major pass. `column[j]` holds the column sum through the
/// previous row, so each output is the running row sum of column prefixes.
fn sweep<T: Sample>(src: &[T], grid: &Grid, channel: usize, dst: &mut ChannelBuffer) {
    let (rows, cols, channels) = (grid.rows(), grid.cols(), grid.channels());
    if rows == 0 || cols == 0 {
        return;
    }

    let mut column = vec![0.0f64; cols];
    for (row, src_row) in src.chunks_exact(cols * channels).take(rows).enumerate() {
        let dst_row = dst.row_mut(row);
        let mut row_sum = 0.0;
        for (col, (acc, out)) in column.iter_mut().zip(dst_row.iter_mut()).enumerate() {
            let value = src_row[col * channels + channel].to_f64();
            row_sum += value + *acc;
            *acc += value;
            *out = row_sum;
        }
    }
}
