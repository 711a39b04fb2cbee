use serde::Serialize;

/// Single-channel `rows × cols` result buffer in double precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelBuffer {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl ChannelBuffer {
    /// Zero-initialised buffer.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Wrap row-major values. Returns `None` when the length does not match.
    pub fn from_values(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == rows * cols).then_some(Self { rows, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let cols = self.cols;
        self.values[row * cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let cols = self.cols;
        &mut self.values[row * cols..(row + 1) * cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }
}
