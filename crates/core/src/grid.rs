//! In-memory multi-channel sample grid.
//!
//! A [`Grid`] stores `rows × cols` pixels with `channels` interleaved samples
//! per pixel, row-major. The engine shares a grid read-only between all of its
//! channel tasks, so nothing here hands out mutable access once built.

use crate::element::ElementType;
use crate::error::{IntegralError, Result};

/// Owned sample storage, one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum GridData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Borrowed, typed view over a grid's interleaved samples.
#[derive(Debug, Clone, Copy)]
pub enum SampleSlice<'a> {
    U8(&'a [u8]),
    I8(&'a [i8]),
    U16(&'a [u16]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    F32(&'a [f32]),
    F64(&'a [f64]),
}

/// A scalar type that can be stored in a [`Grid`].
pub trait Sample: Copy + Send + Sync + 'static {
    const ELEMENT_TYPE: ElementType;

    fn to_f64(self) -> f64;

    fn into_data(values: Vec<Self>) -> GridData;
}

macro_rules! impl_sample {
    ($ty:ty, $variant:ident) => {
        impl Sample for $ty {
            const ELEMENT_TYPE: ElementType = ElementType::$variant;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn into_data(values: Vec<Self>) -> GridData {
                GridData::$variant(values)
            }
        }

        impl From<Vec<$ty>> for GridData {
            fn from(values: Vec<$ty>) -> Self {
                GridData::$variant(values)
            }
        }
    };
}

impl_sample!(u8, U8);
impl_sample!(i8, I8);
impl_sample!(u16, U16);
impl_sample!(i16, I16);
impl_sample!(i32, I32);
impl_sample!(f32, F32);
impl_sample!(f64, F64);

impl GridData {
    pub fn element_type(&self) -> ElementType {
        match self {
            GridData::U8(_) => ElementType::U8,
            GridData::I8(_) => ElementType::I8,
            GridData::U16(_) => ElementType::U16,
            GridData::I16(_) => ElementType::I16,
            GridData::I32(_) => ElementType::I32,
            GridData::F32(_) => ElementType::F32,
            GridData::F64(_) => ElementType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GridData::U8(v) => v.len(),
            GridData::I8(v) => v.len(),
            GridData::U16(v) => v.len(),
            GridData::I16(v) => v.len(),
            GridData::I32(v) => v.len(),
            GridData::F32(v) => v.len(),
            GridData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-filled storage of the given type.
    pub fn zeros(element_type: ElementType, len: usize) -> Self {
        match element_type {
            ElementType::U8 => GridData::U8(vec![0; len]),
            ElementType::I8 => GridData::I8(vec![0; len]),
            ElementType::U16 => GridData::U16(vec![0; len]),
            ElementType::I16 => GridData::I16(vec![0; len]),
            ElementType::I32 => GridData::I32(vec![0; len]),
            ElementType::F32 => GridData::F32(vec![0.0; len]),
            ElementType::F64 => GridData::F64(vec![0.0; len]),
        }
    }

    fn as_slice(&self) -> SampleSlice<'_> {
        match self {
            GridData::U8(v) => SampleSlice::U8(v),
            GridData::I8(v) => SampleSlice::I8(v),
            GridData::U16(v) => SampleSlice::U16(v),
            GridData::I16(v) => SampleSlice::I16(v),
            GridData::I32(v) => SampleSlice::I32(v),
            GridData::F32(v) => SampleSlice::F32(v),
            GridData::F64(v) => SampleSlice::F64(v),
        }
    }
}

impl SampleSlice<'_> {
    pub fn element_type(&self) -> ElementType {
        match self {
            SampleSlice::U8(_) => ElementType::U8,
            SampleSlice::I8(_) => ElementType::I8,
            SampleSlice::U16(_) => ElementType::U16,
            SampleSlice::I16(_) => ElementType::I16,
            SampleSlice::I32(_) => ElementType::I32,
            SampleSlice::F32(_) => ElementType::F32,
            SampleSlice::F64(_) => ElementType::F64,
        }
    }

    fn get(&self, index: usize) -> Option<f64> {
        match self {
            SampleSlice::U8(v) => v.get(index).map(|s| s.to_f64()),
            SampleSlice::I8(v) => v.get(index).map(|s| s.to_f64()),
            SampleSlice::U16(v) => v.get(index).map(|s| s.to_f64()),
            SampleSlice::I16(v) => v.get(index).map(|s| s.to_f64()),
            SampleSlice::I32(v) => v.get(index).map(|s| s.to_f64()),
            SampleSlice::F32(v) => v.get(index).map(|s| s.to_f64()),
            SampleSlice::F64(v) => v.get(index).copied(),
        }
    }
}

fn extent(rows: usize, cols: usize, channels: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| IntegralError::Config(format!("grid extent overflows: {}x{}x{}", rows, cols, channels)))
}

/// A `rows × cols` grid with `channels` interleaved samples per position.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    channels: usize,
    data: GridData,
}

impl Grid {
    /// Build a grid, checking that `data` holds exactly
    /// `rows * cols * channels` samples.
    pub fn new(rows: usize, cols: usize, channels: usize, data: impl Into<GridData>) -> Result<Self> {
        let data = data.into();
        let expected = extent(rows, cols, channels)?;
        if data.len() != expected {
            return Err(IntegralError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            channels,
            data,
        })
    }

    /// Build a grid from typed samples.
    pub fn from_samples<T: Sample>(rows: usize, cols: usize, channels: usize, samples: Vec<T>) -> Result<Self> {
        Self::new(rows, cols, channels, T::into_data(samples))
    }

    /// Zero-filled grid of `element_type`.
    pub fn zeros(rows: usize, cols: usize, channels: usize, element_type: ElementType) -> Result<Self> {
        let len = extent(rows, cols, channels)?;
        Ok(Self {
            rows,
            cols,
            channels,
            data: GridData::zeros(element_type, len),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Typed view over all interleaved samples.
    pub fn samples(&self) -> SampleSlice<'_> {
        self.data.as_slice()
    }

    pub fn data(&self) -> &GridData {
        &self.data
    }

    /// Sample at `(row, col)` of `channel`, widened to `f64`.
    pub fn sample(&self, row: usize, col: usize, channel: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols || channel >= self.channels {
            return None;
        }
        self.samples()
            .get((row * self.cols + col) * self.channels + channel)
    }
}
