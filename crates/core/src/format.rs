//! Plain-text grid and result formats.
//!
//! Grid files start with a header `<TAG> <rows> <cols> <channels>` followed by
//! one line per row holding `cols * channels` interleaved samples.
//!
//! Result (`.integral`) files hold one block of `rows` lines per channel, in
//! ascending channel order, blocks separated by a single empty line. An
//! optional header in grid-file form may precede the first block.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::buffer::ChannelBuffer;
use crate::element::ElementType;
use crate::error::{IntegralError, Result};
use crate::grid::{Grid, Sample, SampleSlice};

/// Header line shared by grid and result files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub element_type: ElementType,
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
    /// Line the header was read from.
    pub line_no: usize,
}

impl Header {
    fn parse(line: &str, line_no: usize) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let tag = fields
            .next()
            .ok_or_else(|| IntegralError::parse(line_no, "missing header"))?;
        let element_type: ElementType = tag.parse()?;
        let mut extent = |name: &str| -> Result<usize> {
            fields
                .next()
                .ok_or_else(|| IntegralError::parse(line_no, format!("missing {}", name)))?
                .parse::<usize>()
                .map_err(|e| IntegralError::parse(line_no, format!("bad {}: {}", name, e)))
        };
        let rows = extent("rows")?;
        let cols = extent("cols")?;
        let channels = extent("channels")?;
        Ok(Self {
            element_type,
            rows,
            cols,
            channels,
            line_no,
        })
    }
}

/// Numbered, non-empty lines.
fn content_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|l| (i + 1, l)).map_err(IntegralError::from))
}

fn parse_row<T: FromStr>(line: &str, line_no: usize, width: usize, out: &mut Vec<T>) -> Result<()>
where
    T::Err: Display,
{
    let before = out.len();
    for token in line.split_whitespace() {
        let value = token
            .parse::<T>()
            .map_err(|e| IntegralError::parse(line_no, format!("bad sample {:?}: {}", token, e)))?;
        out.push(value);
    }
    let got = out.len() - before;
    if got != width {
        return Err(IntegralError::ShapeMismatch {
            expected: width,
            actual: got,
        });
    }
    Ok(())
}

fn read_samples<T, I>(lines: &mut I, header: &Header) -> Result<Grid>
where
    T: Sample + FromStr,
    T::Err: Display,
    I: Iterator<Item = Result<(usize, String)>>,
{
    let width = header.cols.checked_mul(header.channels);
    let total = width.and_then(|w| w.checked_mul(header.rows));
    let (width, total) = match (width, total) {
        (Some(w), Some(t)) => (w, t),
        _ => return Err(IntegralError::parse(header.line_no, "grid extent overflows")),
    };
    // Grown row by row; the declared extent is not trusted for allocation.
    let mut samples: Vec<T> = Vec::new();
    let mut rows = 0;
    for item in lines {
        let (line_no, line) = item?;
        if line.trim().is_empty() {
            continue;
        }
        if rows == header.rows {
            return Err(IntegralError::parse(line_no, "more rows than declared"));
        }
        parse_row(&line, line_no, width, &mut samples)?;
        rows += 1;
    }
    if rows != header.rows {
        return Err(IntegralError::ShapeMismatch {
            expected: total,
            actual: samples.len(),
        });
    }
    Grid::from_samples(header.rows, header.cols, header.channels, samples)
}

/// Read a grid file.
pub fn read_grid<R: BufRead>(reader: R) -> Result<Grid> {
    let mut lines = content_lines(reader).filter(|item| !matches!(item, Ok((_, l)) if l.trim().is_empty()));
    let (line_no, first) = lines
        .next()
        .ok_or_else(|| IntegralError::parse(1, "empty grid file"))??;
    let header = Header::parse(&first, line_no)?;

    match header.element_type {
        ElementType::U8 => read_samples::<u8, _>(&mut lines, &header),
        ElementType::I8 => read_samples::<i8, _>(&mut lines, &header),
        ElementType::U16 => read_samples::<u16, _>(&mut lines, &header),
        ElementType::I16 => read_samples::<i16, _>(&mut lines, &header),
        ElementType::I32 => read_samples::<i32, _>(&mut lines, &header),
        ElementType::F32 => read_samples::<f32, _>(&mut lines, &header),
        ElementType::F64 => read_samples::<f64, _>(&mut lines, &header),
    }
}

fn write_values<W: Write, T: Display>(writer: &mut W, values: &[T], width: usize) -> Result<()> {
    if width == 0 {
        return Ok(());
    }
    for row in values.chunks(width) {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Write a grid file readable by [`read_grid`].
pub fn write_grid<W: Write>(mut writer: W, grid: &Grid) -> Result<()> {
    writeln!(
        writer,
        "{} {} {} {}",
        grid.element_type().tag(),
        grid.rows(),
        grid.cols(),
        grid.channels()
    )?;
    let width = grid.cols() * grid.channels();
    match grid.samples() {
        SampleSlice::U8(v) => write_values(&mut writer, v, width)?,
        SampleSlice::I8(v) => write_values(&mut writer, v, width)?,
        SampleSlice::U16(v) => write_values(&mut writer, v, width)?,
        SampleSlice::I16(v) => write_values(&mut writer, v, width)?,
        SampleSlice::I32(v) => write_values(&mut writer, v, width)?,
        SampleSlice::F32(v) => write_values(&mut writer, v, width)?,
        SampleSlice::F64(v) => write_values(&mut writer, v, width)?,
    }
    writer.flush()?;
    Ok(())
}

/// Write per-channel results, one decimal place, blank line between channels.
pub fn write_integral<'a, W, I>(mut writer: W, channels: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ChannelBuffer>,
{
    for (index, buffer) in channels.into_iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        for row in 0..buffer.rows() {
            let line: Vec<String> = buffer.row(row).iter().map(|v| format!("{:.1}", v)).collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn finish_block(block: &mut Vec<Vec<f64>>, out: &mut Vec<ChannelBuffer>, line_no: usize) -> Result<()> {
    if block.is_empty() {
        return Ok(());
    }
    let rows = block.len();
    let cols = block[0].len();
    if block.iter().any(|r| r.len() != cols) {
        return Err(IntegralError::parse(line_no, "ragged rows in result block"));
    }
    let values: Vec<f64> = block.drain(..).flatten().collect();
    let buffer = ChannelBuffer::from_values(rows, cols, values)
        .ok_or_else(|| IntegralError::parse(line_no, "inconsistent result block"))?;
    out.push(buffer);
    Ok(())
}

/// Read a result file into one buffer per channel.
pub fn read_integral<R: BufRead>(reader: R) -> Result<Vec<ChannelBuffer>> {
    let mut header: Option<Header> = None;
    let mut channels = Vec::new();
    let mut block: Vec<Vec<f64>> = Vec::new();
    let mut last_line = 0;

    for item in content_lines(reader) {
        let (line_no, line) = item?;
        last_line = line_no;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            finish_block(&mut block, &mut channels, line_no)?;
            continue;
        }
        let starts_with_tag = trimmed
            .split_whitespace()
            .next()
            .is_some_and(|t| t.parse::<f64>().is_err());
        if starts_with_tag {
            if header.is_some() || !channels.is_empty() || !block.is_empty() {
                return Err(IntegralError::parse(line_no, "unexpected header"));
            }
            header = Some(Header::parse(trimmed, line_no)?);
            continue;
        }
        let mut row = Vec::new();
        for token in trimmed.split_whitespace() {
            let value = token
                .parse::<f64>()
                .map_err(|e| IntegralError::parse(line_no, format!("bad value {:?}: {}", token, e)))?;
            row.push(value);
        }
        block.push(row);
    }
    finish_block(&mut block, &mut channels, last_line)?;

    if let Some(h) = header {
        if channels.len() != h.channels {
            return Err(IntegralError::ShapeMismatch {
                expected: h.channels,
                actual: channels.len(),
            });
        }
        if let Some(bad) = channels.iter().find(|c| c.rows() != h.rows || c.cols() != h.cols) {
            return Err(IntegralError::ShapeMismatch {
                expected: h.rows.saturating_mul(h.cols),
                actual: bad.rows() * bad.cols(),
            });
        }
    }
    Ok(channels)
}
