//! On-disk histogram files.
//!
//! A batch is stored under the naming convention
//! `<base>.hist.<layout>[.<compressor-name>]`. Writes always materialize the
//! complete (optionally compressed) buffer in memory first, write it to a
//! temporary sibling, and rename it into place — an interrupted write never
//! leaves a truncated file under the final name, and every read re-checks the
//! exact expected size before decoding.

use crate::compress::Compressor;
use crate::hist::HistogramBatch;
use crate::layout::{self, Layout};
use crate::query::{query_on_histogram, QuerySpec};
use crate::trace::trace_event;
use crate::util::RegionHistResult;
use std::fs;
use std::path::{Path, PathBuf};

/// File name for a stored batch: `<base>.hist.<layout>[.<compressor>]`.
pub fn hist_file_name(base: &str, layout: Layout, compressor: Option<&dyn Compressor>) -> String {
    match compressor {
        Some(codec) => format!("{base}.hist.{layout}.{}", codec.name()),
        None => format!("{base}.hist.{layout}"),
    }
}

/// Encodes a batch, optionally compresses it, and writes it under `dir`.
///
/// Creates the directory if missing and returns the final path. The buffer is
/// complete before any bytes touch disk; the final name only ever appears via
/// rename of a fully written temporary.
pub fn write_batch(
    dir: &Path,
    base: &str,
    batch: &HistogramBatch,
    layout: Layout,
    compressor: Option<&dyn Compressor>,
) -> RegionHistResult<PathBuf> {
    let encoded = layout::encode(batch, layout)?;
    let bytes = match compressor {
        Some(codec) => codec.compress(&encoded)?,
        None => encoded,
    };

    fs::create_dir_all(dir)?;
    let name = hist_file_name(base, layout, compressor);
    let path = dir.join(&name);
    let tmp = dir.join(format!("{name}.tmp"));
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, &path)?;
    trace_event!("batch_written", bytes = bytes.len());
    Ok(path)
}

/// Reads a linear-layout batch file back, decompressing if a codec is given.
pub fn read_batch_linear(
    path: &Path,
    frames: usize,
    regions: usize,
    colors: usize,
    compressor: Option<&dyn Compressor>,
) -> RegionHistResult<HistogramBatch> {
    let raw = fs::read(path)?;
    let bytes = match compressor {
        Some(codec) => codec.decompress(&raw)?,
        None => raw,
    };
    layout::decode_linear(&bytes, frames, regions, colors)
}

/// Answers a threshold query from a single-frame linear histogram file.
///
/// Reads the blob, decompresses it if a codec is given, and probes the
/// cumulative buckets directly.
#[allow(clippy::too_many_arguments)]
pub fn query_file(
    path: &Path,
    regions: usize,
    colors: usize,
    compressor: Option<&dyn Compressor>,
    spec: &QuerySpec,
    threshold_value: u8,
    threshold_frac: f64,
) -> RegionHistResult<bool> {
    let raw = fs::read(path)?;
    let bytes = match compressor {
        Some(codec) => codec.decompress(&raw)?,
        None => raw,
    };
    query_on_histogram(&bytes, regions, colors, spec, threshold_value, threshold_frac)
}
