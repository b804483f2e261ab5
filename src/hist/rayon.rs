//! Rayon-parallel batch construction (feature-gated).
//!
//! Histogram construction is a pure per-frame transform, so frames can be
//! processed independently; each worker owns its output grid and the results
//! are collected back in input order.

use crate::frame::FrameView;
use crate::grid::RegionGrid;
use crate::hist::{build_frame_grid, FrameHistogramGrid, HistogramBatch};
use crate::util::RegionHistResult;
use rayon::prelude::*;

/// Builds one histogram grid per frame in parallel and collects them into a
/// batch, preserving frame order.
pub fn build_batch_par(
    frames: &[FrameView<'_>],
    grid: &RegionGrid,
    colors: usize,
) -> RegionHistResult<HistogramBatch> {
    let grids: Vec<FrameHistogramGrid> = frames
        .par_iter()
        .map(|frame| build_frame_grid(*frame, grid, colors))
        .collect::<RegionHistResult<_>>()?;

    let mut batch = HistogramBatch::new();
    for frame_grid in grids {
        batch.push(frame_grid)?;
    }
    Ok(batch)
}
