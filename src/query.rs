//! Threshold-fraction queries.
//!
//! A query asks whether more than `threshold_frac` of the pixels in a named
//! set of regions changed by at least `threshold_value`. It can be answered
//! two ways with identical results: by scanning the raw difference pixels, or
//! by probing a decoded cumulative-histogram buffer without ever touching the
//! pixel grid — the correctness claim the whole storage scheme rests on.

use crate::frame::FrameView;
use crate::grid::RegionGrid;
use crate::util::{RegionHistError, RegionHistResult};
use std::collections::{BTreeMap, BTreeSet};

/// Named region set: region-row index to the region-column indices queried in
/// that row. Keys and elements are unique; iteration order never affects the
/// result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuerySpec {
    rows: BTreeMap<usize, BTreeSet<usize>>,
}

impl QuerySpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds region `(row, col)` to the set.
    pub fn add(&mut self, row: usize, col: usize) -> &mut Self {
        self.rows.entry(row).or_default().insert(col);
        self
    }

    /// Builds a spec from `(row, col)` pairs.
    pub fn from_regions<I: IntoIterator<Item = (usize, usize)>>(regions: I) -> Self {
        let mut spec = Self::new();
        for (row, col) in regions {
            spec.add(row, col);
        }
        spec
    }

    /// Returns true when no regions are named.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates all named `(row, col)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |&col| (row, col)))
    }
}

/// Answers a query by scanning raw difference pixels.
///
/// For each named region, counts pixels with value `>= threshold_value`, then
/// compares the accumulated above/total fraction against `threshold_frac`.
/// This path exists as ground truth for the histogram path and for timing
/// comparisons against it.
pub fn query_on_frame(
    frame: FrameView<'_>,
    regions: usize,
    spec: &QuerySpec,
    threshold_value: u8,
    threshold_frac: f64,
) -> RegionHistResult<bool> {
    if spec.is_empty() {
        return Err(RegionHistError::EmptyQuery);
    }
    let grid = RegionGrid::build(frame.width(), frame.height(), regions)?;

    let mut above = 0u64;
    let mut total = 0u64;
    for (row, col) in spec.iter() {
        let bounds = grid.bounds_of(row, col)?;
        for y in bounds.y0..bounds.y0 + bounds.height {
            let line = frame.row(y).expect("row within grid bounds");
            above += line[bounds.x0..bounds.x0 + bounds.width]
                .iter()
                .filter(|&&value| value >= threshold_value)
                .count() as u64;
        }
        total += bounds.pixels() as u64;
    }

    Ok(above as f64 / total as f64 > threshold_frac)
}

/// Answers a query by probing a decoded linear histogram buffer.
///
/// The buffer holds one frame's `R x R x C` cumulative grid as little-endian
/// `u16` buckets. For each named region the count of pixels above threshold
/// is `bucket[colors-1] - bucket[threshold_value-1]` (nothing is subtracted
/// when `threshold_value` is 0, which therefore matches every pixel). Buckets
/// are read at direct byte offsets, so no full decode is needed.
pub fn query_on_histogram(
    bytes: &[u8],
    regions: usize,
    colors: usize,
    spec: &QuerySpec,
    threshold_value: u8,
    threshold_frac: f64,
) -> RegionHistResult<bool> {
    let needed = crate::layout::encoded_size(1, regions, colors);
    if bytes.len() != needed {
        return Err(RegionHistError::TruncatedBuffer {
            needed,
            got: bytes.len(),
        });
    }
    if spec.is_empty() {
        return Err(RegionHistError::EmptyQuery);
    }
    let value = threshold_value as usize;
    if value >= colors {
        return Err(RegionHistError::ThresholdOutOfRange { value, colors });
    }

    let mut above = 0u64;
    let mut total = 0u64;
    for (row, col) in spec.iter() {
        if row >= regions || col >= regions {
            return Err(RegionHistError::RegionOutOfBounds { row, col, regions });
        }
        let base = (row * regions + col) * colors;
        let below = if value == 0 {
            0
        } else {
            bucket_at(bytes, base + value - 1)
        };
        let region_total = bucket_at(bytes, base + colors - 1);
        if region_total == 0 {
            return Err(RegionHistError::EmptyRegion { row, col });
        }
        above += (region_total - below) as u64;
        total += region_total as u64;
    }

    Ok(above as f64 / total as f64 > threshold_frac)
}

#[inline]
fn bucket_at(bytes: &[u8], index: usize) -> u16 {
    let offset = index * 2;
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
