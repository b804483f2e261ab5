//! Per-region histogram construction.
//!
//! Counting and prefix-summing are kept as two distinct types so a call site
//! can never mistake raw counts for the cumulative form the query path and the
//! on-disk layouts require. Buckets persist as unsigned 16-bit values, so the
//! cumulative transform rejects regions larger than `u16::MAX` pixels instead
//! of wrapping.

use crate::frame::FrameView;
use crate::grid::RegionGrid;
use crate::util::{RegionHistError, RegionHistResult};

#[cfg(feature = "rayon")]
pub mod rayon;

/// Size of the difference-value domain: one bucket per possible byte value.
pub const COLORS: usize = 256;

/// Per-value pixel counts for one region. Not yet cumulative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawHistogram {
    counts: Vec<u32>,
}

impl RawHistogram {
    /// Creates an all-zero histogram over `[0, colors)`.
    pub fn new(colors: usize) -> Self {
        Self {
            counts: vec![0; colors],
        }
    }

    /// Records one pixel. Values outside the domain are ignored, matching the
    /// fixed bin edges of the histogramming this replaces.
    #[inline]
    pub fn record(&mut self, value: u8) {
        if let Some(slot) = self.counts.get_mut(value as usize) {
            *slot += 1;
        }
    }

    /// Returns the per-value counts.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Converts counts into the cumulative form via a prefix sum.
    ///
    /// Fails with `BucketOverflow` when the region's total pixel count does
    /// not fit a 16-bit bucket, the width every on-disk layout stores.
    pub fn into_cumulative(self) -> RegionHistResult<CumulativeHistogram> {
        let mut running = 0u32;
        let mut buckets = Vec::with_capacity(self.counts.len());
        for count in self.counts {
            running += count;
            if running > u16::MAX as u32 {
                return Err(RegionHistError::BucketOverflow {
                    pixels: running as usize,
                });
            }
            buckets.push(running as u16);
        }
        Ok(CumulativeHistogram { buckets })
    }
}

/// Cumulative histogram for one region: bucket `k` counts pixels with value
/// `<= k`. Monotone non-decreasing; the last bucket is the region's pixel
/// count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CumulativeHistogram {
    buckets: Vec<u16>,
}

impl CumulativeHistogram {
    /// Reassembles a histogram from already-cumulative buckets (decode path).
    pub(crate) fn from_buckets(buckets: Vec<u16>) -> Self {
        Self { buckets }
    }

    /// Number of buckets (the size of the value domain).
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true when the histogram has no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns bucket `k`: the count of pixels with value `<= k`.
    pub fn bucket(&self, k: usize) -> Option<u16> {
        self.buckets.get(k).copied()
    }

    /// Returns all buckets.
    pub fn buckets(&self) -> &[u16] {
        &self.buckets
    }

    /// Total pixel count of the region (the final bucket).
    pub fn total(&self) -> u16 {
        self.buckets.last().copied().unwrap_or(0)
    }
}

/// All region histograms of a single frame, row-major, aligned with the
/// `RegionGrid` that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameHistogramGrid {
    regions: usize,
    colors: usize,
    hists: Vec<CumulativeHistogram>,
}

impl FrameHistogramGrid {
    /// Assembles a grid from row-major histograms.
    ///
    /// Fails with `LayoutMismatch` if the histogram count is not
    /// `regions * regions` or any histogram disagrees on length.
    pub fn new(
        regions: usize,
        colors: usize,
        hists: Vec<CumulativeHistogram>,
    ) -> RegionHistResult<Self> {
        if hists.len() != regions * regions {
            return Err(RegionHistError::LayoutMismatch {
                reason: "histogram count does not match region grid",
            });
        }
        if hists.iter().any(|h| h.len() != colors) {
            return Err(RegionHistError::LayoutMismatch {
                reason: "histogram length does not match color domain",
            });
        }
        Ok(Self {
            regions,
            colors,
            hists,
        })
    }

    /// Returns the number of regions per axis.
    pub fn regions(&self) -> usize {
        self.regions
    }

    /// Returns the size of the value domain.
    pub fn colors(&self) -> usize {
        self.colors
    }

    /// Returns the histogram of region `(row, col)`.
    pub fn region(&self, row: usize, col: usize) -> RegionHistResult<&CumulativeHistogram> {
        if row >= self.regions || col >= self.regions {
            return Err(RegionHistError::RegionOutOfBounds {
                row,
                col,
                regions: self.regions,
            });
        }
        Ok(&self.hists[row * self.regions + col])
    }

    /// Returns all histograms in row-major order.
    pub fn hists(&self) -> &[CumulativeHistogram] {
        &self.hists
    }
}

/// Builds the cumulative histogram grid of one difference frame.
///
/// Counts each region's pixel values, then prefix-sums each count array. The
/// frame must match the grid's dimensions.
pub fn build_frame_grid(
    frame: FrameView<'_>,
    grid: &RegionGrid,
    colors: usize,
) -> RegionHistResult<FrameHistogramGrid> {
    if frame.width() != grid.width() || frame.height() != grid.height() {
        return Err(RegionHistError::InvalidGeometry {
            width: frame.width(),
            height: frame.height(),
            regions: grid.regions(),
        });
    }
    let regions = grid.regions();
    let mut hists = Vec::with_capacity(regions * regions);
    for (row, col, bounds) in grid.iter() {
        if bounds.pixels() == 0 {
            // Cannot occur for a valid grid, but a zero-pixel region would
            // poison every fraction computed downstream.
            return Err(RegionHistError::EmptyRegion { row, col });
        }
        let mut raw = RawHistogram::new(colors);
        for y in bounds.y0..bounds.y0 + bounds.height {
            let line = frame.row(y).expect("row within grid bounds");
            for &value in &line[bounds.x0..bounds.x0 + bounds.width] {
                raw.record(value);
            }
        }
        hists.push(raw.into_cumulative()?);
    }
    FrameHistogramGrid::new(regions, colors, hists)
}

/// Ordered frames' histogram grids sharing one shape, accumulated until a
/// frames-per-file target is reached and then flushed to a layout encoder.
#[derive(Clone, Debug, Default)]
pub struct HistogramBatch {
    frames: Vec<FrameHistogramGrid>,
    target: usize,
}

impl HistogramBatch {
    /// Creates an empty batch with no flush target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty batch that is full once `target` frames accumulate.
    pub fn with_target(target: usize) -> Self {
        Self {
            frames: Vec::with_capacity(target),
            target,
        }
    }

    /// Appends one frame's grid.
    ///
    /// Fails with `LayoutMismatch` if its shape differs from the frames
    /// already held.
    pub fn push(&mut self, grid: FrameHistogramGrid) -> RegionHistResult<()> {
        if let Some(first) = self.frames.first() {
            if grid.regions() != first.regions() {
                return Err(RegionHistError::LayoutMismatch {
                    reason: "frame region count differs within batch",
                });
            }
            if grid.colors() != first.colors() {
                return Err(RegionHistError::LayoutMismatch {
                    reason: "frame color domain differs within batch",
                });
            }
        }
        self.frames.push(grid);
        Ok(())
    }

    /// Number of frames accumulated so far.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true when no frames are held.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns true once the flush target is reached (never for target 0).
    pub fn is_full(&self) -> bool {
        self.target > 0 && self.frames.len() >= self.target
    }

    /// Takes the accumulated frames, leaving the batch empty for reuse.
    pub fn take(&mut self) -> Vec<FrameHistogramGrid> {
        std::mem::take(&mut self.frames)
    }

    /// Returns the accumulated frames in order.
    pub fn frames(&self) -> &[FrameHistogramGrid] {
        &self.frames
    }

    /// Returns `(frames, regions_per_axis, colors)` after validating that all
    /// frames agree, as the layout encoders require.
    pub fn shape(&self) -> RegionHistResult<(usize, usize, usize)> {
        let first = self
            .frames
            .first()
            .ok_or(RegionHistError::LayoutMismatch {
                reason: "batch contains no frames",
            })?;
        let regions = first.regions();
        let colors = first.colors();
        for frame in &self.frames[1..] {
            if frame.regions() != regions || frame.colors() != colors {
                return Err(RegionHistError::LayoutMismatch {
                    reason: "frames disagree on shape",
                });
            }
        }
        Ok((self.frames.len(), regions, colors))
    }
}

impl PartialEq for HistogramBatch {
    fn eq(&self, other: &Self) -> bool {
        // The flush target is bookkeeping, not content.
        self.frames == other.frames
    }
}

impl Eq for HistogramBatch {}

#[cfg(test)]
mod tests {
    use super::{build_frame_grid, HistogramBatch, RawHistogram, COLORS};
    use crate::frame::FrameView;
    use crate::grid::RegionGrid;
    use crate::util::RegionHistError;

    #[test]
    fn cumulative_is_monotone_with_exact_total() {
        let mut raw = RawHistogram::new(8);
        for value in [0u8, 3, 3, 7, 1, 3] {
            raw.record(value);
        }
        let cum = raw.into_cumulative().unwrap();
        assert_eq!(cum.buckets(), &[1, 2, 2, 5, 5, 5, 5, 6]);
        assert_eq!(cum.total(), 6);
        for pair in cum.buckets().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn values_outside_domain_are_ignored() {
        let mut raw = RawHistogram::new(4);
        raw.record(3);
        raw.record(200);
        assert_eq!(raw.counts(), &[0, 0, 0, 1]);
    }

    #[test]
    fn cumulative_rejects_overflowing_regions() {
        let mut raw = RawHistogram::new(1);
        for _ in 0..=u16::MAX as u32 {
            raw.record(0);
        }
        let err = raw.into_cumulative().err().unwrap();
        assert!(matches!(err, RegionHistError::BucketOverflow { .. }));
    }

    #[test]
    fn frame_grid_counts_every_pixel_once() {
        let data: Vec<u8> = (0..10 * 7).map(|i| (i % 11) as u8).collect();
        let frame = FrameView::from_slice(&data, 10, 7).unwrap();
        let grid = RegionGrid::build(10, 7, 3).unwrap();
        let hists = build_frame_grid(frame, &grid, COLORS).unwrap();

        let mut total = 0usize;
        for (row, col, bounds) in grid.iter() {
            let hist = hists.region(row, col).unwrap();
            assert_eq!(hist.total() as usize, bounds.pixels());
            total += hist.total() as usize;
        }
        assert_eq!(total, 10 * 7);
    }

    #[test]
    fn frame_grid_rejects_mismatched_dimensions() {
        let data = vec![0u8; 16];
        let frame = FrameView::from_slice(&data, 4, 4).unwrap();
        let grid = RegionGrid::build(8, 8, 2).unwrap();
        assert!(matches!(
            build_frame_grid(frame, &grid, COLORS).err().unwrap(),
            RegionHistError::InvalidGeometry { .. }
        ));
    }

    #[test]
    fn batch_flush_boundary_and_shape_guard() {
        let data = vec![1u8; 16];
        let frame = FrameView::from_slice(&data, 4, 4).unwrap();
        let grid2 = RegionGrid::build(4, 4, 2).unwrap();
        let grid4 = RegionGrid::build(4, 4, 4).unwrap();

        let mut batch = HistogramBatch::with_target(2);
        batch
            .push(build_frame_grid(frame, &grid2, COLORS).unwrap())
            .unwrap();
        assert!(!batch.is_full());
        batch
            .push(build_frame_grid(frame, &grid2, COLORS).unwrap())
            .unwrap();
        assert!(batch.is_full());

        let err = batch
            .push(build_frame_grid(frame, &grid4, COLORS).unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, RegionHistError::LayoutMismatch { .. }));

        let flushed = batch.take();
        assert_eq!(flushed.len(), 2);
        assert!(batch.is_empty());
    }
}
