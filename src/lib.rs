//! RegionHist computes per-region cumulative histograms over image-difference
//! frames, serializes batches of them under four alternative binary layouts,
//! and answers threshold-fraction queries ("did more than X% of the pixels in
//! these regions change by more than V?") either from raw pixels or directly
//! from a decompressed histogram buffer.
//!
//! Compression is injected through the [`compress::Compressor`] capability;
//! a zlib implementation is available via the `zlib` feature, and parallel
//! batch construction via the `rayon` feature.

pub mod compress;
pub mod frame;
pub mod grid;
pub mod hist;
pub mod layout;
pub mod query;
pub mod store;
mod trace;
pub mod util;

pub use compress::{Compressor, Identity};
pub use frame::{FrameView, OwnedFrame};
pub use grid::{RegionBounds, RegionGrid};
pub use hist::{
    build_frame_grid, CumulativeHistogram, FrameHistogramGrid, HistogramBatch, RawHistogram,
    COLORS,
};
pub use layout::{decode_linear, encode, Layout};
pub use query::{query_on_frame, query_on_histogram, QuerySpec};
pub use util::{RegionHistError, RegionHistResult};

#[cfg(feature = "zlib")]
pub use compress::Zlib;
