//! Binary layouts for histogram batches.
//!
//! A batch of `F` frames, `R x R` regions, and `C` colors serializes to
//! exactly `F * R * R * C` little-endian `u16` buckets, no header, no
//! padding. The four layouts differ only in iteration order and exist so
//! downstream compressors can be pointed at different correlation structure:
//!
//! - `linear`: frame, region, color — natural per-frame read-back, used by
//!   the query path
//! - `binned`: color, frame, region — same bucket across all frames/regions
//! - `reg-linear`: region, frame, color — one region's history contiguously
//! - `reg-binned`: region, color, frame — one region, one bucket, over time
//!
//! Each encode call allocates its own exactly-sized buffer, so parallel
//! encoders never share mutable state.

use crate::hist::{CumulativeHistogram, FrameHistogramGrid, HistogramBatch};
use crate::trace::{trace_event, trace_span};
use crate::util::{RegionHistError, RegionHistResult};
use std::fmt;
use std::str::FromStr;

const BUCKET_BYTES: usize = std::mem::size_of::<u16>();

/// Serialization order for a histogram batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Frame, region, color.
    Linear,
    /// Color, frame, region.
    Binned,
    /// Region, frame, color.
    RegionLinear,
    /// Region, color, frame.
    RegionBinned,
}

impl Layout {
    /// All layouts, in the order the original experiments enumerate them.
    pub const ALL: [Layout; 4] = [
        Layout::Linear,
        Layout::Binned,
        Layout::RegionLinear,
        Layout::RegionBinned,
    ];

    /// On-disk name, used in file-name conventions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Linear => "linear",
            Layout::Binned => "binned",
            Layout::RegionLinear => "reg-linear",
            Layout::RegionBinned => "reg-binned",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = RegionHistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Layout::Linear),
            "binned" => Ok(Layout::Binned),
            "reg-linear" => Ok(Layout::RegionLinear),
            "reg-binned" => Ok(Layout::RegionBinned),
            other => Err(RegionHistError::UnknownLayout(other.to_string())),
        }
    }
}

/// Exact serialized size in bytes for the given shape.
pub fn encoded_size(frames: usize, regions: usize, colors: usize) -> usize {
    frames * regions * regions * colors * BUCKET_BYTES
}

#[inline]
fn put(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Serializes a batch under the given layout.
///
/// Fails with `LayoutMismatch` when the batch is empty or its frames disagree
/// on region count or histogram length. The returned buffer always has the
/// exact size `encoded_size` reports for the batch shape.
pub fn encode(batch: &HistogramBatch, layout: Layout) -> RegionHistResult<Vec<u8>> {
    let (frames, regions, colors) = batch.shape()?;
    let regions_sq = regions * regions;
    let _guard = trace_span!("encode_batch", frames, regions, layout = layout.as_str()).entered();

    let mut buf = Vec::with_capacity(encoded_size(frames, regions, colors));
    match layout {
        Layout::Linear => {
            for frame in batch.frames() {
                for hist in frame.hists() {
                    for &bucket in hist.buckets() {
                        put(&mut buf, bucket);
                    }
                }
            }
        }
        Layout::Binned => {
            for color in 0..colors {
                for frame in batch.frames() {
                    for hist in frame.hists() {
                        put(&mut buf, hist.buckets()[color]);
                    }
                }
            }
        }
        Layout::RegionLinear => {
            for region in 0..regions_sq {
                for frame in batch.frames() {
                    for &bucket in frame.hists()[region].buckets() {
                        put(&mut buf, bucket);
                    }
                }
            }
        }
        Layout::RegionBinned => {
            for region in 0..regions_sq {
                for color in 0..colors {
                    for frame in batch.frames() {
                        put(&mut buf, frame.hists()[region].buckets()[color]);
                    }
                }
            }
        }
    }

    debug_assert_eq!(buf.len(), encoded_size(frames, regions, colors));
    trace_event!("batch_encoded", bytes = buf.len());
    Ok(buf)
}

/// Parses a linear-layout buffer back into a batch.
///
/// Fails with `TruncatedBuffer` unless the byte length equals the exact size
/// the shape demands; the check runs before any indexing.
pub fn decode_linear(
    bytes: &[u8],
    frames: usize,
    regions: usize,
    colors: usize,
) -> RegionHistResult<HistogramBatch> {
    let needed = encoded_size(frames, regions, colors);
    if bytes.len() != needed {
        return Err(RegionHistError::TruncatedBuffer {
            needed,
            got: bytes.len(),
        });
    }

    let mut batch = HistogramBatch::new();
    let mut offset = 0;
    for _ in 0..frames {
        let mut hists = Vec::with_capacity(regions * regions);
        for _ in 0..regions * regions {
            let mut buckets = Vec::with_capacity(colors);
            for chunk in bytes[offset..offset + colors * BUCKET_BYTES].chunks_exact(BUCKET_BYTES) {
                buckets.push(u16::from_le_bytes([chunk[0], chunk[1]]));
            }
            offset += colors * BUCKET_BYTES;
            hists.push(CumulativeHistogram::from_buckets(buckets));
        }
        batch.push(FrameHistogramGrid::new(regions, colors, hists)?)?;
    }
    Ok(batch)
}
