//! Error types for regionhist.

use thiserror::Error;

/// Result alias for regionhist operations.
pub type RegionHistResult<T> = std::result::Result<T, RegionHistError>;

/// Errors that can occur when building, serializing, or querying histograms.
///
/// All variants are recoverable at the caller boundary: an operation either
/// returns a complete result or one of these, never a partial one.
#[derive(Debug, Error)]
pub enum RegionHistError {
    /// A frame was constructed with a zero width or height.
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The region count does not fit the image dimensions.
    #[error("invalid geometry: {regions} regions per axis over {width}x{height} image")]
    InvalidGeometry {
        width: usize,
        height: usize,
        regions: usize,
    },
    /// A region index lies outside the grid.
    #[error("region ({row}, {col}) out of bounds for {regions}x{regions} grid")]
    RegionOutOfBounds {
        row: usize,
        col: usize,
        regions: usize,
    },
    /// A region resolved to zero pixels.
    #[error("region ({row}, {col}) contains no pixels")]
    EmptyRegion { row: usize, col: usize },
    /// A query named no regions at all.
    #[error("query names no regions")]
    EmptyQuery,
    /// A region holds more pixels than a 16-bit histogram bucket can count.
    #[error("region pixel count {pixels} exceeds 16-bit bucket capacity")]
    BucketOverflow { pixels: usize },
    /// Frames in a batch disagree on shape, or the batch cannot be encoded.
    #[error("layout mismatch: {reason}")]
    LayoutMismatch { reason: &'static str },
    /// A buffer does not have the exact size the shape parameters demand.
    #[error("truncated buffer: needed {needed} bytes, got {got}")]
    TruncatedBuffer { needed: usize, got: usize },
    /// An on-disk layout name was not recognized.
    #[error("unknown layout name: {0}")]
    UnknownLayout(String),
    /// The threshold value lies outside the histogram's value domain.
    #[error("threshold value {value} outside value domain of {colors} colors")]
    ThresholdOutOfRange { value: usize, colors: usize },
    /// The compression adapter reported corrupt or undecodable bytes.
    #[error("compression failure: {reason}")]
    CompressionFailure { reason: String },
    /// An underlying file operation failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
