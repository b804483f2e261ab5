//! Reading and writing raw difference-frame files.
//!
//! The diff extractor stores one frame per file as `height * width` unsigned
//! bytes, row-major, no header.

use crate::frame::{FrameView, OwnedFrame};
use crate::util::RegionHistResult;
use std::fs;
use std::path::Path;

/// Reads a raw difference frame from disk.
///
/// Fails with `TruncatedBuffer` if the file size does not match the expected
/// dimensions exactly.
pub fn read_diff_frame<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
) -> RegionHistResult<OwnedFrame> {
    let data = fs::read(path)?;
    OwnedFrame::new(data, width, height)
}

/// Writes a difference frame to disk as a headerless byte stream.
pub fn write_diff_frame<P: AsRef<Path>>(path: P, frame: FrameView<'_>) -> RegionHistResult<()> {
    fs::write(path, frame.as_slice())?;
    Ok(())
}
