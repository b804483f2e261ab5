//! Difference frames.
//!
//! A difference frame is a headerless row-major grid of unsigned 8-bit
//! magnitudes produced by an external diff extractor (typically the absolute
//! frame-to-frame difference of a video). `FrameView` borrows such a grid
//! without copying; `OwnedFrame` holds one read from disk.

use crate::util::{RegionHistError, RegionHistResult};

pub mod io;

/// Borrowed, contiguous 2D view over difference values.
#[derive(Copy, Clone)]
pub struct FrameView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> FrameView<'a> {
    /// Creates a view over a row-major `height * width` byte slice.
    ///
    /// The slice length must match the dimensions exactly: a diff stream has
    /// no header or padding, so any size mismatch means a truncated or
    /// mislabeled input.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> RegionHistResult<Self> {
        if width == 0 || height == 0 {
            return Err(RegionHistError::InvalidDimensions { width, height });
        }
        let needed = width * height;
        if data.len() != needed {
            return Err(RegionHistError::TruncatedBuffer {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the backing slice, row-major.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns row `y` as a contiguous slice, if within bounds.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }
}

/// Owning difference frame, typically read from disk.
#[derive(Clone, Debug)]
pub struct OwnedFrame {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedFrame {
    /// Takes ownership of a row-major buffer with the given dimensions.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> RegionHistResult<Self> {
        FrameView::from_slice(&data, width, height)?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns a borrowed view of this frame.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameView, OwnedFrame};
    use crate::util::RegionHistError;

    #[test]
    fn view_rejects_zero_dimensions() {
        let data = [0u8; 4];
        let err = FrameView::from_slice(&data, 0, 4).err().unwrap();
        assert!(matches!(
            err,
            RegionHistError::InvalidDimensions {
                width: 0,
                height: 4
            }
        ));
    }

    #[test]
    fn view_rejects_size_mismatch() {
        let data = [0u8; 7];
        let err = FrameView::from_slice(&data, 4, 2).err().unwrap();
        assert!(matches!(
            err,
            RegionHistError::TruncatedBuffer { needed: 8, got: 7 }
        ));
    }

    #[test]
    fn rows_index_correctly() {
        let data: Vec<u8> = (0u8..12).collect();
        let view = FrameView::from_slice(&data, 4, 3).unwrap();
        assert_eq!(view.row(0).unwrap(), &[0, 1, 2, 3]);
        assert_eq!(view.row(2).unwrap(), &[8, 9, 10, 11]);
        assert!(view.row(3).is_none());
    }

    #[test]
    fn owned_frame_round_trips_view() {
        let frame = OwnedFrame::new(vec![5u8; 6], 3, 2).unwrap();
        let view = frame.view();
        assert_eq!(view.width(), 3);
        assert_eq!(view.height(), 2);
        assert_eq!(view.row(1).unwrap(), &[5, 5, 5]);
    }
}
