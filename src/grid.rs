//! Region geometry.
//!
//! A `RegionGrid` overlays `regions x regions` rectangular tiles on an image.
//! Base tile size is the floor of `width / regions` by `height / regions`; the
//! last row and column absorb the division remainder, so the tiling always
//! covers the image exactly.

use crate::util::{RegionHistError, RegionHistResult};

/// Pixel window of a single region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegionBounds {
    /// Leftmost pixel column.
    pub x0: usize,
    /// Topmost pixel row.
    pub y0: usize,
    /// Window width in pixels.
    pub width: usize,
    /// Window height in pixels.
    pub height: usize,
}

impl RegionBounds {
    /// Number of pixels in the window.
    pub fn pixels(&self) -> usize {
        self.width * self.height
    }
}

/// Tiling of an image into `regions x regions` rectangles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegionGrid {
    width: usize,
    height: usize,
    regions: usize,
    base_width: usize,
    base_height: usize,
}

impl RegionGrid {
    /// Builds a grid over a `width x height` image.
    ///
    /// Fails with `InvalidGeometry` when `regions` is zero or exceeds either
    /// image dimension (a region must hold at least one pixel).
    pub fn build(width: usize, height: usize, regions: usize) -> RegionHistResult<Self> {
        if regions == 0 || regions > width || regions > height {
            return Err(RegionHistError::InvalidGeometry {
                width,
                height,
                regions,
            });
        }
        Ok(Self {
            width,
            height,
            regions,
            base_width: width / regions,
            base_height: height / regions,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of regions per axis.
    pub fn regions(&self) -> usize {
        self.regions
    }

    /// Returns the pixel window of region `(row, col)`.
    ///
    /// The last row and column are wider/taller by the division remainder.
    pub fn bounds_of(&self, row: usize, col: usize) -> RegionHistResult<RegionBounds> {
        if row >= self.regions || col >= self.regions {
            return Err(RegionHistError::RegionOutOfBounds {
                row,
                col,
                regions: self.regions,
            });
        }
        let mut width = self.base_width;
        let mut height = self.base_height;
        if col == self.regions - 1 {
            width += self.width % self.regions;
        }
        if row == self.regions - 1 {
            height += self.height % self.regions;
        }
        Ok(RegionBounds {
            x0: col * self.base_width,
            y0: row * self.base_height,
            width,
            height,
        })
    }

    /// Walks all regions in row-major order, yielding `(row, col, bounds)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, RegionBounds)> + '_ {
        let regions = self.regions;
        (0..regions).flat_map(move |row| {
            (0..regions).map(move |col| {
                let bounds = self
                    .bounds_of(row, col)
                    .expect("indices generated within grid");
                (row, col, bounds)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RegionGrid;
    use crate::util::RegionHistError;

    #[test]
    fn rejects_degenerate_region_counts() {
        assert!(matches!(
            RegionGrid::build(16, 16, 0).err().unwrap(),
            RegionHistError::InvalidGeometry { regions: 0, .. }
        ));
        assert!(matches!(
            RegionGrid::build(4, 16, 5).err().unwrap(),
            RegionHistError::InvalidGeometry { regions: 5, .. }
        ));
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let grid = RegionGrid::build(16, 16, 4).unwrap();
        assert!(matches!(
            grid.bounds_of(4, 0).err().unwrap(),
            RegionHistError::RegionOutOfBounds { row: 4, col: 0, .. }
        ));
    }

    #[test]
    fn last_row_and_column_absorb_remainder() {
        let grid = RegionGrid::build(10, 7, 3).unwrap();
        let inner = grid.bounds_of(0, 0).unwrap();
        assert_eq!((inner.width, inner.height), (3, 2));
        let corner = grid.bounds_of(2, 2).unwrap();
        assert_eq!((corner.width, corner.height), (4, 3));
        assert_eq!((corner.x0, corner.y0), (6, 4));
    }

    #[test]
    fn region_sizes_tile_the_image_exactly() {
        for (width, height, regions) in [(10, 7, 3), (704, 576, 32), (17, 17, 4), (5, 9, 5)] {
            let grid = RegionGrid::build(width, height, regions).unwrap();
            for row in 0..regions {
                let row_width: usize = (0..regions)
                    .map(|col| grid.bounds_of(row, col).unwrap().width)
                    .sum();
                assert_eq!(row_width, width);
            }
            for col in 0..regions {
                let col_height: usize = (0..regions)
                    .map(|row| grid.bounds_of(row, col).unwrap().height)
                    .sum();
                assert_eq!(col_height, height);
            }
            let total: usize = grid.iter().map(|(_, _, b)| b.pixels()).sum();
            assert_eq!(total, width * height);
        }
    }
}
