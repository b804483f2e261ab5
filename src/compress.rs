//! Compression adapters.
//!
//! The core treats compression as an opaque byte-to-byte capability: the
//! surrounding harness decides which algorithms to try and injects them here.
//! The only requirement is that `decompress(compress(x)) == x` and that
//! corrupt input surfaces as `CompressionFailure` rather than a panic.

use crate::util::{RegionHistError, RegionHistResult};

/// Byte-to-byte compressor/decompressor pair.
pub trait Compressor {
    /// Short tag used as a file-name extension, e.g. `zlib-6`.
    fn name(&self) -> &str;

    /// Compresses a buffer.
    fn compress(&self, data: &[u8]) -> RegionHistResult<Vec<u8>>;

    /// Decompresses a buffer produced by `compress`.
    fn decompress(&self, data: &[u8]) -> RegionHistResult<Vec<u8>>;
}

/// Passthrough adapter for uncompressed stores and testing.
#[derive(Copy, Clone, Debug, Default)]
pub struct Identity;

impl Compressor for Identity {
    fn name(&self) -> &str {
        "none"
    }

    fn compress(&self, data: &[u8]) -> RegionHistResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> RegionHistResult<Vec<u8>> {
        Ok(data.to_vec())
    }
}

/// Zlib adapter backed by `flate2` (feature `zlib`).
#[cfg(feature = "zlib")]
pub struct Zlib {
    level: u32,
    name: String,
}

#[cfg(feature = "zlib")]
impl Zlib {
    /// Creates an adapter with an explicit compression level (0-9).
    pub fn new(level: u32) -> Self {
        let level = level.min(9);
        Self {
            name: format!("zlib-{level}"),
            level,
        }
    }

    fn failure(err: std::io::Error) -> RegionHistError {
        RegionHistError::CompressionFailure {
            reason: err.to_string(),
        }
    }
}

#[cfg(feature = "zlib")]
impl Default for Zlib {
    /// Level 6, the setting the original query path stores files with.
    fn default() -> Self {
        Self::new(6)
    }
}

#[cfg(feature = "zlib")]
impl Compressor for Zlib {
    fn name(&self) -> &str {
        &self.name
    }

    fn compress(&self, data: &[u8]) -> RegionHistResult<Vec<u8>> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(data).map_err(Self::failure)?;
        encoder.finish().map_err(Self::failure)
    }

    fn decompress(&self, data: &[u8]) -> RegionHistResult<Vec<u8>> {
        use flate2::write::ZlibDecoder;
        use std::io::Write;

        let mut decoder = ZlibDecoder::new(Vec::new());
        decoder.write_all(data).map_err(Self::failure)?;
        decoder.finish().map_err(Self::failure)
    }
}
