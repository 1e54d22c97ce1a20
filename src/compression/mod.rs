// src/compression/mod.rs
//! Unified compression/decompression utilities
//!
//! Provides a consistent interface for the compression formats used by the
//! package generators: gzip (Debian control archive), xz (Debian data
//! archive, pacman packages) and legacy LZMA (RPM payload).
//!
//! All encoders are deterministic: identical input always produces
//! identical output, which reproducible builds rely on.

use std::io::{self, Read, Write};
use thiserror::Error;
use xz2::stream::{LzmaOptions, Stream};

/// Default preset for xz streams
pub const XZ_PRESET: u32 = 6;

/// Preset for legacy LZMA streams. The RPM header advertises this value in
/// its payload flags, so the two must not drift apart.
pub const LZMA_PRESET: u32 = 5;

/// Compression-related errors
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Failed to create {format} stream: {message}")]
    StreamCreation {
        format: &'static str,
        message: String,
    },

    #[error("Failed to compress {format} data: {source}")]
    Compression {
        format: &'static str,
        source: io::Error,
    },

    #[error("Failed to decompress {format} data: {source}")]
    Decompression {
        format: &'static str,
        source: io::Error,
    },
}

/// Supported compression formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// No compression (raw data)
    None,
    /// Gzip compression (.gz)
    Gzip,
    /// XZ compression (.xz)
    Xz,
    /// Legacy LZMA "alone" format (.lzma)
    Lzma,
}

impl CompressionFormat {
    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
        }
    }
}

impl std::fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compress a byte slice using the specified format
pub fn compress(data: &[u8], format: CompressionFormat) -> Result<Vec<u8>, CompressionError> {
    let wrap = |source: io::Error| CompressionError::Compression {
        format: format.name(),
        source,
    };

    match format {
        CompressionFormat::None => Ok(data.to_vec()),
        CompressionFormat::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).map_err(wrap)?;
            encoder.finish().map_err(wrap)
        }
        CompressionFormat::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), XZ_PRESET);
            encoder.write_all(data).map_err(wrap)?;
            encoder.finish().map_err(wrap)
        }
        CompressionFormat::Lzma => {
            let stream = lzma_encoder_stream()?;
            let mut encoder = xz2::write::XzEncoder::new_stream(Vec::new(), stream);
            encoder.write_all(data).map_err(wrap)?;
            encoder.finish().map_err(wrap)
        }
    }
}

fn lzma_encoder_stream() -> Result<Stream, CompressionError> {
    let stream_error = |e: xz2::stream::Error| CompressionError::StreamCreation {
        format: "lzma",
        message: e.to_string(),
    };
    let options = LzmaOptions::new_preset(LZMA_PRESET).map_err(stream_error)?;
    Stream::new_lzma_encoder(&options).map_err(stream_error)
}

/// Create a decompressing reader for the given format
///
/// Returns a boxed `Read` implementation that decompresses data on the fly.
/// For `CompressionFormat::None`, returns the reader unchanged.
pub fn create_decoder<'a, R: Read + 'a>(
    reader: R,
    format: CompressionFormat,
) -> Result<Box<dyn Read + 'a>, CompressionError> {
    match format {
        CompressionFormat::None => Ok(Box::new(reader)),
        CompressionFormat::Gzip => Ok(Box::new(flate2::read::GzDecoder::new(reader))),
        CompressionFormat::Xz => Ok(Box::new(xz2::read::XzDecoder::new(reader))),
        CompressionFormat::Lzma => {
            let stream = Stream::new_lzma_decoder(u64::MAX).map_err(|e| {
                CompressionError::StreamCreation {
                    format: "lzma",
                    message: e.to_string(),
                }
            })?;
            Ok(Box::new(xz2::read::XzDecoder::new_stream(reader, stream)))
        }
    }
}

/// Decompress a byte slice using the specified format
pub fn decompress(data: &[u8], format: CompressionFormat) -> Result<Vec<u8>, CompressionError> {
    let mut decoder = create_decoder(data, format)?;
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| CompressionError::Decompression {
            format: format.name(),
            source: e,
        })?;
    Ok(output)
}
