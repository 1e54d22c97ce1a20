// src/rpm/payload.rs

//! RPM payload: the package tree as an LZMA-compressed cpio archive

use tracing::debug;

use crate::archive::to_cpio_archive;
use crate::compression::{compress, CompressionFormat};
use crate::error::Result;
use crate::filesystem::FsDirectory;

/// The compressed payload plus the size the ARCHIVESIZE tag needs
#[derive(Debug, Clone)]
pub struct Payload {
    pub compressed: Vec<u8>,
    /// Length of the cpio archive before compression
    pub uncompressed_size: u64,
}

impl Payload {
    pub fn build(root: &FsDirectory, reproducible: bool) -> Result<Self> {
        let archive = to_cpio_archive(root, reproducible)?;
        let compressed = compress(&archive, CompressionFormat::Lzma)?;

        debug!(
            "RPM payload: {} bytes cpio, {} bytes lzma",
            archive.len(),
            compressed.len()
        );

        Ok(Self {
            compressed,
            uncompressed_size: archive.len() as u64,
        })
    }
}
