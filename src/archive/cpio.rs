// src/archive/cpio.rs

//! CPIO New ASCII (newc) archives
//!
//! RPM payloads are newc cpio archives. Every record is a 110-byte ASCII
//! header, the NUL-terminated name padded to a 4-byte boundary, and the
//! content padded to a 4-byte boundary. The archive ends with a
//! `TRAILER!!!` record.

use std::io::{self, Write};

use super::{build_timestamp, S_IFDIR, S_IFLNK, S_IFREG, SYMLINK_PERMISSIONS};
use crate::filesystem::{FsDirectory, FsNode};

/// CPIO New ASCII Format (newc) header size
const HEADER_SIZE: usize = 110;
/// Magic string for newc format
const MAGIC_NEWC: &str = "070701";
/// Name of the end-of-archive record
const TRAILER_NAME: &str = "TRAILER!!!";

/// CPIO entry metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpioEntry {
    pub name: String,
    pub size: u64,
    pub mode: u32,
    pub mtime: u64,
    pub uid: u32,
    pub gid: u32,
    pub ino: u32,
    pub nlink: u32,
}

/// Number of padding bytes needed to reach the next 4-byte boundary
#[inline]
fn padding(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

/// A writer for CPIO (New ASCII) archives
pub struct CpioWriter<W: Write> {
    writer: W,
}

impl<W: Write> CpioWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Append an entry with its content
    pub fn append(&mut self, entry: &CpioEntry, content: &[u8]) -> io::Result<()> {
        let filesize = u32::try_from(content.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is too large for a cpio archive", entry.name),
            )
        })?;
        let namesize = entry.name.len() + 1;

        let header = format!(
            "{}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}",
            MAGIC_NEWC,
            entry.ino,
            entry.mode,
            entry.uid,
            entry.gid,
            entry.nlink,
            entry.mtime as u32,
            filesize,
            0, // devmajor
            0, // devminor
            0, // rdevmajor
            0, // rdevminor
            namesize,
            0, // check
        );
        debug_assert_eq!(header.len(), HEADER_SIZE);

        self.write_bytes(header.as_bytes())?;
        self.write_bytes(entry.name.as_bytes())?;
        self.write_bytes(&[0])?;
        self.write_padding(HEADER_SIZE + namesize)?;

        self.write_bytes(content)?;
        self.write_padding(content.len())
    }

    /// Write the trailer record and return the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        let trailer = CpioEntry {
            name: TRAILER_NAME.to_string(),
            size: 0,
            mode: 0,
            mtime: 0,
            uid: 0,
            gid: 0,
            ino: 0,
            nlink: 1,
        };
        self.append(&trailer, &[])?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    fn write_padding(&mut self, len: usize) -> io::Result<()> {
        let pad = padding(len);
        if pad > 0 {
            self.write_bytes(&[0u8; 3][..pad])?;
        }
        Ok(())
    }
}

/// Encode every node below `root` as a newc cpio archive
///
/// Entry names carry a leading `./` as RPM expects. Inode numbers are
/// assigned in walk order starting at 1.
pub fn to_cpio_archive(root: &FsDirectory, reproducible: bool) -> io::Result<Vec<u8>> {
    let mtime = build_timestamp(reproducible);
    let mut writer = CpioWriter::new(Vec::new());
    let mut ino = 0u32;

    root.walk(".", |path, node| -> io::Result<()> {
        ino += 1;
        let mut entry = CpioEntry {
            name: path.to_string(),
            size: 0,
            mode: 0,
            mtime,
            uid: 0,
            gid: 0,
            ino,
            nlink: 1,
        };

        match node {
            FsNode::Directory(dir) => {
                entry.mode = S_IFDIR | dir.metadata.permissions();
                entry.uid = dir.metadata.uid;
                entry.gid = dir.metadata.gid;
                entry.nlink = 2;
                writer.append(&entry, &[])
            }
            FsNode::RegularFile(file) => {
                entry.mode = S_IFREG | file.metadata.permissions();
                entry.uid = file.metadata.uid;
                entry.gid = file.metadata.gid;
                entry.size = file.size();
                writer.append(&entry, &file.content)
            }
            FsNode::Symlink(link) => {
                entry.mode = S_IFLNK | SYMLINK_PERMISSIONS;
                entry.size = link.target.len() as u64;
                writer.append(&entry, link.target.as_bytes())
            }
        }
    })?;

    writer.finish()
}
