// src/archive/tar.rs

//! Tar encoder for package filesystem trees
//!
//! Entry names and link targets are written into the header verbatim.
//! `tar::Header::set_path` normalizes paths (it drops a leading `./`), which
//! would break the `./name` convention Debian archives use, so the name
//! fields are filled in directly and names longer than the ustar field are
//! carried by GNU long-name records.

use std::io;

use tar::{Builder, EntryType, Header};
use tracing::debug;

use super::{build_timestamp, S_IFDIR, S_IFLNK, S_IFREG, SYMLINK_PERMISSIONS};
use crate::compression::{compress, CompressionFormat};
use crate::error::Result;
use crate::filesystem::{FsDirectory, FsNode};

/// Name of the pseudo-entry carrying GNU long names and link targets
const GNU_LONG_LINK: &[u8] = b"././@LongLink";

/// Create a tar archive containing every node below `root`
///
/// With `leading_dot = true` entry paths look like `./etc/foo.conf`,
/// otherwise like `etc/foo.conf`. Directory entries end in `/`.
pub fn to_tar_archive(root: &FsDirectory, leading_dot: bool, reproducible: bool) -> Result<Vec<u8>> {
    let timestamp = build_timestamp(reproducible);
    let mut builder = Builder::new(Vec::new());
    let mut entries = 0usize;

    root.walk(".", |path, node| -> io::Result<()> {
        let path = if leading_dot {
            path
        } else {
            path.strip_prefix("./").unwrap_or(path)
        };
        entries += 1;

        let mut header = Header::new_gnu();
        header.set_mtime(timestamp);
        if let Some(gnu) = header.as_gnu_mut() {
            gnu.set_atime(timestamp);
            gnu.set_ctime(timestamp);
        }

        match node {
            FsNode::Directory(dir) => {
                header.set_entry_type(EntryType::Directory);
                header.set_mode(S_IFDIR | dir.metadata.permissions());
                header.set_uid(dir.metadata.uid.into());
                header.set_gid(dir.metadata.gid.into());
                header.set_size(0);
                append_entry(&mut builder, header, &format!("{}/", path), None, &[])
            }
            FsNode::RegularFile(file) => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(S_IFREG | file.metadata.permissions());
                header.set_uid(file.metadata.uid.into());
                header.set_gid(file.metadata.gid.into());
                header.set_size(file.size());
                append_entry(&mut builder, header, path, None, &file.content)
            }
            FsNode::Symlink(link) => {
                header.set_entry_type(EntryType::Symlink);
                header.set_mode(S_IFLNK | SYMLINK_PERMISSIONS);
                header.set_uid(0);
                header.set_gid(0);
                header.set_size(0);
                append_entry(&mut builder, header, path, Some(&link.target), &[])
            }
        }
    })?;

    let data = builder.into_inner()?;
    debug!("Encoded tar archive: {} entries, {} bytes", entries, data.len());
    Ok(data)
}

/// Identical to [`to_tar_archive`], but gzip-compresses the result
pub fn to_tar_gz_archive(root: &FsDirectory, leading_dot: bool, reproducible: bool) -> Result<Vec<u8>> {
    let data = to_tar_archive(root, leading_dot, reproducible)?;
    Ok(compress(&data, CompressionFormat::Gzip)?)
}

/// Identical to [`to_tar_archive`], but xz-compresses the result
pub fn to_tar_xz_archive(root: &FsDirectory, leading_dot: bool, reproducible: bool) -> Result<Vec<u8>> {
    let data = to_tar_archive(root, leading_dot, reproducible)?;
    Ok(compress(&data, CompressionFormat::Xz)?)
}

/// Fill in name and link target, then append header and content
fn append_entry(
    builder: &mut Builder<Vec<u8>>,
    mut header: Header,
    name: &str,
    link_target: Option<&str>,
    content: &[u8],
) -> io::Result<()> {
    if let Some(target) = link_target {
        write_name_field(builder, &mut header.as_old_mut().linkname, target, EntryType::GNULongLink)?;
    }
    write_name_field(builder, &mut header.as_old_mut().name, name, EntryType::GNULongName)?;

    header.set_cksum();
    builder.append(&header, content)
}

/// Copy `value` into a 100-byte header field
///
/// Values that don't fit are emitted first as a GNU long-name (or
/// long-link) record; the field then keeps the truncated prefix.
fn write_name_field(
    builder: &mut Builder<Vec<u8>>,
    field: &mut [u8; 100],
    value: &str,
    kind: EntryType,
) -> io::Result<()> {
    let bytes = value.as_bytes();

    if bytes.len() > field.len() {
        let mut extension = Header::new_gnu();
        extension.as_old_mut().name[..GNU_LONG_LINK.len()].copy_from_slice(GNU_LONG_LINK);
        extension.set_mode(0o644);
        extension.set_uid(0);
        extension.set_gid(0);
        extension.set_mtime(0);
        extension.set_size(bytes.len() as u64 + 1);
        extension.set_entry_type(kind);
        extension.set_cksum();

        let mut data = Vec::with_capacity(bytes.len() + 1);
        data.extend_from_slice(bytes);
        data.push(0);
        builder.append(&extension, data.as_slice())?;
    }

    let len = bytes.len().min(field.len());
    field[..len].copy_from_slice(&bytes[..len]);
    Ok(())
}
