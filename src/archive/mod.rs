// src/archive/mod.rs

//! Archive encoders for package filesystem trees
//!
//! - `tar`: tar streams (optionally gzip or xz compressed) for Debian and
//!   pacman packages
//! - `cpio`: newc cpio streams for RPM payloads
//!
//! Both encoders walk the tree in the same deterministic order and share the
//! timestamp policy: with `reproducible` set every timestamp is the Unix
//! epoch, otherwise it is the wall-clock time at encode time.

pub mod cpio;
pub mod tar;

use std::time::{SystemTime, UNIX_EPOCH};

pub use self::cpio::{to_cpio_archive, CpioEntry, CpioWriter};
pub use self::tar::{to_tar_archive, to_tar_gz_archive, to_tar_xz_archive};

/// File type bits for directories
pub const S_IFDIR: u32 = 0o040000;
/// File type bits for regular files
pub const S_IFREG: u32 = 0o100000;
/// File type bits for symbolic links
pub const S_IFLNK: u32 = 0o120000;

/// Permission bits written for every symlink
pub const SYMLINK_PERMISSIONS: u32 = 0o777;

/// Timestamp (seconds since the epoch) to stamp into archive entries
pub fn build_timestamp(reproducible: bool) -> u64 {
    if reproducible {
        return 0;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
