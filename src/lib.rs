// src/lib.rs

//! pkgforge: build system packages from an in-memory description
//!
//! A [`Package`] holds metadata plus a filesystem tree ([`FsDirectory`]).
//! Each supported format implements [`Generator`], which validates the
//! package, names the output file and serializes it:
//!
//! - `debian`: `.deb` (ar container with gzip/xz tarballs)
//! - `pacman`: `.pkg.tar.xz`
//! - `rpm`: `.rpm` (binary headers plus LZMA cpio payload)
//!
//! With `reproducible` builds all timestamps are the Unix epoch, so the
//! same package always produces the same bytes.

pub mod archive;
pub mod compression;
pub mod debian;
mod error;
pub mod filesystem;
pub mod generator;
pub mod manifest;
pub mod output;
pub mod package;
pub mod pacman;
pub mod rpm;

pub use error::{Error, Result};
pub use filesystem::{FsDirectory, FsNode, FsRegularFile, FsSymlink, Metadata};
pub use generator::{Generator, PackageFormat};
pub use package::Package;
