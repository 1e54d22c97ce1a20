// src/filesystem/mod.rs

//! Package filesystem tree
//!
//! This module provides:
//! - An ownership tree of directories, regular files and symlinks
//! - A deterministic, lazy depth-first walker over that tree
//!
//! The tree is the sole description of what a package installs; every
//! archive encoder and the installed-size accounting read from it.

mod node;
mod walk;

pub use node::{
    FsDirectory, FsNode, FsRegularFile, FsSymlink, Metadata, TreeStats, PERMISSION_MASK,
};
pub use walk::Walk;
