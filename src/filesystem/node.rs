// src/filesystem/node.rs

//! In-memory filesystem tree describing a package's installed layout
//!
//! The tree is an ownership hierarchy: every directory owns its children
//! exclusively, keyed by name. Children live in a `BTreeMap` so iteration
//! order is the byte order of their names, independent of insertion order.
//!
//! # Example
//!
//! ```
//! use pkgforge::filesystem::{FsDirectory, FsNode, Metadata};
//!
//! let mut root = FsDirectory::new();
//! root.insert("etc/foo.conf", FsNode::file(b"bar\n".to_vec(), Metadata::new(0o644)))?;
//! root.insert("usr/bin/foo", FsNode::symlink("/etc/foo.conf"))?;
//!
//! assert!(root.lookup("etc").unwrap().is_directory());
//! assert_eq!(root.installed_size_in_bytes(), 4);
//! # Ok::<(), pkgforge::Error>(())
//! ```

use std::collections::btree_map::{self, BTreeMap, Entry};

use crate::error::{Error, Result};

/// Permission bits that may be stored in [`Metadata::mode`]
pub const PERMISSION_MASK: u32 = 0o7777;

/// Ownership and permissions of a directory or regular file
///
/// `mode` holds permission bits only. The file type bits are added by the
/// encoders according to the node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

impl Metadata {
    /// Root-owned metadata with the given mode
    pub fn new(mode: u32) -> Self {
        Self {
            mode,
            uid: 0,
            gid: 0,
        }
    }

    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    /// Stored mode masked to permission bits
    #[inline]
    pub fn permissions(&self) -> u32 {
        self.mode & PERMISSION_MASK
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new(0o755)
    }
}

/// A node in the package filesystem tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsNode {
    Directory(FsDirectory),
    RegularFile(FsRegularFile),
    Symlink(FsSymlink),
}

impl FsNode {
    /// Empty directory with the given metadata
    pub fn directory(metadata: Metadata) -> Self {
        Self::Directory(FsDirectory::with_metadata(metadata))
    }

    pub fn file(content: impl Into<Vec<u8>>, metadata: Metadata) -> Self {
        Self::RegularFile(FsRegularFile {
            content: content.into(),
            metadata,
        })
    }

    pub fn symlink(target: impl Into<String>) -> Self {
        Self::Symlink(FsSymlink {
            target: target.into(),
        })
    }

    #[inline]
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    #[inline]
    pub fn is_regular_file(&self) -> bool {
        matches!(self, Self::RegularFile(_))
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink(_))
    }

    /// Metadata of directories and regular files; symlinks carry none
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Self::Directory(dir) => Some(&dir.metadata),
            Self::RegularFile(file) => Some(&file.metadata),
            Self::Symlink(_) => None,
        }
    }
}

/// A regular file with its full content held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsRegularFile {
    pub content: Vec<u8>,
    pub metadata: Metadata,
}

impl FsRegularFile {
    #[inline]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// A symbolic link. Always encoded with mode 0777 and no owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsSymlink {
    pub target: String,
}

/// A directory owning its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsDirectory {
    entries: BTreeMap<String, FsNode>,
    pub metadata: Metadata,
}

impl Default for FsDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl FsDirectory {
    /// Create an empty root-owned directory with mode 0755
    pub fn new() -> Self {
        Self::with_metadata(Metadata::default())
    }

    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            entries: BTreeMap::new(),
            metadata,
        }
    }

    /// Direct children in ascending name order
    pub fn entries(&self) -> btree_map::Iter<'_, String, FsNode> {
        self.entries.iter()
    }

    /// Number of direct children
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a node by its path relative to this directory
    ///
    /// Leading `/` and `./` are accepted. Returns None for the directory
    /// itself and for paths that don't exist.
    pub fn lookup(&self, path: &str) -> Option<&FsNode> {
        let components = split_path(path).ok()?;
        let (name, parents) = components.split_last()?;

        let mut current = self;
        for component in parents {
            match current.entries.get(*component)? {
                FsNode::Directory(dir) => current = dir,
                _ => return None,
            }
        }
        current.entries.get(*name)
    }

    /// Like [`lookup`](Self::lookup), but reports missing paths as an error
    pub fn get(&self, path: &str) -> Result<&FsNode> {
        self.lookup(path)
            .ok_or_else(|| Error::NotFound(format!("path not found: {}", path)))
    }

    #[inline]
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Insert a node at the given path
    ///
    /// Missing parent directories are created root-owned with mode 0755.
    pub fn insert(&mut self, path: &str, node: FsNode) -> Result<()> {
        let components = split_path(path)?;
        let (name, parents) = components
            .split_last()
            .ok_or_else(|| Error::InvalidPath("cannot replace the root directory".into()))?;

        let parent = self.ensure_directories(parents, path)?;
        match parent.entries.entry((*name).to_string()) {
            Entry::Occupied(_) => Err(Error::AlreadyExists(format!(
                "path already exists: {}",
                path
            ))),
            Entry::Vacant(slot) => {
                slot.insert(node);
                Ok(())
            }
        }
    }

    /// Add a regular file, creating parent directories as needed
    pub fn add_file(
        &mut self,
        path: &str,
        content: impl Into<Vec<u8>>,
        metadata: Metadata,
    ) -> Result<()> {
        self.insert(path, FsNode::file(content, metadata))
    }

    /// Add a symlink, creating parent directories as needed
    pub fn add_symlink(&mut self, path: &str, target: impl Into<String>) -> Result<()> {
        self.insert(path, FsNode::symlink(target))
    }

    /// Create a directory and all missing parents
    ///
    /// If the directory already exists its metadata is replaced, so explicit
    /// directory definitions win over implicitly created parents.
    pub fn mkdir_p(&mut self, path: &str, metadata: Metadata) -> Result<()> {
        let components = split_path(path)?;
        let dir = self.ensure_directories(&components, path)?;
        dir.metadata = metadata;
        Ok(())
    }

    /// Sum of the content sizes of all regular files below this directory
    pub fn installed_size_in_bytes(&self) -> u64 {
        self.iter()
            .filter_map(|(_, node)| match node {
                FsNode::RegularFile(file) => Some(file.size()),
                _ => None,
            })
            .sum()
    }

    /// Get statistics about the tree below this directory
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();

        for (_, node) in self.iter() {
            match node {
                FsNode::Directory(_) => stats.directories += 1,
                FsNode::RegularFile(file) => {
                    stats.files += 1;
                    stats.total_size += file.size();
                }
                FsNode::Symlink(_) => stats.symlinks += 1,
            }
        }

        stats
    }

    fn ensure_directories(
        &mut self,
        components: &[&str],
        full_path: &str,
    ) -> Result<&mut FsDirectory> {
        let mut current = self;
        for component in components {
            let entry = current
                .entries
                .entry((*component).to_string())
                .or_insert_with(|| FsNode::Directory(FsDirectory::new()));
            current = match entry {
                FsNode::Directory(dir) => dir,
                _ => {
                    return Err(Error::InvalidPath(format!(
                        "parent is not a directory: {} (in {})",
                        component, full_path
                    )));
                }
            };
        }
        Ok(current)
    }
}

/// Statistics about a filesystem tree (the root directory is not counted)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    /// Total size of all regular files in bytes
    pub total_size: u64,
}

/// Split a path into its name components
///
/// Leading slashes and `.` components are dropped; `..` is rejected since
/// nodes can only ever be placed below the root.
fn split_path(path: &str) -> Result<Vec<&str>> {
    let mut components = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                return Err(Error::InvalidPath(format!(
                    "path must not contain '..': {}",
                    path
                )));
            }
            name => components.push(name),
        }
    }
    Ok(components)
}
