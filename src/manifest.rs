// src/manifest.rs
//! Package manifest (TOML) parsing
//!
//! A manifest describes one package: its metadata in `[package]` and the
//! installed tree as `[[directory]]`, `[[file]]` and `[[symlink]]` entries.
//!
//! ```toml
//! [package]
//! name = "foo"
//! version = "1.0"
//! author = "Jane Doe <jane@example.org>"
//! description = "Foo tool"
//!
//! [[file]]
//! path = "/etc/foo.conf"
//! content = "bar\n"
//! mode = 0o600
//!
//! [[symlink]]
//! path = "/usr/bin/foo"
//! target = "/opt/foo/bin/foo"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::filesystem::Metadata;
use crate::package::Package;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Root structure of a package manifest
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub package: PackageSection,

    #[serde(default, rename = "directory")]
    pub directories: Vec<DirectoryEntry>,

    #[serde(default, rename = "file")]
    pub files: Vec<FileEntry>,

    #[serde(default, rename = "symlink")]
    pub symlinks: Vec<SymlinkEntry>,

    /// Directory that `content_from` paths are relative to
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Package metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSection {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub epoch: u32,
    #[serde(default = "default_release")]
    pub release: u32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Shell script run after installation
    #[serde(default)]
    pub setup_script: Option<String>,
    /// Shell script run after removal
    #[serde(default)]
    pub cleanup_script: Option<String>,
}

fn default_release() -> u32 {
    1
}

fn default_directory_mode() -> u32 {
    0o755
}

fn default_file_mode() -> u32 {
    0o644
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    pub path: String,
    #[serde(default = "default_directory_mode")]
    pub mode: u32,
    #[serde(default)]
    pub uid: u32,
    #[serde(default)]
    pub gid: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub path: String,
    /// Inline file content
    #[serde(default)]
    pub content: Option<String>,
    /// Read file content from this path instead
    #[serde(default)]
    pub content_from: Option<PathBuf>,
    #[serde(default = "default_file_mode")]
    pub mode: u32,
    #[serde(default)]
    pub uid: u32,
    #[serde(default)]
    pub gid: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymlinkEntry {
    pub path: String,
    pub target: String,
}

impl PackageManifest {
    /// Load manifest from a file path
    ///
    /// Relative `content_from` paths resolve against the manifest's directory.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        let mut manifest = Self::parse(&content)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Parse manifest from a TOML string
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let manifest: PackageManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest for required fields and consistency
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.package.name.is_empty() {
            return Err(ManifestError::MissingField("package.name".to_string()));
        }
        if self.package.version.is_empty() {
            return Err(ManifestError::MissingField("package.version".to_string()));
        }

        let paths = self
            .directories
            .iter()
            .map(|d| d.path.as_str())
            .chain(self.files.iter().map(|f| f.path.as_str()))
            .chain(self.symlinks.iter().map(|s| s.path.as_str()));
        for path in paths {
            if !path.starts_with('/') {
                return Err(ManifestError::Invalid(format!(
                    "path \"{}\" is not absolute",
                    path
                )));
            }
        }

        for file in &self.files {
            if file.content.is_some() && file.content_from.is_some() {
                return Err(ManifestError::Invalid(format!(
                    "file {} has both content and content_from",
                    file.path
                )));
            }
        }
        Ok(())
    }

    /// Build the package described by this manifest
    ///
    /// Directories are created first, so explicit directory modes apply even
    /// when files below them are listed too.
    pub fn into_package(self) -> Result<Package, ManifestError> {
        let mut pkg = Package::new(self.package.name, self.package.version);
        pkg.epoch = self.package.epoch;
        pkg.release = self.package.release;
        pkg.author = self.package.author;
        pkg.description = self.package.description;
        pkg.setup_script = self.package.setup_script;
        pkg.cleanup_script = self.package.cleanup_script;

        for dir in &self.directories {
            let metadata = Metadata::new(dir.mode).with_owner(dir.uid, dir.gid);
            pkg.fs_root
                .mkdir_p(&dir.path, metadata)
                .map_err(|e| ManifestError::Invalid(e.to_string()))?;
        }

        for file in &self.files {
            let content = match (&file.content, &file.content_from) {
                (_, Some(source)) => {
                    let source = match &self.base_dir {
                        Some(base) => base.join(source),
                        None => source.clone(),
                    };
                    std::fs::read(&source)?
                }
                (Some(content), None) => content.clone().into_bytes(),
                (None, None) => Vec::new(),
            };
            let metadata = Metadata::new(file.mode).with_owner(file.uid, file.gid);
            pkg.fs_root
                .add_file(&file.path, content, metadata)
                .map_err(|e| ManifestError::Invalid(e.to_string()))?;
        }

        for link in &self.symlinks {
            pkg.fs_root
                .add_symlink(&link.path, link.target.as_str())
                .map_err(|e| ManifestError::Invalid(e.to_string()))?;
        }

        Ok(pkg)
    }
}
