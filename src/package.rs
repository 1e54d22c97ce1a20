// src/package.rs

//! The package entity consumed by every generator

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filesystem::FsDirectory;
use crate::generator::Generator;

/// A package ready to be serialized
///
/// Built once per invocation and only read by the generators. `fs_root` is
/// the sole description of the installed files and of the installed size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    /// Epoch, 0 if the package has none
    pub epoch: u32,
    pub release: u32,
    /// Packager/maintainer, usually "Name <email>"
    pub author: String,
    /// Free text; the first line doubles as the summary
    pub description: String,
    /// Shell script run after installation
    pub setup_script: Option<String>,
    /// Shell script run after removal
    pub cleanup_script: Option<String>,
    pub fs_root: FsDirectory,
}

impl Package {
    /// Create a package with release 1, no epoch and an empty tree
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            epoch: 0,
            release: 1,
            author: String::new(),
            description: String::new(),
            setup_script: None,
            cleanup_script: None,
            fs_root: FsDirectory::new(),
        }
    }

    /// First line of the description
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }

    /// Version with epoch prefix if the package has one, e.g. `2:1.0`
    pub fn version_with_epoch(&self) -> String {
        if self.epoch > 0 {
            format!("{}:{}", self.epoch, self.version)
        } else {
            self.version.clone()
        }
    }

    /// `[epoch:]version-release`, as used by dpkg and pacman
    pub fn full_version(&self) -> String {
        format!("{}-{}", self.version_with_epoch(), self.release)
    }

    /// Setup script, if present and non-empty
    pub fn setup_script(&self) -> Option<&str> {
        non_empty(self.setup_script.as_deref())
    }

    /// Cleanup script, if present and non-empty
    pub fn cleanup_script(&self) -> Option<&str> {
        non_empty(self.cleanup_script.as_deref())
    }

    /// Sum of the sizes of all regular files in the tree
    pub fn installed_size_in_bytes(&self) -> u64 {
        self.fs_root.installed_size_in_bytes()
    }

    /// Checks every format needs: a name and a version
    pub fn validate_common(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(Error::Validation("package name is missing".into()));
        }
        if self.version.trim().is_empty() {
            errors.push(Error::Validation("package version is missing".into()));
        }
        errors
    }

    /// Every problem preventing this package from being built by `generator`
    pub fn validate(&self, generator: &dyn Generator) -> Vec<Error> {
        let mut errors = self.validate_common();
        errors.extend(generator.validate(self));
        errors
    }

    /// Serialize this package with `generator`
    pub fn build(&self, generator: &dyn Generator, reproducible: bool) -> Result<Vec<u8>> {
        let stats = self.fs_root.stats();
        debug!(
            "Building {} ({} dirs, {} files, {} symlinks, reproducible: {})",
            generator.recommended_file_name(self),
            stats.directories,
            stats.files,
            stats.symlinks,
            reproducible
        );

        let data = generator.build(self, reproducible)?;
        info!(
            "Built {} ({} bytes)",
            generator.recommended_file_name(self),
            data.len()
        );
        Ok(data)
    }
}

fn non_empty(script: Option<&str>) -> Option<&str> {
    script.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_first_line() {
        let mut pkg = Package::new("foo", "1.0");
        pkg.description = "Short summary\nLonger text\nmore".to_string();
        assert_eq!(pkg.summary(), "Short summary");

        pkg.description = String::new();
        assert_eq!(pkg.summary(), "");
    }

    #[test]
    fn test_version_strings() {
        let mut pkg = Package::new("foo", "1.2.3");
        pkg.release = 4;
        assert_eq!(pkg.version_with_epoch(), "1.2.3");
        assert_eq!(pkg.full_version(), "1.2.3-4");

        pkg.epoch = 2;
        assert_eq!(pkg.version_with_epoch(), "2:1.2.3");
        assert_eq!(pkg.full_version(), "2:1.2.3-4");
    }

    #[test]
    fn test_blank_scripts_count_as_absent() {
        let mut pkg = Package::new("foo", "1.0");
        pkg.setup_script = Some("  \n".to_string());
        pkg.cleanup_script = Some("rm -f /var/cache/foo".to_string());

        assert_eq!(pkg.setup_script(), None);
        assert_eq!(pkg.cleanup_script(), Some("rm -f /var/cache/foo"));
    }

    #[test]
    fn test_validate_common_reports_everything() {
        let pkg = Package::new("", " ");
        let errors = pkg.validate_common();
        assert_eq!(errors.len(), 2);

        assert!(Package::new("foo", "1.0").validate_common().is_empty());
    }
}
