// src/output.rs

//! Writing built packages to their destination

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Where a built package goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `-` means stdout, anything else is a file path
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// Write `data` to `target`
///
/// Existing files are only replaced with `force`.
pub fn write_package(target: &OutputTarget, data: &[u8], force: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
        OutputTarget::File(path) => write_file(path, data, force)?,
    }
    Ok(())
}

fn write_file(path: &Path, data: &[u8], force: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => Error::AlreadyExists(format!(
            "{} (use --force to overwrite)",
            path.display()
        )),
        _ => Error::Io(e),
    })?;
    file.write_all(data)?;

    info!("Wrote {} ({} bytes)", path.display(), data.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_target_from_arg() {
        assert_eq!(OutputTarget::from_arg("-"), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::from_arg("foo.deb"),
            OutputTarget::File(PathBuf::from("foo.deb"))
        );
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foo.rpm");
        let target = OutputTarget::File(path.clone());

        write_package(&target, b"first", false).unwrap();
        let err = write_package(&target, b"second", false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_package(&target, b"second", true).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
