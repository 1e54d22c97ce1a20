// src/generator.rs

//! Common interface for all package format generators

use std::str::FromStr;

use crate::debian::DebianGenerator;
use crate::error::{Error, Result};
use crate::package::Package;
use crate::pacman::PacmanGenerator;
use crate::rpm::RpmGenerator;

/// Common interface for all package formats (RPM, DEB, pacman)
pub trait Generator {
    /// Check whether `pkg` can be represented in this format
    ///
    /// Every independent problem is reported; an empty list means the
    /// package is acceptable.
    fn validate(&self, pkg: &Package) -> Vec<Error>;

    /// File name following the format's naming conventions
    fn recommended_file_name(&self, pkg: &Package) -> String;

    /// Serialize the package
    ///
    /// With `reproducible`, identical packages produce identical bytes.
    fn build(&self, pkg: &Package, reproducible: bool) -> Result<Vec<u8>>;
}

/// Supported package formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    Debian,
    Pacman,
    Rpm,
}

impl PackageFormat {
    pub const ALL: [PackageFormat; 3] = [Self::Debian, Self::Pacman, Self::Rpm];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Pacman => "pacman",
            Self::Rpm => "rpm",
        }
    }

    /// The generator implementing this format
    pub fn generator(&self) -> Box<dyn Generator> {
        match self {
            Self::Debian => Box::new(DebianGenerator),
            Self::Pacman => Box::new(PacmanGenerator),
            Self::Rpm => Box::new(RpmGenerator),
        }
    }
}

impl std::fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PackageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "debian" | "deb" => Ok(Self::Debian),
            "pacman" | "arch" => Ok(Self::Pacman),
            "rpm" => Ok(Self::Rpm),
            other => Err(Error::Validation(format!(
                "unknown package format \"{}\" (expected \"debian\", \"pacman\" or \"rpm\")",
                other
            ))),
        }
    }
}
