// src/rpm/mod.rs

//! RPM package generator
//!
//! An RPM file is a 96-byte lead, a signature header, padding to a multiple
//! of 8, the main header and the LZMA-compressed cpio payload. The header
//! structures are encoded by [`header::Header`].

pub mod header;
pub mod lead;
pub mod metadata;
pub mod payload;
pub mod tags;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::package::Package;

pub use header::{Header, TagValue};
pub use payload::Payload;

static NAME_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._+-]+$").expect("valid regex"));
static VERSION_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._+]+$").expect("valid regex"));

/// Generator for `.rpm` packages
#[derive(Debug, Default, Clone, Copy)]
pub struct RpmGenerator;

impl Generator for RpmGenerator {
    fn validate(&self, pkg: &Package) -> Vec<Error> {
        let mut errors = Vec::new();

        if !NAME_RX.is_match(&pkg.name) {
            errors.push(Error::Validation(format!(
                "Package name \"{}\" is not acceptable for RPM packages",
                pkg.name
            )));
        }
        if !VERSION_RX.is_match(&pkg.version) {
            errors.push(Error::Validation(format!(
                "Package version \"{}\" is not acceptable for RPM packages",
                pkg.version
            )));
        }

        let size = pkg.installed_size_in_bytes();
        if i32::try_from(size).is_err() {
            errors.push(Error::Validation(format!(
                "Installed size of {} bytes is too large for RPM packages",
                size
            )));
        }

        errors
    }

    fn recommended_file_name(&self, pkg: &Package) -> String {
        format!("{}-{}-{}.noarch.rpm", pkg.name, pkg.version, pkg.release)
    }

    fn build(&self, pkg: &Package, reproducible: bool) -> Result<Vec<u8>> {
        let payload = Payload::build(&pkg.fs_root, reproducible)?;
        let header = metadata::make_header_section(pkg, &payload)?;
        let signature = metadata::make_signature_section(&header, &payload)?;

        let padding = (8 - signature.len() % 8) % 8;
        debug!(
            "RPM sections: signature {} (+{} padding), header {}, payload {}",
            signature.len(),
            padding,
            header.len(),
            payload.compressed.len()
        );

        let mut out = Vec::with_capacity(
            lead::LEAD_SIZE + signature.len() + padding + header.len() + payload.compressed.len(),
        );
        out.extend_from_slice(&lead::make_lead(pkg));
        out.extend_from_slice(&signature);
        out.resize(out.len() + padding, 0);
        out.extend_from_slice(&header);
        out.extend_from_slice(&payload.compressed);
        Ok(out)
    }
}
