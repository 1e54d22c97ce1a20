// src/pacman/mod.rs

//! Pacman package generator
//!
//! A pacman package is an xz-compressed tarball containing:
//! - .PKGINFO: package metadata
//! - .INSTALL: optional install/remove hooks
//! - the package contents at their install paths

use std::sync::LazyLock;

use regex::Regex;

use crate::archive::{build_timestamp, to_tar_xz_archive};
use crate::error::{Error, Result};
use crate::filesystem::Metadata;
use crate::generator::Generator;
use crate::package::Package;

static NAME_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9@._+][a-z0-9@._+-]*$").expect("valid regex"));
static VERSION_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._]+$").expect("valid regex"));

const PKGINFO_PATH: &str = ".PKGINFO";
const INSTALL_PATH: &str = ".INSTALL";

/// Generator for `.pkg.tar.xz` packages
#[derive(Debug, Default, Clone, Copy)]
pub struct PacmanGenerator;

impl Generator for PacmanGenerator {
    fn validate(&self, pkg: &Package) -> Vec<Error> {
        let mut errors = Vec::new();

        if !NAME_RX.is_match(&pkg.name) {
            errors.push(Error::Validation(format!(
                "Package name \"{}\" is not acceptable for pacman packages",
                pkg.name
            )));
        }
        if !VERSION_RX.is_match(&pkg.version) {
            errors.push(Error::Validation(format!(
                "Package version \"{}\" is not acceptable for pacman packages",
                pkg.version
            )));
        }
        for reserved in [PKGINFO_PATH, INSTALL_PATH] {
            if pkg.fs_root.exists(reserved) {
                errors.push(Error::Validation(format!(
                    "/{} is reserved for package metadata in pacman packages",
                    reserved
                )));
            }
        }

        errors
    }

    fn recommended_file_name(&self, pkg: &Package) -> String {
        format!("{}-{}-any.pkg.tar.xz", pkg.name, pkg.full_version())
    }

    fn build(&self, pkg: &Package, reproducible: bool) -> Result<Vec<u8>> {
        let mut root = pkg.fs_root.clone();
        root.add_file(PKGINFO_PATH, make_pkginfo(pkg, reproducible), Metadata::new(0o644))?;
        if let Some(install) = make_install_script(pkg) {
            root.add_file(INSTALL_PATH, install, Metadata::new(0o644))?;
        }

        to_tar_xz_archive(&root, false, reproducible)
    }
}

fn make_pkginfo(pkg: &Package, reproducible: bool) -> String {
    let packager = if pkg.author.is_empty() {
        "Unknown Packager"
    } else {
        pkg.author.as_str()
    };

    let mut pkginfo = String::new();
    pkginfo.push_str(&format!("pkgname = {}\n", pkg.name));
    pkginfo.push_str(&format!("pkgver = {}\n", pkg.full_version()));
    pkginfo.push_str(&format!("pkgdesc = {}\n", pkg.summary()));
    pkginfo.push_str(&format!("packager = {}\n", packager));
    pkginfo.push_str(&format!("size = {}\n", pkg.installed_size_in_bytes()));
    pkginfo.push_str("arch = any\n");
    pkginfo.push_str("license = custom:none\n");
    pkginfo.push_str(&format!("builddate = {}\n", build_timestamp(reproducible)));
    pkginfo
}

/// .INSTALL with pacman's hook functions, `None` without any scripts
///
/// The setup script runs on install and on upgrade.
fn make_install_script(pkg: &Package) -> Option<String> {
    let mut functions = Vec::new();

    if let Some(script) = pkg.setup_script() {
        functions.push(format!("post_install() {{\n{}\n}}", script.trim_end()));
        functions.push("post_upgrade() {\npost_install\n}".to_string());
    }
    if let Some(script) = pkg.cleanup_script() {
        functions.push(format!("post_remove() {{\n{}\n}}", script.trim_end()));
    }

    if functions.is_empty() {
        return None;
    }
    Some(functions.join("\n") + "\n")
}
