// src/debian/mod.rs

//! Debian package generator
//!
//! A .deb is an ar archive containing, in this order:
//! - debian-binary: format version "2.0\n"
//! - control.tar.gz: control file, md5sums and maintainer scripts
//! - data.tar.xz: the package contents

use std::sync::LazyLock;

use md5::{Digest, Md5};
use regex::Regex;
use tracing::debug;

use crate::archive::{build_timestamp, to_tar_gz_archive, to_tar_xz_archive};
use crate::error::{Error, Result};
use crate::filesystem::{FsDirectory, FsNode, Metadata};
use crate::generator::Generator;
use crate::package::Package;

static NAME_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9+.-]+$").expect("valid regex"));
static VERSION_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9][A-Za-z0-9.+~-]*$").expect("valid regex"));

const DEBIAN_BINARY: &[u8] = b"2.0\n";

/// Mode of every ar member
const AR_MEMBER_MODE: u32 = 0o100644;

/// Generator for `.deb` packages
#[derive(Debug, Default, Clone, Copy)]
pub struct DebianGenerator;

impl Generator for DebianGenerator {
    fn validate(&self, pkg: &Package) -> Vec<Error> {
        let mut errors = Vec::new();

        if !NAME_RX.is_match(&pkg.name) {
            errors.push(Error::Validation(format!(
                "Package name \"{}\" is not acceptable for Debian packages",
                pkg.name
            )));
        }
        if !VERSION_RX.is_match(&pkg.version) {
            errors.push(Error::Validation(format!(
                "Package version \"{}\" is not acceptable for Debian packages",
                pkg.version
            )));
        }

        errors
    }

    fn recommended_file_name(&self, pkg: &Package) -> String {
        format!("{}_{}-{}_all.deb", pkg.name, pkg.version, pkg.release)
    }

    fn build(&self, pkg: &Package, reproducible: bool) -> Result<Vec<u8>> {
        let control_tar = to_tar_gz_archive(&make_control_tree(pkg)?, true, reproducible)?;
        let data_tar = to_tar_xz_archive(&pkg.fs_root, true, reproducible)?;
        debug!(
            "Debian members: control.tar.gz {} bytes, data.tar.xz {} bytes",
            control_tar.len(),
            data_tar.len()
        );

        let mtime = build_timestamp(reproducible);
        let mut archive = ar::Builder::new(Vec::new());
        for (name, data) in [
            ("debian-binary", DEBIAN_BINARY),
            ("control.tar.gz", control_tar.as_slice()),
            ("data.tar.xz", data_tar.as_slice()),
        ] {
            let mut header = ar::Header::new(name.as_bytes().to_vec(), data.len() as u64);
            header.set_mtime(mtime);
            header.set_uid(0);
            header.set_gid(0);
            header.set_mode(AR_MEMBER_MODE);
            archive.append(&header, data)?;
        }

        Ok(archive.into_inner()?)
    }
}

/// Tree of the control archive: control, md5sums and maintainer scripts
fn make_control_tree(pkg: &Package) -> Result<FsDirectory> {
    let mut tree = FsDirectory::new();
    tree.add_file("control", make_control_file(pkg), Metadata::new(0o644))?;
    tree.add_file("md5sums", make_md5sums(&pkg.fs_root), Metadata::new(0o644))?;

    if let Some(script) = pkg.setup_script() {
        tree.add_file("postinst", maintainer_script(script), Metadata::new(0o755))?;
    }
    if let Some(script) = pkg.cleanup_script() {
        tree.add_file("postrm", maintainer_script(script), Metadata::new(0o755))?;
    }
    Ok(tree)
}

fn make_control_file(pkg: &Package) -> String {
    let mut control = format!(
        "Package: {}\n\
         Version: {}\n\
         Architecture: all\n",
        pkg.name,
        pkg.full_version()
    );
    if !pkg.author.is_empty() {
        control.push_str(&format!("Maintainer: {}\n", pkg.author));
    }

    // dpkg counts in KiB
    let installed_size = pkg.installed_size_in_bytes().div_ceil(1024);
    control.push_str(&format!("Installed-Size: {}\n", installed_size));
    control.push_str("Section: misc\n");
    control.push_str("Priority: optional\n");
    control.push_str(&format_description(&pkg.description));
    control
}

/// Summary on the `Description:` line, the rest folded below it
fn format_description(description: &str) -> String {
    let mut lines = description.lines();
    let mut out = format!("Description: {}\n", lines.next().unwrap_or("").trim());

    let body: Vec<&str> = lines.collect();
    let start = body.iter().position(|l| !l.trim().is_empty());
    let end = body.iter().rposition(|l| !l.trim().is_empty());
    if let (Some(start), Some(end)) = (start, end) {
        for line in &body[start..=end] {
            if line.trim().is_empty() {
                out.push_str(" .\n");
            } else {
                out.push_str(&format!(" {}\n", line.trim_end()));
            }
        }
    }
    out
}

/// One `<md5>  <path>` line per regular file, paths without leading `./`
fn make_md5sums(root: &FsDirectory) -> String {
    let mut out = String::new();
    for (path, node) in root.iter() {
        if let FsNode::RegularFile(file) = node {
            let path = path.strip_prefix("./").unwrap_or(&path);
            out.push_str(&format!("{:x}  {}\n", Md5::digest(&file.content), path));
        }
    }
    out
}

fn maintainer_script(script: &str) -> String {
    format!("#!/bin/bash\n{}\n", script.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample_package() -> Package {
        let mut pkg = Package::new("foo", "1.0");
        pkg.author = "Jane Doe <jane@example.org>".to_string();
        pkg.description = "Foo tool\n\nDoes foo things.\n\nAnd more.\n".to_string();
        pkg.setup_script = Some("echo installed".to_string());
        pkg.fs_root
            .add_file("etc/foo.conf", "bar\n", Metadata::new(0o644))
            .unwrap();
        pkg.fs_root.add_symlink("usr/bin/foo", "/etc/foo.conf").unwrap();
        pkg
    }

    fn ar_members(data: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = ar::Archive::new(data);
        let mut members = Vec::new();
        while let Some(entry) = archive.next_entry() {
            let mut entry = entry.unwrap();
            let name = String::from_utf8(entry.header().identifier().to_vec()).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            members.push((name, content));
        }
        members
    }

    #[test]
    fn test_control_file() {
        let mut pkg = sample_package();
        pkg.epoch = 2;
        let control = make_control_file(&pkg);

        assert_eq!(
            control,
            "Package: foo\n\
             Version: 2:1.0-1\n\
             Architecture: all\n\
             Maintainer: Jane Doe <jane@example.org>\n\
             Installed-Size: 1\n\
             Section: misc\n\
             Priority: optional\n\
             Description: Foo tool\n \
             Does foo things.\n \
             .\n \
             And more.\n"
        );
    }

    #[test]
    fn test_description_without_body() {
        assert_eq!(format_description("Just a summary"), "Description: Just a summary\n");
        assert_eq!(format_description(""), "Description: \n");
    }

    #[test]
    fn test_md5sums_cover_regular_files_only() {
        let pkg = sample_package();
        assert_eq!(
            make_md5sums(&pkg.fs_root),
            "c157a79031e1c40f85931829bc5fc552  etc/foo.conf\n"
        );
    }

    #[test]
    fn test_validation() {
        let generator = DebianGenerator;
        assert!(generator.validate(&sample_package()).is_empty());

        // uppercase and single-character names are rejected
        assert_eq!(generator.validate(&Package::new("Foo", "1.0")).len(), 1);
        assert_eq!(generator.validate(&Package::new("f", "1.0")).len(), 1);
        assert_eq!(generator.validate(&Package::new("foo", "v1.0")).len(), 1);
        assert_eq!(generator.validate(&Package::new("foo", "1.0~rc1+git-2")).len(), 0);
    }

    #[test]
    fn test_ar_layout() {
        let pkg = sample_package();
        let data = DebianGenerator.build(&pkg, true).unwrap();
        assert!(data.starts_with(b"!<arch>\n"));

        let members = ar_members(&data);
        let names: Vec<&str> = members.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["debian-binary", "control.tar.gz", "data.tar.xz"]);
        assert_eq!(members[0].1, b"2.0\n");
    }

    #[test]
    fn test_control_archive_contents() {
        let pkg = sample_package();
        let data = DebianGenerator.build(&pkg, true).unwrap();
        let members = ar_members(&data);

        let decoder = flate2::read::GzDecoder::new(members[1].1.as_slice());
        let mut archive = tar::Archive::new(decoder);
        let mut names = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = String::from_utf8(entry.path_bytes().to_vec()).unwrap();
            let mode = entry.header().mode().unwrap() & 0o7777;
            if name == "./postinst" {
                assert_eq!(mode, 0o755);
                let mut script = String::new();
                entry.read_to_string(&mut script).unwrap();
                assert_eq!(script, "#!/bin/bash\necho installed\n");
            }
            names.push(name);
        }
        assert_eq!(names, vec!["./control", "./md5sums", "./postinst"]);
    }

    #[test]
    fn test_reproducible_build() {
        let pkg = sample_package();
        assert_eq!(
            DebianGenerator.build(&pkg, true).unwrap(),
            DebianGenerator.build(&pkg, true).unwrap()
        );
    }
}
