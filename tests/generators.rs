// tests/generators.rs

//! Integration tests for the package generators.
//!
//! Each format is built from the same package and parsed back with the
//! container crates (ar, tar, flate2, xz2) to check the result is a
//! well-formed package.

mod common;

use std::io::Read;

use common::{read_ar, read_cpio, read_tar, sample_package};
use pkgforge::compression::{decompress, CompressionFormat};
use pkgforge::rpm::header::read_index;
use pkgforge::rpm::lead::LEAD_SIZE;
use pkgforge::rpm::tags::*;
use pkgforge::{Error, Package, PackageFormat};

fn build(format: PackageFormat, pkg: &Package) -> Vec<u8> {
    let generator = format.generator();
    assert!(pkg.validate(generator.as_ref()).is_empty());
    pkg.build(generator.as_ref(), true).unwrap()
}

#[test]
fn test_every_format_is_reproducible() {
    let pkg = sample_package();
    for format in PackageFormat::ALL {
        assert_eq!(build(format, &pkg), build(format, &pkg), "{} differs", format);
    }
}

#[test]
fn test_recommended_file_names() {
    let mut pkg = sample_package();
    pkg.epoch = 1;

    let names: Vec<String> = PackageFormat::ALL
        .iter()
        .map(|f| f.generator().recommended_file_name(&pkg))
        .collect();
    assert_eq!(
        names,
        vec![
            "foo_1.2-3_all.deb",
            "foo-1:1.2-3-any.pkg.tar.xz",
            "foo-1.2-3.noarch.rpm"
        ]
    );
}

#[test]
fn test_validation_reports_every_problem() {
    let pkg = Package::new("", "");
    for format in PackageFormat::ALL {
        let errors = pkg.validate(format.generator().as_ref());
        // two common checks plus the format's own name and version checks
        assert!(errors.len() >= 4, "{}: {:?}", format, errors);
        assert!(errors.iter().all(|e| matches!(e, Error::Validation(_))));
    }
}

#[test]
fn test_debian_package() {
    let pkg = sample_package();
    let members = read_ar(&build(PackageFormat::Debian, &pkg));

    assert_eq!(members[0], ("debian-binary".to_string(), b"2.0\n".to_vec()));

    let mut control_tar = Vec::new();
    flate2::read::GzDecoder::new(members[1].1.as_slice())
        .read_to_end(&mut control_tar)
        .unwrap();
    let control = read_tar(&control_tar);
    let names: Vec<&str> = control.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["./control", "./md5sums", "./postinst", "./postrm"]);

    let control_file = String::from_utf8(control[0].content.clone()).unwrap();
    assert!(control_file.contains("Package: foo\n"));
    assert!(control_file.contains("Version: 1.2-3\n"));
    assert!(control_file.contains("Installed-Size: 1\n"));
    assert!(control_file.ends_with("Description: Foo tool\n Does foo things.\n"));

    let md5sums = String::from_utf8(control[1].content.clone()).unwrap();
    assert_eq!(md5sums.lines().count(), 2);
    assert!(md5sums.contains("  usr/bin/foo\n"));

    assert_eq!(control[3].mode & 0o7777, 0o755);

    let data_tar = decompress(&members[2].1, CompressionFormat::Xz).unwrap();
    let data = read_tar(&data_tar);
    assert_eq!(data[0].name, "./etc/");
    assert!(data.iter().all(|e| e.name.starts_with("./")));
}

#[test]
fn test_pacman_package() {
    let pkg = sample_package();
    let tar_data = decompress(&build(PackageFormat::Pacman, &pkg), CompressionFormat::Xz).unwrap();
    let entries = read_tar(&tar_data);

    assert_eq!(entries[0].name, ".INSTALL");
    assert_eq!(entries[1].name, ".PKGINFO");
    assert!(entries[2..].iter().all(|e| !e.name.starts_with("./")));

    let install = String::from_utf8(entries[0].content.clone()).unwrap();
    assert!(install.contains("post_install() {\nsystemctl daemon-reload\n}"));
    assert!(install.contains("post_remove() {\nrm -rf /var/cache/foo\n}"));

    let pkginfo = String::from_utf8(entries[1].content.clone()).unwrap();
    assert!(pkginfo.contains("pkgver = 1.2-3\n"));
    assert!(pkginfo.contains(&format!("size = {}\n", pkg.installed_size_in_bytes())));
    assert!(pkginfo.contains("builddate = 0\n"));
}

#[test]
fn test_rpm_package() {
    let pkg = sample_package();
    let data = build(PackageFormat::Rpm, &pkg);

    assert_eq!(&data[..4], &[0xed, 0xab, 0xee, 0xdb]);

    // signature header
    let signature = &data[LEAD_SIZE..];
    let (sig_index, sig_store) = read_index(signature).unwrap();
    assert_eq!(sig_index[0].tag, RPMTAG_HEADERSIGNATURES);
    let sig_len = 16 + sig_index.len() * 16 + sig_store.len();
    let header_start = (LEAD_SIZE + sig_len).div_ceil(8) * 8;

    // main header
    let header = &data[header_start..];
    let (index, store) = read_index(header).unwrap();
    assert_eq!(index[0].tag, RPMTAG_HEADERIMMUTABLE);
    let tags: Vec<u32> = index[1..].iter().map(|r| r.tag).collect();
    let mut sorted = tags.clone();
    sorted.sort();
    assert_eq!(tags, sorted);
    assert!(tags.contains(&RPMTAG_POSTIN));
    assert!(tags.contains(&RPMTAG_POSTUNPROG));

    // payload follows the header
    let header_len = 16 + index.len() * 16 + store.len();
    let payload = &data[header_start + header_len..];
    let cpio = decompress(payload, CompressionFormat::Lzma).unwrap();

    let archive_size = index.iter().find(|r| r.tag == RPMTAG_ARCHIVESIZE).unwrap();
    let offset = archive_size.offset as usize;
    let archive_size = i32::from_be_bytes(store[offset..offset + 4].try_into().unwrap());
    assert_eq!(archive_size as usize, cpio.len());

    let names: Vec<String> = read_cpio(&cpio).into_iter().map(|(e, _)| e.name).collect();
    assert_eq!(names.first().map(String::as_str), Some("./etc"));
    assert!(names.contains(&"./usr/bin/foo-compat".to_string()));
}
