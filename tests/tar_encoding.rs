// tests/tar_encoding.rs

//! Integration tests for the tar encoder.
//!
//! These tests read archives back with the `tar` crate and check entry
//! names, modes, ownership and timestamps.

mod common;

use common::read_tar;
use pkgforge::archive::{to_tar_archive, to_tar_gz_archive};
use pkgforge::{FsDirectory, Metadata};

fn etc_tree() -> FsDirectory {
    let mut root = FsDirectory::new();
    root.mkdir_p("etc", Metadata::new(0o755)).unwrap();
    root.add_file("etc/foo.conf", "bar\n", Metadata::new(0o644))
        .unwrap();
    root
}

#[test]
fn test_single_file_tree() {
    let data = to_tar_archive(&etc_tree(), true, true).unwrap();
    let entries = read_tar(&data);

    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].name, "./etc/");
    assert_eq!(entries[0].mode, 0o040755);
    assert_eq!(entries[0].mtime, 0);

    assert_eq!(entries[1].name, "./etc/foo.conf");
    assert_eq!(entries[1].mode, 0o100644);
    assert_eq!(entries[1].content, b"bar\n");
    assert_eq!(entries[1].mtime, 0);
}

#[test]
fn test_sample_package_tree() {
    let pkg = common::sample_package();
    let entries = read_tar(&to_tar_archive(&pkg.fs_root, false, true).unwrap());

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "etc/",
            "etc/foo.conf",
            "usr/",
            "usr/bin/",
            "usr/bin/foo",
            "usr/bin/foo-compat",
            "var/",
            "var/lib/",
            "var/lib/foo/",
        ]
    );

    let link = &entries[5];
    assert_eq!(link.mode, 0o120777);
    assert_eq!(link.link_name.as_deref(), Some("foo"));
    assert!(link.content.is_empty());

    let private = &entries[8];
    assert_eq!(private.mode, 0o040700);
    assert_eq!((private.uid, private.gid), (100, 100));
}

#[test]
fn test_gzip_wrapping_keeps_entries() {
    let tree = etc_tree();
    let plain = to_tar_archive(&tree, true, true).unwrap();
    let gz = to_tar_gz_archive(&tree, true, true).unwrap();

    let mut decoder = flate2::read::GzDecoder::new(gz.as_slice());
    let mut unpacked = Vec::new();
    std::io::Read::read_to_end(&mut decoder, &mut unpacked).unwrap();
    assert_eq!(unpacked, plain);
}

#[test]
fn test_non_reproducible_differs_only_in_time() {
    let tree = etc_tree();
    let fixed = read_tar(&to_tar_archive(&tree, true, true).unwrap());
    let live = read_tar(&to_tar_archive(&tree, true, false).unwrap());

    assert_eq!(fixed.len(), live.len());
    for (a, b) in fixed.iter().zip(&live) {
        assert_eq!(a.mtime, 0);
        assert!(b.mtime > 0);
        assert_eq!(
            TarEntryWithoutTime::from(a),
            TarEntryWithoutTime::from(b)
        );
    }
}

#[derive(Debug, PartialEq, Eq)]
struct TarEntryWithoutTime<'a> {
    name: &'a str,
    mode: u32,
    content: &'a [u8],
}

impl<'a> From<&'a common::TarEntry> for TarEntryWithoutTime<'a> {
    fn from(e: &'a common::TarEntry) -> Self {
        Self {
            name: &e.name,
            mode: e.mode,
            content: &e.content,
        }
    }
}
