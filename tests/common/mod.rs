// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::io::Read;

use pkgforge::archive::CpioEntry;
use pkgforge::{Metadata, Package};

/// A small package with a config file, an executable, a symlink, an
/// explicit directory and both scripts.
pub fn sample_package() -> Package {
    let mut pkg = Package::new("foo", "1.2");
    pkg.release = 3;
    pkg.author = "Jane Doe <jane@example.org>".to_string();
    pkg.description = "Foo tool\n\nDoes foo things.".to_string();
    pkg.setup_script = Some("systemctl daemon-reload".to_string());
    pkg.cleanup_script = Some("rm -rf /var/cache/foo".to_string());

    pkg.fs_root
        .add_file("etc/foo.conf", "bar\n", Metadata::new(0o644))
        .unwrap();
    pkg.fs_root
        .add_file("usr/bin/foo", b"#!/bin/sh\necho foo\n".to_vec(), Metadata::new(0o755))
        .unwrap();
    pkg.fs_root.add_symlink("usr/bin/foo-compat", "foo").unwrap();
    pkg.fs_root
        .mkdir_p("var/lib/foo", Metadata::new(0o700).with_owner(100, 100))
        .unwrap();
    pkg
}

/// A tar entry as read back from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry {
    pub name: String,
    pub mode: u32,
    pub uid: u64,
    pub gid: u64,
    pub mtime: u64,
    pub link_name: Option<String>,
    pub content: Vec<u8>,
}

/// Read every entry of an uncompressed tar stream
pub fn read_tar(data: &[u8]) -> Vec<TarEntry> {
    let mut archive = tar::Archive::new(data);
    let mut entries = Vec::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let header = entry.header().clone();
        let name = String::from_utf8(entry.path_bytes().to_vec()).unwrap();
        let link_name = entry
            .link_name_bytes()
            .map(|l| String::from_utf8(l.to_vec()).unwrap());
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        entries.push(TarEntry {
            name,
            mode: header.mode().unwrap(),
            uid: header.uid().unwrap(),
            gid: header.gid().unwrap(),
            mtime: header.mtime().unwrap(),
            link_name,
            content,
        });
    }
    entries
}

/// Members of an ar archive as (identifier, content)
pub fn read_ar(data: &[u8]) -> Vec<(String, Vec<u8>)> {
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

/// Records of a newc cpio archive with their content, trailer excluded
pub fn read_cpio(data: &[u8]) -> Vec<(CpioEntry, Vec<u8>)> {
    let align = |n: usize| n.div_ceil(4) * 4;
    let mut entries = Vec::new();
    let mut pos = 0;
    loop {
        assert_eq!(&data[pos..pos + 6], b"070701", "bad cpio magic at {}", pos);
        let field = |i: usize| {
            let start = pos + 6 + i * 8;
            let hex = std::str::from_utf8(&data[start..start + 8]).unwrap();
            u32::from_str_radix(hex, 16).unwrap()
        };
        let size = field(6) as usize;
        let name_start = pos + 110;
        let name_end = name_start + field(11) as usize - 1;
        let name = String::from_utf8(data[name_start..name_end].to_vec()).unwrap();
        if name == "TRAILER!!!" {
            return entries;
        }

        let content_start = align(name_end + 1);
        let entry = CpioEntry {
            name,
            size: size as u64,
            mode: field(1),
            mtime: field(5) as u64,
            uid: field(2),
            gid: field(3),
            ino: field(0),
            nlink: field(4),
        };
        entries.push((entry, data[content_start..content_start + size].to_vec()));
        pos = align(content_start + size);
    }
}
