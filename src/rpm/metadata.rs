// src/rpm/metadata.rs

//! Header and signature sections of an RPM package
//!
//! Tags are added in the order they are derived; the header encoder sorts
//! them by tag id.

use md5::Md5;
use sha2::{Digest, Sha256};

use super::header::Header;
use super::payload::Payload;
use super::tags::*;
use crate::compression::LZMA_PRESET;
use crate::error::{Error, Result};
use crate::package::Package;

/// Interpreter for install scriptlets
const SCRIPT_INTERPRETER: &str = "/bin/sh";

/// RPM has no canonical spelling for "no license"
const LICENSE_NONE: &str = "None";

/// See <https://en.opensuse.org/openSUSE:Package_group_guidelines>
const PACKAGE_GROUP: &str = "System/Management";

// The payload is always produced by the same cpio + lzma pipeline, so these
// are format constants rather than package properties.
const PAYLOAD_FORMAT: &str = "cpio";
const PAYLOAD_COMPRESSOR: &str = "lzma";

/// Produce the header section of an RPM package
pub fn make_header_section(pkg: &Package, payload: &Payload) -> Result<Vec<u8>> {
    let mut header = Header::new();

    add_package_information_tags(&mut header, pkg)?;
    header.add_int32_value(
        RPMTAG_ARCHIVESIZE,
        vec![to_int32(payload.uncompressed_size, "payload size")?],
    );
    add_installation_tags(&mut header, pkg);

    header.to_binary(RPMTAG_HEADERIMMUTABLE)
}

fn add_package_information_tags(header: &mut Header, pkg: &Package) -> Result<()> {
    header.add_string_value(RPMTAG_NAME, pkg.name.as_str(), false);
    header.add_string_value(RPMTAG_VERSION, pkg.version_with_epoch(), false);
    header.add_string_value(RPMTAG_RELEASE, pkg.release.to_string(), false);

    header.add_string_value(RPMTAG_SUMMARY, pkg.summary(), true);
    header.add_string_value(RPMTAG_DESCRIPTION, pkg.description.as_str(), true);
    header.add_int32_value(
        RPMTAG_SIZE,
        vec![to_int32(pkg.installed_size_in_bytes(), "installed size")?],
    );

    header.add_string_value(RPMTAG_LICENSE, LICENSE_NONE, false);
    if !pkg.author.is_empty() {
        header.add_string_value(RPMTAG_PACKAGER, pkg.author.as_str(), false);
    }
    header.add_string_value(RPMTAG_GROUP, PACKAGE_GROUP, true);

    header.add_string_value(RPMTAG_OS, "linux", false);
    header.add_string_value(RPMTAG_ARCH, "noarch", false);

    header.add_string_value(RPMTAG_PAYLOADFORMAT, PAYLOAD_FORMAT, false);
    header.add_string_value(RPMTAG_PAYLOADCOMPRESSOR, PAYLOAD_COMPRESSOR, false);
    header.add_string_value(RPMTAG_PAYLOADFLAGS, LZMA_PRESET.to_string(), false);
    Ok(())
}

fn add_installation_tags(header: &mut Header, pkg: &Package) {
    if let Some(script) = pkg.setup_script() {
        header.add_string_value(RPMTAG_POSTIN, script, false);
        header.add_string_value(RPMTAG_POSTINPROG, SCRIPT_INTERPRETER, false);
    }
    if let Some(script) = pkg.cleanup_script() {
        header.add_string_value(RPMTAG_POSTUN, script, false);
        header.add_string_value(RPMTAG_POSTUNPROG, SCRIPT_INTERPRETER, false);
    }
}

/// Produce the signature section covering an encoded header and payload
///
/// The section is not padded; the caller aligns what follows it.
pub fn make_signature_section(header_section: &[u8], payload: &Payload) -> Result<Vec<u8>> {
    let mut signature = Header::new();

    let signed_size = header_section.len() as u64 + payload.compressed.len() as u64;
    signature.add_int32_value(RPMSIGTAG_SIZE, vec![to_int32(signed_size, "package size")?]);

    let mut md5 = Md5::new();
    md5.update(header_section);
    md5.update(&payload.compressed);
    signature.add_binary_value(RPMSIGTAG_MD5, md5.finalize().to_vec());

    signature.add_int32_value(
        RPMSIGTAG_PAYLOADSIZE,
        vec![to_int32(payload.uncompressed_size, "payload size")?],
    );

    let sha256 = Sha256::digest(header_section);
    signature.add_string_value(RPMSIGTAG_SHA256, format!("{:x}", sha256), false);

    signature.to_binary(RPMTAG_HEADERSIGNATURES)
}

fn to_int32(value: u64, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        Error::Encoding(format!(
            "{} of {} bytes does not fit into an RPM int32 tag",
            what, value
        ))
    })
}
