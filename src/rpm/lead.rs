// src/rpm/lead.rs

//! The 96-byte lead opening every RPM file
//!
//! Modern rpm only checks the magic, but older tools still read the name
//! and the signature type from here.

use crate::package::Package;

pub const LEAD_SIZE: usize = 96;

const LEAD_MAGIC: [u8; 4] = [0xed, 0xab, 0xee, 0xdb];
const LEAD_NAME_SIZE: usize = 66;
const RPMLEAD_BINARY: u16 = 0;
const RPMLEAD_ARCHNUM_NOARCH: u16 = 0;
const RPMLEAD_OSNUM_LINUX: u16 = 1;
/// Signature section is a header structure
const RPMSIGTYPE_HEADERSIG: u16 = 5;

/// Build the lead for `pkg`
pub fn make_lead(pkg: &Package) -> [u8; LEAD_SIZE] {
    let mut lead = [0u8; LEAD_SIZE];
    lead[0..4].copy_from_slice(&LEAD_MAGIC);
    lead[4] = 3; // major
    lead[5] = 0; // minor
    lead[6..8].copy_from_slice(&RPMLEAD_BINARY.to_be_bytes());
    lead[8..10].copy_from_slice(&RPMLEAD_ARCHNUM_NOARCH.to_be_bytes());

    // NUL-terminated, so at most 65 name bytes
    let name = format!("{}-{}-{}", pkg.name, pkg.version, pkg.release);
    let len = name.len().min(LEAD_NAME_SIZE - 1);
    lead[10..10 + len].copy_from_slice(&name.as_bytes()[..len]);

    lead[76..78].copy_from_slice(&RPMLEAD_OSNUM_LINUX.to_be_bytes());
    lead[78..80].copy_from_slice(&RPMSIGTYPE_HEADERSIG.to_be_bytes());
    // bytes 80..96 are reserved
    lead
}
