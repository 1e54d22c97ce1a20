// src/rpm/tags.rs

//! RPM tag identifiers and data type codes
//!
//! Values follow the LSB package format chapter and rpm's `rpmtag.h`.

/// Data type codes of index records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TagType {
    Null = 0,
    Char = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    String = 6,
    Bin = 7,
    StringArray = 8,
    I18nString = 9,
}

impl TagType {
    /// Alignment of this type inside the data store
    pub fn alignment(self) -> usize {
        match self {
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 => 8,
            _ => 1,
        }
    }
}

// Region tags
pub const RPMTAG_HEADERSIGNATURES: u32 = 62;
pub const RPMTAG_HEADERIMMUTABLE: u32 = 63;
pub const RPMTAG_HEADERI18NTABLE: u32 = 100;

// Signature tags
pub const RPMSIGTAG_SHA256: u32 = 273;
pub const RPMSIGTAG_SIZE: u32 = 1000;
pub const RPMSIGTAG_MD5: u32 = 1004;
pub const RPMSIGTAG_PAYLOADSIZE: u32 = 1007;

// Package information tags
pub const RPMTAG_NAME: u32 = 1000;
pub const RPMTAG_VERSION: u32 = 1001;
pub const RPMTAG_RELEASE: u32 = 1002;
pub const RPMTAG_SUMMARY: u32 = 1004;
pub const RPMTAG_DESCRIPTION: u32 = 1005;
pub const RPMTAG_SIZE: u32 = 1009;
pub const RPMTAG_LICENSE: u32 = 1014;
pub const RPMTAG_PACKAGER: u32 = 1015;
pub const RPMTAG_GROUP: u32 = 1016;
pub const RPMTAG_OS: u32 = 1021;
pub const RPMTAG_ARCH: u32 = 1022;
pub const RPMTAG_ARCHIVESIZE: u32 = 1046;
pub const RPMTAG_PAYLOADFORMAT: u32 = 1124;
pub const RPMTAG_PAYLOADCOMPRESSOR: u32 = 1125;
pub const RPMTAG_PAYLOADFLAGS: u32 = 1126;

// Installation tags
pub const RPMTAG_POSTIN: u32 = 1024;
pub const RPMTAG_POSTUN: u32 = 1026;
pub const RPMTAG_POSTINPROG: u32 = 1086;
pub const RPMTAG_POSTUNPROG: u32 = 1088;
