// src/rpm/header.rs

//! RPM header structure encoder
//!
//! A header is a fixed 16-byte header record, an index of 16-byte records
//! (tag, type, offset, count; all big-endian) and a data store holding the
//! values. Tags can be added in any order; [`Header::to_binary`] sorts them
//! by tag id, since rpm looks tags up by binary search.
//!
//! The header is closed by a region: an index record for the region tag
//! placed first in the index, whose 16 data bytes are the very last bytes of
//! the data store and point back at the start of the index. rpm uses the
//! region to tell which tags are covered by the header digest.

use super::tags::{TagType, RPMTAG_HEADERI18NTABLE};
use crate::error::{Error, Result};

/// Magic, version and reserved bytes opening every header structure
const HEADER_MAGIC: [u8; 8] = [0x8e, 0xad, 0xe8, 0x01, 0x00, 0x00, 0x00, 0x00];

/// Size of one index record, also the size of the region trailer
pub const INDEX_RECORD_SIZE: usize = 16;

/// A typed tag value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    String(String),
    /// A translatable string; only the "C" locale is ever stored
    I18nString(String),
    StringArray(Vec<String>),
    Binary(Vec<u8>),
}

impl TagValue {
    pub fn tag_type(&self) -> TagType {
        match self {
            Self::Int16(_) => TagType::Int16,
            Self::Int32(_) => TagType::Int32,
            Self::Int64(_) => TagType::Int64,
            Self::String(_) => TagType::String,
            Self::I18nString(_) => TagType::I18nString,
            Self::StringArray(_) => TagType::StringArray,
            Self::Binary(_) => TagType::Bin,
        }
    }

    /// Element count written into the index record
    pub fn count(&self) -> usize {
        match self {
            Self::Int16(values) => values.len(),
            Self::Int32(values) => values.len(),
            Self::Int64(values) => values.len(),
            Self::String(_) | Self::I18nString(_) => 1,
            Self::StringArray(values) => values.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    fn write_to(&self, store: &mut Vec<u8>) {
        match self {
            Self::Int16(values) => values.iter().for_each(|v| store.extend(v.to_be_bytes())),
            Self::Int32(values) => values.iter().for_each(|v| store.extend(v.to_be_bytes())),
            Self::Int64(values) => values.iter().for_each(|v| store.extend(v.to_be_bytes())),
            Self::String(value) | Self::I18nString(value) => {
                store.extend_from_slice(value.as_bytes());
                store.push(0);
            }
            Self::StringArray(values) => {
                for value in values {
                    store.extend_from_slice(value.as_bytes());
                    store.push(0);
                }
            }
            Self::Binary(bytes) => store.extend_from_slice(bytes),
        }
    }
}

/// A tag and its value, in insertion order until the header is encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: u32,
    pub value: TagValue,
}

/// One record of the header index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    pub tag: u32,
    pub tag_type: u32,
    pub offset: i32,
    pub count: u32,
}

impl IndexRecord {
    fn to_bytes(self) -> [u8; INDEX_RECORD_SIZE] {
        let mut bytes = [0u8; INDEX_RECORD_SIZE];
        bytes[0..4].copy_from_slice(&self.tag.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.tag_type.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.offset.to_be_bytes());
        bytes[12..16].copy_from_slice(&self.count.to_be_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let field = |i: usize| [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
        Self {
            tag: u32::from_be_bytes(field(0)),
            tag_type: u32::from_be_bytes(field(4)),
            offset: i32::from_be_bytes(field(8)),
            count: u32::from_be_bytes(field(12)),
        }
    }
}

/// Collection of tags that make up one header structure
#[derive(Debug, Default, Clone)]
pub struct Header {
    entries: Vec<TagEntry>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags in insertion order
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first value stored for a tag
    pub fn get(&self, tag: u32) -> Option<&TagValue> {
        self.entries.iter().find(|e| e.tag == tag).map(|e| &e.value)
    }

    pub fn add_value(&mut self, tag: u32, value: TagValue) {
        self.entries.push(TagEntry { tag, value });
    }

    /// Add a string tag
    ///
    /// With `is_i18n`, the value is stored as a translatable string and the
    /// header gains a locale table when encoded.
    pub fn add_string_value(&mut self, tag: u32, value: impl Into<String>, is_i18n: bool) {
        let value = value.into();
        let value = if is_i18n {
            TagValue::I18nString(value)
        } else {
            TagValue::String(value)
        };
        self.add_value(tag, value);
    }

    pub fn add_string_array_value(&mut self, tag: u32, values: Vec<String>) {
        self.add_value(tag, TagValue::StringArray(values));
    }

    pub fn add_int16_value(&mut self, tag: u32, values: Vec<i16>) {
        self.add_value(tag, TagValue::Int16(values));
    }

    pub fn add_int32_value(&mut self, tag: u32, values: Vec<i32>) {
        self.add_value(tag, TagValue::Int32(values));
    }

    pub fn add_binary_value(&mut self, tag: u32, value: Vec<u8>) {
        self.add_value(tag, TagValue::Binary(value));
    }

    /// Encode the header, closing it with a region for `region_tag`
    ///
    /// Fails when the data store or a value count outgrows the 32-bit
    /// fields of the index.
    pub fn to_binary(&self, region_tag: u32) -> Result<Vec<u8>> {
        // single-locale table for translatable strings
        let locale_table = TagEntry {
            tag: RPMTAG_HEADERI18NTABLE,
            value: TagValue::StringArray(vec!["C".to_string()]),
        };
        let needs_locale_table = self
            .entries
            .iter()
            .any(|e| matches!(e.value, TagValue::I18nString(_)))
            && self.get(RPMTAG_HEADERI18NTABLE).is_none();

        let mut sorted: Vec<&TagEntry> = self.entries.iter().collect();
        if needs_locale_table {
            sorted.push(&locale_table);
        }
        // stable, so repeated tags keep their insertion order
        sorted.sort_by_key(|e| e.tag);

        let mut index = Vec::with_capacity(sorted.len());
        let mut store = Vec::new();
        for entry in sorted {
            let tag_type = entry.value.tag_type();
            let alignment = tag_type.alignment();
            while store.len() % alignment != 0 {
                store.push(0);
            }

            index.push(IndexRecord {
                tag: entry.tag,
                tag_type: tag_type as u32,
                offset: store_offset(store.len())?,
                count: field_u32(entry.value.count(), "value count")?,
            });
            entry.value.write_to(&mut store);
        }

        let index_count = index.len() + 1;
        let region = IndexRecord {
            tag: region_tag,
            tag_type: TagType::Bin as u32,
            offset: store_offset(store.len())?,
            count: INDEX_RECORD_SIZE as u32,
        };
        let index_size = store_offset(index_count * INDEX_RECORD_SIZE)?;
        let trailer = IndexRecord {
            tag: region_tag,
            tag_type: TagType::Bin as u32,
            offset: -index_size,
            count: INDEX_RECORD_SIZE as u32,
        };
        store.extend_from_slice(&trailer.to_bytes());

        let mut out =
            Vec::with_capacity(HEADER_MAGIC.len() + 8 + index_count * INDEX_RECORD_SIZE + store.len());
        out.extend_from_slice(&HEADER_MAGIC);
        out.extend_from_slice(&field_u32(index_count, "index entry count")?.to_be_bytes());
        out.extend_from_slice(&field_u32(store.len(), "data store size")?.to_be_bytes());
        out.extend_from_slice(&region.to_bytes());
        for record in index {
            out.extend_from_slice(&record.to_bytes());
        }
        out.extend_from_slice(&store);
        Ok(out)
    }
}

/// Offsets are signed in the index, so the store is capped at `i32::MAX`
fn store_offset(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        Error::Encoding(format!(
            "header data of {} bytes does not fit into an RPM offset",
            len
        ))
    })
}

fn field_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::Encoding(format!("{} {} does not fit into an RPM header field", what, value))
    })
}

/// Parse the index of an encoded header structure
///
/// Returns the index records in stored order together with the data store.
pub fn read_index(data: &[u8]) -> Result<(Vec<IndexRecord>, &[u8])> {
    if data.len() < 16 || data[..4] != HEADER_MAGIC[..4] {
        return Err(Error::Encoding("not an RPM header structure".into()));
    }

    let index_count = u32::from_be_bytes([data[8], data[9], data[10], data[11]]) as usize;
    let store_size = u32::from_be_bytes([data[12], data[13], data[14], data[15]]) as usize;
    let store_start = 16 + index_count * INDEX_RECORD_SIZE;
    if data.len() < store_start + store_size {
        return Err(Error::Encoding(format!(
            "truncated header: expected {} bytes, got {}",
            store_start + store_size,
            data.len()
        )));
    }

    let index = data[16..store_start]
        .chunks_exact(INDEX_RECORD_SIZE)
        .map(IndexRecord::from_bytes)
        .collect();
    Ok((index, &data[store_start..store_start + store_size]))
}
