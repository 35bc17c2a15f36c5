//! Core data structures for MO catalog components.
//!
//! This module defines the fundamental types shared by the format layer:
//! - The fixed file header and its byte order
//! - String descriptors locating message bytes
//! - Raw message entries before text decoding

use super::error::{FormatError, Result};

/// Magic number of a catalog written in little-endian byte order.
pub const LE_MAGIC: u32 = 0x950412de;

/// Magic number of a catalog written in big-endian byte order, as seen
/// when read little-endian.
pub const BE_MAGIC: u32 = 0xde120495;

/// Byte order of every multi-byte field after the magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl TryFrom<u32> for Endianness {
    type Error = FormatError;

    /// Detects the byte order from the magic read as little-endian.
    fn try_from(magic: u32) -> Result<Self> {
        match magic {
            LE_MAGIC => Ok(Self::Little),
            BE_MAGIC => Ok(Self::Big),
            _ => Err(FormatError::BadMagic(magic)),
        }
    }
}

impl std::fmt::Display for Endianness {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Endianness::Little => write!(f, "little-endian"),
            Endianness::Big => write!(f, "big-endian"),
        }
    }
}

/// Parsed fixed header of an MO file.
///
/// ```text
/// [ 0] magic
/// [ 4] revision (major << 16 | minor)
/// [ 8] number of strings
/// [12] offset of original strings table
/// [16] offset of translated strings table
/// [20] hash table size      (optional, ignored)
/// [24] hash table offset    (optional, ignored)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoHeader {
    pub endianness: Endianness,
    pub revision: u32,
    pub num_strings: u32,
    pub original_table_offset: u32,
    pub translated_table_offset: u32,
    /// Hash table size and offset, when the file is long enough to hold them.
    pub hash_table: Option<(u32, u32)>,
}

impl MoHeader {
    pub fn major_version(&self) -> u32 {
        self.revision >> 16
    }

    pub fn minor_version(&self) -> u32 {
        self.revision & 0xffff
    }
}

/// Location of one string inside the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringDescriptor {
    pub length: u32,
    pub offset: u32,
}

/// One original/translated pair, still as raw bytes.
///
/// Text decoding is deferred until the metadata entry has been seen, since
/// only it names the charset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry<'a> {
    pub original: &'a [u8],
    pub translated: &'a [u8],
}

impl RawEntry<'_> {
    /// The metadata entry is the one whose original string is empty.
    pub fn is_metadata(&self) -> bool {
        self.original.is_empty()
    }

    /// Plural groups carry `singular\0plural` as their original string.
    pub fn is_plural(&self) -> bool {
        self.original.contains(&0)
    }
}
