//! MO file header parsing.
//!
//! This module handles:
//! - Detecting the byte order from the magic number
//! - Reading the fixed header words in that byte order
//! - Rejecting unsupported major revisions

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::mo::types::{
    error::{FormatError, Result},
    models::{Endianness, MoHeader},
};
use crate::mo::utils;

/// Size of the header words that must be present: magic, revision, string
/// count and the two table offsets.
pub const REQUIRED_HEADER_LEN: u64 = 20;

/// Size of the full standard header, including the hash table words.
pub const FULL_HEADER_LEN: u64 = 28;

/// Parses the MO header from the start of `data`.
///
/// # Header Structure
/// ```text
/// [4 bytes] Magic (0x950412de in the file's byte order)
/// [4 bytes] Revision, major in the high 16 bits
/// [4 bytes] Number of strings
/// [4 bytes] Offset of the original strings table
/// [4 bytes] Offset of the translated strings table
/// [4 bytes] Hash table size   (optional)
/// [4 bytes] Hash table offset (optional)
/// ```
pub fn parse(data: &[u8]) -> Result<MoHeader> {
    let magic = utils::read_u32_at::<LittleEndian>(data, 0, "magic")?;
    let endianness = Endianness::try_from(magic)?;
    trace!("Magic {:#010x}: {} catalog", magic, endianness);

    let header = match endianness {
        Endianness::Little => read_fields::<LittleEndian>(data, endianness)?,
        Endianness::Big => read_fields::<BigEndian>(data, endianness)?,
    };

    let (major, minor) = (header.major_version(), header.minor_version());
    if major > 1 {
        return Err(FormatError::UnsupportedVersion { major, minor });
    }

    debug!(
        "MO header: revision={}.{}, strings={}, originals at {:#x}, translations at {:#x}",
        major,
        minor,
        header.num_strings,
        header.original_table_offset,
        header.translated_table_offset
    );
    Ok(header)
}

fn read_fields<B: ByteOrder>(data: &[u8], endianness: Endianness) -> Result<MoHeader> {
    let fields = utils::slice_at(data, 4, REQUIRED_HEADER_LEN - 4, "header")?;
    let hash_table = if data.len() as u64 >= FULL_HEADER_LEN {
        Some((B::read_u32(&data[20..24]), B::read_u32(&data[24..28])))
    } else {
        None
    };

    Ok(MoHeader {
        endianness,
        revision: B::read_u32(&fields[0..4]),
        num_strings: B::read_u32(&fields[4..8]),
        original_table_offset: B::read_u32(&fields[8..12]),
        translated_table_offset: B::read_u32(&fields[12..16]),
        hash_table,
    })
}
