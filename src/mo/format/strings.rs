//! String descriptor tables and message entries.
//!
//! The original and translated tables are parallel arrays of
//! `(length, offset)` pairs, eight bytes each. Entry `i` of both tables
//! together form one message. Plural groups store every form in a single
//! string, separated by NUL bytes.

use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::Encoding;
use log::trace;

use crate::mo::types::{
    error::{FormatError, Result},
    models::{Endianness, MoHeader, RawEntry, StringDescriptor},
};
use crate::mo::utils;

/// Size of one descriptor in either table.
pub const DESCRIPTOR_LEN: u64 = 8;

/// Reads every original/translated pair the header announces.
///
/// The returned entries borrow from `data`. Any descriptor or string lying
/// outside `data` fails the whole read.
pub fn read_entries<'a>(data: &'a [u8], header: &MoHeader) -> Result<Vec<RawEntry<'a>>> {
    match header.endianness {
        Endianness::Little => read_entries_with::<LittleEndian>(data, header),
        Endianness::Big => read_entries_with::<BigEndian>(data, header),
    }
}

fn read_entries_with<'a, B: ByteOrder>(
    data: &'a [u8],
    header: &MoHeader,
) -> Result<Vec<RawEntry<'a>>> {
    // Each entry needs two descriptors, so a count the file cannot hold is
    // rejected before allocating for it.
    let max_entries = data.len() as u64 / (2 * DESCRIPTOR_LEN);
    if u64::from(header.num_strings) > max_entries {
        return Err(FormatError::OutOfBounds {
            context: "string tables",
            offset: u64::from(header.original_table_offset),
            len: u64::from(header.num_strings) * DESCRIPTOR_LEN,
            size: data.len() as u64,
        });
    }

    let mut entries = Vec::with_capacity(header.num_strings as usize);
    for index in 0..header.num_strings {
        let original = read_descriptor::<B>(data, header.original_table_offset, index)?;
        let translated = read_descriptor::<B>(data, header.translated_table_offset, index)?;
        let entry = RawEntry {
            original: read_string(data, original, "original string")?,
            translated: read_string(data, translated, "translated string")?,
        };
        trace!(
            "Entry {}: original {} bytes at {:#x}, translated {} bytes at {:#x}",
            index, original.length, original.offset, translated.length, translated.offset
        );
        entries.push(entry);
    }
    Ok(entries)
}

/// Reads descriptor `index` of the table starting at `table_offset`.
fn read_descriptor<B: ByteOrder>(
    data: &[u8],
    table_offset: u32,
    index: u32,
) -> Result<StringDescriptor> {
    let offset = u64::from(table_offset) + u64::from(index) * DESCRIPTOR_LEN;
    let bytes = utils::slice_at(data, offset, DESCRIPTOR_LEN, "string descriptor")?;
    Ok(StringDescriptor {
        length: B::read_u32(&bytes[0..4]),
        offset: B::read_u32(&bytes[4..8]),
    })
}

fn read_string<'a>(
    data: &'a [u8],
    descriptor: StringDescriptor,
    context: &'static str,
) -> Result<&'a [u8]> {
    utils::slice_at(
        data,
        u64::from(descriptor.offset),
        u64::from(descriptor.length),
        context,
    )
}

/// Builds the message map from raw entries.
///
/// Plain messages map to a single translation. Plural groups are keyed by
/// their singular form and map to every NUL-separated translated form, in
/// order. Later duplicates replace earlier ones.
pub fn decode_messages(
    entries: &[RawEntry<'_>],
    encoding: &'static Encoding,
) -> HashMap<String, Vec<String>> {
    let mut messages = HashMap::with_capacity(entries.len());
    for entry in entries {
        let (key, variants) = if entry.is_plural() {
            let singular = entry.original.split(|&b| b == 0).next().unwrap_or_default();
            let variants = entry
                .translated
                .split(|&b| b == 0)
                .map(|form| decode_text(form, encoding))
                .collect();
            (decode_text(singular, encoding), variants)
        } else {
            (
                decode_text(entry.original, encoding),
                vec![decode_text(entry.translated, encoding)],
            )
        };
        messages.insert(key, variants);
    }
    messages
}

/// Decodes message bytes with the catalog's charset.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
