//! Catalog decoding orchestration (header + tables + metadata + text).

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::mo::catalog::MoCatalog;
use crate::mo::format::{header, metadata::Metadata, strings};
use crate::mo::types::error::Result;
use crate::mo::utils;

/// Decode a complete MO file held in memory.
///
/// Process:
/// 1. Detect the byte order and parse the header
/// 2. Read every original/translated pair from the descriptor tables
/// 3. Parse the metadata entry and compile its `Plural-Forms`
/// 4. Decode all message text with the declared charset
pub fn decode(data: &[u8]) -> Result<MoCatalog> {
    let header = header::parse(data)?;
    let entries = strings::read_entries(data, &header)?;

    // The metadata entry may sit anywhere in the table and names the
    // charset, so it is handled before any other text is decoded.
    let raw_info = entries
        .iter()
        .rev()
        .find(|entry| entry.is_metadata())
        .map(|entry| entry.translated);
    let mut metadata = raw_info
        .map(|raw| Metadata::parse(&String::from_utf8_lossy(raw)))
        .unwrap_or_default();
    let plural_forms = metadata.plural_forms()?;

    let encoding = metadata
        .charset()
        .map(utils::parse_encoding)
        .unwrap_or(encoding_rs::UTF_8);
    if let Some(raw) = raw_info
        && encoding != encoding_rs::UTF_8
    {
        metadata = Metadata::parse(&strings::decode_text(raw, encoding));
    }
    debug!("Decoding message text as {}", encoding.name());

    let messages = strings::decode_messages(&entries, encoding);
    let expression = plural_forms
        .as_ref()
        .map(|forms| forms.expression.clone())
        .unwrap_or_default();

    info!(
        "MO catalog decoded: {} messages, language={}, charset={}, plural={}",
        messages.len(),
        metadata.language().unwrap_or("-"),
        encoding.name(),
        expression
    );

    Ok(MoCatalog {
        header,
        messages,
        metadata,
        encoding,
        plural_forms,
        expression,
    })
}

/// Read and decode the MO file at `path`.
pub fn decode_file(path: &Path) -> Result<MoCatalog> {
    info!("Opening MO file: {}", path.display());
    let data = fs::read(path)?;
    decode(&data)
}
