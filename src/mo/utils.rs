//! Low-level byte reading utilities

use byteorder::ByteOrder;
use encoding_rs::Encoding;
use log::warn;

use crate::mo::types::error::{FormatError, Result};

/// Borrow `len` bytes at `offset`, failing instead of panicking when the
/// range runs past the end of `data`.
pub fn slice_at<'a>(
    data: &'a [u8],
    offset: u64,
    len: u64,
    context: &'static str,
) -> Result<&'a [u8]> {
    let out_of_bounds = || FormatError::OutOfBounds {
        context,
        offset,
        len,
        size: data.len() as u64,
    };
    let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
    let end = offset
        .checked_add(len)
        .and_then(|end| usize::try_from(end).ok())
        .ok_or_else(out_of_bounds)?;
    data.get(start..end).ok_or_else(out_of_bounds)
}

/// Read a 4 byte number at `offset` in the byte order `B`.
pub fn read_u32_at<B: ByteOrder>(data: &[u8], offset: u64, context: &'static str) -> Result<u32> {
    Ok(B::read_u32(slice_at(data, offset, 4, context)?))
}

/// Resolve a charset label to an encoding, falling back to UTF-8.
///
/// Labels follow the WHATWG registry, so `utf-8`, `UTF8`, `ISO-8859-1`,
/// `koi8-r` and friends are all understood. The gettext placeholder
/// `CHARSET` left by un-filled templates also falls back silently.
pub fn parse_encoding(label: &str) -> &'static Encoding {
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case("CHARSET") {
        return encoding_rs::UTF_8;
    }
    Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
        warn!("Unknown charset '{}', decoding as UTF-8", label);
        encoding_rs::UTF_8
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};

    #[test]
    fn reads_in_both_byte_orders() {
        let data = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(read_u32_at::<LittleEndian>(&data, 0, "test").unwrap(), 0x04030201);
        assert_eq!(read_u32_at::<BigEndian>(&data, 0, "test").unwrap(), 0x01020304);
    }

    #[test]
    fn out_of_range_reads_fail() {
        let data = [0u8; 6];
        assert!(read_u32_at::<LittleEndian>(&data, 3, "test").is_err());
        assert!(slice_at(&data, u64::MAX, 2, "test").is_err());
        assert!(slice_at(&data, 6, 0, "test").unwrap().is_empty());
    }

    #[test]
    fn encoding_labels() {
        assert_eq!(parse_encoding("UTF-8"), encoding_rs::UTF_8);
        assert_eq!(parse_encoding(" iso-8859-2 "), encoding_rs::ISO_8859_2);
        assert_eq!(parse_encoding("CHARSET"), encoding_rs::UTF_8);
        assert_eq!(parse_encoding("no-such-charset"), encoding_rs::UTF_8);
    }
}
