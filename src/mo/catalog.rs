//! Translation lookup.
//!
//! # Invariants
//!
//! 1. **Lookups never fail**: a missing message, a missing plural form or
//!    an index outside the stored forms all fall back to the caller's own
//!    text, so end-user text is always produced.
//!
//! 2. **Immutable after decode**: an [`MoCatalog`] is built once and only
//!    read afterwards, so it is `Send + Sync` and can be shared freely.
//!
//! # Fallbacks
//!
//! | Situation | `gettext` | `ngettext` |
//! |-----------|-----------|------------|
//! | Key missing | `msgid` | `msgid` if `n == 1`, else `msgid_plural` |
//! | Rule picks a missing form | n/a | same as key missing |
//! | [`NullCatalog`] | `msgid` | same as key missing |

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;

use crate::mo::decoder;
use crate::mo::format::metadata::{Metadata, PluralForms};
use crate::mo::plural::Expression;
use crate::mo::types::{error::Result, models::MoHeader};

/// Singular and plural message lookup.
pub trait Catalog {
    /// Returns the translation of `msgid`, or `msgid` itself.
    fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str;

    /// Returns the plural form of `msgid` matching the count `n`.
    ///
    /// Without a usable translation, returns `msgid` when `n == 1` and
    /// `msgid_plural` otherwise.
    fn ngettext<'a>(&'a self, msgid: &'a str, msgid_plural: &'a str, n: u32) -> &'a str;
}

/// The untranslated pass-through choice between singular and plural.
fn untranslated<'a>(msgid: &'a str, msgid_plural: &'a str, n: u32) -> &'a str {
    if n == 1 { msgid } else { msgid_plural }
}

/// A catalog with no translations, used when no file could be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullCatalog;

impl Catalog for NullCatalog {
    fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        msgid
    }

    fn ngettext<'a>(&'a self, msgid: &'a str, msgid_plural: &'a str, n: u32) -> &'a str {
        untranslated(msgid, msgid_plural, n)
    }
}

/// A catalog decoded from an MO file.
///
/// # Example
///
/// ```no_run
/// use mo_reader::{Catalog, MoCatalog};
///
/// let catalog = MoCatalog::open("locale/ru/LC_MESSAGES/messages.mo").unwrap();
/// println!("{}", catalog.gettext("Hello"));
/// println!("{}", catalog.ngettext("%d file", "%d files", 5));
/// ```
#[derive(Debug, Clone)]
pub struct MoCatalog {
    pub(crate) header: MoHeader,
    pub(crate) messages: HashMap<String, Vec<String>>,
    pub(crate) metadata: Metadata,
    pub(crate) encoding: &'static Encoding,
    pub(crate) plural_forms: Option<PluralForms>,
    pub(crate) expression: Expression,
}

impl MoCatalog {
    /// Decodes a catalog from the complete file contents.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The magic number is not an MO magic
    /// - The major revision is not 0 or 1
    /// - A table or string lies outside `data`
    /// - The `Plural-Forms` metadata is malformed or does not compile
    pub fn decode(data: &[u8]) -> Result<Self> {
        decoder::decode(data)
    }

    /// Reads `reader` to the end and decodes the result.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::decode(&data)
    }

    /// Opens and decodes the catalog at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        decoder::decode_file(path.as_ref())
    }

    pub fn header(&self) -> &MoHeader {
        &self.header
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The charset declared by `Content-Type`, if any.
    pub fn charset(&self) -> Option<&str> {
        self.metadata.charset()
    }

    /// The encoding message text was decoded with.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn language(&self) -> Option<&str> {
        self.metadata.language()
    }

    /// The parsed `Plural-Forms`, or `None` if the catalog declares none.
    pub fn plural_forms(&self) -> Option<&PluralForms> {
        self.plural_forms.as_ref()
    }

    /// Declared number of plural forms, if any.
    pub fn plural_count(&self) -> Option<u32> {
        self.plural_forms.as_ref().and_then(|forms| forms.nplurals)
    }

    /// The rule selecting plural forms. Always index 0 without `Plural-Forms`.
    pub fn plural_rule(&self) -> &Expression {
        &self.expression
    }

    /// Every stored form of `msgid`.
    pub fn variants(&self, msgid: &str) -> Option<&[String]> {
        self.messages.get(msgid).map(Vec::as_slice)
    }

    pub fn contains(&self, msgid: &str) -> bool {
        self.messages.contains_key(msgid)
    }

    /// Number of messages, including the metadata entry.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates over message keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

impl Catalog for MoCatalog {
    fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        self.messages
            .get(msgid)
            .and_then(|variants| variants.first())
            .map_or(msgid, String::as_str)
    }

    fn ngettext<'a>(&'a self, msgid: &'a str, msgid_plural: &'a str, n: u32) -> &'a str {
        let Some(variants) = self.messages.get(msgid) else {
            return untranslated(msgid, msgid_plural, n);
        };
        usize::try_from(self.expression.eval(n))
            .ok()
            .and_then(|index| variants.get(index))
            .map_or_else(|| untranslated(msgid, msgid_plural, n), String::as_str)
    }
}
