//! # mo-reader
//!
//! A reader for gettext MO message catalogs.
//! Decodes little- and big-endian catalogs, honors the declared charset and
//! compiles the `Plural-Forms` rule so `ngettext` picks the right form.
//!
//! ```no_run
//! use mo_reader::{Catalog, MoCatalog};
//!
//! let catalog = MoCatalog::open("locale/de/LC_MESSAGES/messages.mo").unwrap();
//! assert_eq!(catalog.ngettext("%d file", "%d files", 1), "%d Datei");
//! ```
pub mod mo;

// Re-export the main types for convenience
pub use mo::{
    Catalog,
    CompileError,
    FormatError,
    MoCatalog,
    NullCatalog,
    Result,
    format::metadata::{Metadata, PluralForms},
    plural,
    translations::{LocaleCatalog, PathResolver, Translations, default_resolver},
    types::models::{Endianness, MoHeader},
};
