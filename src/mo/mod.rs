//! Core MO catalog module
//!
//! - [`format`]: binary layout parsing (header, string tables, metadata)
//! - [`plural`]: `Plural-Forms` rule compiler and evaluator
//! - [`catalog`]: `gettext`/`ngettext` lookup over decoded and null catalogs
//! - [`translations`]: per-locale cache of catalogs

pub mod catalog;
pub mod format;
pub mod plural;
pub mod translations;
pub mod types;
mod decoder;
mod utils;

pub use catalog::{Catalog, MoCatalog, NullCatalog};
pub use types::error::{CompileError, FormatError, Result};
