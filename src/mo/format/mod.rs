//! File format parsing layer for MO catalogs.
//!
//! This module provides the mid-level parsing layer that bridges between
//! the raw file bytes and the high-level [`MoCatalog`](crate::mo::catalog::MoCatalog).
//!
//! # Module Organization
//!
//! - [`header`]: Detects the byte order and parses the fixed header
//! - [`strings`]: Reads the descriptor tables and message entries
//! - [`metadata`]: Parses the metadata entry, including `Plural-Forms`
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌──────────────────────┐
//! │  Magic + Header      │ ← header::parse()
//! ├──────────────────────┤
//! │  Original table      │ ← strings::read_entries()
//! │  Translated table    │
//! ├──────────────────────┤
//! │  (Hash table)        │   ignored
//! ├──────────────────────┤
//! │  String data         │ ← strings::decode_messages()
//! │  "" → metadata       │ ← metadata::Metadata::parse()
//! └──────────────────────┘
//! ```

pub mod header;
pub mod metadata;
pub mod strings;
