//! Custom error types for the mo-reader crate.

use thiserror::Error;

/// Errors raised while compiling a `plural=` rule.
///
/// Every variant carries the offending piece of rule text so a broken
/// catalog can be diagnosed from the message alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The rule (or a parenthesized sub-rule) was empty.
    #[error("Empty plural expression")]
    Empty,

    /// A character outside the plural-forms grammar was found.
    #[error("Unexpected character {found:?} at position {position} in '{input}'")]
    UnexpectedCharacter {
        input: String,
        position: usize,
        found: char,
    },

    /// A separator the grammar requires (`?`, `:` or an operator) is missing.
    #[error("'{token}' not found in '{input}'")]
    MissingToken { token: &'static str, input: String },

    /// A ternary branch was neither a nested ternary nor a single integer.
    #[error("Invalid constant: '{0}'")]
    InvalidConstant(String),

    /// An integer literal did not fit in a `u32` or was not a number.
    #[error("Invalid integer literal: '{0}'")]
    InvalidInteger(String),

    /// A comparison did not involve `n` on either side.
    #[error("Comparison must involve 'n': '{0}'")]
    InvalidOperand(String),

    /// A modulus was not of the form `n % <integer>`.
    #[error("Modulus must be 'n % <integer>': '{0}'")]
    InvalidModulus(String),

    /// A modulus by the literal `0`.
    #[error("Modulus by zero: '{0}'")]
    ZeroDivisor(String),

    /// A test contained none of the comparison or logic operators.
    #[error("Cannot compile test: '{0}'")]
    NoOperator(String),

    /// Sub-expressions were nested deeper than the compiler allows.
    #[error("Plural expression nested too deeply: '{0}'")]
    TooDeep(String),
}

/// The primary error type for decoding an MO catalog.
#[derive(Debug, Error)]
pub enum FormatError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The first four bytes are neither the little- nor the big-endian magic.
    #[error("Bad magic: {0:#010x}")]
    BadMagic(u32),

    /// The major revision is neither 0 nor 1.
    #[error("Unsupported MO version: {major}.{minor}. Only major versions 0 and 1 are supported.")]
    UnsupportedVersion { major: u32, minor: u32 },

    /// A header field, descriptor or string lies outside the file.
    #[error("Out of bounds read for {context}: {len} bytes at offset {offset}, but file is {size} bytes")]
    OutOfBounds {
        context: &'static str,
        offset: u64,
        len: u64,
        size: u64,
    },

    /// The metadata entry is malformed.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The `plural=` rule in the metadata failed to compile.
    #[error("Invalid plural forms: {0}")]
    PluralForms(#[from] CompileError),
}

/// A convenience `Result` type alias using the crate's `FormatError` type.
pub type Result<T> = std::result::Result<T, FormatError>;
