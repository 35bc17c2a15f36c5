//! The catalog metadata entry.
//!
//! The translation of the empty message is not a user string but a block of
//! `Key: value` lines, for example:
//!
//! ```text
//! Project-Id-Version: demo 1.0
//! Language: ru
//! Content-Type: text/plain; charset=UTF-8
//! Plural-Forms: nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n!=0 ? 1 : 2;
//! ```
//!
//! Keys are case-folded. A line without a colon continues the previous
//! key's value on a new line.

use std::collections::HashMap;

use log::{debug, warn};

use crate::mo::plural::{self, Expression};
use crate::mo::types::error::{FormatError, Result};

/// Parsed `Key: value` pairs of the metadata entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: HashMap<String, String>,
}

impl Metadata {
    /// Parses the metadata block. Never fails: unknown keys are kept and
    /// stray continuation lines before any key are dropped.
    pub fn parse(info: &str) -> Self {
        let mut entries: HashMap<String, String> = HashMap::new();
        let mut last_key: Option<String> = None;

        for line in info.split('\n') {
            let item = line.trim();
            if item.is_empty() {
                continue;
            }
            if let Some((key, value)) = item.split_once(':') {
                let key = key.trim().to_lowercase();
                entries.insert(key.clone(), value.trim().to_string());
                last_key = Some(key);
            } else if let Some(value) = last_key.as_ref().and_then(|key| entries.get_mut(key)) {
                value.push('\n');
                value.push_str(item);
            }
        }

        debug!("Parsed {} metadata entries", entries.len());
        Self { entries }
    }

    /// Looks up a value by case-insensitive key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `charset=` token of `Content-Type`, if any.
    pub fn charset(&self) -> Option<&str> {
        let (_, charset) = self.get("content-type")?.split_once("charset=")?;
        let charset = charset.split(';').next().unwrap_or_default().trim();
        (!charset.is_empty()).then_some(charset)
    }

    /// The `Language` value, if any.
    pub fn language(&self) -> Option<&str> {
        self.get("language").filter(|language| !language.is_empty())
    }

    /// Parses and compiles `Plural-Forms`.
    ///
    /// Returns `Ok(None)` when the key is absent. A value without a
    /// `plural=` part after the first `;`, or a rule that does not compile,
    /// is a format error.
    pub fn plural_forms(&self) -> Result<Option<PluralForms>> {
        self.get("plural-forms").map(PluralForms::parse).transpose()
    }
}

/// A compiled `Plural-Forms` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    /// Declared number of forms, if `nplurals=` parsed.
    pub nplurals: Option<u32>,
    /// The `plural=` rule text as written.
    pub rule: String,
    /// The compiled rule.
    pub expression: Expression,
}

impl PluralForms {
    /// Parses a value like `nplurals=2; plural=(n != 1);`.
    pub fn parse(value: &str) -> Result<Self> {
        let mut segments = value.split(';');
        let declared = segments.next().unwrap_or_default();
        let rule = segments
            .next()
            .and_then(|segment| segment.split_once("plural="))
            .map(|(_, rule)| rule.trim())
            .ok_or_else(|| {
                FormatError::InvalidMetadata(format!("Plural-Forms without 'plural=': '{}'", value))
            })?;

        let nplurals = parse_nplurals(declared);
        let expression = plural::compile(rule)?;
        debug!("Plural forms: nplurals={:?}, plural={}", nplurals, expression);

        Ok(Self {
            nplurals,
            rule: rule.to_string(),
            expression,
        })
    }
}

fn parse_nplurals(segment: &str) -> Option<u32> {
    let count = segment.trim().strip_prefix("nplurals=")?.trim();
    match count.parse() {
        Ok(count) => Some(count),
        Err(_) => {
            warn!("Ignoring unparseable nplurals '{}'", count);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mo::types::error::CompileError;

    const INFO: &str = "Project-Id-Version: demo 1.0\n\
        Language: ru\n\
        Content-Type: text/plain; charset=KOI8-R\n\
        Plural-Forms: nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n!=0 ? 1 : 2;\n";

    #[test]
    fn keys_are_case_folded() {
        let metadata = Metadata::parse(INFO);
        assert_eq!(metadata.len(), 4);
        assert_eq!(metadata.get("project-id-version"), Some("demo 1.0"));
        assert_eq!(metadata.get("Project-Id-Version"), Some("demo 1.0"));
        assert_eq!(metadata.language(), Some("ru"));
        assert_eq!(metadata.charset(), Some("KOI8-R"));
    }

    #[test]
    fn continuation_lines_append() {
        let metadata = Metadata::parse("Comment: first\nsecond line\n\nLast-Translator: someone\n");
        assert_eq!(metadata.get("comment"), Some("first\nsecond line"));
        assert_eq!(metadata.get("last-translator"), Some("someone"));
    }

    #[test]
    fn leading_continuation_is_dropped() {
        let metadata = Metadata::parse("orphan\nLanguage: de");
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.language(), Some("de"));
    }

    #[test]
    fn values_keep_inner_colons() {
        let metadata = Metadata::parse("POT-Creation-Date: 2024-01-01 12:30+0000");
        assert_eq!(metadata.get("pot-creation-date"), Some("2024-01-01 12:30+0000"));
    }

    #[test]
    fn missing_charset() {
        let metadata = Metadata::parse("Content-Type: text/plain");
        assert_eq!(metadata.charset(), None);
    }

    #[test]
    fn plural_forms_compile() {
        let forms = Metadata::parse(INFO).plural_forms().unwrap().unwrap();
        assert_eq!(forms.nplurals, Some(3));
        assert_eq!(forms.rule, "n%10==1 && n%100!=11 ? 0 : n!=0 ? 1 : 2");
        assert_eq!(forms.expression.eval(21), 0);
        assert_eq!(forms.expression.eval(0), 2);
    }

    #[test]
    fn absent_plural_forms() {
        assert_eq!(Metadata::parse("Language: ja").plural_forms().unwrap(), None);
    }

    #[test]
    fn malformed_plural_forms() {
        let metadata = Metadata::parse("Plural-Forms: nplurals=2");
        assert!(matches!(metadata.plural_forms(), Err(FormatError::InvalidMetadata(_))));

        let metadata = Metadata::parse("Plural-Forms: nplurals=2; plural=n !! 1;");
        assert!(matches!(
            metadata.plural_forms(),
            Err(FormatError::PluralForms(CompileError::UnexpectedCharacter { .. }))
        ));
    }

    #[test]
    fn bad_nplurals_is_tolerated() {
        let forms = PluralForms::parse("nplurals=INTEGER; plural=n != 1;").unwrap();
        assert_eq!(forms.nplurals, None);
        assert_eq!(forms.expression.eval(2), 1);
    }
}
