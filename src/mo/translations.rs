//! Per-locale catalog cache.
//!
//! [`Translations`] resolves a locale to an MO file, decodes it on first
//! use and keeps the result. A locale whose file is missing or malformed is
//! cached as a [`NullCatalog`], so lookups degrade to untranslated text
//! instead of failing.
//!
//! Loading takes `&mut self`; sharing one cache between threads is left to
//! the caller (e.g. behind a `Mutex`, or by preloading and then sharing
//! `&Translations` read-only through [`Translations::get`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::mo::catalog::{Catalog, MoCatalog, NullCatalog};

/// Maps `(root, locale, domain)` to the path of an MO file.
pub type PathResolver = fn(root: &Path, locale: &str, domain: &str) -> PathBuf;

/// Resolves `<root>/<locale>/LC_MESSAGES/<domain>.mo`.
pub fn default_resolver(root: &Path, locale: &str, domain: &str) -> PathBuf {
    root.join(locale)
        .join("LC_MESSAGES")
        .join(format!("{}.mo", domain))
}

/// The catalog cached for one locale.
#[derive(Debug, Clone)]
pub enum LocaleCatalog {
    Mo(MoCatalog),
    Null(NullCatalog),
}

impl LocaleCatalog {
    /// Whether a real catalog was decoded for this locale.
    pub fn is_translated(&self) -> bool {
        matches!(self, LocaleCatalog::Mo(_))
    }

    pub fn as_mo(&self) -> Option<&MoCatalog> {
        match self {
            LocaleCatalog::Mo(catalog) => Some(catalog),
            LocaleCatalog::Null(_) => None,
        }
    }
}

impl Catalog for LocaleCatalog {
    fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        match self {
            LocaleCatalog::Mo(catalog) => catalog.gettext(msgid),
            LocaleCatalog::Null(catalog) => catalog.gettext(msgid),
        }
    }

    fn ngettext<'a>(&'a self, msgid: &'a str, msgid_plural: &'a str, n: u32) -> &'a str {
        match self {
            LocaleCatalog::Mo(catalog) => catalog.ngettext(msgid, msgid_plural, n),
            LocaleCatalog::Null(catalog) => catalog.ngettext(msgid, msgid_plural, n),
        }
    }
}

/// A set of catalogs for one translation domain, keyed by locale.
///
/// # Example
///
/// ```no_run
/// use mo_reader::{default_resolver, Catalog, Translations};
///
/// let mut translations = Translations::new("locale", "messages", default_resolver);
/// translations.preload(["de", "ja"]);
/// let de = translations.locale("de");
/// println!("{}", de.ngettext("%d file", "%d files", 3));
/// ```
#[derive(Debug, Clone)]
pub struct Translations {
    root: PathBuf,
    domain: String,
    resolver: PathResolver,
    cache: HashMap<String, LocaleCatalog>,
}

impl Translations {
    pub fn new(root: impl Into<PathBuf>, domain: impl Into<String>, resolver: PathResolver) -> Self {
        Self {
            root: root.into(),
            domain: domain.into(),
            resolver,
            cache: HashMap::new(),
        }
    }

    /// Loads each locale not loaded yet, so later lookups do no I/O.
    pub fn preload<I, S>(&mut self, locales: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for locale in locales {
            self.locale(locale.as_ref());
        }
    }

    /// Returns the catalog for `locale`, loading it on first use.
    pub fn locale(&mut self, locale: &str) -> &LocaleCatalog {
        let (root, domain, resolver) = (&self.root, &self.domain, self.resolver);
        self.cache
            .entry(locale.to_owned())
            .or_insert_with(|| load(&resolver(root, locale, domain)))
    }

    /// Returns the catalog for `locale` only if it is already loaded.
    pub fn get(&self, locale: &str) -> Option<&LocaleCatalog> {
        self.cache.get(locale)
    }

    pub fn is_loaded(&self, locale: &str) -> bool {
        self.cache.contains_key(locale)
    }

    /// Drops every cached catalog; the next lookup reloads from disk.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn load(path: &Path) -> LocaleCatalog {
    match MoCatalog::open(path) {
        Ok(catalog) => {
            info!("Loaded catalog {}", path.display());
            LocaleCatalog::Mo(catalog)
        }
        Err(e) => {
            warn!("Using untranslated text, cannot load {}: {}", path.display(), e);
            LocaleCatalog::Null(NullCatalog)
        }
    }
}
