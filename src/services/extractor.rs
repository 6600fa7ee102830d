//! Extractors turn a catalog file into the worklist of strings to translate.

use std::path::Path;

use crate::error::CatalogError;
use crate::model::entry::{Catalog, CatalogEntry};
use crate::model::translation::{Translatable, Translation};
use crate::parsers;
use crate::services::encoding;

/// Lazy, single-pass sequence of items in catalog order.
pub type Translatables = Box<dyn Iterator<Item = Translatable> + Send>;

pub trait Extractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reads and parses `path`. Parse errors surface here, before anything
    /// is yielded.
    fn extract(&self, path: &Path) -> Result<Translatables, CatalogError>;
}

/// Extractor for gettext `.po` / `.pot` catalogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct GettextExtractor;

impl Extractor for GettextExtractor {
    fn name(&self) -> &'static str {
        "gettext"
    }

    fn extract(&self, path: &Path) -> Result<Translatables, CatalogError> {
        let text = encoding::read_catalog(path)?;
        let catalog = parsers::gettext::parse(&text)?;

        tracing::debug!(
            path = %path.display(),
            entries = catalog.entries.len(),
            "parsed gettext catalog"
        );

        Ok(Box::new(translatables(catalog)))
    }
}

/// Derives the worklist from a parsed catalog.
pub fn translatables(catalog: Catalog) -> impl Iterator<Item = Translatable> + Send {
    catalog.entries.into_iter().filter_map(to_translatable)
}

fn to_translatable(entry: CatalogEntry) -> Option<Translatable> {
    if entry.obsolete {
        return None;
    }

    let fuzzy = entry.is_fuzzy();
    if !fuzzy && entry.is_translated() {
        return None;
    }

    tracing::info!(msgid = %entry.msgid, fuzzy, "found untranslated / fuzzy string");

    let translated = entry.translated_text().to_string();

    let reference = if let Some(previous) = entry.previous_msgid {
        // Translated against an older source, so a known-good example.
        Some(Translation::reference(
            previous,
            entry.previous_msgctxt,
            translated,
            false,
        ))
    } else if fuzzy && !translated.is_empty() {
        Some(Translation::reference(
            entry.msgid.clone(),
            entry.msgctxt.clone(),
            translated,
            true,
        ))
    } else {
        None
    };

    let translatable = Translatable::new(entry.msgid, entry.msgctxt);

    Some(match reference {
        Some(r) => translatable.with_reference(r),
        None => translatable,
    })
}
