use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::error::WriteError;
use crate::model::translation::Translation;

pub const COLUMNS: [&str; 5] = ["source", "translation", "context", "confidence", "fuzzy"];

#[derive(Debug, Serialize)]
struct Row<'a> {
    source: &'a str,
    translation: &'a str,
    context: Option<&'a str>,
    confidence: Option<f64>,
    fuzzy: &'static str,
}

impl<'a> From<&'a Translation> for Row<'a> {
    fn from(t: &'a Translation) -> Self {
        Self {
            source: &t.source,
            translation: &t.translation,
            context: t.context.as_deref(),
            confidence: t.confidence,
            // Literal the existing proofreading sheets use.
            fuzzy: if t.fuzzy { "True" } else { "False" },
        }
    }
}

/// Writes the proofreading sheet: header plus one row per translation.
pub fn write(path: &Path, translations: &[Translation]) -> Result<(), WriteError> {
    let file = File::create(path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    write_to(file, translations)?;

    tracing::info!(path = %path.display(), rows = translations.len(), "wrote CSV");
    Ok(())
}

pub fn write_to<W: std::io::Write>(out: W, translations: &[Translation]) -> Result<(), WriteError> {
    // Headers are written by hand so an empty run still gets them.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);

    writer.write_record(COLUMNS)?;
    for t in translations {
        writer.serialize(Row::from(t))?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
