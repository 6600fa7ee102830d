/// One gettext catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub msgid: String,
    pub msgctxt: Option<String>,
    pub msgid_plural: Option<String>,
    pub msgstr: String,
    pub msgstr_plural: Vec<String>,
    pub flags: Vec<String>,
    pub obsolete: bool,
    pub previous_msgid: Option<String>,
    pub previous_msgctxt: Option<String>,

    /// 1-based line where the entry starts.
    pub line: usize,
}

impl CatalogEntry {
    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == "fuzzy")
    }

    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    /// Current translation; the first form for plural entries.
    pub fn translated_text(&self) -> &str {
        if self.is_plural() {
            self.msgstr_plural.first().map(String::as_str).unwrap_or("")
        } else {
            &self.msgstr
        }
    }

    /// Every form has a non-empty translation.
    pub fn is_translated(&self) -> bool {
        if self.is_plural() {
            !self.msgstr_plural.is_empty() && self.msgstr_plural.iter().all(|s| !s.is_empty())
        } else {
            !self.msgstr.is_empty()
        }
    }

    /// The metadata entry: empty msgid, no context.
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none() && !self.obsolete
    }
}

/// A parsed catalog: the metadata header plus entries in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub header: Option<CatalogEntry>,
    pub entries: Vec<CatalogEntry>,
}
