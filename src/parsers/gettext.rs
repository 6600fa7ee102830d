//! Gettext `.po` / `.pot` parser.
//!
//! Produces entries in file order with their flags, plural forms, obsolete
//! marker (`#~`) and previous fields (`#|`). Malformed input is rejected with
//! the offending line number instead of being skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CatalogError;
use crate::model::entry::{Catalog, CatalogEntry};

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<keyword>msgctxt|msgid_plural|msgid|msgstr)(?:\[(?P<index>\d+)\])?\s*(?P<rest>".*)$"#)
        .expect("keyword regex is valid")
});

static PREVIOUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<keyword>msgctxt|msgid_plural|msgid)\s*(?P<rest>".*)$"#)
        .expect("previous-field regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
    PreviousMsgctxt,
    PreviousMsgid,
    PreviousMsgidPlural,
}

#[derive(Default)]
struct EntryBuilder {
    entry: CatalogEntry,
    started: bool,
    has_msgid: bool,
    has_msgstr: bool,
    field: Option<Field>,
}

impl EntryBuilder {
    fn touch(&mut self, line: usize) {
        if !self.started {
            self.started = true;
            self.entry.line = line;
        }
    }

    fn finish(&mut self) -> Result<Option<CatalogEntry>, CatalogError> {
        let builder = std::mem::take(self);

        if !builder.started {
            return Ok(None);
        }

        if !builder.has_msgid {
            // A trailing comment block with no keywords is not an entry.
            if builder.entry.msgctxt.is_some() {
                return Err(CatalogError::parse(builder.entry.line, "msgctxt without msgid"));
            }
            return Ok(None);
        }

        if !builder.has_msgstr {
            return Err(CatalogError::parse(builder.entry.line, "entry has no msgstr"));
        }

        Ok(Some(builder.entry))
    }

    fn append(&mut self, text: &str, line: usize) -> Result<(), CatalogError> {
        let e = &mut self.entry;
        let target = match self.field {
            Some(Field::Msgctxt) => e.msgctxt.get_or_insert_with(String::new),
            Some(Field::Msgid) => &mut e.msgid,
            Some(Field::MsgidPlural) => e.msgid_plural.get_or_insert_with(String::new),
            Some(Field::Msgstr) => &mut e.msgstr,
            Some(Field::MsgstrPlural(i)) => &mut e.msgstr_plural[i],
            Some(Field::PreviousMsgctxt) => e.previous_msgctxt.get_or_insert_with(String::new),
            Some(Field::PreviousMsgid) => e.previous_msgid.get_or_insert_with(String::new),
            // Kept only so its continuation lines are accepted.
            Some(Field::PreviousMsgidPlural) => return Ok(()),
            None => return Err(CatalogError::parse(line, "string without a preceding keyword")),
        };
        target.push_str(text);
        Ok(())
    }
}

/// Parses catalog text into its header and entries.
pub fn parse(text: &str) -> Result<Catalog, CatalogError> {
    let mut entries: Vec<CatalogEntry> = Vec::new();
    let mut builder = EntryBuilder::default();

    for (i, raw) in text.lines().enumerate() {
        let ln = i + 1;
        let line = raw.trim();

        if line.is_empty() {
            entries.extend(builder.finish()?);
            continue;
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let rest = rest.trim_start();
            if let Some(previous) = rest.strip_prefix('|') {
                previous_line(&mut builder, &mut entries, previous.trim_start(), ln)?;
            } else if !rest.is_empty() {
                keyword_line(&mut builder, &mut entries, rest, true, ln)?;
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("#|") {
            previous_line(&mut builder, &mut entries, rest.trim_start(), ln)?;
            continue;
        }

        if let Some(rest) = line.strip_prefix("#,") {
            start_comment(&mut builder, &mut entries, ln)?;
            builder.entry.flags.extend(
                rest.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string),
            );
            continue;
        }

        if line.starts_with('#') {
            start_comment(&mut builder, &mut entries, ln)?;
            continue;
        }

        keyword_line(&mut builder, &mut entries, line, false, ln)?;
    }

    entries.extend(builder.finish()?);

    let header = if entries.first().is_some_and(CatalogEntry::is_header) {
        Some(entries.remove(0))
    } else {
        None
    };

    Ok(Catalog { header, entries })
}

/// Comments belong to the next entry, so they close a completed one.
fn start_comment(
    builder: &mut EntryBuilder,
    entries: &mut Vec<CatalogEntry>,
    ln: usize,
) -> Result<(), CatalogError> {
    if builder.has_msgstr {
        entries.extend(builder.finish()?);
    }
    builder.touch(ln);
    builder.field = None;
    Ok(())
}

fn keyword_line(
    builder: &mut EntryBuilder,
    entries: &mut Vec<CatalogEntry>,
    line: &str,
    obsolete: bool,
    ln: usize,
) -> Result<(), CatalogError> {
    if line.starts_with('"') {
        let text = unquote(line, ln)?;
        return builder.append(&text, ln);
    }

    let caps = KEYWORD_RE
        .captures(line)
        .ok_or_else(|| CatalogError::parse(ln, format!("unexpected line: {line}")))?;

    let keyword = &caps["keyword"];
    let index = caps
        .name("index")
        .map(|m| {
            m.as_str()
                .parse::<usize>()
                .map_err(|_| CatalogError::parse(ln, "invalid plural index"))
        })
        .transpose()?;
    let text = unquote(&caps["rest"], ln)?;

    if index.is_some() && keyword != "msgstr" {
        return Err(CatalogError::parse(ln, format!("{keyword} does not take an index")));
    }

    if matches!(keyword, "msgctxt" | "msgid") && builder.has_msgstr {
        entries.extend(builder.finish()?);
    }

    builder.touch(ln);
    builder.entry.obsolete |= obsolete;

    let e = &mut builder.entry;
    match (keyword, index) {
        ("msgctxt", _) => {
            if builder.has_msgid {
                return Err(CatalogError::parse(ln, "msgctxt after msgid"));
            }
            e.msgctxt = Some(text);
            builder.field = Some(Field::Msgctxt);
        }
        ("msgid", _) => {
            if builder.has_msgid {
                return Err(CatalogError::parse(ln, "duplicate msgid"));
            }
            e.msgid = text;
            builder.has_msgid = true;
            builder.field = Some(Field::Msgid);
        }
        ("msgid_plural", _) => {
            if !builder.has_msgid || builder.has_msgstr {
                return Err(CatalogError::parse(ln, "msgid_plural must follow msgid"));
            }
            e.msgid_plural = Some(text);
            builder.field = Some(Field::MsgidPlural);
        }
        ("msgstr", None) => {
            if !builder.has_msgid {
                return Err(CatalogError::parse(ln, "msgstr without msgid"));
            }
            e.msgstr = text;
            builder.has_msgstr = true;
            builder.field = Some(Field::Msgstr);
        }
        ("msgstr", Some(i)) => {
            if !builder.has_msgid {
                return Err(CatalogError::parse(ln, "msgstr without msgid"));
            }
            // Forms come in order: msgstr[0], msgstr[1], ...
            if i != e.msgstr_plural.len() {
                return Err(CatalogError::parse(ln, "invalid plural index"));
            }
            e.msgstr_plural.push(text);
            builder.has_msgstr = true;
            builder.field = Some(Field::MsgstrPlural(i));
        }
        _ => return Err(CatalogError::parse(ln, format!("unexpected keyword {keyword}"))),
    }

    Ok(())
}

fn previous_line(
    builder: &mut EntryBuilder,
    entries: &mut Vec<CatalogEntry>,
    line: &str,
    ln: usize,
) -> Result<(), CatalogError> {
    if line.starts_with('"') {
        if !matches!(
            builder.field,
            Some(Field::PreviousMsgctxt | Field::PreviousMsgid | Field::PreviousMsgidPlural)
        ) {
            return Err(CatalogError::parse(ln, "#| string without a preceding #| keyword"));
        }
        let text = unquote(line, ln)?;
        return builder.append(&text, ln);
    }

    let caps = PREVIOUS_RE
        .captures(line)
        .ok_or_else(|| CatalogError::parse(ln, format!("unexpected previous field: {line}")))?;
    let text = unquote(&caps["rest"], ln)?;

    start_comment(builder, entries, ln)?;

    match &caps["keyword"] {
        "msgctxt" => {
            builder.entry.previous_msgctxt = Some(text);
            builder.field = Some(Field::PreviousMsgctxt);
        }
        "msgid" => {
            builder.entry.previous_msgid = Some(text);
            builder.field = Some(Field::PreviousMsgid);
        }
        _ => builder.field = Some(Field::PreviousMsgidPlural),
    }

    Ok(())
}

/// Strips the quotes from a PO string and resolves its escapes.
fn unquote(s: &str, ln: usize) -> Result<String, CatalogError> {
    let s = s.trim();
    let body = s
        .strip_prefix('"')
        .ok_or_else(|| CatalogError::parse(ln, "expected a quoted string"))?;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();

    while let Some((pos, c)) = chars.next() {
        match c {
            '"' => {
                let trailing = &body[pos + 1..];
                if !trailing.trim().is_empty() {
                    return Err(CatalogError::parse(
                        ln,
                        format!("unexpected characters after string: {trailing}"),
                    ));
                }
                return Ok(out);
            }
            '\\' => match chars.next().map(|(_, c)| c) {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => break,
            },
            _ => out.push(c),
        }
    }

    Err(CatalogError::parse(ln, "unterminated string"))
}
