use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

use crate::error::CatalogError;

static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"charset=(?P<label>[A-Za-z0-9_.:-]+)").expect("charset regex is valid")
});

// `msgid ""` directly followed by its msgstr, with no context.
static HEADER_MSGID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^msgid[ \t]+""[ \t]*\r?\n[ \t]*msgstr"#).expect("header regex is valid")
});

static MSGCTXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^msgctxt").expect("msgctxt regex is valid"));

static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\r?\n").expect("blank line regex is valid"));

/// Reads a catalog file and decodes it to text.
pub fn read_catalog(path: &Path) -> Result<String, CatalogError> {
    let bytes = fs::read(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, encoding) = decode(&bytes)?;
    tracing::debug!(path = %path.display(), encoding = encoding.name(), "decoded catalog");

    Ok(text)
}

/// Picks the catalog encoding: BOM, then the header's `charset=`, then detection.
pub fn detect(bytes: &[u8]) -> &'static Encoding {
    // BOM UTF-8 (EF BB BF)
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return UTF_8;
    }

    if let Some(encoding) = declared_charset(bytes) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

pub fn decode(bytes: &[u8]) -> Result<(String, &'static Encoding), CatalogError> {
    let encoding = detect(bytes);

    // `decode` strips a matching BOM.
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(CatalogError::Decode {
            encoding: encoding.name(),
        });
    }

    Ok((text.into_owned(), encoding))
}

/// The first entry of the file, if it is the metadata header.
fn header_block(bytes: &[u8]) -> Option<&[u8]> {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let rest = &bytes[start..];
    let end = BLANK_LINE_RE.find(rest).map_or(rest.len(), |m| m.start());
    let block = &rest[..end];

    (HEADER_MSGID_RE.is_match(block) && !MSGCTXT_RE.is_match(block)).then_some(block)
}

fn declared_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let caps = CHARSET_RE.captures(header_block(bytes)?)?;
    let label = caps.name("label")?.as_bytes();

    // "CHARSET" is the placeholder left in fresh .pot templates.
    if label.eq_ignore_ascii_case(b"CHARSET") {
        return None;
    }

    Encoding::for_label(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("msgid \"a\"".as_bytes());

        let (text, encoding) = decode(&bytes).expect("decodes");
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "msgid \"a\"");
    }

    #[test]
    fn header_charset_is_honoured() {
        let (bytes, _, _) = encoding_rs::BIG5.encode(
            "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=Big5\\n\"\n\nmsgid \"File\"\nmsgstr \"檔案\"\n",
        );

        let (text, encoding) = decode(&bytes).expect("decodes");
        assert_eq!(encoding, encoding_rs::BIG5);
        assert!(text.contains("檔案"));
    }

    #[test]
    fn placeholder_charset_falls_back_to_detection() {
        let bytes = "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=CHARSET\\n\"\n\nmsgid \"café\"\nmsgstr \"\"\n".as_bytes();

        let (text, encoding) = decode(bytes).expect("decodes");
        assert_eq!(encoding, UTF_8);
        assert!(text.contains("café"));
    }

    #[test]
    fn invalid_bytes_for_declared_charset_fail() {
        let mut bytes = b"msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=UTF-8\\n\"\n\nmsgid \"".to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE, 0xFD]);
        bytes.extend_from_slice(b"\"\n");

        assert!(matches!(
            decode(&bytes),
            Err(CatalogError::Decode { encoding: "UTF-8" })
        ));
    }

    #[test]
    fn charset_outside_the_header_is_ignored() {
        let headerless = "msgid \"Set charset=latin1 in the config\"\nmsgstr \"\"\n\nmsgid \"File\"\nmsgstr \"檔案\"\n";
        let (text, encoding) = decode(headerless.as_bytes()).expect("decodes");
        assert_eq!(encoding, UTF_8);
        assert!(text.contains("檔案"));

        let later_entry = "msgid \"\"\nmsgstr \"Project-Id-Version: demo\\n\"\n\nmsgid \"Set charset=latin1\"\nmsgstr \"檔案\"\n";
        let (text, encoding) = decode(later_entry.as_bytes()).expect("decodes");
        assert_eq!(encoding, UTF_8);
        assert!(text.contains("檔案"));
    }

    #[test]
    fn header_block_is_the_leading_empty_msgid() {
        assert!(header_block(b"\n# comment\nmsgid \"\"\nmsgstr \"\"\n\"charset=UTF-8\"\n").is_some());
        assert!(header_block(b"msgctxt \"x\"\nmsgid \"\"\nmsgstr \"\"\n").is_none());
        assert!(header_block(b"msgid \"File\"\nmsgstr \"\"\n").is_none());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_catalog(Path::new("/definitely/not/here.po")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
