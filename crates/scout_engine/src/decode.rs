use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::bytes::Regex;

/// Labels servers send when they have not really declared anything.
const LATIN1_DEFAULT_LABELS: &[&str] = &["iso-8859-1", "iso8859-1", "latin1", "latin-1", "l1"];

static META_CHARSET: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).ok()
});

static XML_ENCODING: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)\A\s*<\?xml[^>]*?encoding\s*=\s*["']([a-z0-9_\-.]+)"#).ok()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset (unless it
/// is the Latin-1 default) -> in-document declaration -> chardetng fallback.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    // 1) BOM aware decode using encoding_rs helper
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    // 2) Content-Type header charset
    if let Some(label) = content_type.and_then(extract_charset) {
        if !is_latin1_default(&label) {
            if let Some(enc) = Encoding::for_label(label.as_bytes()) {
                return decode_with(bytes, enc);
            }
        }
    }

    // 3) meta / xml declaration inside the document
    if let Some(enc) = sniff_declared_charset(bytes) {
        return decode_with(bytes, enc);
    }

    // 4) chardetng detection
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

/// First charset the document declares about itself, if encoding_rs knows it.
pub fn sniff_declared_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    [&*META_CHARSET, &*XML_ENCODING]
        .into_iter()
        .flatten()
        .filter_map(|re| re.captures(bytes))
        .filter_map(|caps| caps.get(1))
        .find_map(|label| Encoding::for_label(label.as_bytes()))
}

fn is_latin1_default(label: &str) -> bool {
    LATIN1_DEFAULT_LABELS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(label))
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(&['"', '\''][..]))
        })
        .find(|value| !value.is_empty())
        .map(|s| s.to_string())
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedHtml {
    let (text, actual, had_errors) = enc.decode(bytes);
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: actual.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_parameter_is_found_case_insensitively() {
        assert_eq!(
            extract_charset("text/html; Charset=\"GBK\"").as_deref(),
            Some("GBK")
        );
        assert_eq!(extract_charset("text/html").as_deref(), None);
        assert_eq!(extract_charset("text/html; charset=").as_deref(), None);
    }

    #[test]
    fn latin1_labels() {
        assert!(is_latin1_default("ISO-8859-1"));
        assert!(is_latin1_default("latin1"));
        assert!(!is_latin1_default("windows-1252"));
    }
}
