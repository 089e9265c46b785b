use encoding_rs::{GBK, SHIFT_JIS, WINDOWS_1252};
use scout_engine::{decode_html, sniff_declared_charset};

#[test]
fn header_charset_is_used() {
    let (bytes, _, _) = GBK.encode("<p>中文页面</p>");
    let decoded = decode_html(&bytes, Some("text/html; charset=gbk"));
    assert_eq!(decoded.html, "<p>中文页面</p>");
    assert_eq!(decoded.encoding_label, "GBK");
    assert!(!decoded.had_errors);
}

#[test]
fn bom_wins_over_header() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("<p>héllo</p>".as_bytes());
    let decoded = decode_html(&bytes, Some("text/html; charset=shift_jis"));
    assert_eq!(decoded.html, "<p>héllo</p>");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn latin1_header_defers_to_meta_declaration() {
    let (body, _, _) = GBK.encode("<html><head><meta charset=\"gb2312\"></head><body>你好</body></html>");
    let decoded = decode_html(&body, Some("text/html; charset=ISO-8859-1"));
    assert!(decoded.html.contains("你好"));
    assert_eq!(decoded.encoding_label, "GBK");
}

#[test]
fn http_equiv_and_xml_declarations_are_sniffed() {
    let http_equiv =
        br#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
    assert_eq!(sniff_declared_charset(http_equiv), Some(SHIFT_JIS));

    let xml = br#"<?xml version="1.0" encoding="windows-1252"?><html></html>"#;
    assert_eq!(sniff_declared_charset(xml), Some(WINDOWS_1252));

    assert_eq!(sniff_declared_charset(b"<html><body>plain</body></html>"), None);
}

#[test]
fn undeclared_bytes_fall_back_to_detection() {
    let decoded = decode_html(b"<html><body>just ascii</body></html>", None);
    assert_eq!(decoded.html, "<html><body>just ascii</body></html>");
    assert!(!decoded.had_errors);
}

#[test]
fn malformed_utf8_is_replaced_not_rejected() {
    let decoded = decode_html(b"<p>bad \xFF\xFE byte</p>", Some("text/html; charset=utf-8"));
    assert!(decoded.had_errors);
    assert!(decoded.html.contains('\u{FFFD}'));
}
