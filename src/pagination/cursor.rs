//! Cursor extraction from next links
//!
//! Next links arrive percent-encoded, e.g.
//! `https://a.klaviyo.com/api/tags/?page%5Bcursor%5D=bmV4dDo6aWQ6OjQz`.
//! The link is decoded as a whole first, so the cursor ends at the first
//! literal `&` of the decoded text.

/// Percent-decode a link, replacing invalid UTF-8 sequences
pub fn decode_link(link: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(link.as_bytes())).into_owned()
}

/// Extract the value of `param` from a next link
///
/// Returns `None` when the parameter does not appear in the decoded link.
/// An empty value is returned as `Some("")`; callers decide what it means.
pub fn extract_cursor(link: &str, param: &str) -> Option<String> {
    let decoded = decode_link(link);
    let needle = format!("{param}=");
    let (_, rest) = decoded.split_once(needle.as_str())?;
    let cursor = rest.split('&').next().unwrap_or_default();
    Some(cursor.to_string())
}
