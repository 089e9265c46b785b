use url::Url;

/// Join `reference` onto `base` with standard URL semantics. Absolute
/// references come back unchanged; empty or unjoinable ones are dropped.
pub fn resolve_reference(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    base.join(trimmed).ok()
}

/// Display name for a URL: last non-empty path segment, else the host, else
/// the whole URL.
pub fn item_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| url.as_str().to_string())
}

/// [`item_name`] for a raw string that may not parse.
pub fn item_name_for(raw: &str) -> String {
    Url::parse(raw)
        .map(|url| item_name(&url))
        .unwrap_or_else(|_| raw.to_string())
}
