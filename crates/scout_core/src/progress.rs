//! Counter → percentage mapping and the status lines shown to the user.

/// `min(100, floor(items / cap * 100))`. A zero cap counts as done.
pub fn percent_of_cap(items: usize, cap: usize) -> u8 {
    if cap == 0 {
        return 100;
    }
    let pct = (items as u128 * 100) / cap as u128;
    pct.min(100) as u8
}

/// `floor(done / total * 100)`, clamped. An empty total counts as done.
pub fn percent_of(done: usize, total: usize) -> u8 {
    percent_of_cap(done, total)
}

/// Map `done / total` into the `[start, end]` slice of the 0–100 scale.
///
/// Multi-step pipelines give each step its own band so the overall value
/// never moves backwards between steps.
pub fn banded_percent(start: u8, end: u8, done: usize, total: usize) -> u8 {
    let (start, end) = (start.min(100), end.min(100));
    if end <= start {
        return start;
    }
    let span = (end - start) as usize;
    let within = if total == 0 {
        span
    } else {
        (done.min(total) * span) / total
    };
    start + within as u8
}

pub mod status {
    //! Status lines. Front ends display them verbatim.

    pub fn scan_started(roots: usize) -> String {
        format!("Scanning {roots} location(s)...")
    }

    pub fn scanning_root(root: &str) -> String {
        format!("Scanning {root}")
    }

    pub fn scan_cap_reached(cap: usize) -> String {
        format!("Reached the limit of {cap} items, stopping scan")
    }

    pub fn scan_finished(found: usize) -> String {
        format!("Scan finished, found {found} items")
    }

    pub fn scan_stopped(found: usize) -> String {
        format!("Scan stopped, found {found} items")
    }

    pub fn requesting_page(url: &str) -> String {
        format!("Sending HTTP request to {url}")
    }

    pub fn page_loaded(encoding: &str, chars: usize) -> String {
        format!("Page loaded ({chars} chars, {encoding}), parsing...")
    }

    pub fn crawling_title(title: &str) -> String {
        format!("Crawling: {title}")
    }

    pub fn extracting(what: &str) -> String {
        format!("Extracting {what}...")
    }

    pub fn using_fallback() -> String {
        "Nothing found in markup, scanning raw text for URLs...".to_string()
    }

    pub fn http_failed(code: u16) -> String {
        format!("HTTP request failed, status code: {code}")
    }

    pub fn request_error(message: &str) -> String {
        format!("Request error: {message}")
    }

    pub fn crawl_finished(found: usize) -> String {
        format!("Crawl finished, found {found} items")
    }

    pub fn crawl_stopped(found: usize) -> String {
        format!("Crawl stopped, found {found} items")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_percent_is_floored_and_clamped() {
        assert_eq!(percent_of_cap(0, 1000), 0);
        assert_eq!(percent_of_cap(999, 1000), 99);
        assert_eq!(percent_of_cap(1000, 1000), 100);
        assert_eq!(percent_of_cap(5000, 1000), 100);
        assert_eq!(percent_of_cap(3, 0), 100);
    }

    #[test]
    fn roots_percent() {
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 66);
        assert_eq!(percent_of(3, 3), 100);
    }

    #[test]
    fn bands_stay_inside_their_slice() {
        assert_eq!(banded_percent(10, 40, 0, 4), 10);
        assert_eq!(banded_percent(10, 40, 2, 4), 25);
        assert_eq!(banded_percent(10, 40, 4, 4), 40);
        assert_eq!(banded_percent(10, 40, 9, 4), 40);
        assert_eq!(banded_percent(10, 40, 0, 0), 40);
        assert_eq!(banded_percent(50, 20, 1, 2), 50);
    }
}
