use std::path::PathBuf;

use scout_core::{ExtensionTable, MediaFilter};

use crate::FetchSettings;

/// Item cap for media and document scans.
pub const DEFAULT_MAX_ITEMS: usize = 1_000;
/// Directory levels listed below each root by a name search.
pub const DEFAULT_MAX_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanMode {
    /// Emit files whose extension appears in the table.
    Classify { table: ExtensionTable },
    /// Emit files whose name contains `query`, ignoring case.
    NameSearch { query: String },
}

/// Settings for one filesystem scan. Built before the run starts and never
/// changed while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub roots: Vec<PathBuf>,
    /// Root is level 0; directories down to this level are listed.
    /// `None` walks the whole tree.
    pub max_depth: Option<usize>,
    /// Total cap across all roots. `None` means no cap.
    pub max_items: Option<usize>,
    pub mode: ScanMode,
}

impl ScanConfig {
    pub fn media(roots: Vec<PathBuf>, filter: MediaFilter) -> Self {
        Self {
            roots,
            max_depth: None,
            max_items: Some(DEFAULT_MAX_ITEMS),
            mode: ScanMode::Classify {
                table: ExtensionTable::media(filter),
            },
        }
    }

    pub fn documents(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            max_depth: None,
            max_items: Some(DEFAULT_MAX_ITEMS),
            mode: ScanMode::Classify {
                table: ExtensionTable::documents(),
            },
        }
    }

    pub fn name_search(roots: Vec<PathBuf>, query: impl Into<String>) -> Self {
        Self {
            roots,
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_items: None,
            mode: ScanMode::NameSearch {
                query: query.into(),
            },
        }
    }

    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Settings for one single-page crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub target_url: String,
    pub fetch: FetchSettings,
}

impl CrawlConfig {
    /// The target is normalised with [`normalize_target_url`].
    pub fn new(target_url: &str) -> Self {
        Self::with_settings(target_url, FetchSettings::default())
    }

    pub fn with_settings(target_url: &str, fetch: FetchSettings) -> Self {
        Self {
            target_url: normalize_target_url(target_url),
            fetch,
        }
    }
}

/// Trim the input and prepend `https://` when no http(s) scheme is present.
pub fn normalize_target_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_added_when_missing() {
        assert_eq!(normalize_target_url(" example.com/a "), "https://example.com/a");
        assert_eq!(normalize_target_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_target_url("HTTPS://Example.com"), "HTTPS://Example.com");
    }

    #[test]
    fn scan_presets() {
        let media = ScanConfig::media(vec![PathBuf::from("/")], MediaFilter::All);
        assert_eq!(media.max_items, Some(DEFAULT_MAX_ITEMS));
        assert_eq!(media.max_depth, None);

        let search = ScanConfig::name_search(vec![PathBuf::from("/")], "report");
        assert_eq!(search.max_depth, Some(DEFAULT_MAX_DEPTH));
        assert_eq!(search.max_items, None);
    }
}
