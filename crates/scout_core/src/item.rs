use std::fmt;

use serde::Serialize;

/// Classification attached to every discovered file or URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Image,
    Video,
    Word,
    Excel,
    PowerPoint,
    Pdf,
    Link,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Image => "image",
            ItemKind::Video => "video",
            ItemKind::Word => "word",
            ItemKind::Excel => "excel",
            ItemKind::PowerPoint => "powerpoint",
            ItemKind::Pdf => "pdf",
            ItemKind::Link => "link",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of found content.
///
/// `location` is an absolute filesystem path for scans and an absolute URL for
/// crawls. Items are moved into the event channel on emission; the worker
/// keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredItem {
    pub name: String,
    pub location: String,
    pub kind: ItemKind,
}

impl DiscoveredItem {
    pub fn new(name: impl Into<String>, location: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            kind,
        }
    }
}
