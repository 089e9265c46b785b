use crate::ItemKind;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp",
];

/// Document sub-kinds in match order.
pub const DOCUMENT_KINDS: &[(ItemKind, &[&str])] = &[
    (ItemKind::Word, &["doc", "docx"]),
    (ItemKind::Excel, &["xls", "xlsx"]),
    (ItemKind::PowerPoint, &["ppt", "pptx"]),
    (ItemKind::Pdf, &["pdf"]),
];

/// Which media kinds a media scan looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFilter {
    #[default]
    All,
    Image,
    Video,
}

/// Ordered kind → extensions table.
///
/// Matching is a case-insensitive suffix match on `.ext`; rows are tried in
/// order and the first hit wins, so a name never classifies under two kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    rows: Vec<(ItemKind, Vec<String>)>,
}

impl ExtensionTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row. Extensions are stored lowercase without the leading dot.
    pub fn with_kind<I, S>(mut self, kind: ItemKind, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self.rows.push((kind, extensions));
        self
    }

    pub fn media(filter: MediaFilter) -> Self {
        let table = Self::new();
        match filter {
            MediaFilter::All => table
                .with_kind(ItemKind::Image, IMAGE_EXTENSIONS)
                .with_kind(ItemKind::Video, VIDEO_EXTENSIONS),
            MediaFilter::Image => table.with_kind(ItemKind::Image, IMAGE_EXTENSIONS),
            MediaFilter::Video => table.with_kind(ItemKind::Video, VIDEO_EXTENSIONS),
        }
    }

    pub fn documents() -> Self {
        DOCUMENT_KINDS
            .iter()
            .fold(Self::new(), |table, (kind, exts)| table.with_kind(*kind, *exts))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|(_, exts)| exts.is_empty())
    }

    pub fn classify(&self, file_name: &str) -> Option<ItemKind> {
        let lower = file_name.to_lowercase();
        self.rows
            .iter()
            .find(|(_, exts)| exts.iter().any(|ext| has_extension(&lower, ext)))
            .map(|(kind, _)| *kind)
    }

    /// Classify a raw URL by its trailing extension, defaulting to a link.
    pub fn classify_url(url: &str) -> ItemKind {
        Self::media(MediaFilter::All)
            .classify(url)
            .unwrap_or(ItemKind::Link)
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new()
    }
}

fn has_extension(lower_name: &str, ext: &str) -> bool {
    lower_name
        .strip_suffix(ext)
        .is_some_and(|stem| stem.ends_with('.'))
}
