//! Single-pass harvest of resource references from one HTML document.
//!
//! Steps run in a fixed order (images, players, sources, links, CSS
//! backgrounds) and every hit is emitted as soon as it is found. When the
//! markup yields nothing at all, the raw text is scanned for bare URLs.

use std::sync::LazyLock;

use engine_logging::engine_debug;
use regex::Regex;
use scout_core::{banded_percent, status, DiscoveredItem, ExtensionTable, ItemKind};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::resolve::{item_name, item_name_for, resolve_reference};
use crate::task::ItemSink;

/// Iframe hosts treated as embedded video players.
pub const VIDEO_HOSTS: &[&str] = &["youtube.com", "vimeo.com", "youku.com", "bilibili.com"];

const IMAGE_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-original"];
const SKIPPED_HREF_PREFIXES: &[&str] = &["javascript:", "#", "mailto:"];

static CSS_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)url\(\s*['"]?([^'")]*?)['"]?\s*\)"#).ok());

static RAW_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).ok());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractSummary {
    pub title: Option<String>,
    pub found: usize,
    pub cancelled: bool,
    pub used_fallback: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceExtractor;

impl ResourceExtractor {
    /// Emit every resource reference in `html` into `sink`, resolved against
    /// `base_url`. Progress is reported in the 10–100 band; the slice below
    /// that belongs to the fetch.
    pub fn extract(&self, html: &str, base_url: &Url, sink: &mut dyn ItemSink) -> ExtractSummary {
        let page = Page::parse(html);
        let title = select_in(&page.document, "title")
            .first()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());
        sink.status(status::crawling_title(title.as_deref().unwrap_or("untitled")));

        let mut harvest = Harvest::new(sink, base_url);
        let steps: [(&str, fn(&Page, &mut Harvest<'_>), u8, u8); 5] = [
            ("images", images, 10, 40),
            ("videos", players, 40, 50),
            ("video sources", sources, 50, 55),
            ("links", links, 55, 90),
            ("CSS background images", css_backgrounds, 90, 98),
        ];
        for (what, step, start, end) in steps {
            if harvest.should_stop() {
                break;
            }
            harvest.sink.status(status::extracting(what));
            harvest.band = (start, end);
            let before = harvest.found;
            step(&page, &mut harvest);
            engine_debug!("{}: {} items", what, harvest.found - before);
        }

        let mut used_fallback = false;
        if harvest.found == 0 && !harvest.should_stop() {
            used_fallback = true;
            harvest.sink.status(status::using_fallback());
            raw_urls(html, &mut harvest);
        }

        ExtractSummary {
            title,
            found: harvest.found,
            cancelled: harvest.stopped,
            used_fallback,
        }
    }
}

struct Harvest<'s> {
    sink: &'s mut dyn ItemSink,
    base: &'s Url,
    found: usize,
    stopped: bool,
    band: (u8, u8),
}

impl<'s> Harvest<'s> {
    fn new(sink: &'s mut dyn ItemSink, base: &'s Url) -> Self {
        Self {
            sink,
            base,
            found: 0,
            stopped: false,
            band: (0, 100),
        }
    }

    fn should_stop(&mut self) -> bool {
        if !self.stopped && self.sink.is_cancelled() {
            self.stopped = true;
        }
        self.stopped
    }

    fn step_progress(&mut self, done: usize, total: usize) {
        let (start, end) = self.band;
        self.sink.progress(banded_percent(start, end, done, total));
    }

    fn emit_resolved(&mut self, reference: &str, kind: ItemKind) {
        match resolve_reference(reference, self.base) {
            Some(url) => {
                let name = item_name(&url);
                self.emit(DiscoveredItem::new(name, url.to_string(), kind));
            }
            None => engine_debug!("Skipping unresolvable reference {:?}", reference),
        }
    }

    fn emit_verbatim(&mut self, url: &str, kind: ItemKind) {
        self.emit(DiscoveredItem::new(item_name_for(url), url, kind));
    }

    fn emit(&mut self, item: DiscoveredItem) {
        if self.sink.emit(item) {
            self.found += 1;
        } else {
            self.stopped = true;
        }
    }
}

/// The parsed document plus the markup of its `<noscript>` blocks. The parser
/// runs with scripting on, so that markup arrives as text and is parsed again
/// here as fragments.
struct Page {
    document: Html,
    noscript: Vec<Html>,
}

impl Page {
    fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let noscript = select_in(&document, "noscript")
            .iter()
            .map(|block| block.text().collect::<String>())
            .filter(|markup| markup.contains('<'))
            .map(|markup| Html::parse_fragment(&markup))
            .collect();
        Self { document, noscript }
    }

    /// Matches in the document first, then in each noscript fragment.
    fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        let Ok(selector) = Selector::parse(css) else {
            return Vec::new();
        };
        std::iter::once(&self.document)
            .chain(&self.noscript)
            .flat_map(|html| html.select(&selector).collect::<Vec<_>>())
            .collect()
    }
}

fn select_in<'a>(html: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => html.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.trim().is_empty())
}

fn images(page: &Page, harvest: &mut Harvest<'_>) {
    let elements = page.select_all("img");
    let total = elements.len();
    for (i, img) in elements.iter().enumerate() {
        if harvest.should_stop() {
            return;
        }
        let src = IMAGE_SOURCE_ATTRS
            .iter()
            .find_map(|attr| non_empty_attr(img, attr));
        if let Some(src) = src {
            harvest.emit_resolved(src, ItemKind::Image);
        }
        harvest.step_progress(i + 1, total);
    }
}

fn players(page: &Page, harvest: &mut Harvest<'_>) {
    let elements = page.select_all("video, iframe");
    let total = elements.len();
    for (i, element) in elements.iter().enumerate() {
        if harvest.should_stop() {
            return;
        }
        let src = non_empty_attr(element, "src");
        match (element.value().name(), src) {
            ("video", Some(src)) => harvest.emit_resolved(src, ItemKind::Video),
            ("iframe", Some(src)) if VIDEO_HOSTS.iter().any(|host| src.contains(host)) => {
                // Player URLs on these hosts are absolute already; keep as written.
                harvest.emit_verbatim(src, ItemKind::Video);
            }
            _ => {}
        }
        harvest.step_progress(i + 1, total);
    }
}

fn sources(page: &Page, harvest: &mut Harvest<'_>) {
    let elements = page.select_all("source");
    let total = elements.len();
    for (i, source) in elements.iter().enumerate() {
        if harvest.should_stop() {
            return;
        }
        if let Some(src) = non_empty_attr(source, "src") {
            harvest.emit_resolved(src, ItemKind::Video);
        }
        harvest.step_progress(i + 1, total);
    }
}

fn links(page: &Page, harvest: &mut Harvest<'_>) {
    let elements = page.select_all("a");
    let total = elements.len();
    for (i, anchor) in elements.iter().enumerate() {
        if harvest.should_stop() {
            return;
        }
        if let Some(href) = non_empty_attr(anchor, "href") {
            // Exact, case-sensitive prefixes; `JavaScript:` or ` #top` pass through.
            if !SKIPPED_HREF_PREFIXES.iter().any(|p| href.starts_with(p)) {
                harvest.emit_resolved(href, ItemKind::Link);
            }
        }
        harvest.step_progress(i + 1, total);
    }
}

fn css_backgrounds(page: &Page, harvest: &mut Harvest<'_>) {
    let Some(pattern) = CSS_URL.as_ref() else {
        return;
    };
    let mut styles: Vec<String> = page
        .select_all("style")
        .iter()
        .map(|style| style.text().collect::<String>())
        .collect();
    styles.extend(
        page.select_all("[style]")
            .iter()
            .filter_map(|element| element.value().attr("style"))
            .map(str::to_string),
    );

    let total = styles.len();
    for (i, css) in styles.iter().enumerate() {
        for caps in pattern.captures_iter(css) {
            if harvest.should_stop() {
                return;
            }
            let Some(reference) = caps.get(1).map(|m| m.as_str().trim()) else {
                continue;
            };
            if reference.is_empty() || reference.to_ascii_lowercase().starts_with("data:") {
                continue;
            }
            harvest.emit_resolved(reference, ItemKind::Image);
        }
        harvest.step_progress(i + 1, total);
    }
}

fn raw_urls(text: &str, harvest: &mut Harvest<'_>) {
    let Some(pattern) = RAW_URL.as_ref() else {
        return;
    };
    harvest.band = (98, 100);
    for found in pattern.find_iter(text) {
        if harvest.should_stop() {
            return;
        }
        let url = found.as_str();
        if Url::parse(url).is_err() {
            continue;
        }
        harvest.emit_verbatim(url, ExtensionTable::classify_url(url));
    }
    harvest.step_progress(1, 1);
}
