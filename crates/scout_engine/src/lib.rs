//! Scout engine: filesystem walker, single-page crawl pipeline and the
//! background worker slot that runs them.
mod config;
mod crawl;
mod decode;
mod download;
mod engine;
mod extract;
mod fetch;
mod filename;
mod resolve;
mod task;
mod types;
mod walker;

pub use config::{
    normalize_target_url, CrawlConfig, ScanConfig, ScanMode, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ITEMS,
};
pub use crawl::CrawlTask;
pub use decode::{decode_html, sniff_declared_charset, DecodedHtml};
pub use download::{download, DownloadDir, DownloadError};
pub use engine::{StartError, WorkerSlot};
pub use extract::{ExtractSummary, ResourceExtractor, VIDEO_HOSTS};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::download_filename;
pub use resolve::{item_name, resolve_reference};
pub use task::{ItemSink, TaskBody, TaskContext};
pub use tokio_util::sync::CancellationToken;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
pub use walker::{scan, ScanSummary, ScanTask};
