use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use scout_core::{status, TaskFailure};
use url::Url;

use crate::decode::decode_html;
use crate::extract::ResourceExtractor;
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::task::{ItemSink, TaskBody, TaskContext};
use crate::{CrawlConfig, FailureKind, FetchError};

/// Progress reached once the page body is in memory.
const FETCHED_PERCENT: u8 = 10;

/// Fetch one page and harvest its resources as a background run.
pub struct CrawlTask {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: ResourceExtractor,
}

impl CrawlTask {
    pub fn new(config: CrawlConfig) -> Self {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            extractor: ResourceExtractor,
        }
    }

    fn report_fetch_error(&self, ctx: &mut TaskContext, err: FetchError) -> Result<(), TaskFailure> {
        match err.kind {
            FailureKind::Cancelled => {
                ctx.status(status::crawl_stopped(0));
                Ok(())
            }
            FailureKind::HttpStatus(code) => {
                engine_warn!("{} answered {}", self.config.target_url, code);
                ctx.status(status::http_failed(code));
                Err(TaskFailure::HttpStatus { code })
            }
            _ => {
                engine_warn!("Fetching {} failed: {}", self.config.target_url, err);
                ctx.status(status::request_error(&err.to_string()));
                Err(err.into())
            }
        }
    }
}

impl TaskBody for CrawlTask {
    fn label(&self) -> &str {
        "crawl"
    }

    fn run(&mut self, ctx: &mut TaskContext) -> Result<(), TaskFailure> {
        let target = self.config.target_url.clone();
        if ctx.is_cancelled() {
            ctx.status(status::crawl_stopped(0));
            return Ok(());
        }
        ctx.status(status::requesting_page(&target));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| TaskFailure::Internal {
                message: format!("tokio runtime: {err}"),
            })?;
        let cancel = ctx.cancel_token().clone();
        let fetched = runtime.block_on(self.fetcher.fetch(&target, &cancel));
        let output = match fetched {
            Ok(output) => output,
            Err(err) => return self.report_fetch_error(ctx, err),
        };
        ctx.progress(FETCHED_PERCENT);

        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        engine_info!(
            "Fetched {} ({} bytes, {} attempt(s), encoding {})",
            output.metadata.final_url,
            output.metadata.byte_len,
            output.metadata.attempts,
            decoded.encoding_label
        );
        ctx.status(status::page_loaded(
            &decoded.encoding_label,
            decoded.html.chars().count(),
        ));

        let base = Url::parse(&output.metadata.final_url)
            .or_else(|_| Url::parse(&target))
            .map_err(|err| TaskFailure::InvalidUrl {
                message: err.to_string(),
            })?;

        let summary = self.extractor.extract(&decoded.html, &base, ctx);
        if summary.cancelled || ctx.is_cancelled() {
            ctx.status(status::crawl_stopped(ctx.items_emitted()));
        } else {
            ctx.progress(100);
            ctx.status(status::crawl_finished(summary.found));
        }
        Ok(())
    }
}
