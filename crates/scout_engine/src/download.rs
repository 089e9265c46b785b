use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::filename::download_filename;
use crate::FetchError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("download directory unusable: {0}")]
    Directory(String),
    #[error("could not save download: {0}")]
    Save(#[from] io::Error),
    #[error("could not start download runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// The folder downloads land in. Each file is named after the last path
/// segment of its url, and a later download of the same name replaces it.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    path: PathBuf,
}

impl DownloadDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the folder on first use; a file in its place is an error.
    fn prepare(&self) -> Result<(), DownloadError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(DownloadError::Directory(format!(
                "{} is not a directory",
                self.path.display()
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(&self.path)
                .map_err(|e| DownloadError::Directory(format!("{}: {e}", self.path.display()))),
            Err(err) => Err(DownloadError::Directory(format!(
                "{}: {err}",
                self.path.display()
            ))),
        }
    }

    /// Store the body fetched from `url`. The bytes go to a temp file in the
    /// same folder first and are renamed over the target once complete.
    pub fn save(&self, url: &str, body: &[u8]) -> Result<PathBuf, DownloadError> {
        self.prepare()?;
        let target = self.path.join(download_filename(url));

        let mut staged = NamedTempFile::new_in(&self.path)?;
        staged.write_all(body)?;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|e| DownloadError::Save(e.error))?;
        Ok(target)
    }
}

/// Fetch `url` and save it into `dir`, returning the written path.
///
/// Blocking; call it from a plain thread, not from inside a tokio runtime.
pub fn download(url: &str, dir: &Path, settings: &FetchSettings) -> Result<PathBuf, DownloadError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(DownloadError::Runtime)?;
    let fetcher = ReqwestFetcher::new(settings.clone());
    let output = runtime.block_on(fetcher.fetch(url, &CancellationToken::new()))?;

    let path = DownloadDir::new(dir).save(url, &output.bytes)?;
    engine_info!(
        "Downloaded {} ({} bytes) to {}",
        url,
        output.metadata.byte_len,
        path.display()
    );
    Ok(path)
}
