//! Fetching the border document from disk or over HTTP.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::Client;
use tracing::info;
use url::Url;

use super::{BorderDataset, CodeOverrides};
use crate::error::{BorderError, UnavailableCause};

/// Where the border document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Local file; `.gz` files are decompressed
    File(PathBuf),
    /// `http` or `https` URL
    Url(Url),
}

impl DatasetSource {
    /// Interpret a config/CLI value as a URL when it has an HTTP scheme, else a path
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => DatasetSource::Url(url),
            _ => DatasetSource::File(PathBuf::from(value)),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => write!(f, "{}", url),
        }
    }
}

impl BorderDataset {
    /// Fetch and parse the dataset once. There is no retry: the caller keeps
    /// resolution disabled until it asks for a reload.
    pub async fn load(
        source: &DatasetSource,
        overrides: &CodeOverrides,
    ) -> Result<BorderDataset, BorderError> {
        info!("Loading border dataset from {}", source);

        let origin = source.to_string();
        let bytes = match source {
            DatasetSource::File(path) => {
                let path = path.clone();
                tokio::task::spawn_blocking(move || read_file(&path))
                    .await
                    .map_err(|e| task_failed(&origin, e))?
            }
            DatasetSource::Url(url) => fetch_url(url).await,
        }
        .map_err(|cause| BorderError::unavailable(&origin, cause))?;

        let overrides = overrides.clone();
        tokio::task::spawn_blocking(move || BorderDataset::parse(&bytes, &overrides))
            .await
            .map_err(|e| task_failed(&origin, e))?
            .map_err(|cause| BorderError::unavailable(&origin, cause))
    }
}

fn task_failed(origin: &str, err: tokio::task::JoinError) -> BorderError {
    BorderError::unavailable(origin, UnavailableCause::Task(err.to_string()))
}

fn read_file(path: &Path) -> Result<Vec<u8>, UnavailableCause> {
    let file = File::open(path)?;
    let mut reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

async fn fetch_url(url: &Url) -> Result<Vec<u8>, UnavailableCause> {
    let client = Client::builder()
        .user_agent("Gazetteer/0.1 (border loader)")
        .timeout(Duration::from_secs(60))
        .build()?;

    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
