use std::future::Future;
use std::time::Duration;

use formats::{LandmassError, LandmassSet};
use tracing::{debug, info};

#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    Status(u16),
    Io(std::io::Error),
    Timeout(Duration),
    Decode(LandmassError),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "http request failed: {e}"),
            FetchError::Status(code) => write!(f, "http status {code}"),
            FetchError::Io(e) => write!(f, "read failed: {e}"),
            FetchError::Timeout(t) => write!(f, "timed out after {} ms", t.as_millis()),
            FetchError::Decode(e) => write!(f, "invalid landmass dataset: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(e) => Some(e),
            FetchError::Io(e) => Some(e),
            FetchError::Decode(e) => Some(e),
            FetchError::Status(_) | FetchError::Timeout(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads and decodes a landmass dataset from a local path or an HTTP(S) URL.
pub async fn load_landmass(source: String, timeout: Duration) -> Result<LandmassSet, FetchError> {
    debug!(source = %source, timeout_ms = timeout.as_millis() as u64, "loading landmass");
    let payload = with_timeout(read_source(&source), timeout).await?;
    let set = LandmassSet::from_json_str(&payload).map_err(FetchError::Decode)?;
    info!(
        source = %source,
        regions = set.region_count(),
        rings = set.ring_count(),
        "landmass decoded"
    );
    Ok(set)
}

async fn with_timeout<F>(fut: F, timeout: Duration) -> Result<String, FetchError>
where
    F: Future<Output = Result<String, FetchError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

async fn read_source(source: &str) -> Result<String, FetchError> {
    if is_url(source) {
        let resp = reqwest::get(source).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    } else {
        Ok(tokio::fs::read_to_string(source).await?)
    }
}
