// src/fetch/mod.rs

use reqwest::{Client, StatusCode};
use std::fmt;
use tokio::fs;
use tracing::{debug, error, instrument};
use url::Url;

/// Why the permit data could not be loaded.
#[derive(Debug)]
pub enum LoadFailure {
    /// Request never produced a response
    Request(String),
    /// Server answered with something other than 200 OK
    Status(u16),
    /// Response body could not be read as text
    Body(String),
    /// Local file could not be read
    Io(String),
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadFailure::Request(msg) => write!(f, "request failed: {}", msg),
            LoadFailure::Status(code) => write!(f, "unexpected HTTP status {}", code),
            LoadFailure::Body(msg) => write!(f, "reading body failed: {}", msg),
            LoadFailure::Io(msg) => write!(f, "reading file failed: {}", msg),
        }
    }
}

impl std::error::Error for LoadFailure {}

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Url),
    File(String),
}

impl Source {
    /// `http://` and `https://` strings are URLs; everything else is a path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => Source::Http(u),
            _ => Source::File(s.to_string()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http(u) => write!(f, "{}", u),
            Source::File(p) => write!(f, "{}", p),
        }
    }
}

async fn get_text(client: &Client, url: &Url) -> Result<String, LoadFailure> {
    debug!("Fetching text from {}", url);
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| LoadFailure::Request(e.to_string()))?;

    // 200 only; other 2xx codes count as failures too
    if resp.status() != StatusCode::OK {
        return Err(LoadFailure::Status(resp.status().as_u16()));
    }

    resp.text()
        .await
        .map_err(|e| LoadFailure::Body(e.to_string()))
}

/// Load the whole CSV as text. One attempt, no retry.
#[instrument(level = "info", skip(client, source), fields(source = %source))]
pub async fn load_text(client: &Client, source: &Source) -> Result<String, LoadFailure> {
    let result = match source {
        Source::Http(url) => get_text(client, url).await,
        Source::File(path) => fs::read_to_string(path)
            .await
            .map_err(|e| LoadFailure::Io(e.to_string())),
    };

    match &result {
        Ok(text) => debug!(bytes = text.len(), "loaded source"),
        Err(e) => error!(error = %e, "failed to load source"),
    }
    result
}
