use crate::site::SiteDocument;
use reqwest::StatusCode;
use std::{fs, io};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),
    #[error("invalid site document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads the site document from a file path or an `http(s)://` URL.
///
/// Single attempt: no retries, no caching.
pub fn load(source: &str) -> Result<SiteDocument, LoadError> {
    if is_url(source) {
        debug!(url = source, "fetching site document");
        let response = reqwest::blocking::get(source)?;
        if !response.status().is_success() {
            return Err(LoadError::Status(response.status()));
        }
        return parse(&response.bytes()?);
    }

    debug!(path = source, "reading site document");
    let body = fs::read(source).map_err(|source_err| LoadError::Io {
        path: source.to_owned(),
        source: source_err,
    })?;
    parse(&body)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn parse(body: &[u8]) -> Result<SiteDocument, LoadError> {
    Ok(serde_json::from_slice(body)?)
}
