//! Network fetcher: one plain GET per clip, whole body buffered in memory.
//!
//! Uses the curl crate (libcurl). The response status is logged but never
//! checked; an error page is a payload like any other.

/// Redirect cap, matching common client defaults.
const MAX_REDIRECTS: u32 = 10;

/// Fetch failure, split by whether the transfer ever started delivering a body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Not an absolute `http`/`https` URL; nothing was sent.
    #[error("parse {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported protocol scheme {0:?}")]
    UnsupportedScheme(String),
    /// DNS, connect, TLS, or protocol errors before a body was read.
    #[error(transparent)]
    Transport(curl::Error),
    /// The connection broke while the body was being received.
    #[error(transparent)]
    Body(curl::Error),
}

impl FetchError {
    /// Sort a failed `perform` into transport vs body-read errors.
    pub fn classify(e: curl::Error) -> Self {
        if e.is_recv_error()
            || e.is_partial_file()
            || e.is_write_error()
            || e.is_bad_content_encoding()
        {
            FetchError::Body(e)
        } else {
            FetchError::Transport(e)
        }
    }
}

/// Retrieves the full payload behind a URL.
///
/// Implementations block the calling thread; the runner gives every job its own.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Only absolute `http`/`https` URLs are fetched. libcurl would otherwise read
/// `file://` paths or guess a scheme for bare `host:port` strings.
pub fn check_url(raw: &str) -> Result<(), FetchError> {
    let parsed = url::Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Fetcher backed by a fresh libcurl easy handle per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlFetcher;

impl CurlFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        check_url(url)?;
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(FetchError::Transport)?;
        easy.follow_location(true).map_err(FetchError::Transport)?;
        easy.max_redirections(MAX_REDIRECTS)
            .map_err(FetchError::Transport)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(FetchError::Transport)?;
            transfer.perform().map_err(FetchError::classify)?;
        }

        match easy.response_code() {
            Ok(code) => tracing::debug!(url, status = code, bytes = body.len(), "fetched"),
            Err(e) => tracing::debug!(url, bytes = body.len(), "fetched, no status: {}", e),
        }
        Ok(body)
    }
}
