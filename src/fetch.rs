use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::info;
use url::Url;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("wikichart/", env!("CARGO_PKG_VERSION"));
const WIKIPEDIA_DOMAIN: &str = "wikipedia.org";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL provided")]
    EmptyUrl,

    #[error("URL must be a Wikipedia page")]
    NotWikipedia,

    #[error("could not connect to Wikipedia, check your internet connection")]
    Unreachable(#[source] reqwest::Error),

    #[error("request timed out after {}s", FETCH_TIMEOUT.as_secs())]
    TimedOut(#[source] reqwest::Error),

    #[error("failed to fetch page: HTTP {0}")]
    Status(u16),

    #[error("failed to fetch page")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimedOut(err)
        } else if err.is_connect() {
            Self::Unreachable(err)
        } else {
            Self::Transport(err)
        }
    }
}

pub fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::EmptyUrl);
    }

    let url = Url::parse(trimmed).map_err(|_| FetchError::NotWikipedia)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::NotWikipedia);
    }

    let is_wikipedia = url.host_str().is_some_and(|host| {
        host == WIKIPEDIA_DOMAIN
            || host
                .strip_suffix(WIKIPEDIA_DOMAIN)
                .is_some_and(|prefix| prefix.ends_with('.'))
    });
    if !is_wikipedia {
        return Err(FetchError::NotWikipedia);
    }

    Ok(url)
}

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build http client")?;

        Ok(Self { client })
    }

    pub fn fetch(&self, raw_url: &str) -> Result<String, FetchError> {
        let url = validate_url(raw_url)?;

        info!(url = %url, "fetching page");
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        info!(url = %url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}
