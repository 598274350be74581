mod card;
mod extractors;
mod urls;

use std::time::Duration;

use anyhow::Result;
use http_cache_reqwest::{CACacheManager, Cache, CacheMode, HttpCache, HttpCacheOptions};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;

use crate::error::ScrapeError;
pub use card::{CardRecord, ColorIndicator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 2;

/// Fetches card-detail pages and hands their markup to the extraction core.
/// Requests carry a timeout, bounded retries for transient transport
/// failures, and an HTTP cache.
pub struct CardFetcher {
    client: ClientWithMiddleware,
}

impl CardFetcher {
    pub fn new() -> Result<Self> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .pool_max_idle_per_host(0)
                .build()?,
        )
        .with(Cache(HttpCache {
            mode: CacheMode::Default,
            manager: CACacheManager::default(),
            options: HttpCacheOptions::default(),
        }))
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(CardFetcher { client })
    }

    /// One record per invocation: fetch the page, then run the pure extractor
    /// over `(url, markup)`. Transport failures propagate unchanged and the
    /// extraction is never attempted.
    pub async fn fetch(&self, url: &str) -> Result<CardRecord, ScrapeError> {
        let markup = self.page(url).await?;
        card::extract_card(url, &markup)
    }

    async fn page(&self, url: &str) -> Result<String, ScrapeError> {
        log::debug!("fetching card page {url}");
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| ScrapeError::Transport {
                    url: url.to_string(),
                    source,
                })?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| ScrapeError::Transport {
                url: url.to_string(),
                source: source.into(),
            })
    }
}
