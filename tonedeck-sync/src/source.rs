//! Remote audio source
//!
//! [`AudioSource`] is the fetch seam between the sync pipeline and the
//! network. [`HttpAudioSource`] is the reqwest-backed implementation; tests
//! plug in an in-memory source instead.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tonedeck_common::SiteProfile;

const USER_AGENT: &str = concat!("tonedeck/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch that reached the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Resource body
    Found(Vec<u8>),
    /// 404 or 403: the resource does not exist at this source
    Missing { status: u16 },
}

/// Fetches remote resources by URL.
///
/// Implementations map 404/403 to [`FetchOutcome::Missing`] and every other
/// failure to an error, which the sync pipeline treats as fatal.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn fetch(&self, url: &str) -> SyncResult<FetchOutcome>;
}

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// HTTP audio source
pub struct HttpAudioSource {
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl HttpAudioSource {
    pub fn new(timeout: Duration, request_interval_ms: u64) -> SyncResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::new(request_interval_ms),
        })
    }

    /// Client configured with a site's timeout and request interval
    pub fn for_site(site: &SiteProfile) -> SyncResult<Self> {
        Self::new(
            Duration::from_secs(site.timeout_secs),
            site.request_interval_ms,
        )
    }
}

#[async_trait]
impl AudioSource for HttpAudioSource {
    async fn fetch(&self, url: &str) -> SyncResult<FetchOutcome> {
        self.rate_limiter.wait().await;

        tracing::debug!(url = %url, "Requesting audio");

        let transport = |e: reqwest::Error| SyncError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.http_client.get(url).send().await.map_err(transport)?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(FetchOutcome::Missing {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(FetchOutcome::Found(body.to_vec()))
    }
}
