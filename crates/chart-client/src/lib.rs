use analysis_core::{AnalysisError, ChartQuery, QuoteProvider, RawQuote};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub mod response;

pub use response::{parse_chart, ChartEnvelope};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; day-trade-screener/0.1)";

/// Pause before re-sending a request the API answered with HTTP 429
const RETRY_BACKOFF: Duration = Duration::from_secs(15);
const MAX_RETRIES: u32 = 3;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    /// Take a slot now, or return how long until the oldest one expires.
    async fn try_reserve(&self) -> Option<Duration> {
        let mut slots = self.timestamps.lock().await;
        let now = Instant::now();

        while slots.front().is_some_and(|&t| now.duration_since(t) >= self.window) {
            slots.pop_front();
        }

        if slots.len() < self.max_requests {
            slots.push_back(now);
            return None;
        }

        let oldest = slots.front().copied().unwrap_or(now);
        Some((oldest + self.window).saturating_duration_since(now) + Duration::from_millis(50))
    }

    async fn acquire(&self) {
        while let Some(wait) = self.try_reserve().await {
            tracing::debug!("Rate limiter: waiting {:.1}s for chart API slot", wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }
}

/// HTTP client for the Yahoo-style `/v8/finance/chart` endpoint
#[derive(Clone)]
pub struct ChartClient {
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
    request_timeout: Duration,
    retry_backoff: Duration,
}

impl ChartClient {
    /// Create a client allowing `requests_per_minute` calls per rolling minute
    pub fn new(base_url: impl Into<String>, requests_per_minute: usize) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            rate_limiter: RateLimiter::new(requests_per_minute, Duration::from_secs(60)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_backoff: RETRY_BACKOFF,
        }
    }

    /// Bound each HTTP attempt, from connect until the body is read.
    /// Time spent waiting on the rate limiter or between 429 retries is not counted.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn transport_error(&self, symbol: &str, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout(format!(
                "{}: no response within {:.1}s",
                symbol,
                self.request_timeout.as_secs_f64()
            ))
        } else {
            AnalysisError::ApiError(format!("{}: {}", symbol, err))
        }
    }

    /// Send a request through the rate limiter, re-sending it up to
    /// `MAX_RETRIES` times while the API answers 429.
    async fn send_request(&self, symbol: &str, builder: RequestBuilder) -> Result<Response, AnalysisError> {
        let request = builder
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let mut retries = 0;
        loop {
            self.rate_limiter.acquire().await;

            let attempt = request
                .try_clone()
                .ok_or_else(|| AnalysisError::ApiError("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(attempt)
                .await
                .map_err(|e| self.transport_error(symbol, e))?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }
            if retries == MAX_RETRIES {
                return Err(AnalysisError::ApiError(format!(
                    "{}: rate limited by chart API after {} retries",
                    symbol, MAX_RETRIES
                )));
            }

            retries += 1;
            tracing::warn!(
                "Chart API 429 for {}, waiting {:.1}s before retry {}/{}",
                symbol,
                self.retry_backoff.as_secs_f64(),
                retries,
                MAX_RETRIES
            );
            tokio::time::sleep(self.retry_backoff).await;
        }
    }

    /// Fetch the chart snapshot for one symbol
    pub async fn get_chart(&self, query: &ChartQuery) -> Result<RawQuote, AnalysisError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, query.symbol);

        let response = self
            .send_request(
                &query.symbol,
                self.client.get(&url).query(&[
                    ("region", query.region.as_str()),
                    ("interval", query.interval.as_str()),
                    ("range", query.range.as_str()),
                    ("includeAdjustedClose", if query.include_adjusted_close { "true" } else { "false" }),
                ]),
            )
            .await?;

        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "{}: HTTP {}: {}",
                query.symbol,
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let envelope: ChartEnvelope = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(&query.symbol, e)
            } else {
                AnalysisError::MissingData(format!("{}: unreadable chart document: {}", query.symbol, e))
            }
        })?;

        parse_chart(&query.symbol, envelope)
    }
}

#[async_trait]
impl QuoteProvider for ChartClient {
    async fn fetch_quote(&self, query: &ChartQuery) -> Result<RawQuote, AnalysisError> {
        self.get_chart(query).await
    }
}
