use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::config;

/// Case-insensitive body phrase some proxies return with a 200 status
/// while actually throttling the request.
pub const RATE_LIMIT_MARKER: &str = "rate limit";

const MAX_RETRIES: u32 = 4;
const STATUS_BACKOFF_MS: u64 = 3000;
const BODY_BACKOFF_MS: u64 = 4000;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limit persisted past the retry budget")]
    RetriesExhausted,
    #[error("upstream returned HTTP {status}")]
    HttpError { status: u16 },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub struct ProxyResponse {
    pub status: u16,
    pub body: String,
}

/// Seam over the text-rendering proxy so the retry loop and the
/// orchestrator can be exercised against scripted responses.
pub trait TextProxy {
    fn get(&self, url: &str) -> Result<ProxyResponse, FetchError>;
}

pub struct HttpProxy {
    client: reqwest::blocking::Client,
}

impl HttpProxy {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl TextProxy for HttpProxy {
    fn get(&self, url: &str) -> Result<ProxyResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", config::ACCEPT)
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(ProxyResponse { status, body })
    }
}

pub fn proxied(url: &str) -> String {
    format!("{}{}", config::PROXY_BASE, url)
}

/// Politeness/backoff sleeps, disabled in tests and with `--no-delay`.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    enabled: bool,
}

impl Throttle {
    pub fn real() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn pause(&self, delay: Duration) {
        if self.enabled {
            thread::sleep(delay);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RateLimitKind {
    StatusCode,
    BodyMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Clean,
    Limited(RateLimitKind),
    Failed(u16),
}

pub(crate) fn classify(response: &ProxyResponse) -> Verdict {
    if response.status == 429 {
        return Verdict::Limited(RateLimitKind::StatusCode);
    }
    if !(200..300).contains(&response.status) {
        return Verdict::Failed(response.status);
    }
    if response.body.to_lowercase().contains(RATE_LIMIT_MARKER) {
        return Verdict::Limited(RateLimitKind::BodyMarker);
    }
    Verdict::Clean
}

pub(crate) fn backoff_delay(kind: RateLimitKind, attempt: u32) -> Duration {
    let base = match kind {
        RateLimitKind::StatusCode => STATUS_BACKOFF_MS,
        RateLimitKind::BodyMarker => BODY_BACKOFF_MS,
    };
    Duration::from_millis(base * attempt as u64)
}

pub struct Fetcher<'a> {
    proxy: &'a dyn TextProxy,
    throttle: Throttle,
}

impl<'a> Fetcher<'a> {
    pub fn new(proxy: &'a dyn TextProxy, throttle: Throttle) -> Self {
        Self { proxy, throttle }
    }

    /// GET through the rendering proxy, retrying rate-limited responses
    /// with a growing delay. At most `MAX_RETRIES` retries; any other
    /// non-success status fails immediately.
    pub fn fetch_rendered_text(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            let response = self.proxy.get(url)?;
            match classify(&response) {
                Verdict::Clean => return Ok(response.body),
                Verdict::Failed(status) => return Err(FetchError::HttpError { status }),
                Verdict::Limited(kind) => {
                    attempt += 1;
                    if attempt > MAX_RETRIES {
                        return Err(FetchError::RetriesExhausted);
                    }
                    let delay = backoff_delay(kind, attempt);
                    warn!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    self.throttle.pause(delay);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    /// Scripted stand-in for the rendering proxy. Responses are queued
    /// per URL; unscripted URLs get a 404 with an empty body.
    pub(crate) struct FakeProxy {
        scripts: RefCell<HashMap<String, VecDeque<ProxyResponse>>>,
        pub(crate) requests: RefCell<Vec<String>>,
    }

    impl FakeProxy {
        pub(crate) fn new() -> Self {
            Self {
                scripts: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn push(&self, url: &str, status: u16, body: &str) {
            self.scripts
                .borrow_mut()
                .entry(url.to_string())
                .or_default()
                .push_back(ProxyResponse {
                    status,
                    body: body.to_string(),
                });
        }

        pub(crate) fn ok(&self, url: &str, body: &str) {
            self.push(url, 200, body);
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl TextProxy for FakeProxy {
        fn get(&self, url: &str) -> Result<ProxyResponse, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            let response = self
                .scripts
                .borrow_mut()
                .get_mut(url)
                .and_then(|queue| queue.pop_front());
            Ok(response.unwrap_or(ProxyResponse {
                status: 404,
                body: String::new(),
            }))
        }
    }
}
