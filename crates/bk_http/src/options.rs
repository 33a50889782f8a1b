use core::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Environment

/// A deployment of the API with a well-known base URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => "https://api.brook.com",
            Self::Sandbox => "https://sandbox.brook.com",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" => Some(Self::Production),
            "sandbox" => Some(Self::Sandbox),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// ClientOptions

/// Client-wide settings, shared by every request.
///
/// ```
/// use std::time::Duration;
/// use bk_http::{ClientOptions, Environment};
///
/// let options = ClientOptions::new()
///     .with_api_key("sk_test")
///     .with_environment(Environment::Sandbox)
///     .with_max_retries(5)
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(options.base_url(), "https://sandbox.brook.com");
/// assert_eq!(options.max_retries(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    api_key: Option<String>,
    base_url: Option<String>,
    environment: Environment,
    max_retries: u32,
    timeout: Duration,
    headers: HeaderMap,
    http_client: Option<reqwest::Client>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientOptions {
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            environment: Environment::Production,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            timeout: Self::DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
            http_client: None,
        }
    }

    /// Reads the settings from the process environment.
    ///
    /// | variable              | setting                         |
    /// |-----------------------|---------------------------------|
    /// | `BROOK_API_KEY`       | API key                         |
    /// | `BROOK_BASE_URL`      | base URL, overrides environment |
    /// | `BROOK_ENVIRONMENT`   | `production` or `sandbox`       |
    /// | `BROOK_MAX_RETRIES`   | retries per request             |
    /// | `BROOK_TIMEOUT_SECS`  | per-attempt timeout             |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut options = Self::new();
        if let Some(key) = lookup("BROOK_API_KEY") {
            options.api_key = Some(key);
        }
        if let Some(url) = lookup("BROOK_BASE_URL") {
            options.base_url = Some(url);
        }
        if let Some(name) = lookup("BROOK_ENVIRONMENT") {
            options.environment = Environment::parse(&name)
                .ok_or_else(|| Error::Config(format!("unknown BROOK_ENVIRONMENT {name:?}")))?;
        }
        if let Some(retries) = lookup("BROOK_MAX_RETRIES") {
            options.max_retries = retries
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid BROOK_MAX_RETRIES {retries:?}")))?;
        }
        if let Some(secs) = lookup("BROOK_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid BROOK_TIMEOUT_SECS {secs:?}")))?;
            options.timeout = Duration::from_secs(secs);
        }
        Ok(options)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the base URL of the environment.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the timeout of a single attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Uses a preconfigured `reqwest` client instead of building one.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    #[inline]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(self.environment.base_url())
    }

    #[inline]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[inline]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }
}

// -----------------------------------------------------------------------------
// RequestOptions

/// Per-request overrides of [`ClientOptions`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) headers: HeaderMap,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) base_url: Option<String>,
    pub(crate) max_retries: Option<u32>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) deadline: Option<Duration>,
    pub(crate) idempotency_key: Option<String>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Appends an extra query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the timeout of a single attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bounds the whole call, retries and backoff included.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sends this key on every attempt instead of a fresh one per attempt.
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let options = ClientOptions::from_lookup(lookup(&[])).unwrap();
        assert_eq!(options.api_key(), None);
        assert_eq!(options.base_url(), "https://api.brook.com");
        assert_eq!(options.max_retries(), 2);
        assert_eq!(options.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn environment_variables() {
        let options = ClientOptions::from_lookup(lookup(&[
            ("BROOK_API_KEY", "sk_live"),
            ("BROOK_ENVIRONMENT", "Sandbox"),
            ("BROOK_MAX_RETRIES", "4"),
            ("BROOK_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(options.api_key(), Some("sk_live"));
        assert_eq!(options.environment(), Environment::Sandbox);
        assert_eq!(options.base_url(), "https://sandbox.brook.com");
        assert_eq!(options.max_retries(), 4);
        assert_eq!(options.timeout(), Duration::from_secs(15));

        let options = ClientOptions::from_lookup(lookup(&[
            ("BROOK_ENVIRONMENT", "sandbox"),
            ("BROOK_BASE_URL", "http://localhost:4010"),
        ]))
        .unwrap();
        assert_eq!(options.base_url(), "http://localhost:4010");
    }

    #[test]
    fn invalid_values() {
        let err = ClientOptions::from_lookup(lookup(&[("BROOK_MAX_RETRIES", "many")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid client configuration: invalid BROOK_MAX_RETRIES "many""#
        );
        assert!(ClientOptions::from_lookup(lookup(&[("BROOK_ENVIRONMENT", "staging")])).is_err());
    }
}
