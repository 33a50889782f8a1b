use core::time::Duration;

use bytes::Bytes;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{ClientOptions, Error, RequestOptions, Result};

pub const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");
pub const RETRY_COUNT: HeaderName = HeaderName::from_static("x-brook-retry-count");

const LANG: HeaderName = HeaderName::from_static("x-brook-lang");
const PACKAGE_VERSION: HeaderName = HeaderName::from_static("x-brook-package-version");
const OS: HeaderName = HeaderName::from_static("x-brook-os");
const ARCH: HeaderName = HeaderName::from_static("x-brook-arch");

const USER_AGENT: &str = concat!("Brook/Rust ", env!("CARGO_PKG_VERSION"));

/// Everything needed to send one logical request, any number of times.
///
/// Built once per call from [`ClientOptions`] and [`RequestOptions`]; every
/// attempt renders a fresh `http::Request` from it. The body is a shared
/// [`Bytes`] buffer, so cloning the config for a retry or for the next page
/// is cheap.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    /// Base URL and path, without query.
    pub url: reqwest::Url,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub deadline: Option<Duration>,
    pub idempotency_key: Option<String>,
    pub cancellation: CancellationToken,
}

impl RequestConfig {
    pub fn new(client: &ClientOptions, method: Method, path: &str, options: RequestOptions) -> Result<Self> {
        let base_url = options.base_url.as_deref().unwrap_or(client.base_url());
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let url = reqwest::Url::parse(&joined)
            .map_err(|err| Error::InvalidRequest(format!("invalid URL {joined:?}: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(LANG, HeaderValue::from_static("rust"));
        headers.insert(PACKAGE_VERSION, HeaderValue::from_static(env!("CARGO_PKG_VERSION")));
        headers.insert(OS, HeaderValue::from_static(std::env::consts::OS));
        headers.insert(ARCH, HeaderValue::from_static(std::env::consts::ARCH));
        if let Some(key) = client.api_key() {
            let mut value = HeaderValue::try_from(format!("Bearer {key}"))
                .map_err(|_| Error::Config("API key is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        headers.extend(client.headers().clone());
        headers.extend(options.headers);

        Ok(Self {
            method,
            url,
            query: options.query,
            headers,
            body: None,
            timeout: options.timeout.unwrap_or(client.timeout()),
            max_retries: options.max_retries.unwrap_or(client.max_retries()),
            deadline: options.deadline,
            idempotency_key: options.idempotency_key,
            cancellation: options.cancellation.unwrap_or_default(),
        })
    }

    /// Sets a JSON body.
    pub fn with_json(mut self, body: Vec<u8>) -> Self {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(Bytes::from(body));
        self
    }

    /// Prepends encoded query pairs to the configured ones.
    pub fn with_query_pairs(mut self, mut pairs: Vec<(String, String)>) -> Self {
        pairs.append(&mut self.query);
        self.query = pairs;
        self
    }

    /// Replaces every value of `key` with `value`.
    pub fn set_query(&mut self, key: &str, value: impl Into<String>) {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_owned(), value.into()));
    }

    /// The URL with its query string, form-encoded.
    pub fn full_url(&self) -> String {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url.into()
    }

    /// Renders attempt number `attempt` (zero for the first).
    ///
    /// Returns the request and the idempotency key it carries.
    pub(crate) fn render(&self, attempt: u32) -> Result<(http::Request<Bytes>, Uuid)> {
        let key = Uuid::new_v4();

        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(self.full_url());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers.clone());
            let idempotency = match &self.idempotency_key {
                Some(fixed) => HeaderValue::try_from(fixed.as_str())
                    .map_err(|_| Error::InvalidRequest(format!("invalid idempotency key {fixed:?}")))?,
                None => HeaderValue::try_from(key.to_string())
                    .map_err(|err| Error::InvalidRequest(err.to_string()))?,
            };
            headers.insert(IDEMPOTENCY_KEY, idempotency);
            headers.insert(RETRY_COUNT, HeaderValue::from(attempt));
        }

        let request = builder
            .body(self.body.clone().unwrap_or_default())
            .map_err(|err| Error::InvalidRequest(err.to_string()))?;
        Ok((request, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClientOptions {
        ClientOptions::new()
            .with_api_key("sk_test")
            .with_base_url("https://api.test/")
    }

    #[test]
    fn url_and_headers() {
        let options = RequestOptions::new()
            .with_header(HeaderName::from_static("x-extra"), HeaderValue::from_static("1"))
            .with_query("expand", "owner");
        let config = RequestConfig::new(&client(), Method::GET, "/accounts", options).unwrap();

        assert_eq!(config.url.as_str(), "https://api.test/accounts");
        assert_eq!(config.full_url(), "https://api.test/accounts?expand=owner");
        assert_eq!(config.headers[header::AUTHORIZATION], "Bearer sk_test");
        assert!(config.headers[header::AUTHORIZATION].is_sensitive());
        assert_eq!(config.headers["x-extra"], "1");
        assert_eq!(config.headers[LANG], "rust");
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn query_encoding_and_cursor_substitution() {
        let mut config = RequestConfig::new(&client(), Method::GET, "transfers", RequestOptions::new())
            .unwrap()
            .with_query_pairs(vec![
                ("created_at[after]".into(), "2024-01-01T00:00:00Z".into()),
                ("cursor".into(), "old".into()),
            ]);
        config.set_query("cursor", "c 2");
        assert_eq!(
            config.full_url(),
            "https://api.test/transfers?created_at%5Bafter%5D=2024-01-01T00%3A00%3A00Z&cursor=c+2"
        );
    }

    #[test]
    fn invalid_base_url() {
        let client = ClientOptions::new().with_base_url("not a url");
        let err = RequestConfig::new(&client, Method::GET, "accounts", RequestOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn each_render_has_a_fresh_key() {
        let config = RequestConfig::new(&client(), Method::POST, "accounts", RequestOptions::new())
            .unwrap()
            .with_json(b"{}".to_vec());
        let (first, _) = config.render(0).unwrap();
        let (second, _) = config.render(1).unwrap();

        assert_ne!(first.headers()[&IDEMPOTENCY_KEY], second.headers()[&IDEMPOTENCY_KEY]);
        assert_eq!(second.headers()[&RETRY_COUNT], "1");
        assert_eq!(first.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(first.body().as_ref(), b"{}");
    }

    #[test]
    fn fixed_idempotency_key() {
        let options = RequestOptions::new().with_idempotency_key("order-42");
        let config = RequestConfig::new(&client(), Method::POST, "accounts", options).unwrap();
        for attempt in 0..2 {
            let (request, _) = config.render(attempt).unwrap();
            assert_eq!(request.headers()[&IDEMPOTENCY_KEY], "order-42");
        }
    }
}
