use std::sync::Arc;

use async_trait::async_trait;
use bk_reflect::Reflect;
use bk_reflect::info::Typed;
use bytes::Bytes;
use http::Method;
use serde_json::Value;
use tokio::time::Instant;

use crate::page::CURSOR_PARAM;
use crate::transport::{ReqwestTransport, Transport};
use crate::{
    ApiError, ClientOptions, Error, Page, PageFetcher, PageIter, RequestConfig, RequestOptions,
    Result, TransportError, retry,
};

// -----------------------------------------------------------------------------
// NoParams

/// Parameters of an endpoint that takes none.
#[derive(bk_reflect::derive::Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoParams {}

// -----------------------------------------------------------------------------
// Requester

/// Sends requests with retries, timeouts and cancellation, and decodes the
/// responses.
///
/// Cloning is cheap; clones share the options and the connection pool.
#[derive(Clone)]
pub struct Requester {
    options: Arc<ClientOptions>,
    transport: Arc<dyn Transport>,
}

impl Requester {
    /// Creates a requester over `reqwest`, reusing the client from the
    /// options when one was provided.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let client = match options.http_client() {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .build()
                .map_err(|err| Error::Config(format!("cannot build HTTP client: {err}")))?,
        };
        Ok(Self::with_transport(options, ReqwestTransport::new(client)))
    }

    pub fn with_transport(options: ClientOptions, transport: impl Transport) -> Self {
        Self {
            options: Arc::new(options),
            transport: Arc::new(transport),
        }
    }

    #[inline]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Starts a request configuration for `path`.
    pub fn config(&self, method: Method, path: &str, options: RequestOptions) -> Result<RequestConfig> {
        RequestConfig::new(&self.options, method, path, options)
    }

    /// Sends `config` until it succeeds, fails for good, or runs out of
    /// retries.
    ///
    /// Transport failures, per-attempt timeouts and retryable statuses are
    /// retried after a backoff. The deadline and cancellation apply to every
    /// attempt and every backoff sleep.
    pub async fn execute(&self, config: &RequestConfig) -> Result<http::Response<Bytes>> {
        let deadline = config.deadline.map(|deadline| Instant::now() + deadline);
        let mut attempt = 0;

        loop {
            let (request, key) = config.render(attempt)?;
            log::debug!("{} {} (attempt {})", config.method, config.url, attempt + 1);

            let sent = tokio::select! {
                biased;
                _ = config.cancellation.cancelled() => return Err(Error::Cancelled),
                _ = until(deadline) => return Err(Error::DeadlineExceeded),
                sent = tokio::time::timeout(config.timeout, self.transport.send(request)) => {
                    sent.unwrap_or(Err(TransportError::Timeout))
                }
            };

            let retry_after = match &sent {
                Ok(response) if !retry::is_retryable(response.status()) => None,
                Ok(response) => Some(retry::retry_after(response.headers())),
                Err(_) => Some(None),
            };

            if let Some(hint) = retry_after
                && attempt < config.max_retries
            {
                let (high, low) = key.as_u64_pair();
                let delay = retry::backoff(attempt, hint, high ^ low);
                match &sent {
                    Ok(response) => log::warn!(
                        "{} {} returned {}, retrying in {delay:?}",
                        config.method,
                        config.url,
                        response.status()
                    ),
                    Err(err) => log::warn!(
                        "{} {} failed: {err}, retrying in {delay:?}",
                        config.method,
                        config.url
                    ),
                }

                tokio::select! {
                    biased;
                    _ = config.cancellation.cancelled() => return Err(Error::Cancelled),
                    _ = until(deadline) => return Err(Error::DeadlineExceeded),
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
                continue;
            }

            if retry_after.is_some() && config.max_retries > 0 {
                log::warn!(
                    "{} {} still failing after {} attempts, giving up",
                    config.method,
                    config.url,
                    attempt + 1
                );
            }

            let response = sent.map_err(|source| Error::Transport {
                url: config.full_url(),
                source,
            })?;
            if response.status().as_u16() >= 400 {
                let err = ApiError::from_response(config.method.clone(), config.full_url(), response);
                log::debug!("{err}");
                return Err(err.into());
            }
            return Ok(response);
        }
    }

    /// Executes `config` and decodes the response body.
    ///
    /// An empty body decodes as `null`.
    pub async fn request<R: Reflect + Typed>(&self, config: RequestConfig) -> Result<R> {
        let response = self.execute(&config).await?;
        let body = response.body();
        let decoded = if body.iter().all(u8::is_ascii_whitespace) {
            bk_json::from_value(&Value::Null)
        } else {
            bk_json::from_slice(body)
        };
        decoded.map_err(|source| Error::Decode {
            url: config.full_url(),
            source,
        })
    }

    // -------------------------------------------------------------------------
    // Verbs

    /// `GET` with `params` encoded into the query string.
    pub async fn get<P, R>(&self, path: &str, params: &P, options: RequestOptions) -> Result<R>
    where
        P: Reflect + Typed,
        R: Reflect + Typed,
    {
        let config = self.query_config(Method::GET, path, params, options)?;
        self.request(config).await
    }

    /// `DELETE` with `params` encoded into the query string.
    pub async fn delete<P, R>(&self, path: &str, params: &P, options: RequestOptions) -> Result<R>
    where
        P: Reflect + Typed,
        R: Reflect + Typed,
    {
        let config = self.query_config(Method::DELETE, path, params, options)?;
        self.request(config).await
    }

    /// `POST` with `params` as the JSON body.
    pub async fn post<P, R>(&self, path: &str, params: &P, options: RequestOptions) -> Result<R>
    where
        P: Reflect + Typed,
        R: Reflect + Typed,
    {
        let config = self.json_config(Method::POST, path, params, options)?;
        self.request(config).await
    }

    /// `PATCH` with `params` as the JSON body.
    pub async fn patch<P, R>(&self, path: &str, params: &P, options: RequestOptions) -> Result<R>
    where
        P: Reflect + Typed,
        R: Reflect + Typed,
    {
        let config = self.json_config(Method::PATCH, path, params, options)?;
        self.request(config).await
    }

    /// `PUT` with `params` as the JSON body.
    pub async fn put<P, R>(&self, path: &str, params: &P, options: RequestOptions) -> Result<R>
    where
        P: Reflect + Typed,
        R: Reflect + Typed,
    {
        let config = self.json_config(Method::PUT, path, params, options)?;
        self.request(config).await
    }

    /// Fetches a single page of a list endpoint.
    pub async fn get_list<P, T>(&self, path: &str, params: &P, options: RequestOptions) -> Result<Page<T>>
    where
        P: Reflect + Typed,
        T: Reflect + Typed,
    {
        self.get(path, params, options).await
    }

    /// Iterates over every item of a list endpoint, following cursors.
    ///
    /// No request is sent until the first item is pulled.
    pub fn list_auto_paging<P, T>(&self, path: &str, params: &P, options: RequestOptions) -> Result<PageIter<T>>
    where
        P: Reflect + Typed,
        T: Reflect + Typed,
    {
        let config = self.query_config(Method::GET, path, params, options)?;
        Ok(PageIter::new(CursorFetcher {
            requester: self.clone(),
            config,
        }))
    }

    fn query_config<P: Reflect + Typed>(
        &self,
        method: Method,
        path: &str,
        params: &P,
        options: RequestOptions,
    ) -> Result<RequestConfig> {
        let pairs = bk_json::query::to_pairs(params)?;
        Ok(self.config(method, path, options)?.with_query_pairs(pairs))
    }

    fn json_config<P: Reflect + Typed>(
        &self,
        method: Method,
        path: &str,
        params: &P,
        options: RequestOptions,
    ) -> Result<RequestConfig> {
        let body = bk_json::to_vec(params)?;
        Ok(self.config(method, path, options)?.with_json(body))
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// -----------------------------------------------------------------------------
// CursorFetcher

struct CursorFetcher {
    requester: Requester,
    config: RequestConfig,
}

#[async_trait]
impl<T: Reflect + Typed> PageFetcher<T> for CursorFetcher {
    async fn fetch(&self, cursor: Option<&str>) -> Result<Page<T>> {
        let mut config = self.config.clone();
        if let Some(cursor) = cursor {
            config.set_query(CURSOR_PARAM, cursor);
        }
        self.requester.request(config).await
    }
}
