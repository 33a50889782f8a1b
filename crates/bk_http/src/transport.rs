use async_trait::async_trait;
use bytes::Bytes;

use crate::TransportError;

/// Sends one fully-built HTTP request and buffers the response.
///
/// The request engine owns retries, timeouts and cancellation; a transport
/// only performs a single exchange. Tests substitute scripted transports.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: http::Request<Bytes>) -> Result<http::Response<Bytes>, TransportError>;
}

// -----------------------------------------------------------------------------
// ReqwestTransport

/// The default transport, backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: http::Request<Bytes>) -> Result<http::Response<Bytes>, TransportError> {
        let request = reqwest::Request::try_from(request)?;
        let response = self.client.execute(request).await?;

        let mut buffered = http::Response::builder()
            .status(response.status())
            .version(response.version());
        if let Some(headers) = buffered.headers_mut() {
            headers.extend(response.headers().clone());
        }
        let body = response.bytes().await?;
        buffered
            .body(body)
            .map_err(|err| TransportError::Other(Box::new(err)))
    }
}
