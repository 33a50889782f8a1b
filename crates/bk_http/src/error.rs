use core::fmt;
use std::collections::BTreeMap;

use bk_reflect::derive::Reflect;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, header};
use serde_json::Value;
use thiserror::Error;

// -----------------------------------------------------------------------------
// ErrorKind

/// Classification of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    BadRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    Conflict,
    UnprocessableEntity,
    RateLimited,
    InternalServer,
    /// Any other status of 400 or above.
    Api,
}

impl ErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::UnprocessableEntity,
            429 => Self::RateLimited,
            500..=599 => Self::InternalServer,
            _ => Self::Api,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::BadRequest => "bad request",
            Self::Authentication => "authentication failed",
            Self::PermissionDenied => "permission denied",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::UnprocessableEntity => "unprocessable entity",
            Self::RateLimited => "rate limited",
            Self::InternalServer => "internal server error",
            Self::Api => "API error",
        })
    }
}

// -----------------------------------------------------------------------------
// ErrorBody

/// The JSON error document returned by the API.
#[derive(Reflect, Default, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    #[json("type")]
    pub kind: String,
    #[json("title")]
    pub title: String,
    #[json("detail")]
    pub detail: Option<String>,
    #[json("status")]
    pub status: i64,
    #[json("errors")]
    pub errors: Vec<Value>,
    #[json("retry_after")]
    pub retry_after: Option<i64>,
    #[json(",extras")]
    pub extras: BTreeMap<String, Value>,
}

// -----------------------------------------------------------------------------
// ApiError

/// An HTTP response with a status of 400 or above.
#[derive(Debug, Clone, Error)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub method: Method,
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// The parsed error document; `None` for non-JSON or malformed bodies.
    pub body: Option<ErrorBody>,
    /// The response body as text.
    pub raw: String,
}

impl ApiError {
    pub(crate) fn from_response(method: Method, url: String, response: http::Response<Bytes>) -> Self {
        let (parts, bytes) = response.into_parts();
        let is_json = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));

        let body = if is_json {
            bk_json::from_slice::<ErrorBody>(&bytes)
                .inspect_err(|err| log::debug!("undecodable error body from {url}: {err}"))
                .ok()
        } else {
            None
        };

        Self {
            kind: ErrorKind::from_status(parts.status),
            method,
            url,
            status: parts.status,
            headers: parts.headers,
            body,
            raw: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// The server's explanation: the error title and detail, or the raw body.
    pub fn message(&self) -> &str {
        match &self.body {
            Some(body) => body.detail.as_deref().unwrap_or(&body.title),
            None => &self.raw,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {} ({})", self.method, self.url, self.kind, self.status)?;
        match self.message() {
            "" => Ok(()),
            message => write!(f, ": {message}"),
        }
    }
}

// -----------------------------------------------------------------------------
// TransportError

/// Failure to obtain a response at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("attempt timed out")]
    Timeout,
    #[error(transparent)]
    Http(reqwest::Error),
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

// -----------------------------------------------------------------------------
// Error

/// Any error of a request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error(transparent)]
    Api(Box<ApiError>),
    #[error("undecodable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: bk_json::DecodeError,
    },
    #[error("unencodable request parameters: {0}")]
    Encode(#[from] bk_json::EncodeError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

impl Error {
    /// The API error, if the server answered with an error status.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_api().map(|err| err.kind)
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.as_api().map(|err| err.status)
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
