#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod options;
mod page;
mod requester;
mod transport;

pub mod retry;

// -----------------------------------------------------------------------------
// Exports

pub use config::{IDEMPOTENCY_KEY, RETRY_COUNT, RequestConfig};
pub use error::{ApiError, Error, ErrorBody, ErrorKind, Result, TransportError};
pub use options::{ClientOptions, Environment, RequestOptions};
pub use page::{CURSOR_PARAM, Page, PageFetcher, PageIter};
pub use requester::{NoParams, Requester};
pub use transport::{ReqwestTransport, Transport};

pub use tokio_util::sync::CancellationToken;
