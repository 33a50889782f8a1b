#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use bk_http as http;
pub use bk_json as json;
pub use bk_reflect as reflect;
pub use bk_utils as utils;

// -----------------------------------------------------------------------------
// Modules

mod client;

pub mod accounts;

// -----------------------------------------------------------------------------
// Exports

pub use bk_http::{
    ApiError, CancellationToken, ClientOptions, Environment, Error, ErrorKind, Page, PageIter,
    RequestOptions, Result,
};
pub use client::Brook;
