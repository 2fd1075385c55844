//! HTTP plumbing for talking to comparisonapis.com.
//!
//! Every resource accessor funnels through the same pipeline:
//!
//! 1. [`Client::new_request`] joins the base URL with the resource path,
//!    bounds the request with the client timeout and asks the configured
//!    [`AuthProvider`](crate::auth::AuthProvider) to attach credentials.
//! 2. [`Client::execute`] runs the [`RequestMiddlewareChain`] and dispatches
//!    the request over the shared `reqwest` transport.
//! 3. The status code is classified by [`status_code_to_error`].
//! 4. The JSON body is decoded into the declared result type.
//!
//! Any error produced along the way is handed to the client's error sink
//! before it is returned.
//!
//! # Error Handling
//!
//! Transport failures always surface as [`CapisError::Unreachable`];
//! responses the service rejected surface as
//! [`Unauthorized`](CapisError::Unauthorized),
//! [`NotFound`](CapisError::NotFound) or [`Unknown`](CapisError::Unknown).

mod client;
mod error;
mod middleware;
mod query;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub(crate) use client::NO_BODY;
pub use error::{CapisError, status_code_to_error};
pub use middleware::{DumpCurl, RequestMiddleware, RequestMiddlewareChain};
pub(crate) use query::Query;
pub use query::{QueryValue, ToQuery};
