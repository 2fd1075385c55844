//! Error types for comparisonapis.com client operations.
//!
//! This module defines the [`CapisError`] enum which encompasses all possible
//! failure modes when talking to the service, and the status code
//! classification shared by every resource accessor.

use thiserror::Error;

/// Errors that can occur while talking to comparisonapis.com.
///
/// The variants split into three groups so callers can tell "could not
/// reach the service" apart from "reached it and it said no":
///
/// - **Transport**: [`Unreachable`](CapisError::Unreachable),
///   [`AuthExchange`](CapisError::AuthExchange)
/// - **Service responses**: [`Unauthorized`](CapisError::Unauthorized),
///   [`NotFound`](CapisError::NotFound), [`Unknown`](CapisError::Unknown),
///   [`AuthorizationFailed`](CapisError::AuthorizationFailed),
///   [`Decode`](CapisError::Decode),
///   [`MalformedAuthResponse`](CapisError::MalformedAuthResponse)
/// - **Local**: everything raised before a request leaves the process.
///
/// Nothing in this crate retries on any of these.
///
/// # Example
///
/// ```rust,no_run
/// use capis::CapisError;
///
/// fn describe(err: &CapisError) -> &'static str {
///     match err {
///         CapisError::NotFound => "no such resource",
///         CapisError::Unreachable(_) => "service down or network trouble",
///         CapisError::Unknown { .. } => "service rejected the request",
///         _ => "other failure",
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum CapisError {
    /// The `/auth` endpoint rejected the username and password.
    #[error("authorization failed")]
    AuthorizationFailed,

    /// The service answered `401`; the token is missing, expired or invalid.
    #[error("unauthorized access, is the token valid")]
    Unauthorized,

    /// The service answered `404`.
    #[error("not found")]
    NotFound,

    /// Any other status code of `400` or above.
    #[error("unknown status code: {status}")]
    Unknown {
        /// The HTTP status code returned by the service.
        status: u16,
    },

    /// The service could not be reached at all.
    ///
    /// DNS failures, refused connections, timeouts and cancelled requests
    /// all land here. The underlying cause is kept as the error source.
    #[error("unreachable")]
    Unreachable(#[source] reqwest_middleware::Error),

    /// A successful response carried a body that did not match the
    /// expected shape.
    #[error("unable to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The auth provider could not attach credentials to a request.
    #[error("authorization error: {0}")]
    Authorization(#[source] Box<CapisError>),

    /// The token exchange request never got a usable response.
    #[error("unable to get response from auth: {0}")]
    AuthExchange(#[source] reqwest::Error),

    /// The token exchange answered `200` with a body lacking a token.
    #[error("malformed response from auth: {0}")]
    MalformedAuthResponse(#[source] serde_json::Error),

    /// The fallback HTTP transport could not be initialised.
    #[error("unable to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The client was built without an auth provider.
    #[error("no auth provider configured")]
    MissingAuthProvider,

    /// The token contains bytes that cannot go into a header.
    #[error("token is not a valid header value: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// Joining the base URL with a resource path produced an invalid URL.
    #[error("unable to create request: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request payload could not be serialized.
    #[error("unable to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// An update was attempted on a record without an identifier.
    #[error("can only update an existing {0}")]
    MissingIdentifier(&'static str),
}

impl CapisError {
    /// Whether the error happened before a response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, CapisError::Unreachable(_) | CapisError::AuthExchange(_))
    }
}

impl From<reqwest::Error> for CapisError {
    fn from(err: reqwest::Error) -> Self {
        CapisError::Unreachable(reqwest_middleware::Error::Reqwest(err))
    }
}

impl From<reqwest_middleware::Error> for CapisError {
    fn from(err: reqwest_middleware::Error) -> Self {
        CapisError::Unreachable(err)
    }
}

/// Maps an HTTP status code onto the error taxonomy.
///
/// Returns `None` for anything below `400`.
pub fn status_code_to_error(status: u16) -> Option<CapisError> {
    match status {
        0..400 => None,
        401 => Some(CapisError::Unauthorized),
        404 => Some(CapisError::NotFound),
        status => Some(CapisError::Unknown { status }),
    }
}
