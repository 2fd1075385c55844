//! Credentials for comparisonapis.com requests.
//!
//! Every request the [`Client`](crate::Client) builds passes through exactly
//! one [`AuthProvider`], which attaches an `Authorization: Bearer <token>`
//! header and nothing else.
//!
//! - [`StaticToken`] - a fixed token, never fails
//! - [`PasswordAuthentication`] - exchanges a username and password for a
//!   short-lived token at `/auth` and caches it until it expires

mod password;
mod static_token;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::http::CapisError;

pub use password::{DEFAULT_TOKEN_TTL, PasswordAuthentication};
pub use static_token::StaticToken;

/// Attaches credentials to an outgoing request.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authorize_request(&self, request: &mut Request) -> Result<(), CapisError>;
}

#[async_trait]
impl<T: AuthProvider + ?Sized> AuthProvider for Arc<T> {
    async fn authorize_request(&self, request: &mut Request) -> Result<(), CapisError> {
        (**self).authorize_request(request).await
    }
}

fn attach_bearer(request: &mut Request, token: &str) -> Result<(), CapisError> {
    let value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    request.headers_mut().append(AUTHORIZATION, value);
    Ok(())
}
