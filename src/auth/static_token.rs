use async_trait::async_trait;
use reqwest::Request;

use super::{AuthProvider, attach_bearer};
use crate::http::CapisError;

/// A token issued out of band, used as-is for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AuthProvider for StaticToken {
    async fn authorize_request(&self, request: &mut Request) -> Result<(), CapisError> {
        attach_bearer(request, &self.0)
    }
}
