use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Request;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{AuthProvider, attach_bearer};
use crate::http::{CapisError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::log::mask_string;

/// How long an exchanged token is reused before asking `/auth` again.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Exchanges a username and password for a short-lived token.
///
/// The token is cached and reused until its lifetime runs out. The cache is
/// guarded by an async mutex held across the check and the exchange, so
/// concurrent callers hitting an expired cache wait for a single exchange
/// and then all see the same fresh token.
///
/// Without [`with_http_client`](Self::with_http_client) a transport is built
/// on the first exchange. Failing to build one surfaces as
/// [`CapisError::HttpClient`] from [`token`](Self::token).
///
/// # Example
///
/// ```rust,no_run
/// use capis::{Client, PasswordAuthentication};
///
/// # fn example() -> Result<(), capis::CapisError> {
/// let client = Client::builder()
///     .auth_provider(PasswordAuthentication::new("me@example.com", "hunter2"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct PasswordAuthentication {
    username: String,
    password: String,
    base: String,
    http: OnceLock<reqwest::Client>,
    timeout: Duration,
    ttl: Duration,
    cache: Mutex<Option<CachedToken>>,
}

impl PasswordAuthentication {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base: DEFAULT_BASE_URL.to_string(),
            http: OnceLock::new(),
            timeout: DEFAULT_TIMEOUT,
            ttl: DEFAULT_TOKEN_TTL,
            cache: Mutex::new(None),
        }
    }

    /// Exchanges credentials against another deployment's `/auth`.
    pub fn with_base_url(mut self, base: impl AsRef<str>) -> Self {
        self.base = base.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Sends the exchange through `http`, typically the transport the
    /// [`Client`](crate::Client) itself uses.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = OnceLock::from(http);
        self
    }

    /// Upper bound on a single token exchange.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the cached token, exchanging credentials first if it expired.
    pub async fn token(&self) -> Result<String, CapisError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref().filter(|c| c.expires_at > Instant::now()) {
            return Ok(cached.token.clone());
        }

        let token = self.exchange().await?;
        *cache = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + self.ttl,
        });

        Ok(token)
    }

    async fn exchange(&self) -> Result<String, CapisError> {
        debug!(username:% = mask_string(&self.username); "Exchanging credentials for a token");

        let credentials = Credentials {
            username: &self.username,
            password: &self.password,
        };

        let response = self
            .transport()?
            .post(format!("{}/auth", self.base))
            .timeout(self.timeout)
            .json(&credentials)
            .send()
            .await
            .map_err(CapisError::AuthExchange)?;

        if !response.status().is_success() {
            warn!(
                username:% = mask_string(&self.username),
                status = response.status().as_u16();
                "Token exchange rejected"
            );
            return Err(CapisError::AuthorizationFailed);
        }

        let bytes = response.bytes().await.map_err(CapisError::AuthExchange)?;
        let data: TokenResponse = serde_json::from_slice(&bytes).map_err(CapisError::MalformedAuthResponse)?;

        Ok(data.token)
    }

    fn transport(&self) -> Result<&reqwest::Client, CapisError> {
        if let Some(http) = self.http.get() {
            return Ok(http);
        }

        let http = reqwest::Client::builder().build().map_err(CapisError::HttpClient)?;
        Ok(self.http.get_or_init(|| http))
    }
}

impl fmt::Debug for PasswordAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordAuthentication")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("base", &self.base)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[async_trait]
impl AuthProvider for PasswordAuthentication {
    async fn authorize_request(&self, request: &mut Request) -> Result<(), CapisError> {
        let token = self.token().await?;
        attach_bearer(request, &token)
    }
}
