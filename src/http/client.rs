use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Response};
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{CapisError, status_code_to_error};
use super::middleware::{RequestMiddleware, RequestMiddlewareChain};
use super::query::Query;
use crate::auth::AuthProvider;

/// The known production URL for the service.
pub const DEFAULT_BASE_URL: &str = "https://comparisonapis.com";

/// Applied to every request unless overridden on the builder.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Placeholder body for requests that send none.
pub(crate) const NO_BODY: Option<&()> = None;

type ErrorSink = Arc<dyn Fn(&CapisError) + Send + Sync>;

/// Client for comparisonapis.com.
///
/// Cloning is cheap: the transport, auth provider and error sink are shared
/// between clones, so a single client can be handed to many tasks.
///
/// # Example
///
/// ```rust,no_run
/// use capis::{Client, StaticToken};
///
/// # async fn example() -> Result<(), capis::CapisError> {
/// let client = Client::builder()
///     .auth_provider(StaticToken::new("my-token"))
///     .build()?;
///
/// let issuers = client.list_issuers(None, 0, 10).await?;
/// for issuer in issuers.data {
///     println!("{}", issuer.label);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    base: String,
    http: ClientWithMiddleware,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    log_error: ErrorSink,
    timeout: Duration,
}

/// Configures a [`Client`]. Obtain one through [`Client::builder`].
pub struct ClientBuilder {
    base: String,
    http: Option<reqwest::Client>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    log_error: ErrorSink,
    middleware: RequestMiddlewareChain,
    timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_URL.to_string(),
            http: None,
            auth_provider: None,
            log_error: Arc::new(|_| {}),
            middleware: RequestMiddlewareChain::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientBuilder {
    /// Points the client at another deployment. Trailing slashes are removed.
    pub fn base_url(mut self, base: impl AsRef<str>) -> Self {
        self.base = base.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Uses a caller-owned transport instead of a fresh default one.
    ///
    /// `reqwest::Client` is reference counted, so the caller keeps control of
    /// pooling and TLS configuration and may share it with other code.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Receives every error an accessor returns, just before it is returned.
    pub fn error_log<F>(mut self, out: F) -> Self
    where
        F: Fn(&CapisError) + Send + Sync + 'static,
    {
        self.log_error = Arc::new(out);
        self
    }

    /// Appends a middleware; middleware run in the order they are added.
    pub fn request_middleware(mut self, middleware: impl RequestMiddleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client, CapisError> {
        let inner = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().build().map_err(CapisError::HttpClient)?,
        };

        let mut builder = reqwest_middleware::ClientBuilder::new(inner);
        if !self.middleware.is_empty() {
            builder = builder.with(self.middleware);
        }

        Ok(Client {
            base: self.base,
            http: builder.build(),
            auth_provider: self.auth_provider,
            log_error: self.log_error,
            timeout: self.timeout,
        })
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds an authorized request for `base + path`.
    ///
    /// The request carries the client timeout and, when `body` is present,
    /// a JSON content type. Fails if the auth provider cannot produce
    /// credentials.
    pub async fn new_request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Request, CapisError> {
        self.build_request(method, path, &Query::new(), body).await
    }

    /// Applies the middleware chain and dispatches the request.
    ///
    /// The response status is not inspected; any transport failure comes
    /// back as [`CapisError::Unreachable`].
    pub async fn execute(&self, request: Request) -> Result<Response, CapisError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let start = Instant::now();

        let response = self.http.execute(request).await?;

        debug!(
            method:% = method,
            path = path.as_str(),
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64;
            "Request completed"
        );
        Ok(response)
    }

    async fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Vec<u8>>,
    ) -> Result<Request, CapisError> {
        let mut url = Url::parse(&format!("{}{}", self.base, path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }

        let mut request = Request::new(method, url);
        *request.timeout_mut() = Some(self.timeout);
        if let Some(body) = body {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(body.into());
        }

        let provider = self.auth_provider.as_ref().ok_or(CapisError::MissingAuthProvider)?;
        provider
            .authorize_request(&mut request)
            .await
            .map_err(|e| CapisError::Authorization(Box::new(e)))?;

        Ok(request)
    }

    /// Builds, dispatches and classifies a request.
    async fn send<B>(&self, method: Method, path: &str, query: &Query, body: Option<&B>) -> Result<Response, CapisError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(|b| serde_json::to_vec(b).map_err(CapisError::Encode))
            .transpose()?;

        let request = self.build_request(method, path, query, body).await?;
        let response = self.execute(request).await?;

        match status_code_to_error(response.status().as_u16()) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    /// Sends a request and decodes the JSON response body into `T`.
    pub(crate) async fn fetch<T, B>(&self, method: Method, path: &str, query: &Query, body: Option<&B>) -> Result<T, CapisError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = async {
            let response = self.send(method, path, query, body).await?;
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(CapisError::Decode)
        }
        .await;

        result.map_err(|e| self.report(e))
    }

    /// Sends a request whose response body is irrelevant.
    pub(crate) async fn submit<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), CapisError>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, &Query::new(), body)
            .await
            .map(|_| ())
            .map_err(|e| self.report(e))
    }

    /// Hands the error to the error sink and gives it back unchanged.
    pub(crate) fn report(&self, err: CapisError) -> CapisError {
        (self.log_error)(&err);
        err
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::header::AUTHORIZATION;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::StaticToken;

    fn client_for(server: &MockServer) -> Client {
        Client::builder()
            .base_url(format!("{}/", server.uri()))
            .auth_provider(StaticToken::new("secret"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slashes_are_trimmed() {
        let client = Client::builder().base_url("https://example.com//").build().unwrap();
        assert_eq!(client.base_url(), "https://example.com");
    }

    #[test]
    fn test_defaults() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_new_request_is_authorized_and_bounded() {
        let client = Client::builder()
            .base_url("https://example.com")
            .auth_provider(StaticToken::new("abc"))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let req = client
            .new_request(Method::POST, "/v1/groups", Some(b"{}".to_vec()))
            .await
            .unwrap();

        assert_eq!(req.url().as_str(), "https://example.com/v1/groups");
        assert_eq!(req.headers().get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(req.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.timeout(), Some(&Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_new_request_without_auth_provider_fails() {
        let client = Client::builder().build().unwrap();
        let err = client.new_request(Method::GET, "/healthz", None).await.unwrap_err();
        assert!(matches!(err, CapisError::MissingAuthProvider));
    }

    #[tokio::test]
    async fn test_middleware_runs_before_dispatch_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/issuers"))
            .and(header("x-stage", "one"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::builder()
            .base_url(server.uri())
            .auth_provider(StaticToken::new("secret"))
            .request_middleware(|mut req: Request| {
                req.headers_mut().append("x-stage", HeaderValue::from_static("one"));
                req
            })
            .request_middleware(|mut req: Request| {
                req.headers_mut().append("x-stage", HeaderValue::from_static("two"));
                req
            })
            .build()
            .unwrap();

        client.list_issuers(None, 0, 10).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let stages: Vec<_> = requests[0]
            .headers
            .get_all("x-stage")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(stages, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_fetch_classifies_status_and_reports_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/issuers/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let client = Client::builder()
            .base_url(server.uri())
            .auth_provider(StaticToken::new("secret"))
            .error_log(move |e| sink.lock().unwrap().push(e.to_string()))
            .build()
            .unwrap();

        let err = client.find_issuer("missing").await.unwrap_err();
        assert!(matches!(err, CapisError::NotFound));
        assert_eq!(*seen.lock().unwrap(), vec!["not found".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_decode_failure_is_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/issuers/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).find_issuer("broken").await.unwrap_err();
        assert!(matches!(err, CapisError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_when_nothing_listens() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = Client::builder()
            .base_url(uri)
            .auth_provider(StaticToken::new("secret"))
            .build()
            .unwrap();

        let err = client.find_issuer("any").await.unwrap_err();
        assert!(matches!(err, CapisError::Unreachable(_)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = Client::builder()
            .base_url(server.uri())
            .auth_provider(StaticToken::new("secret"))
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let err = client.find_issuer("slow").await.unwrap_err();
        assert!(matches!(err, CapisError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_submit_sends_json_body_and_query_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/issuers"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "issuer_id": "acme", "label": "Acme" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/issuers"))
            .and(query_param("start", "20"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .new_issuer(&crate::resources::NewIssuerRequest {
                id: "acme".into(),
                label: "Acme".into(),
            })
            .await
            .unwrap();
        client.list_issuers(None, 20, 5).await.unwrap();
    }
}
