use log::warn;
use reqwest::{Method, StatusCode};

use crate::http::Client;

impl Client {
    /// Reports whether the service answers its health check with 200.
    ///
    /// Never fails: transport errors and any other status mean unhealthy.
    /// Errors still reach the error sink.
    pub async fn healthy(&self) -> bool {
        let request = match self.new_request(Method::GET, "/healthz", None).await {
            Ok(request) => request,
            Err(e) => {
                self.report(e);
                return false;
            },
        };

        match self.execute(request).await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                warn!(error:% = e; "Health check failed");
                self.report(e);
                false
            },
        }
    }
}
