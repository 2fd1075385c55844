use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::http::{CapisError, Client, NO_BODY, Query, QueryValue, ToQuery};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListIssuersResponse {
    pub data: Vec<IssuerSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuerFilters {
    pub label: String,
}

impl ToQuery for IssuerFilters {
    fn to_query(&self) -> Vec<(&'static str, QueryValue)> {
        vec![("label", self.label.as_str().into())]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IssuerSummary {
    #[serde(rename = "issuer_id")]
    pub id: String,
    pub label: String,
    pub logo: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Issuer {
    #[serde(rename = "issuer_id")]
    pub id: String,
    pub label: String,
    pub logo: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIssuerRequest {
    #[serde(rename = "issuer_id")]
    pub id: String,
    pub label: String,
}

impl Client {
    /// Lists issuers, `limit` at a time starting from `start`.
    pub async fn list_issuers(
        &self,
        filters: Option<&IssuerFilters>,
        start: i64,
        limit: i64,
    ) -> Result<ListIssuersResponse, CapisError> {
        let mut query = Query::from_filters(filters);
        query.set("start", start);
        query.set("limit", limit);

        self.fetch(Method::GET, "/v1/issuers", &query, NO_BODY).await
    }

    pub async fn find_issuer(&self, id: &str) -> Result<Issuer, CapisError> {
        self.fetch(Method::GET, &format!("/v1/issuers/{id}"), &Query::new(), NO_BODY)
            .await
    }

    pub async fn new_issuer(&self, request: &NewIssuerRequest) -> Result<(), CapisError> {
        self.submit(Method::POST, "/v1/issuers", Some(request)).await
    }
}
