use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProductsService;
use crate::http::{CapisError, NO_BODY, Query, QueryValue, ToQuery};
use crate::models::{Fee, Money, Months, Rate, RatePeriod};

/// A mortgage product.
///
/// `created` is assigned by the service and is never sent back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Mortgage {
    pub id: String,
    pub issuer: String,
    pub name: String,
    pub description: String,
    pub url_apply: String,
    pub url_logo: String,
    pub highlighted_points: Vec<String>,
    pub technical_points: Vec<String>,
    #[serde(rename = "type")]
    pub mortgage_type: String,
    pub offer_interest_rate: RatePeriod,
    pub offer_interest_rate_type: String,
    pub standard_interest_rate: Rate,
    pub standard_interest_rate_type: String,
    pub loan_to_value: Rate,
    pub fee: Fee,
    pub minimum_loan: Money,
    pub maximum_loan: Money,
    pub minimum_term: Months,
    pub maximum_term: Months,
    pub early_redemption_charge: Money,
    pub is_consumer: bool,
    pub is_commercial: bool,
    pub broker_only: bool,
    pub active: bool,
    #[serde(rename = "metadata")]
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// New mortgages are sent with the same shape the service returns them in.
pub type NewMortgageRequest = Mortgage;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListMortgagesResponse {
    pub data: Vec<Mortgage>,
}

/// Restricts a mortgage listing to the given product identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MortgageProductFilters {
    pub ids: Vec<String>,
}

impl ToQuery for MortgageProductFilters {
    fn to_query(&self) -> Vec<(&'static str, QueryValue)> {
        vec![("ids", self.ids.clone().into())]
    }
}

impl ProductsService {
    pub async fn new_mortgage(&self, request: &NewMortgageRequest) -> Result<(), CapisError> {
        self.client.submit(Method::POST, "/v1/mortgages", Some(request)).await
    }

    pub async fn find_mortgage(&self, id: &str) -> Result<Mortgage, CapisError> {
        self.client
            .fetch(Method::GET, &format!("/v1/mortgages/{id}"), &Query::new(), NO_BODY)
            .await
    }

    pub async fn update_mortgage(&self, mortgage: &Mortgage) -> Result<(), CapisError> {
        if mortgage.id.is_empty() {
            return Err(self.client.report(CapisError::MissingIdentifier("mortgage")));
        }

        self.client
            .submit(Method::PUT, &format!("/v1/mortgages/{}", mortgage.id), Some(mortgage))
            .await
    }

    pub async fn list_mortgages(
        &self,
        filters: Option<&MortgageProductFilters>,
    ) -> Result<ListMortgagesResponse, CapisError> {
        self.client
            .fetch(Method::GET, "/v1/mortgages", &Query::from_filters(filters), NO_BODY)
            .await
    }
}
