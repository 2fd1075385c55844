use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ProductFilters, ProductsService};
use crate::http::{CapisError, NO_BODY, Query};
use crate::models::{Money, Rate, RatePeriod};

/// A personal or commercial loan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Loan {
    pub id: String,
    pub issuer: String,
    pub name: String,
    pub description: String,
    pub url_apply: String,
    pub url_logo: String,
    pub highlighted_points: Vec<String>,
    pub technical_points: Vec<String>,
    #[serde(rename = "type")]
    pub loan_type: String,
    pub offer_interest_rate: RatePeriod,
    pub offer_interest_rate_type: String,
    pub standard_interest_rate: Rate,
    pub standard_interest_rate_type: String,
    pub loan_to_value: Rate,
    pub fee: Money,
    pub minimum_loan: Money,
    pub maximum_loan: Money,
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

pub type NewLoanRequest = Loan;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListLoansResponse {
    pub data: Vec<Loan>,
}

impl ProductsService {
    pub async fn new_loan(&self, request: &NewLoanRequest) -> Result<(), CapisError> {
        self.client.submit(Method::POST, "/v1/loans", Some(request)).await
    }

    pub async fn find_loan(&self, id: &str) -> Result<Loan, CapisError> {
        self.client
            .fetch(Method::GET, &format!("/v1/loans/{id}"), &Query::new(), NO_BODY)
            .await
    }

    pub async fn update_loan(&self, loan: &Loan) -> Result<(), CapisError> {
        if loan.id.is_empty() {
            return Err(self.client.report(CapisError::MissingIdentifier("loan")));
        }

        self.client
            .submit(Method::PUT, &format!("/v1/loans/{}", loan.id), Some(loan))
            .await
    }

    pub async fn list_loans(&self, filters: Option<&ProductFilters>) -> Result<ListLoansResponse, CapisError> {
        self.client
            .fetch(Method::GET, "/v1/loans", &Query::from_filters(filters), NO_BODY)
            .await
    }
}
