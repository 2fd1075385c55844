use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ProductFilters, ProductsService};
use crate::http::{CapisError, NO_BODY, Query};
use crate::models::{Money, Rate, RatePeriod};

/// A current or savings account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BankAccount {
    pub id: String,
    pub issuer: String,
    pub name: String,
    pub description: String,
    pub url_apply: String,
    pub url_logo: String,
    pub highlighted_points: Vec<String>,
    pub technical_points: Vec<String>,
    pub offer_interest_rate: RatePeriod,
    pub standard_interest_rate: Rate,
    pub interest_paid: String,
    pub offer_overdraft_rate: RatePeriod,
    pub standard_overdraft_rate: Rate,
    pub standard_charge_rate: Rate,
    pub offer_charge_rate: Rate,
    #[serde(rename = "deposit_minimum")]
    pub minimum_deposit: Money,
    #[serde(rename = "deposit_maximum")]
    pub maximum_deposit: Money,
    pub annual_fee: Money,
    pub monthly_fee: Money,
    pub approval_criteria: String,
    pub is_isa: bool,
    pub is_capital_protected: bool,
    pub has_transaction_fees: bool,
    pub has_online_banking: bool,
    pub broker_only: bool,
    pub active: bool,
    #[serde(rename = "metadata")]
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

pub type NewBankAccountRequest = BankAccount;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListBankAccountsResponse {
    pub data: Vec<BankAccount>,
}

impl ProductsService {
    pub async fn new_bank_account(&self, request: &NewBankAccountRequest) -> Result<(), CapisError> {
        self.client.submit(Method::POST, "/v1/bankaccounts", Some(request)).await
    }

    pub async fn find_bank_account(&self, id: &str) -> Result<BankAccount, CapisError> {
        self.client
            .fetch(Method::GET, &format!("/v1/bankaccounts/{id}"), &Query::new(), NO_BODY)
            .await
    }

    pub async fn update_bank_account(&self, account: &BankAccount) -> Result<(), CapisError> {
        if account.id.is_empty() {
            return Err(self.client.report(CapisError::MissingIdentifier("bank account")));
        }

        self.client
            .submit(Method::PUT, &format!("/v1/bankaccounts/{}", account.id), Some(account))
            .await
    }

    pub async fn list_bank_accounts(
        &self,
        filters: Option<&ProductFilters>,
    ) -> Result<ListBankAccountsResponse, CapisError> {
        self.client
            .fetch(Method::GET, "/v1/bankaccounts", &Query::from_filters(filters), NO_BODY)
            .await
    }
}
