use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::http::{CapisError, Client, NO_BODY, Query};
use crate::models::ProductType;

/// Options available when building embeds, per product type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildConfigurationResponse {
    pub data: Vec<BuildConfiguration>,
}

impl BuildConfigurationResponse {
    pub fn for_type(&self, product_type: ProductType) -> Option<&BuildConfiguration> {
        self.data.iter().find(|c| c.product_type == product_type.as_str())
    }
}

/// Build options for one product type.
///
/// The type is kept as sent, since the service may list types this crate
/// has no [`ProductType`] for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildConfiguration {
    #[serde(rename = "type")]
    pub product_type: String,
    pub columns: Vec<LabelledValue>,
    pub filters: Vec<FilterOption>,
    pub available_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelledValue {
    pub value: String,
    pub label: String,
}

/// A filter an embed can offer; `multi` filters accept several choices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub multi: bool,
    pub choices: Vec<LabelledValue>,
}

impl Client {
    pub async fn get_build_configuration(&self) -> Result<BuildConfigurationResponse, CapisError> {
        self.fetch(Method::GET, "/v1/info/build-configurations", &Query::new(), NO_BODY)
            .await
    }
}
