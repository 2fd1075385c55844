use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::http::{CapisError, Client, NO_BODY, Query, QueryValue, ToQuery};
use crate::models::ProductType;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListGroupsResponse {
    pub data: Vec<Group>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FindGroupResponse {
    pub data: DetailedGroup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilters {
    pub product_type: String,
}

impl ToQuery for GroupFilters {
    fn to_query(&self) -> Vec<(&'static str, QueryValue)> {
        vec![("type", self.product_type.as_str().into())]
    }
}

/// A named collection of products of a single type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Group {
    pub id: String,
    #[serde(rename = "type")]
    pub product_type: String,
}

impl Group {
    pub fn is_type(&self, product_type: ProductType) -> bool {
        self.product_type == product_type.as_str()
    }
}

/// A group together with the identifiers of the products it contains.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DetailedGroup {
    pub id: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(rename = "product_ids")]
    pub products: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGroupRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub product_type: String,
}

/// Replaces the products in a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetGroupProductsRequest {
    #[serde(skip)]
    pub group_id: String,
    #[serde(rename = "product_ids")]
    pub products: Vec<String>,
}

impl Client {
    pub async fn list_groups(&self, filters: Option<&GroupFilters>) -> Result<ListGroupsResponse, CapisError> {
        self.fetch(Method::GET, "/v1/groups", &Query::from_filters(filters), NO_BODY)
            .await
    }

    /// Looks up a group by name, including its product identifiers.
    pub async fn find_group(&self, name: &str) -> Result<FindGroupResponse, CapisError> {
        self.fetch(Method::GET, &format!("/v1/groups/{name}"), &Query::new(), NO_BODY)
            .await
    }

    pub async fn new_group(&self, request: &NewGroupRequest) -> Result<(), CapisError> {
        self.submit(Method::POST, "/v1/groups", Some(request)).await
    }

    pub async fn set_group_products(&self, request: &SetGroupProductsRequest) -> Result<(), CapisError> {
        if request.group_id.is_empty() {
            return Err(self.report(CapisError::MissingIdentifier("group")));
        }

        self.submit(
            Method::POST,
            &format!("/v1/groups/{}/products", request.group_id),
            Some(request),
        )
        .await
    }
}
