use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::http::{CapisError, Client, NO_BODY, Query, QueryValue, ToQuery};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListEmbedsResponse {
    pub data: Vec<Embed>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Pagination {
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// An embeddable comparison table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Embed {
    pub id: String,
    pub introducer: String,
    pub theme: EmbedTheme,
    pub overrides: EmbedOverrides,
    pub filters: Vec<String>,
    pub columns: Vec<String>,
    pub source: EmbedProductSelector,
}

impl Embed {
    /// Starts an update carrying the embed's current filters, columns and theme.
    pub fn update(&self) -> EmbedUpdateRequest {
        EmbedUpdateRequest {
            id: self.id.clone(),
            filters: self.filters.clone(),
            columns: self.columns.clone(),
            theme: self.theme.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetailedEmbed {
    #[serde(flatten)]
    pub embed: Embed,
    pub details: EmbedDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbedDetails {
    pub product_count: i64,
    pub product_type: String,
    pub snippet: String,
    pub endpoint: String,
}

/// Colours applied to an embed. Field names are camel case on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbedTheme {
    pub product_border: String,
    pub product_mask_background: String,
    pub product_empty_background: String,
    pub product_highlight_color: String,
    pub product_featured_icon_color: String,
    pub apply_button_background: String,
    pub apply_button_color: String,
    pub info_button_background: String,
    pub info_button_color: String,
    pub filter_header_background: String,
    pub filter_header_color: String,
    pub filter_chip_chosen_color: String,
    pub filter_chip_chosen_background: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbedOverrides {
    pub button_text: String,
    pub apply_url: String,
    #[serde(rename = "metadata")]
    pub meta: Map<String, Value>,
}

/// Where an embed takes its products from: a group or an explicit list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbedProductSelector {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedFilters {
    pub ids: Vec<String>,
    pub metadata: Vec<String>,
}

impl ToQuery for EmbedFilters {
    fn to_query(&self) -> Vec<(&'static str, QueryValue)> {
        vec![
            ("embed_ids", self.ids.clone().into()),
            ("metadata", self.metadata.clone().into()),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateEmbedRequest {
    pub id: String,
    pub theme: EmbedTheme,
    pub overrides: EmbedOverrides,
    pub filters: Vec<String>,
    pub columns: Vec<String>,
    #[serde(rename = "group_id")]
    pub group: String,
}

impl CreateEmbedRequest {
    /// A create request whose products come from `group`.
    pub fn for_group(
        id: impl Into<String>,
        theme: EmbedTheme,
        overrides: EmbedOverrides,
        filters: Vec<String>,
        columns: Vec<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            theme,
            overrides,
            filters,
            columns,
            group: group.into(),
        }
    }
}

/// Changes to an existing embed. Build one with [`Embed::update`].
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct EmbedUpdateRequest {
    #[serde(skip)]
    id: String,
    pub filters: Vec<String>,
    pub columns: Vec<String>,
    pub theme: EmbedTheme,
}

impl EmbedUpdateRequest {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    pub fn set_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    pub fn set_theme(mut self, theme: EmbedTheme) -> Self {
        self.theme = theme;
        self
    }
}

impl Client {
    pub async fn list_embeds(
        &self,
        offset: i64,
        limit: i64,
        filters: Option<&EmbedFilters>,
    ) -> Result<ListEmbedsResponse, CapisError> {
        let mut query = Query::from_filters(filters);
        query.set("offset", offset);
        query.set("limit", limit);

        self.fetch(Method::GET, "/v1/embeds", &query, NO_BODY).await
    }

    pub async fn find_embed(&self, id: &str) -> Result<Embed, CapisError> {
        self.fetch(Method::GET, &format!("/v1/embeds/{id}"), &Query::new(), NO_BODY)
            .await
    }

    /// Like [`find_embed`](Self::find_embed) plus product count, type and
    /// the snippet to paste into a page.
    pub async fn find_embed_detailed(&self, id: &str) -> Result<DetailedEmbed, CapisError> {
        self.fetch(
            Method::GET,
            &format!("/v1/embeds/{id}/detailed"),
            &Query::new(),
            NO_BODY,
        )
        .await
    }

    pub async fn create_embed(&self, request: &CreateEmbedRequest) -> Result<(), CapisError> {
        self.submit(Method::POST, "/v1/embeds", Some(request)).await
    }

    pub async fn update_embed(&self, request: &EmbedUpdateRequest) -> Result<(), CapisError> {
        if request.id.is_empty() {
            return Err(self.report(CapisError::MissingIdentifier("embed")));
        }

        self.submit(Method::PUT, &format!("/v1/embeds/{}", request.id), Some(request))
            .await
    }

    pub async fn update_embed_apply_url(&self, embed: &Embed, new_apply_url: &str) -> Result<(), CapisError> {
        if embed.id.is_empty() {
            return Err(self.report(CapisError::MissingIdentifier("embed")));
        }

        let body = json!({ "new_apply_url": new_apply_url });
        self.submit(
            Method::POST,
            &format!("/v1/embeds/{}/update_apply_url", embed.id),
            Some(&body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::StaticToken;

    fn client(server: &MockServer) -> Client {
        Client::builder()
            .base_url(server.uri())
            .auth_provider(StaticToken::new("secret"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_embeds_repeats_list_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/embeds"))
            .and(query_param("offset", "10"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "e1" }, { "id": "e2" }],
                "pagination": { "total": 12, "offset": 10, "limit": 5 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let filters = EmbedFilters {
            ids: vec!["e1".into(), "e2".into()],
            metadata: vec![],
        };
        let resp = client(&server).list_embeds(10, 5, Some(&filters)).await.unwrap();

        assert_eq!(resp.data.len(), 2);
        assert_eq!(
            resp.pagination,
            Pagination {
                total: 12,
                offset: 10,
                limit: 5
            }
        );

        let requests = server.received_requests().await.unwrap();
        let ids: Vec<_> = requests[0]
            .url
            .query_pairs()
            .filter(|(k, _)| k == "embed_ids")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_find_embed_detailed_flattens_embed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/embeds/e1/detailed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "e1",
                "introducer": "acme",
                "theme": { "productBorder": "#fff" },
                "source": { "group_id": "featured" },
                "details": { "product_count": 3, "product_type": "mortgage", "snippet": "<div/>", "endpoint": "/e1" }
            })))
            .mount(&server)
            .await;

        let detailed = client(&server).find_embed_detailed("e1").await.unwrap();
        assert_eq!(detailed.embed.id, "e1");
        assert_eq!(detailed.embed.theme.product_border, "#fff");
        assert_eq!(detailed.embed.source.group_id, "featured");
        assert_eq!(detailed.details.product_count, 3);
    }

    #[tokio::test]
    async fn test_update_embed_sends_changes_to_embed_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/embeds/e1"))
            .and(body_json(json!({
                "filters": ["rate"],
                "columns": ["fee", "rate"],
                "theme": EmbedTheme::default()
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let embed = Embed {
            id: "e1".into(),
            filters: vec!["old".into()],
            columns: vec!["fee".into()],
            ..Default::default()
        };
        let update = embed
            .update()
            .set_filters(vec!["rate".into()])
            .set_columns(vec!["fee".into(), "rate".into()]);

        assert_eq!(update.id(), "e1");
        client(&server).update_embed(&update).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_embed_without_id_never_dispatches() {
        let server = MockServer::start().await;

        let err = client(&server)
            .update_embed(&Embed::default().update())
            .await
            .unwrap_err();

        assert!(matches!(err, CapisError::MissingIdentifier("embed")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_embed_apply_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeds/e1/update_apply_url"))
            .and(body_json(json!({ "new_apply_url": "https://apply.example.com" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let embed = Embed {
            id: "e1".into(),
            ..Default::default()
        };
        client(&server)
            .update_embed_apply_url(&embed, "https://apply.example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_embed_for_group_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeds"))
            .and(body_json(json!({
                "id": "e9",
                "theme": EmbedTheme::default(),
                "overrides": { "button_text": "Apply", "apply_url": "", "metadata": {} },
                "filters": [],
                "columns": ["rate"],
                "group_id": "featured"
            })))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let overrides = EmbedOverrides {
            button_text: "Apply".into(),
            ..Default::default()
        };
        let request = CreateEmbedRequest::for_group(
            "e9",
            EmbedTheme::default(),
            overrides,
            vec![],
            vec!["rate".into()],
            "featured",
        );

        let err = client(&server).create_embed(&request).await.unwrap_err();
        assert!(matches!(err, CapisError::Unknown { status: 500 }));
    }
}
