//! Typed accessors for each resource family.
//!
//! Accessors are inherent methods on [`Client`](crate::Client), except
//! products which hang off [`Client::products`](crate::Client::products).
//! Every accessor sends its error to the client's error sink before
//! returning it.

mod embeds;
mod groups;
mod health;
mod info;
mod issuers;
pub mod products;

pub use embeds::{
    CreateEmbedRequest,
    DetailedEmbed,
    Embed,
    EmbedDetails,
    EmbedFilters,
    EmbedOverrides,
    EmbedProductSelector,
    EmbedTheme,
    EmbedUpdateRequest,
    ListEmbedsResponse,
    Pagination,
};
pub use groups::{
    DetailedGroup,
    FindGroupResponse,
    Group,
    GroupFilters,
    ListGroupsResponse,
    NewGroupRequest,
    SetGroupProductsRequest,
};
pub use info::{BuildConfiguration, BuildConfigurationResponse, FilterOption, LabelledValue};
pub use issuers::{Issuer, IssuerFilters, IssuerSummary, ListIssuersResponse, NewIssuerRequest};
pub use products::ProductsService;
