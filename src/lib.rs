//! Client library for the comparisonapis.com financial products API.
//!
//! ```rust,no_run
//! use capis::{Client, PasswordAuthentication};
//!
//! # async fn example() -> Result<(), capis::CapisError> {
//! let client = Client::builder()
//!     .auth_provider(PasswordAuthentication::new("broker", "secret"))
//!     .build()?;
//!
//! if client.healthy().await {
//!     let mortgages = client.products().list_mortgages(None).await?;
//!     println!("{} mortgages", mortgages.data.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod http;
pub mod log;
pub mod models;
pub mod resources;
pub mod sourcing;

pub use crate::auth::{AuthProvider, PasswordAuthentication, StaticToken};
pub use crate::http::{CapisError, Client, ClientBuilder, DumpCurl, RequestMiddleware};
pub use crate::models::{Fee, Money, ProductType};
pub use crate::sourcing::{MortgageProductsRepository, SourcingRun};
