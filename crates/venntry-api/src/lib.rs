// venntry-api: Async Rust client for the Venntry inventory REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod files;
pub mod inventories;
pub mod models;
pub mod paths;
pub mod products;
pub mod transport;
pub mod warehouses;

pub use client::{ApiClient, RawResponse};
pub use error::Error;
pub use files::{ALLOWED_IMAGE_TYPES, ImageFile, MAX_IMAGE_BYTES};
pub use models::*;
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};
