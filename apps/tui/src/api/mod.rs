// Client side of the external hazard API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod query;
pub mod requests;

pub use client::ApiClient;
pub use endpoints::{Access, Route};
pub use error::{ApiError, ErrorCode};
pub use query::QueryString;
