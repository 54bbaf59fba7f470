use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::api::endpoints::{Access, Route};
use crate::api::error::ApiError;
use crate::api::query::QueryString;
use crate::config::ApiConfig;

/// Thin wrapper over reqwest: base URL + route path + query string, with a
/// bearer token when one is configured. Cheap to clone into spawned tasks.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    authorization: Option<HeaderValue>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        // A token that cannot travel as a header is a configuration error
        let authorization = config
            .token
            .as_ref()
            .map(|token| HeaderValue::from_str(&format!("Bearer {token}")))
            .transpose()
            .map_err(|_| ApiError::InvalidToken)?;

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            authorization,
        })
    }

    pub const fn access(&self) -> Access {
        if self.authorization.is_some() {
            Access::Authenticated
        } else {
            Access::Public
        }
    }

    pub fn url_for(&self, route: Route, query: &QueryString) -> Url {
        let mut url = self.base_url.clone();
        let base_path = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{base_path}{}", route.path(self.access())));
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query.encode()));
        }
        url
    }

    async fn send(&self, route: Route, query: &QueryString) -> Result<reqwest::Response, ApiError> {
        let url = self.url_for(route, query);
        debug!(%url, "GET");

        let mut request = self.client.get(url.clone());
        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION, authorization.clone());
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "request failed");
            return Err(ApiError::Status {
                code: status.as_u16(),
            });
        }

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        route: Route,
        query: &QueryString,
    ) -> Result<T, ApiError> {
        let body = self.send(route, query).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }

    pub async fn get_bytes(&self, route: Route, query: &QueryString) -> Result<Vec<u8>, ApiError> {
        let body = self.send(route, query).await?.bytes().await?;
        Ok(body.to_vec())
    }
}
