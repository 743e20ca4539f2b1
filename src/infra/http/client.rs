use std::rc::Rc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::usecase::ports::api::{ApiError, Mutation, ResourceApi};
use crate::usecase::ports::token_store::TokenStore;

pub struct HttpApiClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Rc<dyn TokenStore>,
}

impl HttpApiClient {
    pub fn new(config: &ApiConfig, tokens: Rc<dyn TokenStore>) -> Result<Self, ApiError> {
        debug!(base_url = %config.base_url, "creating API client");

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        let http = builder
            .build()
            .map_err(|err| ApiError::Build(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The token is read per call so a login or logout takes effect immediately.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(ACCEPT, "application/json");
        match self.tokens.load() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    fn map_reqwest_error(error: reqwest::Error) -> ApiError {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else if error.is_builder() {
            ApiError::Build(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }

    async fn read(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await.map_err(Self::map_reqwest_error)?;
        trace!(status = status.as_u16(), bytes = text.len(), "response received");

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text).ok().and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn method_of(mutation: Mutation) -> Method {
    match mutation {
        Mutation::Post => Method::POST,
        Mutation::Patch => Method::PATCH,
        Mutation::Delete => Method::DELETE,
    }
}

#[async_trait(?Send)]
impl ResourceApi for HttpApiClient {
    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .authorize(self.http.get(&url).query(params))
            .send()
            .await
            .map_err(Self::map_reqwest_error)?;
        Self::read(response).await
    }

    async fn send(
        &self,
        method: Mutation,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(method = method.as_str(), %url, "mutation");
        let mut builder = self.authorize(self.http.request(method_of(method), &url));
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder.send().await.map_err(Self::map_reqwest_error)?;
        Self::read(response).await
    }
}
