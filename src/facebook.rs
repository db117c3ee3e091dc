use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Flat outbound parameter mapping. Nested structures are JSON-encoded
/// into string values before they land here.
pub type Params = BTreeMap<String, String>;

#[derive(Error, Debug, Clone)]
pub enum FacebookApiError {
    #[error("No access token available")]
    MissingAccessToken,
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Graph API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Value,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest {
    pub method: HttpMethod,
    pub relative_url: String,
}

/// One slot of a batch response. `body` is itself JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchResponse {
    pub code: u16,
    #[serde(default)]
    pub body: String,
}

/// The single seam between tool functions and the Graph API.
#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn request(
        &self,
        endpoint: &str,
        access_token: Option<&str>,
        params: &Params,
        method: HttpMethod,
    ) -> Result<Value, FacebookApiError>;

    /// Response order matches request order.
    async fn batch_request(
        &self,
        requests: &[BatchRequest],
        access_token: Option<&str>,
    ) -> Result<Vec<BatchResponse>, FacebookApiError>;
}

pub struct FacebookAPI {
    client: Client,
    default_access_token: Option<String>,
    base_url: String,
}

impl FacebookAPI {
    pub fn new(config: &Config) -> Result<Self, FacebookApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FacebookApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            default_access_token: config.access_token.clone(),
            base_url: format!("{}/{}", config.base_url, config.api_version),
        })
    }

    fn resolve_token<'a>(&'a self, access_token: Option<&'a str>) -> Result<&'a str, FacebookApiError> {
        access_token
            .filter(|token| !token.trim().is_empty())
            .or(self.default_access_token.as_deref())
            .ok_or(FacebookApiError::MissingAccessToken)
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    // reqwest errors print the request URL, and GET URLs carry the token.
    fn transport_error(err: reqwest::Error) -> FacebookApiError {
        FacebookApiError::RequestFailed(err.without_url().to_string())
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, FacebookApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FacebookApiError::InvalidResponse(e.without_url().to_string()))?;

        if !status.is_success() {
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text.clone()));
            let message = body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            return Err(FacebookApiError::Api {
                status: status.as_u16(),
                message,
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| FacebookApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GraphApi for FacebookAPI {
    async fn request(
        &self,
        endpoint: &str,
        access_token: Option<&str>,
        params: &Params,
        method: HttpMethod,
    ) -> Result<Value, FacebookApiError> {
        let token = self.resolve_token(access_token)?;
        let url = self.url_for(endpoint);

        let mut outbound: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        outbound.push(("access_token", token));

        debug!(method = method.as_str(), endpoint, "graph request");

        let builder = match method {
            HttpMethod::Get => self.client.get(&url).query(&outbound),
            HttpMethod::Post => self.client.post(&url).form(&outbound),
        };

        let response = builder
            .send()
            .await
            .map_err(Self::transport_error)?;

        let result = Self::read_json(response).await;
        if let Err(err) = &result {
            warn!(method = method.as_str(), endpoint, error = %err, "graph request failed");
        }
        result
    }

    async fn batch_request(
        &self,
        requests: &[BatchRequest],
        access_token: Option<&str>,
    ) -> Result<Vec<BatchResponse>, FacebookApiError> {
        let token = self.resolve_token(access_token)?;
        let batch = serde_json::to_string(requests)
            .map_err(|e| FacebookApiError::InvalidResponse(e.to_string()))?;

        debug!(size = requests.len(), "graph batch request");

        let response = self
            .client
            .post(&self.base_url)
            .form(&[("access_token", token), ("batch", batch.as_str())])
            .send()
            .await
            .map_err(Self::transport_error)?;

        let value = Self::read_json(response).await?;
        let slots: Vec<Option<BatchResponse>> = serde_json::from_value(value)
            .map_err(|e| FacebookApiError::InvalidResponse(e.to_string()))?;

        // The vendor returns null for sub-requests it did not run.
        Ok(slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or(BatchResponse {
                    code: 0,
                    body: String::new(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolError;
    use std::time::Duration;

    fn config(token: Option<&str>) -> Config {
        Config {
            access_token: token.map(str::to_string),
            api_version: "v22.0".to_string(),
            base_url: "https://graph.example.test".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn unreachable_api(token: &str) -> FacebookAPI {
        let mut config = config(Some(token));
        // nothing listens on port 1
        config.base_url = "http://127.0.0.1:1".to_string();
        FacebookAPI::new(&config).unwrap()
    }

    #[test]
    fn caller_token_wins_over_default() {
        let api = FacebookAPI::new(&config(Some("default"))).unwrap();
        assert_eq!(api.resolve_token(Some("caller")).unwrap(), "caller");
        assert_eq!(api.resolve_token(None).unwrap(), "default");
        assert_eq!(api.resolve_token(Some("  ")).unwrap(), "default");
    }

    #[test]
    fn missing_token_everywhere_is_an_error() {
        let api = FacebookAPI::new(&config(None)).unwrap();
        assert!(matches!(
            api.resolve_token(None),
            Err(FacebookApiError::MissingAccessToken)
        ));
    }

    #[test]
    fn endpoint_urls_are_versioned() {
        let api = FacebookAPI::new(&config(None)).unwrap();
        assert_eq!(
            api.url_for("act_1/campaigns"),
            "https://graph.example.test/v22.0/act_1/campaigns"
        );
        assert_eq!(api.url_for("/123"), "https://graph.example.test/v22.0/123");
    }

    #[test]
    fn batch_requests_serialize_in_vendor_shape() {
        let requests = vec![BatchRequest {
            method: HttpMethod::Get,
            relative_url: "123/insights?level=campaign".to_string(),
        }];
        let encoded = serde_json::to_value(&requests).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!([{"method": "GET", "relative_url": "123/insights?level=campaign"}])
        );
    }

    #[test]
    fn batch_slots_tolerate_missing_body() {
        let slots: Vec<Option<BatchResponse>> =
            serde_json::from_str(r#"[{"code":200,"body":"{}"},null,{"code":500}]"#).unwrap();
        assert_eq!(slots.len(), 3);
        assert!(slots[1].is_none());
        assert_eq!(slots[2].as_ref().unwrap().body, "");
    }

    #[tokio::test]
    async fn transport_failures_do_not_expose_the_token() {
        let api = unreachable_api("SECRET_TOKEN_123");
        let mut params = Params::new();
        params.insert("fields".to_string(), "id".to_string());

        let err = api
            .request("act_1/campaigns", None, &params, HttpMethod::Get)
            .await
            .unwrap_err();
        assert!(matches!(err, FacebookApiError::RequestFailed(_)));
        let body = ToolError::request("Failed to get campaigns", err, &params).to_json();
        assert_eq!(body["error"], "Failed to get campaigns");
        assert!(!body.to_string().contains("SECRET_TOKEN_123"));
        assert!(!body.to_string().contains("access_token"));
    }

    #[tokio::test]
    async fn batch_transport_failures_do_not_expose_the_token() {
        let api = unreachable_api("SECRET_TOKEN_123");
        let requests = vec![BatchRequest {
            method: HttpMethod::Get,
            relative_url: "123/insights".to_string(),
        }];
        let err = api.batch_request(&requests, None).await.unwrap_err();
        assert!(matches!(err, FacebookApiError::RequestFailed(_)));
        assert!(!err.to_string().contains("SECRET_TOKEN_123"));
    }
}
