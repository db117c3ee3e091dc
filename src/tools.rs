use crate::facebook::{FacebookApiError, GraphApi, Params};
use crate::models::Validate;
use crate::{accounts, ads, adsets, campaigns, insights, orchestrator};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Resolution(String),
    #[error("{summary}")]
    Request {
        summary: String,
        source: FacebookApiError,
        params_sent: Params,
    },
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    pub fn request(summary: impl Into<String>, source: FacebookApiError, params: &Params) -> Self {
        ToolError::Request {
            summary: summary.into(),
            source,
            params_sent: params.clone(),
        }
    }

    /// One-line description used when a failure is recorded rather than returned.
    pub fn describe(&self) -> String {
        match self {
            ToolError::Request {
                summary, source, ..
            } => format!("{}: {}", summary, source),
            other => other.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ToolError::Request {
                summary,
                source,
                params_sent,
            } => {
                let mut body = json!({
                    "error": summary,
                    "details": source.to_string(),
                    "params_sent": params_sent,
                });
                if let FacebookApiError::Api { body: vendor, .. } = source {
                    body["vendor_error"] = vendor.clone();
                }
                body
            }
            other => json!({ "error": other.to_string() }),
        }
    }
}

/// Returns the trimmed value, or a validation error when it is absent or blank.
pub fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ToolError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ToolError::validation(message))
}

pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// JSON-encodes a value for params the vendor expects as raw JSON text.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Validates a structured spec, then JSON-encodes it.
pub fn encode_validated<T: Validate + Serialize>(value: &T) -> Result<String, ToolError> {
    value.validate().map_err(ToolError::Validation)?;
    Ok(encode_json(value))
}

pub fn normalize_account_id(account_id: &str) -> String {
    if account_id.starts_with("act_") {
        account_id.to_string()
    } else {
        format!("act_{}", account_id)
    }
}

pub fn bool_param(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Treats `null` and blank strings as absent for optional enum arguments.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    match raw {
        Value::Null => Ok(None),
        Value::String(ref s) if s.trim().is_empty() => Ok(None),
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

pub fn default_limit() -> u32 {
    10
}

async fn invoke<A, F, Fut>(raw: Value, tool: F) -> Value
where
    A: DeserializeOwned,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<Value, ToolError>>,
{
    let raw = match raw {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    let args: A = match serde_json::from_value(raw) {
        Ok(args) => args,
        Err(e) => return ToolError::InvalidArguments(e.to_string()).to_json(),
    };
    match tool(args).await {
        Ok(value) => value,
        Err(err) => err.to_json(),
    }
}

#[cfg(test)]
pub const TOOL_NAMES: &[&str] = &[
    "get_ad_accounts",
    "get_account_info",
    "get_account_pixels",
    "get_campaigns",
    "get_campaign_details",
    "create_campaign",
    "update_campaign",
    "get_adsets",
    "get_adset_details",
    "create_adset",
    "update_adset",
    "get_ads",
    "get_ad_details",
    "create_ad",
    "update_ad",
    "get_ad_creatives",
    "create_ad_creative",
    "update_ad_creative",
    "get_insights",
    "get_insights_summary",
    "get_complete_campaign_details_deep",
    "get_campaign_data_with_insights",
];

#[derive(Clone)]
pub struct MetaAdsTools {
    api: Arc<dyn GraphApi>,
}

impl MetaAdsTools {
    pub fn new(api: Arc<dyn GraphApi>) -> Self {
        Self { api }
    }

    /// Runs a tool and returns its JSON text, or `None` for an unknown tool.
    pub async fn call(&self, name: &str, args: Value) -> Option<String> {
        let api = self.api.as_ref();
        debug!(tool = name, "tool call");
        let value = match name {
            "get_ad_accounts" => invoke(args, |a| accounts::get_ad_accounts(api, a)).await,
            "get_account_info" => invoke(args, |a| accounts::get_account_info(api, a)).await,
            "get_account_pixels" => invoke(args, |a| accounts::get_account_pixels(api, a)).await,
            "get_campaigns" => invoke(args, |a| campaigns::get_campaigns(api, a)).await,
            "get_campaign_details" => {
                invoke(args, |a| campaigns::get_campaign_details(api, a)).await
            }
            "create_campaign" => invoke(args, |a| campaigns::create_campaign(api, a)).await,
            "update_campaign" => invoke(args, |a| campaigns::update_campaign(api, a)).await,
            "get_adsets" => invoke(args, |a| adsets::get_adsets(api, a)).await,
            "get_adset_details" => invoke(args, |a| adsets::get_adset_details(api, a)).await,
            "create_adset" => invoke(args, |a| adsets::create_adset(api, a)).await,
            "update_adset" => invoke(args, |a| adsets::update_adset(api, a)).await,
            "get_ads" => invoke(args, |a| ads::get_ads(api, a)).await,
            "get_ad_details" => invoke(args, |a| ads::get_ad_details(api, a)).await,
            "create_ad" => invoke(args, |a| ads::create_ad(api, a)).await,
            "update_ad" => invoke(args, |a| ads::update_ad(api, a)).await,
            "get_ad_creatives" => invoke(args, |a| ads::get_ad_creatives(api, a)).await,
            "create_ad_creative" => invoke(args, |a| ads::create_ad_creative(api, a)).await,
            "update_ad_creative" => invoke(args, |a| ads::update_ad_creative(api, a)).await,
            "get_insights" => invoke(args, |a| insights::get_insights(api, a)).await,
            "get_insights_summary" => {
                invoke(args, |a| insights::get_insights_summary(api, a)).await
            }
            "get_complete_campaign_details_deep" => {
                invoke(args, |a| {
                    orchestrator::get_complete_campaign_details_deep(api, a)
                })
                .await
            }
            "get_campaign_data_with_insights" => {
                invoke(args, |a| orchestrator::get_campaign_data_with_insights(api, a)).await
            }
            _ => return None,
        };
        Some(value.to_string())
    }
}
