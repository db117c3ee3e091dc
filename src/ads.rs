use crate::campaigns::fetch_name;
use crate::constants::{DEFAULT_CREATIVE_LINK, FB_AD_FIELDS, FB_CREATIVE_FIELDS};
use crate::facebook::{GraphApi, HttpMethod, Params};
use crate::models::{Amount, CallToActionType, CreativeStatus, ObjectStatus};
use crate::tools::{default_limit, encode_json, non_blank, required, ToolError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct GetAdsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub adset_id: Option<String>,
}

pub async fn get_ads(api: &dyn GraphApi, args: GetAdsArgs) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "No account ID specified")?;
    // Narrowest edge wins: ad set, then campaign, then account.
    let parent = non_blank(&args.adset_id)
        .or_else(|| non_blank(&args.campaign_id))
        .unwrap_or(account_id);
    let endpoint = format!("{}/ads", parent);

    let mut params = Params::new();
    params.insert("fields".to_string(), FB_AD_FIELDS.to_string());
    params.insert("limit".to_string(), args.limit.to_string());

    api.request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request("Failed to get ads", e, &params))
}

#[derive(Debug, Deserialize)]
pub struct GetAdDetailsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub ad_id: Option<String>,
}

pub async fn get_ad_details(api: &dyn GraphApi, args: GetAdDetailsArgs) -> Result<Value, ToolError> {
    let ad_id = required(&args.ad_id, "No ad ID provided")?;
    let mut params = Params::new();
    params.insert("fields".to_string(), FB_AD_FIELDS.to_string());
    api.request(ad_id, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request(format!("Failed to get ad {}", ad_id), e, &params))
}

#[derive(Debug, Deserialize)]
pub struct CreateAdArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub adset_id: Option<String>,
    #[serde(default)]
    pub creative_id: Option<String>,
    #[serde(default)]
    pub status: Option<ObjectStatus>,
    #[serde(default)]
    pub bid_amount: Option<Amount>,
}

pub async fn create_ad(api: &dyn GraphApi, args: CreateAdArgs) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "No account ID provided")?;
    let name = required(&args.name, "No ad name provided")?;
    let adset_id = required(&args.adset_id, "No ad set ID provided")?;
    let creative_id = required(&args.creative_id, "No creative ID provided")?;

    let mut params = Params::new();
    params.insert("name".to_string(), name.to_string());
    params.insert("adset_id".to_string(), adset_id.to_string());
    params.insert("creative".to_string(), encode_json(&json!({ "creative_id": creative_id })));
    params.insert(
        "status".to_string(),
        args.status.unwrap_or(ObjectStatus::Paused).as_str().to_string(),
    );
    if let Some(amount) = &args.bid_amount {
        params.insert("bid_amount".to_string(), amount.to_param());
    }

    let endpoint = format!("{}/ads", account_id);
    let mut data = api
        .request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request("Failed to create ad", e, &params))?;

    crate::campaigns::backfill_name(&mut data, name);
    Ok(data)
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub ad_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<ObjectStatus>,
    #[serde(default)]
    pub bid_amount: Option<Amount>,
}

pub async fn update_ad(api: &dyn GraphApi, args: UpdateAdArgs) -> Result<Value, ToolError> {
    let ad_id = required(&args.ad_id, "No ad ID provided")?;

    let mut params = Params::new();
    if let Some(name) = non_blank(&args.name) {
        params.insert("name".to_string(), name.to_string());
    }
    if let Some(status) = args.status {
        params.insert("status".to_string(), status.as_str().to_string());
    }
    if let Some(amount) = &args.bid_amount {
        params.insert("bid_amount".to_string(), amount.to_param());
    }
    if params.is_empty() {
        return Err(ToolError::validation("No update parameters provided"));
    }

    let token = args.access_token.as_deref();
    let summary = format!("Failed to update ad {}", ad_id);
    let mut data = api
        .request(ad_id, token, &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request(summary.clone(), e, &params))?;
    let name = fetch_name(api, token, ad_id)
        .await
        .map_err(|e| ToolError::request(summary, e, &params))?;

    if let Some(obj) = data.as_object_mut() {
        obj.insert("ad_id".to_string(), Value::String(ad_id.to_string()));
        if let Some(name) = name {
            obj.insert("name".to_string(), name);
        }
    }
    Ok(data)
}

#[derive(Debug, Deserialize)]
pub struct GetAdCreativesArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub ad_id: Option<String>,
}

pub async fn get_ad_creatives(api: &dyn GraphApi, args: GetAdCreativesArgs) -> Result<Value, ToolError> {
    let ad_id = required(&args.ad_id, "No ad ID provided")?;
    let endpoint = format!("{}/adcreatives", ad_id);
    let mut params = Params::new();
    params.insert("fields".to_string(), FB_CREATIVE_FIELDS.to_string());
    api.request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request(format!("Failed to get creatives for ad {}", ad_id), e, &params))
}

#[derive(Debug, Clone, Serialize)]
struct CallToAction {
    #[serde(rename = "type")]
    kind: CallToActionType,
}

#[derive(Debug, Clone, Serialize)]
struct LinkData {
    image_hash: String,
    link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// Headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    call_to_action: Option<CallToAction>,
}

#[derive(Debug, Clone, Serialize)]
struct ObjectStorySpec {
    page_id: String,
    link_data: LinkData,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdCreativeArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_hash: Option<String>,
    #[serde(default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub call_to_action_type: Option<CallToActionType>,
}

pub async fn create_ad_creative(api: &dyn GraphApi, args: CreateAdCreativeArgs) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "No account ID provided")?;
    let image_hash = required(&args.image_hash, "No image hash provided")?;
    let page_id = required(&args.page_id, "No page ID provided")?;
    let name = non_blank(&args.name).unwrap_or("Untitled creative");

    let spec = ObjectStorySpec {
        page_id: page_id.to_string(),
        link_data: LinkData {
            image_hash: image_hash.to_string(),
            link: non_blank(&args.link_url).unwrap_or(DEFAULT_CREATIVE_LINK).to_string(),
            message: non_blank(&args.message).map(str::to_string),
            name: non_blank(&args.headline).map(str::to_string),
            description: non_blank(&args.description).map(str::to_string),
            call_to_action: args.call_to_action_type.map(|kind| CallToAction { kind }),
        },
    };

    let mut params = Params::new();
    params.insert("name".to_string(), name.to_string());
    params.insert("object_story_spec".to_string(), encode_json(&spec));

    let token = args.access_token.as_deref();
    let endpoint = format!("{}/adcreatives", account_id);
    let created = api
        .request(&endpoint, token, &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request("Failed to create ad creative", e, &params))?;

    let creative_id = created
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::validation("Failed to create ad creative: response did not include an id"))?;

    let mut detail_params = Params::new();
    detail_params.insert("fields".to_string(), FB_CREATIVE_FIELDS.to_string());
    let details = api
        .request(&creative_id, token, &detail_params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request("Failed to create ad creative", e, &params))?;

    Ok(json!({
        "success": true,
        "creative_id": creative_id,
        "details": details,
    }))
}

/// Creative content is immutable once created; these are the only
/// fields the update path may send.
const MUTABLE_CREATIVE_FIELDS: &[&str] = &["name", "status", "account_id"];

#[derive(Debug, Deserialize)]
pub struct UpdateAdCreativeArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub creative_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<CreativeStatus>,
    #[serde(default)]
    pub account_id: Option<String>,
    /// Anything else the caller sent; never forwarded.
    #[serde(flatten)]
    pub ignored: Map<String, Value>,
}

pub async fn update_ad_creative(api: &dyn GraphApi, args: UpdateAdCreativeArgs) -> Result<Value, ToolError> {
    let creative_id = required(&args.creative_id, "No creative ID provided")?;

    let ignored: Vec<String> = args.ignored.keys().cloned().collect();
    if !ignored.is_empty() {
        warn!(creative_id, fields = ?ignored, "ignoring immutable creative fields on update");
    }

    let mut params = Params::new();
    if let Some(name) = non_blank(&args.name) {
        params.insert("name".to_string(), name.to_string());
    }
    if let Some(status) = args.status {
        params.insert("status".to_string(), status.as_str().to_string());
    }
    if let Some(account_id) = non_blank(&args.account_id) {
        params.insert("account_id".to_string(), account_id.to_string());
    }
    debug_assert!(params.keys().all(|k| MUTABLE_CREATIVE_FIELDS.contains(&k.as_str())));
    if params.is_empty() {
        return Err(ToolError::validation(
            "No update parameters provided. Only name, status and account_id can be changed on a creative",
        ));
    }

    let token = args.access_token.as_deref();
    let summary = format!("Failed to update ad creative {}", creative_id);
    let mut data = api
        .request(creative_id, token, &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request(summary.clone(), e, &params))?;
    let name = fetch_name(api, token, creative_id)
        .await
        .map_err(|e| ToolError::request(summary, e, &params))?;

    if let Some(obj) = data.as_object_mut() {
        obj.insert("creative_id".to_string(), Value::String(creative_id.to_string()));
        if let Some(name) = name {
            obj.insert("name".to_string(), name);
        }
        if !ignored.is_empty() {
            obj.insert("ignored_fields".to_string(), json!(ignored));
        }
    }
    Ok(data)
}
