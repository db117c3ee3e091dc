use crate::ads::{get_ad_creatives, get_ads, GetAdCreativesArgs, GetAdsArgs};
use crate::adsets::{get_adset_details, get_adsets, GetAdsetDetailsArgs, GetAdsetsArgs};
use crate::campaigns::{resolve_campaign, CampaignTarget};
use crate::constants::{LANDING_PAGE_VIEW_ACTION_TYPE, LEAD_ACTION_TYPE};
use crate::facebook::{BatchRequest, BatchResponse, FacebookApiError, GraphApi, HttpMethod};
use crate::models::DatePreset;
use crate::tools::{default_limit, required, ToolError};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use url::form_urlencoded;

const AD_INSIGHTS_LIMIT: u32 = 100;

/// Successes collected so far plus one message per item that failed.
#[derive(Debug)]
pub struct PartialResult<T> {
    pub items: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> Default for PartialResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> PartialResult<T> {
    pub fn record(&mut self, outcome: Result<T, ToolError>, describe: impl FnOnce(&ToolError) -> String) {
        match outcome {
            Ok(item) => self.items.push(item),
            Err(err) => {
                let message = describe(&err);
                warn!(%message, "partial failure");
                self.errors.push(message);
            }
        }
    }
}

fn data_of(page: &Value) -> Vec<Value> {
    page.get("data").and_then(Value::as_array).cloned().unwrap_or_default()
}

fn id_of(item: &Value) -> &str {
    item.get("id").and_then(Value::as_str).unwrap_or("unknown")
}

fn empty_section(error: &str) -> Value {
    json!({ "data": [], "error": error })
}

/// Campaign id plus the assembled tree.
struct CampaignTree {
    campaign_id: String,
    body: Value,
}

// Per-item failures go into `errors`; a failed campaign lookup aborts.
async fn collect_campaign_tree(
    api: &dyn GraphApi,
    access_token: Option<&String>,
    account_id: &str,
    target: CampaignTarget<'_>,
) -> Result<CampaignTree, ToolError> {
    let token = access_token.map(String::as_str);
    let campaign = resolve_campaign(api, token, account_id, target).await?;
    let campaign_id = match target {
        CampaignTarget::Id(id) => id.to_string(),
        CampaignTarget::NameContains(_) => campaign
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolError::Resolution("Campaign not found".to_string()))?,
    };
    debug!(campaign_id = %campaign_id, "collecting campaign tree");

    let mut errors: Vec<String> = Vec::new();

    let adsets_args = GetAdsetsArgs {
        access_token: access_token.cloned(),
        account_id: Some(account_id.to_string()),
        limit: default_limit(),
        campaign_id: Some(campaign_id.clone()),
    };
    let adsets = match get_adsets(api, adsets_args).await {
        Err(err) => {
            errors.push(format!("Adsets API error: {}", err.describe()));
            empty_section("Error retrieving ad sets")
        }
        Ok(page) if data_of(&page).is_empty() => empty_section("No ad sets found"),
        Ok(mut page) => {
            let mut details = PartialResult::default();
            for adset in data_of(&page) {
                let adset_id = id_of(&adset).to_string();
                let args = GetAdsetDetailsArgs {
                    access_token: access_token.cloned(),
                    adset_id: Some(adset_id.clone()),
                };
                details.record(get_adset_details(api, args).await, |e| {
                    format!("Adset details error for {}: {}", adset_id, e.describe())
                });
            }
            errors.extend(details.errors);
            page["data"] = Value::Array(details.items);
            page
        }
    };

    let ads_args = GetAdsArgs {
        access_token: access_token.cloned(),
        account_id: Some(account_id.to_string()),
        limit: default_limit(),
        campaign_id: Some(campaign_id.clone()),
        adset_id: None,
    };
    let (ads, ad_creatives) = match get_ads(api, ads_args).await {
        Err(err) => {
            errors.push(format!("Ads API error: {}", err.describe()));
            (
                empty_section("Error retrieving ads"),
                empty_section("Cannot retrieve ad creatives due to ads error"),
            )
        }
        Ok(page) if data_of(&page).is_empty() => (
            empty_section("No ads found"),
            empty_section("No ads available to retrieve creatives"),
        ),
        Ok(page) => {
            let mut creatives = PartialResult::default();
            for ad in data_of(&page) {
                let ad_id = id_of(&ad).to_string();
                let args = GetAdCreativesArgs {
                    access_token: access_token.cloned(),
                    ad_id: Some(ad_id.clone()),
                };
                let outcome = get_ad_creatives(api, args).await.map(|page| data_of(&page));
                creatives.record(outcome, |e| {
                    format!("Ad creatives error for ad {}: {}", ad_id, e.describe())
                });
            }
            errors.extend(creatives.errors);
            let flattened: Vec<Value> = creatives.items.into_iter().flatten().collect();
            (page, json!({ "data": flattened }))
        }
    };

    let mut body = Map::new();
    body.insert("campaign".to_string(), json!({ "data": [campaign] }));
    body.insert("adsets".to_string(), adsets);
    body.insert("ads".to_string(), ads);
    body.insert("ad_creatives".to_string(), ad_creatives);
    if !errors.is_empty() {
        body.insert("errors".to_string(), json!(errors));
    }

    Ok(CampaignTree {
        campaign_id,
        body: Value::Object(body),
    })
}

#[derive(Debug, Deserialize)]
pub struct CampaignDeepArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub name_contains: Option<String>,
}

pub async fn get_complete_campaign_details_deep(
    api: &dyn GraphApi,
    args: CampaignDeepArgs,
) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "account_id is required")?;
    let target = CampaignTarget::from_args(&args.campaign_id, &args.name_contains)?;
    let tree = collect_campaign_tree(api, args.access_token.as_ref(), account_id, target).await?;
    Ok(tree.body)
}

fn default_insights_preset() -> DatePreset {
    DatePreset::Last7d
}

#[derive(Debug, Deserialize)]
pub struct CampaignInsightsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub name_contains: Option<String>,
    #[serde(default = "default_insights_preset")]
    pub date_preset: DatePreset,
    #[serde(default)]
    pub campaign_insights_fields: Option<String>,
    #[serde(default)]
    pub ad_insights_fields: Option<String>,
}

fn insights_url(object_id: &str, fields: &str, date_preset: DatePreset, level: &str, limit: Option<u32>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("fields", fields)
        .append_pair("date_preset", date_preset.as_str())
        .append_pair("time_increment", "all_days")
        .append_pair("level", level);
    if let Some(limit) = limit {
        query.append_pair("limit", &limit.to_string());
    }
    format!("{}/insights?{}", object_id, query.finish())
}

fn keep_conversion_actions(list: &mut Value) {
    if let Some(entries) = list.as_array_mut() {
        entries.retain(|entry| {
            matches!(
                entry.get("action_type").and_then(Value::as_str),
                Some(LEAD_ACTION_TYPE) | Some(LANDING_PAGE_VIEW_ACTION_TYPE)
            )
        });
    }
}

/// Turns one batch slot into its half of the envelope.
fn read_batch_slot(slot: Option<&BatchResponse>, label: &str) -> Value {
    let slot = match slot {
        Some(slot) => slot,
        None => return json!({ "error": format!("No batch response for {}", label) }),
    };
    if slot.code != 200 {
        return json!({
            "error": format!("Batch request failed with code {}", slot.code),
            "details": slot.body,
        });
    }
    let mut parsed: Value = match serde_json::from_str(&slot.body) {
        Ok(parsed) => parsed,
        Err(_) => return json!({ "error": format!("Failed to parse {}", label) }),
    };
    if let Some(rows) = parsed.get_mut("data").and_then(Value::as_array_mut) {
        for row in rows {
            if let Some(actions) = row.get_mut("actions") {
                keep_conversion_actions(actions);
            }
            if let Some(costs) = row.get_mut("cost_per_action_type") {
                keep_conversion_actions(costs);
            }
        }
    }
    parsed
}

fn batch_failure(err: &FacebookApiError) -> Value {
    json!({ "error": "Batch request failed", "details": err.to_string() })
}

pub async fn get_campaign_data_with_insights(
    api: &dyn GraphApi,
    args: CampaignInsightsArgs,
) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "account_id is required")?;
    let target = CampaignTarget::from_args(&args.campaign_id, &args.name_contains)?;
    let campaign_fields = required(&args.campaign_insights_fields, "campaign_insights_fields is required")?;
    let ad_fields = required(&args.ad_insights_fields, "ad_insights_fields is required")?;

    let tree = collect_campaign_tree(api, args.access_token.as_ref(), account_id, target).await?;

    let requests = [
        BatchRequest {
            method: HttpMethod::Get,
            relative_url: insights_url(&tree.campaign_id, campaign_fields, args.date_preset, "campaign", None),
        },
        BatchRequest {
            method: HttpMethod::Get,
            relative_url: insights_url(
                &tree.campaign_id,
                ad_fields,
                args.date_preset,
                "ad",
                Some(AD_INSIGHTS_LIMIT),
            ),
        },
    ];

    let (campaign_insights, ad_insights) = match api.batch_request(&requests, args.access_token.as_deref()).await {
        Ok(slots) => (
            read_batch_slot(slots.first(), "campaign insights"),
            read_batch_slot(slots.get(1), "ad insights"),
        ),
        Err(err) => {
            warn!(campaign_id = %tree.campaign_id, error = %err, "insights batch failed");
            (batch_failure(&err), batch_failure(&err))
        }
    };

    Ok(json!({
        "campaign_data": tree.body,
        "campaign_insights": campaign_insights,
        "ad_insights": ad_insights,
    }))
}
