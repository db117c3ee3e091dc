use crate::campaigns::{backfill_name, fetch_name};
use crate::constants::{FB_ADSET_DETAIL_FIELDS, FB_ADSET_LIST_FIELDS};
use crate::facebook::{GraphApi, HttpMethod, Params};
use crate::models::{
    Amount, AttributionSpec, BidStrategy, BillingEvent, DestinationType, FrequencyControlSpec,
    ObjectStatus, OptimizationGoal, PromotedObject, Targeting,
};
use crate::tools::{default_limit, encode_validated, non_blank, required, ToolError};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct GetAdsetsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub campaign_id: Option<String>,
}

pub async fn get_adsets(api: &dyn GraphApi, args: GetAdsetsArgs) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "No account ID specified")?;
    // Campaign filtering only works through the campaign edge.
    let endpoint = match non_blank(&args.campaign_id) {
        Some(campaign_id) => format!("{}/adsets", campaign_id),
        None => format!("{}/adsets", account_id),
    };

    let mut params = Params::new();
    params.insert("fields".to_string(), FB_ADSET_LIST_FIELDS.to_string());
    params.insert("limit".to_string(), args.limit.to_string());

    api.request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request("Failed to get ad sets", e, &params))
}

#[derive(Debug, Deserialize)]
pub struct GetAdsetDetailsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub adset_id: Option<String>,
}

pub async fn get_adset_details(api: &dyn GraphApi, args: GetAdsetDetailsArgs) -> Result<Value, ToolError> {
    let adset_id = required(&args.adset_id, "No ad set ID provided")?;

    let mut params = Params::new();
    params.insert("fields".to_string(), FB_ADSET_DETAIL_FIELDS.to_string());

    let mut data = api
        .request(adset_id, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request(format!("Failed to get ad set {}", adset_id), e, &params))?;

    if let Some(obj) = data.as_object_mut() {
        if !obj.contains_key("frequency_control_specs") {
            obj.insert(
                "_meta".to_string(),
                json!({
                    "note": "No frequency_control_specs field was returned by the API. This means either no frequency caps are set or the API did not include this field in the response."
                }),
            );
        }
    }
    Ok(data)
}

#[derive(Debug, Deserialize)]
pub struct CreateAdsetArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<ObjectStatus>,
    #[serde(default)]
    pub targeting: Option<Targeting>,
    #[serde(default)]
    pub optimization_goal: Option<OptimizationGoal>,
    #[serde(default)]
    pub billing_event: Option<BillingEvent>,
    #[serde(default)]
    pub bid_amount: Option<Amount>,
    #[serde(default)]
    pub bid_strategy: Option<BidStrategy>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub dsa_beneficiary: Option<String>,
    #[serde(default)]
    pub dsa_payor: Option<String>,
    #[serde(default)]
    pub promoted_object: Option<PromotedObject>,
    #[serde(default)]
    pub destination_type: Option<DestinationType>,
    #[serde(default)]
    pub attribution_spec: Option<Vec<AttributionSpec>>,
}

/// Midnight UTC today, in the vendor's timestamp format.
fn default_start_time() -> String {
    Utc::now().format("%Y-%m-%dT00:00:00+0000").to_string()
}

pub async fn create_adset(api: &dyn GraphApi, args: CreateAdsetArgs) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "No account ID provided")?;
    let campaign_id = required(&args.campaign_id, "No campaign ID provided")?;
    let name = required(&args.name, "No ad set name provided")?;
    let optimization_goal = args
        .optimization_goal
        .ok_or_else(|| ToolError::validation("No optimization goal provided"))?;
    let billing_event = args
        .billing_event
        .ok_or_else(|| ToolError::validation("No billing event provided"))?;

    let mut params = Params::new();
    params.insert("name".to_string(), name.to_string());
    params.insert("campaign_id".to_string(), campaign_id.to_string());
    params.insert(
        "status".to_string(),
        args.status.unwrap_or(ObjectStatus::Paused).as_str().to_string(),
    );
    params.insert("optimization_goal".to_string(), optimization_goal.as_str().to_string());
    params.insert("billing_event".to_string(), billing_event.as_str().to_string());
    let targeting = args.targeting.unwrap_or_default();
    params.insert("targeting".to_string(), encode_validated(&targeting)?);

    if let Some(amount) = &args.bid_amount {
        params.insert("bid_amount".to_string(), amount.to_param());
    }
    if let Some(strategy) = args.bid_strategy {
        params.insert("bid_strategy".to_string(), strategy.as_str().to_string());
    }
    let start_time = non_blank(&args.start_time)
        .map(str::to_string)
        .unwrap_or_else(default_start_time);
    params.insert("start_time".to_string(), start_time);
    if let Some(end_time) = non_blank(&args.end_time) {
        params.insert("end_time".to_string(), end_time.to_string());
    }
    if let Some(beneficiary) = non_blank(&args.dsa_beneficiary) {
        params.insert("dsa_beneficiary".to_string(), beneficiary.to_string());
    }
    if let Some(payor) = non_blank(&args.dsa_payor) {
        params.insert("dsa_payor".to_string(), payor.to_string());
    }
    if let Some(promoted) = &args.promoted_object {
        params.insert("promoted_object".to_string(), encode_validated(promoted)?);
    }
    if let Some(destination) = args.destination_type {
        params.insert("destination_type".to_string(), destination.as_str().to_string());
    }
    if let Some(specs) = args.attribution_spec.as_ref().filter(|s| !s.is_empty()) {
        params.insert("attribution_spec".to_string(), encode_validated(specs)?);
    }

    let endpoint = format!("{}/adsets", account_id);
    let mut data = api
        .request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request("Failed to create ad set", e, &params))?;

    backfill_name(&mut data, name);
    Ok(data)
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdsetArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub adset_id: Option<String>,
    #[serde(default)]
    pub frequency_control_specs: Option<Vec<FrequencyControlSpec>>,
    #[serde(default)]
    pub bid_strategy: Option<BidStrategy>,
    #[serde(default)]
    pub bid_amount: Option<Amount>,
    #[serde(default)]
    pub status: Option<ObjectStatus>,
    #[serde(default)]
    pub targeting: Option<Targeting>,
    #[serde(default)]
    pub optimization_goal: Option<OptimizationGoal>,
    #[serde(default)]
    pub daily_budget: Option<Amount>,
    #[serde(default)]
    pub lifetime_budget: Option<Amount>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub attribution_spec: Option<Vec<AttributionSpec>>,
}

impl UpdateAdsetArgs {
    fn to_params(&self) -> Result<Params, ToolError> {
        let mut params = Params::new();
        if let Some(specs) = &self.frequency_control_specs {
            params.insert("frequency_control_specs".to_string(), encode_validated(specs)?);
        }
        if let Some(strategy) = self.bid_strategy {
            params.insert("bid_strategy".to_string(), strategy.as_str().to_string());
        }
        if let Some(amount) = &self.bid_amount {
            params.insert("bid_amount".to_string(), amount.to_param());
        }
        if let Some(status) = self.status {
            params.insert("status".to_string(), status.as_str().to_string());
        }
        if let Some(goal) = self.optimization_goal {
            params.insert("optimization_goal".to_string(), goal.as_str().to_string());
        }
        if let Some(targeting) = &self.targeting {
            params.insert("targeting".to_string(), encode_validated(targeting)?);
        }
        if let Some(budget) = &self.daily_budget {
            params.insert("daily_budget".to_string(), budget.to_param());
        }
        if let Some(budget) = &self.lifetime_budget {
            params.insert("lifetime_budget".to_string(), budget.to_param());
        }
        if let Some(start) = &self.start_time {
            params.insert("start_time".to_string(), start.clone());
        }
        if let Some(end) = &self.end_time {
            params.insert("end_time".to_string(), end.clone());
        }
        if let Some(specs) = &self.attribution_spec {
            params.insert("attribution_spec".to_string(), encode_validated(specs)?);
        }
        Ok(params)
    }
}

pub async fn update_adset(api: &dyn GraphApi, args: UpdateAdsetArgs) -> Result<Value, ToolError> {
    let adset_id = required(&args.adset_id, "No ad set ID provided")?;
    let params = args.to_params()?;
    if params.is_empty() {
        return Err(ToolError::validation("No update parameters provided"));
    }

    let token = args.access_token.as_deref();
    let summary = format!("Failed to update ad set {}", adset_id);

    let mut data = api
        .request(adset_id, token, &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request(summary.clone(), e, &params))?;
    let name = fetch_name(api, token, adset_id)
        .await
        .map_err(|e| ToolError::request(summary, e, &params))?;

    if let Some(obj) = data.as_object_mut() {
        obj.insert("adset_id".to_string(), Value::String(adset_id.to_string()));
        if let Some(name) = name {
            obj.insert("name".to_string(), name);
        }
    }
    Ok(data)
}
