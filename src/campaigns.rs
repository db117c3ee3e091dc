use crate::constants::{FB_CAMPAIGN_DETAIL_FIELDS, FB_CAMPAIGN_LIST_FIELDS};
use crate::facebook::{GraphApi, HttpMethod, Params};
use crate::models::{Amount, BidStrategy, BuyingType, CampaignObjective, EffectiveStatus, ObjectStatus, SpecialAdCategory};
use crate::tools::{blank_as_none, bool_param, default_limit, encode_json, non_blank, required, ToolError};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct GetCampaignsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status_filter: Option<EffectiveStatus>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub campaign_ids: Option<Vec<String>>,
}

/// Shared list query, also used for campaign counting in insights.
#[derive(Debug, Default)]
pub(crate) struct CampaignQuery<'a> {
    pub limit: u32,
    pub statuses: &'a [EffectiveStatus],
    pub after: Option<&'a str>,
    pub campaign_ids: Option<&'a [String]>,
    pub name_contains: Option<&'a str>,
    pub fields: &'a str,
}

impl CampaignQuery<'_> {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("fields".to_string(), self.fields.to_string());
        if self.limit > 0 {
            params.insert("limit".to_string(), self.limit.to_string());
        }
        if !self.statuses.is_empty() {
            let statuses: Vec<&str> = self.statuses.iter().map(|s| s.as_str()).collect();
            params.insert("effective_status".to_string(), encode_json(&statuses));
        }
        if let Some(after) = self.after {
            params.insert("after".to_string(), after.to_string());
        }
        let mut filtering = Vec::new();
        if let Some(ids) = self.campaign_ids {
            filtering.push(json!({"field": "campaign.id", "operator": "IN", "value": ids}));
        }
        if let Some(name) = self.name_contains {
            filtering.push(json!({"field": "name", "operator": "CONTAIN", "value": name}));
        }
        if !filtering.is_empty() {
            params.insert("filtering".to_string(), encode_json(&filtering));
        }
        params
    }
}

pub(crate) async fn fetch_campaigns(
    api: &dyn GraphApi,
    access_token: Option<&str>,
    account_id: &str,
    query: &CampaignQuery<'_>,
) -> Result<Value, ToolError> {
    let endpoint = format!("{}/campaigns", account_id);
    let params = query.to_params();
    api.request(&endpoint, access_token, &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request("Failed to get campaigns", e, &params))
}

pub async fn get_campaigns(api: &dyn GraphApi, args: GetCampaignsArgs) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "No account ID specified")?;
    let statuses: Vec<EffectiveStatus> = args.status_filter.into_iter().collect();
    let query = CampaignQuery {
        limit: args.limit,
        statuses: &statuses,
        after: non_blank(&args.after),
        campaign_ids: args.campaign_ids.as_deref(),
        name_contains: None,
        fields: FB_CAMPAIGN_LIST_FIELDS,
    };
    fetch_campaigns(api, args.access_token.as_deref(), account_id, &query).await
}

#[derive(Debug, Deserialize)]
pub struct GetCampaignDetailsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub name_contains: Option<String>,
}

/// How the caller identified the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CampaignTarget<'a> {
    Id(&'a str),
    NameContains(&'a str),
}

impl<'a> CampaignTarget<'a> {
    /// A non-blank name search takes precedence over an id.
    pub fn from_args(
        campaign_id: &'a Option<String>,
        name_contains: &'a Option<String>,
    ) -> Result<Self, ToolError> {
        if let Some(name) = non_blank(name_contains) {
            return Ok(CampaignTarget::NameContains(name));
        }
        non_blank(campaign_id)
            .map(CampaignTarget::Id)
            .ok_or_else(|| ToolError::validation("Either campaign_id or name_contains must be provided"))
    }
}

/// Fetches exactly one campaign. A name search that matches zero or
/// several campaigns is an error, never resolved heuristically.
pub(crate) async fn resolve_campaign(
    api: &dyn GraphApi,
    access_token: Option<&str>,
    account_id: &str,
    target: CampaignTarget<'_>,
) -> Result<Value, ToolError> {
    match target {
        CampaignTarget::Id(campaign_id) => {
            let mut params = Params::new();
            params.insert("fields".to_string(), FB_CAMPAIGN_DETAIL_FIELDS.to_string());
            api.request(campaign_id, access_token, &params, HttpMethod::Get)
                .await
                .map_err(|e| ToolError::request("Failed to get campaign details", e, &params))
        }
        CampaignTarget::NameContains(name) => {
            let query = CampaignQuery {
                name_contains: Some(name),
                fields: FB_CAMPAIGN_DETAIL_FIELDS,
                ..CampaignQuery::default()
            };
            let found = fetch_campaigns(api, access_token, account_id, &query).await?;
            let mut matches = match found.get("data").and_then(Value::as_array) {
                Some(data) => data.clone(),
                None => Vec::new(),
            };
            match matches.len() {
                0 => Err(ToolError::Resolution("Campaign not found".to_string())),
                1 => Ok(matches.remove(0)),
                n => {
                    let names: Vec<&str> = matches
                        .iter()
                        .map(|c| c.get("name").and_then(Value::as_str).unwrap_or("Unknown"))
                        .collect();
                    Err(ToolError::Resolution(format!(
                        "Search returned {} campaigns instead of 1. Found campaigns: {}. Please refine your search to target a single campaign.",
                        n,
                        names.join(", ")
                    )))
                }
            }
        }
    }
}

pub async fn get_campaign_details(
    api: &dyn GraphApi,
    args: GetCampaignDetailsArgs,
) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "account_id is required")?;
    let target = CampaignTarget::from_args(&args.campaign_id, &args.name_contains)?;
    resolve_campaign(api, args.access_token.as_deref(), account_id, target).await
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub objective: Option<CampaignObjective>,
    #[serde(default)]
    pub special_ad_categories: Option<Vec<SpecialAdCategory>>,
    #[serde(default)]
    pub special_ad_category_country: Option<String>,
    #[serde(default)]
    pub daily_budget: Option<Amount>,
    #[serde(default)]
    pub lifetime_budget: Option<Amount>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub buying_type: Option<BuyingType>,
    #[serde(default)]
    pub bid_strategy: Option<BidStrategy>,
    #[serde(default)]
    pub bid_cap: Option<Amount>,
    #[serde(default)]
    pub spend_cap: Option<Amount>,
    #[serde(default)]
    pub campaign_budget_optimization: Option<bool>,
}

pub async fn create_campaign(api: &dyn GraphApi, args: CreateCampaignArgs) -> Result<Value, ToolError> {
    let account_id = required(&args.account_id, "No account ID provided")?;
    let name = required(&args.name, "No campaign name provided")?;
    let objective = args
        .objective
        .ok_or_else(|| ToolError::validation("No campaign objective provided"))?;

    let categories: Vec<&str> = args
        .special_ad_categories
        .iter()
        .flatten()
        .map(|c| c.as_str())
        .collect();

    let mut params = Params::new();
    params.insert("name".to_string(), name.to_string());
    params.insert("objective".to_string(), objective.as_str().to_string());
    // New campaigns always start paused.
    params.insert("status".to_string(), ObjectStatus::Paused.as_str().to_string());
    params.insert("special_ad_categories".to_string(), encode_json(&categories));

    if let Some(budget) = &args.daily_budget {
        params.insert("daily_budget".to_string(), budget.to_param());
    }
    if let Some(budget) = &args.lifetime_budget {
        params.insert("lifetime_budget".to_string(), budget.to_param());
    }
    if let Some(cbo) = args.campaign_budget_optimization {
        params.insert("campaign_budget_optimization".to_string(), bool_param(cbo));
    }
    if let Some(buying_type) = args.buying_type {
        params.insert("buying_type".to_string(), buying_type.as_str().to_string());
    }
    if let Some(strategy) = args.bid_strategy {
        params.insert("bid_strategy".to_string(), strategy.as_str().to_string());
    }
    if let Some(cap) = &args.bid_cap {
        params.insert("bid_cap".to_string(), cap.to_param());
    }
    if let Some(cap) = &args.spend_cap {
        params.insert("spend_cap".to_string(), cap.to_param());
    }
    if let Some(country) = non_blank(&args.special_ad_category_country) {
        params.insert("special_ad_category_country".to_string(), country.to_string());
    }

    let endpoint = format!("{}/campaigns", account_id);
    let mut data = api
        .request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request("Failed to create campaign", e, &params))?;

    backfill_name(&mut data, name);
    Ok(data)
}

/// Mutation endpoints do not echo the name; fill it from the request.
pub(crate) fn backfill_name(data: &mut Value, name: &str) {
    if let Some(obj) = data.as_object_mut() {
        let has_name = obj
            .get("name")
            .and_then(Value::as_str)
            .map(|n| !n.is_empty())
            .unwrap_or(false);
        if !has_name {
            obj.insert("name".to_string(), Value::String(name.to_string()));
        }
    }
}

/// Second read after a mutation, solely to put the current name in the response.
pub(crate) async fn fetch_name(
    api: &dyn GraphApi,
    access_token: Option<&str>,
    object_id: &str,
) -> Result<Option<Value>, crate::facebook::FacebookApiError> {
    let mut params = Params::new();
    params.insert("fields".to_string(), "name".to_string());
    let details = api
        .request(object_id, access_token, &params, HttpMethod::Get)
        .await?;
    Ok(details.get("name").cloned())
}

#[derive(Debug, Deserialize)]
pub struct UpdateCampaignArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<ObjectStatus>,
    #[serde(default)]
    pub special_ad_categories: Option<Vec<SpecialAdCategory>>,
    #[serde(default)]
    pub daily_budget: Option<Amount>,
    #[serde(default)]
    pub lifetime_budget: Option<Amount>,
    #[serde(default)]
    pub bid_strategy: Option<BidStrategy>,
    #[serde(default)]
    pub bid_cap: Option<Amount>,
    #[serde(default)]
    pub spend_cap: Option<Amount>,
    #[serde(default)]
    pub campaign_budget_optimization: Option<bool>,
    #[serde(default)]
    pub objective: Option<CampaignObjective>,
    #[serde(default)]
    pub use_adset_level_budgets: Option<bool>,
}

impl UpdateCampaignArgs {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(name) = non_blank(&self.name) {
            params.insert("name".to_string(), name.to_string());
        }
        if let Some(status) = self.status {
            params.insert("status".to_string(), status.as_str().to_string());
        }
        if let Some(categories) = &self.special_ad_categories {
            let categories: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
            params.insert("special_ad_categories".to_string(), encode_json(&categories));
        }

        if self.use_adset_level_budgets == Some(true) {
            params.insert("daily_budget".to_string(), String::new());
            params.insert("lifetime_budget".to_string(), String::new());
            if self.campaign_budget_optimization.is_some() {
                params.insert("campaign_budget_optimization".to_string(), bool_param(false));
            }
        } else {
            // An empty string clears a campaign-level budget.
            if let Some(budget) = &self.daily_budget {
                params.insert("daily_budget".to_string(), budget.to_param());
            }
            if let Some(budget) = &self.lifetime_budget {
                params.insert("lifetime_budget".to_string(), budget.to_param());
            }
            if let Some(cbo) = self.campaign_budget_optimization {
                params.insert("campaign_budget_optimization".to_string(), bool_param(cbo));
            }
        }

        if let Some(strategy) = self.bid_strategy {
            params.insert("bid_strategy".to_string(), strategy.as_str().to_string());
        }
        if let Some(cap) = &self.bid_cap {
            params.insert("bid_cap".to_string(), cap.to_param());
        }
        if let Some(cap) = &self.spend_cap {
            params.insert("spend_cap".to_string(), cap.to_param());
        }
        if let Some(objective) = self.objective {
            params.insert("objective".to_string(), objective.as_str().to_string());
        }
        params
    }
}

pub async fn update_campaign(api: &dyn GraphApi, args: UpdateCampaignArgs) -> Result<Value, ToolError> {
    let campaign_id = required(&args.campaign_id, "No campaign ID provided")?;
    let params = args.to_params();
    if params.is_empty() {
        return Err(ToolError::validation("No update parameters provided"));
    }

    let token = args.access_token.as_deref();
    let summary = format!("Failed to update campaign {}", campaign_id);

    let mut data = api
        .request(campaign_id, token, &params, HttpMethod::Post)
        .await
        .map_err(|e| ToolError::request(summary.clone(), e, &params))?;
    let name = fetch_name(api, token, campaign_id)
        .await
        .map_err(|e| ToolError::request(summary, e, &params))?;

    if let Some(obj) = data.as_object_mut() {
        obj.insert("campaign_id".to_string(), Value::String(campaign_id.to_string()));
        if let Some(name) = name {
            obj.insert("name".to_string(), name);
        }
        if args.use_adset_level_budgets == Some(true) {
            obj.insert("budget_strategy".to_string(), json!("ad_set_level"));
            obj.insert(
                "note".to_string(),
                json!("Campaign updated to use ad set level budgets. Set budgets when creating ad sets within this campaign."),
            );
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGraph;

    fn details_args(campaign_id: Option<&str>, name_contains: Option<&str>) -> GetCampaignDetailsArgs {
        GetCampaignDetailsArgs {
            access_token: None,
            account_id: Some("act_1".to_string()),
            campaign_id: campaign_id.map(str::to_string),
            name_contains: name_contains.map(str::to_string),
        }
    }

    fn create_args(value: Value) -> CreateCampaignArgs {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn get_campaigns_encodes_status_filter_as_json_array() {
        let fake = FakeGraph::new().on(HttpMethod::Get, "act_1/campaigns", json!({"data": []}));
        let args: GetCampaignsArgs =
            serde_json::from_value(json!({"account_id": "act_1", "status_filter": "ACTIVE", "after": "abc"}))
                .unwrap();
        get_campaigns(&fake, args).await.unwrap();

        let call = &fake.calls()[0];
        assert_eq!(call.params["effective_status"], r#"["ACTIVE"]"#);
        assert_eq!(call.params["limit"], "10");
        assert_eq!(call.params["after"], "abc");
        assert_eq!(call.params["fields"], FB_CAMPAIGN_LIST_FIELDS);
    }

    #[tokio::test]
    async fn blank_status_filter_means_all_statuses() {
        let fake = FakeGraph::new().on(HttpMethod::Get, "act_1/campaigns", json!({"data": []}));
        let args: GetCampaignsArgs =
            serde_json::from_value(json!({"account_id": "act_1", "status_filter": ""})).unwrap();
        get_campaigns(&fake, args).await.unwrap();
        assert!(!fake.calls()[0].params.contains_key("effective_status"));
    }

    #[tokio::test]
    async fn campaign_ids_become_an_in_filter() {
        let fake = FakeGraph::new().on(HttpMethod::Get, "act_1/campaigns", json!({"data": []}));
        let args: GetCampaignsArgs =
            serde_json::from_value(json!({"account_id": "act_1", "campaign_ids": ["1", "2"]})).unwrap();
        get_campaigns(&fake, args).await.unwrap();
        let filtering: Value = serde_json::from_str(&fake.calls()[0].params["filtering"]).unwrap();
        assert_eq!(
            filtering,
            json!([{"field": "campaign.id", "operator": "IN", "value": ["1", "2"]}])
        );
    }

    #[tokio::test]
    async fn details_by_id_issue_identical_requests() {
        let fake = FakeGraph::new().on(HttpMethod::Get, "42", json!({"id": "42", "name": "Spring"}));
        let first = get_campaign_details(&fake, details_args(Some("42"), None)).await.unwrap();
        let second = get_campaign_details(&fake, details_args(Some("42"), None)).await.unwrap();
        assert_eq!(first, second);

        let calls = fake.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(calls[0].params["fields"], FB_CAMPAIGN_DETAIL_FIELDS);
    }

    #[tokio::test]
    async fn name_search_resolves_single_match() {
        let fake = FakeGraph::new().on(
            HttpMethod::Get,
            "act_1/campaigns",
            json!({"data": [{"id": "7", "name": "Promo A"}]}),
        );
        let campaign = get_campaign_details(&fake, details_args(None, Some("  Promo "))).await.unwrap();
        assert_eq!(campaign["id"], "7");

        let filtering: Value = serde_json::from_str(&fake.calls()[0].params["filtering"]).unwrap();
        assert_eq!(filtering[0]["value"], "Promo");
        assert_eq!(filtering[0]["operator"], "CONTAIN");
    }

    #[tokio::test]
    async fn ambiguous_name_search_lists_matches() {
        let fake = FakeGraph::new().on(
            HttpMethod::Get,
            "act_1/campaigns",
            json!({"data": [{"id": "1", "name": "Promo A"}, {"id": "2", "name": "Promo B"}]}),
        );
        let err = get_campaign_details(&fake, details_args(None, Some("Promo")))
            .await
            .unwrap_err();
        let message = err.to_json()["error"].as_str().unwrap().to_string();
        assert!(message.starts_with(
            "Search returned 2 campaigns instead of 1. Found campaigns: Promo A, Promo B"
        ));
    }

    #[tokio::test]
    async fn empty_name_search_is_not_found() {
        let fake = FakeGraph::new().on(HttpMethod::Get, "act_1/campaigns", json!({"data": []}));
        let err = get_campaign_details(&fake, details_args(None, Some("Nope")))
            .await
            .unwrap_err();
        assert_eq!(err.to_json(), json!({"error": "Campaign not found"}));
    }

    #[tokio::test]
    async fn details_require_account_and_target() {
        let fake = FakeGraph::new();
        let mut args = details_args(Some("42"), None);
        args.account_id = None;
        assert!(get_campaign_details(&fake, args).await.is_err());
        assert!(get_campaign_details(&fake, details_args(None, Some("  "))).await.is_err());
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn create_requires_account_name_and_objective() {
        let fake = FakeGraph::new();
        for (args, expected) in [
            (json!({"name": "n", "objective": "OUTCOME_LEADS"}), "No account ID provided"),
            (json!({"account_id": "act_1", "objective": "OUTCOME_LEADS"}), "No campaign name provided"),
            (json!({"account_id": "act_1", "name": "n"}), "No campaign objective provided"),
        ] {
            let err = create_campaign(&fake, create_args(args)).await.unwrap_err();
            assert_eq!(err.to_json()["error"], expected);
        }
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn create_forces_paused_and_backfills_name() {
        let fake = FakeGraph::new().on(HttpMethod::Post, "act_1/campaigns", json!({"id": "99"}));
        let data = create_campaign(
            &fake,
            create_args(json!({
                "account_id": "act_1",
                "name": "Spring",
                "objective": "OUTCOME_TRAFFIC",
                "daily_budget": 5000,
                "campaign_budget_optimization": true
            })),
        )
        .await
        .unwrap();
        assert_eq!(data, json!({"id": "99", "name": "Spring"}));

        let params = &fake.calls()[0].params;
        assert_eq!(params["status"], "PAUSED");
        assert_eq!(params["special_ad_categories"], "[]");
        assert_eq!(params["daily_budget"], "5000");
        assert_eq!(params["campaign_budget_optimization"], "true");
        assert_eq!(params["objective"], "OUTCOME_TRAFFIC");
    }

    #[tokio::test]
    async fn create_failure_reports_params_sent() {
        let fake = FakeGraph::new().fail(HttpMethod::Post, "act_1/campaigns", "Invalid parameter");
        let err = create_campaign(
            &fake,
            create_args(json!({"account_id": "act_1", "name": "Spring", "objective": "OUTCOME_SALES"})),
        )
        .await
        .unwrap_err();
        let body = err.to_json();
        assert_eq!(body["error"], "Failed to create campaign");
        assert!(body["details"].as_str().unwrap().contains("Invalid parameter"));
        assert_eq!(body["params_sent"]["name"], "Spring");
    }

    #[tokio::test]
    async fn create_then_rename_round_trip() {
        let fake = FakeGraph::new()
            .on(HttpMethod::Post, "act_1/campaigns", json!({"id": "99"}))
            .on(HttpMethod::Post, "99", json!({"success": true}))
            .on(HttpMethod::Get, "99", json!({"id": "99", "name": "X"}));
        let created = create_campaign(
            &fake,
            create_args(json!({"account_id": "act_1", "name": "Spring", "objective": "OUTCOME_LEADS"})),
        )
        .await
        .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let args: UpdateCampaignArgs =
            serde_json::from_value(json!({"campaign_id": id, "name": "X"})).unwrap();
        let updated = update_campaign(&fake, args).await.unwrap();
        assert_eq!(updated["name"], "X");
        assert_eq!(updated["campaign_id"], "99");
        assert_eq!(fake.calls_to(HttpMethod::Get, "99")[0].params["fields"], "name");
    }

    #[tokio::test]
    async fn switching_to_adset_budgets_clears_campaign_budgets() {
        let fake = FakeGraph::new()
            .on(HttpMethod::Post, "5", json!({"success": true}))
            .on(HttpMethod::Get, "5", json!({"name": "C"}));
        let args: UpdateCampaignArgs = serde_json::from_value(json!({
            "campaign_id": "5",
            "daily_budget": 1000,
            "use_adset_level_budgets": true,
            "campaign_budget_optimization": true
        }))
        .unwrap();
        let data = update_campaign(&fake, args).await.unwrap();
        assert_eq!(data["budget_strategy"], "ad_set_level");

        let params = &fake.calls_to(HttpMethod::Post, "5")[0].params;
        assert_eq!(params["daily_budget"], "");
        assert_eq!(params["lifetime_budget"], "");
        assert_eq!(params["campaign_budget_optimization"], "false");
    }

    #[tokio::test]
    async fn update_without_changes_is_rejected() {
        let fake = FakeGraph::new();
        let args: UpdateCampaignArgs = serde_json::from_value(json!({"campaign_id": "5"})).unwrap();
        let err = update_campaign(&fake, args).await.unwrap_err();
        assert_eq!(err.to_json()["error"], "No update parameters provided");
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_budget_string_clears_budget() {
        let fake = FakeGraph::new()
            .on(HttpMethod::Post, "5", json!({"success": true}))
            .on(HttpMethod::Get, "5", json!({"name": "C"}));
        let args: UpdateCampaignArgs =
            serde_json::from_value(json!({"campaign_id": "5", "lifetime_budget": ""})).unwrap();
        update_campaign(&fake, args).await.unwrap();
        assert_eq!(fake.calls_to(HttpMethod::Post, "5")[0].params["lifetime_budget"], "");
    }

    #[tokio::test]
    async fn blank_name_is_not_sent_as_a_rename() {
        let fake = FakeGraph::new();
        let args: UpdateCampaignArgs =
            serde_json::from_value(json!({"campaign_id": "5", "name": "  "})).unwrap();
        let err = update_campaign(&fake, args).await.unwrap_err();
        assert_eq!(err.to_json()["error"], "No update parameters provided");
        assert_eq!(fake.call_count(), 0);
    }
}
