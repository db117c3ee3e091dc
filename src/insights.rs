use crate::campaigns::{fetch_campaigns, CampaignQuery};
use crate::constants::{
    CAMPAIGN_COUNT_LIMIT, FB_CAMPAIGN_LIST_FIELDS, FB_INSIGHTS_FIELDS, LEAD_ACTION_TYPE, MAX_INSIGHT_PAGES,
};
use crate::facebook::{GraphApi, HttpMethod, Params};
use crate::models::{DatePreset, EffectiveStatus, InsightLevel, TimeRange};
use crate::tools::{encode_validated, non_blank, normalize_account_id, required, ToolError};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

const CAMPAIGN_COUNT_FIELDS: &str = "id,status,effective_status";

fn default_date_preset() -> DatePreset {
    DatePreset::Last30d
}

fn default_level() -> InsightLevel {
    InsightLevel::Ad
}

#[derive(Debug, Deserialize)]
pub struct InsightsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default = "default_date_preset")]
    pub date_preset: DatePreset,
    /// Overrides `date_preset` when present.
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    #[serde(default)]
    pub breakdown: Option<String>,
    #[serde(default = "default_level")]
    pub level: InsightLevel,
}

impl InsightsArgs {
    fn to_params(&self) -> Result<Params, ToolError> {
        let mut params = Params::new();
        params.insert("fields".to_string(), FB_INSIGHTS_FIELDS.to_string());
        params.insert("level".to_string(), self.level.as_str().to_string());
        match &self.time_range {
            Some(range) => {
                params.insert("time_range".to_string(), encode_validated(range)?);
            }
            None => {
                params.insert("date_preset".to_string(), self.date_preset.as_str().to_string());
            }
        }
        if let Some(breakdown) = non_blank(&self.breakdown) {
            params.insert("breakdowns".to_string(), breakdown.to_string());
        }
        Ok(params)
    }
}

/// Totals over a set of insight rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InsightTotals {
    pub spend: f64,
    pub leads: i64,
}

impl InsightTotals {
    fn rounded_spend(&self) -> f64 {
        (self.spend * 100.0).round() / 100.0
    }

    fn to_json(self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("total_spend".to_string(), json!(self.rounded_spend()));
        out.insert("total_leads".to_string(), json!(self.leads));
        out
    }
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn count_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Sums spend and lead actions. Rows or values that do not parse add nothing.
pub fn aggregate_rows(rows: &[Value]) -> InsightTotals {
    let mut totals = InsightTotals::default();
    for row in rows {
        if let Some(spend) = row.get("spend").and_then(number_from).filter(|s| s.is_finite()) {
            totals.spend += spend;
        }
        let actions = row.get("actions").and_then(Value::as_array);
        for action in actions.into_iter().flatten() {
            if action.get("action_type").and_then(Value::as_str) != Some(LEAD_ACTION_TYPE) {
                continue;
            }
            if let Some(value) = action.get("value").and_then(count_from) {
                totals.leads = totals.leads.saturating_add(value);
            }
        }
    }
    totals
}

/// Account owning the rows: the first row's `account_id`, else the queried
/// object when it is itself an account.
pub fn derive_account_id(rows: &[Value], object_id: &str) -> Option<String> {
    let from_row = rows
        .first()
        .and_then(|row| row.get("account_id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(normalize_account_id);
    from_row.or_else(|| object_id.starts_with("act_").then(|| object_id.to_string()))
}

fn data_len(page: &Value) -> Option<usize> {
    page.get("data").and_then(Value::as_array).map(Vec::len)
}

fn count_error(err: &ToolError, account_id: &str, stage: &str) -> Value {
    let mut diagnostic = err.to_json();
    if let Some(obj) = diagnostic.as_object_mut() {
        obj.insert("account_id".to_string(), json!(account_id));
        obj.insert("stage".to_string(), json!(stage));
    }
    diagnostic
}

/// Two status-filtered list calls, one per status.
async fn count_campaigns_separately(
    api: &dyn GraphApi,
    access_token: Option<&str>,
    account_id: &str,
    out: &mut Map<String, Value>,
) {
    let passes = [
        (EffectiveStatus::Active, "active_campaigns"),
        (EffectiveStatus::Paused, "paused_campaigns"),
    ];
    for (status, key) in passes {
        let statuses = [status];
        let query = CampaignQuery {
            limit: CAMPAIGN_COUNT_LIMIT,
            statuses: &statuses,
            fields: FB_CAMPAIGN_LIST_FIELDS,
            ..CampaignQuery::default()
        };
        match fetch_campaigns(api, access_token, account_id, &query).await {
            Ok(page) => {
                if let Some(count) = data_len(&page) {
                    out.insert(key.to_string(), json!(count));
                }
            }
            Err(err) => {
                warn!(account_id, status = status.as_str(), error = %err.describe(), "campaign count failed");
                out.insert("campaign_count_error".to_string(), count_error(&err, account_id, status.as_str()));
                return;
            }
        }
    }
}

/// One list call filtered by both statuses, split by `effective_status`.
async fn count_campaigns_combined(
    api: &dyn GraphApi,
    access_token: Option<&str>,
    account_id: &str,
    out: &mut Map<String, Value>,
) {
    let statuses = [EffectiveStatus::Active, EffectiveStatus::Paused];
    let query = CampaignQuery {
        limit: CAMPAIGN_COUNT_LIMIT,
        statuses: &statuses,
        fields: CAMPAIGN_COUNT_FIELDS,
        ..CampaignQuery::default()
    };
    match fetch_campaigns(api, access_token, account_id, &query).await {
        Ok(page) => {
            let rows = page.get("data").and_then(Value::as_array).cloned().unwrap_or_default();
            let status_of = |row: &Value| {
                row.get("effective_status")
                    .or_else(|| row.get("status"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            };
            let active = rows.iter().filter(|&r| status_of(r).as_deref() == Some("ACTIVE")).count();
            let paused = rows.iter().filter(|&r| status_of(r).as_deref() == Some("PAUSED")).count();
            out.insert("active_campaigns".to_string(), json!(active));
            out.insert("paused_campaigns".to_string(), json!(paused));
        }
        Err(err) => {
            warn!(account_id, error = %err.describe(), "campaign count failed");
            out.insert("campaign_count_error".to_string(), count_error(&err, account_id, "ACTIVE,PAUSED"));
        }
    }
}

pub async fn get_insights(api: &dyn GraphApi, args: InsightsArgs) -> Result<Value, ToolError> {
    let object_id = required(&args.object_id, "No object ID provided")?;
    let params = args.to_params()?;
    let token = args.access_token.as_deref();
    let endpoint = format!("{}/insights", object_id);

    let mut page = api
        .request(&endpoint, token, &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request(format!("Failed to get insights for {}", object_id), e, &params))?;

    let rows = match page.get("data").and_then(Value::as_array) {
        Some(rows) => rows.clone(),
        None => return Ok(page),
    };

    let mut aggregated = aggregate_rows(&rows).to_json();
    if let Some(account_id) = derive_account_id(&rows, object_id) {
        count_campaigns_separately(api, token, &account_id, &mut aggregated).await;
    }
    if let Some(obj) = page.as_object_mut() {
        obj.insert("aggregated_results".to_string(), Value::Object(aggregated));
    }
    Ok(page)
}

fn next_cursor(page: &Value) -> Option<String> {
    let paging = page.get("paging")?;
    paging.get("next")?;
    paging
        .get("cursors")
        .and_then(|c| c.get("after"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub async fn get_insights_summary(api: &dyn GraphApi, args: InsightsArgs) -> Result<Value, ToolError> {
    let object_id = required(&args.object_id, "No object ID provided")?;
    let base_params = args.to_params()?;
    let token = args.access_token.as_deref();
    let endpoint = format!("{}/insights", object_id);

    let mut rows: Vec<Value> = Vec::new();
    let mut after: Option<String> = None;
    let mut truncated = false;
    for page_number in 1..=MAX_INSIGHT_PAGES {
        let mut params = base_params.clone();
        if let Some(cursor) = &after {
            params.insert("after".to_string(), cursor.clone());
        }
        let page = api
            .request(&endpoint, token, &params, HttpMethod::Get)
            .await
            .map_err(|e| ToolError::request(format!("Failed to get insights for {}", object_id), e, &params))?;
        if let Some(data) = page.get("data").and_then(Value::as_array) {
            rows.extend(data.iter().cloned());
        }
        after = next_cursor(&page);
        if after.is_none() {
            break;
        }
        if page_number == MAX_INSIGHT_PAGES {
            truncated = true;
        }
    }
    debug!(object_id, rows = rows.len(), truncated, "insights summary fetched");

    let mut summary = Map::new();
    summary.insert("object_id".to_string(), json!(object_id));
    summary.insert("level".to_string(), json!(args.level.as_str()));
    summary.insert("row_count".to_string(), json!(rows.len()));
    summary.extend(aggregate_rows(&rows).to_json());
    if truncated {
        summary.insert("truncated".to_string(), json!(true));
    }
    if let Some(account_id) = derive_account_id(&rows, object_id) {
        count_campaigns_combined(api, token, &account_id, &mut summary).await;
    }
    Ok(Value::Object(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGraph;

    fn args(raw: Value) -> InsightsArgs {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn malformed_rows_contribute_nothing() {
        let rows = vec![
            json!({"spend": "10.50", "actions": [{"action_type": "lead", "value": "2"}]}),
            json!({"spend": "bad", "actions": []}),
        ];
        let totals = aggregate_rows(&rows);
        assert_eq!(totals.rounded_spend(), 10.5);
        assert_eq!(totals.leads, 2);
    }

    #[test]
    fn only_lead_actions_are_counted() {
        let rows = vec![
            json!({"spend": 1.005, "actions": [
                {"action_type": "link_click", "value": "40"},
                {"action_type": "lead", "value": 3},
                {"action_type": "lead", "value": "x"}
            ]}),
            json!({"actions": "not a list"}),
            json!({"spend": null}),
            json!({"spend": "2.333"}),
        ];
        let totals = aggregate_rows(&rows);
        assert_eq!(totals.leads, 3);
        assert_eq!(totals.rounded_spend(), 3.34);
    }

    #[test]
    fn lead_totals_saturate_instead_of_overflowing() {
        let rows = vec![
            json!({"actions": [{"action_type": "lead", "value": i64::MAX.to_string()}]}),
            json!({"actions": [{"action_type": "lead", "value": 5}]}),
        ];
        assert_eq!(aggregate_rows(&rows).leads, i64::MAX);
    }

    #[test]
    fn account_is_derived_from_rows_then_object() {
        let rows = vec![json!({"account_id": "123"})];
        assert_eq!(derive_account_id(&rows, "999"), Some("act_123".to_string()));
        assert_eq!(derive_account_id(&[], "act_5"), Some("act_5".to_string()));
        assert_eq!(derive_account_id(&[], "120200"), None);
    }

    #[test]
    fn time_range_replaces_date_preset() {
        let params = args(json!({
            "object_id": "act_1",
            "time_range": {"since": "2024-01-01", "until": "2024-01-31"},
            "breakdown": "age"
        }))
        .to_params()
        .unwrap();
        assert!(!params.contains_key("date_preset"));
        assert_eq!(params["time_range"], r#"{"since":"2024-01-01","until":"2024-01-31"}"#);
        assert_eq!(params["breakdowns"], "age");
        assert_eq!(params["level"], "ad");

        let params = args(json!({"object_id": "act_1", "breakdown": ""})).to_params().unwrap();
        assert_eq!(params["date_preset"], "last_30d");
        assert!(!params.contains_key("breakdowns"));
    }

    #[test]
    fn backwards_time_range_is_rejected() {
        let err = args(json!({
            "object_id": "act_1",
            "time_range": {"since": "2024-02-01", "until": "2024-01-01"}
        }))
        .to_params()
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[tokio::test]
    async fn insights_page_gains_aggregate_and_campaign_counts() {
        let fake = FakeGraph::new()
            .on(
                HttpMethod::Get,
                "act_1/insights",
                json!({"data": [
                    {"account_id": "1", "spend": "10.50", "actions": [{"action_type": "lead", "value": "2"}]},
                    {"account_id": "1", "spend": "bad", "actions": []}
                ]}),
            )
            .on(HttpMethod::Get, "act_1/campaigns", json!({"data": [{"id": "a"}, {"id": "b"}]}))
            .on(HttpMethod::Get, "act_1/campaigns", json!({"data": [{"id": "c"}]}));

        let page = get_insights(&fake, args(json!({"object_id": "act_1"}))).await.unwrap();
        assert_eq!(page["data"].as_array().unwrap().len(), 2);
        let agg = &page["aggregated_results"];
        assert_eq!(agg["total_spend"], 10.5);
        assert_eq!(agg["total_leads"], 2);
        assert_eq!(agg["active_campaigns"], 2);
        assert_eq!(agg["paused_campaigns"], 1);

        let counts = fake.calls_to(HttpMethod::Get, "act_1/campaigns");
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].params["effective_status"], r#"["ACTIVE"]"#);
        assert_eq!(counts[1].params["effective_status"], r#"["PAUSED"]"#);
        assert_eq!(counts[0].params["limit"], "1000");
    }

    #[tokio::test]
    async fn count_failure_is_attached_not_raised() {
        let fake = FakeGraph::new()
            .on(HttpMethod::Get, "act_1/insights", json!({"data": [{"spend": "4"}]}))
            .fail(HttpMethod::Get, "act_1/campaigns", "rate limited");
        let page = get_insights(&fake, args(json!({"object_id": "act_1"}))).await.unwrap();
        let agg = &page["aggregated_results"];
        assert_eq!(agg["total_spend"], 4.0);
        assert_eq!(agg["campaign_count_error"]["error"], "Failed to get campaigns");
        assert_eq!(agg["campaign_count_error"]["account_id"], "act_1");
        assert!(agg.get("active_campaigns").is_none());
    }

    #[tokio::test]
    async fn no_account_means_no_count_calls() {
        let fake = FakeGraph::new().on(HttpMethod::Get, "777/insights", json!({"data": []}));
        let page = get_insights(&fake, args(json!({"object_id": "777"}))).await.unwrap();
        assert_eq!(page["aggregated_results"]["total_leads"], 0);
        assert!(page["aggregated_results"].get("campaign_count_error").is_none());
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn summary_follows_cursors_and_counts_once() {
        let fake = FakeGraph::new()
            .on(
                HttpMethod::Get,
                "act_1/insights",
                json!({
                    "data": [{"account_id": "act_1", "spend": "5", "actions": [{"action_type": "lead", "value": "1"}]}],
                    "paging": {"cursors": {"after": "c1"}, "next": "https://graph.facebook.com/next"}
                }),
            )
            .on(
                HttpMethod::Get,
                "act_1/insights",
                json!({
                    "data": [{"account_id": "act_1", "spend": "2.25"}],
                    "paging": {"cursors": {"after": "c2"}}
                }),
            )
            .on(
                HttpMethod::Get,
                "act_1/campaigns",
                json!({"data": [
                    {"id": "a", "effective_status": "ACTIVE"},
                    {"id": "b", "effective_status": "PAUSED"},
                    {"id": "c", "effective_status": "ACTIVE"}
                ]}),
            );

        let summary = get_insights_summary(&fake, args(json!({"object_id": "act_1", "level": "campaign"})))
            .await
            .unwrap();
        assert_eq!(summary["object_id"], "act_1");
        assert_eq!(summary["level"], "campaign");
        assert_eq!(summary["row_count"], 2);
        assert_eq!(summary["total_spend"], 7.25);
        assert_eq!(summary["total_leads"], 1);
        assert_eq!(summary["active_campaigns"], 2);
        assert_eq!(summary["paused_campaigns"], 1);
        assert!(summary.get("data").is_none());

        let pages = fake.calls_to(HttpMethod::Get, "act_1/insights");
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].params.contains_key("after"));
        assert_eq!(pages[1].params["after"], "c1");
        let counts = fake.calls_to(HttpMethod::Get, "act_1/campaigns");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].params["effective_status"], r#"["ACTIVE","PAUSED"]"#);
    }

    #[tokio::test]
    async fn summary_stops_at_page_limit() {
        let endless = json!({
            "data": [{"spend": "1"}],
            "paging": {"cursors": {"after": "again"}, "next": "https://graph.facebook.com/next"}
        });
        let fake = FakeGraph::new().on(HttpMethod::Get, "120/insights", endless);
        let summary = get_insights_summary(&fake, args(json!({"object_id": "120"}))).await.unwrap();
        assert_eq!(summary["row_count"], MAX_INSIGHT_PAGES);
        assert_eq!(summary["truncated"], true);
        assert_eq!(fake.call_count(), MAX_INSIGHT_PAGES);
    }
}
