use crate::models::{
    BidStrategy, BillingEvent, BuyingType, CallToActionType, CampaignObjective, CreativeStatus, DatePreset,
    DestinationType, EffectiveStatus, InsightLevel, ObjectStatus, OptimizationGoal, SpecialAdCategory,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn one_of(values: &[&str], description: &str) -> Value {
    json!({ "type": "string", "enum": values, "description": description })
}

fn integer(description: &str) -> Value {
    json!({ "type": "integer", "description": description })
}

fn boolean(description: &str) -> Value {
    json!({ "type": "boolean", "description": description })
}

fn amount(description: &str) -> Value {
    json!({ "type": ["integer", "number", "string"], "description": description })
}

fn object(description: &str) -> Value {
    json!({ "type": "object", "description": description })
}

fn array_of(items: Value, description: &str) -> Value {
    json!({ "type": "array", "items": items, "description": description })
}

fn token() -> (&'static str, Value) {
    ("access_token", string("Graph API access token; the configured default is used when omitted"))
}

fn account() -> (&'static str, Value) {
    ("account_id", string("Ad account id, format act_XXXXXXXXX"))
}

fn tool(
    name: &'static str,
    description: &'static str,
    properties: Vec<(&'static str, Value)>,
    required: &[&str],
) -> ToolDef {
    let mut props = Map::new();
    let (key, value) = token();
    props.insert(key.to_string(), value);
    for (key, value) in properties {
        props.insert(key.to_string(), value);
    }
    ToolDef {
        name,
        description,
        input_schema: json!({
            "type": "object",
            "properties": props,
            "required": required,
        }),
    }
}

fn account_tools() -> Vec<ToolDef> {
    vec![
        tool(
            "get_ad_accounts",
            "List ad accounts reachable by a user.",
            vec![
                ("user_id", string("User id, defaults to me")),
                ("limit", integer("Maximum accounts to return (default 10)")),
            ],
            &[],
        ),
        tool("get_account_info", "Detailed information about one ad account.", vec![account()], &["account_id"]),
        tool("get_account_pixels", "Pixels attached to an ad account.", vec![account()], &["account_id"]),
    ]
}

fn campaign_tools() -> Vec<ToolDef> {
    let budget = || amount("Budget in the account's minor currency unit");
    let categories = || array_of(one_of(SpecialAdCategory::VALUES, "Category"), "Special ad categories");
    vec![
        tool(
            "get_campaigns",
            "List campaigns in an ad account.",
            vec![
                account(),
                ("limit", integer("Maximum campaigns to return (default 10)")),
                ("status_filter", one_of(EffectiveStatus::VALUES, "Only campaigns with this effective status")),
                ("after", string("Pagination cursor")),
                ("campaign_ids", array_of(string("Campaign id"), "Restrict to these campaign ids")),
            ],
            &["account_id"],
        ),
        tool(
            "get_campaign_details",
            "Details of one campaign, addressed by id or by a name search that must match exactly one campaign.",
            vec![
                account(),
                ("campaign_id", string("Campaign id")),
                ("name_contains", string("Substring of the campaign name; takes precedence over campaign_id")),
            ],
            &["account_id"],
        ),
        tool(
            "create_campaign",
            "Create a campaign. New campaigns always start PAUSED.",
            vec![
                account(),
                ("name", string("Campaign name")),
                ("objective", one_of(CampaignObjective::VALUES, "Campaign objective")),
                ("special_ad_categories", categories()),
                ("special_ad_category_country", string("Country code for special ad categories")),
                ("daily_budget", budget()),
                ("lifetime_budget", budget()),
                ("buying_type", one_of(BuyingType::VALUES, "Buying type")),
                ("bid_strategy", one_of(BidStrategy::VALUES, "Bid strategy")),
                ("bid_cap", amount("Bid cap")),
                ("spend_cap", amount("Spend cap")),
                ("campaign_budget_optimization", boolean("Enable campaign budget optimization")),
            ],
            &["account_id", "name", "objective"],
        ),
        tool(
            "update_campaign",
            "Update a campaign. Pass an empty string for a budget to clear it.",
            vec![
                ("campaign_id", string("Campaign id")),
                ("name", string("New name")),
                ("status", one_of(ObjectStatus::VALUES, "New status")),
                ("special_ad_categories", categories()),
                ("daily_budget", budget()),
                ("lifetime_budget", budget()),
                ("bid_strategy", one_of(BidStrategy::VALUES, "Bid strategy")),
                ("bid_cap", amount("Bid cap")),
                ("spend_cap", amount("Spend cap")),
                ("campaign_budget_optimization", boolean("Enable campaign budget optimization")),
                ("objective", one_of(CampaignObjective::VALUES, "Campaign objective")),
                ("use_adset_level_budgets", boolean("Move budgeting to the ad set level")),
            ],
            &["campaign_id"],
        ),
    ]
}

fn adset_tools() -> Vec<ToolDef> {
    let schedule = |what: &str| -> Value { string(what) };
    vec![
        tool(
            "get_adsets",
            "List ad sets in an account, or under one campaign.",
            vec![
                account(),
                ("limit", integer("Maximum ad sets to return (default 10)")),
                ("campaign_id", string("Only ad sets of this campaign")),
            ],
            &["account_id"],
        ),
        tool(
            "get_adset_details",
            "Details of one ad set, including frequency caps.",
            vec![("adset_id", string("Ad set id"))],
            &["adset_id"],
        ),
        tool(
            "create_adset",
            "Create an ad set under a campaign. Defaults to PAUSED.",
            vec![
                account(),
                ("campaign_id", string("Parent campaign id")),
                ("name", string("Ad set name")),
                ("status", one_of(ObjectStatus::VALUES, "Initial status")),
                ("targeting", object("Targeting: age_min, age_max, genders, geo_locations, interests, ...")),
                ("optimization_goal", one_of(OptimizationGoal::VALUES, "Optimization goal")),
                ("billing_event", one_of(BillingEvent::VALUES, "Billing event")),
                ("bid_amount", amount("Bid amount")),
                ("bid_strategy", one_of(BidStrategy::VALUES, "Bid strategy")),
                ("start_time", schedule("ISO 8601 start time; defaults to today 00:00 UTC")),
                ("end_time", schedule("ISO 8601 end time")),
                ("dsa_beneficiary", string("DSA beneficiary (EU)")),
                ("dsa_payor", string("DSA payor (EU)")),
                ("promoted_object", object("Promoted object: pixel_id, custom_event_type, page_id, ...")),
                ("destination_type", one_of(DestinationType::VALUES, "Destination type")),
                ("attribution_spec", array_of(object("{event_type, window_days}"), "Attribution windows")),
            ],
            &["account_id", "campaign_id", "name", "optimization_goal", "billing_event"],
        ),
        tool(
            "update_adset",
            "Update an ad set.",
            vec![
                ("adset_id", string("Ad set id")),
                (
                    "frequency_control_specs",
                    array_of(object("{event, interval_days, max_frequency}"), "Frequency caps"),
                ),
                ("bid_strategy", one_of(BidStrategy::VALUES, "Bid strategy")),
                ("bid_amount", amount("Bid amount")),
                ("status", one_of(ObjectStatus::VALUES, "New status")),
                ("targeting", object("Replacement targeting")),
                ("optimization_goal", one_of(OptimizationGoal::VALUES, "Optimization goal")),
                ("daily_budget", amount("Daily budget")),
                ("lifetime_budget", amount("Lifetime budget")),
                ("start_time", schedule("ISO 8601 start time")),
                ("end_time", schedule("ISO 8601 end time")),
                ("attribution_spec", array_of(object("{event_type, window_days}"), "Attribution windows")),
            ],
            &["adset_id"],
        ),
    ]
}

fn ad_tools() -> Vec<ToolDef> {
    vec![
        tool(
            "get_ads",
            "List ads in an account, campaign or ad set.",
            vec![
                account(),
                ("limit", integer("Maximum ads to return (default 10)")),
                ("campaign_id", string("Only ads of this campaign")),
                ("adset_id", string("Only ads of this ad set; takes precedence over campaign_id")),
            ],
            &["account_id"],
        ),
        tool("get_ad_details", "Details of one ad.", vec![("ad_id", string("Ad id"))], &["ad_id"]),
        tool(
            "create_ad",
            "Create an ad from an existing creative. Defaults to PAUSED.",
            vec![
                account(),
                ("name", string("Ad name")),
                ("adset_id", string("Parent ad set id")),
                ("creative_id", string("Creative id")),
                ("status", one_of(ObjectStatus::VALUES, "Initial status")),
                ("bid_amount", amount("Bid amount")),
            ],
            &["account_id", "name", "adset_id", "creative_id"],
        ),
        tool(
            "update_ad",
            "Update an ad's name, status or bid.",
            vec![
                ("ad_id", string("Ad id")),
                ("name", string("New name")),
                ("status", one_of(ObjectStatus::VALUES, "New status")),
                ("bid_amount", amount("Bid amount")),
            ],
            &["ad_id"],
        ),
        tool(
            "get_ad_creatives",
            "Creatives used by an ad.",
            vec![("ad_id", string("Ad id"))],
            &["ad_id"],
        ),
        tool(
            "create_ad_creative",
            "Create a single-image link creative.",
            vec![
                account(),
                ("name", string("Creative name")),
                ("image_hash", string("Hash of an uploaded image")),
                ("page_id", string("Facebook page id")),
                ("link_url", string("Destination URL")),
                ("message", string("Primary text")),
                ("headline", string("Headline")),
                ("description", string("Description")),
                ("call_to_action_type", one_of(CallToActionType::VALUES, "Call to action button")),
            ],
            &["account_id", "image_hash", "page_id"],
        ),
        tool(
            "update_ad_creative",
            "Rename a creative or change its status. Creative content cannot be changed after creation; content fields are ignored.",
            vec![
                ("creative_id", string("Creative id")),
                ("name", string("New name")),
                ("status", one_of(CreativeStatus::VALUES, "New status")),
                account(),
            ],
            &["creative_id"],
        ),
    ]
}

fn insights_properties() -> Vec<(&'static str, Value)> {
    vec![
        ("object_id", string("Account, campaign, ad set or ad id")),
        ("date_preset", one_of(DatePreset::VALUES, "Reporting window (default last_30d)")),
        ("time_range", object("{since, until} as YYYY-MM-DD; overrides date_preset")),
        ("breakdown", string("Breakdown dimension, e.g. age or publisher_platform")),
        ("level", one_of(InsightLevel::VALUES, "Aggregation level (default ad)")),
    ]
}

fn insight_tools() -> Vec<ToolDef> {
    vec![
        tool(
            "get_insights",
            "Performance rows for an object plus total spend, total leads and campaign counts.",
            insights_properties(),
            &["object_id"],
        ),
        tool(
            "get_insights_summary",
            "Spend, lead and campaign-count totals across every page of insight rows.",
            insights_properties(),
            &["object_id"],
        ),
    ]
}

fn orchestrator_tools() -> Vec<ToolDef> {
    let target = || {
        vec![
            account(),
            ("campaign_id", string("Campaign id")),
            ("name_contains", string("Substring of the campaign name; must match exactly one campaign")),
        ]
    };
    let mut with_insights = target();
    with_insights.push(("date_preset", one_of(DatePreset::VALUES, "Reporting window (default last_7d)")));
    with_insights.push((
        "campaign_insights_fields",
        string("Comma-separated campaign insight fields, e.g. spend,actions,cost_per_action_type"),
    ));
    with_insights.push((
        "ad_insights_fields",
        string("Comma-separated ad insight fields, e.g. ad_id,ad_name,spend,clicks,ctr,actions"),
    ));
    vec![
        tool(
            "get_complete_campaign_details_deep",
            "A campaign with its ad sets, ads and creatives. Per-item failures are listed under errors.",
            target(),
            &["account_id"],
        ),
        tool(
            "get_campaign_data_with_insights",
            "The full campaign tree plus campaign and ad level insights fetched in one batch.",
            with_insights,
            &["account_id", "campaign_insights_fields", "ad_insights_fields"],
        ),
    ]
}

pub fn tool_catalog() -> Vec<ToolDef> {
    let mut tools = account_tools();
    tools.extend(campaign_tools());
    tools.extend(adset_tools());
    tools.extend(ad_tools());
    tools.extend(insight_tools());
    tools.extend(orchestrator_tools());
    tools
}
