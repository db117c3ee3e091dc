// API Versions
pub const FACEBOOK_API_VERSION: &str = "v22.0";

// API Base URLs
pub const FACEBOOK_BASE_URL: &str = "https://graph.facebook.com";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// MCP server identity
pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";
pub const MCP_SERVER_NAME: &str = "meta-ads-mcp";
pub const MCP_SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// Graph API Fields
pub const FB_ACCOUNT_LIST_FIELDS: &str = "id,name,account_id,account_status,amount_spent,balance,currency,age,business_city,business_country_code";
pub const FB_ACCOUNT_FIELDS: &str = "id,name,account_id,account_status,amount_spent,balance,currency,age,funding_source_details,business_city,business_country_code,timezone_name,owner";
pub const FB_PIXEL_FIELDS: &str = "id,name,last_fired_time";

pub const FB_CAMPAIGN_LIST_FIELDS: &str = "id,name,objective,status,daily_budget,lifetime_budget,buying_type,start_time,stop_time,created_time,updated_time,bid_strategy,source_campaign_id,budget_remaining,spend_cap";
pub const FB_CAMPAIGN_DETAIL_FIELDS: &str = "id,name,objective,status,daily_budget,lifetime_budget,buying_type,start_time,stop_time,created_time,updated_time,bid_strategy,special_ad_categories,special_ad_category_country,budget_remaining,configured_status,source_campaign_id,spend_cap";

pub const FB_ADSET_LIST_FIELDS: &str = "id,name,campaign_id,status,daily_budget,lifetime_budget,targeting,bid_amount,bid_strategy,optimization_goal,billing_event,start_time,end_time,created_time,updated_time,frequency_control_specs{event,interval_days,max_frequency},promoted_object,learning_stage_info";
pub const FB_ADSET_DETAIL_FIELDS: &str = "id,name,campaign_id,status,frequency_control_specs{event,interval_days,max_frequency},daily_budget,lifetime_budget,targeting,bid_amount,bid_strategy,optimization_goal,billing_event,start_time,end_time,created_time,updated_time,attribution_spec,destination_type,promoted_object,pacing_type,budget_remaining,dsa_beneficiary";

pub const FB_AD_FIELDS: &str = "id,name,adset_id,campaign_id,status,effective_status,creative,created_time,updated_time,bid_amount,conversion_domain,tracking_specs";
pub const FB_CREATIVE_FIELDS: &str = "id,name,status,thumbnail_url,image_url,image_hash,object_story_spec,asset_feed_spec,url_tags,link_url";

pub const FB_INSIGHTS_FIELDS: &str = "account_id,account_name,campaign_id,campaign_name,adset_id,adset_name,ad_id,ad_name,impressions,clicks,spend,cpc,cpm,ctr,reach,frequency,actions,action_values,conversions,unique_clicks,cost_per_action_type";

// Insights aggregation
pub const LEAD_ACTION_TYPE: &str = "lead";
pub const LANDING_PAGE_VIEW_ACTION_TYPE: &str = "landing_page_view";
pub const CAMPAIGN_COUNT_LIMIT: u32 = 1000;
pub const MAX_INSIGHT_PAGES: usize = 25;

pub const DEFAULT_CREATIVE_LINK: &str = "https://facebook.com";
