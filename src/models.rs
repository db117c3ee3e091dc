use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! vendor_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vendor_enum!(
    /// Outcome-based campaign objectives.
    CampaignObjective {
        Awareness => "OUTCOME_AWARENESS",
        Traffic => "OUTCOME_TRAFFIC",
        Engagement => "OUTCOME_ENGAGEMENT",
        Leads => "OUTCOME_LEADS",
        Sales => "OUTCOME_SALES",
        AppPromotion => "OUTCOME_APP_PROMOTION",
    }
);

vendor_enum!(
    /// Configured status shared by campaigns, ad sets and ads.
    ObjectStatus {
        Active => "ACTIVE",
        Paused => "PAUSED",
        Archived => "ARCHIVED",
        Deleted => "DELETED",
    }
);

vendor_enum!(
    CreativeStatus {
        Active => "ACTIVE",
        InProcess => "IN_PROCESS",
        WithIssues => "WITH_ISSUES",
        Deleted => "DELETED",
    }
);

vendor_enum!(
    BidStrategy {
        LowestCostWithoutCap => "LOWEST_COST_WITHOUT_CAP",
        LowestCostWithBidCap => "LOWEST_COST_WITH_BID_CAP",
        CostCap => "COST_CAP",
        LowestCostWithMinRoas => "LOWEST_COST_WITH_MIN_ROAS",
    }
);

vendor_enum!(
    OptimizationGoal {
        None => "NONE",
        AppInstalls => "APP_INSTALLS",
        AdRecallLift => "AD_RECALL_LIFT",
        EngagedUsers => "ENGAGED_USERS",
        EventResponses => "EVENT_RESPONSES",
        Impressions => "IMPRESSIONS",
        LeadGeneration => "LEAD_GENERATION",
        QualityLead => "QUALITY_LEAD",
        LinkClicks => "LINK_CLICKS",
        OffsiteConversions => "OFFSITE_CONVERSIONS",
        PageLikes => "PAGE_LIKES",
        PostEngagement => "POST_ENGAGEMENT",
        QualityCall => "QUALITY_CALL",
        Reach => "REACH",
        LandingPageViews => "LANDING_PAGE_VIEWS",
        VisitInstagramProfile => "VISIT_INSTAGRAM_PROFILE",
        Value => "VALUE",
        Thruplay => "THRUPLAY",
        DerivedEvents => "DERIVED_EVENTS",
        Conversations => "CONVERSATIONS",
    }
);

vendor_enum!(
    BillingEvent {
        AppInstalls => "APP_INSTALLS",
        Clicks => "CLICKS",
        Impressions => "IMPRESSIONS",
        LinkClicks => "LINK_CLICKS",
        None => "NONE",
        OfferClaims => "OFFER_CLAIMS",
        PageLikes => "PAGE_LIKES",
        PostEngagement => "POST_ENGAGEMENT",
        Thruplay => "THRUPLAY",
        Purchase => "PURCHASE",
        ListingInteraction => "LISTING_INTERACTION",
    }
);

vendor_enum!(
    DestinationType {
        Website => "WEBSITE",
        App => "APP",
        Messenger => "MESSENGER",
        ApplinksAutomatic => "APPLINKS_AUTOMATIC",
        Whatsapp => "WHATSAPP",
        InstagramDirect => "INSTAGRAM_DIRECT",
        Facebook => "FACEBOOK",
        OnAd => "ON_AD",
        OnPost => "ON_POST",
        OnVideo => "ON_VIDEO",
        OnPage => "ON_PAGE",
        InstagramProfile => "INSTAGRAM_PROFILE",
    }
);

vendor_enum!(
    CallToActionType {
        LearnMore => "LEARN_MORE",
        ShopNow => "SHOP_NOW",
        SignUp => "SIGN_UP",
        Subscribe => "SUBSCRIBE",
        ContactUs => "CONTACT_US",
        Download => "DOWNLOAD",
        BookTravel => "BOOK_TRAVEL",
        GetQuote => "GET_QUOTE",
        ApplyNow => "APPLY_NOW",
        GetOffer => "GET_OFFER",
        OrderNow => "ORDER_NOW",
        WatchMore => "WATCH_MORE",
        SendMessage => "SEND_MESSAGE",
        WhatsappMessage => "WHATSAPP_MESSAGE",
        CallNow => "CALL_NOW",
        NoButton => "NO_BUTTON",
    }
);

vendor_enum!(
    InsightLevel {
        Ad => "ad",
        Adset => "adset",
        Campaign => "campaign",
        Account => "account",
    }
);

vendor_enum!(
    DatePreset {
        Today => "today",
        Yesterday => "yesterday",
        ThisMonth => "this_month",
        LastMonth => "last_month",
        ThisQuarter => "this_quarter",
        Maximum => "maximum",
        DataMaximum => "data_maximum",
        Last3d => "last_3d",
        Last7d => "last_7d",
        Last14d => "last_14d",
        Last28d => "last_28d",
        Last30d => "last_30d",
        Last90d => "last_90d",
        LastWeekMonSun => "last_week_mon_sun",
        LastWeekSunSat => "last_week_sun_sat",
        LastQuarter => "last_quarter",
        LastYear => "last_year",
        ThisWeekMonToday => "this_week_mon_today",
        ThisWeekSunToday => "this_week_sun_today",
        ThisYear => "this_year",
    }
);

vendor_enum!(
    AttributionEventType {
        ClickThrough => "CLICK_THROUGH",
        ViewThrough => "VIEW_THROUGH",
        EngagedVideoView => "ENGAGED_VIDEO_VIEW",
    }
);

vendor_enum!(
    FrequencyEvent {
        Impressions => "IMPRESSIONS",
        Reach => "REACH",
    }
);

vendor_enum!(
    /// Delivery status as reported by the API, used for list filtering.
    EffectiveStatus {
        Active => "ACTIVE",
        Paused => "PAUSED",
        Deleted => "DELETED",
        Archived => "ARCHIVED",
        InProcess => "IN_PROCESS",
        WithIssues => "WITH_ISSUES",
        CampaignPaused => "CAMPAIGN_PAUSED",
        AdsetPaused => "ADSET_PAUSED",
        PendingReview => "PENDING_REVIEW",
        Disapproved => "DISAPPROVED",
        Preapproved => "PREAPPROVED",
        PendingBillingInfo => "PENDING_BILLING_INFO",
    }
);

vendor_enum!(
    SpecialAdCategory {
        None => "NONE",
        Employment => "EMPLOYMENT",
        Housing => "HOUSING",
        Credit => "CREDIT",
        FinancialProductsServices => "FINANCIAL_PRODUCTS_SERVICES",
        IssuesElectionsPolitics => "ISSUES_ELECTIONS_POLITICS",
        OnlineGamblingAndGaming => "ONLINE_GAMBLING_AND_GAMING",
    }
);

vendor_enum!(
    BuyingType {
        Auction => "AUCTION",
        Reserved => "RESERVED",
    }
);

/// Structured values that must be checked before being sent.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}

/// Monetary amount in the account's minor unit. Callers send either a
/// number or a string; an empty string clears the value on update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawAmount")]
pub enum Amount {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl TryFrom<RawAmount> for Amount {
    type Error = String;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        match raw {
            RawAmount::Integer(n) => Ok(Amount::Integer(n)),
            RawAmount::Decimal(n) if n.fract() != 0.0 => Ok(Amount::Decimal(n)),
            RawAmount::Decimal(n) if (i64::MIN as f64..i64::MAX as f64).contains(&n) => Ok(Amount::Integer(n as i64)),
            RawAmount::Decimal(n) => Err(format!("amount {} is out of range", n)),
            RawAmount::Text(text) => Ok(Amount::Text(text)),
        }
    }
}

impl Amount {
    pub fn to_param(&self) -> String {
        match self {
            Amount::Integer(n) => n.to_string(),
            Amount::Decimal(n) => n.to_string(),
            Amount::Text(text) => text.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityTarget {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyedTarget {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdTarget {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoLocations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<KeyedTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cities: Vec<CityTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zips: Vec<KeyedTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetingAutomation {
    pub advantage_audience: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetingRelaxation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookalike: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_audience: Option<u8>,
}

/// Ad set audience definition. Advanced targeting (flexible specs,
/// exclusions beyond custom audiences) is intentionally absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Targeting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genders: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_locations: Option<GeoLocations>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<IdTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_audiences: Vec<IdTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_custom_audiences: Vec<IdTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publisher_platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facebook_positions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instagram_positions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub device_platforms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targeting_automation: Option<TargetingAutomation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targeting_relaxation_types: Option<TargetingRelaxation>,
}

const MIN_AGE: u8 = 13;
const MAX_AGE: u8 = 65;
const MAX_CITIES: usize = 250;

impl Validate for Targeting {
    fn validate(&self) -> Result<(), String> {
        for (label, age) in [("age_min", self.age_min), ("age_max", self.age_max)] {
            if let Some(age) = age {
                if !(MIN_AGE..=MAX_AGE).contains(&age) {
                    return Err(format!(
                        "targeting.{label} must be between {MIN_AGE} and {MAX_AGE}, got {age}"
                    ));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.age_min, self.age_max) {
            if min > max {
                return Err(format!(
                    "targeting.age_min ({min}) must not exceed targeting.age_max ({max})"
                ));
            }
        }
        if let Some(gender) = self.genders.iter().find(|g| !matches!(**g, 1 | 2)) {
            return Err(format!(
                "targeting.genders accepts 1 (male) or 2 (female), got {gender}"
            ));
        }
        if let Some(geo) = &self.geo_locations {
            if geo.cities.len() > MAX_CITIES {
                return Err(format!(
                    "targeting.geo_locations.cities is limited to {MAX_CITIES} entries"
                ));
            }
            if let Some(kind) = geo
                .location_types
                .iter()
                .find(|t| !matches!(t.as_str(), "home" | "recent"))
            {
                return Err(format!(
                    "targeting.geo_locations.location_types accepts home or recent, got {kind}"
                ));
            }
        }
        if let Some(automation) = &self.targeting_automation {
            if automation.advantage_audience > 1 {
                return Err("targeting.targeting_automation.advantage_audience must be 0 or 1".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromotedObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_store_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_catalog_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_set_id: Option<String>,
}

impl Validate for PromotedObject {
    fn validate(&self) -> Result<(), String> {
        if *self == PromotedObject::default() {
            return Err("promoted_object must set at least one field".to_string());
        }
        if self.application_id.is_some() && self.object_store_url.is_none() {
            return Err("promoted_object.application_id requires object_store_url".to_string());
        }
        if self.custom_event_type.is_some() && self.pixel_id.is_none() {
            return Err("promoted_object.custom_event_type requires pixel_id".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributionSpec {
    pub event_type: AttributionEventType,
    pub window_days: u8,
}

impl Validate for AttributionSpec {
    fn validate(&self) -> Result<(), String> {
        if !(1..=28).contains(&self.window_days) {
            return Err(format!(
                "attribution_spec.window_days must be between 1 and 28, got {}",
                self.window_days
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrequencyControlSpec {
    pub event: FrequencyEvent,
    pub interval_days: u16,
    pub max_frequency: u16,
}

impl Validate for FrequencyControlSpec {
    fn validate(&self) -> Result<(), String> {
        if !(1..=90).contains(&self.interval_days) {
            return Err(format!(
                "frequency_control_specs.interval_days must be between 1 and 90, got {}",
                self.interval_days
            ));
        }
        if self.max_frequency == 0 {
            return Err("frequency_control_specs.max_frequency must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Explicit reporting window, `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeRange {
    pub since: String,
    pub until: String,
}

impl Validate for TimeRange {
    fn validate(&self) -> Result<(), String> {
        let parse = |label: &str, raw: &str| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| format!("time_range.{label} must be YYYY-MM-DD, got {raw}"))
        };
        let since = parse("since", &self.since)?;
        let until = parse("until", &self.until)?;
        if since > until {
            return Err("time_range.since must not be after time_range.until".to_string());
        }
        Ok(())
    }
}
