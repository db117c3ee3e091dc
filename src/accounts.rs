use crate::constants::{FB_ACCOUNT_FIELDS, FB_ACCOUNT_LIST_FIELDS, FB_PIXEL_FIELDS};
use crate::facebook::{GraphApi, HttpMethod, Params};
use crate::tools::{default_limit, non_blank, normalize_account_id, required, ToolError};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct GetAdAccountsArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub async fn get_ad_accounts(api: &dyn GraphApi, args: GetAdAccountsArgs) -> Result<Value, ToolError> {
    let user_id = non_blank(&args.user_id).unwrap_or("me");
    let endpoint = format!("{}/adaccounts", user_id);

    let mut params = Params::new();
    params.insert("fields".to_string(), FB_ACCOUNT_LIST_FIELDS.to_string());
    params.insert("limit".to_string(), args.limit.to_string());

    api.request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request("Failed to get ad accounts", e, &params))
}

#[derive(Debug, Deserialize)]
pub struct AccountArgs {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

pub async fn get_account_info(api: &dyn GraphApi, args: AccountArgs) -> Result<Value, ToolError> {
    let account_id = normalize_account_id(required(&args.account_id, "No account ID provided")?);

    let mut params = Params::new();
    params.insert("fields".to_string(), FB_ACCOUNT_FIELDS.to_string());

    api.request(&account_id, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request(format!("Failed to get account {}", account_id), e, &params))
}

pub async fn get_account_pixels(api: &dyn GraphApi, args: AccountArgs) -> Result<Value, ToolError> {
    let account_id = normalize_account_id(required(&args.account_id, "No account ID provided")?);
    let endpoint = format!("{}/adspixels", account_id);

    let mut params = Params::new();
    params.insert("fields".to_string(), FB_PIXEL_FIELDS.to_string());

    api.request(&endpoint, args.access_token.as_deref(), &params, HttpMethod::Get)
        .await
        .map_err(|e| ToolError::request("Failed to get account pixels", e, &params))
}
