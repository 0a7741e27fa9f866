//! Client construction for OpenAI-compatible endpoints.

use crate::config::ApiSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured endpoint, authenticated with `api_key`.
///
/// Requests time out after `api.timeout_seconds`.
pub fn create_client(api: &ApiSettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(api.timeout_seconds))
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api.base_url.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
