use std::{env, time::Duration};

use gateway_common::Secret;
use log::*;

pub const DEFAULT_MIDTRANS_STATUS_URL: &str = "https://api.sandbox.midtrans.com/v2";
pub const DEFAULT_STOREFRONT_URL: &str = "http://127.0.0.1:8081";
/// Upper bound for a single outbound request. Callers may impose a tighter deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Default)]
pub struct MidtransConfig {
    /// Base URL of the Midtrans core API, without a trailing slash. The status of a transaction is fetched from
    /// `{status_url}/{order_id}/status`.
    pub status_url: String,
    pub server_key: Secret<String>,
    pub request_timeout: Duration,
}

impl MidtransConfig {
    pub fn new(status_url: &str, server_key: Secret<String>) -> Self {
        Self { status_url: trim_url(status_url), server_key, request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    pub fn new_from_env_or_default() -> Self {
        let status_url = env::var("GATEWAY_MIDTRANS_STATUS_URL").unwrap_or_else(|_| {
            warn!("🪛️ GATEWAY_MIDTRANS_STATUS_URL not set, using the Midtrans sandbox ({DEFAULT_MIDTRANS_STATUS_URL})");
            DEFAULT_MIDTRANS_STATUS_URL.to_string()
        });
        let server_key = Secret::new(env::var("GATEWAY_MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            error!("🪛️ GATEWAY_MIDTRANS_SERVER_KEY is not set. Payment notifications cannot be verified without it.");
            String::default()
        }));
        Self::new(&status_url, server_key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    /// Base URL of the storefront API, e.g. "http://storefront-api:8081".
    pub base_url: String,
    /// Sent as `x-api-key` on every storefront request.
    pub api_key: Secret<String>,
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    pub fn new(base_url: &str, api_key: Secret<String>) -> Self {
        Self { base_url: trim_url(base_url), api_key, request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = env::var("GATEWAY_STOREFRONT_URL").unwrap_or_else(|_| {
            warn!("🪛️ GATEWAY_STOREFRONT_URL not set, using {DEFAULT_STOREFRONT_URL} as default");
            DEFAULT_STOREFRONT_URL.to_string()
        });
        let api_key = Secret::new(env::var("GATEWAY_STOREFRONT_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ GATEWAY_STOREFRONT_API_KEY not set. Storefront requests will be sent without credentials.");
            String::default()
        }));
        Self::new(&base_url, api_key)
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
