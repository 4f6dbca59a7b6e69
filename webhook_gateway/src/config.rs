use std::env;

use callback_engine::ReconciliationOptions;
use chrono::Duration;
use gateway_clients::{MidtransConfig, StorefrontConfig};
use gateway_common::{parse_boolean_flag, Secret};
use log::*;

use crate::errors::ServerError;

const DEFAULT_GATEWAY_HOST: &str = "127.0.0.1";
const DEFAULT_GATEWAY_PORT: u16 = 8080;
const DEFAULT_KEEP_ALIVE: Duration = Duration::seconds(75);
const DEFAULT_CLIENT_REQUEST_TIMEOUT: Duration = Duration::seconds(30);
const DEFAULT_MIDTRANS_DEADLINE: Duration = Duration::seconds(15);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// If true, the X-Forwarded-For header will be used to determine the caller's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the caller's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    pub keep_alive: Duration,
    /// The time a client has to send its request head before the connection is dropped.
    pub client_request_timeout: Duration,
    pub storefront: StorefrontConfig,
    pub mileapp: MileAppConfig,
    pub shoptree: ShoptreeConfig,
    pub midtrans: MidtransSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GATEWAY_HOST.to_string(),
            port: DEFAULT_GATEWAY_PORT,
            use_x_forwarded_for: false,
            use_forwarded: false,
            keep_alive: DEFAULT_KEEP_ALIVE,
            client_request_timeout: DEFAULT_CLIENT_REQUEST_TIMEOUT,
            storefront: StorefrontConfig::default(),
            mileapp: MileAppConfig::default(),
            shoptree: ShoptreeConfig::default(),
            midtrans: MidtransSettings::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("GATEWAY_HOST").ok().unwrap_or_else(|| DEFAULT_GATEWAY_HOST.into());
        let port = env::var("GATEWAY_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for GATEWAY_PORT. {e} Using the default, {DEFAULT_GATEWAY_PORT}, \
                         instead."
                    );
                    DEFAULT_GATEWAY_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_GATEWAY_PORT);
        let use_x_forwarded_for = parse_boolean_flag(env::var("GATEWAY_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("GATEWAY_USE_FORWARDED").ok(), false);
        let keep_alive = duration_from_env("GATEWAY_KEEP_ALIVE_SECS", DEFAULT_KEEP_ALIVE);
        let client_request_timeout =
            duration_from_env("GATEWAY_CLIENT_REQUEST_TIMEOUT_SECS", DEFAULT_CLIENT_REQUEST_TIMEOUT);
        let storefront = StorefrontConfig::new_from_env_or_default();
        let mileapp = MileAppConfig::from_env_or_default();
        let shoptree = ShoptreeConfig::from_env_or_default();
        let midtrans = MidtransSettings::from_env_or_default();
        Self {
            host,
            port,
            use_x_forwarded_for,
            use_forwarded,
            keep_alive,
            client_request_timeout,
            storefront,
            mileapp,
            shoptree,
            midtrans,
        }
    }

    /// Checks the settings the server cannot run without.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.shoptree.auth_key.is_empty() {
            return Err(ServerError::ConfigurationError("GATEWAY_SHOPTREE_AUTH_KEY must be set".into()));
        }
        if self.midtrans.api.server_key.is_empty() {
            return Err(ServerError::ConfigurationError("GATEWAY_MIDTRANS_SERVER_KEY must be set".into()));
        }
        if self.midtrans.deadline <= Duration::zero() {
            return Err(ServerError::ConfigurationError(
                "GATEWAY_MIDTRANS_REQUEST_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }
        if self.mileapp.auth_key.is_empty() {
            warn!("🚨️ GATEWAY_MILEAPP_AUTH_KEY is empty. Every MileApp callback will be rejected.");
        }
        Ok(())
    }
}

//-------------------------------------------------  MileAppConfig  ----------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct MileAppConfig {
    /// The value MileApp sends in the `x-api-key` header.
    pub auth_key: Secret<String>,
}

impl MileAppConfig {
    pub fn from_env_or_default() -> Self {
        let auth_key = env::var("GATEWAY_MILEAPP_AUTH_KEY").ok().unwrap_or_else(|| {
            error!("🪛️ GATEWAY_MILEAPP_AUTH_KEY is not set. Please set it to the API key configured in MileApp.");
            String::default()
        });
        Self { auth_key: Secret::new(auth_key) }
    }
}

//-------------------------------------------------  ShoptreeConfig  ---------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct ShoptreeConfig {
    /// The value Shoptree sends in the `X-Client-Api-Key` header.
    pub auth_key: Secret<String>,
}

impl ShoptreeConfig {
    pub fn from_env_or_default() -> Self {
        let auth_key = env::var("GATEWAY_SHOPTREE_AUTH_KEY").ok().unwrap_or_else(|| {
            error!("🪛️ GATEWAY_SHOPTREE_AUTH_KEY is not set. Please set it to the API key configured in Shoptree.");
            String::default()
        });
        Self { auth_key: Secret::new(auth_key) }
    }
}

//-------------------------------------------------  MidtransSettings  -------------------------------------------------
#[derive(Clone, Debug)]
pub struct MidtransSettings {
    pub api: MidtransConfig,
    /// Deadline for processing one payment notification, including every outbound call it makes.
    pub deadline: Duration,
    /// When true, a paid transaction that fraud detection did not accept only fails the payment task.
    pub fraud_short_circuit: bool,
}

impl Default for MidtransSettings {
    fn default() -> Self {
        Self { api: MidtransConfig::default(), deadline: DEFAULT_MIDTRANS_DEADLINE, fraud_short_circuit: false }
    }
}

impl MidtransSettings {
    pub fn from_env_or_default() -> Self {
        let api = MidtransConfig::new_from_env_or_default();
        let deadline = duration_from_env("GATEWAY_MIDTRANS_REQUEST_TIMEOUT_SECS", DEFAULT_MIDTRANS_DEADLINE);
        let fraud_short_circuit = parse_boolean_flag(env::var("GATEWAY_MIDTRANS_FRAUD_SHORT_CIRCUIT").ok(), false);
        if fraud_short_circuit {
            info!("🪛️ Payments flagged by fraud detection will only mark the payment task as failed.");
        }
        Self { api, deadline, fraud_short_circuit }
    }

    pub fn reconciliation_options(&self) -> Result<ReconciliationOptions, ServerError> {
        let deadline = self
            .deadline
            .to_std()
            .map_err(|e| ServerError::ConfigurationError(format!("Invalid Midtrans request timeout. {e}")))?;
        Ok(ReconciliationOptions { deadline, fraud_short_circuit: self.fraud_short_circuit })
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The subset of the configuration that route handlers need. Secrets are deliberately excluded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}

fn duration_from_env(name: &str, default: Duration) -> Duration {
    env::var(name)
        .map_err(|_| info!("🪛️ {name} is not set. Using the default value of {}s.", default.num_seconds()))
        .and_then(|s| {
            s.parse::<i64>()
                .map(Duration::seconds)
                .map_err(|e| warn!("🪛️ Invalid configuration value for {name}. {e}"))
        })
        .ok()
        .unwrap_or(default)
}
