pub const DEFAULT_NAMESPACE: &str = "HotWater";
pub const DEFAULT_ACCEPTED_DEVICE_ID: i64 = 3512530;

/// Configuration for the telemetry webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Metrics namespace samples are written into
    pub namespace: String,
    /// The one device whose reports are ingested
    pub accepted_device_id: i64,
}

impl WebhookConfig {
    /// Create a new WebhookConfig instance from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let namespace =
            lookup("METRICS_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        if namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "METRICS_NAMESPACE".to_string(),
                value: namespace,
            });
        }

        let accepted_device_id = match lookup("ACCEPTED_DEVICE_ID") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "ACCEPTED_DEVICE_ID".to_string(),
                    value: raw.clone(),
                })?,
            None => DEFAULT_ACCEPTED_DEVICE_ID,
        };

        Ok(WebhookConfig {
            namespace,
            accepted_device_id,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: '{value}'")]
    InvalidValue { name: String, value: String },
}
