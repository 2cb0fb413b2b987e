use chrono_tz::Tz;

pub const DEFAULT_NAMESPACE: &str = "HotWater";
pub const DEFAULT_TIMEZONE: &str = "US/Mountain";
pub const DEFAULT_CAPACITY_GALLONS: f64 = 50.0;
pub const DEFAULT_SHOWER_LITERS_PER_MINUTE: f64 = 8.4;

/// Configuration for the voice skill
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// Metrics namespace the heater publishes into
    pub namespace: String,
    /// Timezone used to resolve "today", "this week", ...
    pub timezone: Tz,
    /// Tank capacity in gallons
    pub capacity_gallons: f64,
    /// Assumed shower flow rate
    pub shower_liters_per_minute: f64,
}

impl SkillConfig {
    /// Create a new SkillConfig instance from environment variables
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

        let timezone_name =
            lookup("SKILL_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "SKILL_TIMEZONE".to_string(),
                value: timezone_name.clone(),
            })?;

        let capacity_gallons = positive_number(
            &lookup,
            "TANK_CAPACITY_GALLONS",
            DEFAULT_CAPACITY_GALLONS,
        )?;

        let shower_liters_per_minute = positive_number(
            &lookup,
            "SHOWER_LITERS_PER_MINUTE",
            DEFAULT_SHOWER_LITERS_PER_MINUTE,
        )?;

        Ok(SkillConfig {
            namespace,
            timezone,
            capacity_gallons,
            shower_liters_per_minute,
        })
    }
}

fn positive_number(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: '{value}'")]
    InvalidValue { name: String, value: String },
}
