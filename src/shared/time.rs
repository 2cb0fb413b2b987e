use chrono::{DateTime, Utc};

/// Clock trait for abstracting time operations
/// Period resolution and metric windows are computed from `now()`
pub trait Clock: Send + Sync {
    /// Get current time as a UTC timestamp
    fn now(&self) -> DateTime<Utc>;

    /// Get current time as RFC3339 string (for log fields)
    /// Format: "2024-01-15T10:30:00+00:00"
    fn now_rfc3339(&self) -> String {
        self.now().to_rfc3339()
    }
}

/// Production implementation of Clock using system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test implementation of Clock with fixed/controllable time
/// Useful for deterministic testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new FixedClock with the given timestamp
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    /// Create a FixedClock from an RFC3339 string (any offset)
    pub fn from_rfc3339(timestamp_str: &str) -> Result<Self, chrono::ParseError> {
        let timestamp = DateTime::parse_from_rfc3339(timestamp_str)?.with_timezone(&Utc);
        Ok(Self { timestamp })
    }

    /// Advance time by the given number of seconds
    pub fn advance_seconds(&mut self, seconds: i64) {
        self.timestamp += chrono::Duration::seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_now() {
        let clock = SystemClock::new();
        let now = clock.now().timestamp();

        // After 2020-01-01 and before 2100-01-01
        assert!(now > 1577836800);
        assert!(now < 4102444800);
    }

    #[test]
    fn test_system_clock_now_rfc3339() {
        let clock = SystemClock::new();
        let now = clock.now_rfc3339();

        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
        assert!(now.contains('T'));
    }

    #[test]
    fn test_fixed_clock_from_rfc3339_with_offset() {
        let clock = FixedClock::from_rfc3339("2024-03-15T10:00:00-06:00").unwrap();

        assert_eq!(clock.now_rfc3339(), "2024-03-15T16:00:00+00:00");
    }

    #[test]
    fn test_fixed_clock_advance_seconds() {
        let mut clock = FixedClock::from_rfc3339("2024-01-15T10:30:00Z").unwrap();
        let initial = clock.now().timestamp();

        clock.advance_seconds(3600);

        assert_eq!(clock.now().timestamp(), initial + 3600);
    }

    #[test]
    fn test_fixed_clock_deterministic() {
        let clock = FixedClock::from_rfc3339("2024-01-15T10:30:00Z").unwrap();

        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_clock_trait_object() {
        let system_clock: Box<dyn Clock> = Box::new(SystemClock::new());
        let fixed_clock: Box<dyn Clock> =
            Box::new(FixedClock::from_rfc3339("2024-01-15T10:30:00Z").unwrap());

        let _ = system_clock.now();
        assert_eq!(fixed_clock.now().timestamp(), 1705314600);
    }
}
