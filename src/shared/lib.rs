// Declare modules at the root level
pub mod alexa;
pub mod capacity;
pub mod domain;
pub mod duration;
pub mod error;
pub mod metrics;
pub mod period;
pub mod telemetry;
pub mod time;
pub mod validators;

// Re-export everything under a shared namespace for external access
pub mod shared {
    pub use super::alexa;
    pub use super::capacity;
    pub use super::domain;
    pub use super::duration;
    pub use super::error;
    pub use super::metrics;
    pub use super::period;
    pub use super::telemetry;
    pub use super::time;
    pub use super::validators;
}

// Also re-export at root for convenience
pub use capacity::*;
pub use domain::*;
pub use duration::*;
pub use error::*;
pub use metrics::*;
pub use period::*;
pub use telemetry::*;
pub use time::*;
pub use validators::*;
