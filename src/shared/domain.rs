use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics published by the water heater controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    LitersUsed,
    InputDegreesC,
    OutputDegreesC,
    LiterDeficit,
    MeasuredInputC,
    MeasuredOutputC,
}

impl MetricName {
    /// Ingestion order
    pub const ALL: [MetricName; 6] = [
        MetricName::LitersUsed,
        MetricName::InputDegreesC,
        MetricName::OutputDegreesC,
        MetricName::LiterDeficit,
        MetricName::MeasuredInputC,
        MetricName::MeasuredOutputC,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LitersUsed => "liters_used",
            MetricName::InputDegreesC => "input_degrees_c",
            MetricName::OutputDegreesC => "output_degrees_c",
            MetricName::LiterDeficit => "liter_deficit",
            MetricName::MeasuredInputC => "measured_input_c",
            MetricName::MeasuredOutputC => "measured_output_c",
        }
    }

    /// Unit recorded alongside the value, if any
    pub fn unit(&self) -> Option<MetricUnit> {
        match self {
            MetricName::LitersUsed => Some(MetricUnit::Count),
            _ => None,
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Count,
}

/// One value ready for ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: MetricName,
    pub value: f64,
    pub unit: Option<MetricUnit>,
    /// Storage resolution in seconds (1 = high resolution)
    pub storage_resolution: i32,
}

impl MetricSample {
    pub fn new(name: MetricName, value: f64) -> Self {
        Self {
            name,
            value,
            unit: name.unit(),
            storage_resolution: 1,
        }
    }
}

/// One device-reported snapshot of water heater readings
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub device_id: i64,
    pub liters_used: f64,
    pub input_degrees_c: f64,
    pub output_degrees_c: f64,
    pub liter_deficit: f64,
    pub measured_input_c: f64,
    pub measured_output_c: f64,
}

impl TelemetryRecord {
    pub fn value(&self, name: MetricName) -> f64 {
        match name {
            MetricName::LitersUsed => self.liters_used,
            MetricName::InputDegreesC => self.input_degrees_c,
            MetricName::OutputDegreesC => self.output_degrees_c,
            MetricName::LiterDeficit => self.liter_deficit,
            MetricName::MeasuredInputC => self.measured_input_c,
            MetricName::MeasuredOutputC => self.measured_output_c,
        }
    }

    /// All six samples in ingestion order
    pub fn samples(&self) -> Vec<MetricSample> {
        MetricName::ALL
            .iter()
            .map(|name| MetricSample::new(*name, self.value(*name)))
            .collect()
    }
}
