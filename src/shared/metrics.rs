//! Metrics store abstraction
//!
//! Handlers talk to the time-series backend through [`MetricsStore`] so the
//! CloudWatch client can be swapped for [`InMemoryMetricsStore`] in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{MetricName, MetricSample};

/// Metrics backend errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("No datapoints for {metric} between {start} and {end}")]
    NoData {
        metric: MetricName,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Metrics backend error: {0}")]
    Backend(String),
}

/// Aggregation applied over each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Sum,
    Maximum,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Sum => "Sum",
            Statistic::Maximum => "Maximum",
        }
    }
}

/// A statistics query over `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric: MetricName,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Aggregation period in seconds
    pub period_seconds: i32,
    pub statistic: Statistic,
}

/// One aggregated value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datapoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: f64,
}

impl Datapoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            value,
        }
    }
}

#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Fetch aggregated datapoints for a query; order is unspecified
    async fn get_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>, MetricsError>;

    /// Record samples under a namespace
    async fn put_samples(
        &self,
        namespace: &str,
        samples: &[MetricSample],
    ) -> Result<(), MetricsError>;
}

/// Value of the most recent datapoint, or `NoData` for an empty result
///
/// Datapoints without a timestamp sort before any timestamped one.
pub fn latest_value(query: &MetricQuery, datapoints: &[Datapoint]) -> Result<f64, MetricsError> {
    datapoints
        .iter()
        .max_by_key(|dp| dp.timestamp)
        .map(|dp| dp.value)
        .ok_or(MetricsError::NoData {
            metric: query.metric,
            start: query.start,
            end: query.end,
        })
}

/// Sum of all datapoints, or `NoData` for an empty result
///
/// A window longer than one aggregation period comes back as several sums.
pub fn total_value(query: &MetricQuery, datapoints: &[Datapoint]) -> Result<f64, MetricsError> {
    if datapoints.is_empty() {
        return Err(MetricsError::NoData {
            metric: query.metric,
            start: query.start,
            end: query.end,
        });
    }
    Ok(datapoints.iter().map(|dp| dp.value).sum())
}

/// In-memory [`MetricsStore`] for tests and local runs
///
/// Queries return datapoints registered with [`with_datapoints`] for the
/// metric and statistic whose timestamps fall inside the window; puts are
/// recorded and can be inspected with [`put_batches`].
///
/// [`with_datapoints`]: InMemoryMetricsStore::with_datapoints
/// [`put_batches`]: InMemoryMetricsStore::put_batches
#[derive(Debug, Default)]
pub struct InMemoryMetricsStore {
    datapoints: Mutex<HashMap<(MetricName, Statistic), Vec<Datapoint>>>,
    puts: Mutex<Vec<(String, Vec<MetricSample>)>>,
    queries: Mutex<Vec<MetricQuery>>,
    failure: Option<String>,
}

impl InMemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with a backend error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_datapoints(
        self,
        metric: MetricName,
        statistic: Statistic,
        datapoints: Vec<Datapoint>,
    ) -> Self {
        if let Ok(mut map) = self.datapoints.lock() {
            map.entry((metric, statistic)).or_default().extend(datapoints);
        }
        self
    }

    pub fn put_batches(&self) -> Vec<(String, Vec<MetricSample>)> {
        self.puts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn queries(&self) -> Vec<MetricQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn check_failure(&self) -> Result<(), MetricsError> {
        match &self.failure {
            Some(message) => Err(MetricsError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetricsStore for InMemoryMetricsStore {
    async fn get_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>, MetricsError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        self.check_failure()?;

        let map = self
            .datapoints
            .lock()
            .map_err(|e| MetricsError::Backend(format!("Store lock poisoned: {}", e)))?;

        Ok(map
            .get(&(query.metric, query.statistic))
            .map(|points| {
                points
                    .iter()
                    .filter(|dp| match dp.timestamp {
                        Some(ts) => ts >= query.start && ts < query.end,
                        None => true,
                    })
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put_samples(
        &self,
        namespace: &str,
        samples: &[MetricSample],
    ) -> Result<(), MetricsError> {
        self.check_failure()?;

        self.puts
            .lock()
            .map_err(|e| MetricsError::Backend(format!("Store lock poisoned: {}", e)))?
            .push((namespace.to_string(), samples.to_vec()));
        Ok(())
    }
}
