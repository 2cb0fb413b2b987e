use async_trait::async_trait;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{self as cw, MetricDatum, StandardUnit};
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

use hot_water::{
    Datapoint, MetricQuery, MetricSample, MetricUnit, MetricsError, MetricsStore, Statistic,
};

/// [`MetricsStore`] backed by Amazon CloudWatch
#[derive(Debug, Clone)]
pub struct CloudWatchStore {
    client: CloudWatchClient,
}

impl CloudWatchStore {
    pub fn new(client: CloudWatchClient) -> Self {
        Self { client }
    }

    /// Create a client from the Lambda environment's AWS configuration
    pub async fn from_env() -> Self {
        // Load AWS configuration with behavior version
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        // Voice responses must come back within 8 seconds
        let cloudwatch_config = aws_sdk_cloudwatch::config::Builder::from(&aws_config)
            .timeout_config(
                aws_sdk_cloudwatch::config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(6))
                    .operation_attempt_timeout(Duration::from_secs(3))
                    .build(),
            )
            .build();

        Self::new(CloudWatchClient::from_conf(cloudwatch_config))
    }

    /// Create a store pointing at a local endpoint with static credentials
    #[cfg(test)]
    pub fn for_test(endpoint_url: &str) -> Self {
        use aws_sdk_cloudwatch::config::{BehaviorVersion, Credentials, Region};

        let credentials =
            Credentials::new("test_access_key", "test_secret_key", None, None, "test");

        let cloudwatch_config = aws_sdk_cloudwatch::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(endpoint_url)
            .build();

        Self::new(CloudWatchClient::from_conf(cloudwatch_config))
    }
}

#[async_trait]
impl MetricsStore for CloudWatchStore {
    async fn get_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>, MetricsError> {
        debug!(
            namespace = %query.namespace,
            metric = %query.metric,
            start = %query.start,
            end = %query.end,
            statistic = query.statistic.as_str(),
            "GetMetricStatistics"
        );

        let output = self
            .client
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(query.metric.as_str())
            .start_time(to_aws_datetime(query.start))
            .end_time(to_aws_datetime(query.end))
            .period(query.period_seconds)
            .statistics(to_cloudwatch_statistic(query.statistic))
            .send()
            .await
            .map_err(|e| MetricsError::Backend(format!("{:?}", e)))?;

        Ok(output
            .datapoints()
            .iter()
            .filter_map(|dp| {
                let value = match query.statistic {
                    Statistic::Sum => dp.sum(),
                    Statistic::Maximum => dp.maximum(),
                }?;
                Some(Datapoint {
                    timestamp: dp.timestamp().and_then(from_aws_datetime),
                    value,
                })
            })
            .collect())
    }

    async fn put_samples(
        &self,
        namespace: &str,
        samples: &[MetricSample],
    ) -> Result<(), MetricsError> {
        // PutMetricData rejects an empty batch
        if samples.is_empty() {
            return Ok(());
        }

        let metric_data: Vec<MetricDatum> = samples.iter().map(to_metric_datum).collect();

        self.client
            .put_metric_data()
            .namespace(namespace)
            .set_metric_data(Some(metric_data))
            .send()
            .await
            .map_err(|e| MetricsError::Backend(format!("{:?}", e)))?;

        Ok(())
    }
}

fn to_cloudwatch_statistic(statistic: Statistic) -> cw::Statistic {
    match statistic {
        Statistic::Sum => cw::Statistic::Sum,
        Statistic::Maximum => cw::Statistic::Maximum,
    }
}

fn to_standard_unit(unit: MetricUnit) -> StandardUnit {
    match unit {
        MetricUnit::Count => StandardUnit::Count,
    }
}

fn to_metric_datum(sample: &MetricSample) -> MetricDatum {
    MetricDatum::builder()
        .metric_name(sample.name.as_str())
        .value(sample.value)
        .storage_resolution(sample.storage_resolution)
        .set_unit(sample.unit.map(to_standard_unit))
        .build()
}

fn to_aws_datetime(timestamp: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_millis(timestamp.timestamp_millis())
}

fn from_aws_datetime(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}
