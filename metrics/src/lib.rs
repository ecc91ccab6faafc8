use std::{fmt, time::Duration};

use opentelemetry::global;
use opentelemetry_otlp::{ExporterBuildError, MetricExporter, Protocol, WithExportConfig};
use opentelemetry_sdk::{
    Resource,
    error::OTelSdkError,
    metrics::{PeriodicReader, SdkMeterProvider},
};
use strum_macros::EnumIter;
use thiserror::Error;

const SERVICE_NAME: &str = "product-tracker";
const EXPORT_INTERVAL_SECS: u64 = 10;

#[derive(Debug, EnumIter, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Metrics {
    /// Counter for products scraped and stored for the first time
    ProductCreated,
    /// Counter for successful price rechecks
    PriceRechecked,
    /// Counter for fetch or extraction failures
    ScrapeFailed,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metrics::ProductCreated => "PRODUCT_CREATED",
            Metrics::PriceRechecked => "PRICE_RECHECKED",
            Metrics::ScrapeFailed => "SCRAPE_FAILED",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to build OTLP exporter: {0}")]
    Exporter(#[from] ExporterBuildError),
    #[error("Failed to flush meter provider: {0}")]
    Shutdown(#[from] OTelSdkError),
}

/// Handle to the installed meter provider, flushes on [`MetricsHandle::shutdown`].
pub struct MetricsHandle {
    provider: SdkMeterProvider,
}

impl MetricsHandle {
    pub fn shutdown(self) -> Result<(), MetricsError> {
        self.provider.shutdown()?;

        Ok(())
    }
}

/// Exports counters over OTLP/HTTP to `endpoint`.
///
/// Must run before the first `put_metric!`, counters created before that
/// stay bound to the no-op meter.
pub fn install(endpoint: &str) -> Result<MetricsHandle, MetricsError> {
    let exporter = MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(Duration::from_secs(EXPORT_INTERVAL_SECS))
        .build();

    let resource = Resource::builder().with_service_name(SERVICE_NAME).build();

    let provider = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build();

    global::set_meter_provider(provider.clone());

    Ok(MetricsHandle { provider })
}

pub mod _private {
    pub use opentelemetry::KeyValue;

    use std::{collections::HashMap, sync::LazyLock};

    use opentelemetry::{
        global,
        metrics::{Counter, Meter},
    };
    use strum::IntoEnumIterator;

    use crate::{Metrics, SERVICE_NAME};

    static OTEL_METER: LazyLock<Meter> = LazyLock::new(|| global::meter(SERVICE_NAME));

    pub static COUNTERS: LazyLock<HashMap<Metrics, Counter<u64>>> = LazyLock::new(|| {
        let mut mapping: HashMap<Metrics, Counter<u64>> = HashMap::new();

        for metric in crate::Metrics::iter() {
            let metric_meter = OTEL_METER.u64_counter(metric.to_string()).build();

            mapping.insert(metric, metric_meter);
        }

        mapping
    });
}

#[macro_export]
macro_rules! put_metric {
    ($metric_name:expr, $added_value:expr $(, $key:literal => $value:expr)* $(,)?) => {{
        use $crate::_private::{KeyValue, COUNTERS};
        use $crate::Metrics;

        let metric_name: Metrics = $metric_name;
        let added_value: u64 = $added_value;

        let attributes: &[KeyValue] = &[
            $(KeyValue::new($key, $value),)*
        ];

        if let Some(counter) = COUNTERS.get(&metric_name) {
            counter.add(added_value, attributes);
        }
    }};
}
