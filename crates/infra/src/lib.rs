//! Infrastructure layer: background forecasting, report delivery, wiring.

pub mod runner;

mod integration_tests;

pub use runner::{
    ForecastReport, ForecastReportSink, ForecastRunner, ForecastRunnerHandle,
    InMemoryForecastReportSink,
};

/// External service clients/adapters (inventory service, artifact blob
/// storage, notification transports).
pub mod external {}
