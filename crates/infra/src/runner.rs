//! Background fleet-forecast runner.
//!
//! Training and model I/O are blocking, potentially slow operations, so
//! fleet forecasting runs on a dedicated thread rather than a
//! request-handling path. The runner re-forecasts on a fixed interval and
//! on demand (coalesced triggers after inventory updates), delivers each
//! report to a sink, and publishes low-stock alerts for items at or below
//! their minimum.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};

use stockcast_events::{
    EventBus, InventoryNotification, LowStockAlert, NotificationEnvelope,
};
use stockcast_forecast::{ForecastResult, ForecastingEngine, ModelStore};
use stockcast_inventory::{InventoryItem, InventorySource};

/// One fleet-wide forecast, ordered by descending risk severity.
pub type ForecastReport = Vec<ForecastResult>;

/// Sink for completed forecast reports.
///
/// Deliberately separate from the notification stream: reports are
/// analytics output for presentation layers, not inventory events.
pub trait ForecastReportSink: Send + Sync + 'static {
    fn emit(&self, report: ForecastReport);
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryForecastReportSink {
    inner: Mutex<Vec<ForecastReport>>,
}

impl InMemoryForecastReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ForecastReport> {
        self.inner.lock().unwrap().clone()
    }

    pub fn latest(&self) -> Option<ForecastReport> {
        self.inner.lock().unwrap().last().cloned()
    }
}

impl ForecastReportSink for InMemoryForecastReportSink {
    fn emit(&self, report: ForecastReport) {
        self.inner.lock().unwrap().push(report);
    }
}

/// Config for the forecast runner.
#[derive(Debug, Clone)]
pub struct ForecastRunner {
    pub interval: Duration,
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for ForecastRunner {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            max_retries: 5,
            base_backoff: Duration::from_millis(250),
        }
    }
}

/// Handle for the running forecast loop (shutdown + trigger hook).
#[derive(Debug)]
pub struct ForecastRunnerHandle {
    shutdown: mpsc::Sender<()>,
    trigger: mpsc::SyncSender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl ForecastRunnerHandle {
    /// Event-trigger hook: call after a stock-affecting mutation.
    ///
    /// Backpressure: triggers are coalesced (bounded queue). If a run is
    /// already pending, this becomes a no-op.
    pub fn trigger(&self) {
        // Coalesce: channel capacity=1; ignore if already full.
        let _ = self.trigger.try_send(());
    }

    /// Gracefully stop the runner thread.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

impl ForecastRunner {
    /// Spawn the forecast loop.
    ///
    /// - Schedule: runs every `interval`, once immediately on startup
    /// - Event-trigger: call `handle.trigger()` after inventory updates
    /// - Failures: logged + retried with bounded exponential backoff;
    ///   never propagate out of the thread
    pub fn spawn<S, I, K, B>(
        &self,
        name: &'static str,
        engine: Arc<ForecastingEngine<S>>,
        source: Arc<I>,
        sink: Arc<K>,
        notifications: B,
    ) -> ForecastRunnerHandle
    where
        S: ModelStore + 'static,
        I: InventorySource + 'static,
        K: ForecastReportSink,
        B: EventBus<NotificationEnvelope> + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let (trigger_tx, trigger_rx) = mpsc::sync_channel::<()>(1);

        let cfg = self.clone();
        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                runner_loop(name, cfg, shutdown_rx, trigger_rx, engine, source, sink, notifications)
            })
            .expect("failed to spawn forecast runner thread");

        ForecastRunnerHandle {
            shutdown: shutdown_tx,
            trigger: trigger_tx,
            join: Some(join),
        }
    }
}

fn runner_loop<S, I, K, B>(
    name: &'static str,
    cfg: ForecastRunner,
    shutdown_rx: mpsc::Receiver<()>,
    trigger_rx: mpsc::Receiver<()>,
    engine: Arc<ForecastingEngine<S>>,
    source: Arc<I>,
    sink: Arc<K>,
    notifications: B,
) where
    S: ModelStore + 'static,
    I: InventorySource + 'static,
    K: ForecastReportSink,
    B: EventBus<NotificationEnvelope> + 'static,
{
    info!(runner = name, "forecast runner started");

    let mut next_tick = Instant::now() + cfg.interval;
    let mut pending = true; // run once on startup
    let mut failures: u32 = 0;
    let mut backoff_until: Option<Instant> = None;

    loop {
        // Shutdown has priority.
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        let now = Instant::now();
        if now >= next_tick {
            pending = true;
            // Keep a stable cadence even if we were delayed.
            while next_tick <= now {
                next_tick += cfg.interval;
            }
        }

        // Event-trigger: non-blocking drain to coalesce multiple triggers.
        while trigger_rx.try_recv().is_ok() {
            pending = true;
        }

        // Backoff gate.
        if let Some(until) = backoff_until {
            if Instant::now() < until {
                thread::sleep(Duration::from_millis(50));
                continue;
            }
            backoff_until = None;
        }

        if !pending {
            // Wait until next tick or trigger or shutdown.
            let sleep_for = next_tick
                .saturating_duration_since(Instant::now())
                .min(Duration::from_millis(250));
            thread::sleep(sleep_for);
            continue;
        }

        pending = false;

        match forecast_once(&engine, &source, &notifications) {
            Ok(report) => {
                info!(runner = name, items = report.len(), "forecast report ready");
                failures = 0;
                sink.emit(report);
            }
            Err(e) => {
                warn!(runner = name, error = %e, "fleet forecast failed");
                failures += 1;
                if failures <= cfg.max_retries {
                    pending = true;
                    backoff_until = Some(Instant::now() + backoff(cfg.base_backoff, failures));
                } else {
                    failures = 0;
                }
            }
        }
    }

    info!(runner = name, "forecast runner stopped");
}

/// One full pass: snapshot inventory, forecast the fleet, alert on items
/// at or below their minimum stock.
fn forecast_once<S, I, B>(
    engine: &ForecastingEngine<S>,
    source: &Arc<I>,
    notifications: &B,
) -> Result<ForecastReport, Box<dyn std::error::Error>>
where
    S: ModelStore + 'static,
    I: InventorySource + 'static,
    B: EventBus<NotificationEnvelope>,
{
    let items = source.list_items()?;
    let report = engine.all_forecasts(&items)?;

    for item in items.iter().filter(|i| i.is_low_stock()) {
        publish_low_stock(notifications, item);
    }

    Ok(report)
}

fn publish_low_stock<B>(notifications: &B, item: &InventoryItem)
where
    B: EventBus<NotificationEnvelope>,
{
    let alert = InventoryNotification::LowStockAlert(LowStockAlert {
        store_id: item.store_id.clone(),
        product_name: item.product_name.clone(),
        current_stock: item.current_stock,
        minimum_stock: item.minimum_stock,
        occurred_at: Utc::now(),
    });

    // Alerting is best-effort; a dropped notification must not fail the
    // forecast pass.
    if let Err(e) = notifications.publish(NotificationEnvelope::new(alert)) {
        warn!(product = %item.product_id, error = ?e, "low-stock alert not published");
    }
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    // Exponential backoff: base * 2^(attempt-1), capped.
    let pow = 1u32 << attempt.saturating_sub(1).min(10);
    let ms = base.as_millis().saturating_mul(pow as u128);
    Duration::from_millis(ms.min(10_000) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let base = Duration::from_millis(250);
        assert_eq!(backoff(base, 1), Duration::from_millis(250));
        assert_eq!(backoff(base, 2), Duration::from_millis(500));
        assert_eq!(backoff(base, 3), Duration::from_millis(1000));
        assert_eq!(backoff(base, 20), Duration::from_millis(10_000));
    }
}
