//! End-to-end wiring tests for the forecasting pipeline.
//!
//! Inventory snapshot → engine (train-on-demand against a file artifact)
//! → runner → report sink + low-stock notifications.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use anyhow::Result;

    use stockcast_core::{ProductId, StoreId};
    use stockcast_events::{
        EventBus, INVENTORY_CHANNEL, InMemoryEventBus, InventoryNotification,
        NotificationEnvelope,
    };
    use stockcast_forecast::{FileModelStore, ForecastingEngine};
    use stockcast_inventory::{InMemoryInventoryStore, InventoryItem};

    use crate::runner::{ForecastRunner, InMemoryForecastReportSink};

    fn item(product: &str, stock: u32, minimum: u32, price: f64) -> InventoryItem {
        InventoryItem::new(
            StoreId::new("STORE001").unwrap(),
            ProductId::new(product).unwrap(),
            format!("{product} name"),
            stock,
            minimum,
            price,
            "general",
        )
        .unwrap()
    }

    fn wait_for<T>(timeout: Duration, mut probe: impl FnMut() -> Option<T>) -> Option<T> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(value) = probe() {
                return Some(value);
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn runner_delivers_reports_and_low_stock_alerts() -> Result<()> {
        stockcast_observability::tracing::init_compact();

        let dir = tempfile::tempdir()?;
        let engine = Arc::new(ForecastingEngine::new(FileModelStore::new(
            dir.path().join("demand-model.json"),
        )));

        let inventory = Arc::new(InMemoryInventoryStore::new());
        inventory.upsert(item("SKU-1", 2, 10, 19.99))?; // at-risk and low
        inventory.upsert(item("SKU-2", 500, 10, 49.99))?;

        let sink = Arc::new(InMemoryForecastReportSink::new());
        let bus = Arc::new(InMemoryEventBus::<NotificationEnvelope>::new());
        let alerts = bus.subscribe();

        let runner = ForecastRunner {
            interval: Duration::from_secs(3600),
            ..ForecastRunner::default()
        };
        let handle = runner.spawn(
            "forecast-runner-test",
            Arc::clone(&engine),
            Arc::clone(&inventory),
            Arc::clone(&sink),
            Arc::clone(&bus),
        );

        // Startup pass: one report covering the whole fleet, ordered by
        // descending severity.
        let report = wait_for(Duration::from_secs(10), || sink.latest())
            .expect("no report within deadline");
        assert_eq!(report.len(), 2);
        for pair in report.windows(2) {
            assert!(pair[0].risk_level >= pair[1].risk_level);
        }

        // The low item raised an alert on the shared channel.
        let envelope = alerts.recv_timeout(Duration::from_secs(5))?;
        assert_eq!(envelope.channel(), INVENTORY_CHANNEL);
        match envelope.payload() {
            InventoryNotification::LowStockAlert(alert) => {
                assert_eq!(alert.product_name, "SKU-1 name");
                assert_eq!(alert.current_stock, 2);
                assert_eq!(alert.minimum_stock, 10);
            }
            other => panic!("expected low-stock alert, got {other:?}"),
        }

        // A stock mutation plus trigger produces a fresh report without
        // waiting for the interval.
        inventory.update_stock(
            &StoreId::new("STORE001").unwrap(),
            &ProductId::new("SKU-2").unwrap(),
            1,
        )?;
        handle.trigger();

        let reports = wait_for(Duration::from_secs(10), || {
            let reports = sink.reports();
            (reports.len() >= 2).then_some(reports)
        })
        .expect("no triggered report within deadline");
        let latest = reports.last().unwrap();
        assert_eq!(latest.len(), 2);

        handle.shutdown();
        Ok(())
    }

    #[test]
    fn persisted_artifact_is_shared_across_engine_instances() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("demand-model.json");

        let first = ForecastingEngine::new(FileModelStore::new(&path));
        let trained = first.ensure_model()?;

        // A second engine over the same artifact loads instead of training.
        let second = ForecastingEngine::new(FileModelStore::new(&path));
        let loaded = second.ensure_model()?;

        assert_eq!(*trained, *loaded);
        Ok(())
    }
}
