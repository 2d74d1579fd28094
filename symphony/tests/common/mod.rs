// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Once};

use symphony::config::Config;
use symphony::fixtures::FixtureSet;
use symphony::models::MetricRecord;
use symphony::ChatSession;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Session over the dashboard databases with every delay removed
pub fn dashboard_session() -> ChatSession {
    init_test_logger();
    ChatSession::new(Config::immediate(), Arc::new(FixtureSet::dashboard()))
}

pub fn record(name: &str, health: f64) -> MetricRecord {
    MetricRecord {
        health,
        ..MetricRecord::new(name)
    }
}
