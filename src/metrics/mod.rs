//! Prometheus metrics for the presence relay.

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "presence_relay";

lazy_static! {
    /// WebSocket connections accepted since startup
    pub static ref CONNECTIONS_OPENED: IntCounter = register_int_counter!(
        format!("{}_connections_opened_total", METRIC_PREFIX),
        "WebSocket connections accepted since startup"
    ).unwrap();

    /// WebSocket connections closed since startup
    pub static ref CONNECTIONS_CLOSED: IntCounter = register_int_counter!(
        format!("{}_connections_closed_total", METRIC_PREFIX),
        "WebSocket connections closed since startup"
    ).unwrap();

    /// Currently registered sessions
    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_sessions_active", METRIC_PREFIX),
        "Currently registered sessions"
    ).unwrap();

    /// Inbound text frames handled by the relay
    pub static ref MESSAGES_RECEIVED: IntCounter = register_int_counter!(
        format!("{}_messages_received_total", METRIC_PREFIX),
        "Inbound text frames handled by the relay"
    ).unwrap();

    /// Registration directives applied
    pub static ref REGISTRATIONS: IntCounter = register_int_counter!(
        format!("{}_registrations_total", METRIC_PREFIX),
        "Registration directives applied"
    ).unwrap();

    /// Broadcast payloads delivered to sessions
    pub static ref BROADCASTS_DELIVERED: IntCounter = register_int_counter!(
        format!("{}_broadcasts_delivered_total", METRIC_PREFIX),
        "Broadcast payloads delivered to sessions"
    ).unwrap();

    /// Broadcast payloads that failed to send
    pub static ref BROADCASTS_FAILED: IntCounter = register_int_counter!(
        format!("{}_broadcasts_failed_total", METRIC_PREFIX),
        "Broadcast payloads that failed to send"
    ).unwrap();
}

/// Helpers grouping the relay's metric updates.
pub struct RelayMetrics;

impl RelayMetrics {
    pub fn record_message() {
        MESSAGES_RECEIVED.inc();
    }

    pub fn record_registration() {
        REGISTRATIONS.inc();
    }

    pub fn record_broadcast(delivered: u64, failed: u64) {
        BROADCASTS_DELIVERED.inc_by(delivered);
        BROADCASTS_FAILED.inc_by(failed);
    }

    pub fn set_active_sessions(count: usize) {
        SESSIONS_ACTIVE.set(count as i64);
    }
}

/// Encode all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_text_exposition() {
        RelayMetrics::record_message();
        let text = encode_metrics().unwrap();
        assert!(text.contains("presence_relay_messages_received_total"));
    }
}
