//! The relay: applies inbound directives to the registry and fans the
//! broadcast payload out to every registered session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::metrics::RelayMetrics;
use crate::protocol::{Directive, BROADCAST_PAYLOAD};
use crate::registry::SessionRegistry;

/// Result of one broadcast fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    pub failed: usize,
}

/// Counters for the relay, exposed via `/stats`.
#[derive(Debug, Default)]
pub struct RelayStats {
    pub messages_handled: AtomicU64,
    pub registrations: AtomicU64,
    pub malformed_registrations: AtomicU64,
    pub broadcasts_delivered: AtomicU64,
    pub broadcasts_failed: AtomicU64,
}

impl RelayStats {
    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            messages_handled: self.messages_handled.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            malformed_registrations: self.malformed_registrations.load(Ordering::Relaxed),
            broadcasts_delivered: self.broadcasts_delivered.load(Ordering::Relaxed),
            broadcasts_failed: self.broadcasts_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelayStatsSnapshot {
    pub messages_handled: u64,
    pub registrations: u64,
    pub malformed_registrations: u64,
    pub broadcasts_delivered: u64,
    pub broadcasts_failed: u64,
}

pub struct PresenceRelay {
    registry: Arc<SessionRegistry>,
    stats: RelayStats,
}

impl PresenceRelay {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            stats: RelayStats::default(),
        }
    }

    pub fn stats(&self) -> RelayStatsSnapshot {
        self.stats.snapshot()
    }

    /// Handle one inbound text frame from a connection.
    ///
    /// A registration directive upserts the registry; every inbound
    /// frame, whatever it matched, then triggers exactly one broadcast
    /// of the literal payload to all registered sessions. Nothing is
    /// ever reported back to the sending connection.
    #[tracing::instrument(
        name = "relay.message",
        skip(self, sender, text),
        fields(connection_id = %connection_id)
    )]
    pub async fn handle_message(
        &self,
        connection_id: Uuid,
        sender: &mpsc::Sender<String>,
        text: &str,
    ) -> FanOut {
        self.stats.messages_handled.fetch_add(1, Ordering::Relaxed);
        RelayMetrics::record_message();

        match Directive::parse(text) {
            Directive::Register {
                identity: Some(identity),
            } => {
                self.registry
                    .register(&identity, connection_id, sender.clone())
                    .await;
                self.stats.registrations.fetch_add(1, Ordering::Relaxed);
                RelayMetrics::record_registration();
                RelayMetrics::set_active_sessions(self.registry.len().await);
            }
            Directive::Register { identity: None } => {
                // Pattern matched but no identity field; skip the upsert.
                self.stats
                    .malformed_registrations
                    .fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    connection_id = %connection_id,
                    "Registration message without identity field ignored"
                );
            }
            Directive::Broadcast | Directive::Unknown => {}
        }

        self.broadcast().await
    }

    /// Send the broadcast payload to every registered session once, in
    /// insertion order. A failed send is logged and counted but never
    /// aborts the fan-out for the remaining sessions.
    pub async fn broadcast(&self) -> FanOut {
        let senders = self.registry.senders().await;
        let mut delivered = 0;
        let mut failed = 0;

        for (identity, sender) in senders {
            match sender.send(BROADCAST_PAYLOAD.to_string()).await {
                Ok(()) => delivered += 1,
                Err(_) => {
                    failed += 1;
                    tracing::warn!(
                        identity = %identity,
                        "Broadcast send failed, connection may be dead"
                    );
                }
            }
        }

        self.stats
            .broadcasts_delivered
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.stats
            .broadcasts_failed
            .fetch_add(failed as u64, Ordering::Relaxed);
        RelayMetrics::record_broadcast(delivered as u64, failed as u64);

        tracing::debug!(delivered = delivered, failed = failed, "Broadcast fan-out");

        FanOut { delivered, failed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_snapshot_reflects_counters() {
        let stats = RelayStats::default();
        stats.messages_handled.fetch_add(3, Ordering::Relaxed);
        stats.broadcasts_delivered.fetch_add(7, Ordering::Relaxed);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.messages_handled, 3);
        assert_eq!(snapshot.broadcasts_delivered, 7);
        assert_eq!(snapshot.broadcasts_failed, 0);
    }
}
