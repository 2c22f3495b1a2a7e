//! In-memory session registry: identity -> live connection.

mod types;

pub use types::{SessionHandle, SessionRecord};

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

/// Ordered collection of session records, unique by identity.
///
/// All access goes through one async lock so the one-record-per-identity
/// invariant holds under concurrent connection tasks. Broadcast order is
/// insertion order.
pub struct SessionRegistry {
    sessions: Mutex<Vec<SessionRecord>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Register an identity for a connection.
    ///
    /// If the identity is already known, its connection reference is
    /// replaced in place (reconnect with a new socket keeps the record's
    /// position). Otherwise a new record is appended.
    pub async fn register(&self, identity: &str, connection_id: Uuid, sender: mpsc::Sender<String>) {
        let mut sessions = self.sessions.lock().await;

        if let Some(record) = sessions.iter_mut().find(|r| r.identity == identity) {
            record.connection_id = connection_id;
            record.sender = sender;
            tracing::info!(
                identity = %identity,
                connection_id = %connection_id,
                "Session re-registered on new connection"
            );
            return;
        }

        sessions.push(SessionRecord {
            identity: identity.to_string(),
            connection_id,
            sender,
            registered_at: Utc::now(),
        });
        tracing::info!(
            identity = %identity,
            connection_id = %connection_id,
            "Session registered"
        );
    }

    /// Remove every record bound to a closed connection.
    ///
    /// One socket may have registered several identities, so all of its
    /// records go at once. Keyed by connection id: if an identity has
    /// since re-registered on a newer connection, the stale socket's
    /// teardown leaves that record alone. Returns the removed identities.
    pub async fn remove_connection(&self, connection_id: Uuid) -> Vec<String> {
        let mut sessions = self.sessions.lock().await;
        let mut removed = Vec::new();
        sessions.retain(|r| {
            if r.connection_id == connection_id {
                removed.push(r.identity.clone());
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            tracing::info!(
                identities = ?removed,
                connection_id = %connection_id,
                "Sessions removed on disconnect"
            );
        }
        removed
    }

    /// Snapshot the outbound senders of all sessions, in insertion order.
    pub async fn senders(&self) -> Vec<(String, mpsc::Sender<String>)> {
        self.sessions
            .lock()
            .await
            .iter()
            .map(|r| (r.identity.clone(), r.sender.clone()))
            .collect()
    }

    /// Look up one session by identity.
    pub async fn get(&self, identity: &str) -> Option<SessionHandle> {
        self.sessions
            .lock()
            .await
            .iter()
            .find(|r| r.identity == identity)
            .map(SessionHandle::from_record)
    }

    /// Snapshot of all sessions for the operational endpoints.
    pub async fn snapshot(&self) -> Vec<SessionHandle> {
        self.sessions
            .lock()
            .await
            .iter()
            .map(SessionHandle::from_record)
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
