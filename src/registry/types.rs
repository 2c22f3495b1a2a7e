//! Session record and its serializable view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One identity's current connection.
///
/// `sender` is the outbound channel handle for the connection task; the
/// socket itself is owned by that task, not the registry.
pub struct SessionRecord {
    pub identity: String,
    pub connection_id: Uuid,
    pub sender: mpsc::Sender<String>,
    pub registered_at: DateTime<Utc>,
}

/// Serializable view of a session record, without the channel handle.
#[derive(Debug, Clone, Serialize)]
pub struct SessionHandle {
    pub identity: String,
    pub connection_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

impl SessionHandle {
    pub(crate) fn from_record(record: &SessionRecord) -> Self {
        Self {
            identity: record.identity.clone(),
            connection_id: record.connection_id,
            registered_at: record.registered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_handle_serializes_without_channel_internals() {
        let handle = SessionHandle {
            identity: "alice@example.com".to_string(),
            connection_id: Uuid::nil(),
            registered_at: Utc::now(),
        };

        let json = serde_json::to_value(&handle).unwrap();
        assert_eq!(json["identity"], "alice@example.com");
        assert!(json.get("sender").is_none());
    }
}
