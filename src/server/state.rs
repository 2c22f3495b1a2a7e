use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::registry::SessionRegistry;
use crate::relay::PresenceRelay;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<SessionRegistry>,
    pub relay: Arc<PresenceRelay>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let relay = Arc::new(PresenceRelay::new(registry.clone()));

        Self {
            settings: Arc::new(settings),
            registry,
            relay,
            start_time: Instant::now(),
        }
    }
}
