//! Event recording
//!
//! Every recorded event lands in the store's append-only log and is
//! mirrored to the external observability sink when one is configured.
//! The mirror is best-effort: a sink failure becomes an
//! `observability.error` event in the local log and nothing else.

use std::sync::Arc;

use collab::ObservabilitySink;

use crate::model::Event;
use crate::store::Store;

/// Appends events to the store and mirrors them outward
#[derive(Clone)]
pub struct EventRecorder {
    store: Store,
    sink: Option<Arc<ObservabilitySink>>,
}

impl EventRecorder {
    pub fn new(store: Store, sink: Option<ObservabilitySink>) -> Self {
        Self {
            store,
            sink: sink.map(Arc::new),
        }
    }

    /// Record one event, mirroring it to the sink when configured.
    pub async fn record(&self, event_type: &str, payload: serde_json::Value) {
        let event = Event::new(event_type, payload);
        self.store.push_event(event.clone()).await;

        if let Some(sink) = &self.sink {
            if let Err(e) = sink
                .emit(&event.event_type, event.ts, &event.payload)
                .await
            {
                tracing::warn!("Observability emit failed: {e}");
                self.store
                    .push_event(Event::new("observability.error", e.event_payload()))
                    .await;
            }
        }
    }
}
