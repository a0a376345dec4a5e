//! Shared application state

use std::sync::Arc;

use collab::{GithubClient, IssueTracker, JiraClient, ObservabilitySink, SourceHost};

use crate::config;
use crate::events::EventRecorder;
use crate::llm::{BedrockClient, Llm};
use crate::orchestrator::PipelineEngine;
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// In-memory repository
    pub store: Store,
    /// Audit-log recorder (store + optional observability mirror)
    pub events: EventRecorder,
    /// Inference backend
    pub llm: Arc<dyn Llm>,
    /// Issue tracker, when configured
    pub issue_tracker: Option<Arc<dyn IssueTracker>>,
    /// Source host, when configured
    pub source_host: Option<Arc<dyn SourceHost>>,
    /// Whether state transitions are validated
    pub enforce_transitions: bool,
}

impl AppState {
    pub fn new(
        store: Store,
        events: EventRecorder,
        llm: Arc<dyn Llm>,
        issue_tracker: Option<Arc<dyn IssueTracker>>,
        source_host: Option<Arc<dyn SourceHost>>,
        enforce_transitions: bool,
    ) -> Self {
        Self {
            store,
            events,
            llm,
            issue_tracker,
            source_host,
            enforce_transitions,
        }
    }

    /// Build state from the environment: adapters exist only when their
    /// credentials are fully configured.
    pub fn from_env() -> Self {
        let store = Store::new();

        let sink = ObservabilitySink::from_env();
        if sink.is_none() {
            tracing::info!("Observability sink not configured - events stay local");
        }
        let events = EventRecorder::new(store.clone(), sink);

        let issue_tracker = match JiraClient::from_env() {
            Some(client) => Some(Arc::new(client) as Arc<dyn IssueTracker>),
            None => {
                tracing::info!("Jira not configured - issue tracker mirroring disabled");
                None
            }
        };

        let source_host = match GithubClient::from_env() {
            Some(client) => Some(Arc::new(client) as Arc<dyn SourceHost>),
            None => {
                tracing::info!("GitHub not configured - source host mirroring disabled");
                None
            }
        };

        Self {
            store,
            events,
            llm: Arc::new(BedrockClient::from_env()),
            issue_tracker,
            source_host,
            enforce_transitions: config::enforce_transitions(),
        }
    }

    /// Build an engine over this state's components.
    pub fn engine(&self) -> PipelineEngine {
        PipelineEngine::new(
            self.store.clone(),
            self.events.clone(),
            self.llm.clone(),
            self.issue_tracker.clone(),
            self.source_host.clone(),
        )
    }
}
