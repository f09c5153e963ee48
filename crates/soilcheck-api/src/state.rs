use soilcheck_core::ports::InferenceCapability;
use soilcheck_orchestrator::{AnalysisOrchestrator, FailureClassifier};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Inference capability shared by every session
pub type SharedInference = Arc<dyn InferenceCapability>;

/// One user's draft and outcome
pub type Session = AnalysisOrchestrator<SharedInference>;

/// Sessions kept before the least recently used idle one is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct SessionEntry {
    session: Arc<Session>,
    /// Value of the access clock at the last lookup
    last_used: AtomicU64,
}

pub struct AppState {
    inference: SharedInference,
    classifier: FailureClassifier,
    max_sessions: usize,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    clock: AtomicU64,
}

impl AppState {
    pub fn new(inference: SharedInference, classifier: FailureClassifier) -> Self {
        Self {
            inference,
            classifier,
            max_sessions: DEFAULT_MAX_SESSIONS,
            sessions: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
        }
    }

    /// Limit the number of live sessions (at least one)
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Start a session with a fresh orchestrator.
    ///
    /// At capacity the least recently used session without a request in
    /// flight is evicted. Returns `None` when every session is busy.
    pub async fn create_session(&self) -> Option<(Uuid, Arc<Session>)> {
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_sessions {
            let evicted = sessions
                .iter()
                .filter(|(_, entry)| !entry.session.current_outcome().is_in_progress())
                .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
                .map(|(id, _)| *id)?;
            sessions.remove(&evicted);
            tracing::info!(session_id = %evicted, "Evicted least recently used session");
        }

        let id = Uuid::new_v4();
        let session = Arc::new(
            AnalysisOrchestrator::new(Arc::clone(&self.inference))
                .with_classifier(self.classifier.clone()),
        );
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::clone(&session),
                last_used: AtomicU64::new(self.tick()),
            },
        );
        Some((id, session))
    }

    /// Look up a session. The map lock is released before the caller awaits on it.
    pub async fn session(&self, id: Uuid) -> Option<Arc<Session>> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(&id)?;
        entry.last_used.store(self.tick(), Ordering::Relaxed);
        Some(Arc::clone(&entry.session))
    }

    /// Drop a session, returning whether it existed
    pub async fn remove_session(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}
