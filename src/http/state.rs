use crate::minutes::MinutesService;
use crate::session::SessionStore;
use crate::uploads::CollisionPolicy;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The process's upload session
    pub sessions: Arc<SessionStore>,

    /// Generation workflow and output writer
    pub minutes: Arc<MinutesService>,

    /// How uploads with an existing name are handled
    pub upload_policy: CollisionPolicy,

    /// Held for the whole of a generation so runs never overlap
    pub generation_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        sessions: SessionStore,
        minutes: MinutesService,
        upload_policy: CollisionPolicy,
    ) -> Self {
        Self {
            sessions: Arc::new(sessions),
            minutes: Arc::new(minutes),
            upload_policy,
            generation_lock: Arc::new(Mutex::new(())),
        }
    }
}
