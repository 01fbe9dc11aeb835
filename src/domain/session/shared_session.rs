use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::project_dto::ProjectFileDto;
use crate::domain::session::controller::EditorSession;
use crate::domain::utils::id::FileId;
use crate::error::Result;

/// An [`EditorSession`] shared between the UI side and background tasks.
///
/// Saves hold the lock only while capturing and applying; the request itself runs
/// unlocked, so edits keep flowing while a save is in flight.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<EditorSession>>,
}

impl SharedSession {
    pub fn new(session: EditorSession) -> Self {
        SharedSession { inner: Arc::new(Mutex::new(session)) }
    }

    pub async fn lock(&self) -> MutexGuard<'_, EditorSession> {
        self.inner.lock().await
    }

    pub async fn save(&self, file_id: &FileId) -> Result<ProjectFileDto> {
        let (pending, service) = {
            let mut session = self.inner.lock().await;
            let pending = session.begin_save(file_id)?;
            (pending, Arc::clone(session.service()))
        };

        let outcome = pending.execute(service.as_ref()).await;

        let mut session = self.inner.lock().await;
        session.complete_save(outcome)
    }

    /// Flushes the active canvas every `period` until the returned handle is aborted.
    pub fn spawn_flush_loop(&self, period: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let mut session = inner.lock().await;
                if session.flush() {
                    log::trace!("Periodic flush of {:?}.", session.active_file_id());
                }
            }
        })
    }
}
