//! The async driver that owns a [`Session`].

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use super::{Edit, Session};
use crate::constants::EDIT_CHANNEL_CAPACITY;
use crate::persistence::KeyValueStore;
use crate::preview::PreviewHost;

/// Handle to a session running on its own task.
///
/// All session state lives on that one task; edits arrive over a channel and
/// timers are the session's own deadlines, so nothing is shared or locked.
/// Dropping the handle aborts the task, after which no pending timer fires.
/// Use [`SessionHandle::close`] to stop gracefully and flush persistence.
pub struct SessionHandle<S, P> {
    edits: mpsc::Sender<Edit>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Session<S, P>>>,
}

impl<S, P> SessionHandle<S, P>
where
    S: KeyValueStore + Send + 'static,
    P: PreviewHost + 'static,
{
    /// Move `session` onto a new task.
    pub fn spawn(session: Session<S, P>) -> Self {
        let (edits, rx) = mpsc::channel(EDIT_CHANNEL_CAPACITY);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run(session, rx, shutdown_rx));
        tracing::info!("Session started");
        Self {
            edits,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Deliver one edit.
    pub async fn send(&self, edit: Edit) -> Result<()> {
        self.edits.send(edit).await.context("Session is no longer running")
    }

    /// A sender for feeding edits from another task.
    pub fn sender(&self) -> mpsc::Sender<Edit> {
        self.edits.clone()
    }

    /// Apply queued edits, flush pending persistence, and return the session.
    pub async fn close(mut self) -> Result<Session<S, P>> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let task = self.task.take().context("Session task already taken")?;
        let session = task.await.context("Session task failed")?;
        tracing::info!("Session closed");
        Ok(session)
    }
}

impl<S, P> Drop for SessionHandle<S, P> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run<S, P>(
    mut session: Session<S, P>,
    mut edits: mpsc::Receiver<Edit>,
    mut shutdown: oneshot::Receiver<()>,
) -> Session<S, P>
where
    S: KeyValueStore,
    P: PreviewHost,
{
    loop {
        let deadline = session.next_deadline();
        tokio::select! {
            biased;
            edit = edits.recv() => match edit {
                Some(edit) => session.apply(edit, Instant::now()),
                None => break,
            },
            _ = &mut shutdown => break,
            () = wait_until(deadline) => {}
        }
        session.tick(Instant::now());
    }

    while let Ok(edit) = edits.try_recv() {
        session.apply(edit, Instant::now());
    }
    session.shutdown();
    session
}
