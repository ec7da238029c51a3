use crate::BlockBuilderError;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A handle to a running [`crate::BlockBuilder`].
#[derive(Debug)]
pub struct BlockBuilderHandle {
    /// The lifecycle of the builder.
    cancellation: CancellationToken,
    /// The task running the builder loop.
    task: JoinHandle<Result<(), BlockBuilderError>>,
}

impl BlockBuilderHandle {
    pub(crate) const fn new(
        cancellation: CancellationToken,
        task: JoinHandle<Result<(), BlockBuilderError>>,
    ) -> Self {
        Self { cancellation, task }
    }

    /// Stops the builder and waits for the in-flight submissions. The building block is dropped:
    /// its blocks are replayed from the persisted marker on the next start.
    pub async fn shutdown(self) -> Result<(), BlockBuilderError> {
        tracing::info!(target: "rollup_sync::builder", "Shutting down block builder");
        self.cancellation.cancel();
        self.join().await
    }

    /// Returns true if the builder loop exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the builder loop to exit, returning the fatal error that stopped it if any.
    pub async fn join(self) -> Result<(), BlockBuilderError> {
        self.task.await.map_err(|err| BlockBuilderError::Task(err.to_string()))?
    }
}
