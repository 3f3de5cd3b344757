use std::sync::Arc;

use quiz_core::model::{QuizProgress, progress_key};
use storage::repository::KeyValueStore;

use crate::error::ProgressError;

/// Per-test quiz progress persisted in the key-value store.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist `progress` for `test`, replacing any earlier snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if encoding or the store write fails.
    pub async fn save(&self, test: &str, progress: &QuizProgress) -> Result<(), ProgressError> {
        let encoded = serde_json::to_string(progress)?;
        self.store.set(&progress_key(test), &encoded).await?;
        Ok(())
    }

    /// Read the saved snapshot for `test`. A corrupt snapshot reads as absent.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the store cannot be read.
    pub async fn load(&self, test: &str) -> Result<Option<QuizProgress>, ProgressError> {
        let Some(raw) = self.store.get(&progress_key(test)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(progress) => Ok(Some(progress)),
            Err(err) => {
                tracing::warn!(test, error = %err, "ignoring unreadable saved progress");
                Ok(None)
            }
        }
    }

    /// Forget the saved snapshot for `test`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the store cannot be written.
    pub async fn clear(&self, test: &str) -> Result<(), ProgressError> {
        self.store.remove(&progress_key(test)).await?;
        Ok(())
    }
}
