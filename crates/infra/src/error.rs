use thiserror::Error;

/// Store operation error.
///
/// Infrastructure failures only (IO, lock poisoning, backend faults); domain
/// failures never originate here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store operation failed: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
