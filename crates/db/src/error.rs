/// Failure talking to the readings store.
///
/// All variants are transient from the monitor's point of view: the
/// scheduler records the message and tries again on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Write rejected: {0}")]
    Rejected(String),
}
