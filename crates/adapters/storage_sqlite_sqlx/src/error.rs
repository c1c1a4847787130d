//! Storage-specific error type wrapping sqlx errors.

use ecohub_domain::error::EcoHubError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// Whether the failure is a violated `UNIQUE` or `PRIMARY KEY` constraint.
    pub(crate) fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<StorageError> for EcoHubError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, source = ?std::error::Error::source(&err), "storage failure");
        Self::Storage(Box::new(err))
    }
}
