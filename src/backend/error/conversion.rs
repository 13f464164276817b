/**
 * Error Conversion
 *
 * Maps driver errors from sqlx onto the backend error taxonomy.
 *
 * | sqlx error | BackendError |
 * |---|---|
 * | `PoolTimedOut`, `PoolClosed`, `Io`, `Tls`, `Protocol`, `Configuration`, `WorkerCrashed` | `StoreUnavailable` |
 * | `Database` with a check or not-null violation | `ValidationFailed` |
 * | anything else | `QueryFailed` |
 */

use sqlx::error::ErrorKind;

use crate::backend::error::types::BackendError;

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_) => BackendError::unavailable(err.to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    let field = db_err.constraint().unwrap_or("fields").to_string();
                    BackendError::validation(field, db_err.message().to_string())
                }
                _ => BackendError::query(err.to_string()),
            },
            _ => BackendError::query(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for BackendError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        BackendError::query(format!("migration failed: {}", err))
    }
}
