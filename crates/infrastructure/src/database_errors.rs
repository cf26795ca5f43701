use tracing::debug;
use warden_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

fn sqlstate(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(database_error) => {
            database_error.code().map(|code| code.into_owned())
        }
        _ => None,
    }
}

/// Maps a write failure, naming the unique field on conflict.
pub(crate) fn map_write_error(error: sqlx::Error, field: &str, action: &str) -> AppError {
    let code = sqlstate(&error);
    if code.is_some() {
        debug!(action, field, sqlstate = code.as_deref(), "store rejected write");
    }

    match code.as_deref() {
        Some(UNIQUE_VIOLATION) => AppError::Conflict(format!("{field} already exists")),
        Some(FOREIGN_KEY_VIOLATION) => {
            AppError::InvalidArgument(format!("{action} references a missing record"))
        }
        Some(CHECK_VIOLATION) => {
            AppError::InvalidArgument(format!("{action} violates a stored constraint"))
        }
        _ => AppError::Internal(format!("failed to {action}: {error}")),
    }
}

/// Maps a role delete failure. Users still referencing the role block it.
pub(crate) fn map_role_delete_error(error: sqlx::Error) -> AppError {
    if sqlstate(&error).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
        return AppError::Conflict("role is in use".to_owned());
    }

    AppError::Internal(format!("failed to delete role: {error}"))
}

/// Maps a read failure.
pub(crate) fn map_read_error(error: sqlx::Error, action: &str) -> AppError {
    AppError::Internal(format!("failed to {action}: {error}"))
}
