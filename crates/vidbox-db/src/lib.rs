//! Database repositories over a Postgres pool.
//!
//! Schema lives in the workspace `migrations/` directory and is applied at
//! startup; referential integrity (user → videos/sessions cascade) is
//! enforced by the database, not application code.

mod sessions;
mod users;
mod videos;

pub use sessions::SessionRepository;
pub use users::UserRepository;
pub use videos::VideoRepository;

/// True when the error is a unique-constraint violation (e.g. a taken
/// username), so callers can map it to a conflict instead of a 500.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}
