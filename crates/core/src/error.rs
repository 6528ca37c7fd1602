use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid entity kind: '{0}'")]
    InvalidEntityKind(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

/// Error returned by the favorites and search services.
///
/// Domain failures are reported as [`CoreError`]; anything the persistence
/// collaborator raises is carried through untouched as `Persistence`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError<E> {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Persistence(E),
}
