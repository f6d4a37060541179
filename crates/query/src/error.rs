use thiserror::Error;

/// Error returned when adding a dataset whose id is already registered.
///
/// The registry is left unchanged; the existing entry is never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a dataset with id `{id}` is already registered")]
pub struct DuplicateIdError {
    pub id: String,
}
