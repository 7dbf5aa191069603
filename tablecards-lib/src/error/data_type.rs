//! Unknown data-type id error

/// A data-type id that matches no registered [`DataType`](crate::model::DataType).
///
/// Ids come from the backend, so this signals a contract mismatch between
/// client and server rather than a user mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown data type id: {id}")]
pub struct UnknownDataTypeError {
    /// The unrecognised id.
    pub id: i32,
}
