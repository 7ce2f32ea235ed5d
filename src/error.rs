use thiserror::Error;

/// Failures raised by pointer operations. All of them are synchronous and
/// local; missing data on a read is not an error but a `None` result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    /// The root passed to [`Pointer::new`](crate::Pointer::new) or
    /// [`Pointer::set_root`](crate::Pointer::set_root) is neither a map nor
    /// another pointer.
    #[error("pointer root must be a map or another pointer")]
    InvalidRoot,
    /// A location specifier that is neither a key, a sequence of keys, nor
    /// empty.
    #[error("location must be a key, a sequence of keys, or empty")]
    InvalidLocation,
    /// `set` and `clear` need at least one level of depth — the root itself
    /// cannot be assigned or deleted.
    #[error("location must have at least one level of depth")]
    EmptyLocation,
}
