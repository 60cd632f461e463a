//! Recoverable errors.
//!
//! Misuse such as an out-of-range index panics; the only errors returned
//! as values come from checked construction.

/// Errors from `BucketTable::try_new`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// A table needs at least one bucket to place elements into.
    #[error("bucket table requires at least one bucket")]
    ZeroBuckets,
}
