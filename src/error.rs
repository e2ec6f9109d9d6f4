use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the simulation core and its host.
///
/// Stepping with a bad time delta is a caller bug and is reported rather than
/// clamped. Commands that name a missing entity are not errors at all; they
/// are ignored by the handlers.
#[derive(Debug, Error)]
pub enum Error {
    /// `update` was asked to step backwards in time or too far forward.
    #[error("invalid time delta: {delta}ms (must be within 0..={max}ms)")]
    InvalidDelta { delta: f64, max: f64 },

    /// Snapshot or settings JSON could not be encoded/decoded.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
