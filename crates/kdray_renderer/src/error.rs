//! Errors raised while tracing rays.

use thiserror::Error;

/// A scene the renderer cannot trace.
///
/// Misses are never errors; these only report surfaces whose shape has no
/// intersection routine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("no intersection routine for {shape} surfaces")]
    UnsupportedShape { shape: &'static str },
}

pub type TraceResult<T> = Result<T, TraceError>;
