//! Model Pool
//!
//! An ordered pool of interchangeable backend models with a shared
//! round-robin rotation cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{GatewayError, Result};

/// Pool of backend model identifiers with round-robin rotation
///
/// The cursor is shared across all concurrent requests in the process.
/// Rotation is a best-effort load-spreading heuristic: two racing
/// requests may observe the same model, but the selected index is always
/// normalized into range.
#[derive(Debug)]
pub struct ModelPool {
    /// Ordered model identifiers; order defines the rotation sequence
    models: Vec<String>,

    /// Next rotation position
    cursor: AtomicUsize,
}

impl ModelPool {
    /// Create a new pool. The pool must not be empty.
    pub fn new(models: Vec<String>) -> Result<Self> {
        if models.is_empty() {
            return Err(GatewayError::EmptyModelPool);
        }
        Ok(Self {
            models,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Get the number of models in the pool
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the pool is empty (never true for a constructed pool)
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// All configured model identifiers, in rotation order
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Select the next model, advancing the shared cursor.
    ///
    /// Returns the model at the pre-advance position; `fetch_add` keeps
    /// the read-and-advance atomic and the modulo keeps the index in
    /// range even after the counter wraps.
    pub fn next(&self) -> &str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.models.len();
        &self.models[idx]
    }
}
