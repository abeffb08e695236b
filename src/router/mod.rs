//! Router Module
//!
//! Model pool management and round-robin rotation.

pub mod model_pool;

pub use model_pool::ModelPool;
