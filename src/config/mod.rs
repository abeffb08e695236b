//! Configuration Module
//!
//! Handles gateway configuration loading and validation.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{
    AuthHeaderNames, GatewayConfig, LlmSettings, RegistryFile, ServerSettings, UpstreamSettings,
};
