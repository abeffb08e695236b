//! Configuration Loader
//!
//! Merges the service registry and model pool from built-in defaults and
//! deployment files, then resolves the environment-driven settings into a
//! complete `GatewayConfig`.

use std::path::{Path, PathBuf};

use crate::config::settings::{
    AuthHeaderNames, EnvLookup, GatewayConfig, LlmSettings, RegistryFile, ServerSettings,
    UpstreamSettings,
};
use crate::error::{GatewayError, Result};

/// Configuration loader with support for multiple sources
pub struct ConfigLoader {
    registry: RegistryFile,
}

impl ConfigLoader {
    /// Create a new loader: built-in defaults, then deployment files.
    pub fn new() -> Result<Self> {
        let mut loader = Self {
            registry: RegistryFile::default(),
        };

        // Load built-in defaults first
        loader.load_builtin_defaults()?;

        // Then load from the file system (can override built-ins)
        loader.load_from_default_paths()?;

        Ok(loader)
    }

    /// Create a loader with a specific registry file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut loader = Self {
            registry: RegistryFile::default(),
        };

        loader.load_builtin_defaults()?;
        loader.load_from_file(path)?;

        Ok(loader)
    }

    /// Load built-in registry defaults
    fn load_builtin_defaults(&mut self) -> Result<()> {
        let defaults = include_str!("../../services.json");
        let registry: RegistryFile = serde_json::from_str(defaults).map_err(|e| {
            GatewayError::Config(format!("Failed to parse built-in services.json: {}", e))
        })?;

        self.merge_registry(registry);
        Ok(())
    }

    /// Load registry overrides from default paths
    fn load_from_default_paths(&mut self) -> Result<()> {
        for path in Self::registry_paths() {
            if path.exists() {
                self.load_from_file(&path)?;
            }
        }

        Ok(())
    }

    /// Registry paths to check, in override order
    fn registry_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Environment variable
        if let Ok(custom_path) = std::env::var("SERVICES_PATH") {
            paths.push(PathBuf::from(custom_path));
        }

        // 2. Working directory
        paths.push(PathBuf::from("services.json"));

        paths
    }

    /// Load a registry file from a specific path
    fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let registry: RegistryFile = serde_json::from_str(&content).map_err(|e| {
            GatewayError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        self.merge_registry(registry);
        Ok(())
    }

    /// Merge another registry into this one (later files override earlier)
    fn merge_registry(&mut self, other: RegistryFile) {
        for (key, entry) in other.services {
            self.registry.services.insert(key, entry);
        }

        if !other.models.is_empty() {
            self.registry.models = other.models;
        }
    }

    /// The merged registry
    pub fn registry(&self) -> &RegistryFile {
        &self.registry
    }

    /// Resolve environment settings and produce the full configuration
    pub fn into_config(self) -> Result<GatewayConfig> {
        self.resolve_with(&|key| std::env::var(key).ok())
    }

    pub(crate) fn resolve_with(self, env: EnvLookup) -> Result<GatewayConfig> {
        let mut models = self.registry.models;

        // LLM_MODELS overrides the pool wholesale, comma-separated.
        if let Some(raw) = env("LLM_MODELS") {
            let listed: Vec<String> = raw
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if !listed.is_empty() {
                models = listed;
            }
        }

        if models.is_empty() {
            return Err(GatewayError::EmptyModelPool);
        }

        Ok(GatewayConfig {
            server: ServerSettings::resolve(env)?,
            llm: LlmSettings::resolve(env)?,
            auth_headers: AuthHeaderNames::resolve(env),
            upstream: UpstreamSettings::resolve(env),
            services: self.registry.services,
            models,
        })
    }
}
