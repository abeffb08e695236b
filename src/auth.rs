//! Service Authorization
//!
//! Static registry of trusted calling services and the ordered credential
//! checks run against every inbound request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One trusted calling service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Expected origin host, scheme-less and port-less
    pub host: String,

    /// Expected client-name token
    pub client_name: String,

    /// Expected secret-hash token
    pub secret_hash: String,
}

/// Why the gate rejected a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The service-key header was missing or not in the registry
    UnknownServiceKey,

    /// The secret-hash header did not match the registry entry
    SecretHashMismatch,

    /// The client-name header did not match the registry entry
    ClientNameMismatch,

    /// The request's Host did not match the registry entry
    HostMismatch,
}

impl RejectReason {
    /// The reason string surfaced in the 403 body
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::UnknownServiceKey => "invalid llm service key provided",
            RejectReason::SecretHashMismatch => "invalid secret hash provided",
            RejectReason::ClientNameMismatch => "invalid service-client provided",
            RejectReason::HostMismatch => "invalid host origin",
        }
    }
}

/// Immutable registry of allowed services, keyed by service key
///
/// Loaded once at startup; never mutated at runtime.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    entries: HashMap<String, ServiceEntry>,
}

impl ServiceRegistry {
    /// Build a registry from configured entries
    pub fn new(entries: HashMap<String, ServiceEntry>) -> Self {
        Self { entries }
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hosts of all registered services (the CORS allow-list source)
    pub fn hosts(&self) -> Vec<&str> {
        self.entries.values().map(|e| e.host.as_str()).collect()
    }

    /// Run the four ordered checks. The first failing check wins.
    ///
    /// `request_host` is the raw `Host` header value; the port is
    /// stripped before comparison.
    pub fn authorize(
        &self,
        service_key: Option<&str>,
        client_name: Option<&str>,
        secret_hash: Option<&str>,
        request_host: Option<&str>,
    ) -> Result<(), RejectReason> {
        let entry = service_key
            .and_then(|key| self.entries.get(key))
            .ok_or(RejectReason::UnknownServiceKey)?;

        if secret_hash != Some(entry.secret_hash.as_str()) {
            return Err(RejectReason::SecretHashMismatch);
        }

        if client_name != Some(entry.client_name.as_str()) {
            return Err(RejectReason::ClientNameMismatch);
        }

        let host = request_host
            .unwrap_or_default()
            .split(':')
            .next()
            .unwrap_or_default();
        if host != entry.host {
            return Err(RejectReason::HostMismatch);
        }

        Ok(())
    }
}
