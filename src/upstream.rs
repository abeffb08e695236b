//! Upstream Services
//!
//! Read-only clients for the auth server (user lookups) and the backend
//! server (job category list). Lookups never fail the request path: an
//! unreachable upstream degrades to "not found" / an empty list, logged.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::client::HttpClient;
use crate::config::UpstreamSettings;
use crate::error::Result;

/// An authenticated platform user, as served by the auth server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: String,
    pub email: String,
    pub public_id: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub complete_profile: bool,

    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_talent: bool,
    #[serde(default)]
    pub is_client: bool,
}

/// A job category, as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCategory {
    pub slug: String,
    pub description: String,

    #[serde(default, rename = "parent__slug")]
    pub parent_slug: Option<String>,
    #[serde(default, rename = "parent__description")]
    pub parent_description: Option<String>,
}

/// Client for the auth/backend upstream services
pub struct UpstreamClient {
    http: HttpClient,
    settings: UpstreamSettings,

    /// Category list, fetched once and cached for the process lifetime
    categories: RwLock<Option<Arc<Vec<JobCategory>>>>,
}

impl UpstreamClient {
    pub fn new(settings: UpstreamSettings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(
                crate::client::http::DEFAULT_CONNECT_TIMEOUT,
                crate::client::http::DEFAULT_REQUEST_TIMEOUT,
            )?,
            settings,
            categories: RwLock::new(None),
        })
    }

    /// Look up a user by public id. Any failure maps to `None`.
    pub async fn fetch_user(&self, public_id: &str) -> Option<AuthUser> {
        let url = format!(
            "{}/users/auth/{}/",
            self.settings.auth_server_api.trim_end_matches('/'),
            public_id
        );

        match self.http.get_json::<AuthUser>(&url).await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::error!(public_id, error = %err, "failed to fetch user");
                None
            }
        }
    }

    /// The backend category list. The first successful fetch is cached;
    /// failures return an empty list without caching so a later request
    /// can retry.
    pub async fn categories(&self) -> Arc<Vec<JobCategory>> {
        if let Some(cached) = self.categories.read().clone() {
            return cached;
        }

        let url = format!(
            "{}/categories?scraper=true",
            self.settings.backend_server_api.trim_end_matches('/')
        );

        match self.http.get_json::<Vec<JobCategory>>(&url).await {
            Ok(fetched) => {
                let fetched = Arc::new(fetched);
                *self.categories.write() = Some(Arc::clone(&fetched));
                fetched
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch categories");
                Arc::new(Vec::new())
            }
        }
    }
}
