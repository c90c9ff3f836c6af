//! Session validation for authenticated endpoints.
//!
//! Authentication itself (sign-in, OAuth handoff) is an external
//! collaborator; this module only draws the boundary the reservation
//! endpoint needs: a bearer token that resolves to a customer profile.
//! Handlers take a [`SessionUser`] parameter to require a signed-in
//! caller; the rejection is the wire-level `not_authenticated` error.

use crate::server::state::AppState;
use crate::types::CustomerId;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use cabanamar_web::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The signed-in customer's profile as the session layer knows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Customer id
    pub customer_id: CustomerId,
    /// Name shown on confirmations
    pub display_name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone; when absent the confirmation flow shows the
    /// phone prompt before the confirmation view
    pub phone: Option<String>,
}

/// Resolves bearer tokens to customer profiles.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks up the profile for a session token; `None` means the
    /// token is unknown or expired.
    async fn profile_for_token(&self, token: &str) -> Option<Profile>;
}

/// In-memory session store for tests and demo mode.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Profile>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session token for a profile.
    pub async fn insert(&self, token: impl Into<String>, profile: Profile) {
        self.sessions.write().await.insert(token.into(), profile);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn profile_for_token(&self, token: &str) -> Option<Profile> {
        self.sessions.read().await.get(token).cloned()
    }
}

/// Bearer token extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("not_authenticated"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("not_authenticated"))?;

        if token.is_empty() {
            return Err(ApiError::unauthorized("not_authenticated"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Authenticated session user.
///
/// Extracts and validates the session from the bearer token. Use this
/// as a handler parameter to require authentication.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The resolved profile
    pub profile: Profile,
}

impl SessionUser {
    /// The authenticated customer id.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.profile.customer_id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;
        let profile = state
            .sessions
            .profile_for_token(&bearer.0)
            .await
            .ok_or_else(|| ApiError::unauthorized("not_authenticated"))?;
        Ok(Self { profile })
    }
}

/// Session store backed by the managed auth service: the bearer token
/// is verified against `GET /auth/v1/user` and the stored phone comes
/// from the `profiles` table.
pub struct SupabaseSessionStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseSessionStore {
    /// Creates a store for the given project base URL and service key.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }

    async fn fetch_phone(&self, customer_id: CustomerId) -> Option<String> {
        #[derive(Deserialize)]
        struct ProfileRow {
            phone: Option<String>,
        }

        let url = format!(
            "{}/rest/v1/profiles?user_id=eq.{}&select=phone",
            self.base_url, customer_id
        );
        let rows: Vec<ProfileRow> = self
            .http
            .get(url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .ok()?
            .json()
            .await
            .ok()?;
        rows.into_iter().next().and_then(|row| row.phone)
    }
}

#[async_trait]
impl SessionStore for SupabaseSessionStore {
    async fn profile_for_token(&self, token: &str) -> Option<Profile> {
        #[derive(Deserialize)]
        struct AuthUser {
            id: uuid::Uuid,
            email: Option<String>,
            #[serde(default)]
            user_metadata: serde_json::Value,
        }

        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let user: AuthUser = response.json().await.ok()?;

        let customer_id = CustomerId::from_uuid(user.id);
        let display_name = user
            .user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .map(ToString::to_string)
            .or_else(|| user.email.clone())
            .unwrap_or_else(|| customer_id.to_string());

        Some(Profile {
            customer_id,
            display_name,
            email: user.email,
            phone: self.fetch_phone(customer_id).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        let profile = Profile {
            customer_id: CustomerId::new(),
            display_name: "Ana".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: None,
        };
        store.insert("token-1", profile.clone()).await;

        assert_eq!(store.profile_for_token("token-1").await, Some(profile));
        assert_eq!(store.profile_for_token("token-2").await, None);
    }
}
