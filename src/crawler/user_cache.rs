//! Per-run memoization of user profile lookups
//!
//! A user referenced by many posts, likes and comments is fetched from the
//! remote API at most once per crawl run. The cache is an owned object with
//! the lifetime of one run; it is unbounded and never evicts. The engine is
//! strictly sequential, so memoization needs no single-flight machinery
//! beyond the guarded map.

use crate::api::ApiClient;
use crate::model::{extract_user, User};
use crate::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// Memoizing resolver for full user profiles
#[derive(Debug, Default)]
pub struct UserCache {
    users: Mutex<HashMap<String, User>>,
}

impl UserCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a user identifier to a full profile
    ///
    /// The first call for an identifier fetches the profile from the remote
    /// API; every later call returns the stored snapshot without a network
    /// round trip.
    pub async fn resolve(&self, api: &ApiClient, id: &str) -> Result<User> {
        if let Some(user) = self.users.lock().unwrap().get(id).cloned() {
            tracing::debug!("User {} resolved from cache", id);
            return Ok(user);
        }

        tracing::info!("Fetching user details for user ID: {}", id);
        let raw = api.user_profile(id).await?;
        let user = extract_user(&raw)?;

        self.users
            .lock()
            .unwrap()
            .insert(id.to_string(), user.clone());
        Ok(user)
    }

    /// Returns the number of cached profiles
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().unwrap().is_empty()
    }
}
