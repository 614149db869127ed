//! Minimal user identity record.
//!
//! Authentication is out of scope; callers arrive with a verified [`UserId`].
//! The record exists so notifications can carry display names.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered marketplace user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}
