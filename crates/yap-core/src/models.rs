//! # Domain Models
//!
//! These structs represent the core entities of the Yap feed.
//! We use UUID v7 for time-ordered, globally unique identification, and
//! camelCase field names on the wire so the persisted JSON matches the
//! storage slots documented in the README.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Privilege tier of an account. Moderators manage posts, owners manage people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Moderator,
    Owner,
}

impl UserRole {
    /// True for roles allowed to delete other people's posts.
    pub fn can_moderate(self) -> bool {
        matches!(self, UserRole::Moderator | UserRole::Owner)
    }
}

/// A registered account.
///
/// `password` holds whatever the configured `CredentialVerifier` produced at
/// registration time (plaintext in the naive setup, a PHC hash under Argon2).
/// `following`/`followers` carry user ids; the engine keeps the pair
/// consistent when a follow edge changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Unique handle, enforced case-insensitively at registration only.
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub banner_url: String,
    pub following: Vec<Uuid>,
    pub followers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
}

/// A single yap in the feed.
///
/// `username` is a denormalized snapshot of the author's handle at post time,
/// so a post stays renderable after its author is purged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    /// Id of the fixed topic space this post belongs to.
    pub space: String,
    pub timestamp: DateTime<Utc>,
    /// emoji -> ids of users who reacted. An emoji key with an empty set is
    /// removed immediately on toggle-off and must never be persisted.
    #[serde(default)]
    pub reactions: BTreeMap<String, Vec<Uuid>>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin_only: Option<bool>,
}

impl Post {
    /// Total reactions across all emoji, the `Popular` sort key.
    pub fn reaction_count(&self) -> usize {
        self.reactions.values().map(Vec::len).sum()
    }
}

/// A reply embedded in its parent post; it has no identity outside of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A fixed topic channel. Spaces are static configuration, not user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Space {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// The complete space table. Posts reference entries by `id`.
pub const SPACES: [Space; 6] = [
    Space { id: "general", label: "General", icon: "globe", color: "slate" },
    Space { id: "tech", label: "Tech", icon: "cpu", color: "blue" },
    Space { id: "gaming", label: "Gaming", icon: "gamepad", color: "indigo" },
    Space { id: "school", label: "School", icon: "graduation", color: "orange" },
    Space { id: "memes", label: "Memes", icon: "shapes", color: "pink" },
    Space { id: "design", label: "Design", icon: "palette", color: "teal" },
];

impl Space {
    pub fn find(id: &str) -> Option<&'static Space> {
        SPACES.iter().find(|s| s.id == id)
    }
}

/// Transient navigation state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Feed,
    Profile(Uuid),
    Space(String),
}

/// Display ordering of the feed. A derived property, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Popular,
}

/// Color scheme preference, persisted as a bare `"dark"`/`"light"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Parses a stored slot value, falling back to `default` when the slot is
    /// absent or holds anything unexpected.
    pub fn parse(raw: Option<&str>, default: Theme) -> Theme {
        match raw {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_camel_case() {
        let post = Post {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            username: "yaply".to_string(),
            content: "Hello #world".to_string(),
            space: "general".to_string(),
            timestamp: Utc::now(),
            reactions: BTreeMap::new(),
            replies: vec![],
            is_pinned: false,
            is_admin_only: None,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("isPinned").is_some());
        // Absent optional flag stays off the wire entirely.
        assert!(json.get("isAdminOnly").is_none());
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Moderator).unwrap(), "\"moderator\"");
        let role: UserRole = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(role, UserRole::Owner);
        assert!(role.can_moderate());
        assert!(!UserRole::User.can_moderate());
    }

    #[test]
    fn theme_parse_falls_back() {
        assert_eq!(Theme::parse(Some("dark"), Theme::Light), Theme::Dark);
        assert_eq!(Theme::parse(Some("sepia"), Theme::Dark), Theme::Dark);
        assert_eq!(Theme::parse(None, Theme::Light), Theme::Light);
    }

    #[test]
    fn space_lookup() {
        assert_eq!(Space::find("tech").unwrap().label, "Tech");
        assert!(Space::find("missing").is_none());
    }
}
