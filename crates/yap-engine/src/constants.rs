//! Storage slot names, limits, and seed fixtures.
//!
//! The `_v1` suffix versions the persisted shapes; bumping it abandons old
//! slots rather than migrating them.

use chrono::{Duration, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;
use yap_core::models::{Post, User, UserRole};
use yap_core::traits::CredentialVerifier;

pub const STORAGE_KEY_USERS: &str = "yap_users_v1";
pub const STORAGE_KEY_POSTS: &str = "yap_posts_v1";
pub const STORAGE_KEY_ME: &str = "yap_me_v1";
pub const STORAGE_KEY_THEME: &str = "yap_theme_v1";

/// Soft client-side cap on post and reply length, in characters.
pub const MAX_CHARS: usize = 280;

pub const BRAND_AVATAR: &str = "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?auto=format&fit=crop&q=80&w=200";
pub const DEFAULT_BANNER: &str = "https://images.unsplash.com/photo-1614850523296-d8c1af93d400?auto=format&fit=crop&q=80&w=1200";

/// Fixed ids so reseeding after a wipe or corrupt slot is deterministic.
pub const BOOTSTRAP_USER_ID: Uuid = Uuid::from_u128(0x0192_3f00_0000_7000_8000_000000000001);
pub const WELCOME_POST_ID: Uuid = Uuid::from_u128(0x0192_3f00_0000_7000_8000_000000000002);

pub const BOOTSTRAP_USERNAME: &str = "yaply";
pub const BOOTSTRAP_PASSWORD: &str = "password";

/// The single bootstrap account both slots reseed from.
pub fn seed_users(verifier: &dyn CredentialVerifier) -> Vec<User> {
    let password = verifier
        .encode(BOOTSTRAP_PASSWORD)
        .unwrap_or_else(|_| BOOTSTRAP_PASSWORD.to_string());
    vec![User {
        id: BOOTSTRAP_USER_ID,
        username: BOOTSTRAP_USERNAME.to_string(),
        password,
        display_name: "yaplyhq".to_string(),
        bio: "The official voice of the Yap network. Chat. Share. Connect.".to_string(),
        avatar_url: BRAND_AVATAR.to_string(),
        banner_url: DEFAULT_BANNER.to_string(),
        following: vec![],
        followers: vec![],
        created_at: Utc::now() - Duration::days(30),
        role: UserRole::Owner,
        is_verified: true,
    }]
}

/// One pinned-style welcome post from the bootstrap account.
pub fn seed_posts() -> Vec<Post> {
    let mut reactions = BTreeMap::new();
    reactions.insert("❤️".to_string(), vec![BOOTSTRAP_USER_ID]);
    reactions.insert("🚀".to_string(), vec![BOOTSTRAP_USER_ID]);
    vec![Post {
        id: WELCOME_POST_ID,
        user_id: BOOTSTRAP_USER_ID,
        username: BOOTSTRAP_USERNAME.to_string(),
        content: "Welcome to Yap! This is a local-first micro-social feed. \
                  Check out the different #Spaces, find people with search, \
                  and start yapping. No cloud, no tracking."
            .to_string(),
        space: "general".to_string(),
        timestamp: Utc::now() - Duration::hours(2),
        reactions,
        replies: vec![],
        is_pinned: false,
        is_admin_only: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use yap_auth_simple::PlainTextVerifier;
    use yap_core::models::Space;

    #[test]
    fn seed_fixtures_are_consistent() {
        let users = seed_users(&PlainTextVerifier);
        let posts = seed_posts();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, UserRole::Owner);
        assert_eq!(posts[0].user_id, users[0].id);
        assert_eq!(posts[0].username, users[0].username);
        assert!(Space::find(&posts[0].space).is_some());
        assert!(posts[0].reactions.values().all(|v| !v.is_empty()));
    }
}
