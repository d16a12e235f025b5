//! # Feed Engine
//!
//! The root state container. Owns the authoritative `users` and `posts`
//! collections, mediates every mutation, and computes the derived views
//! (trending tags, search, filtered/sorted feed).
//!
//! Every mutation rewrites the affected collection to the store in full;
//! there is no delta persistence. All operations run synchronously to
//! completion, so within one process two mutations never interleave.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use yap_core::error::{AppError, Result};
use yap_core::models::{Post, Reply, SortOrder, Space, Theme, User, UserRole, ViewState};
use yap_core::traits::{CredentialVerifier, KeyValueStore};

use crate::auth::normalize_username;
use crate::constants::{
    seed_posts, seed_users, BRAND_AVATAR, DEFAULT_BANNER, MAX_CHARS, STORAGE_KEY_ME,
    STORAGE_KEY_POSTS, STORAGE_KEY_THEME, STORAGE_KEY_USERS,
};
use crate::parser;

/// A hashtag ranked by occurrence count across all posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingTag {
    pub tag: String,
    pub count: usize,
}

/// Both result sets of a search. When a query is active these fully replace
/// the normal feed view.
#[derive(Debug, Default)]
pub struct SearchResults<'a> {
    pub posts: Vec<&'a Post>,
    pub users: Vec<&'a User>,
}

/// Aggregate totals shown on the moderation dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub users: usize,
    pub posts: usize,
    pub reactions: usize,
    pub replies: usize,
}

/// The fields a user may edit on their own profile. Role, id, username, and
/// the social graph are deliberately not reachable through this path.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub banner_url: String,
}

/// Owned application state. Constructed once per process via [`FeedEngine::load`]
/// and passed explicitly to whatever drives it; there are no ambient singletons.
pub struct FeedEngine {
    store: Arc<dyn KeyValueStore>,
    verifier: Arc<dyn CredentialVerifier>,
    users: Vec<User>,
    posts: Vec<Post>,
    session: Option<Uuid>,
    view: ViewState,
    query: String,
    sort: SortOrder,
    theme: Theme,
}

fn internal(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(e.to_string())
}

/// Decodes one slot, treating a present-but-malformed value the same as an
/// absent one. Corruption is recovered locally, never surfaced.
fn load_slot<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("slot {} is corrupt, falling back to seed data: {}", key, e);
            None
        }
    }
}

impl FeedEngine {
    /// Loads persisted state, reseeding any slot that is absent or corrupt.
    ///
    /// Users and posts both fall back to the same seed fixtures (uniform
    /// policy; an empty user list also reseeds since a feed with no accounts
    /// is unusable, while an empty post list is a legitimate state). A session
    /// id pointing at no known user is dropped.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        verifier: Arc<dyn CredentialVerifier>,
        default_theme: Theme,
    ) -> Self {
        let users = match load_slot::<Vec<User>>(store.as_ref(), STORAGE_KEY_USERS) {
            Some(users) if !users.is_empty() => users,
            _ => {
                let seeded = seed_users(verifier.as_ref());
                write_slot(store.as_ref(), STORAGE_KEY_USERS, &seeded);
                seeded
            }
        };
        let posts = match load_slot::<Vec<Post>>(store.as_ref(), STORAGE_KEY_POSTS) {
            Some(posts) => posts,
            None => {
                let seeded = seed_posts();
                write_slot(store.as_ref(), STORAGE_KEY_POSTS, &seeded);
                seeded
            }
        };
        let session = store
            .get(STORAGE_KEY_ME)
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .filter(|id| users.iter().any(|u| u.id == *id));
        let theme = Theme::parse(store.get(STORAGE_KEY_THEME).as_deref(), default_theme);

        Self {
            store,
            verifier,
            users,
            posts,
            session,
            view: ViewState::Feed,
            query: String::new(),
            sort: SortOrder::Newest,
            theme,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn session(&self) -> Option<Uuid> {
        self.session
    }

    /// The signed-in user, if any.
    pub fn me(&self) -> Option<&User> {
        self.session.and_then(|id| self.user(id))
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_name(&self, username: &str) -> Option<&User> {
        let wanted = normalize_username(username);
        self.users
            .iter()
            .find(|u| normalize_username(&u.username) == wanted)
    }

    pub fn post(&self, id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Resolves a post's author, synthesizing a placeholder from the
    /// denormalized handle when the account no longer exists.
    pub fn author_of(&self, post: &Post) -> User {
        match self.user(post.user_id) {
            Some(user) => user.clone(),
            None => User {
                id: post.user_id,
                username: post.username.clone(),
                password: String::new(),
                display_name: post.username.clone(),
                bio: String::new(),
                avatar_url: BRAND_AVATAR.to_string(),
                banner_url: DEFAULT_BANNER.to_string(),
                following: vec![],
                followers: vec![],
                created_at: post.timestamp,
                role: UserRole::User,
                is_verified: false,
            },
        }
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    /// Registers a new account and signs it in.
    pub fn register(&mut self, username: &str, display_name: &str, password: &str) -> Result<Uuid> {
        let handle = normalize_username(username);
        if handle.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "username and password are required".to_string(),
            ));
        }
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::Validation("display name is required".to_string()));
        }
        if self
            .users
            .iter()
            .any(|u| normalize_username(&u.username) == handle)
        {
            return Err(AppError::UsernameTaken(handle));
        }

        let user = User {
            id: Uuid::now_v7(),
            username: handle,
            password: self.verifier.encode(password).map_err(internal)?,
            display_name: display_name.to_string(),
            bio: String::new(),
            avatar_url: BRAND_AVATAR.to_string(),
            banner_url: DEFAULT_BANNER.to_string(),
            following: vec![],
            followers: vec![],
            created_at: Utc::now(),
            role: UserRole::User,
            is_verified: false,
        };
        let id = user.id;
        self.users.push(user);
        self.persist_users()?;
        self.write_session(Some(id))?;
        log::info!("registered new user {}", id);
        Ok(id)
    }

    /// Signs in the first user whose normalized handle matches and whose
    /// stored secret verifies against `password`.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Uuid> {
        let handle = normalize_username(username);
        let found = self
            .users
            .iter()
            .find(|u| {
                normalize_username(&u.username) == handle
                    && self.verifier.verify(password, &u.password)
            })
            .map(|u| u.id);
        match found {
            Some(id) => {
                self.write_session(Some(id))?;
                Ok(id)
            }
            None => Err(AppError::InvalidCredentials),
        }
    }

    /// Clears the session and returns navigation to the main feed.
    pub fn logout(&mut self) -> Result<()> {
        self.write_session(None)?;
        self.view = ViewState::Feed;
        self.query.clear();
        Ok(())
    }

    // ── Post mutations ───────────────────────────────────────────────────

    /// Creates a yap and prepends it, so storage order trends newest-first.
    pub fn create_post(&mut self, content: &str, space_id: &str) -> Result<Uuid> {
        let author = self.require_session_user()?;
        let (user_id, username) = (author.id, author.username.clone());
        validate_content(content)?;
        if Space::find(space_id).is_none() {
            return Err(AppError::Validation(format!("unknown space '{}'", space_id)));
        }

        let post = Post {
            id: Uuid::now_v7(),
            user_id,
            username,
            content: content.to_string(),
            space: space_id.to_string(),
            timestamp: Utc::now(),
            reactions: BTreeMap::new(),
            replies: vec![],
            is_pinned: false,
            is_admin_only: None,
        };
        let id = post.id;
        self.posts.insert(0, post);
        self.persist_posts()?;
        Ok(id)
    }

    /// Adds or removes the caller from `emoji`'s reaction set. An emoji key
    /// whose set empties is deleted on the spot, so a present-but-empty set
    /// is never persisted. Double-toggling restores the original state.
    pub fn toggle_reaction(&mut self, post_id: Uuid, emoji: &str) -> Result<()> {
        let uid = self.require_session()?;
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound("post".to_string(), post_id.to_string()))?;

        let set = post.reactions.entry(emoji.to_string()).or_default();
        if set.contains(&uid) {
            set.retain(|id| *id != uid);
            if set.is_empty() {
                post.reactions.remove(emoji);
            }
        } else {
            set.push(uid);
        }
        self.persist_posts()
    }

    /// Appends a reply to a post. Replies live inside their parent and have
    /// no identity outside of it.
    pub fn add_reply(&mut self, post_id: Uuid, content: &str) -> Result<Uuid> {
        let author = self.require_session_user()?;
        let (user_id, username) = (author.id, author.username.clone());
        validate_content(content)?;
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound("post".to_string(), post_id.to_string()))?;

        let reply = Reply {
            id: Uuid::now_v7(),
            user_id,
            username,
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        let id = reply.id;
        post.replies.push(reply);
        self.persist_posts()?;
        Ok(id)
    }

    /// Replaces a post's content in place. Author only; the timestamp and
    /// every other field stay untouched.
    pub fn update_post(&mut self, post_id: Uuid, content: &str) -> Result<()> {
        let uid = self.require_session()?;
        validate_content(content)?;
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound("post".to_string(), post_id.to_string()))?;
        if post.user_id != uid {
            return Err(AppError::Forbidden(
                "only the author may edit a post".to_string(),
            ));
        }
        post.content = content.to_string();
        self.persist_posts()
    }

    /// Removes a post. Allowed for the author and for moderators/owners.
    pub fn delete_post(&mut self, post_id: Uuid) -> Result<()> {
        let caller = self.require_session_user()?;
        let (uid, role) = (caller.id, caller.role);
        let post = self
            .post(post_id)
            .ok_or_else(|| AppError::NotFound("post".to_string(), post_id.to_string()))?;
        if post.user_id != uid && !role.can_moderate() {
            return Err(AppError::Forbidden(
                "only the author or a moderator may delete a post".to_string(),
            ));
        }
        self.posts.retain(|p| p.id != post_id);
        self.persist_posts()
    }

    // ── Profile & social graph ───────────────────────────────────────────

    /// Applies the restricted profile field set to the session user.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<()> {
        let uid = self.require_session()?;
        let display_name = update.display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::Validation("display name is required".to_string()));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == uid)
            .ok_or(AppError::Unauthenticated)?;
        user.display_name = display_name.to_string();
        user.bio = update.bio;
        user.avatar_url = update.avatar_url;
        user.banner_url = update.banner_url;
        self.persist_users()
    }

    /// Follows or unfollows `target`: the actor's `following` and the
    /// target's `followers` change together in one state update.
    pub fn set_follow(&mut self, target: Uuid, follow: bool) -> Result<()> {
        let uid = self.require_session()?;
        if uid == target {
            return Err(AppError::Validation("cannot follow yourself".to_string()));
        }
        if self.user(target).is_none() {
            return Err(AppError::NotFound("user".to_string(), target.to_string()));
        }
        for user in &mut self.users {
            if user.id == uid {
                user.following.retain(|id| *id != target);
                if follow {
                    user.following.push(target);
                }
            } else if user.id == target {
                user.followers.retain(|id| *id != uid);
                if follow {
                    user.followers.push(uid);
                }
            }
        }
        self.persist_users()
    }

    // ── Moderation ───────────────────────────────────────────────────────

    /// Changes a user's role. Owners only.
    pub fn set_role(&mut self, target: Uuid, role: UserRole) -> Result<()> {
        self.require_owner()?;
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == target)
            .ok_or_else(|| AppError::NotFound("user".to_string(), target.to_string()))?;
        user.role = role;
        self.persist_users()
    }

    /// Purges an account. Owners only. The delete cascades: the target's
    /// posts are removed, their replies and reaction entries on surviving
    /// posts are stripped, and follow edges pointing at them are dropped.
    /// Purging the signed-in account also signs it out.
    pub fn delete_user(&mut self, target: Uuid) -> Result<()> {
        self.require_owner()?;
        if self.user(target).is_none() {
            return Err(AppError::NotFound("user".to_string(), target.to_string()));
        }

        self.users.retain(|u| u.id != target);
        for user in &mut self.users {
            user.following.retain(|id| *id != target);
            user.followers.retain(|id| *id != target);
        }
        self.posts.retain(|p| p.user_id != target);
        for post in &mut self.posts {
            post.replies.retain(|r| r.user_id != target);
            post.reactions.retain(|_, set| {
                set.retain(|id| *id != target);
                !set.is_empty()
            });
        }

        self.persist_users()?;
        self.persist_posts()?;
        if self.session == Some(target) {
            self.write_session(None)?;
            self.view = ViewState::Feed;
        }
        log::info!("purged user {} and cascaded their content", target);
        Ok(())
    }

    /// Erases every slot and reseeds, the dashboard's nuclear purge.
    pub fn wipe(&mut self) -> Result<()> {
        for key in [
            STORAGE_KEY_USERS,
            STORAGE_KEY_POSTS,
            STORAGE_KEY_ME,
            STORAGE_KEY_THEME,
        ] {
            self.store.remove(key).map_err(internal)?;
        }
        self.session = None;
        self.view = ViewState::Feed;
        self.query.clear();
        self.sort = SortOrder::Newest;
        self.users = seed_users(self.verifier.as_ref());
        self.posts = seed_posts();
        self.persist_users()?;
        self.persist_posts()
    }

    // ── Transient UI state ───────────────────────────────────────────────

    /// Navigates. Changing views drops any active search query.
    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
        self.query.clear();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Theme is the one piece of UI state that persists.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.store
            .set(STORAGE_KEY_THEME, theme.as_str())
            .map_err(internal)
    }

    // ── Derived views ────────────────────────────────────────────────────

    /// Top 5 hashtags by occurrence count across all posts. Keys are the
    /// exact matched substrings, so `#Foo` and `#foo` count separately;
    /// ties keep first-encountered order.
    pub fn trending_tags(&self) -> Vec<TrendingTag> {
        let mut counts: Vec<TrendingTag> = Vec::new();
        for post in &self.posts {
            for tag in parser::scan_hashtags(&post.content) {
                match counts.iter_mut().find(|t| t.tag == tag) {
                    Some(t) => t.count += 1,
                    None => counts.push(TrendingTag {
                        tag: tag.to_string(),
                        count: 1,
                    }),
                }
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(5);
        counts
    }

    /// Searches posts and users. A `#`-prefixed query matches only posts
    /// whose scanned hashtags equal it (case-insensitive); anything else is
    /// a substring match on post content / denormalized author handle, and
    /// separately on user handles and display names.
    pub fn search(&self, raw_query: &str) -> SearchResults<'_> {
        let q = raw_query.trim().to_lowercase();
        if q.is_empty() {
            return SearchResults::default();
        }

        let users = self
            .users
            .iter()
            .filter(|u| {
                u.username.to_lowercase().contains(&q)
                    || u.display_name.to_lowercase().contains(&q)
            })
            .collect();

        let posts = if q.starts_with('#') {
            self.posts
                .iter()
                .filter(|p| parser::scan_hashtags(&p.content).any(|h| h.to_lowercase() == q))
                .collect()
        } else {
            self.posts
                .iter()
                .filter(|p| {
                    p.content.to_lowercase().contains(&q)
                        || p.username.to_lowercase().contains(&q)
                })
                .collect()
        };

        SearchResults { posts, users }
    }

    /// The feed as currently visible: search results (newest first) when a
    /// query is active, otherwise the view filter followed by a stable sort,
    /// so ties keep original collection order across re-renders.
    pub fn visible_posts(&self) -> Vec<&Post> {
        if !self.query.trim().is_empty() {
            let mut posts = self.search(&self.query).posts;
            posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            return posts;
        }

        let mut result: Vec<&Post> = match &self.view {
            ViewState::Feed => self.posts.iter().collect(),
            ViewState::Profile(id) => self.posts.iter().filter(|p| p.user_id == *id).collect(),
            ViewState::Space(space) => self.posts.iter().filter(|p| &p.space == space).collect(),
        };
        match self.sort {
            SortOrder::Newest => result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::Oldest => result.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortOrder::Popular => {
                result.sort_by(|a, b| b.reaction_count().cmp(&a.reaction_count()))
            }
        }
        result
    }

    /// Dashboard totals.
    pub fn stats(&self) -> Stats {
        Stats {
            users: self.users.len(),
            posts: self.posts.len(),
            reactions: self.posts.iter().map(Post::reaction_count).sum(),
            replies: self.posts.iter().map(|p| p.replies.len()).sum(),
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn require_session(&self) -> Result<Uuid> {
        self.session.ok_or(AppError::Unauthenticated)
    }

    /// A session id pointing at a purged user counts as no session.
    fn require_session_user(&self) -> Result<&User> {
        let uid = self.require_session()?;
        self.user(uid).ok_or(AppError::Unauthenticated)
    }

    fn require_owner(&self) -> Result<Uuid> {
        let caller = self.require_session_user()?;
        if caller.role != UserRole::Owner {
            return Err(AppError::Forbidden(
                "owner role required".to_string(),
            ));
        }
        Ok(caller.id)
    }

    fn write_session(&mut self, id: Option<Uuid>) -> Result<()> {
        match id {
            Some(id) => self
                .store
                .set(STORAGE_KEY_ME, &id.to_string())
                .map_err(internal)?,
            None => self.store.remove(STORAGE_KEY_ME).map_err(internal)?,
        }
        self.session = id;
        Ok(())
    }

    fn persist_users(&self) -> Result<()> {
        let json = serde_json::to_string(&self.users).map_err(internal)?;
        self.store.set(STORAGE_KEY_USERS, &json).map_err(internal)
    }

    fn persist_posts(&self) -> Result<()> {
        let json = serde_json::to_string(&self.posts).map_err(internal)?;
        self.store.set(STORAGE_KEY_POSTS, &json).map_err(internal)
    }
}

fn write_slot<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            if let Err(e) = store.set(key, &json) {
                log::warn!("failed to reseed slot {}: {}", key, e);
            }
        }
        Err(e) => log::warn!("failed to serialize seed data for {}: {}", key, e),
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("content must not be empty".to_string()));
    }
    let chars = content.chars().count();
    if chars > MAX_CHARS {
        return Err(AppError::Validation(format!(
            "content is {} characters, the limit is {}",
            chars, MAX_CHARS
        )));
    }
    Ok(())
}
