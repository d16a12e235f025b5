//! End-to-end exercise of the feed engine against a real file-backed store:
//! register, post, search both ways, delete, and reload.

use std::sync::Arc;

use tempfile::TempDir;
use yap_auth_simple::PlainTextVerifier;
use yap_core::models::{Theme, ViewState};
use yap_engine::FeedEngine;
use yap_store_file::FileStore;

fn open_engine(dir: &TempDir) -> FeedEngine {
    let store = FileStore::open(dir.path()).expect("store should open");
    FeedEngine::load(Arc::new(store), Arc::new(PlainTextVerifier), Theme::Light)
}

#[test]
fn create_search_delete_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut engine = open_engine(&dir);

    let alice = engine.register("alice", "Alice", "s3cret").unwrap();
    let post = engine.create_post("hello #world", "general").unwrap();

    // Hashtag search hits exactly the tagged post.
    let results = engine.search("#world");
    assert_eq!(results.posts.len(), 1);
    assert_eq!(results.posts[0].id, post);

    // Substring search takes the prose path to the same post.
    let results = engine.search("world");
    assert_eq!(results.posts.len(), 1);
    assert_eq!(results.posts[0].id, post);

    engine.delete_post(post).unwrap();
    engine.set_view(ViewState::Profile(alice));
    assert!(engine.visible_posts().is_empty());
}

#[test]
fn state_survives_a_restart() {
    let dir = TempDir::new().unwrap();

    let (alice, post) = {
        let mut engine = open_engine(&dir);
        let alice = engine.register("alice", "Alice", "s3cret").unwrap();
        let post = engine.create_post("persisted #forever", "tech").unwrap();
        engine.toggle_reaction(post, "🔥").unwrap();
        engine.set_theme(Theme::Dark).unwrap();
        (alice, post)
    };

    // A second engine over the same directory sees everything, including
    // the still-active session.
    let engine = open_engine(&dir);
    assert_eq!(engine.session(), Some(alice));
    assert_eq!(engine.theme(), Theme::Dark);
    let restored = engine.post(post).expect("post should survive restart");
    assert_eq!(restored.content, "persisted #forever");
    assert_eq!(restored.reaction_count(), 1);
    assert!(engine
        .trending_tags()
        .iter()
        .any(|t| t.tag == "#forever"));
}

#[test]
fn login_works_against_a_reloaded_store() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = open_engine(&dir);
        engine.register("alice", "Alice", "s3cret").unwrap();
        engine.logout().unwrap();
    }

    let mut engine = open_engine(&dir);
    assert_eq!(engine.session(), None);
    let alice = engine.login(" Alice ", "s3cret").unwrap();
    assert_eq!(engine.me().unwrap().id, alice);
}
