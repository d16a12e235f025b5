//! # Yap Binary
//!
//! The entry point that assembles the application from the plugin crates.

mod args;
mod commands;

use std::env;
use std::process;
use std::sync::Arc;

use yap_core::models::Theme;
use yap_core::traits::{CredentialVerifier, KeyValueStore};
use yap_engine::FeedEngine;
use yap_store_file::FileStore;

#[cfg(feature = "suggest-local")]
use yap_core::traits::SuggestionService;
#[cfg(feature = "suggest-local")]
use yap_suggest_local::LocalSuggester;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cmd = args::parse_args();

    // The suggestion oracle never touches the feed state, so it is handled
    // before the engine is even loaded.
    #[cfg(feature = "suggest-local")]
    if let args::Command::Suggest { text } = &cmd {
        let suggester = LocalSuggester;
        println!("{}", suggester.improve(text).await);
        for tag in suggester.suggest_tags(text).await {
            println!("  {}", tag);
        }
        return;
    }

    // 1. Initialize the storage implementation
    let data_dir = env::var("YAP_DATA_DIR").unwrap_or_else(|_| "./.yap-data".to_string());
    let store: Arc<dyn KeyValueStore> = match FileStore::open(&data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: cannot open data directory {}: {}", data_dir, e);
            process::exit(1);
        }
    };

    // 2. Initialize the credential verifier
    #[cfg(feature = "auth-argon2")]
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(yap_auth_simple::Argon2Verifier);
    #[cfg(not(feature = "auth-argon2"))]
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(yap_auth_simple::PlainTextVerifier);

    // 3. Load the engine; absent or corrupt slots reseed here
    let mut engine = FeedEngine::load(store, verifier, Theme::Light);
    log::debug!(
        "loaded {} users and {} posts from {}",
        engine.users().len(),
        engine.posts().len(),
        data_dir
    );

    if let Err(e) = commands::run(cmd, &mut engine) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
