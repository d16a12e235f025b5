//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

/// Persistence contract: a synchronous, process-wide key-value store holding
/// one JSON document (or bare string) per slot.
///
/// `get` returning `None` means the key is absent; a present-but-unparseable
/// value is the caller's problem and is treated the same as absent.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Credential encoding and verification contract.
///
/// The auth flow never inspects the stored secret itself, so a plaintext
/// scheme and a salted-hash scheme are interchangeable behind this trait.
pub trait CredentialVerifier: Send + Sync {
    /// Encodes a raw password into its stored form.
    fn encode(&self, password: &str) -> anyhow::Result<String>;

    /// Checks a raw password against a stored secret.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Text-improvement oracle consumed by the post composer.
///
/// Implementations must degrade rather than fail: `improve` falls back to
/// the input unchanged and `suggest_tags` to an empty list. The composer is
/// never blocked or crashed by this collaborator.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn improve(&self, text: &str) -> String;
    async fn suggest_tags(&self, text: &str) -> Vec<String>;
}
