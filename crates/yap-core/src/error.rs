//! # AppError
//!
//! Centralized error handling for the Yap ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all yap-core operations.
///
/// Mutations attempted without a session fail with `Unauthenticated`, and
/// mutations attempted without permission fail with `Forbidden`; neither is
/// ever swallowed silently. Storage corruption is the one failure class that
/// never surfaces here: the engine recovers it locally by reseeding.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., User, Post)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Registration collided with an existing handle (case-insensitive)
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    /// Login failed; deliberately does not say which half was wrong
    #[error("invalid username or password")]
    InvalidCredentials,

    /// A mutation requiring a session was attempted without one
    #[error("not signed in")]
    Unauthenticated,

    /// The session user lacks permission for this mutation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Validation failure (e.g., post too long, unknown space)
    #[error("validation error: {0}")]
    Validation(String),

    /// Infrastructure failure (e.g., the store rejected a write)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for Yap logic.
pub type Result<T> = std::result::Result<T, AppError>;
