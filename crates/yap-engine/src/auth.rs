//! Credential plumbing shared by the engine's register/login paths.
//!
//! Username matching is case-insensitive and whitespace-trimmed; password
//! matching is exact and delegated to the configured `CredentialVerifier`.

/// Canonical form of a handle: trimmed and lowercased. Applied to user input
/// on both registration and login, never to stored passwords.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_folds() {
        assert_eq!(normalize_username("  Alice "), "alice");
        assert_eq!(normalize_username("BOB_99"), "bob_99");
        assert_eq!(normalize_username(""), "");
    }
}
