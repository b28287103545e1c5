//! Authentication module: session-token resolution and the service key.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::AuthSession;

/// Wrapper type for the automation service key.
/// Uses `SecretString` to prevent accidental logging and zeroize on drop.
///
/// # Security features
/// - `Debug` prints `[REDACTED]` instead of the actual value
/// - Memory is zeroed when dropped (via `zeroize`)
/// - Explicit `.expose_secret()` required to access the value
#[derive(Clone)]
pub struct ServiceKey(Option<SecretString>);

impl ServiceKey {
    /// Create a new ServiceKey from an optional string.
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(SecretString::from))
    }

    /// Securely compare the provided key with the stored service key.
    ///
    /// Uses `subtle::ConstantTimeEq` which performs a constant-time byte-by-byte
    /// comparison. Unlike a manual fold, `ConstantTimeEq` also avoids leaking
    /// the key length through early-exit branching — both buffers are compared
    /// in full regardless of where they first differ.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => {
                let expected = secret.expose_secret();
                // ConstantTimeEq returns 0 (false) for unequal lengths without
                // any early exit, preventing a length oracle.
                expected.as_bytes().ct_eq(provided.as_bytes()).into()
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "ServiceKey([REDACTED])"),
            None => write!(f, "ServiceKey(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_matches_exact_key() {
        let key = ServiceKey::new(Some("automation-key".to_string()));
        assert!(key.verify("automation-key"));
        assert!(!key.verify("automation-keY"));
        assert!(!key.verify("automation-key-longer"));
        assert!(!key.verify(""));
    }

    #[test]
    fn test_verify_always_fails_without_configured_key() {
        let key = ServiceKey::new(None);
        assert!(!key.verify("anything"));
        assert!(!key.verify(""));
    }

    #[test]
    fn test_debug_never_prints_key() {
        let key = ServiceKey::new(Some("top-secret".to_string()));
        let printed = format!("{:?}", key);
        assert!(!printed.contains("top-secret"));
        assert!(printed.contains("REDACTED"));
    }
}
