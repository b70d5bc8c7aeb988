//! Password hashing and session management.
//!
//! Stored credentials come in three shapes: modern bcrypt hashes (`$2...`),
//! legacy `scrypt$<saltHex>$<hashHex>` values, and raw plaintext left over
//! from pre-launch seed data. Verification dispatches on the prefix; any
//! successful non-bcrypt login is immediately rewritten as bcrypt.

use parking_lot::RwLock;
use scrypt::Params;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use uuid::Uuid;

const BCRYPT_COST: u32 = 12;

/// Reset codes are valid for 15 minutes.
pub const RESET_CODE_TTL_MS: i64 = 15 * 60 * 1000;

/// Hash a password with the modern scheme.
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, BCRYPT_COST)
}

/// Verify a password against a stored value of any recognized shape.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    if stored.is_empty() {
        return false;
    }
    if stored.starts_with("$2") {
        return bcrypt::verify(plain, stored).unwrap_or(false);
    }
    if stored.starts_with("scrypt$") {
        return verify_legacy_scrypt(plain, stored);
    }
    // Un-migrated seed rows only; never produced for fresh accounts.
    plain.as_bytes().ct_eq(stored.as_bytes()).into()
}

/// Whether a stored value still uses a pre-bcrypt scheme and should be
/// rewritten after a successful login.
pub fn needs_rehash(stored: &str) -> bool {
    !stored.starts_with("$2")
}

fn verify_legacy_scrypt(plain: &str, stored: &str) -> bool {
    let parts: Vec<&str> = stored.split('$').collect();
    if parts.len() != 3 {
        return false;
    }
    let Ok(salt) = hex::decode(parts[1]) else {
        return false;
    };
    let Ok(expected) = hex::decode(parts[2]) else {
        return false;
    };

    // Matches the parameters the legacy scheme derived with (N=16384, r=8, p=1).
    let Ok(params) = Params::new(14, 8, 1, expected.len()) else {
        return false;
    };

    let mut actual = vec![0u8; expected.len()];
    if scrypt::scrypt(plain.as_bytes(), &salt, &params, &mut actual).is_err() {
        return false;
    }

    actual.ct_eq(&expected).into()
}

/// Six-digit numeric password-reset code.
pub fn generate_reset_code() -> String {
    use rand::Rng;
    rand::rng().random_range(100_000..1_000_000).to_string()
}

/// Bearer-token session store.
///
/// Sessions do not expire; they are dropped on explicit logout or process
/// restart. Re-login is cheap, so restart-loses-sessions is an accepted
/// limitation of the in-memory backend.
pub trait SessionStore: Send + Sync {
    /// Mint a token for a user and return it.
    fn create(&self, user_id: i64) -> String;
    /// Look up the user behind a token.
    fn resolve(&self, token: &str) -> Option<i64>;
    /// Drop a token. Unknown tokens are ignored.
    fn revoke(&self, token: &str);
}

/// Process-local session store for single-instance deployments.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, i64>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().insert(token.clone(), user_id);
        token
    }

    fn resolve(&self, token: &str) -> Option<i64> {
        self.sessions.read().get(token).copied()
    }

    fn revoke(&self, token: &str) {
        self.sessions.write().remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcrypt_round_trip() {
        let hash = hash_password("hunter2-campus").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("hunter2-campus", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!needs_rehash(&hash));
    }

    #[test]
    fn legacy_scrypt_verifies_and_flags_rehash() {
        // Build a fixture with the same derivation the verifier uses.
        let salt = b"0123456789abcdef";
        let params = Params::new(14, 8, 1, 32).unwrap();
        let mut digest = vec![0u8; 32];
        scrypt::scrypt(b"legacy-pass", salt, &params, &mut digest).unwrap();
        let stored = format!("scrypt${}${}", hex::encode(salt), hex::encode(&digest));

        assert!(verify_password("legacy-pass", &stored));
        assert!(!verify_password("other", &stored));
        assert!(needs_rehash(&stored));
    }

    #[test]
    fn malformed_legacy_values_are_rejected() {
        assert!(!verify_password("x", "scrypt$nothex$zz"));
        assert!(!verify_password("x", "scrypt$deadbeef"));
        assert!(!verify_password("x", ""));
    }

    #[test]
    fn plaintext_fallback_only_matches_exactly() {
        assert!(verify_password("seed123", "seed123"));
        assert!(!verify_password("seed1234", "seed123"));
        assert!(needs_rehash("seed123"));
    }

    #[test]
    fn reset_codes_are_six_digits() {
        for _ in 0..32 {
            let code = generate_reset_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn session_store_create_resolve_revoke() {
        let store = MemorySessionStore::new();
        let token = store.create(7);
        assert_eq!(store.resolve(&token), Some(7));
        store.revoke(&token);
        assert_eq!(store.resolve(&token), None);
        store.revoke(&token);
    }
}
