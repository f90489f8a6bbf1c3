use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Argon2 with default parameters; every hash carries its own random salt,
/// so the same password never produces the same hash twice.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Returns Ok(false) for a wrong password; errors only when the stored hash
/// itself cannot be parsed.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("stored password hash is malformed: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_password_verifies() {
        let hash = hash_password("course-admin-pw-2024").expect("hash");
        assert!(verify_password("course-admin-pw-2024", &hash).expect("verify"));
    }

    #[test]
    fn wrong_password_is_refused_without_error() {
        let hash = hash_password("alices-real-password").expect("hash");
        assert!(!verify_password("alices-guessed-password", &hash).expect("verify"));
    }

    #[test]
    fn empty_password_still_roundtrips() {
        // Length policy lives in the register handler, not down here.
        let hash = hash_password("").expect("hash");
        assert!(verify_password("", &hash).expect("verify"));
        assert!(!verify_password("x", &hash).expect("verify"));
    }

    #[test]
    fn salts_make_hashes_unique() {
        let a = hash_password("same-input").expect("hash");
        let b = hash_password("same-input").expect("hash");
        assert_ne!(a, b);
        assert!(verify_password("same-input", &a).expect("verify"));
        assert!(verify_password("same-input", &b).expect("verify"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_mismatch() {
        let err = verify_password("anything", "plaintext-left-in-column").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
