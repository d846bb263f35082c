//! Salted password hashing.
//!
//! Stored form is `<salt hex>$<sha256(salt || password) hex>`.

use sha2::{Digest, Sha256};

#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: u128 = rand::random();

    format!("{salt:032x}${}", digest(&format!("{salt:032x}"), password))
}

#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };

    digest(salt, password) == expected
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips() {
        let stored = hash_password("admin123");

        assert!(verify_password("admin123", &stored));
        assert!(!verify_password("admin124", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("admin123"), hash_password("admin123"));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("admin123", "not-a-hash"));
        assert!(!verify_password("admin123", ""));
    }
}
