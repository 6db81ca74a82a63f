//! Salted SHA-256 password hashes stored as `salt$hexdigest`.

use sha2::{Digest, Sha256};
use uuid::Uuid;

const SEPARATOR: char = '$';

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}{}{}", salt, SEPARATOR, digest(&salt, password))
}

/// Check `password` against a stored `salt$digest` hash. Malformed hashes
/// never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once(SEPARATOR) {
        Some((salt, expected)) if !salt.is_empty() => {
            let actual = digest(salt, password);
            // Compare every byte so timing does not leak the matching prefix.
            actual.len() == expected.len()
                && actual
                    .bytes()
                    .zip(expected.bytes())
                    .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                    == 0
        }
        _ => false,
    }
}
