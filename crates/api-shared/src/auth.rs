//! Staff password hashing.
//!
//! Stored hashes have the form `pbkdf2_sha256$<iterations>$<salt-hex>$<hash-hex>`. The
//! iteration count travels with each hash, so raising [`PBKDF2_ITERATIONS`] leaves existing
//! hashes verifiable.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Scheme tag at the start of every stored hash.
pub const SCHEME: &str = "pbkdf2_sha256";
pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const SALT_LEN: usize = 16;
pub const HASH_LEN: usize = 32;

/// Hash `password` with a fresh random salt and [`PBKDF2_ITERATIONS`] rounds.
///
/// # Arguments
///
/// * `password` - The plaintext password, used exactly as given.
///
/// # Returns
///
/// The encoded hash to store alongside the account.
pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, PBKDF2_ITERATIONS)
}

/// Hash `password` with an explicit round count. A count of zero is raised to one.
pub fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    let iterations = iterations.max(1);
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let key = derive(password, &salt, iterations);
    format!(
        "{SCHEME}${iterations}${}${}",
        hex::encode(salt),
        hex::encode(key)
    )
}

/// Check `password` against a stored hash.
///
/// # Returns
///
/// `true` only if the hash is well formed and matches. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt_hex), Some(expected_hex), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    if iterations == 0 {
        return false;
    }
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(expected_hex)) else {
        return false;
    };
    if expected.len() != HASH_LEN {
        return false;
    }
    let actual = derive(password, &salt, iterations);
    actual.as_slice().ct_eq(expected.as_slice()).into()
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut key = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}
