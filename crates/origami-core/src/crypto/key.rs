//! Credential derivation using Argon2id.
//!
//! A single Argon2id run turns password + salt into a master secret. Two
//! values are expanded from it under separate contexts:
//! - **verifier**: HMAC-SHA256, stored in the password record
//! - **entry key**: HKDF-SHA256, held in memory by an unlocked session
//!
//! The master secret never leaves this module and is zeroized after use.

use argon2::Argon2;
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{JournalError, Result};

/// Argon2id defaults.
///
/// These values balance security and usability on a desktop:
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
const DEFAULT_ITERATIONS: u32 = 3;
const DEFAULT_PARALLELISM: u32 = 1;

/// Length of the random salt generated for a new password record.
pub const SALT_LENGTH: usize = 16;

/// Length of the entry key in bytes (XChaCha20-Poly1305 key size).
pub const KEY_LENGTH: usize = 32;

/// Length of the stored verifier in bytes.
pub const VERIFIER_LENGTH: usize = 32;

const MASTER_LENGTH: usize = 32;
const VERIFIER_CONTEXT: &[u8] = b"origami/journal/verifier/v1";
const ENTRY_KEY_CONTEXT: &[u8] = b"origami/journal/entry-key/v1";

type HmacSha256 = Hmac<Sha256>;

/// Argon2id cost parameters.
///
/// Stored with every password record so an installation keeps verifying with
/// the parameters it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl KdfParams {
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Check that Argon2 accepts these parameters.
    pub fn validate(&self) -> Result<()> {
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(MASTER_LENGTH),
        )
        .map_err(|e| JournalError::InvalidInput(format!("Invalid KDF parameters: {}", e)))?;

        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS, DEFAULT_PARALLELISM)
    }
}

/// Symmetric key used to seal journal entry bodies.
///
/// Key material is zeroized from memory when dropped, so locking a session
/// (which drops the key) also wipes it.
#[derive(ZeroizeOnDrop)]
pub struct EntryKey {
    key: [u8; KEY_LENGTH],
}

impl EntryKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Output of a first-time derivation: what to persist and what to keep.
#[derive(Debug)]
pub struct Credentials {
    /// Verifier to persist in the password record
    pub verifier: [u8; VERIFIER_LENGTH],
    /// Key for the session; never persisted
    pub key: EntryKey,
}

/// Generate a fresh random salt from the OS CSPRNG.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive both the verifier and the entry key from a password.
///
/// Used when a password record is created or replaced.
pub fn derive_credentials(password: &str, salt: &[u8], params: &KdfParams) -> Result<Credentials> {
    let master = derive_master(password, salt, params)?;
    Ok(Credentials {
        verifier: verifier_from_master(&master)?,
        key: entry_key_from_master(&master, salt)?,
    })
}

/// Derive only the entry key for a password.
///
/// Same password + salt + params always produce the same key.
pub fn derive_key(password: &str, salt: &[u8], params: &KdfParams) -> Result<EntryKey> {
    let master = derive_master(password, salt, params)?;
    entry_key_from_master(&master, salt)
}

/// Check a password against a stored verifier and return the entry key.
///
/// The verifier comparison is constant-time.
///
/// # Errors
///
/// Returns `JournalError::InvalidCredential` when the password does not match.
pub fn verify_password(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
    verifier: &[u8],
) -> Result<EntryKey> {
    let master = derive_master(password, salt, params)?;
    verifier_mac(&master)?
        .verify_slice(verifier)
        .map_err(|_| JournalError::InvalidCredential)?;
    entry_key_from_master(&master, salt)
}

fn derive_master(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; MASTER_LENGTH]>> {
    if password.is_empty() {
        return Err(JournalError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(JournalError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let mut master = Zeroizing::new([0u8; MASTER_LENGTH]);
    params
        .argon2()?
        .hash_password_into(password.as_bytes(), salt, &mut *master)
        .map_err(|e| JournalError::Crypto(format!("Key derivation failed: {}", e)))?;
    Ok(master)
}

fn verifier_mac(master: &[u8; MASTER_LENGTH]) -> Result<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(master)
        .map_err(|e| JournalError::Crypto(format!("Verifier setup failed: {}", e)))?;
    mac.update(VERIFIER_CONTEXT);
    Ok(mac)
}

fn verifier_from_master(master: &[u8; MASTER_LENGTH]) -> Result<[u8; VERIFIER_LENGTH]> {
    let tag = verifier_mac(master)?.finalize().into_bytes();
    let mut verifier = [0u8; VERIFIER_LENGTH];
    verifier.copy_from_slice(&tag);
    Ok(verifier)
}

fn entry_key_from_master(master: &[u8; MASTER_LENGTH], salt: &[u8]) -> Result<EntryKey> {
    let mut key = [0u8; KEY_LENGTH];
    Hkdf::<Sha256>::new(Some(salt), master)
        .expand(ENTRY_KEY_CONTEXT, &mut key)
        .map_err(|e| JournalError::Crypto(format!("Key expansion failed: {}", e)))?;
    Ok(EntryKey::from_bytes(key))
}
