//! Cryptographic operations for the journal guard.
//!
//! This module provides key derivation and entry encryption using
//! well-audited libraries:
//! - **Argon2id**: Memory-hard password derivation
//! - **HKDF / HMAC-SHA256**: Separate verifier and key contexts
//! - **XChaCha20-Poly1305**: Authenticated encryption of entry bodies
//!
//! ## Security Model
//!
//! - No plaintext passwords stored, only a salted verifier
//! - One random nonce per sealed body
//! - Key material zeroized from memory on drop
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the journal database
//! - Offline brute-force attacks on the password
//! - Silent corruption or tampering of stored entries
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod cipher;
pub mod key;
pub mod password;

pub use cipher::{open, seal, CipherScheme, EntryCipher, SealedBody, NONCE_LENGTH};
pub use key::{
    derive_credentials, derive_key, generate_salt, verify_password, Credentials, EntryKey,
    KdfParams,
};
pub use password::{validate_password, PasswordStrength, StrengthLabel};
