//! Entry body encryption.
//!
//! Uses XChaCha20-Poly1305 (192-bit nonce).
//! Key size: 32 bytes. Nonce: 24 bytes (random, one per seal). Tag: 16 bytes,
//! appended to the ciphertext.
//!
//! Journals without a password use the pass-through strategy instead. It is a
//! separate variant of [`EntryCipher`], never an AEAD call with a dummy key.

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use serde::{Deserialize, Serialize};

use super::key::EntryKey;
use crate::error::{JournalError, Result};

/// Nonce length for XChaCha20-Poly1305.
pub const NONCE_LENGTH: usize = 24;

/// How a stored body was produced. Persisted next to every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherScheme {
    #[serde(rename = "xchacha20poly1305")]
    XChaCha20Poly1305,
    #[serde(rename = "plain")]
    PassThrough,
}

impl CipherScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XChaCha20Poly1305 => "xchacha20poly1305",
            Self::PassThrough => "plain",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "xchacha20poly1305" => Some(Self::XChaCha20Poly1305),
            "plain" => Some(Self::PassThrough),
            _ => None,
        }
    }
}

/// A body as it is stored: scheme tag, bytes, and nonce (sealed bodies only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBody {
    pub scheme: CipherScheme,
    pub ciphertext: Vec<u8>,
    pub nonce: Option<Vec<u8>>,
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// `aad` is authenticated but not encrypted.
pub fn seal(plaintext: &[u8], key: &EntryKey, aad: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LENGTH])> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| JournalError::Crypto(format!("Failed to create cipher: {}", e)))?;

    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, Payload { msg: plaintext, aad })
        .map_err(|_| JournalError::Crypto("Entry encryption failed".to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    nonce_bytes.copy_from_slice(&nonce);
    Ok((ciphertext, nonce_bytes))
}

/// Decrypt and authenticate a body sealed by [`seal`].
///
/// # Errors
///
/// Returns `JournalError::TamperedOrWrongKey` if the nonce is malformed or the
/// authentication tag does not verify. No partial plaintext is returned.
pub fn open(ciphertext: &[u8], nonce: &[u8], key: &EntryKey, aad: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LENGTH {
        return Err(JournalError::TamperedOrWrongKey);
    }

    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| JournalError::Crypto(format!("Failed to create cipher: {}", e)))?;

    cipher
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| JournalError::TamperedOrWrongKey)
}

/// Cipher strategy for a session.
#[derive(Debug)]
pub enum EntryCipher {
    /// Protection enabled: authenticated encryption under the derived key
    Aead(EntryKey),
    /// Protection disabled: bodies are stored as UTF-8 bytes
    PassThrough,
}

impl EntryCipher {
    pub fn scheme(&self) -> CipherScheme {
        match self {
            Self::Aead(_) => CipherScheme::XChaCha20Poly1305,
            Self::PassThrough => CipherScheme::PassThrough,
        }
    }

    /// Produce the stored form of `plaintext`.
    pub fn seal_body(&self, plaintext: &[u8], aad: &[u8]) -> Result<SealedBody> {
        match self {
            Self::Aead(key) => {
                let (ciphertext, nonce) = seal(plaintext, key, aad)?;
                Ok(SealedBody {
                    scheme: CipherScheme::XChaCha20Poly1305,
                    ciphertext,
                    nonce: Some(nonce.to_vec()),
                })
            }
            Self::PassThrough => Ok(SealedBody {
                scheme: CipherScheme::PassThrough,
                ciphertext: plaintext.to_vec(),
                nonce: None,
            }),
        }
    }

    /// Recover the plaintext of a stored body.
    ///
    /// A body whose scheme does not match this strategy is treated as
    /// tampered: a plain body inside a protected journal was not written by
    /// this session, and a sealed body cannot be read without a key.
    pub fn open_body(&self, body: &SealedBody, aad: &[u8]) -> Result<Vec<u8>> {
        match (self, body.scheme) {
            (Self::Aead(key), CipherScheme::XChaCha20Poly1305) => {
                let nonce = body
                    .nonce
                    .as_deref()
                    .ok_or(JournalError::TamperedOrWrongKey)?;
                open(&body.ciphertext, nonce, key, aad)
            }
            (Self::PassThrough, CipherScheme::PassThrough) => {
                if body.nonce.is_some() {
                    return Err(JournalError::TamperedOrWrongKey);
                }
                Ok(body.ciphertext.clone())
            }
            _ => Err(JournalError::TamperedOrWrongKey),
        }
    }
}
