// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HMAC-SHA256 keys, signing and verification.
//!
//! A key is imported once from the raw shared secret together with the
//! operations it may be used for. Verification recomputes the MAC and
//! compares it in constant time.

use std::{fmt, sync::Arc};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Operation a derived key is permitted to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    Sign,
    Verify,
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyUsage::Sign => write!(f, "sign"),
            KeyUsage::Verify => write!(f, "verify"),
        }
    }
}

/// HMAC-SHA256 key material restricted to a set of usages.
///
/// Cloning shares the underlying secret.
#[derive(Clone)]
pub struct HmacKey {
    material: Arc<[u8]>,
    usages: Vec<KeyUsage>,
}

impl HmacKey {
    /// Whether this key was derived for `usage`.
    pub fn allows(&self, usage: KeyUsage) -> bool {
        self.usages.contains(&usage)
    }

    fn require(&self, usage: KeyUsage) -> Result<(), TokenError> {
        if self.allows(usage) {
            Ok(())
        } else {
            Err(TokenError::KeyUsage(usage))
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.material)
            .map_err(|_| TokenError::InvalidKey("HMAC key rejected".to_string()))
    }
}

impl fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacKey")
            .field("material", &"<redacted>")
            .field("usages", &self.usages)
            .finish()
    }
}

/// Import a raw secret as an HMAC-SHA256 key for the given usages.
pub fn derive_key(secret: &[u8], usages: &[KeyUsage]) -> Result<HmacKey, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidKey("secret is empty".to_string()));
    }
    if usages.is_empty() {
        return Err(TokenError::InvalidKey("no key usages requested".to_string()));
    }

    let mut allowed = Vec::with_capacity(usages.len());
    for usage in usages {
        if !allowed.contains(usage) {
            allowed.push(*usage);
        }
    }

    Ok(HmacKey {
        material: Arc::from(secret),
        usages: allowed,
    })
}

/// Compute HMAC-SHA256 of `message`.
pub fn sign(key: &HmacKey, message: &[u8]) -> Result<Vec<u8>, TokenError> {
    key.require(KeyUsage::Sign)?;
    let mut mac = key.mac()?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Check `signature` against the HMAC-SHA256 of `message`.
///
/// Any length or content mismatch yields `Ok(false)`.
pub fn verify(key: &HmacKey, signature: &[u8], message: &[u8]) -> Result<bool, TokenError> {
    key.require(KeyUsage::Verify)?;
    let mut mac = key.mac()?;
    mac.update(message);
    Ok(mac.verify_slice(signature).is_ok())
}
