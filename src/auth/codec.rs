// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Unpadded base64url encoding for token segments (RFC 4648 §5).

use base64ct::{Base64UrlUnpadded, Encoding};

use super::TokenError;

/// Encode bytes as base64url text without `=` padding.
pub fn encode(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decode base64url text, with or without trailing `=` padding.
///
/// Characters from the standard alphabet (`+`, `/`) and whitespace are
/// rejected.
pub fn decode(text: &str) -> Result<Vec<u8>, TokenError> {
    Base64UrlUnpadded::decode_vec(text.trim_end_matches('=')).map_err(|_| TokenError::Decode)
}
