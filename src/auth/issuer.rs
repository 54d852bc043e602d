// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuance.

use std::time::Duration;

use serde::Serialize;

use super::{
    claims::{Claims, Header},
    codec,
    signer::{self, HmacKey, KeyUsage},
    TokenError,
};

/// Builds and signs tokens for caller-supplied claims.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: HmacKey,
    issuer: String,
    validity_secs: i64,
}

impl TokenIssuer {
    /// Create an issuer whose key is imported with `usages`.
    ///
    /// `usages` must include [`KeyUsage::Sign`]; adding [`KeyUsage::Verify`]
    /// lets the same key check tokens this issuer produced.
    pub fn new(
        secret: &[u8],
        usages: &[KeyUsage],
        issuer: impl Into<String>,
        validity: Duration,
    ) -> Result<Self, TokenError> {
        let key = signer::derive_key(secret, usages)?;
        if !key.allows(KeyUsage::Sign) {
            return Err(TokenError::KeyUsage(KeyUsage::Sign));
        }

        Ok(Self {
            key,
            issuer: issuer.into(),
            validity_secs: i64::try_from(validity.as_secs()).unwrap_or(i64::MAX),
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn validity_secs(&self) -> i64 {
        self.validity_secs
    }

    /// Issue a token for the JSON object in `raw_claims` at Unix time `now`.
    ///
    /// The token carries the caller's claims plus `iss` and
    /// `exp = now + validity`, which replace any caller-supplied values.
    pub fn issue(&self, raw_claims: &str, now: i64) -> Result<String, TokenError> {
        let claims = Claims::parse(raw_claims)?
            .with_reserved(&self.issuer, now.saturating_add(self.validity_secs));

        let mut token = format!(
            "{}.{}",
            encode_json(&Header::hs256())?,
            codec::encode(claims.to_json()?.as_bytes())
        );

        let signature = signer::sign(&self.key, token.as_bytes())?;
        token.push('.');
        token.push_str(&codec::encode(&signature));

        Ok(token)
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|_| TokenError::InvalidClaimsJson)?;
    Ok(codec::encode(&json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const T: i64 = 1_700_000_000;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            b"INSECUREKEY",
            &[KeyUsage::Sign],
            "nginx",
            Duration::from_secs(600),
        )
        .unwrap()
    }

    fn segment(token: &str, index: usize) -> String {
        let part = token.split('.').nth(index).unwrap();
        String::from_utf8(URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    #[test]
    fn token_has_three_unpadded_segments() {
        let token = issuer().issue(r#"{"sub":"alice"}"#, T).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| !p.is_empty()));
        assert!(!token.contains('='));
        assert!(!token.contains('+') && !token.contains('/'));
    }

    #[test]
    fn header_and_claims_segments_decode_to_expected_json() {
        let token = issuer().issue(r#"{"sub":"alice"}"#, T).unwrap();
        assert_eq!(segment(&token, 0), r#"{"typ":"JWT","alg":"HS256"}"#);
        assert_eq!(
            segment(&token, 1),
            r#"{"sub":"alice","iss":"nginx","exp":1700000600}"#
        );
    }

    #[test]
    fn signature_is_hmac_of_signed_region() {
        let token = issuer().issue("{}", T).unwrap();
        let (region, sig) = token.rsplit_once('.').unwrap();

        let key = signer::derive_key(b"INSECUREKEY", &[KeyUsage::Sign]).unwrap();
        let expected = signer::sign(&key, region.as_bytes()).unwrap();
        assert_eq!(URL_SAFE_NO_PAD.decode(sig).unwrap(), expected);
    }

    #[test]
    fn attacker_supplied_reserved_claims_are_replaced() {
        let token = issuer().issue(r#"{"iss":"attacker","exp":1}"#, T).unwrap();
        let claims: serde_json::Value = serde_json::from_str(&segment(&token, 1)).unwrap();
        assert_eq!(claims["iss"], "nginx");
        assert_eq!(claims["exp"], T + 600);
    }

    #[test]
    fn issuance_is_deterministic_for_same_input() {
        let a = issuer().issue(r#"{"sub":"alice"}"#, T).unwrap();
        let b = issuer().issue(r#"{"sub":"alice"}"#, T).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_object_claims_are_rejected() {
        let issuer = issuer();
        assert_eq!(issuer.issue("", T), Err(TokenError::InvalidClaimsJson));
        assert_eq!(issuer.issue("[]", T), Err(TokenError::InvalidClaimsJson));
        assert_eq!(issuer.issue("{oops", T), Err(TokenError::InvalidClaimsJson));
    }

    #[test]
    fn issuer_requires_sign_usage() {
        let err = TokenIssuer::new(
            b"INSECUREKEY",
            &[KeyUsage::Verify],
            "nginx",
            Duration::from_secs(600),
        )
        .unwrap_err();
        assert_eq!(err, TokenError::KeyUsage(KeyUsage::Sign));
    }

    #[test]
    fn configured_issuer_and_validity_are_used() {
        let issuer = TokenIssuer::new(
            b"INSECUREKEY",
            &[KeyUsage::Sign, KeyUsage::Verify],
            "edge.example",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(issuer.issuer(), "edge.example");
        assert_eq!(issuer.validity_secs(), 30);

        let token = issuer.issue("{}", T).unwrap();
        assert_eq!(
            segment(&token, 1),
            r#"{"iss":"edge.example","exp":1700000030}"#
        );
    }
}
