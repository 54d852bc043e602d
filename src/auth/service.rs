// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide issuer/validator pair built from the configured secret.

use crate::config::TokenSettings;

use super::{KeyUsage, TokenError, TokenIssuer, TokenValidator, BEARER_SCHEME};

/// Keys are imported once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct TokenService {
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl TokenService {
    pub fn new(settings: &TokenSettings) -> Result<Self, TokenError> {
        let issuer = TokenIssuer::new(
            &settings.secret,
            &[KeyUsage::Sign],
            settings.issuer.clone(),
            settings.validity,
        )?;
        let validator = TokenValidator::new(&settings.secret, &[KeyUsage::Verify])?;

        Ok(Self { issuer, validator })
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    /// Issue an empty-claims token and validate it with the live keys.
    pub fn self_check(&self, now: i64) -> Result<(), TokenError> {
        let token = self.issuer.issue("{}", now)?;
        self.validator
            .validate(Some(&format!("{BEARER_SCHEME} {token}")))
            .map(|_| ())
    }
}
