// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(tokens: TokenService) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State with the given secret, issuer `nginx` and a 600 second window.
    pub fn with_secret(secret: &[u8]) -> Self {
        use crate::config::{TokenSettings, DEFAULT_ISSUER, DEFAULT_VALIDITY_SECS};
        use std::time::Duration;

        let settings = TokenSettings {
            secret: secret.to_vec(),
            issuer: DEFAULT_ISSUER.to_string(),
            validity: Duration::from_secs(DEFAULT_VALIDITY_SECS),
        };
        let tokens = TokenService::new(&settings).expect("test secret is valid");
        Self::new(tokens)
    }
}
