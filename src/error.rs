// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::http::StatusCode;

use crate::{auth::TokenError, exchange::EdgeExchange};

/// Rejection emitted at the request boundary as a status and a plain-text
/// diagnostic.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Newline-terminated diagnostic body.
    pub fn body(&self) -> String {
        format!("{}\n", self.message)
    }

    pub fn respond_to<E: EdgeExchange>(self, exchange: &mut E) {
        let body = self.body();
        exchange.respond(self.status, body);
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}
