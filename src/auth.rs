// src/auth.rs

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ReconError, ReconResult};

/// Identifier of an authenticated caller.
pub type UserId = String;

/// Answers "who is making this request", if anyone.
pub trait SessionResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<UserId>;
}

/// Resolves `Authorization: Bearer <token>` against a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct BearerTokenAuth {
    tokens: HashMap<String, UserId>,
}

impl BearerTokenAuth {
    /// Builds the table from `user:token` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> ReconResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = HashMap::new();
        for pair in pairs {
            let pair = pair.as_ref().trim();
            if pair.is_empty() {
                continue;
            }
            let (user, token) = pair
                .split_once(':')
                .map(|(u, t)| (u.trim(), t.trim()))
                .filter(|(u, t)| !u.is_empty() && !t.is_empty())
                .ok_or_else(|| {
                    ReconError::Config(format!("token entry must look like 'user:token', got '{pair}'"))
                })?;
            tokens.insert(token.to_string(), user.to_string());
        }
        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl SessionResolver for BearerTokenAuth {
    fn resolve(&self, headers: &HeaderMap) -> Option<UserId> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))?
            .trim();
        let user = self.tokens.get(token).cloned();
        if user.is_none() {
            debug!("Bearer token did not match any known session.");
        }
        user
    }
}
