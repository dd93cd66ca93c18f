//! Caller-supplied session material.
//!
//! Credentials are owned by the caller, borrowed by an adapter for the length
//! of one import and dropped with it. Nothing in this crate stores them:
//! `Credentials` is not `Clone`. Secret values are zeroized on drop and
//! redacted in `Debug` output.

use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroize;

use crate::error::{ImportError, Result};
use crate::types::Platform;

/// A secret string that never prints and is wiped from memory on drop.
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// One browser cookie of an authenticated session.
#[derive(Debug)]
pub struct SessionCookie {
    pub name: String,
    value: Secret,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Secret::new(value),
        }
    }

    pub fn value(&self) -> &str {
        self.value.expose()
    }

    /// Parse a single `name=value` pair.
    pub fn parse(pair: &str) -> Result<Self> {
        match pair.trim().split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok(Self::new(name.trim(), value.trim()))
            }
            _ => Err(ImportError::config(
                "cookie must be given as name=value".to_string(),
            )),
        }
    }
}

/// Authentication material for one import call.
#[derive(Debug)]
pub enum Credentials {
    /// Public league, nothing to send
    None,
    /// Cookies of a logged-in browser session
    SessionCookies(Vec<SessionCookie>),
    /// Bearer token for platforms with an authenticated API
    ApiToken(Secret),
}

impl Credentials {
    /// Parse a `Cookie:` header style string (`a=1; b=2`).
    pub fn from_cookie_header(header: &str) -> Result<Self> {
        let cookies = header
            .split(';')
            .filter(|p| !p.trim().is_empty())
            .map(SessionCookie::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Credentials::SessionCookies(cookies))
    }

    pub fn cookies(&self) -> &[SessionCookie] {
        match self {
            Credentials::SessionCookies(c) => c,
            _ => &[],
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&SessionCookie> {
        self.cookies().iter().find(|c| c.name == name)
    }

    pub fn api_token(&self) -> Option<&str> {
        match self {
            Credentials::ApiToken(t) => Some(t.expose()),
            _ => None,
        }
    }

    /// Fail fast unless every cookie in `required` is present and non-empty.
    /// With an empty `required`, at least one cookie must be present.
    pub fn require_cookies(&self, platform: Platform, required: &[&str]) -> Result<()> {
        let cookies = self.cookies();
        if cookies.is_empty() {
            return Err(ImportError::config(format!(
                "{platform} import needs session cookies"
            )));
        }
        for name in required {
            match self.cookie(name) {
                Some(c) if !c.value.is_empty() => {}
                _ => {
                    return Err(ImportError::config(format!(
                        "{platform} session cookie {name:?} is missing"
                    )))
                }
            }
        }
        Ok(())
    }

    /// Stable SHA-256 digest identifying the caller behind these credentials.
    ///
    /// Used to key in-flight jobs without keeping the secret itself.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        match self {
            Credentials::None => hasher.update(b"none"),
            Credentials::ApiToken(t) => {
                hasher.update(b"token:");
                hasher.update(t.expose().as_bytes());
            }
            Credentials::SessionCookies(cookies) => {
                let mut pairs: Vec<(&str, &str)> =
                    cookies.iter().map(|c| (c.name.as_str(), c.value())).collect();
                pairs.sort_unstable();
                hasher.update(b"cookies:");
                for (name, value) in pairs {
                    hasher.update(name.as_bytes());
                    hasher.update(b"=");
                    hasher.update(value.as_bytes());
                    hasher.update(b";");
                }
            }
        }
        hex::encode(hasher.finalize())
    }
}
