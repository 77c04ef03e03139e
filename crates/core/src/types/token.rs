//! Opaque token newtypes for the resolution chain.
//!
//! Two kinds of tokens flow through the system: the URL-supplied site token
//! (`EMS` query parameter) that seeds resolution, and scoped access tokens
//! handed back by the marketing API. Both are opaque strings; the newtypes
//! exist so a site token can never be passed where a scoped token is expected.

use serde::{Deserialize, Serialize};

/// Scope level of an access token.
///
/// A brand-scope token authorizes listing the storefronts of a brand; an
/// affiliate-scope token authorizes a single storefront's page metadata,
/// catalog, and lead submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    Brand,
    Affiliate,
}

/// URL-embedded opaque identifier that seeds the token resolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteToken(String);

impl SiteToken {
    /// Create a site token, trimming surrounding whitespace.
    ///
    /// Returns `None` for empty or all-whitespace input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SiteToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque bearer token with a known scope level.
///
/// Implements `Debug` manually so token values never land in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedAccessToken {
    value: String,
    scope: TokenScope,
}

impl std::fmt::Debug for ScopedAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedAccessToken")
            .field("value", &"[REDACTED]")
            .field("scope", &self.scope)
            .finish()
    }
}

impl ScopedAccessToken {
    /// Wrap a brand-scope token value.
    #[must_use]
    pub fn brand(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scope: TokenScope::Brand,
        }
    }

    /// Wrap an affiliate-scope token value.
    #[must_use]
    pub fn affiliate(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scope: TokenScope::Affiliate,
        }
    }

    /// The raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Scope level this token was resolved at.
    #[must_use]
    pub const fn scope(&self) -> TokenScope {
        self.scope
    }

    /// True when the token value is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}
