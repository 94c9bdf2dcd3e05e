//! License session domain model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle of the license gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseState {
    /// No verified token; every gated operation is rejected
    #[default]
    Locked,
    /// A verification call is outstanding
    Validating,
    /// A token was verified by the backend
    Unlocked,
}

impl LicenseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Validating => "validating",
            Self::Unlocked => "unlocked",
        }
    }
}

impl fmt::Display for LicenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verified token of the active session.
///
/// Lives only in memory and is reset when the session ends.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LicenseSession {
    pub token: String,
    pub valid: bool,
}

impl LicenseSession {
    pub fn verified(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            valid: true,
        }
    }
}

impl fmt::Debug for LicenseSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LicenseSession")
            .field("token", &redact_token(&self.token))
            .field("valid", &self.valid)
            .finish()
    }
}

/// Shorten a token to a prefix that is safe to log.
pub fn redact_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if visible.is_empty() {
        String::new()
    } else {
        format!("{visible}…")
    }
}

/// Claims embedded in a signed license token (`user_id:YYYY-MM-DD:<sha256>`).
///
/// Parsed for display only; the backend decides validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseClaims {
    pub user_id: String,
    pub expires_on: NaiveDate,
}

impl LicenseClaims {
    /// Parse the claims of a signed token; `None` for opaque tokens.
    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.trim().split(':');
        let (user_id, expiry, signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || user_id.is_empty() {
            return None;
        }
        if signature.len() != 64 || !signature.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expires_on = NaiveDate::parse_from_str(expiry, "%Y-%m-%d").ok()?;
        Some(Self {
            user_id: user_id.to_string(),
            expires_on,
        })
    }

    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expires_on < today
    }
}

/// Backend answer to a verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseVerification {
    #[serde(default)]
    pub status: String,
}

impl LicenseVerification {
    /// Whether `status` explicitly reports the token as valid.
    ///
    /// The word `valid` must appear on its own; `invalid`, `not valid` and
    /// the like do not count.
    pub fn signals_valid(&self) -> bool {
        let words: Vec<String> = self
            .status
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut saw_valid = false;
        for (i, word) in words.iter().enumerate() {
            match word.as_str() {
                "valid" => {
                    if i > 0 && matches!(words[i - 1].as_str(), "not" | "no" | "never") {
                        return false;
                    }
                    saw_valid = true;
                }
                "invalid" | "expired" | "revoked" => return false,
                _ => {}
            }
        }
        saw_valid
    }
}
