//! Canonical repository keys.
//!
//! A [`RepoKey`] is the identifier shared by generation, artifact download and
//! history lookups. It is always derived from a repository URL and never
//! cached by consumers, so two components looking at the same URL agree on
//! the key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Repository key derived from a repository URL.
///
/// An empty key means "no repository selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoKey(String);

impl RepoKey {
    /// Derive the key for `repo_url`.
    ///
    /// Trims whitespace, strips trailing `/` and a trailing `.git`, takes the
    /// final path segment (after `/`, or after `:` in scp-style URLs) and
    /// spells hyphens as underscores. A segment that is not safe to use as a
    /// URL path component yields the empty key.
    pub fn derive(repo_url: &str) -> Self {
        let mut rest = repo_url.trim();
        loop {
            let trimmed = rest.trim_end_matches('/').trim_end();
            let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
            if trimmed.len() == rest.len() {
                break;
            }
            rest = trimmed;
        }

        let segment = rest.rsplit(['/', ':']).next().unwrap_or_default().trim();
        if !is_safe_segment(segment) {
            return Self::default();
        }

        Self(segment.replace('-', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Suggested filename for this repository's test bundle.
    pub fn bundle_filename(&self) -> String {
        format!("{}_tests.zip", self.0)
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepoKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
