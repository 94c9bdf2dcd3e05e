//! Wire types for the assurance backend's JSON API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct VerifyLicenseBody<'a> {
    pub license_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryListBody {
    /// A body without `files` is an empty history
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryFileBody {
    pub content: String,
}

/// Error body as produced by the backend framework.
///
/// `detail` is usually a string; request validation failures carry a list
/// of `{loc, msg, type}` objects instead.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Flatten `detail` into a single user-visible message.
    pub fn message(&self) -> Option<String> {
        let message = match self.detail.as_ref()? {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(serde_json::Value::as_str)
                        .map_or_else(|| item.to_string(), str::to_string)
                })
                .collect::<Vec<_>>()
                .join("; "),
            serde_json::Value::Null => return None,
            other => other.to_string(),
        };
        let message = message.trim().to_string();
        (!message.is_empty()).then_some(message)
    }
}
