//! `trinity verify`: check the license token against the backend.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use console::style;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::{unlocked_session, GlobalArgs};
use crate::domain::models::{redact_token, Config, LicenseClaims, LicenseState};

#[derive(Args, Debug)]
pub struct VerifyArgs {}

#[derive(Debug, Serialize)]
pub struct ClaimsOutput {
    pub user_id: String,
    pub expires_on: NaiveDate,
    pub expired: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub state: LicenseState,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<ClaimsOutput>,
}

impl VerifyOutput {
    fn new(state: LicenseState, token: &str, today: NaiveDate) -> Self {
        Self {
            state,
            token: redact_token(token),
            claims: LicenseClaims::parse(token).map(|claims| ClaimsOutput {
                expired: claims.is_expired_on(today),
                user_id: claims.user_id,
                expires_on: claims.expires_on,
            }),
        }
    }
}

impl CommandOutput for VerifyOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} License valid ({})",
            style("✓").green().bold(),
            self.token
        )];
        if let Some(claims) = &self.claims {
            lines.push(format!("  User:    {}", claims.user_id));
            let expiry = if claims.expired {
                style(format!("{} (expired)", claims.expires_on)).yellow().to_string()
            } else {
                claims.expires_on.to_string()
            };
            lines.push(format!("  Expires: {expiry}"));
        }
        lines.join("\n")
    }
}

pub async fn execute(_args: VerifyArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    let session = unlocked_session(global, config).await?;
    let token = session.license().session().await.token;

    let result = VerifyOutput::new(
        session.license().state().await,
        &token,
        Utc::now().date_naive(),
    );
    session.end().await;

    output(&result, global.json);
    Ok(())
}
