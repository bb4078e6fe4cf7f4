use crate::app_error::{AppError, Result as AppResult};

use pt_cli::{Client, ClientError};

use std::sync::Arc;

use clap::Subcommand;
use log::info;
use serde_json::{Value, json};
use tokio::sync::Notify;

#[derive(Subcommand)]
pub(crate) enum SessionCommands {
    /// Keep the cached session refreshed until Ctrl-C or expiry
    Keepalive,
}

impl SessionCommands {
    pub(crate) async fn execute(self, client: &Client, expired: Arc<Notify>) -> AppResult<Value> {
        match self {
            Self::Keepalive => {
                let user = client
                    .session()
                    .current_user()
                    .ok_or_else(AppError::not_logged_in)?;

                info!(
                    "Keeping session for {} alive, next refresh at {:?}",
                    user.email,
                    client.session().next_refresh_at()
                );

                tokio::select! {
                    _ = expired.notified() => Err(ClientError::session_expired().into()),
                    _ = tokio::signal::ctrl_c() => {
                        info!("Keepalive stopped");
                        Ok(json!({
                            "user": user,
                            "active": client.session().is_active(),
                        }))
                    }
                }
            }
        }
    }
}
