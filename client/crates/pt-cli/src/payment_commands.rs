use crate::app_error::Result as AppResult;
use crate::output::to_value;

use pt_cli::Client;
use pt_core::PaymentForm;
use pt_session::Clock;

use chrono::Local;
use clap::Subcommand;
use serde_json::Value;

#[derive(Subcommand)]
pub(crate) enum PaymentCommands {
    /// Send a payment to a beneficiary
    Send {
        /// Beneficiary ID (see `pay beneficiary list`)
        #[arg(long)]
        beneficiary: i64,

        /// Amount in rupees, at most two decimals
        #[arg(long)]
        amount: String,

        #[arg(long)]
        description: String,

        /// Local time as YYYY-MM-DDTHH:MM (default: now)
        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },
}

impl PaymentCommands {
    pub(crate) async fn execute(self, client: &Client) -> AppResult<Value> {
        match self {
            Self::Send {
                beneficiary,
                amount,
                description,
                at,
                category,
            } => {
                let form = PaymentForm {
                    amount,
                    description,
                    timestamp: at,
                    category,
                };
                let now = client.session().clock().now();
                let record = client.send_payment(beneficiary, form, &Local, now).await?;
                to_value(&record)
            }
        }
    }
}
