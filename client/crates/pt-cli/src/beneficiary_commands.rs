use crate::app_error::Result as AppResult;
use crate::output::to_value;

use pt_cli::Client;

use clap::Subcommand;
use serde_json::Value;

#[derive(Subcommand)]
pub(crate) enum BeneficiaryCommands {
    /// List your beneficiaries
    List,

    /// Add a beneficiary
    Add {
        /// Payee's registered email
        #[arg(long)]
        email: String,

        /// Display name, 2 to 50 characters
        #[arg(long)]
        alias: String,
    },
}

impl BeneficiaryCommands {
    pub(crate) async fn execute(self, client: &Client) -> AppResult<Value> {
        match self {
            Self::List => to_value(&client.list_beneficiaries().await?),
            Self::Add { email, alias } => to_value(&client.enroll_beneficiary(&email, &alias).await?),
        }
    }
}
