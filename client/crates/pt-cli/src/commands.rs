use crate::{
    auth_commands::AuthCommands, beneficiary_commands::BeneficiaryCommands,
    dashboard_commands::DashboardArgs, payment_commands::PaymentCommands,
    session_commands::SessionCommands,
};

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Login, signup, and password reset
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },

    /// Saved payees
    Beneficiary {
        #[command(subcommand)]
        action: BeneficiaryCommands,
    },

    /// Record payments
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },

    /// Totals and recent transactions
    Dashboard(DashboardArgs),

    /// Session maintenance
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
}

impl Commands {
    /// Text shown when the backend rejects a command without a message.
    pub(crate) fn failure_message(&self) -> &'static str {
        match self {
            Self::Auth { action } => action.failure_message(),
            Self::Beneficiary { .. } => "Failed to load beneficiaries",
            Self::Payment { .. } => "Failed to create payment",
            Self::Dashboard(_) => "Failed to load dashboard data",
            Self::Session { .. } => "Failed to refresh session",
        }
    }
}
