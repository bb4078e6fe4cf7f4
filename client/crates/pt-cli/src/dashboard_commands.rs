use crate::app_error::{AppError, Result as AppResult};
use crate::output::{Output, to_value};

use pt_cli::Client;
use pt_config::DashboardConfig;
use pt_core::{DashboardView, DateRange, Payment, TransactionFilter, User};
use pt_session::{Clock, RelativeTimeTicker};

use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use clap::Args;
use log::info;
use serde_json::Value;

#[derive(Args)]
pub(crate) struct DashboardArgs {
    /// Which transactions to list: all, credit, or debit
    #[arg(long, default_value = "all")]
    filter: String,

    /// Start date (YYYY-MM-DD), requires --to
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// End date (YYYY-MM-DD), requires --from
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Quick range: the last 7, 30 or 90 days
    #[arg(long, conflicts_with_all = ["from", "to"])]
    last_days: Option<u64>,

    /// Keep re-rendering relative times until Ctrl-C
    #[arg(long)]
    watch: bool,
}

impl DashboardArgs {
    pub(crate) async fn execute(
        self,
        client: &Client,
        config: &DashboardConfig,
        output: Output,
    ) -> AppResult<Value> {
        let user = client
            .session()
            .current_user()
            .ok_or_else(AppError::not_logged_in)?;
        let filter = TransactionFilter::from_str(&self.filter)?;

        let clock = client.session().clock();
        let range = self.date_range(clock.now())?;
        let payments = client.fetch_ledgers(&range).await?;

        if !self.watch {
            return render(&payments, &user, filter, range, clock.now());
        }

        let mut ticker = RelativeTimeTicker::new(clock, config.relative_time_tick());
        info!(
            "Watching dashboard, refreshing relative times every {}",
            humantime::format_duration(ticker.period())
        );

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                now = ticker.tick() => {
                    output.print(&render(&payments, &user, filter, range, now)?)?;
                }
                _ = &mut ctrl_c => {
                    info!("Stopped watching dashboard");
                    return Ok(Value::Null);
                }
            }
        }
    }

    fn date_range(&self, now: DateTime<Utc>) -> AppResult<DateRange> {
        let today = now.with_timezone(&Local).date_naive();

        let range = match (self.last_days, &self.from, &self.to) {
            (Some(days), _, _) => DateRange::quick(days, today)?,
            (None, Some(from), Some(to)) => DateRange::custom(from, to, today)?,
            _ => DateRange::all(),
        };
        Ok(range)
    }
}

fn render(
    payments: &[Payment],
    user: &User,
    filter: TransactionFilter,
    range: DateRange,
    now: DateTime<Utc>,
) -> AppResult<Value> {
    let now = now.with_timezone(&Local);
    to_value(&DashboardView::build(payments, user, filter, range, &now))
}
