//! Command dispatcher - routes each inbound message to its handler.
//!
//! Holds no per-message state and performs no I/O: every dispatch returns
//! the list of delivery instructions for the transport loop to carry out.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;

use super::parser;
use crate::application::errors::{DispatchError, StoreError};
use crate::application::reporting::{aggregate, Reports, Retention};
use crate::domain::entities::{Command, Expense, Inbound, Outgoing, User};
use crate::domain::traits::{ChartRenderer, LedgerStore, UserDirectory};

/// Generic failure reply; the real error only goes to the operator chat.
const GENERIC_FAILURE: &str = "⚠️ Something went wrong. Please try again later.";

const CHART_TITLE: &str = "Expense Breakdown";

/// `dd/MM/yy hh:mm AM/PM`, as shown in the admin report.
const RECORD_TIME_FORMAT: &str = "%d/%m/%y %I:%M %p";

/// Injected authorization and routing settings.
#[derive(Debug, Clone)]
pub struct AccessSettings {
    /// Handles allowed to run `/admin` and `/myFund`.
    pub admin_handles: HashSet<String>,
    /// Chat that receives error diagnostics.
    pub operator_chat: i64,
    /// Handle named in the group-chat notice.
    pub owner_handle: String,
    /// Fixed monthly budget checked by `/myFund`.
    pub monthly_budget: Decimal,
}

pub struct Dispatcher {
    ledger: Arc<dyn LedgerStore>,
    directory: Arc<dyn UserDirectory>,
    chart: Arc<dyn ChartRenderer>,
    reports: Reports,
    retention: Retention,
    access: AccessSettings,
}

impl Dispatcher {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        directory: Arc<dyn UserDirectory>,
        chart: Arc<dyn ChartRenderer>,
        access: AccessSettings,
    ) -> Self {
        Self {
            reports: Reports::new(ledger.clone()),
            retention: Retention::new(ledger.clone(), directory.clone()),
            ledger,
            directory,
            chart,
            access,
        }
    }

    /// Process one inbound message against the current clock.
    pub async fn dispatch(&self, inbound: &Inbound) -> Vec<Outgoing> {
        self.dispatch_at(inbound, Utc::now().naive_utc()).await
    }

    /// Process one inbound message with `now` injected, so callers control
    /// both the current period and record timestamps.
    pub async fn dispatch_at(&self, inbound: &Inbound, now: NaiveDateTime) -> Vec<Outgoing> {
        if !inbound.is_personal {
            return vec![Outgoing::text(
                inbound.chat_id,
                format!(
                    "Our bot only available for personal chat.\n\
                     Please contact our owner @{} in order to suggest extra feature.",
                    self.access.owner_handle
                ),
            )];
        }

        let mut out = Vec::new();

        // First contact registers the user; the welcome does not suppress
        // handling of the rest of the message.
        let user = match self.resolve_user(inbound, &mut out).await {
            Ok(user) => user,
            Err(err) => {
                out.push(Outgoing::text(inbound.chat_id, GENERIC_FAILURE));
                out.push(self.diagnostic("register-user", &err.to_string()));
                return out;
            }
        };

        let command = match parser::parse(&inbound.text) {
            Ok(command) => command,
            Err(err) => {
                out.push(Outgoing::text(inbound.chat_id, err.to_string()));
                return out;
            }
        };

        match self.route(&command, &user, inbound, now).await {
            Ok(replies) => out.extend(replies),
            Err(err) => {
                tracing::error!(command = command.name(), "handler failed: {}", err);
                if matches!(err, DispatchError::Store(_)) {
                    out.push(Outgoing::text(inbound.chat_id, GENERIC_FAILURE));
                }
                out.push(self.diagnostic(command.name(), &err.to_string()));
            }
        }
        out
    }

    async fn resolve_user(
        &self,
        inbound: &Inbound,
        out: &mut Vec<Outgoing>,
    ) -> Result<User, StoreError> {
        if let Some(user) = self.directory.find_by_handle(&inbound.username).await? {
            return Ok(user);
        }
        let user = self
            .directory
            .create(&inbound.username, inbound.chat_id)
            .await?;
        tracing::info!(user = %user.username, "registered new user on first contact");
        out.push(Outgoing::text(
            inbound.chat_id,
            format!("Welcome {}!", inbound.username),
        ));
        Ok(user)
    }

    async fn route(
        &self,
        command: &Command,
        user: &User,
        inbound: &Inbound,
        now: NaiveDateTime,
    ) -> Result<Vec<Outgoing>, DispatchError> {
        match command {
            Command::Start => self.handle_start(inbound).await,
            Command::AddExpense {
                amount,
                currency,
                remark,
            } => self.handle_add(user, inbound, *amount, currency, remark, now).await,
            Command::Summary => self.handle_summary(user, inbound, now).await,
            Command::Clear => self.handle_clear(inbound, now).await,
            Command::AdminReport => self.handle_admin(inbound).await,
            Command::MyFundCheck => self.handle_my_fund(user, inbound, now).await,
            // No default reply for unrecognized input.
            Command::Unrecognized { .. } => Ok(Vec::new()),
        }
    }

    async fn handle_start(&self, inbound: &Inbound) -> Result<Vec<Outgoing>, DispatchError> {
        self.directory
            .create(&inbound.username, inbound.chat_id)
            .await?;
        Ok(vec![Outgoing::text(
            inbound.chat_id,
            format!("Welcome to Expense Tracker {}!", inbound.username),
        )])
    }

    async fn handle_add(
        &self,
        user: &User,
        inbound: &Inbound,
        amount: Decimal,
        currency: &str,
        remark: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<Outgoing>, DispatchError> {
        let expense = Expense::new(user.id, currency, amount, remark, now);
        self.ledger.append(&expense).await?;
        Ok(vec![Outgoing::text(
            inbound.chat_id,
            format!("✅ Added: {} {} - {}", amount, currency, remark),
        )])
    }

    async fn handle_summary(
        &self,
        user: &User,
        inbound: &Inbound,
        now: NaiveDateTime,
    ) -> Result<Vec<Outgoing>, DispatchError> {
        let (from, to) = aggregate::month_bounds(now.date());
        let mut out = Vec::new();

        if let Some(slices) = self.reports.chart_data(user.id, from, to).await? {
            // Renderer failure loses the photo, not the text summary.
            match self.chart.render(CHART_TITLE, &slices) {
                Ok(bytes) => out.push(Outgoing::photo(inbound.chat_id, bytes)),
                Err(err) => {
                    tracing::warn!("chart rendering failed: {}", err);
                    out.push(self.diagnostic("/summary", &err.to_string()));
                }
            }
        }

        let text = self.reports.summary_text(user.id).await?;
        out.push(Outgoing::text(inbound.chat_id, text));
        Ok(out)
    }

    async fn handle_clear(
        &self,
        inbound: &Inbound,
        now: NaiveDateTime,
    ) -> Result<Vec<Outgoing>, DispatchError> {
        let reply = match self
            .retention
            .prune_to_month(&inbound.username, now.date())
            .await?
        {
            None => "This current user did not exist in our system.".to_string(),
            Some(removed) => format!(
                "All expenses except this month cleared.\nExpense record deleted: {}",
                removed
            ),
        };
        Ok(vec![Outgoing::text(inbound.chat_id, reply)])
    }

    async fn handle_admin(&self, inbound: &Inbound) -> Result<Vec<Outgoing>, DispatchError> {
        if !self.is_admin(&inbound.username) {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for user in self.directory.list_all().await? {
            let expenses = self.ledger.query_by_user(user.id).await?;
            if expenses.is_empty() {
                continue;
            }
            let mut body = format!("📊 Expense list for {}:\n\n", user.username);
            for expense in &expenses {
                body.push_str(&format!(
                    "• {} - {} ({})\n",
                    expense.remark,
                    expense.amount,
                    expense.created_on.format(RECORD_TIME_FORMAT)
                ));
            }
            out.push(Outgoing::text(inbound.chat_id, body));
        }
        Ok(out)
    }

    async fn handle_my_fund(
        &self,
        user: &User,
        inbound: &Inbound,
        now: NaiveDateTime,
    ) -> Result<Vec<Outgoing>, DispatchError> {
        if !self.is_admin(&inbound.username) {
            return Ok(Vec::new());
        }

        let (from, to) = aggregate::month_bounds(now.date());
        let spent = self.reports.spend_in_range(user.id, from, to).await?;
        let left = self.access.monthly_budget - spent;
        Ok(vec![Outgoing::text(
            inbound.chat_id,
            format!("💵 Hello Lyhor, Your budget left in this month is: {:.2}", left),
        )])
    }

    fn is_admin(&self, handle: &str) -> bool {
        self.access.admin_handles.contains(handle)
    }

    fn diagnostic(&self, err_at: &str, detail: &str) -> Outgoing {
        Outgoing::text(
            self.access.operator_chat,
            format!("⚠️An error occurred\n#ERR_AT: {}\n#MSG: {}", err_at, detail),
        )
    }
}
