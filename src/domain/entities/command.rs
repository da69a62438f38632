use rust_decimal::Decimal;

/// A parsed bot command.
///
/// Closed set: every inbound message resolves to exactly one variant, with
/// `Unrecognized` as the catch-all. Constructed transiently per message and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    AddExpense {
        /// Rounded half-up to two decimals at parse time; this is the value
        /// that persists.
        amount: Decimal,
        currency: String,
        remark: String,
    },
    Summary,
    Clear,
    AdminReport,
    MyFundCheck,
    Unrecognized {
        original: String,
    },
}

impl Command {
    /// Command name used for diagnostics routed to the operator channel.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::AddExpense { .. } => "/add",
            Command::Summary => "/summary",
            Command::Clear => "/clear",
            Command::AdminReport => "/admin",
            Command::MyFundCheck => "/myFund",
            Command::Unrecognized { .. } => "message",
        }
    }
}
