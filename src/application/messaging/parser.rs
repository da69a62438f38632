//! Command parser - turns a raw message line into a typed [`Command`].
//!
//! Parsing is total and side-effect-free: it never touches the stores.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::application::errors::ParseError;
use crate::domain::entities::Command;

/// Parse one message line.
///
/// The first whitespace-delimited token selects the command family by
/// case-sensitive literal prefix; anything else is `Unrecognized`. Only
/// `/add` takes arguments, trailing tokens elsewhere are ignored.
pub fn parse(text: &str) -> Result<Command, ParseError> {
    let first = text.split_whitespace().next().unwrap_or("");

    if first.starts_with("/start") {
        Ok(Command::Start)
    } else if first.starts_with("/add") {
        parse_add(text)
    } else if first.starts_with("/summary") {
        Ok(Command::Summary)
    } else if first.starts_with("/clear") {
        Ok(Command::Clear)
    } else if first.starts_with("/admin") {
        Ok(Command::AdminReport)
    } else if first.starts_with("/myFund") {
        Ok(Command::MyFundCheck)
    } else {
        Ok(Command::Unrecognized {
            original: text.to_string(),
        })
    }
}

/// `/add <amount> <currency> <remark...>` - the remark is the untokenized
/// remainder of the line, so it may contain spaces.
fn parse_add(text: &str) -> Result<Command, ParseError> {
    let parts = split_fields(text, 4);
    if parts.len() < 4 {
        return Err(ParseError::Usage);
    }

    let amount: Decimal = parts[1]
        .parse()
        .map_err(|_| ParseError::InvalidAmount(parts[1].to_string()))?;
    let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(2);

    Ok(Command::AddExpense {
        amount,
        currency: parts[2].to_uppercase(),
        remark: parts[3].to_string(),
    })
}

/// Split on whitespace runs into at most `limit` fields, the last field
/// being the remainder of the line.
fn split_fields(text: &str, limit: usize) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut rest = text.trim_start();

    while fields.len() + 1 < limit && !rest.is_empty() {
        match rest.find(char::is_whitespace) {
            Some(at) => {
                fields.push(&rest[..at]);
                rest = rest[at..].trim_start();
            }
            None => {
                fields.push(rest);
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        fields.push(rest);
    }
    fields
}
