//! Aggregation engine - pure grouping and summing over expense records.
//!
//! All sums use exact decimal arithmetic; results never depend on record
//! iteration order.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::domain::entities::Expense;

/// Category key for chart data: the remark lower-cased, nothing else.
/// An empty remark maps to the empty string key.
pub fn lowercase_key(remark: &str) -> String {
    remark.to_lowercase()
}

/// Category key for the text summary: each whitespace-separated word
/// lower-cased then capitalized, rejoined with single spaces.
///
/// Idempotent: applying it twice yields the same string as applying it once.
pub fn capitalize_words(remark: &str) -> String {
    remark
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Sum amounts per normalized category key.
pub fn sum_by_category<'a, I, F>(expenses: I, key: F) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a Expense>,
    F: Fn(&str) -> String,
{
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals
            .entry(key(&expense.remark))
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
}

/// Sum amounts per currency code, exactly as stored.
pub fn sum_by_currency<'a, I>(expenses: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals
            .entry(expense.currency.clone())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
}

/// Records whose creation date falls in `[from, to]`, inclusive at both
/// ends. Only the timestamp's date component participates.
pub fn filter_by_date<'a>(
    expenses: &'a [Expense],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|e| {
            let date = e.created_on.date();
            date >= from && date <= to
        })
        .collect()
}

/// First and last calendar day of the month `today` falls in.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let next_month = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(today);
    (first, last)
}
