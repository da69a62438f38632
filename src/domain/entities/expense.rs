use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// A single expense record owned by one user.
///
/// The amount carries exactly two fractional digits, fixed when the record
/// is created. Records are immutable; they only disappear through the
/// retention pruning of past months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// Store-assigned row id; zero until persisted.
    pub expense_id: i64,
    pub user_id: i64,
    /// Free-form upper-cased currency code, not validated against any list.
    pub currency: String,
    pub amount: Decimal,
    /// Free-text category/remark, may be empty.
    pub remark: String,
    pub created_on: NaiveDateTime,
}

impl Expense {
    pub fn new(
        user_id: i64,
        currency: impl Into<String>,
        amount: Decimal,
        remark: impl Into<String>,
        created_on: NaiveDateTime,
    ) -> Self {
        Self {
            expense_id: 0,
            user_id,
            currency: currency.into(),
            amount,
            remark: remark.into(),
            created_on,
        }
    }
}
