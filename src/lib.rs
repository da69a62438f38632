//! riel-bot - a Telegram expense-tracking bot.
//!
//! Short text commands (`/add`, `/summary`, `/clear`, ...) maintain per-user
//! expense records and produce month-bounded summaries and category
//! breakdowns. The crate is split into three layers:
//!
//! - `domain`: entities and the traits the core depends on
//! - `application`: command parsing, dispatch, aggregation, reporting
//! - `infrastructure`: SQLite store, Telegram/console adapters, SVG charts

pub mod domain;
pub mod application;
pub mod infrastructure;
