use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::application::errors::ChartError;

/// Chart renderer - turns a category→amount mapping into image bytes.
///
/// A failure here is fatal to the one photo being produced, never to the
/// surrounding operation.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, title: &str, slices: &BTreeMap<String, Decimal>) -> Result<Vec<u8>, ChartError>;
}
