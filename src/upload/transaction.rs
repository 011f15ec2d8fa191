//! Turning reviewed form values into a transaction for the backend.

use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    api::NewTransaction,
    category::{TransactionKind, normalize_category},
    period::DATE_FORMAT,
};

/// The longest description the backend stores, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The longest establishment name the backend stores, in characters.
pub const MAX_ESTABLISHMENT_LENGTH: usize = 100;

/// The values of one reviewed receipt.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReviewedFields<'a> {
    pub date: &'a str,
    pub amount: &'a str,
    pub category: &'a str,
    pub subcategory: Option<&'a str>,
    pub description: &'a str,
    pub establishment: &'a str,
    pub receipt_url: &'a str,
}

/// Parse an amount typed in the review form. It must be a number above zero.
///
/// A decimal comma is accepted.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
        .ok_or_else(|| Error::InvalidAmount(text.to_owned()))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn truncate(text: &str, max_length: usize) -> String {
    text.trim().graphemes(true).take(max_length).collect()
}

/// Check the reviewed values and build the transaction to store.
///
/// The amount is checked before the date.
pub fn build_transaction(
    kind: TransactionKind,
    fields: &ReviewedFields<'_>,
) -> Result<NewTransaction, Error> {
    let amount = parse_amount(fields.amount)?;
    let date = parse_date(fields.date)?;

    let subcategory = match kind {
        TransactionKind::Expense => fields
            .subcategory
            .map(str::trim)
            .filter(|subcategory| !subcategory.is_empty())
            .map(str::to_owned),
        TransactionKind::Revenue => None,
    };

    Ok(NewTransaction {
        kind,
        amount,
        date,
        category: normalize_category(kind, fields.category).to_owned(),
        subcategory,
        description: truncate(fields.description, MAX_DESCRIPTION_LENGTH),
        establishment: truncate(fields.establishment, MAX_ESTABLISHMENT_LENGTH),
        receipt_url: fields.receipt_url.trim().to_owned(),
    })
}
