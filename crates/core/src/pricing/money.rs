use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const WON_PER_MAN: i128 = 10_000;
const WON_PER_EOK: i128 = 100_000_000;

/// Raw amount as it arrives from a form field, a CSV cell, or an already-typed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawAmount<'a> {
    Text(&'a str),
    Number(f64),
    Exact(Decimal),
    Missing,
}

impl<'a> From<&'a str> for RawAmount<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for RawAmount<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<Option<&'a str>> for RawAmount<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

impl From<f64> for RawAmount<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawAmount<'_> {
    fn from(value: i64) -> Self {
        Self::Exact(Decimal::from(value))
    }
}

impl From<Decimal> for RawAmount<'_> {
    fn from(value: Decimal) -> Self {
        Self::Exact(value)
    }
}

/// Coerces free-form currency input into an amount.
///
/// Text keeps only ASCII digits and decimal points before parsing, so `"1,234원"` becomes
/// `1234`. Anything that does not survive that (empty, missing, `"abc"`, `"1.2.3"`, a
/// non-finite float) degrades to zero instead of failing.
pub fn parse_amount<'a>(raw: impl Into<RawAmount<'a>>) -> Decimal {
    match raw.into() {
        RawAmount::Text(text) => parse_text(text),
        RawAmount::Number(value) => Decimal::try_from(value).unwrap_or(Decimal::ZERO),
        RawAmount::Exact(value) => value,
        RawAmount::Missing => Decimal::ZERO,
    }
}

fn parse_text(text: &str) -> Decimal {
    let mut cleaned: String =
        text.chars().filter(|ch| ch.is_ascii_digit() || *ch == '.').collect();

    if cleaned.matches('.').count() > 1 {
        return Decimal::ZERO;
    }
    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    if cleaned.starts_with('.') {
        cleaned.insert(0, '0');
    }
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

/// Renders a whole-won amount with the 억/만 unit breakdown used on the dashboard.
///
/// `150_000_000` renders as `"1억 5000만 0원"`, `12_345` as `"1만 2,345원"`, and
/// `9_800` as `"9,800원"`. Fractions are truncated first. Display only: the output is
/// never parsed back.
pub fn format_localized_amount(amount: Decimal) -> String {
    let won = whole_won(amount);

    if won == 0 {
        return "0원".to_string();
    }

    if won >= WON_PER_EOK {
        return format!(
            "{}억 {}만 {}원",
            won / WON_PER_EOK,
            (won % WON_PER_EOK) / WON_PER_MAN,
            group_thousands(won % WON_PER_MAN)
        );
    }

    if won >= WON_PER_MAN {
        return format!("{}만 {}원", won / WON_PER_MAN, group_thousands(won % WON_PER_MAN));
    }

    format!("{}원", group_thousands(won))
}

/// Comma-grouped whole-won text such as `"1,234원"`, the format price columns are stored in.
pub fn format_won(amount: Decimal) -> String {
    format!("{}원", group_thousands(whole_won(amount)))
}

/// Truncates toward zero, matching how entered prices are stored.
pub fn truncate_won(amount: Decimal) -> Decimal {
    amount.trunc()
}

fn whole_won(amount: Decimal) -> i128 {
    amount.trunc().to_i128().unwrap_or_default()
}

fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
