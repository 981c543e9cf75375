use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::deal::HotDeal;
use crate::errors::DomainError;
use crate::pricing::matching::contains_match;

pub const ALL_PLATFORMS: &str = "all";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    EventStart,
    FinalPrice,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "event_start" | "date" => Ok(Self::EventStart),
            "final_price" | "price" => Ok(Self::FinalPrice),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown sort key `{other}` (expected event_start|final_price)"
            ))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown sort order `{other}` (expected asc|desc)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealQuery {
    pub term: String,
    /// Exact platform name, or [`ALL_PLATFORMS`].
    pub platform: String,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl Default for DealQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            platform: ALL_PLATFORMS.to_string(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl DealQuery {
    pub fn filters_platform(&self) -> bool {
        let platform = self.platform.trim();
        !platform.is_empty() && platform != ALL_PLATFORMS
    }

    /// A blank term with no platform filter runs no search at all.
    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty() || self.filters_platform()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub deals: Vec<HotDeal>,
    pub min_final_price: Option<Decimal>,
    /// Plain minimum over the matched rows; zero perceived prices are not skipped here.
    pub min_perceived_price: Option<Decimal>,
}

/// Filters and sorts `deals` for the portal table. Returns `None` for an inactive query.
pub fn search_deals(deals: &[HotDeal], query: &DealQuery) -> Option<SearchOutcome> {
    if !query.is_active() {
        return None;
    }

    let term = Some(query.term.as_str()).filter(|term| !term.is_empty());
    let platform = query.platform.trim();
    let mut matched: Vec<HotDeal> = deals
        .iter()
        .filter(|deal| {
            contains_match(term, &deal.brand)
                || contains_match(term, &deal.product_name)
                || contains_match(term, &deal.standard_model_name)
        })
        .filter(|deal| !query.filters_platform() || deal.platform == platform)
        .cloned()
        .collect();

    matched.sort_by(|left, right| {
        let ordering = compare(left, right, query.sort_key);
        match query.sort_order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    Some(SearchOutcome {
        min_final_price: matched.iter().map(|deal| deal.final_price).min(),
        min_perceived_price: matched.iter().map(|deal| deal.perceived_price).min(),
        deals: matched,
    })
}

fn compare(left: &HotDeal, right: &HotDeal, key: SortKey) -> Ordering {
    match key {
        SortKey::EventStart => left.event_period.start().cmp(&right.event_period.start()),
        SortKey::FinalPrice => left.final_price.cmp(&right.final_price),
    }
}

/// Sorted, de-duplicated, non-blank platforms seen in `deals`.
pub fn distinct_platforms(deals: &[HotDeal]) -> Vec<String> {
    let mut platforms: Vec<String> = deals
        .iter()
        .map(|deal| deal.platform.trim())
        .filter(|platform| !platform.is_empty())
        .map(str::to_string)
        .collect();
    platforms.sort();
    platforms.dedup();
    platforms
}
