use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::pricing::comparison::HistoricalRecord;
use crate::pricing::discount::{DiscountSchedule, PriceBreakdown};
use crate::pricing::money::truncate_won;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

impl DealId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

const PERIOD_SEPARATOR: &str = " ~ ";

/// Promotion window, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl EventPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidEventPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// Accepts `"2025-11-01 ~ 2025-11-11"` or a lone `"2025-11-11"`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let unparseable = || DomainError::UnparseableEventPeriod(raw.to_string());
        let parse_day = |value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| unparseable())
        };

        match raw.split_once('~') {
            Some((start, end)) => Self::new(parse_day(start)?, parse_day(end)?),
            None => Ok(Self::single_day(parse_day(raw)?)),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for EventPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{PERIOD_SEPARATOR}{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotDeal {
    pub id: DealId,
    pub registered_on: NaiveDate,
    pub category: String,
    pub platform: String,
    pub brand: String,
    pub product_name: String,
    pub standard_model_name: String,
    pub normal_price: Decimal,
    pub event_period: EventPeriod,
    pub final_price: Decimal,
    pub perceived_price: Decimal,
    pub gift: String,
}

impl HotDeal {
    pub fn historical_record(&self) -> HistoricalRecord {
        HistoricalRecord {
            product_name: self.product_name.clone(),
            standard_model_name: self.standard_model_name.clone(),
            final_price: self.final_price,
            perceived_price: Some(self.perceived_price).filter(|price| *price > Decimal::ZERO),
            event_start: self.event_period.start(),
            event_end: self.event_period.end(),
        }
    }

    pub fn apply_update(&mut self, update: DealUpdate) -> Result<(), DomainError> {
        if let Some(product_name) = update.product_name {
            self.product_name = required("product_name", &product_name)?;
        }
        if let Some(standard_model_name) = update.standard_model_name {
            self.standard_model_name = required("standard_model_name", &standard_model_name)?;
        }
        if let Some(category) = update.category {
            self.category = category.trim().to_string();
        }
        if let Some(platform) = update.platform {
            self.platform = platform.trim().to_string();
        }
        if let Some(brand) = update.brand {
            self.brand = brand.trim().to_string();
        }
        if let Some(normal_price) = update.normal_price {
            self.normal_price = truncate_won(normal_price);
        }
        if let Some(final_price) = update.final_price {
            self.final_price = truncate_won(final_price);
        }
        if let Some(perceived_price) = update.perceived_price {
            self.perceived_price = truncate_won(perceived_price);
        }
        if let Some(event_period) = update.event_period {
            self.event_period = event_period;
        }
        if let Some(gift) = update.gift {
            self.gift = gift;
        }
        Ok(())
    }
}

/// Registration draft. The final price is never entered: it comes from the normal price
/// and the discount schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeal {
    pub category: String,
    pub platform: String,
    pub brand: String,
    pub product_name: String,
    pub standard_model_name: Option<String>,
    pub normal_price: Decimal,
    pub discounts: DiscountSchedule,
    pub perceived_price: Decimal,
    pub event_period: EventPeriod,
    pub gift: String,
}

impl NewDeal {
    pub fn price_breakdown(&self) -> PriceBreakdown {
        PriceBreakdown::from_schedule(self.normal_price, &self.discounts)
    }

    pub fn into_deal(self, id: DealId, registered_on: NaiveDate) -> Result<HotDeal, DomainError> {
        let product_name = required("product_name", &self.product_name)?;
        let standard_model_name = self
            .standard_model_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| product_name.clone());
        let final_price = self.price_breakdown().final_price();

        Ok(HotDeal {
            id,
            registered_on,
            category: self.category.trim().to_string(),
            platform: self.platform.trim().to_string(),
            brand: self.brand.trim().to_string(),
            product_name,
            standard_model_name,
            normal_price: truncate_won(self.normal_price),
            event_period: self.event_period,
            final_price,
            perceived_price: truncate_won(self.perceived_price),
            gift: self.gift,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealUpdate {
    pub category: Option<String>,
    pub platform: Option<String>,
    pub brand: Option<String>,
    pub product_name: Option<String>,
    pub standard_model_name: Option<String>,
    pub normal_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub perceived_price: Option<Decimal>,
    pub event_period: Option<EventPeriod>,
    pub gift: Option<String>,
}

impl DealUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
