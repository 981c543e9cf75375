use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::truncate_won;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountUnit {
    Flat,
    Percent,
}

impl DiscountUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Percent => "percent",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Flat => "원",
            Self::Percent => "%",
        }
    }
}

impl FromStr for DiscountUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" | "won" | "원" => Ok(Self::Flat),
            "percent" | "pct" | "%" => Ok(Self::Percent),
            other => Err(format!("unsupported discount unit `{other}` (expected flat|percent)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountLineItem {
    pub value: Decimal,
    pub unit: DiscountUnit,
}

impl DiscountLineItem {
    pub fn flat(value: Decimal) -> Self {
        Self { value, unit: DiscountUnit::Flat }
    }

    pub fn percent(value: Decimal) -> Self {
        Self { value, unit: DiscountUnit::Percent }
    }

    /// Deduction this item takes off `base_price`. Percentages always apply to the base
    /// handed in, never to a running discounted total.
    ///
    /// When `base_price * value` leaves the `Decimal` range the base is divided first, and
    /// a product still out of range saturates.
    pub fn resolve(&self, base_price: Decimal) -> Decimal {
        match self.unit {
            DiscountUnit::Flat => self.value,
            DiscountUnit::Percent => match base_price.checked_mul(self.value) {
                Some(product) => product / Decimal::ONE_HUNDRED,
                None => (base_price / Decimal::ONE_HUNDRED).saturating_mul(self.value),
            },
        }
    }
}

/// `base_price` minus every resolved deduction, truncated toward zero.
///
/// The result is not clamped: discounts larger than the base price produce a negative
/// final price. Sums beyond the `Decimal` range saturate at its bounds.
pub fn apply_discounts(base_price: Decimal, items: &[DiscountLineItem]) -> Decimal {
    truncate_won(base_price.saturating_sub(total_deductions(base_price, items)))
}

fn total_deductions(base_price: Decimal, items: &[DiscountLineItem]) -> Decimal {
    items.iter().fold(Decimal::ZERO, |total, item| total.saturating_add(item.resolve(base_price)))
}

/// The four discount slots a deal registration carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountSlot {
    Coupon,
    Card,
    Extra1,
    Extra2,
}

impl DiscountSlot {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Coupon => "쿠폰 할인",
            Self::Card => "카드 할인",
            Self::Extra1 => "기타 할인 1",
            Self::Extra2 => "기타 할인 2",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSchedule {
    pub coupon: Option<DiscountLineItem>,
    pub card: Option<DiscountLineItem>,
    pub extra_1: Option<DiscountLineItem>,
    pub extra_2: Option<DiscountLineItem>,
}

impl DiscountSchedule {
    pub fn set(&mut self, slot: DiscountSlot, item: DiscountLineItem) {
        let target = match slot {
            DiscountSlot::Coupon => &mut self.coupon,
            DiscountSlot::Card => &mut self.card,
            DiscountSlot::Extra1 => &mut self.extra_1,
            DiscountSlot::Extra2 => &mut self.extra_2,
        };
        *target = Some(item);
    }

    pub fn entries(&self) -> Vec<(DiscountSlot, DiscountLineItem)> {
        [
            (DiscountSlot::Coupon, self.coupon),
            (DiscountSlot::Card, self.card),
            (DiscountSlot::Extra1, self.extra_1),
            (DiscountSlot::Extra2, self.extra_2),
        ]
        .into_iter()
        .filter_map(|(slot, item)| item.map(|item| (slot, item)))
        .collect()
    }

    pub fn line_items(&self) -> Vec<DiscountLineItem> {
        self.entries().into_iter().map(|(_, item)| item).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

/// Base price, its discounts, and the final price derived from them.
///
/// The final price is recomputed on every change and cannot be set directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    base_price: Decimal,
    discounts: Vec<DiscountLineItem>,
    final_price: Decimal,
}

impl PriceBreakdown {
    pub fn new(base_price: Decimal, discounts: Vec<DiscountLineItem>) -> Self {
        let final_price = apply_discounts(base_price, &discounts);
        Self { base_price, discounts, final_price }
    }

    pub fn from_schedule(base_price: Decimal, schedule: &DiscountSchedule) -> Self {
        Self::new(base_price, schedule.line_items())
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn discounts(&self) -> &[DiscountLineItem] {
        &self.discounts
    }

    pub fn final_price(&self) -> Decimal {
        self.final_price
    }

    pub fn discount_total(&self) -> Decimal {
        total_deductions(self.base_price, &self.discounts)
    }

    pub fn is_over_discounted(&self) -> bool {
        self.final_price < Decimal::ZERO
    }

    pub fn set_base_price(&mut self, base_price: Decimal) {
        self.base_price = base_price;
        self.recompute();
    }

    pub fn push_discount(&mut self, item: DiscountLineItem) {
        self.discounts.push(item);
        self.recompute();
    }

    pub fn trace(&self) -> Vec<PricingTraceStep> {
        let mut steps = vec![PricingTraceStep {
            stage: "base".to_string(),
            detail: "normal price".to_string(),
            amount: self.base_price,
        }];

        for item in &self.discounts {
            steps.push(PricingTraceStep {
                stage: "discount".to_string(),
                detail: format!("{}{} of base", item.value.normalize(), item.unit.symbol()),
                amount: -item.resolve(self.base_price),
            });
        }

        steps.push(PricingTraceStep {
            stage: "final".to_string(),
            detail: "base - sum(discounts), truncated".to_string(),
            amount: self.final_price,
        });
        steps
    }

    fn recompute(&mut self) {
        self.final_price = apply_discounts(self.base_price, &self.discounts);
    }
}
