use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound of the `LikelyGo` tier, as a multiple of the historical minimum.
pub const LIKELY_GO_CEILING: Decimal = Decimal::from_parts(11, 0, 0, false, 1);
/// Upper bound of the `Uncertain` tier, as a multiple of the historical minimum.
pub const UNCERTAIN_CEILING: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub product_name: String,
    pub standard_model_name: String,
    pub final_price: Decimal,
    pub perceived_price: Option<Decimal>,
    pub event_start: NaiveDate,
    pub event_end: NaiveDate,
}

impl HistoricalRecord {
    /// Perceived price if one was recorded and it is positive.
    pub fn positive_perceived_price(&self) -> Option<Decimal> {
        self.perceived_price.filter(|price| *price > Decimal::ZERO)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    FinalPrice,
    PerceivedPrice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongGo,
    LikelyGo,
    Uncertain,
    NoGo,
    None,
}

/// How loudly a recommendation is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongGo => "strong_go",
            Self::LikelyGo => "likely_go",
            Self::Uncertain => "uncertain",
            Self::NoGo => "no_go",
            Self::None => "none",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongGo => "🔥 핫딜 무조건 진행해보죠!",
            Self::LikelyGo => "👍 핫딜 해볼까요? (10% 내외)",
            Self::Uncertain => "🤔 핫딜 조금 어렵지 않을까요? (20% 내외)",
            Self::NoGo => "❌ 핫딜 안될 거 같아요!",
            Self::None => "",
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::StrongGo => Some(Severity::Success),
            Self::LikelyGo => Some(Severity::Info),
            Self::Uncertain => Some(Severity::Warning),
            Self::NoGo => Some(Severity::Error),
            Self::None => None,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("historical baseline `{baseline}` must be greater than zero")]
    InvalidHistoricalBaseline { baseline: Decimal },
}

/// Lowest observed value of `field` across `records`, or `None` when there is nothing to
/// compare against.
///
/// For the perceived price, zero and missing values are ignored; when no record carries
/// a positive perceived price the lowest final price stands in for it.
pub fn minimum_price(records: &[HistoricalRecord], field: PriceField) -> Option<Decimal> {
    let min_final = records.iter().map(|record| record.final_price).min();

    match field {
        PriceField::FinalPrice => min_final,
        PriceField::PerceivedPrice => records
            .iter()
            .filter_map(HistoricalRecord::positive_perceived_price)
            .min()
            .or(min_final),
    }
}

/// Tiers `candidate` against the historical minimum. Never fails: a non-positive candidate
/// or baseline yields `Recommendation::None`.
pub fn classify(candidate: Decimal, historical_min: Decimal) -> Recommendation {
    try_classify(candidate, historical_min).unwrap_or(Recommendation::None)
}

/// Like [`classify`], but reports an unusable baseline instead of hiding it.
///
/// Tier bounds are inclusive at the top: exactly 110% of the minimum is still `LikelyGo`
/// and exactly 120% is still `Uncertain`.
pub fn try_classify(
    candidate: Decimal,
    historical_min: Decimal,
) -> Result<Recommendation, ComparisonError> {
    if candidate <= Decimal::ZERO {
        return Ok(Recommendation::None);
    }
    if historical_min <= Decimal::ZERO {
        return Err(ComparisonError::InvalidHistoricalBaseline { baseline: historical_min });
    }

    let recommendation = if candidate < historical_min {
        Recommendation::StrongGo
    } else if within(candidate, historical_min, LIKELY_GO_CEILING) {
        Recommendation::LikelyGo
    } else if within(candidate, historical_min, UNCERTAIN_CEILING) {
        Recommendation::Uncertain
    } else {
        Recommendation::NoGo
    };

    Ok(recommendation)
}

/// `candidate <= historical_min * ceiling`. A bound past `Decimal::MAX` holds every candidate.
fn within(candidate: Decimal, historical_min: Decimal, ceiling: Decimal) -> bool {
    historical_min.checked_mul(ceiling).map_or(true, |bound| candidate <= bound)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{
        classify, minimum_price, try_classify, ComparisonError, HistoricalRecord, PriceField,
        Recommendation, Severity,
    };

    fn won(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn record(final_price: i64, perceived_price: Option<i64>) -> HistoricalRecord {
        let day = NaiveDate::from_ymd_opt(2025, 11, 11).expect("valid date");
        HistoricalRecord {
            product_name: "갤럭시 버즈3".to_string(),
            standard_model_name: "버즈3".to_string(),
            final_price: won(final_price),
            perceived_price: perceived_price.map(won),
            event_start: day,
            event_end: day,
        }
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(classify(won(9_500), won(10_000)), Recommendation::StrongGo);
        assert_eq!(classify(won(10_000), won(10_000)), Recommendation::LikelyGo);
        assert_eq!(classify(won(11_000), won(10_000)), Recommendation::LikelyGo);
        assert_eq!(classify(won(11_001), won(10_000)), Recommendation::Uncertain);
        assert_eq!(classify(won(12_000), won(10_000)), Recommendation::Uncertain);
        assert_eq!(classify(won(12_001), won(10_000)), Recommendation::NoGo);
    }

    #[test]
    fn ceilings_beyond_decimal_range_still_tier() {
        assert_eq!(classify(Decimal::MAX, Decimal::MAX), Recommendation::LikelyGo);
        assert_eq!(classify(Decimal::MAX, Decimal::MAX - won(1)), Recommendation::LikelyGo);

        let near_max = Decimal::MAX / won(2);
        assert_eq!(classify(Decimal::MAX, near_max), Recommendation::NoGo);
    }

    #[test]
    fn non_positive_candidate_has_no_verdict() {
        assert_eq!(classify(won(0), won(10_000)), Recommendation::None);
        assert_eq!(classify(won(-1), won(10_000)), Recommendation::None);
        assert_eq!(try_classify(won(0), won(0)), Ok(Recommendation::None));
    }

    #[test]
    fn zero_baseline_is_guarded() {
        assert_eq!(classify(won(5_000), won(0)), Recommendation::None);
        assert_eq!(
            try_classify(won(5_000), won(0)),
            Err(ComparisonError::InvalidHistoricalBaseline { baseline: won(0) })
        );
    }

    #[test]
    fn minimum_final_price() {
        let records = [record(5_000, Some(4_500)), record(4_000, None), record(6_000, Some(0))];
        assert_eq!(minimum_price(&records, PriceField::FinalPrice), Some(won(4_000)));
    }

    #[test]
    fn perceived_minimum_skips_zero_and_missing_values() {
        let records = [record(5_000, Some(0)), record(4_000, None), record(6_000, Some(4_800))];
        assert_eq!(minimum_price(&records, PriceField::PerceivedPrice), Some(won(4_800)));
    }

    #[test]
    fn perceived_minimum_falls_back_to_final_price() {
        let records = [record(5_000, Some(0)), record(4_000, Some(0))];
        assert_eq!(minimum_price(&records, PriceField::PerceivedPrice), Some(won(4_000)));
    }

    #[test]
    fn empty_history_means_no_comparison() {
        assert_eq!(minimum_price(&[], PriceField::FinalPrice), None);
        assert_eq!(minimum_price(&[], PriceField::PerceivedPrice), None);
    }

    #[test]
    fn labels_and_severity_follow_tier() {
        assert_eq!(Recommendation::StrongGo.severity(), Some(Severity::Success));
        assert_eq!(Recommendation::NoGo.label(), "❌ 핫딜 안될 거 같아요!");
        assert_eq!(Recommendation::None.severity(), None);
        assert_eq!(Recommendation::Uncertain.as_str(), "uncertain");
    }
}
