use rust_decimal::Decimal;
use serde::Serialize;

use super::comparison::{classify, minimum_price, HistoricalRecord, PriceField, Recommendation};
use super::matching::contains_match;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationInput<'a> {
    pub name_query: &'a str,
    pub candidate_final_price: Decimal,
    pub candidate_perceived_price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub candidate: Decimal,
    pub historical_min: Decimal,
    pub recommendation: Recommendation,
    pub label: String,
}

impl Verdict {
    fn judge(candidate: Decimal, historical_min: Decimal) -> Self {
        let recommendation = classify(candidate, historical_min);
        Self {
            candidate,
            historical_min,
            recommendation,
            label: recommendation.label().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub name_query: String,
    pub matched_records: usize,
    pub historical_min_final: Decimal,
    pub historical_min_perceived: Decimal,
    pub final_verdict: Verdict,
    pub perceived_verdict: Verdict,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// No product name was given, so nothing was looked up.
    Idle,
    /// The name matched no historical record; there is nothing to compare against.
    NoHistory { name_query: String },
    Compared(SimulationReport),
}

/// Judges a proposed final price and perceived price against the history of every
/// record whose standard model name or product name contains the query.
pub fn simulate(records: &[HistoricalRecord], input: &SimulationInput<'_>) -> SimulationOutcome {
    let name_query = input.name_query.trim();
    if name_query.is_empty() {
        return SimulationOutcome::Idle;
    }

    let history: Vec<HistoricalRecord> = records
        .iter()
        .filter(|record| {
            contains_match(Some(name_query), &record.standard_model_name)
                || contains_match(Some(name_query), &record.product_name)
        })
        .cloned()
        .collect();

    let (Some(min_final), Some(min_perceived)) = (
        minimum_price(&history, PriceField::FinalPrice),
        minimum_price(&history, PriceField::PerceivedPrice),
    ) else {
        return SimulationOutcome::NoHistory { name_query: name_query.to_string() };
    };

    SimulationOutcome::Compared(SimulationReport {
        name_query: name_query.to_string(),
        matched_records: history.len(),
        historical_min_final: min_final,
        historical_min_perceived: min_perceived,
        final_verdict: Verdict::judge(input.candidate_final_price, min_final),
        perceived_verdict: Verdict::judge(input.candidate_perceived_price, min_perceived),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{simulate, SimulationInput, SimulationOutcome};
    use crate::pricing::comparison::{HistoricalRecord, Recommendation};

    fn won(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn record(product: &str, model: &str, final_price: i64, perceived: i64) -> HistoricalRecord {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        HistoricalRecord {
            product_name: product.to_string(),
            standard_model_name: model.to_string(),
            final_price: won(final_price),
            perceived_price: Some(won(perceived)),
            event_start: day,
            event_end: day,
        }
    }

    fn history() -> Vec<HistoricalRecord> {
        vec![
            record("삼성 갤럭시 버즈3 프로", "버즈3 프로", 219_000, 199_000),
            record("갤럭시 버즈3 프로 화이트", "버즈3 프로", 209_000, 0),
            record("다이슨 V15 무선청소기", "V15", 899_000, 850_000),
        ]
    }

    #[test]
    fn judges_both_prices_against_matching_history() {
        let outcome = simulate(
            &history(),
            &SimulationInput {
                name_query: "버즈3",
                candidate_final_price: won(205_000),
                candidate_perceived_price: won(230_000),
            },
        );

        let SimulationOutcome::Compared(report) = outcome else {
            panic!("expected a comparison, got {outcome:?}");
        };
        assert_eq!(report.matched_records, 2);
        assert_eq!(report.historical_min_final, won(209_000));
        assert_eq!(report.historical_min_perceived, won(199_000));
        assert_eq!(report.final_verdict.recommendation, Recommendation::StrongGo);
        assert_eq!(report.perceived_verdict.recommendation, Recommendation::Uncertain);
    }

    #[test]
    fn missing_candidate_price_has_no_verdict() {
        let outcome = simulate(
            &history(),
            &SimulationInput {
                name_query: "v15",
                candidate_final_price: won(900_000),
                candidate_perceived_price: Decimal::ZERO,
            },
        );

        let SimulationOutcome::Compared(report) = outcome else {
            panic!("expected a comparison, got {outcome:?}");
        };
        assert_eq!(report.final_verdict.recommendation, Recommendation::LikelyGo);
        assert_eq!(report.perceived_verdict.recommendation, Recommendation::None);
        assert!(report.perceived_verdict.label.is_empty());
    }

    #[test]
    fn unmatched_name_reports_no_history() {
        let outcome = simulate(
            &history(),
            &SimulationInput {
                name_query: "에어팟",
                candidate_final_price: won(100_000),
                candidate_perceived_price: won(100_000),
            },
        );

        assert_eq!(outcome, SimulationOutcome::NoHistory { name_query: "에어팟".to_string() });
    }

    #[test]
    fn blank_name_is_idle() {
        let outcome = simulate(
            &history(),
            &SimulationInput {
                name_query: "  ",
                candidate_final_price: won(100_000),
                candidate_perceived_price: won(100_000),
            },
        );

        assert_eq!(outcome, SimulationOutcome::Idle);
    }
}
