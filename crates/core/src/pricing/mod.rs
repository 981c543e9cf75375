pub mod comparison;
pub mod discount;
pub mod matching;
pub mod money;
pub mod simulator;

pub use comparison::{
    classify, minimum_price, try_classify, ComparisonError, HistoricalRecord, PriceField,
    Recommendation, Severity,
};
pub use discount::{
    apply_discounts, DiscountLineItem, DiscountSchedule, DiscountSlot, DiscountUnit,
    PriceBreakdown, PricingTraceStep,
};
pub use matching::{contains_match, find_similar, MatchOptions, MatchResult, SimilarName};
pub use money::{format_localized_amount, format_won, parse_amount, RawAmount};
pub use simulator::{simulate, SimulationInput, SimulationOutcome, SimulationReport, Verdict};
