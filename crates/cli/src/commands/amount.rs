use hotdeal_core::pricing::money::{format_localized_amount, format_won, parse_amount};
use serde_json::json;

use crate::commands::CommandResult;

/// Normalizes free-form amount text the way price fields are read.
pub fn run(raw: &str) -> CommandResult {
    let amount = parse_amount(raw);
    let localized = format_localized_amount(amount);

    CommandResult::success_with_data(
        "amount",
        format!("{} ({localized})", format_won(amount)),
        json!({
            "raw": raw,
            "amount": amount.to_string(),
            "won": format_won(amount),
            "localized": localized,
        }),
    )
}
