use hotdeal_core::pricing::comparison::HistoricalRecord;
use hotdeal_core::pricing::money::{format_won, parse_amount};
use hotdeal_core::pricing::simulator::{simulate, SimulationInput, SimulationOutcome, Verdict};
use hotdeal_db::{DealRepository, SqlDealRepository};

use crate::commands::{execute, open_store, repository_error, to_json, CommandResult};

#[derive(Debug, Clone, Default, clap::Args)]
pub struct SimulateArgs {
    #[arg(long, help = "Product or standard model name to look up in past deals")]
    pub name: String,
    #[arg(long, help = "Proposed final price (free-form amount text)")]
    pub final_price: Option<String>,
    #[arg(long, help = "Proposed perceived price (free-form amount text)")]
    pub perceived_price: Option<String>,
}

/// Judges a proposed price pair against every past deal matching `--name`.
pub fn run(args: SimulateArgs) -> CommandResult {
    execute("simulate", |config, runtime| {
        let records: Vec<HistoricalRecord> = runtime.block_on(async {
            let pool = open_store(config).await?;
            let deals = SqlDealRepository::new(pool.clone()).list().await.map_err(repository_error);
            pool.close().await;
            deals.map(|deals| deals.iter().map(|deal| deal.historical_record()).collect())
        })?;

        let input = SimulationInput {
            name_query: &args.name,
            candidate_final_price: parse_amount(args.final_price.as_deref()),
            candidate_perceived_price: parse_amount(args.perceived_price.as_deref()),
        };
        let outcome = simulate(&records, &input);

        let message = match &outcome {
            SimulationOutcome::Idle => "enter a product name to compare".to_string(),
            SimulationOutcome::NoHistory { name_query } => {
                format!("no past data for `{name_query}`")
            }
            SimulationOutcome::Compared(report) => {
                tracing::info!(
                    event_name = "system.simulate.compared",
                    matched_records = report.matched_records,
                    final_recommendation = report.final_verdict.recommendation.as_str(),
                    perceived_recommendation = report.perceived_verdict.recommendation.as_str(),
                    "price simulation completed"
                );
                format!(
                    "past minimum final {} / perceived {}; final: {}; perceived: {}",
                    format_won(report.historical_min_final),
                    format_won(report.historical_min_perceived),
                    describe(&report.final_verdict),
                    describe(&report.perceived_verdict),
                )
            }
        };

        Ok(CommandResult::success_with_data("simulate", message, to_json(&outcome)?))
    })
}

fn describe(verdict: &Verdict) -> &str {
    if verdict.label.is_empty() {
        "no candidate price"
    } else {
        &verdict.label
    }
}
