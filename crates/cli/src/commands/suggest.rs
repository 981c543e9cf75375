use hotdeal_core::pricing::matching::find_similar;
use hotdeal_db::{DealRepository, SqlDealRepository};
use serde_json::json;

use crate::commands::{execute, open_store, repository_error, CommandResult};

/// Suggests registered standard model names close to a product name being entered.
pub fn run(product: &str) -> CommandResult {
    execute("suggest", |config, runtime| {
        let names = runtime.block_on(async {
            let pool = open_store(config).await?;
            let names = SqlDealRepository::new(pool.clone())
                .standard_model_names()
                .await
                .map_err(repository_error);
            pool.close().await;
            names
        })?;

        let result = find_similar(product, &names, config.matching.options());
        tracing::debug!(
            event_name = "system.suggest.ranked",
            candidates = names.len(),
            matches = result.len(),
            "ranked model name candidates"
        );

        let message = if result.is_empty() {
            "no similar model names found".to_string()
        } else {
            format!("similar models: {}", result.names().join(", "))
        };
        Ok(CommandResult::success_with_data(
            "suggest",
            message,
            json!({ "query": product, "matches": result.matches }),
        ))
    })
}
