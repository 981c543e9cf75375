use crate::commands::{build_runtime, load_config, CommandError, CommandResult};
use hotdeal_db::{connect_with_settings, migrations};

pub fn run() -> CommandResult {
    match apply() {
        Ok(applied) => CommandResult::success(
            "migrate",
            format!("applied pending migrations ({applied} known migration(s))"),
        ),
        Err(error) => CommandResult::from_error("migrate", error),
    }
}

fn apply() -> Result<usize, CommandError> {
    let config = load_config()?;
    let runtime = build_runtime()?;

    runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        pool.close().await;

        let known = migrations::MIGRATOR
            .iter()
            .filter(|migration| migration.migration_type.is_up_migration())
            .count();
        tracing::info!(
            event_name = "system.migrate.applied",
            known_migrations = known,
            "database schema is up to date"
        );
        Ok::<usize, CommandError>(known)
    })
}
