pub mod amount;
pub mod config;
pub mod deal;
pub mod doctor;
pub mod migrate;
pub mod notice;
pub mod simulate;
pub mod suggest;

use hotdeal_core::auth::{AdminGate, AdminSession};
use hotdeal_core::config::{AppConfig, LoadOptions};
use hotdeal_core::errors::ApplicationError;
use hotdeal_db::{connect_with_settings, migrations, DbPool, RepositoryError};
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Runtime;

/// `(error_class, message, exit_code)` carried out of a command body.
pub(crate) type CommandError = (&'static str, String, u8);

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::ok(command, message.into(), None)
    }

    pub fn success_with_data(command: &str, message: impl Into<String>, data: Value) -> Self {
        Self::ok(command, message.into(), Some(data))
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub(crate) fn from_error(command: &str, (class, message, exit_code): CommandError) -> Self {
        tracing::warn!(
            event_name = "system.cli.command_failed",
            command,
            error_class = class,
            exit_code,
            "{message}"
        );
        Self::failure(command, class, message, exit_code)
    }

    fn ok(command: &str, message: String, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message,
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config() -> Result<AppConfig, CommandError> {
    AppConfig::load(LoadOptions::default())
        .map_err(|error| ("config_validation", format!("configuration issue: {error}"), 2))
}

pub(crate) fn build_runtime() -> Result<Runtime, CommandError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| ("runtime_init", format!("failed to initialize async runtime: {error}"), 3))
}

/// Connects and brings the schema up to date before any repository call.
pub(crate) async fn open_store(config: &AppConfig) -> Result<DbPool, CommandError> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
    tracing::debug!(event_name = "system.cli.database_connected", "database connected");

    migrations::run_pending(&pool).await.map_err(|error| ("migration", error.to_string(), 5u8))?;
    Ok(pool)
}

pub(crate) fn authorize(config: &AppConfig, password: &str) -> Result<AdminSession, CommandError> {
    AdminGate::from_config(&config.admin).authenticate(password).map_err(application_error)
}

pub(crate) fn application_error(error: impl Into<ApplicationError>) -> CommandError {
    let error = error.into();
    (error.error_class(), error.to_string(), error.exit_code())
}

pub(crate) fn repository_error(error: RepositoryError) -> CommandError {
    match error {
        RepositoryError::NotFound { .. } => ("not_found", error.to_string(), 2),
        other => application_error(ApplicationError::Persistence(other.to_string())),
    }
}

pub(crate) fn to_json(value: &impl Serialize) -> Result<Value, CommandError> {
    serde_json::to_value(value).map_err(|error| ("serialization", error.to_string(), 6))
}

/// Runs a command body that needs config and a runtime, folding every failure into the
/// JSON contract.
pub(crate) fn execute<F>(command: &str, body: F) -> CommandResult
where
    F: FnOnce(&AppConfig, &Runtime) -> Result<CommandResult, CommandError>,
{
    let outcome = load_config().and_then(|config| {
        let runtime = build_runtime()?;
        body(&config, &runtime)
    });

    match outcome {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(command, error),
    }
}
