//! Wiki approval sweep runtime.

#![forbid(unsafe_code)]

mod sweep_cli;
mod sweep_config;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wikiapprove_application::{
    ApprovalSweepRequest, ApprovalSweepService, ApprovalSweepSummary, NamespaceFilterResolver,
};
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{ApprovabilityRules, ApprovalMode};
use wikiapprove_infrastructure::{
    ConfiguredNamespaceRegistry, ConsoleSweepReporter, PostgresApprovabilityPolicy,
    PostgresApprovalRepository, PostgresPageRepository,
};

use crate::sweep_cli::SweepCli;
use crate::sweep_config::SweepConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = SweepCli::parse();
    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = %error, "approval sweep failed");
            eprintln!("error: {error}");
            if error.is_configuration() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: SweepCli) -> AppResult<ApprovalSweepSummary> {
    let config = SweepConfig::load(&cli)?;
    run_with_config(&cli, &config).await
}

/// Builds the namespace registry and the sweep request without touching the database.
fn prepare_sweep(
    cli: &SweepCli,
    config: &SweepConfig,
) -> AppResult<(Arc<ConfiguredNamespaceRegistry>, ApprovalSweepRequest)> {
    let registry = Arc::new(config.namespace_registry()?);
    let namespace_filter =
        NamespaceFilterResolver::new(registry.clone()).resolve_list(cli.namespaces.as_deref())?;

    Ok((
        registry,
        ApprovalSweepRequest {
            mode: ApprovalMode::from_force_flag(cli.force),
            namespace_filter,
            approver: config.approver.clone(),
        },
    ))
}

async fn run_with_config(
    cli: &SweepCli,
    config: &SweepConfig,
) -> AppResult<ApprovalSweepSummary> {
    let (registry, request) = prepare_sweep(cli, config)?;

    info!(
        force = cli.force,
        namespace_filter_active = request.namespace_filter.is_active(),
        approver = request.approver.display_name(),
        batch_size = config.batch_size,
        "wikiapprove-sweep started"
    );

    let pool = connect_pool(config.database_url.as_str(), config.max_connections).await?;
    let service = build_sweep_service(
        pool,
        config.approvability_rules.clone(),
        registry,
        config.batch_size,
    );

    service.ensure_capability().await?;
    service
        .run(&request, &ConsoleSweepReporter::stdout())
        .await
}

async fn connect_pool(database_url: &str, max_connections: u32) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn build_sweep_service(
    pool: PgPool,
    rules: ApprovabilityRules,
    registry: Arc<ConfiguredNamespaceRegistry>,
    batch_size: usize,
) -> ApprovalSweepService {
    let page_repository = Arc::new(PostgresPageRepository::new(pool.clone()));
    let approval_repository = Arc::new(PostgresApprovalRepository::new(pool.clone()));
    let approvability_policy = Arc::new(PostgresApprovabilityPolicy::new(pool, rules));

    ApprovalSweepService::new(
        page_repository,
        approval_repository,
        approvability_policy,
        registry,
    )
    .with_batch_size(batch_size)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
