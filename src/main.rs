use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rentledger::config::{database, Config};
use rentledger::invoices::BillingPeriod;
use rentledger::middleware::{ErrorHandler, RequestId};
use rentledger::payments::{PaymentRepository, PaymentStore};
use rentledger::residents::{ResidentDirectory, ResidentRepository};
use rentledger::Services;

#[derive(Parser)]
#[command(name = "rentledger", version, about = "Rent ledger and invoicing engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Create rent invoices for a billing period
    GenerateInvoices {
        /// Period label, e.g. "March 2026". Defaults to next month.
        #[arg(long)]
        period: Option<String>,
    },
    /// Mark unpaid payments past their due date as overdue
    RefreshOverdue,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rentledger={},actix_web=info", config.app.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(environment = %config.app.env, "Starting rent ledger");

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        pool_size = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    database::run_migrations(&db_pool)
        .await
        .context("Failed to apply migrations")?;

    let store: Arc<dyn PaymentStore> = Arc::new(PaymentRepository::new(db_pool.clone()));
    let residents: Arc<dyn ResidentDirectory> = Arc::new(ResidentRepository::new(db_pool));
    let clock = Arc::new(config.ledger.clock()?);
    let services = Services::new(store, residents, clock, config.ledger.rent_due_day);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, services).await,
        Command::GenerateInvoices { period } => {
            let run = match period {
                Some(label) => {
                    let period = BillingPeriod::parse(&label)?;
                    services.invoices.generate_for_period(period).await?
                }
                None => services.invoices.generate_next_month().await?,
            };

            for failure in &run.failures {
                tracing::warn!(
                    resident_id = %failure.resident_id,
                    reason = %failure.reason,
                    "Resident not invoiced"
                );
            }
            println!("{}", serde_json::to_string_pretty(&run)?);

            if run.is_clean() {
                Ok(())
            } else {
                anyhow::bail!("{} resident(s) could not be invoiced", run.failures.len())
            }
        }
        Command::RefreshOverdue => {
            let today = services.ledger.today();
            let changed = services.ledger.refresh_statuses(today).await?;
            println!("{} payment(s) marked overdue as of {}", changed, today);
            Ok(())
        }
    }
}

async fn serve(config: &Config, services: Services) -> anyhow::Result<()> {
    let bind_address = config.server.bind_address();

    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(move |cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
