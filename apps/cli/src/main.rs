mod scheduler;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ledgerlink_connect::bank::{
    SyncOptions, SyncOrchestrator, SyncProgressPayload, SyncProgressReporter, SyncResult,
    TokioPacer, WebhookIngestor,
};
use ledgerlink_connect::client::BankHttpClient;
use ledgerlink_core::accounts::{AccountService, AccountServiceTrait};
use ledgerlink_core::transactions::{TransactionService, TransactionServiceTrait};
use ledgerlink_core::utils::time_utils::parse_sync_date;
use ledgerlink_storage_sqlite::accounts::AccountRepository;
use ledgerlink_storage_sqlite::transactions::TransactionRepository;

#[derive(Parser)]
#[command(name = "ledgerlink", version, about = "Bank account and transaction synchronization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pull accounts and transactions from the bank and reconcile them
    Sync(SyncArgs),
    /// Register the webhook endpoint with the bank gateway
    RegisterWebhook {
        /// Publicly reachable URL the bank should push transaction events to
        #[arg(long)]
        url: String,
    },
    /// List stored accounts and their sync checkpoints
    Accounts {
        /// Include archived accounts
        #[arg(long)]
        all: bool,
    },
    /// List transactions still awaiting categorization
    Uncategorized,
}

#[derive(Args)]
struct SyncArgs {
    /// Delay between consecutive gateway requests, in milliseconds
    #[arg(long, default_value_t = 250)]
    delay_ms: u64,

    /// Inclusive lower sync bound (YYYY-MM-DD). Takes precedence over the
    /// SYNC_FROM_DATE environment variable.
    #[arg(long)]
    from: Option<String>,

    /// Restart from the --from date, ignoring stored per-account checkpoints
    #[arg(long)]
    force_from: bool,

    /// Keep running and sync on a fixed interval instead of exiting
    #[arg(long)]
    watch: bool,

    /// Interval between watch-mode syncs, in seconds
    #[arg(long, default_value_t = 4 * 60 * 60)]
    interval_secs: u64,
}

/// Progress reporter that forwards sync events to the log output.
struct LogProgressReporter;

impl SyncProgressReporter for LogProgressReporter {
    fn report_progress(&self, payload: SyncProgressPayload) {
        tracing::info!(
            account = %payload.account_name,
            status = %payload.status,
            "sync progress"
        );
    }

    fn report_sync_start(&self) {
        tracing::info!("sync started");
    }

    fn report_sync_complete(&self, result: &SyncResult) {
        tracing::info!(errors = result.errors.len(), "sync finished");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_log::LogTracer::init().ok();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Resolves the effective sync options from flags and environment.
///
/// `--from` wins over `SYNC_FROM_DATE`; `--force-from` requires one of them.
fn sync_options(args: &SyncArgs) -> anyhow::Result<SyncOptions> {
    let from_raw = args
        .from
        .clone()
        .or_else(|| std::env::var("SYNC_FROM_DATE").ok().filter(|v| !v.is_empty()));

    let earliest_sync_date = from_raw
        .map(|raw| parse_sync_date(&raw).with_context(|| format!("invalid sync date '{raw}'")))
        .transpose()?;

    if args.force_from && earliest_sync_date.is_none() {
        bail!("--force-from requires --from or SYNC_FROM_DATE");
    }

    Ok(SyncOptions {
        request_delay_ms: args.delay_ms,
        earliest_sync_date,
        force_from_date: args.force_from,
    })
}

fn env_var(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{key} is not set"))
}

fn bank_client() -> anyhow::Result<Arc<BankHttpClient>> {
    Ok(Arc::new(BankHttpClient::new(
        env_var("BANK_API_URL")?,
        &env_var("BANK_API_TOKEN")?,
    )?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "ledgerlink.db".to_string());
    let pool = ledgerlink_storage_sqlite::init(&database_url)?;
    let writer = ledgerlink_storage_sqlite::spawn_writer(pool.clone());

    let accounts = Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let transactions = Arc::new(TransactionRepository::new(pool, writer));

    match cli.command {
        Command::Sync(args) => {
            let api_client = bank_client()?;
            let options = sync_options(&args)?;
            let orchestrator = SyncOrchestrator::new(
                api_client,
                accounts,
                transactions,
                Arc::new(TokioPacer),
                Arc::new(LogProgressReporter),
            );

            if args.watch {
                scheduler::run_sync_loop(&orchestrator, &options, args.interval_secs).await;
                unreachable!("watch loop never returns");
            }

            let result = orchestrator.execute(&options).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if !result.is_success() {
                for error in &result.errors {
                    tracing::error!("{error}");
                }
                std::process::exit(1);
            }
            Ok(())
        }
        Command::RegisterWebhook { url } => {
            let ingestor = WebhookIngestor::new(bank_client()?, accounts, transactions);
            ingestor.register(&url).await?;
            tracing::info!("webhook registered: {url}");
            Ok(())
        }
        Command::Accounts { all } => {
            let service = AccountService::new(accounts);
            let listed = if all {
                service.get_all_accounts()?
            } else {
                service.get_active_accounts()?
            };
            for account in listed {
                let checkpoint = account
                    .last_sync_time
                    .map(|ts| ts.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{}\t{}\t{:?}\t{}\tlast sync: {}",
                    account.id, account.name, account.source, account.currency, checkpoint
                );
            }
            Ok(())
        }
        Command::Uncategorized => {
            let service = TransactionService::new(transactions);
            for tx in service.get_uncategorized_transactions()? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    tx.account_id,
                    tx.external_id,
                    tx.posted_at.date_naive(),
                    tx.amount,
                    tx.description
                );
            }
            Ok(())
        }
    }
}
