use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use nfd_payout::application::pipeline::{PayoutPipeline, report};
use nfd_payout::application::resolver::ThrottledResolver;
use nfd_payout::application::retry::RetryPolicy;
use nfd_payout::application::signer::GroupSigner;
use nfd_payout::application::submitter::{SubmissionConfig, SubmissionCoordinator};
use nfd_payout::application::throttle::ThrottleGate;
use nfd_payout::config::{DEFAULT_ASSET_ID, PayoutConfig};
use nfd_payout::domain::account::{Account, Address};
use nfd_payout::infrastructure::algod::AlgodClient;
use nfd_payout::infrastructure::nfd::{DEFAULT_API_URL, NfdClient};
use nfd_payout::interfaces::csv::failure_writer::{FailureReportFile, default_report_path};
use nfd_payout::interfaces::csv::payment_reader::PaymentReader;
use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CSV of `handle,amount` rows, no header
    input: PathBuf,

    /// Where to write failed payments. Defaults to `<input>-failed.csv`.
    #[arg(long)]
    report: Option<PathBuf>,

    /// 25-word wallet mnemonic used to sign every transaction
    #[arg(long, env = "ALGO_WALLET_MNEMONIC", hide_env_values = true)]
    mnemonic: String,

    /// Ledger node URL
    #[arg(long, env = "ALGO_ALGOD_URL")]
    algod_url: String,

    #[arg(long, env = "ALGO_ALGOD_TOKEN", default_value = "", hide_env_values = true)]
    algod_token: String,

    /// Sender address. Defaults to the wallet's own address.
    #[arg(long, env = "SENDER_ADDRESS")]
    sender: Option<String>,

    /// Naming service base URL
    #[arg(long, env = "NFD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "NFD_ASSET_ID", default_value_t = DEFAULT_ASSET_ID)]
    asset_id: u64,

    /// Signed groups submitted at once; 1 submits sequentially
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Rounds to wait for each confirmation
    #[arg(long, default_value_t = 4)]
    max_rounds: u64,

    /// Minimum milliseconds between resolver calls
    #[arg(long, default_value_t = 200)]
    min_interval_ms: u64,

    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,

    /// Retries for transient resolver and submission failures
    #[arg(long, default_value_t = 0)]
    max_retries: u32,
}

impl Cli {
    fn payout_config(&self) -> PayoutConfig {
        let retry = RetryPolicy::with_retries(self.max_retries);
        PayoutConfig {
            api_url: self.api_url.clone(),
            asset_id: self.asset_id,
            min_interval: Duration::from_millis(self.min_interval_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            submission: SubmissionConfig {
                max_rounds: self.max_rounds,
                concurrency: self.concurrency,
                retry: retry.clone(),
            },
            resolver_retry: retry,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = cli.payout_config();

    // Credentials and configuration are fatal before any payment is touched.
    let account = Arc::new(
        Account::from_mnemonic(&cli.mnemonic)
            .into_diagnostic()
            .wrap_err("invalid wallet mnemonic")?,
    );
    let sender = match &cli.sender {
        Some(sender) => sender
            .parse::<Address>()
            .into_diagnostic()
            .wrap_err("invalid sender address")?,
        None => account.address(),
    };
    if sender != account.address() {
        warn!(%sender, signer = %account.address(), "Sender differs from the signing wallet");
    }

    let file = File::open(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read {}", cli.input.display()))?;
    let mut requests = Vec::new();
    for row in PaymentReader::new(file).payments() {
        match row {
            Ok(request) => requests.push(request),
            Err(e) => error!(error = %e, "Error reading payment"),
        }
    }
    info!(payments = requests.len(), %sender, "Loaded payments");

    let nfd = NfdClient::new(
        &config.api_url,
        config.asset_id,
        sender,
        config.request_timeout,
    )
    .into_diagnostic()?;
    let algod =
        AlgodClient::new(&cli.algod_url, &cli.algod_token, config.request_timeout).into_diagnostic()?;

    let gate = Arc::new(ThrottleGate::new(config.min_interval));
    let pipeline = PayoutPipeline::new(
        Box::new(ThrottledResolver::new(Box::new(nfd), gate).with_retry(config.resolver_retry)),
        GroupSigner::new(account),
        SubmissionCoordinator::new(Box::new(algod), config.submission),
    );

    let summary = pipeline.run(requests).await;

    let mut report_file = FailureReportFile::new(
        cli.report
            .unwrap_or_else(|| default_report_path(&cli.input)),
    );
    if report(&summary.failed, &mut report_file).into_diagnostic()? {
        warn!(
            failed = summary.failed.len(),
            path = %report_file.path().display(),
            "Failed transactions have been written to the report"
        );
    }

    info!(
        confirmed = summary.confirmed.len(),
        failed = summary.failed.len(),
        dropped = summary.dropped.len(),
        "Payout complete"
    );

    Ok(())
}
