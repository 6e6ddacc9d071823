use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use license_classifier::api;
use license_classifier::batch::{BatchConfig, BatchProcessor, FailurePolicy};
use license_classifier::classifier::Classifier;
use license_classifier::classifier::openai::OpenAiClassifier;
use license_classifier::config::Settings;
use license_classifier::consts::{API_DESCRIPTION, API_TITLE, DEFAULT_LISTEN, VERSION};
use license_classifier::service::LicenseService;
use license_classifier::store::LicenseStore;
use license_classifier::store::csv::CsvStore;

#[derive(Parser)]
#[command(
    name = "license-classifier",
    version,
    about = "Classify software licenses into business categories."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every row of the input table and rewrite the output table
    Batch {
        /// Leave failed rows out instead of aborting the whole run
        #[arg(long, default_value_t = false)]
        skip_failures: bool,
    },
    /// Classify a single license description and print the result
    Classify {
        /// License description text
        text: String,
    },
    /// Serve the license API over HTTP
    Serve {
        /// Listen address
        #[arg(short, long, default_value = DEFAULT_LISTEN)]
        listen: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Command::Batch { skip_failures } => run_batch(&settings, skip_failures).await,
        Command::Classify { text } => run_classify(&settings, &text).await,
        Command::Serve { listen } => run_serve(&settings, &listen).await,
    }
}

async fn run_batch(settings: &Settings, skip_failures: bool) -> anyhow::Result<()> {
    let classifier = OpenAiClassifier::new(settings.openai_config()?)?;
    let store: Arc<dyn LicenseStore> = Arc::new(CsvStore::new(&settings.output_csv));
    let config = BatchConfig {
        on_failure: if skip_failures {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        },
        call_timeout: Duration::from_secs(settings.timeout_secs),
    };

    let processor = BatchProcessor::new(Box::new(classifier), store, config);
    let report = processor.process_file(&settings.input_csv).await?;

    info!(
        classified = report.classified,
        skipped = report.skipped.len(),
        output = %settings.output_csv.display(),
        "batch complete"
    );
    if !report.skipped.is_empty() {
        eprintln!("skipped license ids: {:?}", report.skipped);
    }
    Ok(())
}

async fn run_classify(settings: &Settings, text: &str) -> anyhow::Result<()> {
    let classifier = OpenAiClassifier::new(settings.openai_config()?)?;
    let result = classifier.classify(text).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run_serve(settings: &Settings, listen: &str) -> anyhow::Result<()> {
    let store = Arc::new(CsvStore::new(&settings.output_csv));
    let service = Arc::new(LicenseService::new(store));
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {listen}"))?;
    info!("{API_TITLE} v{VERSION}: {API_DESCRIPTION}");
    info!(
        addr = %listener.local_addr()?,
        table = %settings.output_csv.display(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
