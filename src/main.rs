use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibliostats::config::Config;
use bibliostats::domain::DomainError;
use bibliostats::openlibrary::OpenLibraryClient;
use bibliostats::services::{analyze, export_publisher_counts, load_or_build_table};

async fn run(config: &Config) -> Result<(), DomainError> {
    let client = OpenLibraryClient::from_config(config)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let (table, source) = load_or_build_table(config, &client).await?;
    tracing::info!(
        "Analyzing {} books ({:?} table, {} columns)",
        table.len(),
        source,
        table.columns().len()
    );

    let report = analyze(&table);
    export_publisher_counts(&report.publishers, &config.report_dir)?;

    println!("{}", report);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bibliostats=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env().apply_args(&args);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
