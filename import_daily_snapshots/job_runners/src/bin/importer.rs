use clap::Parser;
use job_runners::{import_snapshots, report, Cli, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    shared_kernel::tracing::config_telemetry("importer");
    let result = start(cli).await;
    shared_kernel::tracing::shutdown_global_tracer_provider();
    result
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::parse()?;
    let archive = Arc::new(settings.archive());
    let summary = import_snapshots(cli, &settings, archive).await?;
    report(summary)
}
