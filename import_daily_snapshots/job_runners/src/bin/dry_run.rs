use async_trait::async_trait;
use chrono::NaiveDate;
use clap::Parser;
use entities::snapshots::DailySnapshot;
use job_runners::{import_snapshots, report, Cli, Settings};
use std::sync::Arc;
use tracing::info;
use use_cases::import_daily_snapshots::SnapshotSink;

/// Logs what would have been archived.
struct DryRunSink;

#[async_trait]
impl SnapshotSink for DryRunSink {
    async fn write(&self, date: NaiveDate, snapshot: &DailySnapshot) -> anyhow::Result<()> {
        let known = snapshot
            .prefs
            .iter()
            .filter(|record| record.patients.is_some())
            .count();
        info!(
            "Would archive {date}: {} prefectures, {known} with confirmed cases",
            snapshot.prefs.len()
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    shared_kernel::tracing::config_telemetry("dry_run");
    let result = start(cli).await;
    shared_kernel::tracing::shutdown_global_tracer_provider();
    result
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::parse()?;
    let summary = import_snapshots(cli, &settings, Arc::new(DryRunSink)).await?;
    report(summary)
}
