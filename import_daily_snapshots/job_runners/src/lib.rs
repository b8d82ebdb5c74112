use chrono::NaiveDate;
use clap::Parser;
use csv_feed_reader::{FeedSettings, HttpFeedReader};
use json_archive::JsonArchive;
use serde::Deserialize;
use shared_kernel::date_time::tokyo_date_time::TokyoTZDateTime;
use std::path::PathBuf;
use std::sync::Arc;
use use_cases::import_daily_snapshots::{
    ImportDailySnapshots, ImportDailySnapshotsInteractor, ImportRequest, ImportSummary,
    SnapshotSink,
};

#[derive(Parser, Debug)]
#[command(version, about = "Imports daily per-prefecture snapshots from the MHLW open data feeds")]
pub struct Cli {
    /// Dates to import as YYYY-MM-DD. Without any, every date missing from the
    /// archive up to today is imported.
    pub dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub feeds: FeedSettings,
    pub archive: ArchiveSettings,
    pub gap_detection: GapDetectionSettings,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveSettings {
    pub directory: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct GapDetectionSettings {
    pub earliest_date: NaiveDate,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        shared_kernel::configuration::config::<Settings>()
    }

    pub fn archive(&self) -> JsonArchive {
        JsonArchive::new(self.archive.directory.clone())
    }
}

/// Runs one import batch. Gap detection always reads the configured archive;
/// assembled snapshots go to `sink`.
pub async fn import_snapshots(
    cli: Cli,
    settings: &Settings,
    sink: Arc<dyn SnapshotSink>,
) -> anyhow::Result<ImportSummary> {
    let interactor = ImportDailySnapshots::new(
        Arc::new(settings.archive()),
        Arc::new(HttpFeedReader::new(settings.feeds.clone())),
        sink,
        settings.gap_detection.earliest_date,
    );
    interactor
        .import(ImportRequest {
            dates: cli.dates,
            today: TokyoTZDateTime::today(),
        })
        .await
}

/// Prints the summary and turns failed dates into an error exit.
pub fn report(summary: ImportSummary) -> anyhow::Result<()> {
    print!("{summary}");
    summary.ensure_success()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Settings};
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};
    use std::path::{Path, PathBuf};

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dates_are_taken_verbatim() {
        let cli = Cli::try_parse_from(["importer", "2020-03-06", "not-a-date"]).unwrap();
        assert_eq!(cli.dates, vec!["2020-03-06", "not-a-date"]);

        let cli = Cli::try_parse_from(["importer"]).unwrap();
        assert!(cli.dates.is_empty());
    }

    #[test]
    fn test_shipped_configuration_is_valid() {
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configuration");
        let settings =
            shared_kernel::configuration::config_from::<Settings>(&directory).unwrap();

        assert_eq!(
            settings.feeds.base_url.as_str(),
            "https://covid19.mhlw.go.jp/public/opendata/"
        );
        assert_eq!(settings.archive.directory, PathBuf::from("data"));
        assert_eq!(
            settings.gap_detection.earliest_date,
            NaiveDate::from_ymd_opt(2020, 1, 17).unwrap()
        );
    }
}
