use crate::assemble_daily_snapshot::{CsvFeedReader, DailySnapshotAssembler};
use crate::resolve_target_dates::{ArchiveListing, TargetDatesResolver};
use async_trait::async_trait;
use chrono::NaiveDate;
use entities::feeds::FeedKind;
use entities::snapshots::DailySnapshot;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::{error, info};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn write(&self, date: NaiveDate, snapshot: &DailySnapshot) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// ISO dates to import. Empty means "every date missing from the archive".
    pub dates: Vec<String>,
    pub today: NaiveDate,
}

#[async_trait]
pub trait ImportDailySnapshotsInteractor: Send + Sync {
    async fn import(&self, request: ImportRequest) -> anyhow::Result<ImportSummary>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDate {
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub persisted: Vec<NaiveDate>,
    pub failed: Vec<FailedDate>,
    pub unavailable_feeds: Vec<(NaiveDate, FeedKind)>,
    /// Rows skipped per date, only for dates that skipped any.
    pub skipped_rows: Vec<(NaiveDate, usize)>,
}

#[derive(ThisError, Debug)]
pub enum ImportError {
    #[error("{} date(s) failed to import: {}", .0.len(), .0.iter().join(", "))]
    DatesFailed(Vec<NaiveDate>),
}

impl ImportSummary {
    pub fn ensure_success(&self) -> Result<(), ImportError> {
        if self.failed.is_empty() {
            return Ok(());
        }
        Err(ImportError::DatesFailed(
            self.failed.iter().map(|failure| failure.date).collect(),
        ))
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "persisted {} snapshot(s)", self.persisted.len())?;
        for date in &self.persisted {
            writeln!(f, "  ok      {date}")?;
        }
        for failure in &self.failed {
            writeln!(f, "  failed  {}: {}", failure.date, failure.reason)?;
        }
        for (date, feeds) in &self
            .unavailable_feeds
            .iter()
            .group_by(|(date, _)| *date)
        {
            let feeds = feeds.map(|(_, feed)| feed).join(", ");
            writeln!(f, "  partial {date}: unavailable feeds {feeds}")?;
        }
        for (date, count) in &self.skipped_rows {
            writeln!(f, "  skipped {date}: {count} feed row(s)")?;
        }
        Ok(())
    }
}

pub struct ImportDailySnapshots {
    resolver: TargetDatesResolver,
    assembler: DailySnapshotAssembler,
    sink: Arc<dyn SnapshotSink>,
}

impl ImportDailySnapshots {
    pub fn new(
        archive: Arc<dyn ArchiveListing>,
        reader: Arc<dyn CsvFeedReader>,
        sink: Arc<dyn SnapshotSink>,
        earliest_date: NaiveDate,
    ) -> Self {
        Self {
            resolver: TargetDatesResolver::new(archive, earliest_date),
            assembler: DailySnapshotAssembler::new(reader),
            sink,
        }
    }

    async fn import_date(&self, date: NaiveDate, summary: &mut ImportSummary) -> anyhow::Result<()> {
        let assembled = self.assembler.assemble(date).await?;
        if !assembled.skipped_rows.is_empty() {
            summary
                .skipped_rows
                .push((date, assembled.skipped_rows.len()));
        }
        summary.unavailable_feeds.extend(
            assembled
                .unavailable_feeds
                .iter()
                .map(|feed| (date, *feed)),
        );
        self.sink.write(date, &assembled.snapshot).await
    }
}

#[async_trait]
impl ImportDailySnapshotsInteractor for ImportDailySnapshots {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn import(&self, request: ImportRequest) -> anyhow::Result<ImportSummary> {
        let dates = self.resolver.resolve(&request.dates, request.today).await?;

        let mut summary = ImportSummary::default();
        for date in dates {
            match self.import_date(date, &mut summary).await {
                Ok(()) => {
                    info!("Persisted snapshot for {date}");
                    summary.persisted.push(date);
                }
                Err(err) => {
                    error!("Failed to import {date}: {err:?}");
                    summary.failed.push(FailedDate {
                        date,
                        reason: format!("{err:#}"),
                    });
                }
            }
        }
        Ok(summary)
    }
}
