mod feed_rows;

pub use feed_rows::{
    feed_date_token, select_rows, DailyFeedRow, FeedSnapshot, RowOutcome, SkipReason, SkippedRow,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use entities::feeds::FeedKind;
use entities::prefectures::Prefecture;
use entities::snapshots::{DailySnapshot, RegionRecord};
#[cfg(test)]
use mockall::automock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::warn;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CsvFeedReader: Send + Sync {
    /// Raw CSV content of `feed` that is expected to contain rows for `feed_date`.
    async fn fetch(&self, feed: FeedKind, feed_date: NaiveDate) -> anyhow::Result<String>;
}

#[derive(ThisError, Debug)]
pub enum AssemblyError {
    #[error("every feed was unavailable for {date} (feed date {feed_date})")]
    AllFeedsUnavailable {
        date: NaiveDate,
        feed_date: NaiveDate,
    },
    #[error("no feed has prefecture rows for {feed_date} yet, nothing to persist for {date}")]
    NoRowsForDate {
        date: NaiveDate,
        feed_date: NaiveDate,
    },
    #[error("{0} has no previous day to read feeds for")]
    DateOutOfRange(NaiveDate),
}

#[derive(Debug)]
pub struct AssembledSnapshot {
    pub snapshot: DailySnapshot,
    pub unavailable_feeds: Vec<FeedKind>,
    pub skipped_rows: Vec<(FeedKind, SkippedRow)>,
}

/// Upstream feeds report figures one day in arrears.
pub fn feed_date_for(date: NaiveDate) -> Result<NaiveDate, AssemblyError> {
    date.pred_opt().ok_or(AssemblyError::DateOutOfRange(date))
}

pub struct DailySnapshotAssembler {
    reader: Arc<dyn CsvFeedReader>,
}

impl DailySnapshotAssembler {
    pub fn new(reader: Arc<dyn CsvFeedReader>) -> Self {
        Self { reader }
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn assemble(&self, date: NaiveDate) -> Result<AssembledSnapshot, AssemblyError> {
        let feed_date = feed_date_for(date)?;

        let mut feeds = HashMap::new();
        let mut unavailable_feeds = vec![];
        let mut skipped_rows = vec![];

        for feed in FeedKind::all() {
            let content = match self.reader.fetch(feed, feed_date).await {
                Ok(content) => content,
                Err(err) => {
                    warn!("{feed} is unavailable for {feed_date}: {err:?}");
                    unavailable_feeds.push(feed);
                    continue;
                }
            };
            let (snapshot, skipped) = FeedSnapshot::build(feed, select_rows(&content, feed_date));
            for skip in skipped {
                warn!("Skipped {feed} line {}: {}", skip.line, skip.reason);
                skipped_rows.push((feed, skip));
            }
            feeds.insert(feed, snapshot);
        }

        if feeds.is_empty() {
            return Err(AssemblyError::AllFeedsUnavailable { date, feed_date });
        }

        let value = |feed: FeedKind, prefecture: &Prefecture| {
            feeds
                .get(&feed)
                .and_then(|snapshot| snapshot.get(prefecture))
        };
        let prefs = Prefecture::regions()
            .map(|prefecture| RegionRecord {
                patients: value(FeedKind::ConfirmedCases, prefecture),
                hospitalizations: value(FeedKind::Hospitalizations, prefecture),
                discharges: value(FeedKind::Discharges, prefecture),
                mortality: value(FeedKind::Deaths, prefecture),
                severe: value(FeedKind::SevereCases, prefecture),
                ..RegionRecord::new(prefecture)
            })
            .collect::<Vec<_>>();
        if prefs.iter().all(RegionRecord::is_unknown) {
            return Err(AssemblyError::NoRowsForDate { date, feed_date });
        }

        Ok(AssembledSnapshot {
            snapshot: DailySnapshot { date, prefs },
            unavailable_feeds,
            skipped_rows,
        })
    }
}
