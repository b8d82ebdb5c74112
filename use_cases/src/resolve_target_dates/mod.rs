use async_trait::async_trait;
use chrono::NaiveDate;
use entities::archive::date_from_entry_name;
#[cfg(test)]
use mockall::automock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::{info, warn};

/// Read access to the store of already persisted snapshots.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArchiveListing: Send + Sync {
    /// Names of every entry in the archive. Entries that do not encode a date
    /// are tolerated and ignored by the caller.
    async fn list_entries(&self) -> anyhow::Result<Vec<String>>;
}

#[derive(ThisError, Debug)]
pub enum TargetDatesError {
    #[error("{input:?} is not a valid ISO calendar date")]
    InvalidDateFormat {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("the snapshot archive could not be listed")]
    ArchiveUnavailable(#[source] anyhow::Error),
}

pub struct TargetDatesResolver {
    archive: Arc<dyn ArchiveListing>,
    earliest_date: NaiveDate,
}

impl TargetDatesResolver {
    /// `earliest_date` bounds gap detection: no date before it is ever proposed.
    pub fn new(archive: Arc<dyn ArchiveListing>, earliest_date: NaiveDate) -> Self {
        Self {
            archive,
            earliest_date,
        }
    }

    /// Explicit expressions win and are returned as given. Without any, the
    /// dates missing from the archive are collected backwards from `today`.
    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn resolve(
        &self,
        expressions: &[String],
        today: NaiveDate,
    ) -> Result<Vec<NaiveDate>, TargetDatesError> {
        if !expressions.is_empty() {
            return parse_dates(expressions);
        }
        let dates = self.missing_dates(today).await?;
        info!("{} date(s) missing from the archive", dates.len());
        Ok(dates)
    }

    async fn missing_dates(&self, today: NaiveDate) -> Result<Vec<NaiveDate>, TargetDatesError> {
        let archived = self
            .archive
            .list_entries()
            .await
            .map_err(TargetDatesError::ArchiveUnavailable)?
            .iter()
            .filter_map(|name| date_from_entry_name(name))
            .collect::<HashSet<_>>();

        let mut dates = vec![];
        let mut date = today;
        while !archived.contains(&date) {
            if date < self.earliest_date {
                warn!(
                    "Reached {} without finding an archived snapshot",
                    self.earliest_date
                );
                break;
            }
            dates.push(date);
            match date.pred_opt() {
                Some(previous) => date = previous,
                None => break,
            }
        }
        Ok(dates)
    }
}

fn parse_dates(expressions: &[String]) -> Result<Vec<NaiveDate>, TargetDatesError> {
    expressions
        .iter()
        .map(|expression| {
            expression
                .parse::<NaiveDate>()
                .map_err(|source| TargetDatesError::InvalidDateFormat {
                    input: expression.clone(),
                    source,
                })
        })
        .collect()
}
