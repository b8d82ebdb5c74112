use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use entities::archive::entry_name;
use entities::snapshots::DailySnapshot;
use std::path::PathBuf;
use tracing::info;
use use_cases::import_daily_snapshots::SnapshotSink;
use use_cases::resolve_target_dates::ArchiveListing;

/// Snapshots stored as one pretty-printed JSON file per date in `directory`.
#[derive(Clone, Debug)]
pub struct JsonArchive {
    directory: PathBuf,
}

impl JsonArchive {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(entry_name(date))
    }
}

#[async_trait]
impl ArchiveListing for JsonArchive {
    async fn list_entries(&self) -> anyhow::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .with_context(|| format!("Failed to read {}", self.directory.display()))?;

        let mut names = vec![];
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list {}", self.directory.display()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

#[async_trait]
impl SnapshotSink for JsonArchive {
    #[tracing::instrument(err, skip(self, snapshot), level = "info")]
    async fn write(&self, date: NaiveDate, snapshot: &DailySnapshot) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Failed to create {}", self.directory.display()))?;

        let path = self.path_for(date);
        let json = serde_json::to_vec_pretty(snapshot).context("Failed to serialize snapshot")?;
        // A partially written file must never carry an entry name.
        let partial = path.with_extension("json.partial");
        tokio::fs::write(&partial, json)
            .await
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        tokio::fs::rename(&partial, &path)
            .await
            .with_context(|| format!("Failed to move snapshot into {}", path.display()))?;

        info!("Wrote {}", path.display());
        Ok(())
    }
}
