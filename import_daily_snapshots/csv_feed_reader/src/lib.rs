use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::NaiveDate;
use entities::feeds::FeedKind;
use serde::Deserialize;
use shared_kernel::http_client::HttpClient;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::info;
use url::Url;
use use_cases::assemble_daily_snapshot::CsvFeedReader;

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    /// Directory URL the CSV documents are published under. Must end with `/`.
    pub base_url: Url,
}

/// Reads the published CSV documents over HTTP. Each document holds the whole
/// history, so a download is kept for the lifetime of the reader and shared by
/// every date and every feed reading the same document. A failed download is
/// kept as well and not retried within the same run.
pub struct HttpFeedReader {
    base_url: Url,
    documents: Mutex<HashMap<Url, Result<String, String>>>,
}

impl HttpFeedReader {
    pub fn new(settings: FeedSettings) -> Self {
        Self {
            base_url: settings.base_url,
            documents: Mutex::new(HashMap::new()),
        }
    }

    fn document_url(&self, feed: FeedKind) -> anyhow::Result<Url> {
        self.base_url
            .join(&format!("{}.csv", feed.document()))
            .with_context(|| format!("Invalid URL for {feed}"))
    }
}

#[async_trait]
impl CsvFeedReader for HttpFeedReader {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn fetch(&self, feed: FeedKind, feed_date: NaiveDate) -> anyhow::Result<String> {
        let url = self.document_url(feed)?;

        let mut documents = self.documents.lock().await;
        if let Some(document) = documents.get(&url) {
            return document.clone().map_err(|reason| {
                anyhow!("{feed} was unavailable earlier in this run: {reason}")
            });
        }

        match HttpClient::get_text(url.clone()).await {
            Ok(content) => {
                info!("Downloaded {url} ({} bytes)", content.len());
                documents.insert(url, Ok(content.clone()));
                Ok(content)
            }
            Err(err) => {
                let err = anyhow::Error::new(err).context(format!("Failed to download {feed}"));
                documents.insert(url, Err(format!("{err:#}")));
                Err(err)
            }
        }
    }
}
