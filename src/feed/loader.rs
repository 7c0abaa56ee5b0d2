//! Local-first feed loading with remote fallback.

use log::{debug, info};

use super::{Feed, FeedSource};

/// Loads the release feed from a local source, falling back to a remote one.
///
/// Failures of either source are never surfaced: they degrade to the next
/// source, and finally to [`Feed::Empty`]. Nothing is retried.
pub struct FeedLoader {
    local: Box<dyn FeedSource>,
    remote: Option<Box<dyn FeedSource>>,
}

impl FeedLoader {
    /// `remote` is `None` when no remote endpoint is configured; the loader
    /// then never touches the network after the local source.
    pub fn new(local: Box<dyn FeedSource>, remote: Option<Box<dyn FeedSource>>) -> Self {
        Self { local, remote }
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_releases(&self) -> Feed {
        let local = Self::try_source(self.local.as_ref()).await;
        if !local.is_empty() {
            return local;
        }

        let Some(remote) = self.remote.as_deref() else {
            debug!("No remote feed configured");
            return Feed::Empty;
        };

        Self::try_source(remote).await
    }

    async fn try_source(source: &dyn FeedSource) -> Feed {
        let kind = source.kind();
        match source.fetch().await {
            Ok(records) => {
                info!("Loaded {} release(s) from {} feed", records.len(), kind);
                Feed::from_records(kind, records)
            }
            Err(e) => {
                debug!("{} feed unavailable: {:#}", kind, e);
                Feed::Empty
            }
        }
    }
}
