use crate::activity::{ActivityFilter, StoredActivity};
use crate::fetcher::{ActivityFetcher, FetchOutcome};
use crate::store::{ActivityStore, run_blocking};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(ActivityFilter),
    List { limit: i64 },
}

pub struct App {
    fetcher: ActivityFetcher,
    store: ActivityStore,
}

impl App {
    pub fn new(fetcher: ActivityFetcher, store: ActivityStore) -> Self {
        Self { fetcher, store }
    }

    /// Fetches one activity and stores it. Nothing is stored when the service
    /// has no activity to offer.
    pub async fn run_fetch(&self, filter: &ActivityFilter) -> Result<Option<StoredActivity>> {
        let activity = match self.fetcher.random_activity(filter).await {
            FetchOutcome::Found(activity) => activity,
            FetchOutcome::NotFound(reason) => {
                warn!("No activity fetched: {}", reason);
                return Ok(None);
            }
        };

        let store = self.store.clone();
        let stored = run_blocking(move || store.insert(&activity))
            .await
            .context("Failed to save activity")?;

        info!("Saved activity #{}", stored.id);
        Ok(Some(stored))
    }

    pub async fn run_list(&self, limit: i64) -> Result<Vec<StoredActivity>> {
        let store = self.store.clone();
        let records = run_blocking(move || store.list_recent(limit))
            .await
            .context("Failed to list activities")?;
        Ok(records)
    }

    pub async fn execute(&self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Fetch(filter) => match self.run_fetch(&filter).await? {
                Some(stored) => writeln!(out, "{}", stored)?,
                None => writeln!(out, "No activity found for the given filters.")?,
            },
            Command::List { limit } => {
                let records = self.run_list(limit).await?;
                if records.is_empty() {
                    writeln!(out, "No saved activities yet.")?;
                }
                for record in &records {
                    writeln!(out, "{}", record)?;
                }
            }
        }
        Ok(())
    }
}
