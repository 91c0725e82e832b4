//! In-memory [`PageStore`]
//!
//! All state sits behind one lock that is never held across an await. An
//! optional latency makes every request sleep first, which lets tests observe
//! saves while they are in flight.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use funnel_editor::{PageStore, StoreError};
use funnel_model::{Funnel, LayoutTree, NewPage, PageRecord, PageUpdate};
use tracing::{debug, info};

use crate::state::{StoreSnapshot, StoreState};

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    latency: Option<Duration>,
    fail_writes: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every request by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Mutex::new(StoreState::from_snapshot(snapshot)),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }

    /// Load a seed file written by [`MemoryStore::to_json`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Self::from_json(&content).map_err(|e| StoreError::Rejected(e.to_string()))
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state().snapshot()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub fn create_funnel(&self, name: &str) -> Funnel {
        let funnel = self.state().create_funnel(name, None);
        info!(funnel_id = %funnel.id, name, "Created funnel");
        funnel
    }

    /// Seed a stored record verbatim, e.g. a page still in the legacy format
    pub fn insert_page(&self, record: PageRecord) {
        debug!(page_id = %record.id, "Seeded page");
        self.state().insert_page(record);
    }

    pub fn page(&self, page_id: &str) -> Option<PageRecord> {
        self.state().page(page_id).ok()
    }

    /// Stored sections of a page, parsed
    pub fn sections(&self, page_id: &str) -> Option<LayoutTree> {
        self.state().sections(page_id)
    }

    pub fn delete_page(&self, page_id: &str) -> Result<PageRecord, StoreError> {
        let record = self.state().delete_page(page_id)?;
        info!(page_id, "Deleted page");
        Ok(record)
    }

    /// Successful `update_page` calls for one page
    pub fn writes(&self, page_id: &str) -> usize {
        self.state().writes(page_id)
    }

    pub fn total_writes(&self) -> usize {
        self.state().total_writes()
    }

    /// Make every `update_page` fail with `message` until cleared with `None`
    pub fn fail_writes(&self, message: Option<&str>) {
        *self
            .fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message.map(str::to_string);
    }

    fn write_failure(&self) -> Option<String> {
        self.fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PageStore for MemoryStore {
    async fn get_funnel(&self, funnel_id: &str) -> Result<Funnel, StoreError> {
        self.simulate_latency().await;
        self.state().funnel(funnel_id)
    }

    async fn list_pages(&self, funnel_id: &str) -> Result<Vec<PageRecord>, StoreError> {
        self.simulate_latency().await;
        self.state().list_pages(funnel_id)
    }

    async fn create_page(&self, page: NewPage) -> Result<PageRecord, StoreError> {
        self.simulate_latency().await;
        let record = self.state().create_page(page)?;
        info!(page_id = %record.id, slug = %record.slug, "Created page");
        Ok(record)
    }

    async fn update_page(&self, page_id: &str, update: PageUpdate) -> Result<(), StoreError> {
        self.simulate_latency().await;
        if let Some(message) = self.write_failure() {
            return Err(StoreError::Transport(message));
        }

        self.state().update_page(page_id, update)?;
        debug!(page_id, "Stored page sections");
        Ok(())
    }
}
