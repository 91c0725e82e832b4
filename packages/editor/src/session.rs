//! # Editor Session
//!
//! The single point of mutation for one open page, plus save bookkeeping.
//!
//! - Every change goes through [`EditorSession::apply`]; an applied mutation
//!   marks the page dirty and restarts the autosave quiet period
//! - Saves run as spawned tasks and only update status when reaped; they never
//!   touch the working tree
//! - [`EditorSession::switch_page`] flushes the current page before loading the
//!   next, so edits can never be lost or written to the wrong page
//!
//! ## Driving autosave
//!
//! The session owns no timer task. The host awaits
//! [`EditorSession::next_autosave_deadline`] and calls
//! [`EditorSession::tick`], or simply awaits
//! [`EditorSession::wait_for_autosave`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use funnel_model::{Funnel, LayoutTree, NewPage, Page, PageRecord, PageSummary};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::autosave::AutosaveScheduler;
use crate::config::EditorConfig;
use crate::document::{PageDocument, SaveSnapshot};
use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationOutcome};
use crate::sink::{MutationSink, PageEditor};
use crate::store::{PageStore, StoreError};

/// User-visible save indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved { at: DateTime<Utc> },
    /// Transient; local edits are kept and the page stays dirty
    Failed { message: String },
}

/// A save running on the runtime
struct InFlightSave {
    snapshot_version: u64,
    page_id: String,
    handle: JoinHandle<Result<(), StoreError>>,
}

pub struct EditorSession<S: PageStore> {
    store: Arc<S>,
    config: EditorConfig,
    funnel: Funnel,
    pages: Vec<PageSummary>,
    editor: PageEditor,
    autosave: AutosaveScheduler<SaveSnapshot>,
    in_flight: Option<InFlightSave>,
    status: SaveStatus,
}

impl<S: PageStore> EditorSession<S> {
    /// Fetch the funnel and its pages, then open `page_id`
    pub async fn open(
        store: Arc<S>,
        config: EditorConfig,
        funnel_id: &str,
        page_id: &str,
    ) -> Result<Self, EditorError> {
        let funnel = store.get_funnel(funnel_id).await?;
        let records = store.list_pages(funnel_id).await?;
        let pages = ordered_summaries(&funnel, &records);

        let document = load_document(records, page_id)?;
        info!(funnel_id, page_id, "Opened editor session");

        Ok(Self {
            autosave: AutosaveScheduler::new(config.quiet_period()),
            store,
            config,
            funnel,
            pages,
            editor: PageEditor::new(document),
            in_flight: None,
            status: SaveStatus::Idle,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn funnel(&self) -> &Funnel {
        &self.funnel
    }

    /// The funnel's pages in funnel order
    pub fn pages(&self) -> &[PageSummary] {
        &self.pages
    }

    pub fn current_page(&self) -> &Page {
        self.editor.document().page()
    }

    pub fn document(&self) -> &PageDocument {
        self.editor.document()
    }

    pub fn working_tree(&self) -> &LayoutTree {
        self.editor.tree()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.document().is_dirty()
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// When the next autosave is due, if one is pending
    pub fn next_autosave_deadline(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    /// Reap a finished save and start one whose quiet period has elapsed.
    /// Failures are reported through [`Self::save_status`].
    pub async fn tick(&mut self) {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|save| save.handle.is_finished());
        if finished {
            let _ = self.reap().await;
        }
        self.start_due_save();
    }

    /// Wait for the in-flight save, if any
    pub async fn settle(&mut self) -> Result<(), EditorError> {
        if self.in_flight.is_some() {
            self.reap().await?;
        }
        Ok(())
    }

    /// Sleep through pending quiet periods until nothing is left to save
    pub async fn wait_for_autosave(&mut self) -> Result<(), EditorError> {
        loop {
            self.settle().await?;
            let Some(deadline) = self.autosave.next_deadline() else {
                return Ok(());
            };
            tokio::time::sleep_until(deadline).await;
            self.start_due_save();
        }
    }

    /// Manual save: skip the quiet period and wait for the write.
    /// Also retries a snapshot whose save failed.
    pub async fn save_now(&mut self) -> Result<(), EditorError> {
        // A failure here is superseded by the save below
        if let Err(e) = self.settle().await {
            debug!(error = %e, "Earlier save failed, retrying with latest snapshot");
        }

        if self.autosave.flush_now(Instant::now()) {
            self.start_due_save();
            self.settle().await?;
        }
        Ok(())
    }

    /// Flush the current page, then load another one. The switch is refused
    /// if the flush fails; the current page stays open and dirty.
    pub async fn switch_page(&mut self, page_id: &str) -> Result<(), EditorError> {
        if page_id == self.current_page().id {
            return Ok(());
        }

        if let Err(e) = self.save_now().await {
            warn!(from = %self.current_page().id, to = page_id, error = %e, "Flush failed, staying on page");
            return Err(e);
        }

        let records = self.refresh_pages().await?;
        let document = load_document(records, page_id)?;

        info!(from = %self.current_page().id, to = page_id, "Switched page");
        self.editor = PageEditor::new(document);
        self.autosave.reset();
        self.status = SaveStatus::Idle;
        Ok(())
    }

    /// Create a page in this funnel. Blank names are rejected before any
    /// request is made.
    pub async fn create_page(&mut self, name: &str) -> Result<PageSummary, EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::Validation("Page name cannot be empty".to_string()));
        }

        let record = self
            .store
            .create_page(NewPage {
                funnel_id: self.funnel.id.clone(),
                name: name.to_string(),
            })
            .await?;
        info!(page_id = %record.id, slug = %record.slug, "Created page");

        self.refresh_pages().await?;
        Ok(PageSummary {
            id: record.id,
            name: record.name,
            slug: record.slug,
        })
    }

    /// Re-fetch the funnel and its page list
    async fn refresh_pages(&mut self) -> Result<Vec<PageRecord>, EditorError> {
        self.funnel = self.store.get_funnel(&self.funnel.id).await?;
        let records = self.store.list_pages(&self.funnel.id).await?;
        self.pages = ordered_summaries(&self.funnel, &records);
        Ok(records)
    }

    fn start_due_save(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        let Some(snapshot) = self.autosave.poll(Instant::now()) else {
            return;
        };

        debug!(page_id = %snapshot.page_id, version = snapshot.version, "Saving page");
        let store = Arc::clone(&self.store);
        let page_id = snapshot.page_id.clone();
        let update = snapshot.to_update();
        let handle = tokio::spawn(async move { store.update_page(&page_id, update).await });

        self.in_flight = Some(InFlightSave {
            snapshot_version: snapshot.version,
            page_id: snapshot.page_id,
            handle,
        });
        self.status = SaveStatus::Saving;
    }

    async fn reap(&mut self) -> Result<(), StoreError> {
        let Some(save) = self.in_flight.take() else {
            return Ok(());
        };

        let result = match save.handle.await {
            Ok(result) => result,
            Err(e) => Err(StoreError::Transport(e.to_string())),
        };

        match result {
            Ok(()) => {
                self.autosave.complete();
                self.editor.document_mut().mark_saved(save.snapshot_version);
                self.status = SaveStatus::Saved { at: Utc::now() };
                info!(page_id = %save.page_id, version = save.snapshot_version, "Page saved");
                Ok(())
            }
            Err(e) => {
                self.autosave.fail();
                self.status = SaveStatus::Failed {
                    message: e.to_string(),
                };
                warn!(page_id = %save.page_id, error = %e, "Save failed");
                Err(e)
            }
        }
    }
}

impl<S: PageStore> MutationSink for EditorSession<S> {
    fn tree(&self) -> &LayoutTree {
        self.editor.tree()
    }

    fn apply(&mut self, mutation: Mutation) -> MutationOutcome {
        let outcome = self.editor.apply(mutation);
        if outcome.is_applied() {
            self.autosave
                .schedule(self.editor.document().snapshot(), Instant::now());
        }
        outcome
    }

    fn selected_element_id(&self) -> Option<&str> {
        self.editor.selected_element_id()
    }

    fn select(&mut self, element_id: Option<&str>) -> bool {
        self.editor.select(element_id)
    }
}

/// Summaries in funnel order; pages the funnel does not list go last
fn ordered_summaries(funnel: &Funnel, records: &[PageRecord]) -> Vec<PageSummary> {
    let summary = |record: &PageRecord| PageSummary {
        id: record.id.clone(),
        name: record.name.clone(),
        slug: record.slug.clone(),
    };

    let mut pages: Vec<PageSummary> = funnel
        .pages
        .iter()
        .filter_map(|id| records.iter().find(|r| &r.id == id))
        .map(summary)
        .collect();
    pages.extend(
        records
            .iter()
            .filter(|r| !funnel.pages.contains(&r.id))
            .map(summary),
    );
    pages
}

fn load_document(records: Vec<PageRecord>, page_id: &str) -> Result<PageDocument, EditorError> {
    let record = records
        .into_iter()
        .find(|r| r.id == page_id)
        .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;

    let loaded = record.into_loaded();
    if let Some(problem) = &loaded.needs_attention {
        warn!(page_id, %problem, "Stored layout unreadable, opening empty page");
    }
    if loaded.upgraded_from_legacy {
        info!(page_id, "Upgraded legacy page layout to sections");
    }
    Ok(PageDocument::from_loaded(loaded))
}
