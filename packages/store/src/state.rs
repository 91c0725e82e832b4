use std::collections::HashMap;

use chrono::Utc;
use funnel_editor::StoreError;
use funnel_model::{new_id, slugify, Funnel, LayoutTree, NewPage, PageRecord, PageUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serializable dump of a store: funnels and pages in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub funnels: Vec<Funnel>,
    #[serde(default)]
    pub pages: Vec<PageRecord>,
}

// Store-level state, guarded by the store's lock
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    funnels: HashMap<String, Funnel>,
    pages: HashMap<String, PageRecord>,
    funnel_order: Vec<String>,
    page_order: Vec<String>,
    writes: HashMap<String, usize>,
}

impl StoreState {
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut state = Self::default();
        for funnel in snapshot.funnels {
            state.funnel_order.push(funnel.id.clone());
            state.funnels.insert(funnel.id.clone(), funnel);
        }
        for page in snapshot.pages {
            state.page_order.push(page.id.clone());
            state.pages.insert(page.id.clone(), page);
        }
        state
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            funnels: self
                .funnel_order
                .iter()
                .filter_map(|id| self.funnels.get(id).cloned())
                .collect(),
            pages: self
                .page_order
                .iter()
                .filter_map(|id| self.pages.get(id).cloned())
                .collect(),
        }
    }

    pub fn create_funnel(&mut self, name: &str, description: Option<String>) -> Funnel {
        let funnel = Funnel {
            id: new_id(),
            name: name.to_string(),
            description,
            pages: Vec::new(),
            published: false,
        };
        self.funnel_order.push(funnel.id.clone());
        self.funnels.insert(funnel.id.clone(), funnel.clone());
        funnel
    }

    pub fn funnel(&self, funnel_id: &str) -> Result<Funnel, StoreError> {
        self.funnels
            .get(funnel_id)
            .cloned()
            .ok_or_else(|| StoreError::funnel_not_found(funnel_id))
    }

    pub fn page(&self, page_id: &str) -> Result<PageRecord, StoreError> {
        self.pages
            .get(page_id)
            .cloned()
            .ok_or_else(|| StoreError::page_not_found(page_id))
    }

    pub fn list_pages(&self, funnel_id: &str) -> Result<Vec<PageRecord>, StoreError> {
        self.funnel(funnel_id)?;
        Ok(self
            .page_order
            .iter()
            .filter_map(|id| self.pages.get(id))
            .filter(|page| page.funnel_id == funnel_id)
            .cloned()
            .collect())
    }

    pub fn create_page(&mut self, page: NewPage) -> Result<PageRecord, StoreError> {
        let name = page.name.trim();
        if name.is_empty() {
            return Err(StoreError::Rejected("Page name cannot be empty".to_string()));
        }
        let funnel = self
            .funnels
            .get_mut(&page.funnel_id)
            .ok_or_else(|| StoreError::funnel_not_found(&page.funnel_id))?;

        let now = Utc::now();
        let record = PageRecord {
            id: new_id(),
            funnel_id: page.funnel_id.clone(),
            name: name.to_string(),
            slug: slugify(name),
            sections: Some(Value::Array(Vec::new())),
            elements: None,
            created_at: Some(now),
            updated_at: Some(now),
        };

        funnel.pages.push(record.id.clone());
        self.page_order.push(record.id.clone());
        self.pages.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Seed a record as-is (legacy or malformed layouts included). The page is
    /// appended to its funnel's page list when the funnel exists.
    pub fn insert_page(&mut self, record: PageRecord) {
        if let Some(funnel) = self.funnels.get_mut(&record.funnel_id) {
            if !funnel.pages.contains(&record.id) {
                funnel.pages.push(record.id.clone());
            }
        }
        if !self.pages.contains_key(&record.id) {
            self.page_order.push(record.id.clone());
        }
        self.pages.insert(record.id.clone(), record);
    }

    /// Write a page's sections. The legacy `elements` field is dropped: pages
    /// are only ever stored back in the sections format.
    pub fn update_page(&mut self, page_id: &str, update: PageUpdate) -> Result<(), StoreError> {
        let page = self
            .pages
            .get_mut(page_id)
            .ok_or_else(|| StoreError::page_not_found(page_id))?;

        let sections = serde_json::to_value(&update.sections)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        page.sections = Some(sections);
        page.elements = None;
        page.updated_at = Some(Utc::now());

        *self.writes.entry(page_id.to_string()).or_default() += 1;
        Ok(())
    }

    pub fn delete_page(&mut self, page_id: &str) -> Result<PageRecord, StoreError> {
        let record = self
            .pages
            .remove(page_id)
            .ok_or_else(|| StoreError::page_not_found(page_id))?;

        self.page_order.retain(|id| id != page_id);
        if let Some(funnel) = self.funnels.get_mut(&record.funnel_id) {
            funnel.pages.retain(|id| id != page_id);
        }
        Ok(record)
    }

    /// The stored sections of a page, parsed
    pub fn sections(&self, page_id: &str) -> Option<LayoutTree> {
        let value = self.pages.get(page_id)?.sections.clone()?;
        serde_json::from_value(value).ok()
    }

    pub fn writes(&self, page_id: &str) -> usize {
        self.writes.get(page_id).copied().unwrap_or(0)
    }

    pub fn total_writes(&self) -> usize {
        self.writes.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_page_derives_slug_and_links_funnel() {
        let mut state = StoreState::default();
        let funnel = state.create_funnel("Launch", None);

        let page = state
            .create_page(NewPage {
                funnel_id: funnel.id.clone(),
                name: "  Thank You Page ".to_string(),
            })
            .unwrap();

        assert_eq!(page.name, "Thank You Page");
        assert_eq!(page.slug, "thank-you-page");
        assert_eq!(state.funnel(&funnel.id).unwrap().pages, vec![page.id.clone()]);
        assert_eq!(state.sections(&page.id), Some(LayoutTree::new()));
    }

    #[test]
    fn test_create_page_rejections() {
        let mut state = StoreState::default();
        let funnel = state.create_funnel("Launch", None);

        let blank = state.create_page(NewPage {
            funnel_id: funnel.id,
            name: " ".to_string(),
        });
        assert!(matches!(blank, Err(StoreError::Rejected(_))));

        let orphan = state.create_page(NewPage {
            funnel_id: "nope".to_string(),
            name: "Home".to_string(),
        });
        assert_eq!(orphan, Err(StoreError::funnel_not_found("nope")));
    }

    #[test]
    fn test_update_drops_legacy_elements() {
        let mut state = StoreState::default();
        let funnel = state.create_funnel("Launch", None);
        state.insert_page(PageRecord {
            id: "old".to_string(),
            funnel_id: funnel.id.clone(),
            name: "Old".to_string(),
            slug: "old".to_string(),
            sections: None,
            elements: Some(serde_json::json!([{ "id": "a", "type": "text" }])),
            created_at: None,
            updated_at: None,
        });

        state
            .update_page("old", PageUpdate { sections: LayoutTree::new() })
            .unwrap();

        let page = state.page("old").unwrap();
        assert!(page.elements.is_none());
        assert_eq!(page.sections, Some(serde_json::json!([])));
        assert!(page.updated_at.is_some());
        assert_eq!(state.writes("old"), 1);
    }

    #[test]
    fn test_delete_page_unlinks_funnel() {
        let mut state = StoreState::default();
        let funnel = state.create_funnel("Launch", None);
        let page = state
            .create_page(NewPage {
                funnel_id: funnel.id.clone(),
                name: "Home".to_string(),
            })
            .unwrap();

        state.delete_page(&page.id).unwrap();
        assert!(state.funnel(&funnel.id).unwrap().pages.is_empty());
        assert!(state.list_pages(&funnel.id).unwrap().is_empty());
        assert_eq!(
            state.delete_page(&page.id),
            Err(StoreError::page_not_found(&page.id))
        );
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut state = StoreState::default();
        let funnel = state.create_funnel("Launch", Some("Spring".to_string()));
        for name in ["Home", "Offer", "Thanks"] {
            state
                .create_page(NewPage {
                    funnel_id: funnel.id.clone(),
                    name: name.to_string(),
                })
                .unwrap();
        }

        let snapshot = state.snapshot();
        let restored = StoreState::from_snapshot(snapshot.clone());
        let names: Vec<_> = restored
            .list_pages(&funnel.id)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Home", "Offer", "Thanks"]);
        assert_eq!(restored.snapshot(), snapshot);
    }
}
