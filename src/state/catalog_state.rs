//! Catalog browsing state.
//!
//! Holds the last listings fetched from the store (catalog, own components,
//! trash), the filter text and the publish form. Listings are refreshed explicitly by the
//! coordinator; nothing here talks to the store.

use uiforge::catalog::PublishRequest;
use uiforge::ComponentRecord;

#[derive(Debug, Default)]
pub struct CatalogState {
    entries: Vec<ComponentRecord>,
    owned: Vec<ComponentRecord>,
    trash: Vec<ComponentRecord>,
    filter: String,
    publish: PublishRequest,
    publish_open: bool,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Catalog Queries =====

    pub fn entries(&self) -> &[ComponentRecord] {
        &self.entries
    }

    /// Entries whose name, slug or category contains the filter text, ignoring case.
    pub fn filtered(&self) -> impl Iterator<Item = &ComponentRecord> {
        let needle = self.filter.trim().to_lowercase();
        self.entries.iter().filter(move |record| {
            needle.is_empty()
                || record.name.to_lowercase().contains(&needle)
                || record.slug().contains(&needle)
                || record
                    .category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
    }

    /// The signed-in user's own components.
    pub fn owned(&self) -> &[ComponentRecord] {
        &self.owned
    }

    pub fn trash(&self) -> &[ComponentRecord] {
        &self.trash
    }

    pub fn filter_mut(&mut self) -> &mut String {
        &mut self.filter
    }

    pub fn publish_open(&self) -> bool {
        self.publish_open
    }

    pub fn publish_request(&self) -> &PublishRequest {
        &self.publish
    }

    pub fn publish_request_mut(&mut self) -> &mut PublishRequest {
        &mut self.publish
    }

    // ===== Catalog Mutations =====

    pub fn set_entries(&mut self, entries: Vec<ComponentRecord>) {
        self.entries = entries;
    }

    pub fn set_owned(&mut self, owned: Vec<ComponentRecord>) {
        self.owned = owned;
    }

    pub fn set_trash(&mut self, trash: Vec<ComponentRecord>) {
        self.trash = trash;
    }

    /// Opens the publish form prefilled from the component being edited.
    pub fn open_publish(&mut self, name: &str, description: &str) {
        self.publish = PublishRequest {
            name: name.to_string(),
            description: description.to_string(),
            category: self.publish.category.clone(),
        };
        self.publish_open = true;
    }

    pub fn close_publish(&mut self) {
        self.publish_open = false;
    }
}
