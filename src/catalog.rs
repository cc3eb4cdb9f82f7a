//! Forking catalog entries into user copies and publishing copies back.

use crate::model::{ComponentId, NewComponent};
use crate::store::{ComponentStore, StoreError, UserToken};

/// Lowercases and turns every run of characters outside `[a-z0-9]` into `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_run = false;
        } else if !in_run {
            slug.push('-');
            in_run = true;
        }
    }
    slug
}

/// Copies a catalog entry into a new record owned by `user`.
///
/// The copy keeps the entry's catalog id so its file path inside the preview
/// stays the same.
pub fn fork_component(
    store: &dyn ComponentStore,
    user: Option<&UserToken>,
    catalog_record_id: &str,
) -> Result<ComponentId, StoreError> {
    let user = user.ok_or(StoreError::Unauthenticated)?;
    let origin = store.get(catalog_record_id)?;
    let copy = NewComponent {
        name: origin.name.clone(),
        description: origin.description.clone(),
        catalog_id: origin.catalog_id.clone(),
        source: origin.source.clone(),
        usage_source: origin.usage_source.clone(),
        stylesheet: origin.stylesheet.clone(),
        dependencies: origin.dependencies.clone(),
        registry_dependencies: origin.registry_dependencies.clone(),
        category: origin.category.clone(),
        is_public: false,
    };
    let id = store.create(user, copy)?;
    log::info!("Forked '{}' into {}", origin.name, id);
    Ok(id)
}

/// Metadata entered when publishing.
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub name: String,
    pub description: String,
    pub category: String,
}

/// Publishes a user component as a new catalog entry and returns its slug.
///
/// When the slug is taken, `-<now_ms>` is appended.
pub fn publish_component(
    store: &dyn ComponentStore,
    user: Option<&UserToken>,
    user_component_id: &str,
    request: &PublishRequest,
    now_ms: u64,
) -> Result<String, StoreError> {
    let user = user.ok_or(StoreError::Unauthenticated)?;
    let component = store.get(user_component_id)?;

    let base = slugify(&request.name);
    let taken = !store.get_many(std::slice::from_ref(&base))?.is_empty();
    let slug = if taken { format!("{}-{}", base, now_ms) } else { base };

    let entry = NewComponent {
        name: request.name.clone(),
        description: request.description.clone(),
        catalog_id: Some(slug.clone()),
        source: component.source,
        usage_source: component.usage_source,
        stylesheet: component.stylesheet,
        dependencies: component.dependencies,
        registry_dependencies: component.registry_dependencies,
        category: Some(request.category.clone()),
        is_public: true,
    };
    store.create(user, entry)?;
    log::info!("Published '{}' as {}", request.name, slug);
    Ok(slug)
}
