//! Transitive resolution of registry dependencies.
//!
//! Components may import other catalog components by identifier. The resolver
//! walks those references breadth-first, one batched store lookup per round,
//! and returns every reachable component exactly once.

use crate::model::{ComponentRecord, DependencyMap};
use crate::store::ComponentStore;
use std::collections::HashSet;

/// Safety ceiling on breadth-first rounds, independent of the visited set.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// One resolved registry component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    /// Catalog identifier the component was requested by.
    pub id: String,
    pub source: String,
    pub dependencies: DependencyMap,
    pub registry_dependencies: Vec<String>,
}

impl ResolvedComponent {
    pub fn from_record(id: &str, record: &ComponentRecord) -> Self {
        Self {
            id: id.to_string(),
            source: record.source.clone(),
            dependencies: record.dependencies.clone().unwrap_or_default(),
            registry_dependencies: record.registry_ids().to_vec(),
        }
    }
}

/// Components reachable from a set of identifiers, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryClosure {
    entries: Vec<ResolvedComponent>,
}

impl RegistryClosure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry unless one with the same id is already present.
    pub fn insert(&mut self, entry: ResolvedComponent) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedComponent> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedComponent> {
        self.entries.iter()
    }

    /// Identifiers sorted, used as part of the sandbox identity.
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids
    }

    /// NPM dependencies of all entries merged in discovery order; later entries win.
    pub fn merged_dependencies(&self) -> DependencyMap {
        let mut merged = DependencyMap::new();
        for entry in &self.entries {
            merged.extend(entry.dependencies.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }
}

/// Breadth-first resolver over a [`ComponentStore`].
pub struct RegistryResolver<'a> {
    store: &'a dyn ComponentStore,
    max_rounds: usize,
}

impl<'a> RegistryResolver<'a> {
    pub fn new(store: &'a dyn ComponentStore) -> Self {
        Self {
            store,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Resolves `ids` and everything they reference.
    ///
    /// Never fails. Identifiers the store does not know are skipped, and a
    /// failing store lookup ends the traversal with whatever was resolved so far.
    pub fn resolve(&self, ids: &[String]) -> RegistryClosure {
        let mut closure = RegistryClosure::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: Vec<String> = Vec::new();
        for id in ids {
            if visited.insert(id.clone()) {
                frontier.push(id.clone());
            }
        }

        let mut round = 0;
        while !frontier.is_empty() {
            if round >= self.max_rounds {
                log::warn!(
                    "Registry resolution stopped after {} rounds with {} identifiers pending",
                    self.max_rounds,
                    frontier.len()
                );
                break;
            }
            round += 1;

            let found = match self.store.get_many(&frontier) {
                Ok(found) => found,
                Err(e) => {
                    log::warn!("Registry lookup failed: {}", e);
                    break;
                }
            };

            let mut next = Vec::new();
            for id in &frontier {
                let Some(record) = found.get(id) else {
                    log::warn!("Registry dependency '{}' not found, omitting it", id);
                    continue;
                };
                let entry = ResolvedComponent::from_record(id, record);
                for child in &entry.registry_dependencies {
                    if visited.insert(child.clone()) {
                        next.push(child.clone());
                    }
                }
                closure.insert(entry);
            }
            frontier = next;
        }

        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentId, ComponentPatch, NewComponent};
    use crate::store::{MemoryStore, StoreError, UserToken};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(slug: &str, registry: &[&str], deps: &[(&str, &str)]) -> ComponentRecord {
        NewComponent {
            name: slug.to_string(),
            catalog_id: Some(slug.to_string()),
            source: format!("// {}", slug),
            usage_source: String::new(),
            registry_dependencies: Some(registry.iter().map(|s| s.to_string()).collect()),
            dependencies: Some(deps.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()),
            is_public: true,
            ..Default::default()
        }
        .into_record(format!("id-{}", slug), None)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chain_is_resolved_in_rounds() {
        let store = MemoryStore::with_records([
            entry("a", &["b"], &[]),
            entry("b", &["c"], &[]),
            entry("c", &[], &[]),
        ]);
        let closure = RegistryResolver::new(&store).resolve(&ids(&["a"]));
        assert_eq!(closure.sorted_ids(), ids(&["a", "b", "c"]));
        assert_eq!(closure.get("c").unwrap().source, "// c");
    }

    #[test]
    fn test_cycle_terminates() {
        let store = MemoryStore::with_records([entry("a", &["b"], &[]), entry("b", &["a"], &[])]);
        let closure = RegistryResolver::new(&store).resolve(&ids(&["a"]));
        assert_eq!(closure.len(), 2);
        assert_eq!(closure.sorted_ids(), ids(&["a", "b"]));
    }

    #[test]
    fn test_dangling_reference_is_skipped() {
        let store = MemoryStore::with_records([entry("a", &["x"], &[])]);
        let closure = RegistryResolver::new(&store).resolve(&ids(&["a"]));
        assert_eq!(closure.sorted_ids(), ids(&["a"]));
    }

    #[test]
    fn test_round_limit_caps_depth() {
        let store = MemoryStore::with_records([
            entry("a", &["b"], &[]),
            entry("b", &["c"], &[]),
            entry("c", &[], &[]),
        ]);
        let closure = RegistryResolver::new(&store)
            .with_max_rounds(2)
            .resolve(&ids(&["a"]));
        assert_eq!(closure.sorted_ids(), ids(&["a", "b"]));
    }

    #[test]
    fn test_merged_dependencies_later_wins() {
        let store = MemoryStore::with_records([
            entry("a", &["b"], &[("x", "1"), ("y", "1")]),
            entry("b", &[], &[("x", "2")]),
        ]);
        let closure = RegistryResolver::new(&store).resolve(&ids(&["a"]));
        let merged = closure.merged_dependencies();
        assert_eq!(merged["x"], "2");
        assert_eq!(merged["y"], "1");
    }

    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    impl ComponentStore for CountingStore {
        fn get(&self, id: &str) -> Result<ComponentRecord, StoreError> {
            self.inner.get(id)
        }
        fn get_many(&self, catalog_ids: &[String]) -> Result<HashMap<String, ComponentRecord>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_many(catalog_ids)
        }
        fn update(&self, user: &UserToken, id: &str, patch: &ComponentPatch) -> Result<(), StoreError> {
            self.inner.update(user, id, patch)
        }
        fn create(&self, user: &UserToken, component: NewComponent) -> Result<ComponentId, StoreError> {
            self.inner.create(user, component)
        }
        fn soft_delete(&self, user: &UserToken, id: &str, now_ms: u64) -> Result<(), StoreError> {
            self.inner.soft_delete(user, id, now_ms)
        }
        fn restore(&self, user: &UserToken, id: &str) -> Result<(), StoreError> {
            self.inner.restore(user, id)
        }
        fn list_trash(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError> {
            self.inner.list_trash(user)
        }
        fn list_catalog(&self) -> Result<Vec<ComponentRecord>, StoreError> {
            self.inner.list_catalog()
        }
        fn list_owned(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError> {
            self.inner.list_owned(user)
        }
    }

    #[test]
    fn test_one_lookup_per_round() {
        let store = CountingStore {
            inner: MemoryStore::with_records([
                entry("a", &["b", "c"], &[]),
                entry("b", &["c"], &[]),
                entry("c", &[], &[]),
            ]),
            calls: AtomicUsize::new(0),
        };
        let closure = RegistryResolver::new(&store).resolve(&ids(&["a"]));
        assert_eq!(closure.len(), 3);
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_input_does_not_query() {
        let store = CountingStore {
            inner: MemoryStore::new(),
            calls: AtomicUsize::new(0),
        };
        assert!(RegistryResolver::new(&store).resolve(&[]).is_empty());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }
}
