use anyhow::Result;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use uiforge::reconciler::SAVE_FAILED_MESSAGE;
use uiforge::vfs::{ENTRY_PATH, STYLESHEET_PATH, USAGE_PATH};
use uiforge::{
    assemble, execute_save, ComponentEditor, ComponentId, ComponentPatch, ComponentRecord, ComponentStore,
    DependencyMap, EditorConfig, EditorProps, FileStore, HeadlessPreview, MemoryStore, NewComponent,
    PreviewCard, ProjectInput, RegistryClosure, RegistryResolver, SaveStatus, StoreError, ThemeChoice,
    ThemeEngine, UserToken,
};

// ===== Fixtures =====

fn entry(id: &str, slug: &str, registry: &[&str], deps: &[(&str, &str)]) -> ComponentRecord {
    NewComponent {
        name: slug.to_string(),
        catalog_id: Some(slug.to_string()),
        source: format!("export function C_{}() {{ return null }}", slug.replace('-', "_")),
        usage_source: "export default () => null".to_string(),
        dependencies: (!deps.is_empty()).then(|| deps_map(deps)),
        registry_dependencies: Some(registry.iter().map(|s| s.to_string()).collect()),
        is_public: true,
        ..Default::default()
    }
    .into_record(id.to_string(), None)
}

fn deps_map(pairs: &[(&str, &str)]) -> DependencyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn own_component(registry: &[&str]) -> ComponentRecord {
    NewComponent {
        name: "Login Form".to_string(),
        catalog_id: Some("login-form".to_string()),
        source: "export function LoginForm() { return <form/> }".to_string(),
        usage_source: "export default function Preview() { return <LoginForm/> }".to_string(),
        registry_dependencies: Some(registry.iter().map(|s| s.to_string()).collect()),
        ..Default::default()
    }
    .into_record("mine".to_string(), Some("alice".to_string()))
}

fn user() -> Option<UserToken> {
    Some(UserToken::new("alice"))
}

fn open(store: &dyn ComponentStore, id: &str) -> ComponentEditor<HeadlessPreview> {
    let record = store.get(id).unwrap();
    ComponentEditor::open(
        ThemeEngine::builtin(),
        EditorConfig::default(),
        HeadlessPreview::new(),
        EditorProps::from_record(&record),
        store,
        false,
    )
}

/// Wraps a store, counting updates and optionally failing them.
struct ScriptedStore {
    inner: MemoryStore,
    updates: AtomicUsize,
    fail_updates: bool,
}

impl ScriptedStore {
    fn new(inner: MemoryStore, fail_updates: bool) -> Self {
        Self {
            inner,
            updates: AtomicUsize::new(0),
            fail_updates,
        }
    }
}

impl ComponentStore for ScriptedStore {
    fn get(&self, id: &str) -> Result<ComponentRecord, StoreError> {
        self.inner.get(id)
    }
    fn get_many(&self, catalog_ids: &[String]) -> Result<HashMap<String, ComponentRecord>, StoreError> {
        self.inner.get_many(catalog_ids)
    }
    fn update(&self, user: &UserToken, id: &str, patch: &ComponentPatch) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates {
            return Err(StoreError::Backend("connection reset".to_string()));
        }
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

// ===== Theme Engine =====

#[test]
fn test_every_theme_is_detected_from_its_own_stylesheet() {
    let engine = ThemeEngine::builtin();
    for name in engine.names() {
        let css = engine.render(name);
        assert_eq!(engine.detect(&css), ThemeChoice::Named(name.to_string()), "theme {}", name);
    }
}

#[test]
fn test_hand_written_stylesheet_is_custom() {
    let engine = ThemeEngine::builtin();
    let css = ":root { --background: 120 40% 10%; --primary: 300 90% 50%; --secondary: 10 10% 10%; }";
    assert_eq!(engine.detect(css), ThemeChoice::Custom);
}

#[test]
fn test_unknown_theme_renders_default() {
    let engine = ThemeEngine::builtin();
    assert_eq!(engine.render("does-not-exist"), engine.render(engine.default_theme()));
}

// ===== Assembler and resolver =====

#[test]
fn test_assembly_is_idempotent() {
    let engine = ThemeEngine::builtin();
    let store = MemoryStore::with_records([entry("1", "button", &[], &[]), own_component(&["button"])]);
    let record = store.get("mine").unwrap();
    let registry = RegistryResolver::new(&store).resolve(record.registry_ids());

    let first = assemble(&engine, &ProjectInput::from_record(&record, &registry, true));
    let second = assemble(&engine, &ProjectInput::from_record(&record, &registry, true));
    assert_eq!(first, second);
    assert!(first.files.contains("/components/ui/button.tsx"));
    assert!(first.files.get(ENTRY_PATH).unwrap().hidden);
}

#[test]
fn test_cyclic_registry_dependencies_resolve_once() {
    let store = MemoryStore::with_records([entry("1", "a", &["b"], &[]), entry("2", "b", &["a"], &[])]);
    let closure = RegistryResolver::new(&store).resolve(&["a".to_string()]);
    assert_eq!(closure.sorted_ids(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_dangling_registry_reference_is_omitted() {
    let store = MemoryStore::with_records([entry("1", "a", &["ghost"], &[])]);
    let closure = RegistryResolver::new(&store).resolve(&["a".to_string()]);
    assert_eq!(closure.len(), 1);
    assert!(!closure.contains("ghost"));
}

#[test]
fn test_own_dependencies_win_over_registry_and_baseline() {
    let engine = ThemeEngine::builtin();
    let store = MemoryStore::with_records([entry(
        "1",
        "chart",
        &[],
        &[("recharts", "2.12.0"), ("clsx", "2.0.0")],
    )]);
    let registry = RegistryResolver::new(&store).resolve(&["chart".to_string()]);
    let own = deps_map(&[("recharts", "2.13.0")]);
    let project = assemble(
        &engine,
        &ProjectInput {
            slug: "dashboard",
            component_source: "export function Dashboard() {}",
            usage_source: "export default () => null",
            stylesheet: None,
            dependencies: Some(&own),
            registry: &registry,
            dark: false,
        },
    );

    assert_eq!(project.dependencies["recharts"], "2.13.0");
    assert_eq!(project.dependencies["clsx"], "2.0.0");
    assert_eq!(project.dependencies["tailwind-merge"], "latest");
}

// ===== Editor and reconciler =====

#[test]
fn test_dirty_follows_visible_files_only() {
    let store = MemoryStore::with_records([own_component(&[])]);
    let mut editor = open(&store, "mine");
    assert!(!editor.has_unsaved_changes());

    let original = editor.session().text(USAGE_PATH).unwrap().to_string();
    editor.edit(USAGE_PATH, "export default () => <p/>");
    assert!(editor.has_unsaved_changes());
    editor.edit(USAGE_PATH, &original);
    assert!(!editor.has_unsaved_changes());

    // Hidden support files are never part of the comparison.
    editor.session_mut().overwrite_file(ENTRY_PATH, "// replaced");
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn test_only_one_save_is_in_flight() {
    let store = ScriptedStore::new(MemoryStore::with_records([own_component(&[])]), false);
    let mut editor = open(&store, "mine");
    let now = Instant::now();

    editor.edit(USAGE_PATH, "export default () => <p>1</p>");
    let first = editor.save(user(), now).expect("first save starts");
    editor.edit(USAGE_PATH, "export default () => <p>2</p>");
    assert!(editor.save(user(), now).is_none());
    assert!(editor.tick(user(), now + Duration::from_secs(60)).is_none());

    let result = execute_save(&store, &first);
    assert!(editor.complete_save(first.request.ticket, result, now));
    assert_eq!(store.updates.load(Ordering::SeqCst), 1);
    // The second edit landed after the snapshot was taken.
    assert!(editor.has_unsaved_changes());
}

#[test]
fn test_failed_save_keeps_edits() {
    let store = ScriptedStore::new(MemoryStore::with_records([own_component(&[])]), true);
    let mut editor = open(&store, "mine");
    editor.edit(USAGE_PATH, "export default () => <kept/>");

    let status = editor.save_now(&store, user(), Instant::now());
    assert_eq!(status, SaveStatus::Error);
    assert_eq!(editor.status_message(), Some(SAVE_FAILED_MESSAGE));
    assert_eq!(editor.session().text(USAGE_PATH), Some("export default () => <kept/>"));
    assert!(editor.has_unsaved_changes());
}

#[test]
fn test_autosave_then_saved_indicator_clears() {
    let store = ScriptedStore::new(MemoryStore::with_records([own_component(&[])]), false);
    let mut editor = open(&store, "mine");
    let t0 = Instant::now();

    assert!(editor.tick(user(), t0).is_none());
    editor.edit(USAGE_PATH, "export default () => <autosaved/>");
    assert!(editor.tick(user(), t0 + Duration::from_secs(29)).is_none());

    let t30 = t0 + Duration::from_secs(30);
    let pending = editor.tick(user(), t30).expect("auto-save fires");
    assert_eq!(editor.status(), SaveStatus::Saving);
    let result = execute_save(&store, &pending);
    editor.complete_save(pending.request.ticket, result, t30);
    assert_eq!(editor.status(), SaveStatus::Saved);

    editor.tick(user(), t30 + Duration::from_secs(1));
    assert_eq!(editor.status(), SaveStatus::Saved);
    editor.tick(user(), t30 + Duration::from_secs(2));
    assert_eq!(editor.status(), SaveStatus::Idle);

    assert_eq!(store.updates.load(Ordering::SeqCst), 1);
    assert_eq!(store.get("mine").unwrap().usage_source, "export default () => <autosaved/>");
}

#[test]
fn test_theme_switch_keeps_edits_and_saves_stylesheet() {
    let store = MemoryStore::with_records([own_component(&[])]);
    let mut editor = open(&store, "mine");
    editor.edit(USAGE_PATH, "export default () => <b/>");
    editor.select_theme("violet");

    assert_eq!(editor.theme(), &ThemeChoice::Named("violet".to_string()));
    assert_eq!(editor.session().text(USAGE_PATH), Some("export default () => <b/>"));
    assert_eq!(editor.save_now(&store, user(), Instant::now()), SaveStatus::Saved);

    let stored = store.get("mine").unwrap();
    let engine = ThemeEngine::builtin();
    assert_eq!(engine.detect(stored.stylesheet.as_deref().unwrap()), ThemeChoice::Named("violet".to_string()));
}

// ===== Persistence and export =====

#[test]
fn test_file_store_backs_the_editor() -> Result<()> {
    let dir = env::temp_dir().join("uiforge_it_file_store");
    let _ = fs::remove_dir_all(&dir);
    let store = FileStore::open(&dir)?;
    store.put(&entry("cat-button", "button", &[], &[("lucide-react", "0.400.0")]))?;
    store.put(&own_component(&["button"]))?;

    let mut editor = open(&store, "mine");
    assert!(editor.registry().contains("button"));
    editor.edit(USAGE_PATH, "export default () => <saved-to-disk/>");
    assert_eq!(editor.save_now(&store, user(), Instant::now()), SaveStatus::Saved);

    let reopened = FileStore::open(&dir)?;
    assert_eq!(reopened.get("mine")?.usage_source, "export default () => <saved-to-disk/>");

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_preview_card_export_writes_manifest() -> Result<()> {
    let dir = env::temp_dir().join("uiforge_it_export");
    let _ = fs::remove_dir_all(&dir);

    let engine = ThemeEngine::builtin();
    let record = own_component(&[]);
    let card = PreviewCard::new(
        &engine,
        &EditorConfig::default(),
        HeadlessPreview::new(),
        EditorProps::from_record(&record),
        RegistryClosure::new(),
        true,
    );
    let spec = card.mount_spec();
    spec.export(&dir)?;

    let usage = fs::read_to_string(dir.join("Preview.tsx"))?;
    assert_eq!(usage, record.usage_source);
    let css = fs::read_to_string(dir.join(STYLESHEET_PATH.trim_start_matches('/')))?;
    assert!(css.contains(".dark"));

    let manifest: serde_json::Value = serde_json::from_str(&fs::read_to_string(dir.join("sandbox.json"))?)?;
    assert_eq!(manifest["activeFile"], USAGE_PATH);
    let hidden: Vec<&str> = manifest["hiddenFiles"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    assert!(hidden.contains(&ENTRY_PATH));
    assert!(spec.autorun);

    fs::remove_dir_all(&dir)?;
    Ok(())
}
