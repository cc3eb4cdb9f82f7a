//! uiforge-assemble
//!
//! Builds the virtual project of one component and writes it to a directory
//! (files plus a `sandbox.json` manifest) for use with an external bundler.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uiforge::{
    ComponentEditor, ComponentRecord, ComponentStore, EditorConfig, EditorProps, FileStore, HeadlessPreview,
    MemoryStore, MountSpec, PreviewCard, RegistryResolver, ThemeEngine,
};

struct Config {
    record_file: Option<PathBuf>,
    record_id: Option<String>,
    store_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
    theme: Option<String>,
    dark: bool,
    output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record_file: None,
            record_id: None,
            store_dir: None,
            config_file: None,
            theme: None,
            dark: false,
            output_dir: PathBuf::from("sandbox"),
        }
    }
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-record" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-record requires a file path argument");
                }
                config.record_file = Some(PathBuf::from(&args[i]));
            }
            "-id" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-id requires a component id");
                }
                config.record_id = Some(args[i].clone());
            }
            "-store" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-store requires a directory argument");
                }
                config.store_dir = Some(PathBuf::from(&args[i]));
            }
            "-config" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-config requires a file path argument");
                }
                config.config_file = Some(PathBuf::from(&args[i]));
            }
            "-theme" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-theme requires a theme name");
                }
                config.theme = Some(args[i].clone());
            }
            "-dark" => {
                config.dark = true;
            }
            "-out" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-out requires a directory argument");
                }
                config.output_dir = PathBuf::from(&args[i]);
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                anyhow::bail!("unknown argument: {} (see -help)", other);
            }
        }
        i += 1;
    }

    if config.record_file.is_none() && config.record_id.is_none() {
        anyhow::bail!("one of -record or -id is required");
    }
    if config.record_id.is_some() && config.store_dir.is_none() {
        anyhow::bail!("-id requires -store");
    }

    Ok(config)
}

fn print_help() {
    println!("uiforge project assembler");
    println!("Usage: uiforge-assemble (-record <FILE> | -id <ID>) [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -record <FILE>         Component record as JSON");
    println!("  -id <ID>               Component id to load from -store");
    println!("  -store <DIR>           File store used for registry dependencies");
    println!("  -config <FILE>         Editor configuration (JSON)");
    println!("  -theme <NAME>          Apply a theme before exporting");
    println!("  -dark                  Assemble in dark mode");
    println!("  -out <DIR>             Output directory (default: sandbox)");
    println!("  -h, -help, --help      Show this help message");
}

fn load_record(config: &Config, store: &dyn ComponentStore) -> Result<ComponentRecord> {
    if let Some(path) = &config.record_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()));
    }
    let id = config
        .record_id
        .as_deref()
        .context("no component given")?;
    Ok(store.get(id)?)
}

/// Without a theme the project is built exactly as stored, through the
/// read-only card. A theme override goes through the editor, which owns theme
/// switching.
fn build_mount(
    engine: &ThemeEngine,
    editor_config: &EditorConfig,
    store: &dyn ComponentStore,
    record: &ComponentRecord,
    config: &Config,
) -> MountSpec {
    let props = EditorProps::from_record(record);
    match &config.theme {
        None => {
            let registry = RegistryResolver::new(store)
                .with_max_rounds(editor_config.max_resolve_rounds)
                .resolve(&props.registry_dependency_ids);
            PreviewCard::new(engine, editor_config, HeadlessPreview::new(), props, registry, config.dark).mount_spec()
        }
        Some(theme) => {
            let mut editor = ComponentEditor::open(
                engine.clone(),
                editor_config.clone(),
                HeadlessPreview::new(),
                props,
                store,
                config.dark,
            );
            editor.select_theme(theme);
            let spec = editor.session().mount_spec();
            editor.close();
            spec
        }
    }
}

fn write_mount(spec: &MountSpec, dir: &Path) -> Result<()> {
    spec.export(dir)
        .with_context(|| format!("writing project to {}", dir.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args()?;
    let editor_config = match &config.config_file {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let engine = ThemeEngine::builtin()
        .with_match_threshold(editor_config.theme_match_threshold)
        .with_default_theme(&editor_config.default_theme);

    let store: Box<dyn ComponentStore> = match &config.store_dir {
        Some(dir) => Box::new(FileStore::open(dir)?),
        None => Box::new(MemoryStore::new()),
    };

    let started = Instant::now();
    let record = load_record(&config, store.as_ref())?;
    if let Some(css) = record.stylesheet.as_deref() {
        log::info!("Stored stylesheet matches theme '{}'", engine.detect(css).as_str());
    }

    let spec = build_mount(&engine, &editor_config, store.as_ref(), &record, &config);
    write_mount(&spec, &config.output_dir)?;

    println!(
        "Wrote {} files ({} visible) for '{}' to {} in {:?}",
        spec.files.len(),
        spec.visible_files.len(),
        record.name,
        config.output_dir.display(),
        started.elapsed()
    );

    Ok(())
}
