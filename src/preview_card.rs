//! Read-only preview used in catalog listings.

use crate::assembler::{assemble, ProjectInput};
use crate::binding::ThemeBinding;
use crate::config::EditorConfig;
use crate::editor::EditorProps;
use crate::resolver::RegistryClosure;
use crate::sandbox::{MountSpec, PreviewSurface, SandboxSession, SyncOutcome};
use crate::theme::ThemeEngine;

/// A preview without editing, saving or undo. Starts rendering on mount.
pub struct PreviewCard<P: PreviewSurface> {
    props: EditorProps,
    registry: RegistryClosure,
    binding: ThemeBinding,
    session: SandboxSession<P>,
}

impl<P: PreviewSurface> PreviewCard<P> {
    pub fn new(
        engine: &ThemeEngine,
        config: &EditorConfig,
        surface: P,
        props: EditorProps,
        registry: RegistryClosure,
        dark: bool,
    ) -> Self {
        let binding = ThemeBinding::from_persisted(engine, props.stylesheet.as_deref(), dark).with_read_only(true);
        let session = SandboxSession::new(surface, config).with_autorun(true);
        let mut card = Self {
            props,
            registry,
            binding,
            session,
        };
        card.refresh(engine);
        card
    }

    pub fn session(&self) -> &SandboxSession<P> {
        &self.session
    }

    pub fn mount_spec(&self) -> MountSpec {
        self.session.mount_spec()
    }

    pub fn set_dark(&mut self, engine: &ThemeEngine, dark: bool) -> SyncOutcome {
        self.binding.set_dark(dark);
        self.refresh(engine)
    }

    /// Replaces the card's inputs, e.g. after the catalog entry changed.
    pub fn update(&mut self, engine: &ThemeEngine, props: EditorProps, registry: RegistryClosure) -> SyncOutcome {
        self.binding.observe_persisted(engine, props.stylesheet.as_deref());
        self.props = props;
        self.registry = registry;
        self.refresh(engine)
    }

    fn refresh(&mut self, engine: &ThemeEngine) -> SyncOutcome {
        let stylesheet = self
            .binding
            .effective_stylesheet(engine, self.props.stylesheet.as_deref());
        let project = assemble(
            engine,
            &ProjectInput {
                slug: &self.props.slug,
                component_source: &self.props.component_source,
                usage_source: &self.props.usage_source,
                stylesheet: stylesheet.as_deref(),
                dependencies: self.props.dependencies.as_ref(),
                registry: &self.registry,
                dark: self.binding.is_dark(),
            },
        );
        let key = self.binding.session_key(self.registry.sorted_ids());
        self.session.sync(key, project)
    }
}
