//! Theme selection for an open preview.
//!
//! The binding remembers which theme is selected and whether the user picked
//! it explicitly. Once a theme has been picked by hand it wins over the
//! stylesheet stored on the record for the rest of the editing session.

use crate::sandbox::{PreviewSurface, SandboxSession, SessionKey};
use crate::theme::{ThemeChoice, ThemeEngine};
use crate::vfs::STYLESHEET_PATH;

/// Theme state of one editor or preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeBinding {
    selected: ThemeChoice,
    manual: bool,
    dark: bool,
    read_only: bool,
}

impl ThemeBinding {
    /// Starts from whatever theme the persisted stylesheet was generated from.
    pub fn from_persisted(engine: &ThemeEngine, stylesheet: Option<&str>, dark: bool) -> Self {
        Self {
            selected: engine.detect(stylesheet.unwrap_or_default()),
            manual: false,
            dark,
            read_only: false,
        }
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn selected(&self) -> &ThemeChoice {
        &self.selected
    }

    /// True once the user picked a theme in this session.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Save affordances are hidden in read-only contexts; theme switching is not.
    pub fn save_enabled(&self) -> bool {
        !self.read_only
    }

    /// Stylesheet to assemble with: the selected theme when picked by hand,
    /// otherwise the persisted stylesheet (blank means the assembler default).
    pub fn effective_stylesheet(&self, engine: &ThemeEngine, persisted: Option<&str>) -> Option<String> {
        match (&self.selected, self.manual) {
            (ThemeChoice::Named(name), true) => Some(engine.render(name)),
            _ => persisted.map(str::to_string),
        }
    }

    /// Identity of the sandbox for the given resolved registry ids.
    pub fn session_key(&self, registry_ids: Vec<String>) -> SessionKey {
        SessionKey {
            theme: self.selected.as_str().to_string(),
            dark: self.dark,
            registry_ids,
        }
    }

    /// Applies a theme picked by the user.
    ///
    /// The rendered stylesheet is written into the live session right away.
    /// Returns the new session key when it differs from the running one, in
    /// which case the caller remounts the session.
    ///
    /// # Arguments
    /// * `engine` - Theme engine; unknown names fall back to its default theme
    /// * `session` - Live session receiving the stylesheet overwrite
    /// * `name` - Theme picked by the user
    pub fn select_theme<P: PreviewSurface>(
        &mut self,
        engine: &ThemeEngine,
        session: &mut SandboxSession<P>,
        name: &str,
    ) -> Option<SessionKey> {
        let theme = engine.resolve(name);
        self.selected = ThemeChoice::Named(theme.name.clone());
        self.manual = true;

        let css = engine.render(&theme.name);
        session.overwrite_file(STYLESHEET_PATH, &css);

        let registry_ids = session.key().map(|k| k.registry_ids.clone()).unwrap_or_default();
        let key = self.session_key(registry_ids);
        (session.key() != Some(&key)).then_some(key)
    }

    /// Switches colour mode. Returns true if it changed.
    pub fn set_dark(&mut self, dark: bool) -> bool {
        let changed = self.dark != dark;
        self.dark = dark;
        changed
    }

    /// Re-detects the theme after the persisted stylesheet changed upstream.
    /// A manual selection is kept.
    pub fn observe_persisted(&mut self, engine: &ThemeEngine, stylesheet: Option<&str>) {
        if !self.manual {
            self.selected = engine.detect(stylesheet.unwrap_or_default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, ProjectInput};
    use crate::config::EditorConfig;
    use crate::resolver::RegistryClosure;
    use crate::sandbox::HeadlessPreview;
    use crate::vfs::USAGE_PATH;

    fn mounted(engine: &ThemeEngine, binding: &ThemeBinding) -> SandboxSession<HeadlessPreview> {
        let registry = RegistryClosure::new();
        let css = binding.effective_stylesheet(engine, None);
        let project = assemble(
            engine,
            &ProjectInput {
                slug: "badge",
                component_source: "export function Badge() {}",
                usage_source: "export default () => null",
                stylesheet: css.as_deref(),
                dependencies: None,
                registry: &registry,
                dark: binding.is_dark(),
            },
        );
        let mut session = SandboxSession::new(HeadlessPreview::new(), &EditorConfig::default());
        session.sync(binding.session_key(Vec::new()), project);
        session
    }

    #[test]
    fn test_detects_initial_theme() {
        let engine = ThemeEngine::builtin();
        let css = engine.render("amber");
        let binding = ThemeBinding::from_persisted(&engine, Some(&css), false);
        assert_eq!(binding.selected().as_str(), "amber");
        assert!(!binding.is_manual());

        let binding = ThemeBinding::from_persisted(&engine, None, false);
        assert_eq!(binding.selected().as_str(), "default");

        let binding = ThemeBinding::from_persisted(&engine, Some(":root { --primary: red; }"), false);
        assert!(binding.selected().is_custom());
    }

    #[test]
    fn test_select_overwrites_stylesheet_and_changes_key() {
        let engine = ThemeEngine::builtin();
        let mut binding = ThemeBinding::from_persisted(&engine, None, false);
        let mut session = mounted(&engine, &binding);
        session.edit_file(USAGE_PATH, "export default () => <p/>");

        let key = binding.select_theme(&engine, &mut session, "rose").unwrap();
        assert_eq!(key.theme, "rose");
        assert!(binding.is_manual());
        assert_eq!(session.text(STYLESHEET_PATH), Some(engine.render("rose").as_str()));
        assert_eq!(session.text(USAGE_PATH), Some("export default () => <p/>"));
        assert_eq!(session.surface().mounts.len(), 1);
    }

    #[test]
    fn test_unknown_theme_selects_default() {
        let engine = ThemeEngine::builtin();
        let mut binding = ThemeBinding::from_persisted(&engine, Some(&engine.render("slate")), false);
        let mut session = mounted(&engine, &binding);
        let key = binding.select_theme(&engine, &mut session, "no-such-theme").unwrap();
        assert_eq!(key.theme, "default");
    }

    #[test]
    fn test_reselecting_same_theme_needs_no_remount() {
        let engine = ThemeEngine::builtin();
        let mut binding = ThemeBinding::from_persisted(&engine, None, false);
        let mut session = mounted(&engine, &binding);
        assert!(binding.select_theme(&engine, &mut session, "default").is_none());
    }

    #[test]
    fn test_manual_choice_beats_persisted_stylesheet() {
        let engine = ThemeEngine::builtin();
        let mut binding = ThemeBinding::from_persisted(&engine, None, false);
        let mut session = mounted(&engine, &binding);
        binding.select_theme(&engine, &mut session, "violet");

        let persisted = engine.render("mono");
        binding.observe_persisted(&engine, Some(&persisted));
        assert_eq!(binding.selected().as_str(), "violet");
        assert_eq!(
            binding.effective_stylesheet(&engine, Some(&persisted)),
            Some(engine.render("violet"))
        );
    }

    #[test]
    fn test_read_only_disables_saving_only() {
        let engine = ThemeEngine::builtin();
        let mut binding = ThemeBinding::from_persisted(&engine, None, false).with_read_only(true);
        assert!(!binding.save_enabled());
        let mut session = mounted(&engine, &binding);
        assert!(binding.select_theme(&engine, &mut session, "amber").is_some());
    }
}
