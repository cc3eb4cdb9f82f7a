//! The component currently open in the studio.

use crate::state::EguiPreview;
use uiforge::ComponentEditor;

pub type StudioEditor = ComponentEditor<EguiPreview>;

/// Owns the open editor, if any. Replacing it closes the previous one.
#[derive(Default)]
pub struct EditorState {
    editor: Option<StudioEditor>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&StudioEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut StudioEditor> {
        self.editor.as_mut()
    }

    /// Record id of the open component.
    pub fn component_id(&self) -> Option<&str> {
        self.editor.as_ref()?.props().component_id.as_deref()
    }

    pub fn open(&mut self, editor: StudioEditor) {
        self.close();
        self.editor = Some(editor);
    }

    /// Closes the open editor, stopping its timers and unmounting the preview.
    pub fn close(&mut self) {
        if let Some(mut editor) = self.editor.take() {
            editor.close();
        }
    }
}
