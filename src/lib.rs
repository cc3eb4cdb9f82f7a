pub mod model;
pub mod vfs;
pub mod theme;
pub mod templates;
pub mod assembler;
pub mod resolver;
pub mod store;
pub mod sandbox;
pub mod reconciler;
pub mod binding;
pub mod editor;
pub mod preview_card;
pub mod catalog;
pub mod validate;
pub mod config;

// Export data model
pub use model::{ComponentId, ComponentPatch, ComponentRecord, DependencyMap, NewComponent};

// Export virtual project types
pub use vfs::{FileSnapshot, VirtualFile, VirtualFileSet};

// Export theme support
pub use theme::{ThemeChoice, ThemeDefinition, ThemeEngine, ThemeError, ThemeSwatch};

// Export assembly and resolution
pub use assembler::{assemble, AssembledProject, ProjectInput};
pub use resolver::{RegistryClosure, RegistryResolver, ResolvedComponent};

// Export collaborators
pub use store::{
    ComponentStore, FileStore, IdentityProvider, MemoryStore, StaticIdentity, StoreError, UserToken,
};

// Export live preview and editing
pub use sandbox::{HeadlessPreview, MountSpec, PreviewSurface, SandboxSession, SessionKey, SyncOutcome};
pub use reconciler::{Reconciler, SaveError, SaveRequest, SaveStatus};
pub use binding::ThemeBinding;
pub use editor::{execute_save, ComponentEditor, EditorProps, PendingSave};
pub use preview_card::PreviewCard;

// Export configuration
pub use config::{ConfigError, EditorConfig};
