pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod models;
pub mod selection;
pub mod session;
pub mod title;
pub mod tracing_setup;
pub mod workspace;

pub use config::{ConfigError, ConfigStorage, StudyConfig};
pub use drag::{DragController, DragPhase, DragState, DropAction, HoverTicket};
pub use error::{WorkspaceError, WorkspaceResult};
pub use models::{Group, GroupId, StudyItem, StudyMode, StudyParams, TabEntry, TabRef};
pub use selection::SelectionMode;
pub use session::StudySession;
pub use title::{StandardTitles, TitleProvider};
pub use workspace::{ActiveTab, Workspace};
