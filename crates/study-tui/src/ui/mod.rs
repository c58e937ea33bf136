pub mod app;
pub mod catalogue;
pub mod components;
pub mod notifications;
pub mod terminal;
pub mod theme;

pub use app::{App, InputMode, Mode};
pub use terminal::{init as init_terminal, restore as restore_terminal, Tui};
