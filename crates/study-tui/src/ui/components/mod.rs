pub mod statusbar;
pub mod study_pane;
pub mod tab_bar;

pub use statusbar::render_statusbar;
pub use study_pane::render_study_pane;
pub use tab_bar::render_tab_bar;
