use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::ui;
use crate::ui::components::{render_statusbar, render_study_pane, render_tab_bar};
use crate::ui::App;

const TAB_BAR_HEIGHT: u16 = 1;
const STATUSBAR_HEIGHT: u16 = 1;

pub fn render(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(ui::theme::BG_APP));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::vertical([
        Constraint::Length(TAB_BAR_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(STATUSBAR_HEIGHT),
    ])
    .split(f.area());

    render_tab_bar(f, app, chunks[0]);
    render_study_pane(f, app, chunks[1]);
    render_statusbar(f, app, chunks[2]);
}
