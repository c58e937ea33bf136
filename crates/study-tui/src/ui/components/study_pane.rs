use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use study_core::TabEntry;

use crate::ui::app::{App, Mode};
use crate::ui::theme;

/// The active study: title, mode and identity key. With rename open it
/// shows the edit line instead of the key.
pub fn render_study_pane(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let ws = session.workspace();
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme::border_inactive());

    let mut lines: Vec<Line> = Vec::new();
    match ws.active_item() {
        Some(item) => {
            if let Some(group) = ws
                .active_top_index()
                .and_then(|i| ws.get(i))
                .and_then(TabEntry::as_group)
            {
                let title = ws
                    .active_top_index()
                    .and_then(|i| session.entry_title(i))
                    .unwrap_or_default();
                let position = ws.active_sub_index().map_or(0, |s| s + 1);
                lines.push(Line::from(Span::styled(
                    format!("{} · {} of {}", title, position, group.len()),
                    theme::tab_group(),
                )));
            }
            lines.push(Line::from(Span::styled(session.title(item), theme::text_bold())));
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", item.mode().label()), theme::status_info()),
                Span::styled(session.key(item), theme::text_muted()),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "Nothing open.",
            theme::text_muted(),
        ))),
    }

    if app.mode() == Mode::Renaming {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Group title: ", theme::text_muted()),
            Span::styled(format!("{}▏", app.input), theme::text_primary()),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("{} tabs, {} studies open", ws.len(), ws.item_count()),
        theme::text_dim(),
    )));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
