// Status bar at the bottom of the app
// Notification or key hints on the left, interaction state on the right

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use study_core::DragPhase;
use unicode_width::UnicodeWidthStr;

use crate::ui::app::{App, Mode};
use crate::ui::notifications::NotificationLevel;
use crate::ui::theme;

/// Minimum width for the state column
const STATE_COLUMN_MIN_WIDTH: u16 = 14;

pub fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => concat!(
            "←/→ select  ⇧←/→ move  e expand  m drag  s select  r rename  ",
            "n open  w/o/l/X close  q quit"
        ),
        Mode::Dragging => "←/→ hover  Enter drop  b drop on background  Esc cancel",
        Mode::Selecting => "←/→ move  Space toggle  Enter group  Esc cancel",
        Mode::Renaming => "Enter save  Esc cancel  empty title resets",
    }
}

/// Right-hand label: selection count or drag phase.
pub fn state_label(app: &App) -> Option<String> {
    let selection = app.session.selection();
    if selection.is_active() {
        let target = if selection.target_group().is_some() {
            " → group"
        } else {
            ""
        };
        return Some(format!("{} selected{}", selection.selected().len(), target));
    }
    match app.session.drag_phase() {
        DragPhase::Idle => None,
        DragPhase::Dragging => Some("dragging".to_string()),
        DragPhase::HoverPending => Some("hold to group…".to_string()),
        DragPhase::GroupArmed => Some("drop to group".to_string()),
    }
}

pub fn render_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let state = state_label(app).map(|s| format!("{} ", s));
    let state_width = state
        .as_deref()
        .map_or(0, |s| (s.width() as u16 + 1).max(STATE_COLUMN_MIN_WIDTH));

    let chunks =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(state_width)]).split(area);

    let left = match app.current_notification() {
        Some(notification) => {
            let style = match notification.level {
                NotificationLevel::Info => theme::status_info(),
                NotificationLevel::Success => theme::status_success(),
                NotificationLevel::Warning => theme::status_warning(),
                NotificationLevel::Error => theme::status_error(),
            };
            Line::from(vec![
                Span::styled(format!(" {} ", notification.level.icon()), style),
                Span::styled(notification.message.clone(), style),
            ])
        }
        None => Line::from(Span::styled(format!(" {}", key_hints(app.mode())), theme::text_dim())),
    };
    let bar = Style::default().bg(theme::BG_STATUSBAR);
    f.render_widget(Paragraph::new(left).style(bar), chunks[0]);

    if let Some(state) = state {
        let style = match app.session.drag_phase() {
            DragPhase::GroupArmed => theme::status_success(),
            _ => theme::text_bold(),
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(state, style)))
                .alignment(ratatui::layout::Alignment::Right)
                .style(bar),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::{StudyConfig, TabRef};

    fn demo_app() -> App {
        App::new(&StudyConfig::default())
    }

    #[test]
    fn test_state_label_tracks_interactions() {
        let mut app = demo_app();
        assert_eq!(state_label(&app), None);

        app.session.start_drag(TabRef::TopLevel(0)).unwrap();
        assert_eq!(state_label(&app).as_deref(), Some("dragging"));
        app.session.cancel_drag();

        app.session.enter_selection_mode(Some(0)).unwrap();
        app.session.selection_click(2).unwrap();
        assert_eq!(state_label(&app).as_deref(), Some("2 selected"));
    }

    #[test]
    fn test_hints_follow_mode() {
        assert!(key_hints(Mode::Dragging).contains("Esc cancel"));
        assert!(key_hints(Mode::Normal).contains("q quit"));
    }
}
