use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use study_core::{TabEntry, TabRef};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::app::{App, TabHit};
use crate::ui::theme;

const ELLIPSIS: &str = "…";
const SEPARATOR: &str = " ";

/// Truncate string to fit within a display width, adding an ellipsis when truncated.
/// Returns (truncated_string, actual_display_width).
pub fn truncate_to_width(s: &str, max_width: usize) -> (String, usize) {
    if max_width == 0 {
        return (String::new(), 0);
    }

    let current_width = s.width();
    if current_width <= max_width {
        return (s.to_string(), current_width);
    }

    // Build truncated string char by char, tracking display width
    let mut result = String::new();
    let mut width = 0;
    let target_width = max_width - ELLIPSIS.width();

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width > target_width {
            break;
        }
        result.push(c);
        width += char_width;
    }

    result.push_str(ELLIPSIS);
    let width = result.width();
    (result, width)
}

/// One visible tab with its label and style for this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TabSlot {
    pub tab: TabRef,
    pub label: String,
    pub style: Style,
}

/// Lays out the visible tabs in order: top-level entries, with the expanded
/// group's sub-tabs right after it.
pub fn build_slots(app: &App) -> Vec<TabSlot> {
    let session = &app.session;
    let ws = session.workspace();
    let selection = session.selection();
    let drag = session.drag_state();
    let active = app.active_tab_ref();

    ws.visible_refs()
        .into_iter()
        .filter_map(|tab| {
            let raw_title = session.tab_title(tab)?;
            let (title, _) = truncate_to_width(&raw_title, app.max_title_width);

            let label = match tab {
                TabRef::TopLevel(index) => match ws.get(index)? {
                    TabEntry::Study(_) if selection.is_selected(index) => format!("[✓ {}]", title),
                    TabEntry::Study(_) => format!("[{}]", title),
                    TabEntry::Group(group) if ws.is_expanded(group) => format!("[{} ▾]", title),
                    TabEntry::Group(group) => format!("[{} ▸ {}]", title, group.len()),
                },
                TabRef::SubTab { .. } => format!("‹{}›", title),
            };

            let style = if drag.and_then(|d| d.grouping_target()) == Some(tab) {
                theme::tab_armed()
            } else if drag.and_then(|d| d.hover_target()) == Some(tab) || app.cursor == Some(tab) {
                theme::tab_hover()
            } else if drag.map(|d| d.source()) == Some(tab) {
                theme::tab_drag_source()
            } else if selection.target_group().map(TabRef::TopLevel) == Some(tab) {
                theme::tab_target()
            } else if matches!(tab, TabRef::TopLevel(i) if selection.is_selected(i)) {
                theme::tab_selected()
            } else if active == Some(tab) {
                theme::tab_active()
            } else if tab.is_sub_tab() {
                theme::tab_sub()
            } else if matches!(ws.get(tab.top_index()), Some(TabEntry::Group(_))) {
                theme::tab_group()
            } else {
                theme::tab_inactive()
            };

            Some(TabSlot { tab, label, style })
        })
        .collect()
}

/// Renders the tab row and records where each tab landed for mouse hit-testing.
pub fn render_tab_bar(f: &mut Frame, app: &mut App, area: Rect) {
    let slots = build_slots(app);
    let mut spans: Vec<Span> = Vec::with_capacity(slots.len() * 2);
    let mut hits = Vec::with_capacity(slots.len());
    let mut x = area.x;

    for (i, slot) in slots.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(SEPARATOR));
            x = x.saturating_add(SEPARATOR.width() as u16);
        }
        let width = slot.label.width() as u16;
        if x < area.right() {
            hits.push(TabHit {
                tab: slot.tab,
                x,
                width: width.min(area.right() - x),
            });
        }
        x = x.saturating_add(width);
        spans.push(Span::styled(slot.label, slot.style));
    }

    if spans.is_empty() {
        spans.push(Span::styled("No open studies. Press n to open one.", theme::text_dim()));
    }

    app.tab_bar_row = Some(area.y);
    app.tab_hits = hits;
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
