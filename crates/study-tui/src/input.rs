use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::ui::{App, Mode};

pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode() {
        Mode::Renaming => handle_rename_key(app, key),
        Mode::Dragging => handle_drag_key(app, key, now),
        Mode::Selecting => handle_selection_key(app, key),
        Mode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Left if shift => app.move_active(false),
        KeyCode::Right if shift => app.move_active(true),
        KeyCode::Left => app.select_prev(),
        KeyCode::Right => app.select_next(),
        KeyCode::Char('e') | KeyCode::Enter => app.toggle_expand_active(),
        KeyCode::Char('w') => app.close_active(),
        KeyCode::Char('o') => app.close_others(),
        KeyCode::Char('l') => app.close_to_right(),
        KeyCode::Char('X') => app.close_all(),
        KeyCode::Char('m') => app.begin_keyboard_drag(),
        KeyCode::Char('s') => app.begin_selection(),
        KeyCode::Char('r') => app.begin_rename(),
        KeyCode::Char('n') => app.open_next_study(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_drag_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Left => app.move_drag_cursor(false, now),
        KeyCode::Right => app.move_drag_cursor(true, now),
        KeyCode::Enter => app.drop_at_cursor(),
        KeyCode::Char('b') => app.drop_on_background(),
        KeyCode::Esc => app.cancel_drag(),
        _ => {}
    }
}

fn handle_selection_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.move_selection_cursor(false),
        KeyCode::Right => app.move_selection_cursor(true),
        KeyCode::Char(' ') => app.selection_click_cursor(),
        KeyCode::Enter => app.confirm_selection(),
        KeyCode::Esc => app.cancel_selection(),
        _ => {}
    }
}

fn handle_rename_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_rename(),
        KeyCode::Esc => app.abort_rename(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    if app.mode() == Mode::Renaming {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.pointer_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.pointer_drag(mouse.column, mouse.row, now),
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(mouse.column, mouse.row),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::TabHit;
    use std::time::Duration;
    use study_core::{DragPhase, StudyConfig, StudyItem, TabEntry, TabRef};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, codes: &[KeyCode], now: Instant) {
        for code in codes {
            handle_key(app, key(*code), now);
        }
    }

    fn app_with(names: &[&str]) -> App {
        let config = StudyConfig {
            seed_demo_studies: false,
            ..StudyConfig::default()
        };
        let mut app = App::new(&config);
        for name in names {
            app.session.open_study(StudyItem::topic(*name)).unwrap();
        }
        app.session.set_active(0, None).unwrap();
        app
    }

    fn titles(app: &App) -> Vec<String> {
        (0..app.session.workspace().len())
            .filter_map(|i| app.session.entry_title(i))
            .collect()
    }

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Fake hit regions: tab i spans columns [10 * i, 10 * i + 8).
    fn lay_out(app: &mut App) {
        app.tab_bar_row = Some(0);
        app.tab_hits = app
            .session
            .workspace()
            .visible_refs()
            .into_iter()
            .enumerate()
            .map(|(i, tab)| TabHit {
                tab,
                x: i as u16 * 10,
                width: 8,
            })
            .collect();
    }

    #[test]
    fn test_keyboard_drag_with_hold_groups() {
        let mut app = app_with(&["A", "B", "C"]);
        let t0 = Instant::now();
        press(&mut app, &[KeyCode::Char('m'), KeyCode::Right], t0);
        assert_eq!(app.session.drag_phase(), DragPhase::HoverPending);

        app.tick(t0 + Duration::from_millis(500));
        assert_eq!(app.session.drag_phase(), DragPhase::GroupArmed);
        press(&mut app, &[KeyCode::Enter], t0);

        assert_eq!(titles(&app), vec!["A + B", "C"]);
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn test_keyboard_drag_without_hold_reorders() {
        let mut app = app_with(&["A", "B", "C"]);
        let t0 = Instant::now();
        press(
            &mut app,
            &[KeyCode::Char('m'), KeyCode::Right, KeyCode::Right, KeyCode::Enter],
            t0,
        );
        assert_eq!(titles(&app), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut app = app_with(&["A", "B"]);
        let t0 = Instant::now();
        press(&mut app, &[KeyCode::Char('m'), KeyCode::Right, KeyCode::Esc], t0);
        assert_eq!(app.session.drag_phase(), DragPhase::Idle);
        app.tick(t0 + Duration::from_secs(1));
        assert_eq!(app.session.drag_phase(), DragPhase::Idle);
        assert_eq!(titles(&app), vec!["A", "B"]);
    }

    #[test]
    fn test_selection_keys_group_tabs() {
        let mut app = app_with(&["A", "B", "C"]);
        let now = Instant::now();
        press(
            &mut app,
            &[
                KeyCode::Char('s'),
                KeyCode::Right,
                KeyCode::Right,
                KeyCode::Char(' '),
                KeyCode::Enter,
            ],
            now,
        );
        assert_eq!(titles(&app), vec!["A + C", "B"]);
        assert!(!app.session.selection().is_active());
    }

    #[test]
    fn test_rename_group() {
        let mut app = app_with(&["A", "B"]);
        let now = Instant::now();
        press(
            &mut app,
            &[KeyCode::Char('s'), KeyCode::Right, KeyCode::Char(' '), KeyCode::Enter],
            now,
        );
        press(&mut app, &[KeyCode::Char('r')], now);
        assert_eq!(app.mode(), Mode::Renaming);
        // Keys type instead of acting while renaming
        press(
            &mut app,
            &[KeyCode::Char('q'), KeyCode::Backspace, KeyCode::Char('G'), KeyCode::Char('o')],
            now,
        );
        press(&mut app, &[KeyCode::Enter], now);
        assert!(app.running);
        assert_eq!(titles(&app), vec!["Go"]);

        press(&mut app, &[KeyCode::Char('r')], now);
        assert_eq!(app.input, "Go");
        press(&mut app, &[KeyCode::Backspace, KeyCode::Backspace, KeyCode::Enter], now);
        assert_eq!(titles(&app), vec!["A + B"]);
    }

    /// `[[A,B], C, [D,E]]`, built through selection mode.
    fn two_groups() -> App {
        let mut app = app_with(&["A", "B", "C", "D", "E"]);
        let now = Instant::now();
        let group_with_next = [
            KeyCode::Char('s'),
            KeyCode::Right,
            KeyCode::Char(' '),
            KeyCode::Enter,
        ];
        press(&mut app, &group_with_next, now);
        app.session.set_active(2, None).unwrap();
        press(&mut app, &group_with_next, now);
        app.session.set_active(0, None).unwrap();
        assert_eq!(titles(&app), vec!["A + B", "C", "D + E"]);
        app
    }

    #[test]
    fn test_mouse_is_ignored_while_renaming() {
        let mut app = two_groups();
        let now = Instant::now();
        press(&mut app, &[KeyCode::Char('r')], now);
        lay_out(&mut app);

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 20), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 0), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 0), now);
        assert_eq!(app.mode(), Mode::Renaming);
        assert_eq!(app.session.drag_phase(), DragPhase::Idle);
        assert_eq!(titles(&app), vec!["A + B", "C", "D + E"]);

        press(&mut app, &[KeyCode::Char('X'), KeyCode::Enter], now);
        assert_eq!(titles(&app), vec!["X", "C", "D + E"]);
    }

    #[test]
    fn test_rename_follows_group_after_reorder() {
        let mut app = two_groups();
        let now = Instant::now();
        press(&mut app, &[KeyCode::Char('r'), KeyCode::Char('X')], now);
        app.session.reorder_top_level(0, 2).unwrap();
        assert_eq!(titles(&app), vec!["C", "D + E", "A + B"]);

        press(&mut app, &[KeyCode::Enter], now);
        assert_eq!(titles(&app), vec!["C", "D + E", "X"]);
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn test_rename_of_closed_group_changes_nothing() {
        let mut app = two_groups();
        let now = Instant::now();
        press(&mut app, &[KeyCode::Char('r'), KeyCode::Char('X')], now);
        app.session.close_item(0, None).unwrap();

        press(&mut app, &[KeyCode::Enter], now);
        assert_eq!(titles(&app), vec!["C", "D + E"]);
        assert_eq!(app.mode(), Mode::Normal);
        assert!(app.input.is_empty());
        assert!(app.current_notification().is_some());
    }

    #[test]
    fn test_close_keys() {
        let mut app = app_with(&["A", "B", "C", "D"]);
        let now = Instant::now();
        press(&mut app, &[KeyCode::Right, KeyCode::Char('w')], now);
        assert_eq!(titles(&app), vec!["A", "C", "D"]);
        assert_eq!(app.session.workspace().active_top_index(), Some(1));

        press(&mut app, &[KeyCode::Char('l')], now);
        assert_eq!(titles(&app), vec!["A", "C"]);
        press(&mut app, &[KeyCode::Char('o')], now);
        assert_eq!(titles(&app), vec!["C"]);
        press(&mut app, &[KeyCode::Char('X')], now);
        assert!(app.session.workspace().is_empty());
    }

    #[test]
    fn test_shift_arrows_reorder() {
        let mut app = app_with(&["A", "B", "C"]);
        let shift_right = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        handle_key(&mut app, shift_right, Instant::now());
        assert_eq!(titles(&app), vec!["B", "A", "C"]);
        assert_eq!(app.session.workspace().active_top_index(), Some(1));
    }

    #[test]
    fn test_open_next_focuses_duplicates() {
        let mut app = App::new(&StudyConfig::default());
        let seeded = app.session.workspace().len();
        press(&mut app, &[KeyCode::Char('n')], Instant::now());
        assert_eq!(app.session.workspace().len(), seeded + 1);
        assert_eq!(app.session.workspace().active_top_index(), Some(seeded));
    }

    #[test]
    fn test_ctrl_c_quits_in_any_mode() {
        let mut app = app_with(&["A", "B"]);
        press(&mut app, &[KeyCode::Char('s')], Instant::now());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        handle_key(&mut app, ctrl_c, Instant::now());
        assert!(!app.running);
    }

    #[test]
    fn test_mouse_drag_hold_and_release_groups() {
        let mut app = app_with(&["A", "B", "C"]);
        lay_out(&mut app);
        let t0 = Instant::now();

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 2), t0);
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 12), t0);
        assert_eq!(app.session.drag_phase(), DragPhase::HoverPending);
        app.tick(t0 + Duration::from_millis(600));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 12), t0);

        assert_eq!(titles(&app), vec!["A + B", "C"]);
        assert!(matches!(app.session.workspace().get(0), Some(TabEntry::Group(_))));
    }

    #[test]
    fn test_mouse_release_off_bar_moves_sub_tab_out() {
        let mut app = app_with(&["A", "B", "C"]);
        let now = Instant::now();
        press(
            &mut app,
            &[KeyCode::Char('s'), KeyCode::Right, KeyCode::Char(' '), KeyCode::Enter],
            now,
        );
        press(&mut app, &[KeyCode::Char('e')], now);
        lay_out(&mut app);
        // Slots: [A + B ▾] ‹A› ‹B› [C]
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 21), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 25), now);
        assert_eq!(
            app.session.drag_state().map(|d| d.source()),
            Some(TabRef::SubTab { group: 0, sub: 1 })
        );
        let mut release = mouse(MouseEventKind::Up(MouseButton::Left), 5);
        release.row = 9;
        handle_mouse(&mut app, release, now);

        assert_eq!(titles(&app), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_click_activates_tab() {
        let mut app = app_with(&["A", "B", "C"]);
        lay_out(&mut app);
        let now = Instant::now();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 23), now);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 23), now);
        assert_eq!(app.session.workspace().active_top_index(), Some(2));
    }
}
