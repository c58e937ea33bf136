use std::time::Instant;

use study_core::{
    ActiveTab, DragPhase, DropAction, GroupId, StudyConfig, StudyItem, StudySession, TabEntry,
    TabRef, Workspace, WorkspaceResult,
};

use crate::ui::catalogue::{demo_studies, DEMO_SEED_COUNT};
use crate::ui::notifications::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a new title for a group
    Renaming,
}

/// What the key handler should treat as the current interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Renaming,
    Dragging,
    Selecting,
}

/// Screen columns one visible tab occupied in the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabHit {
    pub tab: TabRef,
    pub x: u16,
    pub width: u16,
}

/// A mouse press on a tab that may turn into a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPress {
    pub tab: TabRef,
    pub column: u16,
}

pub struct App {
    pub running: bool,
    pub session: StudySession,
    pub input_mode: InputMode,
    pub input: String,
    rename_target: Option<GroupId>,
    pub max_title_width: usize,

    /// Keyboard cursor while dragging or selecting
    pub cursor: Option<TabRef>,
    pub pointer: Option<PointerPress>,

    /// Hit regions recorded by the tab bar, for mouse hit-testing
    pub tab_bar_row: Option<u16>,
    pub tab_hits: Vec<TabHit>,

    notification: Option<Notification>,
    catalogue: Vec<StudyItem>,
    next_catalogue: usize,
}

impl App {
    pub fn new(config: &StudyConfig) -> Self {
        let catalogue = demo_studies();
        let (workspace, next_catalogue) = if config.seed_demo_studies {
            let seeded = DEMO_SEED_COUNT.min(catalogue.len());
            (
                Workspace::with_studies(catalogue.iter().take(seeded).cloned()),
                seeded,
            )
        } else {
            (Workspace::new(), 0)
        };

        Self {
            running: true,
            session: StudySession::new(config).with_workspace(workspace),
            input_mode: InputMode::Normal,
            input: String::new(),
            rename_target: None,
            max_title_width: config.max_title_width,
            cursor: None,
            pointer: None,
            tab_bar_row: None,
            tab_hits: Vec::new(),
            notification: None,
            catalogue,
            next_catalogue,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn mode(&self) -> Mode {
        if self.input_mode == InputMode::Renaming {
            Mode::Renaming
        } else if self.session.selection().is_active() {
            Mode::Selecting
        } else if self.session.drag_phase() != DragPhase::Idle {
            Mode::Dragging
        } else {
            Mode::Normal
        }
    }

    // --- Notifications ---

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn current_notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Surfaces a failed operation. These are stale-index bugs, never user errors.
    pub fn report<T>(&mut self, result: WorkspaceResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "workspace operation failed");
                self.notify(Notification::error(e.to_string()));
                None
            }
        }
    }

    /// Called on every runtime tick.
    pub fn tick(&mut self, now: Instant) {
        if self.session.poll_hover(now) {
            tracing::debug!("hover timer elapsed");
        }
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
        }
    }

    // --- Queries ---

    /// The active tab as the tab bar shows it: a sub-tab only when its group is expanded.
    pub fn active_tab_ref(&self) -> Option<TabRef> {
        let ws = self.session.workspace();
        let ActiveTab { top, sub } = ws.active()?;
        match (ws.get(top)?, sub) {
            (TabEntry::Group(group), Some(sub)) if ws.is_expanded(group) => {
                Some(TabRef::SubTab { group: top, sub })
            }
            _ => Some(TabRef::TopLevel(top)),
        }
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<TabRef> {
        if self.tab_bar_row != Some(row) {
            return None;
        }
        self.tab_hits
            .iter()
            .find(|hit| column >= hit.x && column < hit.x + hit.width)
            .map(|hit| hit.tab)
    }

    /// Next (or previous) visible slot after `from`, wrapping. Starts at the
    /// first slot when `from` is not visible.
    fn step_slot(
        &self,
        from: Option<TabRef>,
        forward: bool,
        top_level_only: bool,
    ) -> Option<TabRef> {
        let slots: Vec<TabRef> = self
            .session
            .workspace()
            .visible_refs()
            .into_iter()
            .filter(|slot| !(top_level_only && slot.is_sub_tab()))
            .collect();
        if slots.is_empty() {
            return None;
        }
        let Some(current) = from.and_then(|f| slots.iter().position(|s| *s == f)) else {
            return slots.first().copied();
        };
        let next = if forward {
            (current + 1) % slots.len()
        } else {
            (current + slots.len() - 1) % slots.len()
        };
        Some(slots[next])
    }

    // --- Normal mode actions ---

    pub fn select_next(&mut self) {
        self.session.select_next();
    }

    pub fn select_prev(&mut self) {
        self.session.select_prev();
    }

    pub fn activate(&mut self, tab: TabRef) {
        let result = match tab {
            TabRef::TopLevel(index) => {
                let ws = self.session.workspace();
                let already_active = ws.active_top_index() == Some(index);
                let is_group = ws.get(index).is_some_and(TabEntry::is_group);
                if is_group {
                    if already_active {
                        self.session.toggle_group_expanded(index).map(|_| ())
                    } else {
                        self.session.set_active(index, None)
                    }
                } else {
                    self.session.set_active(index, None)
                }
            }
            TabRef::SubTab { group, sub } => self.session.set_active(group, Some(sub)),
        };
        self.report(result);
    }

    /// Moves the active tab one slot left or right, inside its group when
    /// the active tab is a visible sub-tab.
    pub fn move_active(&mut self, forward: bool) {
        let Some(tab) = self.active_tab_ref() else {
            return;
        };
        let ws = self.session.workspace();
        let result = match tab {
            TabRef::TopLevel(index) => match neighbour(index, ws.len(), forward) {
                Some(to) => self.session.reorder_top_level(index, to),
                None => return,
            },
            TabRef::SubTab { group, sub } => {
                let len = ws.get(group).map_or(0, TabEntry::item_count);
                match neighbour(sub, len, forward) {
                    Some(to) => self.session.reorder_within_group(group, sub, to),
                    None => return,
                }
            }
        };
        self.report(result);
    }

    pub fn close_active(&mut self) {
        let Some(tab) = self.active_tab_ref() else {
            return;
        };
        let result = match tab {
            TabRef::TopLevel(index) => self.session.close_item(index, None),
            TabRef::SubTab { group, sub } => self.session.close_item(group, Some(sub)),
        };
        self.report(result);
    }

    pub fn close_others(&mut self) {
        let Some(tab) = self.active_tab_ref() else {
            return;
        };
        let result = match tab {
            TabRef::TopLevel(index) => self.session.close_others(index, None),
            TabRef::SubTab { group, sub } => self.session.close_others(group, Some(sub)),
        };
        self.report(result);
    }

    pub fn close_to_right(&mut self) {
        if let Some(top) = self.session.workspace().active_top_index() {
            let result = self.session.close_to_right(top);
            self.report(result);
        }
    }

    pub fn close_all(&mut self) {
        self.session.close_all();
        self.cursor = None;
    }

    pub fn toggle_expand_active(&mut self) {
        let Some(top) = self.session.workspace().active_top_index() else {
            return;
        };
        if self.session.workspace().get(top).is_some_and(TabEntry::is_group) {
            let result = self.session.toggle_group_expanded(top);
            self.report(result);
        }
    }

    /// Opens the next catalogue study, or focuses it if already open.
    pub fn open_next_study(&mut self) {
        if self.catalogue.is_empty() {
            return;
        }
        let item = self.catalogue[self.next_catalogue % self.catalogue.len()].clone();
        self.next_catalogue = (self.next_catalogue + 1) % self.catalogue.len();
        let title = self.session.title(&item);
        let opened = self.session.open_study(item);
        if self.report(opened).is_some() {
            self.notify(Notification::info(format!("Opened {}", title)));
        }
    }

    // --- Drag and drop ---

    pub fn begin_keyboard_drag(&mut self) {
        let Some(source) = self.active_tab_ref() else {
            return;
        };
        let started = self.session.start_drag(source);
        if self.report(started) == Some(true) {
            self.cursor = Some(source);
        }
    }

    pub fn move_drag_cursor(&mut self, forward: bool, now: Instant) {
        self.cursor = self.step_slot(self.cursor, forward, false);
        self.session.update_hover_target(self.cursor, now);
    }

    pub fn drop_at_cursor(&mut self) {
        let target = self.cursor;
        self.finish_drop(target);
    }

    pub fn drop_on_background(&mut self) {
        self.finish_drop(None);
    }

    pub fn cancel_drag(&mut self) {
        self.session.cancel_drag();
        self.cursor = None;
    }

    fn finish_drop(&mut self, target: Option<TabRef>) {
        let resolved = self.session.resolve_drop(target);
        self.cursor = None;
        self.pointer = None;
        match self.report(resolved).flatten() {
            Some(DropAction::CreateGroup { .. }) => {
                self.notify(Notification::success("Created group"))
            }
            Some(DropAction::AddToGroup { .. }) => {
                self.notify(Notification::success("Added to group"))
            }
            Some(DropAction::MoveOut { .. }) => {
                self.notify(Notification::info("Moved out of group"))
            }
            _ => {}
        }
    }

    // --- Mouse ---

    pub fn pointer_down(&mut self, column: u16, row: u16) {
        let Some(tab) = self.hit_test(column, row) else {
            self.pointer = None;
            return;
        };
        if self.session.selection().is_active() {
            if let TabRef::TopLevel(index) = tab {
                let clicked = self.session.selection_click(index);
                self.report(clicked);
            }
            return;
        }
        self.pointer = Some(PointerPress { tab, column });
    }

    pub fn pointer_drag(&mut self, column: u16, row: u16, now: Instant) {
        let Some(press) = self.pointer else {
            return;
        };
        if self.session.drag_state().is_none() {
            if column == press.column {
                return;
            }
            let started = self.session.start_drag(press.tab);
            if self.report(started) != Some(true) {
                self.pointer = None;
                return;
            }
        }
        let target = self.hit_test(column, row);
        self.session.update_hover_target(target, now);
    }

    /// Ends a press: a drop when a drag started, otherwise a click.
    pub fn pointer_up(&mut self, column: u16, row: u16) {
        let Some(press) = self.pointer.take() else {
            return;
        };
        let target = self.hit_test(column, row);
        if self.session.drag_state().is_some() {
            self.finish_drop(target);
        } else if target == Some(press.tab) {
            self.activate(press.tab);
        }
    }

    // --- Selection mode ---

    pub fn begin_selection(&mut self) {
        let seed = self.session.workspace().active_top_index();
        let entered = self.session.enter_selection_mode(seed);
        if self.report(entered).is_some() {
            self.cursor = seed.map(TabRef::TopLevel);
        }
    }

    pub fn move_selection_cursor(&mut self, forward: bool) {
        self.cursor = self.step_slot(self.cursor, forward, true);
    }

    pub fn selection_click_cursor(&mut self) {
        if let Some(TabRef::TopLevel(index)) = self.cursor {
            let clicked = self.session.selection_click(index);
            self.report(clicked);
        }
    }

    pub fn confirm_selection(&mut self) {
        let count = self.session.selection().selected().len();
        let confirmed = self.session.confirm_selection();
        match self.report(confirmed) {
            Some(Some(_)) => {
                self.cursor = None;
                self.notify(Notification::success(format!("Grouped {} studies", count)));
            }
            Some(None) => self.notify(Notification::warning(
                "Select two tabs, or one tab and a target group",
            )),
            None => {}
        }
    }

    pub fn cancel_selection(&mut self) {
        self.session.cancel_selection_mode();
        self.cursor = None;
    }

    // --- Rename ---

    pub fn begin_rename(&mut self) {
        let ws = self.session.workspace();
        let Some(top) = ws.active_top_index() else {
            return;
        };
        let Some(group) = ws.get(top).and_then(TabEntry::as_group) else {
            self.notify(Notification::warning("Only groups can be renamed"));
            return;
        };
        self.input = group.custom_title().unwrap_or_default().to_string();
        self.rename_target = Some(group.id());
        self.input_mode = InputMode::Renaming;
    }

    /// Renames the group the rename started on, wherever it sits now.
    pub fn commit_rename(&mut self) {
        let title = std::mem::take(&mut self.input);
        self.input_mode = InputMode::Normal;
        let Some(id) = self.rename_target.take() else {
            return;
        };
        match self.session.workspace().group_index(id) {
            Some(index) => {
                let renamed = self.session.rename_group(index, Some(&title));
                self.report(renamed);
            }
            None => {
                tracing::debug!(group = %id, "rename target closed");
                self.notify(Notification::warning("That group is no longer open"));
            }
        }
    }

    pub fn abort_rename(&mut self) {
        self.rename_target = None;
        self.input.clear();
        self.input_mode = InputMode::Normal;
    }
}

fn neighbour(index: usize, len: usize, forward: bool) -> Option<usize> {
    if forward {
        (index + 1 < len).then_some(index + 1)
    } else {
        index.checked_sub(1)
    }
}
