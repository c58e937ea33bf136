//! The object a presentation layer talks to.
//!
//! `StudySession` bundles the workspace with the transient drag and
//! selection state and the title collaborator. It also owns the interaction
//! rules that span components:
//!
//! - `InvalidOperation` results (a drop after a cancel, confirming an
//!   ineligible selection) are logged and turned into no-ops.
//! - Out-of-range errors are passed through untouched.
//! - A structural change (close, reorder, group) ends any live drag and
//!   leaves selection mode, since both hold indices into the old layout.
//! - Entering selection mode cancels a drag, and a drag cannot start while
//!   selecting.

use std::time::Instant;

use crate::config::StudyConfig;
use crate::drag::{DragController, DragPhase, DragState, DropAction, HoverTicket};
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::models::{GroupId, StudyItem, TabEntry, TabRef};
use crate::selection::SelectionMode;
use crate::title::{group_title, StandardTitles, TitleProvider};
use crate::workspace::{ActiveTab, Workspace};

pub struct StudySession {
    workspace: Workspace,
    drag: DragController,
    selection: SelectionMode,
    titles: Box<dyn TitleProvider>,
    locale: String,
}

impl StudySession {
    pub fn new(config: &StudyConfig) -> Self {
        Self {
            workspace: Workspace::new(),
            drag: DragController::new(config.hover_group_delay()),
            selection: SelectionMode::new(),
            titles: Box::new(StandardTitles),
            locale: config.locale.clone(),
        }
    }

    pub fn with_titles(mut self, titles: impl TitleProvider + 'static) -> Self {
        self.titles = Box::new(titles);
        self
    }

    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self.drag.cancel();
        self.selection.cancel();
        self
    }

    // --- Read access ---

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.state()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn hover_deadline(&self) -> Option<Instant> {
        self.drag.hover_deadline()
    }

    pub fn selection(&self) -> &SelectionMode {
        &self.selection
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn title(&self, item: &StudyItem) -> String {
        self.titles.title(item, &self.locale)
    }

    pub fn key(&self, item: &StudyItem) -> String {
        self.titles.key(item, &self.locale)
    }

    /// Display title of a top-level entry: the study title, or the group title.
    pub fn entry_title(&self, index: usize) -> Option<String> {
        match self.workspace.get(index)? {
            TabEntry::Study(item) => Some(self.title(item)),
            TabEntry::Group(group) => Some(group_title(group, self.titles.as_ref(), &self.locale)),
        }
    }

    pub fn tab_title(&self, tab: TabRef) -> Option<String> {
        match tab {
            TabRef::TopLevel(index) => self.entry_title(index),
            TabRef::SubTab { .. } => self.workspace.item_at(tab).map(|item| self.title(item)),
        }
    }

    // --- Opening and navigation ---

    /// Focuses the open study with the same key as `item`, expanding its
    /// group if needed, or opens `item` as a new tab.
    pub fn open_study(&mut self, item: StudyItem) -> WorkspaceResult<ActiveTab> {
        let key = self.key(&item);
        let titles = self.titles.as_ref();
        let locale = self.locale.as_str();
        let existing = self
            .workspace
            .position_of(|open| titles.key(open, locale) == key);

        let Some(position) = existing else {
            let top = self.workspace.push_study(item);
            tracing::debug!(top, %key, "opened study");
            return Ok(ActiveTab::study(top));
        };
        if let Some(TabEntry::Group(group)) = self.workspace.get(position.top) {
            let id = group.id();
            self.workspace.set_expanded_group(Some(id))?;
        }
        self.workspace.set_active(position.top, position.sub)?;
        tracing::debug!(?position, %key, "focused already open study");
        Ok(position)
    }

    pub fn set_active(&mut self, top: usize, sub: Option<usize>) -> WorkspaceResult<()> {
        self.workspace.set_active(top, sub)
    }

    pub fn select_next(&mut self) {
        self.workspace.select_next();
    }

    pub fn select_prev(&mut self) {
        self.workspace.select_prev();
    }

    pub fn set_expanded_group(&mut self, id: Option<GroupId>) -> WorkspaceResult<()> {
        self.workspace.set_expanded_group(id)
    }

    pub fn toggle_group_expanded(&mut self, index: usize) -> WorkspaceResult<bool> {
        self.workspace.toggle_group_expanded(index)
    }

    pub fn rename_group(&mut self, index: usize, title: Option<&str>) -> WorkspaceResult<()> {
        self.workspace.rename_group(index, title)
    }

    // --- Structural mutations ---

    pub fn close_item(&mut self, top: usize, sub: Option<usize>) -> WorkspaceResult<()> {
        self.workspace.close_item(top, sub)?;
        self.end_interactions("close item");
        Ok(())
    }

    pub fn close_others(&mut self, top: usize, sub: Option<usize>) -> WorkspaceResult<()> {
        self.workspace.close_others(top, sub)?;
        self.end_interactions("close others");
        Ok(())
    }

    pub fn close_to_right(&mut self, top: usize) -> WorkspaceResult<()> {
        self.workspace.close_to_right(top)?;
        self.end_interactions("close to right");
        Ok(())
    }

    pub fn close_all(&mut self) {
        self.workspace.close_all();
        self.end_interactions("close all");
    }

    pub fn reorder_top_level(&mut self, from: usize, to: usize) -> WorkspaceResult<()> {
        self.workspace.reorder_top_level(from, to)?;
        self.end_interactions("reorder");
        Ok(())
    }

    pub fn reorder_within_group(
        &mut self,
        group: usize,
        from: usize,
        to: usize,
    ) -> WorkspaceResult<()> {
        self.workspace.reorder_within_group(group, from, to)?;
        self.end_interactions("reorder within group");
        Ok(())
    }

    // --- Drag and drop ---

    /// Returns `false` when the drag was refused because selection mode is on.
    pub fn start_drag(&mut self, source: TabRef) -> WorkspaceResult<bool> {
        if self.selection.is_active() {
            tracing::debug!(?source, "drag ignored during selection mode");
            return Ok(false);
        }
        self.drag.start(&mut self.workspace, source)?;
        Ok(true)
    }

    pub fn update_hover_target(
        &mut self,
        target: Option<TabRef>,
        now: Instant,
    ) -> Option<HoverTicket> {
        self.drag.update_hover_target(target, now)
    }

    pub fn cancel_hover(&mut self) {
        self.drag.cancel_hover();
    }

    pub fn hover_timer_fired(&mut self, ticket: HoverTicket) -> bool {
        self.drag.hover_timer_fired(ticket)
    }

    pub fn poll_hover(&mut self, now: Instant) -> bool {
        self.drag.poll_hover(now)
    }

    /// Drops the dragged tab on `target`. `Ok(None)` means there was no
    /// drag to drop.
    pub fn resolve_drop(&mut self, target: Option<TabRef>) -> WorkspaceResult<Option<DropAction>> {
        let resolved = self.drag.resolve_drop(&self.workspace, target).map(Some);
        let Some(action) = ignore_invalid(resolved, None)? else {
            return Ok(None);
        };
        let applied = action.apply(&mut self.workspace).map(|()| Some(action));
        ignore_invalid(applied, None)
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    // --- Selection mode ---

    pub fn enter_selection_mode(&mut self, seed: Option<usize>) -> WorkspaceResult<()> {
        if let Some(index) = seed {
            self.workspace.validate_ref(TabRef::TopLevel(index))?;
        }
        self.drag.cancel();
        self.selection.enter(&self.workspace, seed)
    }

    pub fn toggle_selected(&mut self, index: usize) -> WorkspaceResult<bool> {
        let result = self.selection.toggle_selected(&self.workspace, index);
        ignore_invalid(result, false)
    }

    pub fn toggle_target(&mut self, index: usize) -> WorkspaceResult<bool> {
        let result = self.selection.toggle_target(&self.workspace, index);
        ignore_invalid(result, false)
    }

    pub fn selection_click(&mut self, index: usize) -> WorkspaceResult<bool> {
        let result = self.selection.click(&self.workspace, index);
        ignore_invalid(result, false)
    }

    /// Returns the resulting group index, or `None` when nothing was eligible.
    pub fn confirm_selection(&mut self) -> WorkspaceResult<Option<usize>> {
        let result = self.selection.confirm(&mut self.workspace).map(Some);
        ignore_invalid(result, None)
    }

    pub fn cancel_selection_mode(&mut self) -> bool {
        self.selection.cancel()
    }

    fn end_interactions(&mut self, reason: &'static str) {
        if self.drag.cancel() {
            tracing::debug!(reason, "structural change ended drag");
        }
        if self.selection.cancel() {
            tracing::debug!(reason, "structural change ended selection mode");
        }
    }
}

fn ignore_invalid<T>(result: WorkspaceResult<T>, fallback: T) -> WorkspaceResult<T> {
    match result {
        Err(WorkspaceError::InvalidOperation(reason)) => {
            tracing::debug!(reason, "ignored invalid operation");
            Ok(fallback)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn session_with(names: &[&str]) -> StudySession {
        let ws = Workspace::with_studies(names.iter().map(|n| StudyItem::topic(*n)));
        StudySession::new(&StudyConfig::default()).with_workspace(ws)
    }

    fn topics(session: &StudySession) -> Vec<String> {
        (0..session.workspace().len())
            .filter_map(|i| session.entry_title(i))
            .collect()
    }

    #[test]
    fn test_closing_sub_tab_flattens_group() {
        // [[X, Y], Z] with the group expanded
        let mut session = session_with(&["X", "Y", "Z"]);
        session.start_drag(TabRef::TopLevel(0)).unwrap();
        let t0 = Instant::now();
        session.update_hover_target(Some(TabRef::TopLevel(1)), t0);
        session.poll_hover(t0 + Duration::from_millis(500));
        session.resolve_drop(Some(TabRef::TopLevel(1))).unwrap();
        session.toggle_group_expanded(0).unwrap();
        assert!(session.workspace().expanded_group_id().is_some());

        session.close_item(0, Some(1)).unwrap();
        assert_eq!(topics(&session), vec!["X", "Z"]);
        assert!(session.workspace().entries().iter().all(|e| !e.is_group()));
        assert_eq!(session.workspace().expanded_group_id(), None);
    }

    #[test]
    fn test_close_all_clears_selection() {
        let mut session = session_with(&["A", "B", "C"]);
        session.close_all();
        assert!(session.workspace().is_empty());
        assert_eq!(session.workspace().active(), None);
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let mut session = session_with(&["A", "B"]);
        assert_eq!(session.resolve_drop(Some(TabRef::TopLevel(1))), Ok(None));
        assert_eq!(topics(&session), vec!["A", "B"]);
    }

    #[test]
    fn test_drop_after_cancel_is_ignored() {
        let mut session = session_with(&["A", "B"]);
        session.start_drag(TabRef::TopLevel(0)).unwrap();
        assert!(session.cancel_drag());
        assert!(!session.cancel_drag());
        assert_eq!(session.resolve_drop(Some(TabRef::TopLevel(1))), Ok(None));
        assert_eq!(topics(&session), vec!["A", "B"]);
    }

    #[test]
    fn test_stale_drop_target_is_out_of_range() {
        let mut session = session_with(&["A", "B"]);
        session.start_drag(TabRef::TopLevel(0)).unwrap();
        let err = session.resolve_drop(Some(TabRef::TopLevel(5))).unwrap_err();
        assert!(err.is_out_of_range());
        assert_eq!(session.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_structural_change_ends_drag() {
        let mut session = session_with(&["A", "B", "C"]);
        session.start_drag(TabRef::TopLevel(2)).unwrap();
        session.close_item(0, None).unwrap();
        assert_eq!(session.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_structural_change_ends_selection_mode() {
        let mut session = session_with(&["A", "B", "C"]);
        session.enter_selection_mode(Some(2)).unwrap();
        session.reorder_top_level(2, 0).unwrap();
        assert!(!session.selection().is_active());
        assert!(session.selection().selected().is_empty());
    }

    #[test]
    fn test_failed_mutation_keeps_interactions() {
        let mut session = session_with(&["A", "B"]);
        session.start_drag(TabRef::TopLevel(0)).unwrap();
        assert!(session.close_item(9, None).is_err());
        assert_eq!(session.drag_phase(), DragPhase::Dragging);
    }

    #[test]
    fn test_selection_mode_cancels_drag() {
        let mut session = session_with(&["A", "B"]);
        session.start_drag(TabRef::TopLevel(0)).unwrap();
        let ticket = session
            .update_hover_target(Some(TabRef::TopLevel(1)), Instant::now())
            .unwrap();
        session.enter_selection_mode(None).unwrap();
        assert_eq!(session.drag_phase(), DragPhase::Idle);
        assert!(!session.hover_timer_fired(ticket));
    }

    #[test]
    fn test_drag_refused_while_selecting() {
        let mut session = session_with(&["A", "B"]);
        session.enter_selection_mode(None).unwrap();
        assert_eq!(session.start_drag(TabRef::TopLevel(0)), Ok(false));
        assert_eq!(session.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_selection_groups_picked_tabs() {
        let mut session = session_with(&["A", "B", "C"]);
        session.enter_selection_mode(None).unwrap();
        assert_eq!(session.selection_click(0), Ok(true));
        assert_eq!(session.selection_click(2), Ok(true));
        assert_eq!(session.confirm_selection(), Ok(Some(0)));
        assert_eq!(topics(&session), vec!["A + C", "B"]);
        assert!(!session.selection().is_active());
    }

    #[test]
    fn test_ineligible_confirm_is_ignored() {
        let mut session = session_with(&["A", "B"]);
        session.enter_selection_mode(Some(0)).unwrap();
        assert_eq!(session.confirm_selection(), Ok(None));
        assert!(session.selection().is_active());
        assert_eq!(session.confirm_selection(), Ok(None));
        // Toggling outside the mode is also a quiet no-op
        session.cancel_selection_mode();
        assert_eq!(session.toggle_selected(0), Ok(false));
    }

    #[test]
    fn test_open_study_focuses_existing() {
        let mut session = session_with(&["A", "B", "C"]);
        session.enter_selection_mode(None).unwrap();
        session.selection_click(1).unwrap();
        session.selection_click(2).unwrap();
        session.confirm_selection().unwrap();
        session.set_active(0, None).unwrap();

        let position = session.open_study(StudyItem::topic("  c ")).unwrap();
        assert_eq!(position, ActiveTab::sub_tab(1, 1));
        assert_eq!(session.workspace().active(), Some(ActiveTab::sub_tab(1, 1)));
        let group_id = session.workspace().entries()[1].as_group().unwrap().id();
        assert_eq!(session.workspace().expanded_group_id(), Some(group_id));

        let position = session.open_study(StudyItem::topic("D")).unwrap();
        assert_eq!(position, ActiveTab::study(2));
        assert_eq!(session.workspace().len(), 3);
    }

    #[test]
    fn test_group_titles_follow_rename() {
        let mut session = session_with(&["A", "B", "C"]);
        session.enter_selection_mode(Some(0)).unwrap();
        session.selection_click(1).unwrap();
        session.selection_click(2).unwrap();
        session.confirm_selection().unwrap();
        assert_eq!(session.entry_title(0).as_deref(), Some("A +2"));
        session.rename_group(0, Some("Gospels")).unwrap();
        assert_eq!(session.entry_title(0).as_deref(), Some("Gospels"));
        assert_eq!(
            session.tab_title(TabRef::SubTab { group: 0, sub: 2 }).as_deref(),
            Some("C")
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Open(u8),
        Close(usize, Option<usize>),
        CloseOthers(usize, Option<usize>),
        CloseToRight(usize),
        CloseAll,
        Reorder(usize, usize),
        ReorderInGroup(usize, usize, usize),
        SetActive(usize, Option<usize>),
        ToggleExpand(usize),
        Next,
        StartDrag(usize, Option<usize>),
        Hover(usize, Option<usize>),
        Leave,
        FireTimer,
        Drop(Option<(usize, Option<usize>)>),
        CancelDrag,
        EnterSelection(Option<usize>),
        Click(usize),
        Confirm,
        CancelSelection,
    }

    fn tab_ref(top: usize, sub: Option<usize>) -> TabRef {
        match sub {
            Some(sub) => TabRef::SubTab { group: top, sub },
            None => TabRef::TopLevel(top),
        }
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let idx = || 0usize..6;
        let sub = || proptest::option::of(0usize..4);
        prop_oneof![
            (0u8..10).prop_map(Op::Open),
            (idx(), sub()).prop_map(|(t, s)| Op::Close(t, s)),
            (idx(), sub()).prop_map(|(t, s)| Op::CloseOthers(t, s)),
            idx().prop_map(Op::CloseToRight),
            Just(Op::CloseAll),
            (idx(), idx()).prop_map(|(a, b)| Op::Reorder(a, b)),
            (idx(), 0usize..4, 0usize..4).prop_map(|(g, a, b)| Op::ReorderInGroup(g, a, b)),
            (idx(), sub()).prop_map(|(t, s)| Op::SetActive(t, s)),
            idx().prop_map(Op::ToggleExpand),
            Just(Op::Next),
            (idx(), sub()).prop_map(|(t, s)| Op::StartDrag(t, s)),
            (idx(), sub()).prop_map(|(t, s)| Op::Hover(t, s)),
            Just(Op::Leave),
            Just(Op::FireTimer),
            proptest::option::of((idx(), sub())).prop_map(Op::Drop),
            Just(Op::CancelDrag),
            proptest::option::of(idx()).prop_map(Op::EnterSelection),
            idx().prop_map(Op::Click),
            Just(Op::Confirm),
            Just(Op::CancelSelection),
        ]
    }

    fn apply(session: &mut StudySession, op: &Op, t0: Instant) -> WorkspaceResult<()> {
        match *op {
            Op::Open(n) => session.open_study(StudyItem::topic(format!("T{}", n))).map(|_| ()),
            Op::Close(t, s) => session.close_item(t, s),
            Op::CloseOthers(t, s) => session.close_others(t, s),
            Op::CloseToRight(t) => session.close_to_right(t),
            Op::CloseAll => {
                session.close_all();
                Ok(())
            }
            Op::Reorder(a, b) => session.reorder_top_level(a, b),
            Op::ReorderInGroup(g, a, b) => session.reorder_within_group(g, a, b),
            Op::SetActive(t, s) => session.set_active(t, s),
            Op::ToggleExpand(t) => session.toggle_group_expanded(t).map(|_| ()),
            Op::Next => {
                session.select_next();
                Ok(())
            }
            Op::StartDrag(t, s) => session.start_drag(tab_ref(t, s)).map(|_| ()),
            Op::Hover(t, s) => {
                session.update_hover_target(Some(tab_ref(t, s)), t0);
                Ok(())
            }
            Op::Leave => {
                session.cancel_hover();
                Ok(())
            }
            Op::FireTimer => {
                session.poll_hover(t0 + Duration::from_secs(1));
                Ok(())
            }
            Op::Drop(target) => session
                .resolve_drop(target.map(|(t, s)| tab_ref(t, s)))
                .map(|_| ()),
            Op::CancelDrag => {
                session.cancel_drag();
                Ok(())
            }
            Op::EnterSelection(seed) => session.enter_selection_mode(seed),
            Op::Click(i) => session.selection_click(i).map(|_| ()),
            Op::Confirm => session.confirm_selection().map(|_| ()),
            Op::CancelSelection => {
                session.cancel_selection_mode();
                Ok(())
            }
        }
    }

    fn interaction_violation(session: &StudySession) -> Option<String> {
        let ws = session.workspace();
        if let Some(drag) = session.drag_state() {
            if session.selection().is_active() {
                return Some("dragging during selection mode".into());
            }
            if ws.validate_ref(drag.source()).is_err() {
                return Some(format!("stale drag source {:?}", drag.source()));
            }
        }
        let selection = session.selection();
        for &i in selection.selected() {
            if !matches!(ws.get(i), Some(TabEntry::Study(_))) {
                return Some(format!("selected index {} is not a study", i));
            }
        }
        if let Some(target) = selection.target_group() {
            if !matches!(ws.get(target), Some(TabEntry::Group(_))) {
                return Some(format!("target {} is not a group", target));
            }
        }
        None
    }

    proptest! {
        #[test]
        fn test_random_operations_keep_invariants(
            seed in 0usize..6,
            ops in proptest::collection::vec(op_strategy(), 1..60),
        ) {
            let names: Vec<String> = (0..seed).map(|i| format!("S{}", i)).collect();
            let ws = Workspace::with_studies(names.iter().map(StudyItem::topic));
            let mut session = StudySession::new(&StudyConfig::default()).with_workspace(ws);
            let t0 = Instant::now();

            for op in &ops {
                let entries_before = session.workspace().entries().to_vec();
                let active_before = session.workspace().active();
                let expanded_before = session.workspace().expanded_group_id();

                if let Err(e) = apply(&mut session, op, t0) {
                    prop_assert!(e.is_out_of_range(), "{:?} leaked {:?}", op, e);
                    prop_assert_eq!(session.workspace().entries(), entries_before.as_slice());
                    prop_assert_eq!(session.workspace().active(), active_before);
                    prop_assert_eq!(session.workspace().expanded_group_id(), expanded_before);
                }
                if let Some(violation) = session.workspace().invariant_violation() {
                    prop_assert!(false, "after {:?}: {}", op, violation);
                }
                if let Some(violation) = interaction_violation(&session) {
                    prop_assert!(false, "after {:?}: {}", op, violation);
                }
            }
        }
    }
}
