//! Drag and drop between tabs, including the timed hover-to-group gesture.
//!
//! # State Machine
//!
//! ```text
//! Idle --start--> Dragging --hover--> HoverPending --timer--> GroupArmed
//!                    ^                     |                      |
//!                    +------- leave -------+-------- leave -------+
//! ```
//!
//! A drop or cancel from any non-idle phase returns to `Idle`.
//!
//! The hover timer is not a real clock callback. Entering a new target hands
//! out a [`HoverTicket`]; the host either reports that ticket back through
//! [`DragController::hover_timer_fired`] or calls
//! [`DragController::poll_hover`] from its tick loop. Leaving the target,
//! dropping, cancelling, or entering a different target invalidates the
//! ticket, so a late fire can never arm a target the pointer already left.

use std::time::{Duration, Instant};

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::models::{TabEntry, TabRef};
use crate::workspace::Workspace;

/// Handle for one scheduled hover timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverTicket(u64);

#[derive(Debug, Clone)]
struct HoverTimer {
    ticket: HoverTicket,
    started_at: Instant,
}

/// Live drag, from drag start until drop or cancel.
#[derive(Debug, Clone)]
pub struct DragState {
    source: TabRef,
    hover_target: Option<TabRef>,
    grouping_armed: bool,
    hover_timer: Option<HoverTimer>,
}

impl DragState {
    pub fn source(&self) -> TabRef {
        self.source
    }

    pub fn hover_target(&self) -> Option<TabRef> {
        self.hover_target
    }

    pub fn is_grouping_armed(&self) -> bool {
        self.grouping_armed
    }

    /// The target that will receive a grouping drop, if the timer has fired.
    pub fn grouping_target(&self) -> Option<TabRef> {
        self.hover_target.filter(|_| self.grouping_armed)
    }

    pub fn has_pending_timer(&self) -> bool {
        self.hover_timer.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    HoverPending,
    GroupArmed,
}

/// What a drop does to the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Nothing to do (drop on itself, or an undefined pairing)
    None,
    Reorder {
        from: usize,
        to: usize,
    },
    CreateGroup {
        source: usize,
        target: usize,
    },
    AddToGroup {
        source: usize,
        group: usize,
    },
    ReorderInGroup {
        group: usize,
        from: usize,
        to: usize,
    },
    /// Take a sub-tab out of its group; `insert_at: None` appends at the end
    MoveOut {
        group: usize,
        sub: usize,
        insert_at: Option<usize>,
    },
}

impl DropAction {
    /// Decides what dropping `source` on `target` means.
    ///
    /// `armed` is whether the hover timer fired for this very target. Both
    /// refs must already be validated against `workspace`.
    pub fn resolve(
        workspace: &Workspace,
        source: TabRef,
        target: Option<TabRef>,
        armed: bool,
    ) -> DropAction {
        match (source, target) {
            (TabRef::TopLevel(s), Some(TabRef::TopLevel(t))) if s == t => DropAction::None,
            (TabRef::TopLevel(s), Some(TabRef::TopLevel(t))) => {
                if !armed {
                    return DropAction::Reorder { from: s, to: t };
                }
                match (workspace.get(s), workspace.get(t)) {
                    (Some(TabEntry::Study(_)), Some(TabEntry::Study(_))) => {
                        DropAction::CreateGroup {
                            source: s,
                            target: t,
                        }
                    }
                    (Some(TabEntry::Study(_)), Some(TabEntry::Group(_))) => {
                        DropAction::AddToGroup {
                            source: s,
                            group: t,
                        }
                    }
                    // Groups never nest; an armed group source just reorders
                    _ => DropAction::Reorder { from: s, to: t },
                }
            }
            (TabRef::TopLevel(s), Some(TabRef::SubTab { group, .. })) => {
                match workspace.get(s) {
                    Some(TabEntry::Study(_)) => DropAction::AddToGroup { source: s, group },
                    _ => DropAction::None,
                }
            }
            (TabRef::TopLevel(_), None) => DropAction::None,
            (
                TabRef::SubTab { group, sub },
                Some(TabRef::SubTab {
                    group: target_group,
                    sub: target_sub,
                }),
            ) => {
                if group != target_group || sub == target_sub {
                    DropAction::None
                } else {
                    DropAction::ReorderInGroup {
                        group,
                        from: sub,
                        to: target_sub,
                    }
                }
            }
            (TabRef::SubTab { group, sub }, Some(TabRef::TopLevel(t))) => DropAction::MoveOut {
                group,
                sub,
                insert_at: Some(t),
            },
            (TabRef::SubTab { group, sub }, None) => DropAction::MoveOut {
                group,
                sub,
                insert_at: None,
            },
        }
    }

    pub fn apply(self, workspace: &mut Workspace) -> WorkspaceResult<()> {
        match self {
            DropAction::None => Ok(()),
            DropAction::Reorder { from, to } => workspace.reorder_top_level(from, to),
            DropAction::CreateGroup { source, target } => {
                workspace.group_pair(source, target).map(|_| ())
            }
            DropAction::AddToGroup { source, group } => {
                workspace.append_to_group(source, group).map(|_| ())
            }
            DropAction::ReorderInGroup { group, from, to } => {
                workspace.reorder_within_group(group, from, to)
            }
            DropAction::MoveOut {
                group,
                sub,
                insert_at,
            } => workspace.move_out_of_group(group, sub, insert_at).map(|_| ()),
        }
    }
}

/// Owns the (optional) live drag and the hover timer bookkeeping.
#[derive(Debug, Clone)]
pub struct DragController {
    state: Option<DragState>,
    hover_delay: Duration,
    next_ticket: u64,
}

impl DragController {
    pub fn new(hover_delay: Duration) -> Self {
        Self {
            state: None,
            hover_delay,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn hover_delay(&self) -> Duration {
        self.hover_delay
    }

    pub fn phase(&self) -> DragPhase {
        match &self.state {
            None => DragPhase::Idle,
            Some(state) if state.grouping_armed => DragPhase::GroupArmed,
            Some(state) if state.hover_timer.is_some() => DragPhase::HoverPending,
            Some(_) => DragPhase::Dragging,
        }
    }

    /// When the pending hover timer is due, for hosts that schedule it.
    pub fn hover_deadline(&self) -> Option<Instant> {
        let timer = self.state.as_ref()?.hover_timer.as_ref()?;
        Some(timer.started_at + self.hover_delay)
    }

    /// Begins a drag from `source`, replacing any drag already in progress.
    ///
    /// Any expanded group is collapsed, except the one a dragged sub-tab
    /// lives in, which has to stay visible for the sub-tab to be dragged.
    pub fn start(&mut self, workspace: &mut Workspace, source: TabRef) -> WorkspaceResult<()> {
        workspace.validate_ref(source)?;
        self.cancel();

        let keep_expanded = match source {
            TabRef::SubTab { group, .. } => workspace
                .get(group)
                .and_then(TabEntry::as_group)
                .map(|g| g.id())
                .filter(|id| workspace.expanded_group_id() == Some(*id)),
            TabRef::TopLevel(_) => None,
        };
        workspace.set_expanded_group(keep_expanded)?;

        tracing::debug!(?source, "drag start");
        self.state = Some(DragState {
            source,
            hover_target: None,
            grouping_armed: false,
            hover_timer: None,
        });
        Ok(())
    }

    /// Reports the tab under the pointer. Entering a new target (re)starts
    /// the hover timer and returns its ticket; hovering the source or nothing
    /// counts as leaving.
    pub fn update_hover_target(
        &mut self,
        target: Option<TabRef>,
        now: Instant,
    ) -> Option<HoverTicket> {
        let state = self.state.as_mut()?;
        let target = match target {
            Some(t) if t != state.source => t,
            _ => {
                self.cancel_hover();
                return None;
            }
        };
        if state.hover_target == Some(target) {
            return None;
        }

        let ticket = HoverTicket(self.next_ticket);
        self.next_ticket += 1;
        state.hover_target = Some(target);
        state.grouping_armed = false;
        state.hover_timer = Some(HoverTimer {
            ticket,
            started_at: now,
        });
        Some(ticket)
    }

    /// The pointer left the current target: drop the timer and any armed state.
    pub fn cancel_hover(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.hover_target = None;
            state.grouping_armed = false;
            state.hover_timer = None;
        }
    }

    /// Arms grouping if `ticket` is the timer still pending. Stale tickets
    /// are ignored and return `false`.
    pub fn hover_timer_fired(&mut self, ticket: HoverTicket) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        match &state.hover_timer {
            Some(timer) if timer.ticket == ticket => {
                state.hover_timer = None;
                state.grouping_armed = true;
                tracing::debug!(target = ?state.hover_target, "grouping armed");
                true
            }
            _ => false,
        }
    }

    /// Fires the pending timer if its delay has elapsed by `now`.
    pub fn poll_hover(&mut self, now: Instant) -> bool {
        let due = self
            .state
            .as_ref()
            .and_then(|s| s.hover_timer.as_ref())
            .filter(|t| now.saturating_duration_since(t.started_at) >= self.hover_delay)
            .map(|t| t.ticket);
        match due {
            Some(ticket) => self.hover_timer_fired(ticket),
            None => false,
        }
    }

    /// Ends the drag at `target` (`None` for the background) and works out
    /// the action. The drag is over afterwards whatever the outcome.
    pub fn resolve_drop(
        &mut self,
        workspace: &Workspace,
        target: Option<TabRef>,
    ) -> WorkspaceResult<DropAction> {
        let state = self
            .state
            .take()
            .ok_or(WorkspaceError::InvalidOperation("drop without a drag in progress"))?;
        workspace.validate_ref(state.source)?;
        if let Some(target) = target {
            workspace.validate_ref(target)?;
        }
        let armed = state.grouping_armed && state.hover_target == target;
        let action = DropAction::resolve(workspace, state.source, target, armed);
        tracing::debug!(source = ?state.source, ?target, armed, ?action, "drop resolved");
        Ok(action)
    }

    /// Abandons the drag. Returns whether one was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.state.take().is_some();
        if was_dragging {
            tracing::debug!("drag cancelled");
        }
        was_dragging
    }
}
