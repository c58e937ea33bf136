//! Multi-select grouping: pick standalone tabs, optionally pick one group as
//! the destination, then confirm.

use std::collections::BTreeSet;

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::models::TabEntry;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMode {
    active: bool,
    selected: BTreeSet<usize>,
    target_group: Option<usize>,
}

impl SelectionMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn target_group(&self) -> Option<usize> {
        self.target_group
    }

    /// Enters selection mode, discarding any previous selection. A standalone
    /// `seed` starts out selected; a group seed becomes the target.
    pub fn enter(&mut self, workspace: &Workspace, seed: Option<usize>) -> WorkspaceResult<()> {
        let seed_entry = match seed {
            Some(index) => Some((index, entry_at(workspace, index)?)),
            None => None,
        };
        self.reset();
        self.active = true;
        match seed_entry {
            Some((index, TabEntry::Study(_))) => {
                self.selected.insert(index);
            }
            Some((index, TabEntry::Group(_))) => self.target_group = Some(index),
            None => {}
        }
        tracing::debug!(?seed, "selection mode entered");
        Ok(())
    }

    /// Flips a standalone tab in or out of the selection. Returns whether it
    /// is selected afterwards.
    pub fn toggle_selected(
        &mut self,
        workspace: &Workspace,
        index: usize,
    ) -> WorkspaceResult<bool> {
        self.ensure_active()?;
        if entry_at(workspace, index)?.is_group() {
            return Err(WorkspaceError::InvalidOperation("groups cannot be selected"));
        }
        if self.selected.remove(&index) {
            Ok(false)
        } else {
            self.selected.insert(index);
            Ok(true)
        }
    }

    /// Sets or clears the destination group. Returns whether `index` is the
    /// target afterwards.
    pub fn toggle_target(&mut self, workspace: &Workspace, index: usize) -> WorkspaceResult<bool> {
        self.ensure_active()?;
        if !entry_at(workspace, index)?.is_group() {
            return Err(WorkspaceError::InvalidOperation("only groups can be targets"));
        }
        if self.target_group == Some(index) {
            self.target_group = None;
            Ok(false)
        } else {
            self.target_group = Some(index);
            Ok(true)
        }
    }

    /// What a click does in selection mode: toggle a standalone tab, or
    /// toggle a group as the target.
    pub fn click(&mut self, workspace: &Workspace, index: usize) -> WorkspaceResult<bool> {
        if entry_at(workspace, index)?.is_group() {
            self.toggle_target(workspace, index)
        } else {
            self.toggle_selected(workspace, index)
        }
    }

    /// A new group needs two tabs; an existing target needs one.
    pub fn can_confirm(&self) -> bool {
        self.active
            && match self.target_group {
                Some(_) => !self.selected.is_empty(),
                None => self.selected.len() >= 2,
            }
    }

    /// Applies the grouping and leaves the mode. Returns the index of the
    /// resulting group. An ineligible selection is rejected and the mode
    /// stays as it was.
    pub fn confirm(&mut self, workspace: &mut Workspace) -> WorkspaceResult<usize> {
        self.ensure_active()?;
        if !self.can_confirm() {
            return Err(WorkspaceError::InvalidOperation("not enough tabs selected"));
        }
        let indices: Vec<usize> = self.selected.iter().copied().collect();
        let at = match self.target_group {
            Some(group) => workspace.append_many_to_group(&indices, group)?,
            None => workspace.group_many(&indices)?,
        };
        tracing::debug!(?indices, target = ?self.target_group, at, "selection confirmed");
        self.reset();
        Ok(at)
    }

    /// Leaves the mode without changes. Returns whether it was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active;
        self.reset();
        was_active
    }

    fn ensure_active(&self) -> WorkspaceResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(WorkspaceError::InvalidOperation("selection mode is not active"))
        }
    }

    fn reset(&mut self) {
        self.active = false;
        self.selected.clear();
        self.target_group = None;
    }
}

fn entry_at(workspace: &Workspace, index: usize) -> WorkspaceResult<&TabEntry> {
    workspace.get(index).ok_or(WorkspaceError::OutOfRange {
        index,
        len: workspace.len(),
    })
}
