//! The ordered row of study tabs and groups, plus the active pointer.
//!
//! Every public mutator validates all of its indices before touching any
//! state, so an `Err` always leaves the workspace exactly as it was.

pub mod index;

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::models::{Group, GroupId, StudyItem, TabEntry, TabRef};

use index::{
    count_before, remap_after_move, repair_after_retain, shift_after_insert, shift_after_removal,
};

/// The active selection. `sub` is `Some` exactly when `top` refers to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTab {
    pub top: usize,
    pub sub: Option<usize>,
}

impl ActiveTab {
    pub fn study(top: usize) -> Self {
        Self { top, sub: None }
    }

    pub fn sub_tab(top: usize, sub: usize) -> Self {
        Self {
            top,
            sub: Some(sub),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    entries: Vec<TabEntry>,
    active: Option<ActiveTab>,
    /// At most one group is expanded; the id is the single source of truth
    expanded_group: Option<GroupId>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workspace of standalone tabs with the first one active.
    pub fn with_studies(items: impl IntoIterator<Item = StudyItem>) -> Self {
        let entries: Vec<TabEntry> = items.into_iter().map(TabEntry::Study).collect();
        let active = if entries.is_empty() {
            None
        } else {
            Some(ActiveTab::study(0))
        };
        Self {
            entries,
            active,
            expanded_group: None,
        }
    }

    // --- Read accessors ---

    pub fn entries(&self) -> &[TabEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TabEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of open studies, counting group members.
    pub fn item_count(&self) -> usize {
        self.entries.iter().map(TabEntry::item_count).sum()
    }

    pub fn active(&self) -> Option<ActiveTab> {
        self.active
    }

    pub fn active_top_index(&self) -> Option<usize> {
        self.active.map(|a| a.top)
    }

    pub fn active_sub_index(&self) -> Option<usize> {
        self.active.and_then(|a| a.sub)
    }

    /// The study the active pointer resolves to.
    pub fn active_item(&self) -> Option<&StudyItem> {
        let active = self.active?;
        match self.entries.get(active.top)? {
            TabEntry::Study(item) => Some(item),
            TabEntry::Group(group) => group.get(active.sub.unwrap_or(0)),
        }
    }

    pub fn expanded_group_id(&self) -> Option<GroupId> {
        self.expanded_group
    }

    pub fn is_expanded(&self, group: &Group) -> bool {
        self.expanded_group == Some(group.id())
    }

    pub fn group_index(&self, id: GroupId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.as_group().is_some_and(|g| g.id() == id))
    }

    /// The study a tab reference points at, if it is live.
    pub fn item_at(&self, tab: TabRef) -> Option<&StudyItem> {
        match tab {
            TabRef::TopLevel(index) => self.entries.get(index)?.as_study(),
            TabRef::SubTab { group, sub } => self.entries.get(group)?.as_group()?.get(sub),
        }
    }

    /// Finds the first study matching `pred`, searching group members too.
    pub fn position_of(&self, mut pred: impl FnMut(&StudyItem) -> bool) -> Option<ActiveTab> {
        for (top, entry) in self.entries.iter().enumerate() {
            match entry {
                TabEntry::Study(item) if pred(item) => return Some(ActiveTab::study(top)),
                TabEntry::Study(_) => {}
                TabEntry::Group(group) => {
                    if let Some(sub) = group.items().iter().position(&mut pred) {
                        return Some(ActiveTab::sub_tab(top, sub));
                    }
                }
            }
        }
        None
    }

    /// Drop and selection slots in visual order: each top-level entry, with
    /// the sub-tabs of the expanded group right after its group tab.
    pub fn visible_refs(&self) -> Vec<TabRef> {
        let mut refs = Vec::with_capacity(self.entries.len());
        for (top, entry) in self.entries.iter().enumerate() {
            refs.push(TabRef::TopLevel(top));
            if let TabEntry::Group(group) = entry {
                if self.is_expanded(group) {
                    refs.extend((0..group.len()).map(|sub| TabRef::SubTab { group: top, sub }));
                }
            }
        }
        refs
    }

    /// Checks that a reference points at a live entry of the right shape.
    pub fn validate_ref(&self, tab: TabRef) -> WorkspaceResult<()> {
        match tab {
            TabRef::TopLevel(index) => self.check_top(index).map(|_| ()),
            TabRef::SubTab { group, sub } => self.check_sub(group, sub).map(|_| ()),
        }
    }

    // --- Opening and navigation ---

    /// Appends a standalone study and makes it active. Returns its index.
    pub fn push_study(&mut self, item: StudyItem) -> usize {
        self.entries.push(TabEntry::Study(item));
        let index = self.entries.len() - 1;
        self.active = Some(ActiveTab::study(index));
        index
    }

    pub fn set_active(&mut self, top: usize, sub: Option<usize>) -> WorkspaceResult<()> {
        let entry = self.check_top(top)?;
        let active = match (entry, sub) {
            (TabEntry::Study(_), None) => ActiveTab::study(top),
            (TabEntry::Study(_), Some(_)) => return Err(WorkspaceError::NotAGroup { index: top }),
            (TabEntry::Group(group), sub) => {
                let sub = sub.unwrap_or(0);
                if sub >= group.len() {
                    return Err(WorkspaceError::SubOutOfRange {
                        group: top,
                        index: sub,
                        len: group.len(),
                    });
                }
                ActiveTab::sub_tab(top, sub)
            }
        };
        self.active = Some(active);
        Ok(())
    }

    /// Moves the active pointer to the next study in visual order, wrapping.
    pub fn select_next(&mut self) {
        self.step_active(true);
    }

    /// Moves the active pointer to the previous study in visual order, wrapping.
    pub fn select_prev(&mut self) {
        self.step_active(false);
    }

    fn step_active(&mut self, forward: bool) {
        let positions = self.item_positions();
        if positions.is_empty() {
            return;
        }
        let current = self
            .active
            .and_then(|a| positions.iter().position(|p| *p == a));
        let next = match current {
            None => 0,
            Some(i) if forward => (i + 1) % positions.len(),
            Some(0) => positions.len() - 1,
            Some(i) => i - 1,
        };
        self.active = Some(positions[next]);
    }

    fn item_positions(&self) -> Vec<ActiveTab> {
        let mut positions = Vec::with_capacity(self.entries.len());
        for (top, entry) in self.entries.iter().enumerate() {
            match entry {
                TabEntry::Study(_) => positions.push(ActiveTab::study(top)),
                TabEntry::Group(group) => {
                    positions.extend((0..group.len()).map(|sub| ActiveTab::sub_tab(top, sub)))
                }
            }
        }
        positions
    }

    // --- Expansion and rename ---

    pub fn set_expanded_group(&mut self, id: Option<GroupId>) -> WorkspaceResult<()> {
        if let Some(id) = id {
            if self.group_index(id).is_none() {
                return Err(WorkspaceError::UnknownGroup(id));
            }
        }
        self.expanded_group = id;
        Ok(())
    }

    /// Expands the group at `index`, or collapses it if it is the expanded one.
    /// Returns whether the group is expanded afterwards.
    pub fn toggle_group_expanded(&mut self, index: usize) -> WorkspaceResult<bool> {
        let id = self.check_group(index)?.id();
        if self.expanded_group == Some(id) {
            self.expanded_group = None;
            Ok(false)
        } else {
            self.expanded_group = Some(id);
            Ok(true)
        }
    }

    /// Sets a group's custom title. Blank titles clear it.
    pub fn rename_group(&mut self, index: usize, title: Option<&str>) -> WorkspaceResult<()> {
        self.check_group(index)?;
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        tracing::debug!(index, title = ?title, "rename group");
        if let Some(group) = self.entries[index].as_group_mut() {
            group.set_custom_title(title);
        }
        Ok(())
    }

    // --- Closing ---

    /// Closes a whole top-level entry, or one sub-tab when `sub` is given.
    pub fn close_item(&mut self, top: usize, sub: Option<usize>) -> WorkspaceResult<()> {
        match sub {
            None => {
                self.check_top(top)?;
                tracing::debug!(top, "close entry");
                let kept: Vec<bool> = (0..self.entries.len()).map(|i| i != top).collect();
                self.retain_entries(&kept);
            }
            Some(sub) => {
                let len = self.check_sub(top, sub)?;
                tracing::debug!(top, sub, "close sub-tab");
                let (_, flattened) = self.take_sub(top, sub);
                if let Some(active) = self.active.filter(|a| a.top == top) {
                    self.active = Some(if flattened {
                        ActiveTab::study(top)
                    } else {
                        let current = active.sub.unwrap_or(0);
                        let remaining = len - 1;
                        let next = if current == sub {
                            sub.min(remaining - 1)
                        } else if current > sub {
                            current - 1
                        } else {
                            current
                        };
                        ActiveTab::sub_tab(top, next)
                    });
                }
                self.prune_expanded();
            }
        }
        Ok(())
    }

    /// Closes everything except the given entry. With `sub`, only that
    /// sub-tab survives, as a standalone tab.
    pub fn close_others(&mut self, top: usize, sub: Option<usize>) -> WorkspaceResult<()> {
        match sub {
            None => {
                self.check_top(top)?;
                tracing::debug!(top, "close others");
                let kept: Vec<bool> = (0..self.entries.len()).map(|i| i == top).collect();
                self.retain_entries(&kept);
            }
            Some(sub) => {
                self.check_sub(top, sub)?;
                tracing::debug!(top, sub, "close others keeping sub-tab");
                let entry = self.entries.swap_remove(top);
                let item = match entry {
                    TabEntry::Group(group) => group.items()[sub].clone(),
                    TabEntry::Study(item) => item,
                };
                self.entries = vec![TabEntry::Study(item)];
                self.active = Some(ActiveTab::study(0));
                self.expanded_group = None;
            }
        }
        Ok(())
    }

    /// Closes every entry after `top`.
    pub fn close_to_right(&mut self, top: usize) -> WorkspaceResult<()> {
        self.check_top(top)?;
        tracing::debug!(top, "close to right");
        let kept: Vec<bool> = (0..self.entries.len()).map(|i| i <= top).collect();
        self.retain_entries(&kept);
        Ok(())
    }

    pub fn close_all(&mut self) {
        tracing::debug!(count = self.entries.len(), "close all");
        self.entries.clear();
        self.active = None;
        self.expanded_group = None;
    }

    // --- Reordering ---

    pub fn reorder_top_level(&mut self, from: usize, to: usize) -> WorkspaceResult<()> {
        self.check_top(from)?;
        self.check_top(to)?;
        if from == to {
            return Ok(());
        }
        tracing::debug!(from, to, "reorder top level");
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        if let Some(active) = self.active.as_mut() {
            active.top = remap_after_move(active.top, from, to);
        }
        Ok(())
    }

    pub fn reorder_within_group(
        &mut self,
        group: usize,
        from: usize,
        to: usize,
    ) -> WorkspaceResult<()> {
        self.check_sub(group, from)?;
        self.check_sub(group, to)?;
        if from == to {
            return Ok(());
        }
        tracing::debug!(group, from, to, "reorder within group");
        if let Some(g) = self.entries[group].as_group_mut() {
            let items = g.items_mut();
            let item = items.remove(from);
            items.insert(to, item);
        }
        if let Some(active) = self.active.as_mut().filter(|a| a.top == group) {
            active.sub = active.sub.map(|s| remap_after_move(s, from, to));
        }
        Ok(())
    }

    // --- Grouping primitives used by drag and drop and selection mode ---

    /// Merges two standalone tabs into a new group `[source, target]` placed
    /// where the target was. Returns the group's index.
    pub(crate) fn group_pair(&mut self, source: usize, target: usize) -> WorkspaceResult<usize> {
        self.check_study(source)?;
        self.check_study(target)?;
        if source == target {
            return Err(WorkspaceError::InvalidOperation("cannot group a tab with itself"));
        }
        let source_item = self.remove_study(source);
        let at = if source < target { target - 1 } else { target };
        let target_item = self.remove_study(at);
        let group = Group::new(vec![source_item, target_item]);
        tracing::debug!(source, target, at, group = %group.id(), "create group from pair");
        self.entries.insert(at, TabEntry::Group(group));

        self.active = self.active.map(|a| {
            if a.top == source {
                ActiveTab::sub_tab(at, 0)
            } else if a.top == target {
                ActiveTab::sub_tab(at, 1)
            } else {
                ActiveTab {
                    top: shift_after_removal(a.top, source).unwrap_or(a.top),
                    sub: a.sub,
                }
            }
        });
        Ok(at)
    }

    /// Moves a standalone tab to the end of an existing group.
    /// Returns the group's index afterwards.
    pub(crate) fn append_to_group(
        &mut self,
        source: usize,
        group: usize,
    ) -> WorkspaceResult<usize> {
        self.check_study(source)?;
        self.check_group(group)?;
        let new_sub = self.entries[group].item_count();
        let item = self.remove_study(source);
        let at = if source < group { group - 1 } else { group };
        if let Some(g) = self.entries[at].as_group_mut() {
            g.items_mut().push(item);
        }
        tracing::debug!(source, group, at, "append to group");

        self.active = self.active.map(|a| {
            if a.top == source {
                ActiveTab::sub_tab(at, new_sub)
            } else if a.top == group {
                ActiveTab { top: at, sub: a.sub }
            } else {
                ActiveTab {
                    top: shift_after_removal(a.top, source).unwrap_or(a.top),
                    sub: a.sub,
                }
            }
        });
        Ok(at)
    }

    /// Takes a sub-tab out of its group and inserts it as a standalone tab
    /// before `insert_at`, or at the end when `None`. `insert_at` is in the
    /// coordinates before the move. Returns the new standalone index.
    pub(crate) fn move_out_of_group(
        &mut self,
        group: usize,
        sub: usize,
        insert_at: Option<usize>,
    ) -> WorkspaceResult<usize> {
        self.check_sub(group, sub)?;
        if let Some(at) = insert_at {
            self.check_top(at)?;
        }
        let at = insert_at.unwrap_or(self.entries.len());
        let (item, flattened) = self.take_sub(group, sub);
        self.entries.insert(at, TabEntry::Study(item));
        tracing::debug!(group, sub, at, flattened, "move sub-tab out of group");

        self.active = self.active.map(|a| {
            if a.top == group {
                match a.sub {
                    Some(s) if s == sub => ActiveTab::study(at),
                    current => ActiveTab {
                        top: shift_after_insert(group, at),
                        sub: if flattened {
                            None
                        } else {
                            current.map(|s| if s > sub { s - 1 } else { s })
                        },
                    },
                }
            } else {
                ActiveTab {
                    top: shift_after_insert(a.top, at),
                    sub: a.sub,
                }
            }
        });
        self.prune_expanded();
        Ok(at)
    }

    /// Builds a new group from standalone tabs at `indices` (sorted, unique,
    /// at least two), in their original order, placed at the smallest index.
    pub(crate) fn group_many(&mut self, indices: &[usize]) -> WorkspaceResult<usize> {
        if indices.len() < 2 {
            return Err(WorkspaceError::InvalidOperation("grouping needs two tabs"));
        }
        for &i in indices {
            self.check_study(i)?;
        }
        let at = indices[0];
        let items = self.remove_studies(indices);
        let group = Group::new(items);
        tracing::debug!(?indices, at, group = %group.id(), "create group from selection");
        self.entries.insert(at, TabEntry::Group(group));

        self.active = self.active.map(|a| {
            if let Some(pos) = indices.iter().position(|&i| i == a.top) {
                ActiveTab::sub_tab(at, pos)
            } else {
                let shifted = a.top - count_before(indices, a.top);
                ActiveTab {
                    top: if shifted >= at { shifted + 1 } else { shifted },
                    sub: a.sub,
                }
            }
        });
        Ok(at)
    }

    /// Appends the standalone tabs at `indices` (sorted, unique) to the group
    /// at `group`, in their original order. Returns the group's new index.
    pub(crate) fn append_many_to_group(
        &mut self,
        indices: &[usize],
        group: usize,
    ) -> WorkspaceResult<usize> {
        if indices.is_empty() {
            return Err(WorkspaceError::InvalidOperation("nothing selected"));
        }
        self.check_group(group)?;
        for &i in indices {
            self.check_study(i)?;
        }
        let old_len = self.entries[group].item_count();
        let at = group - count_before(indices, group);
        let items = self.remove_studies(indices);
        if let Some(g) = self.entries[at].as_group_mut() {
            g.items_mut().extend(items);
        }
        tracing::debug!(?indices, group, at, "append selection to group");

        self.active = self.active.map(|a| {
            if let Some(pos) = indices.iter().position(|&i| i == a.top) {
                ActiveTab::sub_tab(at, old_len + pos)
            } else if a.top == group {
                ActiveTab { top: at, sub: a.sub }
            } else {
                ActiveTab {
                    top: a.top - count_before(indices, a.top),
                    sub: a.sub,
                }
            }
        });
        Ok(at)
    }

    // --- Private helpers ---

    fn check_top(&self, index: usize) -> WorkspaceResult<&TabEntry> {
        self.entries.get(index).ok_or(WorkspaceError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    fn check_group(&self, index: usize) -> WorkspaceResult<&Group> {
        self.check_top(index)?
            .as_group()
            .ok_or(WorkspaceError::NotAGroup { index })
    }

    fn check_study(&self, index: usize) -> WorkspaceResult<&StudyItem> {
        self.check_top(index)?
            .as_study()
            .ok_or(WorkspaceError::NotAStudy { index })
    }

    /// Validates a sub-tab reference, returning the group's length.
    fn check_sub(&self, group: usize, sub: usize) -> WorkspaceResult<usize> {
        let len = self.check_group(group)?.len();
        if sub >= len {
            return Err(WorkspaceError::SubOutOfRange {
                group,
                index: sub,
                len,
            });
        }
        Ok(len)
    }

    /// Removes a validated standalone entry. Does not touch the pointer.
    fn remove_study(&mut self, index: usize) -> StudyItem {
        match self.entries.remove(index) {
            TabEntry::Study(item) => item,
            TabEntry::Group(_) => unreachable!("index validated as a study"),
        }
    }

    /// Removes validated standalone entries (sorted), returning them in order.
    fn remove_studies(&mut self, indices: &[usize]) -> Vec<StudyItem> {
        let mut items: Vec<StudyItem> = indices
            .iter()
            .rev()
            .map(|&i| self.remove_study(i))
            .collect();
        items.reverse();
        items
    }

    /// Removes a validated sub-tab, flattening the group if one item remains.
    /// Does not touch the pointer.
    fn take_sub(&mut self, group: usize, sub: usize) -> (StudyItem, bool) {
        let (item, remaining) = match self.entries[group].as_group_mut() {
            Some(g) => {
                let item = g.items_mut().remove(sub);
                (item, g.len())
            }
            None => unreachable!("index validated as a group"),
        };
        if remaining > 1 {
            return (item, false);
        }
        if let TabEntry::Group(g) = self.entries.remove(group) {
            tracing::debug!(group, id = %g.id(), "flatten single-item group");
            if let Some(last) = g.into_single() {
                self.entries.insert(group, TabEntry::Study(last));
            }
        }
        (item, true)
    }

    /// Keeps only entries with `kept[i]`, repairing the pointer once.
    fn retain_entries(&mut self, kept: &[bool]) {
        let previous = self.active;
        let mut i = 0;
        self.entries.retain(|_| {
            let keep = kept[i];
            i += 1;
            keep
        });
        self.active = previous.and_then(|a| {
            let top = repair_after_retain(a.top, kept)?;
            let sub = if kept[a.top] { a.sub } else { None };
            Some(self.normalized(top, sub))
        });
        self.prune_expanded();
    }

    /// Builds a pointer whose `sub` matches the entry kind at `top`.
    fn normalized(&self, top: usize, sub: Option<usize>) -> ActiveTab {
        match self.entries.get(top) {
            Some(TabEntry::Group(group)) => {
                ActiveTab::sub_tab(top, sub.filter(|&s| s < group.len()).unwrap_or(0))
            }
            _ => ActiveTab::study(top),
        }
    }

    fn prune_expanded(&mut self) {
        if let Some(id) = self.expanded_group {
            if self.group_index(id).is_none() {
                self.expanded_group = None;
            }
        }
    }

    /// Describes the first broken invariant, if any.
    #[cfg(test)]
    pub(crate) fn invariant_violation(&self) -> Option<String> {
        for (i, entry) in self.entries.iter().enumerate() {
            if let TabEntry::Group(group) = entry {
                if group.len() < 2 {
                    return Some(format!("group at {} has {} items", i, group.len()));
                }
            }
        }
        match (self.active, self.entries.is_empty()) {
            (None, false) => return Some("no active tab in a non-empty workspace".into()),
            (Some(a), true) => return Some(format!("active {:?} in an empty workspace", a)),
            (Some(a), false) => match self.entries.get(a.top) {
                None => return Some(format!("active top {} out of range", a.top)),
                Some(TabEntry::Study(_)) if a.sub.is_some() => {
                    return Some(format!("active {:?} has a sub on a study", a))
                }
                Some(TabEntry::Group(g)) if a.sub.map_or(true, |s| s >= g.len()) => {
                    return Some(format!("active {:?} has a bad sub for a group of {}", a, g.len()))
                }
                _ => {}
            },
            (None, true) => {}
        }
        if let Some(id) = self.expanded_group {
            if self.group_index(id).is_none() {
                return Some(format!("expanded group {} is gone", id));
            }
        }
        None
    }
}
