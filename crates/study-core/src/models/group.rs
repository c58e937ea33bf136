use std::fmt;

use uuid::Uuid;

use super::StudyItem;

/// Stable identifier assigned when a group is created. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Uuid);

impl GroupId {
    pub(crate) fn new() -> Self {
        GroupId(Uuid::new_v4())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered, named container of studies.
///
/// A live group always holds at least two items: removals that would leave a
/// single item flatten the group back into a standalone tab, and that check
/// is done by the workspace, which is the only place items leave a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    custom_title: Option<String>,
    items: Vec<StudyItem>,
}

impl Group {
    pub(crate) fn new(items: Vec<StudyItem>) -> Self {
        debug_assert!(items.len() >= 2, "a group needs at least two items");
        Self {
            id: GroupId::new(),
            custom_title: None,
            items,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn custom_title(&self) -> Option<&str> {
        self.custom_title.as_deref()
    }

    pub fn items(&self) -> &[StudyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, sub: usize) -> Option<&StudyItem> {
        self.items.get(sub)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<StudyItem> {
        &mut self.items
    }

    pub(crate) fn set_custom_title(&mut self, title: Option<String>) {
        self.custom_title = title;
    }

    /// Consumes a group that is down to one item, yielding it.
    pub(crate) fn into_single(mut self) -> Option<StudyItem> {
        if self.items.len() == 1 {
            self.items.pop()
        } else {
            None
        }
    }
}
