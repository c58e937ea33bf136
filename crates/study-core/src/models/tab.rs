use super::{Group, StudyItem};

/// One slot of the top-level tab row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEntry {
    Study(StudyItem),
    Group(Group),
}

impl TabEntry {
    pub fn as_study(&self) -> Option<&StudyItem> {
        match self {
            TabEntry::Study(item) => Some(item),
            TabEntry::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            TabEntry::Group(group) => Some(group),
            TabEntry::Study(_) => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            TabEntry::Group(group) => Some(group),
            TabEntry::Study(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, TabEntry::Group(_))
    }

    /// Number of studies held by this slot.
    pub fn item_count(&self) -> usize {
        match self {
            TabEntry::Study(_) => 1,
            TabEntry::Group(group) => group.len(),
        }
    }
}

/// Address of a tab as seen by drag and drop: either a top-level slot or a
/// sub-tab inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabRef {
    TopLevel(usize),
    SubTab { group: usize, sub: usize },
}

impl TabRef {
    pub fn top_index(self) -> usize {
        match self {
            TabRef::TopLevel(index) => index,
            TabRef::SubTab { group, .. } => group,
        }
    }

    pub fn is_sub_tab(self) -> bool {
        matches!(self, TabRef::SubTab { .. })
    }
}
