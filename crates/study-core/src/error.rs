use crate::models::GroupId;

/// Failures reported by workspace operations.
///
/// Everything except [`WorkspaceError::InvalidOperation`] means the caller
/// presented an index or id that no longer refers to a live entry. Those are
/// integration bugs and are surfaced as-is. `InvalidOperation` covers
/// requests that can legitimately race with other UI events (a drop after a
/// cancel, confirming an empty selection) and is turned into a no-op by
/// [`crate::StudySession`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    #[error("tab index {index} is out of range for {len} top-level entries")]
    OutOfRange { index: usize, len: usize },
    #[error("sub-tab index {index} is out of range for group at {group} with {len} items")]
    SubOutOfRange {
        group: usize,
        index: usize,
        len: usize,
    },
    #[error("entry at {index} is not a group")]
    NotAGroup { index: usize },
    #[error("entry at {index} is a group, expected a standalone study")]
    NotAStudy { index: usize },
    #[error("no group with id {0}")]
    UnknownGroup(GroupId),
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
}

impl WorkspaceError {
    /// True for the stale-index class of errors.
    pub fn is_out_of_range(&self) -> bool {
        !matches!(self, WorkspaceError::InvalidOperation(_))
    }
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(WorkspaceError::OutOfRange { index: 3, len: 2 }.is_out_of_range());
        assert!(WorkspaceError::NotAGroup { index: 0 }.is_out_of_range());
        assert!(!WorkspaceError::InvalidOperation("no drag").is_out_of_range());
    }

    #[test]
    fn test_error_messages() {
        let err = WorkspaceError::SubOutOfRange {
            group: 1,
            index: 4,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "sub-tab index 4 is out of range for group at 1 with 2 items"
        );
    }
}
