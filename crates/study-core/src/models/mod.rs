pub mod group;
pub mod study;
pub mod tab;

pub use group::{Group, GroupId};
pub use study::{StudyItem, StudyMode, StudyParams};
pub use tab::{TabEntry, TabRef};
