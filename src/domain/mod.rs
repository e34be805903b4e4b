//! Domain logic - pure rules about tags and branches, independent of git operations

pub mod branch;
pub mod tag;

pub use branch::WorkBranch;
pub use tag::{Tag, TagKind};
