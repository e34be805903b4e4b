//! Changelog documents and the release-notes fragments spliced into them
//!
//! A `CHANGELOG-X.Y.md` file is parsed into a [Changelog]: a preamble holding
//! the title and table of contents, then one [Section] per `# v…` heading.
//! Splicing works on sections rather than raw text, so a tag's "changes since"
//! body is always replaced as a unit.

pub mod document;
pub mod fragment;

pub use document::{Changelog, Section};
pub use fragment::Fragment;
