//! Domain logic: match a declarative directory schema against a real (or fake) tree.
//!
//! This crate owns *what* counts as a discrepancy. It does not own how reports are rendered or
//! persisted; that's `dirmatch-render` and `dirmatch-core`.

mod counter;
mod dir_matcher;
mod error;
mod file_matcher;
mod mem;
mod ports;

pub use counter::{ExpectedSize, count_expected};
pub use dir_matcher::match_directory;
pub use error::ScanError;
pub use file_matcher::match_file;
pub use mem::MemTreeView;
pub use ports::{FsTreeView, TreeEntry, TreeView};
