//! Embeddable core library for dirmatch.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into a larger host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits:
//! - [`TreeView`] reads the tree being checked
//! - [`SchemaSource`](ports::SchemaSource) supplies the expected layout
//! - [`WritePort`](ports::WritePort) writes report artifacts
//!
//! The [`adapters`] module provides default implementations.
//!
//! # Entry points
//!
//! - [`run_check`](pipeline::run_check) matches a tree and builds a report
//! - [`ensure_layout`](layout::ensure_layout) turns a failed match into an error

pub mod adapters;
pub mod layout;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the domain capability so callers don't need dirmatch-domain directly.
pub use dirmatch_domain::{FsTreeView, MemTreeView, TreeView};

pub use layout::{LayoutError, ensure_layout};
