//! Crate for the mapping table: reading and writing it, looking up and creating mappings, and completing class
//! mappings with the members they inherit.
//!
//! Currently this crate supports reading and writing Tiny v2 (`.tiny`) files with two namespaces. See the
//! documentation of the [`tiny_v2`] module for more.

mod lines;
mod completion;

pub mod tiny_v2;

pub mod tree;
pub mod inheritance;

pub mod remapper;
