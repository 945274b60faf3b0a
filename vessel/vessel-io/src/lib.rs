//! TreeSkeleton2014 text persistence for vessel graphs.
//!
//! This crate reads and writes the two skeleton file layouts:
//!
//! - **Internal** - shared node table plus branches as index lists;
//!   lossless and compact
//! - **Simple** - per-branch inlined node records; redundant but
//!   self-contained, shared junctions are duplicated on write and
//!   welded back on load
//!
//! Loading auto-detects the layout from the header line and always
//! finishes with a connectivity correction pass, so a freshly loaded
//! tree is as consistent as a freshly built one.
//!
//! # Example
//!
//! ```no_run
//! use vessel_io::{load_tree, save_tree, TreeFormat};
//!
//! let tree = load_tree("skeleton.txt").unwrap();
//! save_tree("copy.txt", &tree, TreeFormat::Internal).unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod skeleton;

pub use error::{IoError, IoResult};
pub use skeleton::{TreeFormat, load_tree, read_tree, save_tree, write_tree};
