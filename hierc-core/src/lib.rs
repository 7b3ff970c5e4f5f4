//! Core of the hierc class-hierarchy compiler.
//!
//! The pipeline is roughly:
//!
//!   source tree of .cfh files
//!     -> scan       (discover files)
//!     -> naming     (derive a class name per file)
//!     -> parser     (class declarations)
//!     -> registry   (one record per file, flat class table)
//!     -> forest     (link parents and children into trees)
//!     -> ladder     (parent-before-descendant order for code generators)
//!     -> propagate  (which generated files are stale)
//!
//! Code generators depend on this crate and consume
//! [`Hierarchy::ordered_classes`] together with the modified flags set by
//! [`Hierarchy::propagate_modified`].

// ---------------------------------------------------------------------
// Error handling and configuration
// ---------------------------------------------------------------------

pub mod config;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: discovery, lexing and parsing
// ---------------------------------------------------------------------

pub mod arena;
pub mod lexer;
pub mod naming;
pub mod parser;
pub mod scan;

// ---------------------------------------------------------------------
// Hierarchy: registration, assembly, ordering and staleness
// ---------------------------------------------------------------------

pub mod class;
pub mod forest;
pub mod hierarchy;
pub mod ladder;
pub mod propagate;
pub mod registry;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use class::{ClassId, ClassNode, ClassTable};
pub use config::HierarchyConfig;
pub use error::CoreError;
pub use hierarchy::Hierarchy;
pub use registry::{FileRegistry, SourceFile};
