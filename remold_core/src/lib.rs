//! `remold_core` is the engine behind the [remold](https://github.com/remold-rs/remold)
//! source converter. A declarative tree of code sections — each a search
//! pattern, a block-boundary rule, optional children, and output wiring —
//! segments legacy source text recursively, rewrites every segment through
//! regex translation rules, and reassembles the pieces into one or more
//! target texts, optionally wrapped in templates.
//!
//! ## Processing Pipeline
//!
//! ```text
//! remold.toml
//!   → Config loader (section trees, translation rules, file tables)
//!   → Verification pre-pass (ids, patterns, references)
//!   → SectionLinker (resolves shared component subtrees, detects cycles)
//!   → CodeConverter / PropertyConverter (walks sections over each source)
//!   → FragmentMap → TargetOutput (ordered reassembly per target id)
//!   → Finalization (placeholders, re-indentation) → target files
//! ```
//!
//! ## Modules
//!
//! - [`config`] — The configuration model and `remold.toml` loading.
//! - [`brackets`] — Bracket counting and balanced-pair location, the basis
//!   of automatic block-boundary detection.
//! - [`cursor`] — The segment cursor: a buffer plus the offsets tracking
//!   what has been consumed, matched, and trimmed.
//! - [`engine`] — The recursive segmentation engine for code sources.
//! - [`properties`] — The line-oriented engine for `key=value` sources.
//! - [`translate`] — Regex substitution and case-transform rules.
//! - [`assemble`] — Ordered fragment assembly, placeholder resolution, and
//!   re-indentation.
//! - [`linker`] — The section arena and component reference linking.
//! - [`convert`] — Orchestration of a full run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use remold_core::RemoldConfig;
//! use remold_core::convert;
//!
//! # fn main() -> remold_core::RemoldResult<()> {
//! let root = Path::new(".");
//! let config = RemoldConfig::load(&root.join("remold.toml"))?;
//! let outcome = convert::run(&config, root)?;
//! convert::write_outcome(&outcome, config.overwrite_targets)?;
//! # Ok(())
//! # }
//! ```

pub use assemble::*;
pub use config::*;
pub use convert::*;
pub use cursor::*;
pub use engine::*;
pub use error::*;
pub use linker::*;
pub use properties::*;
pub use translate::*;

pub mod assemble;
pub mod brackets;
pub mod config;
pub mod convert;
pub mod cursor;
pub mod engine;
mod error;
pub mod files;
pub mod linker;
pub mod properties;
pub mod template;
pub mod translate;

#[cfg(test)]
mod __fixtures;
