//! pyfold - Python outline scanning for editor folding (Rust Engine)
//!
//! This library wraps the `pyfold-outline` scanner with the filesystem
//! and presentation plumbing a frontend needs. It is designed to be
//! consumed by:
//! - The CLI binary (src/bin/pyfold.rs)
//! - Editor integrations embedding the engine directly
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no CLI concerns
//! - **bin/pyfold.rs**: Thin wrapper that calls the library
//!
//! The split mirrors the layering of the system itself:
//! - `pyfold-outline` — the core: tokenizer adapter + structural scanner
//! - `engine` — file reading, module naming, sibling-module indexing
//! - `folds` — outline → collapsible line ranges
//! - `render` — plain-text listing of an outline
//!
//! # Example
//!
//! ```
//! use pyfold::{fold_ranges, outline_source, EngineOptions};
//! use pyfold::outline::ModuleIndex;
//!
//! let source = "def f():\n    return 1\n";
//! let outline = outline_source(source, "m", "m.py", &ModuleIndex::new(), &EngineOptions::default());
//! let folds = fold_ranges(&outline, source.lines().count());
//! assert_eq!(folds.len(), 1);
//! assert_eq!((folds[0].start, folds[0].end), (1, 2));
//! ```

pub mod engine;
pub mod error;
pub mod folds;
pub mod render;

// Re-export the working set
pub use engine::{
    build_module_index, module_name, outline_file, outline_source, EngineOptions, ModuleOutline,
};
pub use error::{EngineError, Result};
pub use folds::{fold_ranges, FoldRange};
pub use render::render_outline;

/// The core scanner crate, re-exported for embedders
pub use pyfold_outline as outline;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
