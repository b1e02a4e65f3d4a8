//! pyfold-outline: structural outline scanning for Python source
//!
//! This crate reconstructs the class/function/method nesting of a module
//! purely from a token stream — no grammar, no semantic analysis — and
//! reports, for every definition, the 1-based line range of its body.
//! The intended consumer is an editor presentation layer that turns the
//! ranges into collapse/fold regions.
//!
//! # Design Philosophy: Best Effort, Never Abort
//!
//! The buffer being scanned may be transiently invalid while it is being
//! edited, so the scanner is an observation instrument, not a compiler:
//! - Malformed declarations are skipped, not raised
//! - Unsupported base-class expressions degrade to their collected text
//! - Unresolvable superclass references stay textual
//! - A truncated stream leaves end lines unknown rather than failing
//!
//! # Example
//!
//! ```
//! use pyfold_outline::{scan_source, ModuleIndex};
//!
//! let source = "class A:\n    def m(self):\n        pass\n\ndef f():\n    pass\n";
//! let outline = scan_source(source, "example", "example.py", &ModuleIndex::new());
//!
//! let class_a = outline.get("A").unwrap().as_class().unwrap();
//! assert_eq!(class_a.lines.start, 1);
//! assert_eq!(class_a.lines.end, Some(3));
//! assert_eq!(outline.get("f").unwrap().lines().end, Some(6));
//! ```
//!
//! Cross-module superclass references resolve against a [`ModuleIndex`]
//! of previously scanned modules:
//!
//! ```
//! use pyfold_outline::{scan_source, BaseRef, ModuleIndex};
//!
//! let mut index = ModuleIndex::new();
//! index.insert(
//!     "base",
//!     scan_source("class Widget:\n    pass\n", "base", "base.py", &ModuleIndex::new()),
//! );
//!
//! let outline = scan_source("class Button(base.Widget):\n    pass\n", "ui", "ui.py", &index);
//! let button = outline.get("Button").unwrap().as_class().unwrap();
//! assert!(matches!(button.bases[0], BaseRef::External { .. }));
//! ```

pub mod model;
pub mod scanner;
pub mod token;

// Re-export the working set
pub use model::{
    BaseRef, ClassDef, Definition, FunctionDef, LineRange, Method, MethodMap, ModuleIndex, Outline,
};
pub use scanner::{scan, scan_source, scan_source_with_options};
pub use token::{tokenize, Token, TokenKind, Tokenizer, TokenizerOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
