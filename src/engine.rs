//! Outline Engine
//!
//! Bridges the filesystem and the core scanner: reads source files,
//! derives module names, and pre-scans sibling modules into a
//! [`ModuleIndex`] so dotted superclass references resolve across files.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{EngineError, Result};
use pyfold_outline::{scan_source_with_options, ModuleIndex, Outline, TokenizerOptions};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Column width of a tab stop when measuring indentation
    pub tab_size: usize,

    /// File extensions treated as scannable modules
    pub extensions: Vec<String>,

    /// Whether to follow symbolic links when walking directories
    pub follow_symlinks: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tab_size: 8,
            extensions: vec!["py".into(), "pyw".into(), "pyi".into()],
            follow_symlinks: false,
        }
    }
}

impl EngineOptions {
    fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            tab_size: self.tab_size,
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// The outline of one scanned file, with enough context for presentation
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModuleOutline {
    /// Path the source was read from
    pub path: String,

    /// Module name derived from the file stem
    pub module: String,

    /// Number of physical lines in the source
    pub line_count: usize,

    /// Top-level definitions in source order
    pub outline: Outline,
}

/// Derive a module name from a file path (the stem, as the language's own
/// import machinery would)
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

fn read_source(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(EngineError::NoSuchFile(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| EngineError::NotUtf8(path.to_path_buf()))
}

/// Scan in-memory source text against a prepared module index
pub fn outline_source(
    source: &str,
    module: &str,
    file: &str,
    index: &ModuleIndex,
    options: &EngineOptions,
) -> Outline {
    scan_source_with_options(source, module, file, index, options.tokenizer_options())
}

/// Read and scan one file against a prepared module index
pub fn outline_file(
    path: &Path,
    index: &ModuleIndex,
    options: &EngineOptions,
) -> Result<ModuleOutline> {
    let source = read_source(path)?;
    let module = module_name(path);
    let file = path.display().to_string();
    let outline = outline_source(&source, &module, &file, index, options);
    debug!(
        path = %path.display(),
        definitions = outline.len(),
        "scanned module"
    );
    Ok(ModuleOutline {
        path: file,
        module,
        line_count: source.lines().count(),
        outline,
    })
}

/// Walk a directory and pre-scan every scannable module into an index for
/// cross-module superclass resolution. Unreadable files are skipped with
/// a warning; the index is best-effort like everything else here.
pub fn build_module_index(dir: &Path, options: &EngineOptions) -> ModuleIndex {
    let mut index = ModuleIndex::new();
    let walker = WalkDir::new(dir).follow_links(options.follow_symlinks);
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !options.matches_extension(path) {
            continue;
        }
        let source = match read_source(path) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable module");
                continue;
            }
        };
        let module = module_name(path);
        let file = path.display().to_string();
        // sibling modules are scanned flat: their own cross-module
        // references are not chased
        let outline = outline_source(&source, &module, &file, &ModuleIndex::new(), options);
        index.insert(module, outline);
    }
    debug!(modules = index.len(), dir = %dir.display(), "module index built");
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfold_outline::BaseRef;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_module_name_from_stem() {
        assert_eq!(module_name(Path::new("/tmp/widgets.py")), "widgets");
        assert_eq!(module_name(Path::new("pkg/util.pyi")), "util");
    }

    #[test]
    fn test_outline_file_reads_and_scans() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        fs::write(&path, "class App:\n    def run(self):\n        pass\n").unwrap();

        let result =
            outline_file(&path, &ModuleIndex::new(), &EngineOptions::default()).unwrap();
        assert_eq!(result.module, "app");
        assert_eq!(result.line_count, 3);
        assert!(result.outline.contains("App"));
    }

    #[test]
    fn test_outline_file_missing_path() {
        let err = outline_file(
            Path::new("/definitely/not/here.py"),
            &ModuleIndex::new(),
            &EngineOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NoSuchFile(_)));
    }

    #[test]
    fn test_outline_file_rejects_non_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.py");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = outline_file(&path, &ModuleIndex::new(), &EngineOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::NotUtf8(_)));
    }

    #[test]
    fn test_module_index_enables_cross_module_bases() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("base.py"), "class Widget:\n    pass\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a module\n").unwrap();
        let app = dir.path().join("app.py");
        fs::write(&app, "class Button(base.Widget):\n    pass\n").unwrap();

        let options = EngineOptions::default();
        let index = build_module_index(dir.path(), &options);
        assert!(index.get("base").is_some());
        assert!(index.get("notes").is_none());

        let result = outline_file(&app, &index, &options).unwrap();
        let button = result.outline.get("Button").unwrap().as_class().unwrap();
        assert_eq!(
            button.bases,
            vec![BaseRef::External {
                module: "base".into(),
                name: "Widget".into()
            }]
        );
    }
}
