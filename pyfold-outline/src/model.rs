//! Outline Model Types
//!
//! This module defines the structural model produced by a scan. All types
//! are designed for:
//!
//! 1. **Source order**: registries iterate in the order definitions appear
//! 2. **Serialization**: full serde support for export to editor frontends
//! 3. **Tolerance**: unknown end lines are `None`, never an error

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Line ranges
// ============================================================================

/// A 1-based inclusive line range whose end may not be known yet.
///
/// `end` is `None` while the block is still open — either mid-scan, or in
/// the final output when the token stream ended before the block closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LineRange {
    /// Start line (1-based, the line bearing the `def`/`class` keyword)
    pub start: usize,

    /// End line (1-based, inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl LineRange {
    /// Create a still-open range starting at `start`
    pub fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Check if the range has been closed
    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    /// Check if a closed range is inverted (end before start)
    pub fn is_malformed(&self) -> bool {
        matches!(self.end, Some(end) if end < self.start)
    }
}

// ============================================================================
// Superclass references
// ============================================================================

/// A reference to a superclass in a class's base list.
///
/// Resolution happens at scan time against two read-only indices: the
/// current scan's top-level registry and the caller-supplied [`ModuleIndex`].
/// Resolved variants store lookup keys, never copies of the referenced
/// definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BaseRef {
    /// Unresolved textual name (possibly dotted), kept as written
    Name(String),

    /// Resolved against the current scan's top-level registry
    Local(String),

    /// Resolved against a previously scanned module
    External { module: String, name: String },
}

impl BaseRef {
    /// The textual name of the reference, however it resolved
    pub fn display_name(&self) -> String {
        match self {
            BaseRef::Name(n) | BaseRef::Local(n) => n.clone(),
            BaseRef::External { module, name } => format!("{}.{}", module, name),
        }
    }

    /// Check if the reference resolved to a known definition
    pub fn is_resolved(&self) -> bool {
        !matches!(self, BaseRef::Name(_))
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// A module-level function discovered by the scanner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionDef {
    /// Name of the module the function was found in
    pub module: String,

    /// Declared name
    pub name: String,

    /// Source file label (opaque, never dereferenced by the scanner)
    pub file: String,

    /// Line range of the definition
    pub lines: LineRange,
}

impl FunctionDef {
    pub fn new(module: &str, name: &str, file: &str, start: usize) -> Self {
        Self {
            module: module.to_string(),
            name: name.to_string(),
            file: file.to_string(),
            lines: LineRange::open(start),
        }
    }
}

/// A method entry inside a [`ClassDef`].
///
/// Start and end live in one record so the "method starts" and "method
/// ends" key sets cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub lines: LineRange,
}

/// Insertion-ordered method registry of a class.
///
/// Re-declaring a method name overwrites the entry in place, keeping its
/// original position, the same way the language's own runtime shadows a
/// prior declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MethodMap {
    entries: Vec<Method>,
}

impl MethodMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method start; any previous entry under the same name is
    /// replaced and its end line reset to unknown.
    pub fn add(&mut self, name: &str, start: usize) {
        let lines = LineRange::open(start);
        match self.entries.iter_mut().find(|m| m.name == name) {
            Some(m) => m.lines = lines,
            None => self.entries.push(Method {
                name: name.to_string(),
                lines,
            }),
        }
    }

    /// Close a method's range. Unknown names are ignored.
    pub fn set_end(&mut self, name: &str, end: usize) {
        if let Some(m) = self.entries.iter_mut().find(|m| m.name == name) {
            m.lines.end = Some(end);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.entries.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose closed end line lies before their start line
    pub fn prune_malformed(&mut self) {
        self.entries.retain(|m| !m.lines.is_malformed());
    }
}

/// A class discovered by the scanner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassDef {
    /// Name of the module the class was found in
    pub module: String,

    /// Declared name
    pub name: String,

    /// Source file label
    pub file: String,

    /// Ordered superclass references from the base list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<BaseRef>,

    /// Methods defined one indentation level inside the class body
    #[serde(default, skip_serializing_if = "MethodMap::is_empty")]
    pub methods: MethodMap,

    /// Line range of the definition
    pub lines: LineRange,
}

impl ClassDef {
    pub fn new(module: &str, name: &str, bases: Vec<BaseRef>, file: &str, start: usize) -> Self {
        Self {
            module: module.to_string(),
            name: name.to_string(),
            file: file.to_string(),
            bases,
            methods: MethodMap::new(),
            lines: LineRange::open(start),
        }
    }

    pub fn add_method(&mut self, name: &str, start: usize) {
        self.methods.add(name, start);
    }
}

/// Any top-level definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    Function(FunctionDef),
    Class(ClassDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Function(f) => &f.name,
            Definition::Class(c) => &c.name,
        }
    }

    pub fn lines(&self) -> LineRange {
        match self {
            Definition::Function(f) => f.lines,
            Definition::Class(c) => c.lines,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDef> {
        match self {
            Definition::Class(c) => Some(c),
            Definition::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDef> {
        match self {
            Definition::Function(f) => Some(f),
            Definition::Class(_) => None,
        }
    }
}

// ============================================================================
// Outline (top-level registry)
// ============================================================================

/// The result of scanning one module: top-level definitions in source
/// order, keyed by name with last-write-wins overwrite semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Outline {
    defs: Vec<Definition>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition. A name collision replaces the earlier entry in
    /// place, keeping its original position.
    pub fn insert(&mut self, def: Definition) {
        match self.defs.iter_mut().find(|d| d.name() == def.name()) {
            Some(slot) => *slot = def,
            None => self.defs.push(def),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.defs.iter().find(|d| d.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.defs.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.iter().map(|d| d.name())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl IntoIterator for Outline {
    type Item = Definition;
    type IntoIter = std::vec::IntoIter<Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.into_iter()
    }
}

// ============================================================================
// Module index (cross-module lookup)
// ============================================================================

/// Read-only mapping from module name to that module's outline, used to
/// resolve dotted superclass references against previously scanned modules.
/// The scanner never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleIndex {
    modules: BTreeMap<String, Outline>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: impl Into<String>, outline: Outline) {
        self.modules.insert(module.into(), outline);
    }

    pub fn get(&self, module: &str) -> Option<&Outline> {
        self.modules.get(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&String, &Outline)> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_range_states() {
        let open = LineRange::open(4);
        assert!(!open.is_closed());
        assert!(!open.is_malformed());

        let closed = LineRange {
            start: 4,
            end: Some(9),
        };
        assert!(closed.is_closed());
        assert!(!closed.is_malformed());

        let inverted = LineRange {
            start: 4,
            end: Some(2),
        };
        assert!(inverted.is_malformed());
    }

    #[test]
    fn test_outline_insert_preserves_order() {
        let mut outline = Outline::new();
        outline.insert(Definition::Function(FunctionDef::new("m", "b", "m.py", 1)));
        outline.insert(Definition::Function(FunctionDef::new("m", "a", "m.py", 3)));
        outline.insert(Definition::Class(ClassDef::new("m", "C", vec![], "m.py", 5)));

        let names: Vec<&str> = outline.names().collect();
        assert_eq!(names, vec!["b", "a", "C"]);
    }

    #[test]
    fn test_outline_overwrite_keeps_position() {
        let mut outline = Outline::new();
        outline.insert(Definition::Function(FunctionDef::new("m", "f", "m.py", 1)));
        outline.insert(Definition::Function(FunctionDef::new("m", "g", "m.py", 3)));
        outline.insert(Definition::Function(FunctionDef::new("m", "f", "m.py", 5)));

        let names: Vec<&str> = outline.names().collect();
        assert_eq!(names, vec!["f", "g"]);
        assert_eq!(outline.get("f").unwrap().lines().start, 5);
    }

    #[test]
    fn test_method_map_overwrite_resets_end() {
        let mut methods = MethodMap::new();
        methods.add("run", 2);
        methods.set_end("run", 4);
        assert_eq!(methods.get("run").unwrap().lines.end, Some(4));

        methods.add("run", 6);
        assert_eq!(methods.get("run").unwrap().lines.start, 6);
        assert_eq!(methods.get("run").unwrap().lines.end, None);
        assert_eq!(methods.len(), 1);
    }

    #[test]
    fn test_method_map_prune_malformed() {
        let mut methods = MethodMap::new();
        methods.add("ok", 2);
        methods.set_end("ok", 3);
        methods.add("bad", 9);
        methods.set_end("bad", 1);
        methods.prune_malformed();

        assert!(methods.get("ok").is_some());
        assert!(methods.get("bad").is_none());
    }

    #[test]
    fn test_base_ref_display() {
        assert_eq!(BaseRef::Name("C".into()).display_name(), "C");
        assert_eq!(BaseRef::Local("A".into()).display_name(), "A");
        assert_eq!(
            BaseRef::External {
                module: "other".into(),
                name: "Base".into()
            }
            .display_name(),
            "other.Base"
        );
        assert!(!BaseRef::Name("C".into()).is_resolved());
        assert!(BaseRef::Local("A".into()).is_resolved());
    }

    #[test]
    fn test_module_index_lookup() {
        let mut outline = Outline::new();
        outline.insert(Definition::Class(ClassDef::new(
            "other", "Base", vec![], "other.py", 1,
        )));

        let mut index = ModuleIndex::new();
        index.insert("other", outline);

        assert!(index.get("other").unwrap().contains("Base"));
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_definition_serializes_with_kind_tag() {
        let def = Definition::Function(FunctionDef::new("m", "f", "m.py", 1));
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["kind"], "function");
        assert_eq!(json["lines"]["start"], 1);
        // open end is omitted entirely
        assert!(json["lines"].get("end").is_none());
    }
}
