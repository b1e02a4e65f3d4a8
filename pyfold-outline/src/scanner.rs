//! Structural Scanner
//!
//! Single-pass reconstruction of a module's class/function nesting from a
//! token stream — no grammar, no semantic analysis. The scanner watches
//! for `def`/`class` names, tracks open blocks on an indentation stack,
//! and infers where each block's body ends from dedents and from the
//! position of the next sibling definition, correcting for trailing blank
//! lines so a block ends on its last content line.
//!
//! The scan never aborts on malformed input. A `def`/`class` not followed
//! by a plain name is skipped; a stream that ends mid-construct leaves the
//! affected end lines unknown. Best-effort structural reconstruction is
//! the contract: the buffer being scanned may be mid-edit.
//!
//! Known limits, inherited from the token-only approach: comments,
//! decorators and strings directly above a definition are attributed to
//! the previous definition's body.

use tracing::debug;

use crate::model::{BaseRef, ClassDef, Definition, FunctionDef, ModuleIndex, Outline};
use crate::token::{Token, TokenKind, Tokenizer, TokenizerOptions};

/// Scan a token stream into the module's top-level outline.
///
/// `index` supplies outlines of previously scanned modules for dotted
/// superclass resolution; it is only read. The scan is infallible by
/// type: whatever structure could be recovered is returned.
pub fn scan<I>(tokens: I, module: &str, file: &str, index: &ModuleIndex) -> Outline
where
    I: IntoIterator<Item = Token>,
{
    Scanner::new(module, file, index).run(tokens.into_iter())
}

/// Tokenize `source` and scan it in one step
pub fn scan_source(source: &str, module: &str, file: &str, index: &ModuleIndex) -> Outline {
    scan(Tokenizer::new(source), module, file, index)
}

/// As [`scan_source`], with tokenizer options
pub fn scan_source_with_options(
    source: &str,
    module: &str,
    file: &str,
    index: &ModuleIndex,
    options: TokenizerOptions,
) -> Outline {
    scan(Tokenizer::with_options(source, options), module, file, index)
}

/// Handle into the per-scan class arena
type ClassId = usize;
/// Handle into the per-scan function arena
type FuncId = usize;

/// What a stack frame belongs to.
///
/// Only `Class` frames receive a coarse end line when popped by a dedent;
/// `Function` frames record that a top-level function opened the block
/// (its end is managed through the pending slot alone), and `Plain` marks
/// methods and nested defs, which have no object of their own to close.
#[derive(Debug, Clone, Copy)]
enum FrameOwner {
    Plain,
    Class(ClassId),
    Function(FuncId),
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    owner: FrameOwner,
    indent: usize,
}

/// The "most recently opened, still unclosed" slots. At most one of each
/// is populated at any instant; finalizing clears whichever are set.
#[derive(Debug, Default)]
struct Pending {
    function: Option<FuncId>,
    class: Option<ClassId>,
    method: Option<(ClassId, String)>,
}

/// Top-level registry slot, pointing into one of the arenas
#[derive(Debug, Clone, Copy)]
enum Slot {
    Function(FuncId),
    Class(ClassId),
}

/// Outcome of handling one stream token
enum Step {
    /// Proceed; blank-line bookkeeping applies to this token kind
    Token(TokenKind),
    /// Malformed construct skipped; bookkeeping untouched
    Skip,
    /// Stream ended inside a construct
    Eof,
}

struct Scanner<'a> {
    module: &'a str,
    file: &'a str,
    index: &'a ModuleIndex,
    classes: Vec<ClassDef>,
    functions: Vec<FunctionDef>,
    /// Top-level names in source order; re-declaration replaces in place
    toplevel: Vec<(String, Slot)>,
    stack: Vec<Frame>,
    pending: Pending,
    /// Most recently opened class at any depth, for sibling closes
    current_class: Option<ClassId>,
    /// Consecutive blank lines since the last content token
    blank_run: usize,
}

impl<'a> Scanner<'a> {
    fn new(module: &'a str, file: &'a str, index: &'a ModuleIndex) -> Self {
        Self {
            module,
            file,
            index,
            classes: Vec::new(),
            functions: Vec::new(),
            toplevel: Vec::new(),
            stack: Vec::new(),
            pending: Pending::default(),
            current_class: None,
            blank_run: 0,
        }
    }

    fn run<I>(mut self, mut tokens: I) -> Outline
    where
        I: Iterator<Item = Token>,
    {
        let mut last_line = 0;
        while let Some(tok) = tokens.next() {
            last_line = tok.end_line;
            let step = match (tok.kind, tok.text.as_str()) {
                (TokenKind::Dedent, _) => {
                    self.close_frames(tok.line, tok.col);
                    Step::Token(TokenKind::Dedent)
                }
                (TokenKind::Name, "def") => self.on_def(&tok, &mut tokens),
                (TokenKind::Name, "class") => self.on_class(&tok, &mut tokens),
                (kind, _) => Step::Token(kind),
            };
            match step {
                Step::Token(kind) => self.note_blanks(kind),
                Step::Skip => {}
                Step::Eof => break,
            }
        }
        // close whatever is still open, measured from one line past the
        // last token; the lexer reports the end marker on the last
        // physical line, so a normally terminated stream closes pending
        // definitions on their last content line, and a truncated one
        // closes them on the last line it reached
        self.finalize_pending(last_line + 1);
        self.into_outline()
    }

    /// Coarse close: pop every frame at or inside `indent`, stamping the
    /// dedent's own line on popped class owners. Popped frames are never
    /// revisited; refinement only ever applies to still-pending slots.
    fn close_frames(&mut self, line: usize, indent: usize) {
        while let Some(top) = self.stack.last() {
            if top.indent < indent {
                break;
            }
            if let FrameOwner::Class(id) = top.owner {
                self.classes[id].lines.end = Some(line);
            }
            self.stack.pop();
        }
    }

    /// Refined close: stamp `line − 1 − blankRun` on every pending slot,
    /// so trailing blank lines are not counted into the closing body.
    fn finalize_pending(&mut self, line: usize) {
        let end = line.saturating_sub(1).saturating_sub(self.blank_run);
        if let Some(id) = self.pending.function.take() {
            self.functions[id].lines.end = Some(end);
        }
        if let Some(id) = self.pending.class.take() {
            self.classes[id].lines.end = Some(end);
        }
        if let Some((id, name)) = self.pending.method.take() {
            self.classes[id].methods.set_end(&name, end);
        }
    }

    fn on_def<I>(&mut self, tok: &Token, tokens: &mut I) -> Step
    where
        I: Iterator<Item = Token>,
    {
        let lineno = tok.line;
        let indent = tok.col;
        self.close_frames(lineno, indent);

        let Some(name_tok) = tokens.next() else {
            return Step::Eof;
        };
        if name_tok.kind != TokenKind::Name {
            // syntax error after `def`: skip the construct, leave the
            // stack depth untouched
            return Step::Skip;
        }
        let name = name_tok.text;

        if let Some(top) = self.stack.last() {
            self.current_class = match top.owner {
                FrameOwner::Class(id) => Some(id),
                _ => None,
            };
            if let Some(id) = self.current_class {
                // one level inside a class body: a method
                self.classes[id].add_method(&name, lineno);
                self.finalize_pending(lineno);
                self.pending.method = Some((id, name));
            }
            // otherwise a nested def: tracked for depth only
            self.stack.push(Frame {
                owner: FrameOwner::Plain,
                indent,
            });
        } else {
            let id = self.functions.len();
            self.functions
                .push(FunctionDef::new(self.module, &name, self.file, lineno));
            self.register(name, Slot::Function(id));
            self.finalize_pending(lineno);
            if let Some(class_id) = self.current_class.take() {
                // a sibling def directly closes the previously open class
                self.classes[class_id].lines.end =
                    Some(lineno.saturating_sub(1).saturating_sub(self.blank_run));
            }
            self.pending.function = Some(id);
            self.stack.push(Frame {
                owner: FrameOwner::Function(id),
                indent,
            });
        }
        Step::Token(TokenKind::Name)
    }

    fn on_class<I>(&mut self, tok: &Token, tokens: &mut I) -> Step
    where
        I: Iterator<Item = Token>,
    {
        let lineno = tok.line;
        let indent = tok.col;
        self.close_frames(lineno, indent);

        let Some(name_tok) = tokens.next() else {
            return Step::Eof;
        };
        if name_tok.kind != TokenKind::Name {
            return Step::Skip;
        }
        let name = name_tok.text;

        // parse what follows the class name
        let Some(after) = tokens.next() else {
            return Step::Eof;
        };
        let mut bases = Vec::new();
        let mut last_kind = after.kind;
        if after.text == "(" {
            match self.parse_bases(tokens, &mut bases) {
                Some(kind) => last_kind = kind,
                None => return Step::Eof,
            }
        }

        self.finalize_pending(lineno);
        if let Some(class_id) = self.current_class {
            self.classes[class_id].lines.end =
                Some(lineno.saturating_sub(1).saturating_sub(self.blank_run));
        }

        let id = self.classes.len();
        self.classes
            .push(ClassDef::new(self.module, &name, bases, self.file, lineno));
        self.pending.class = Some(id);
        self.current_class = Some(id);
        if self.stack.is_empty() {
            self.register(name, Slot::Class(id));
        }
        self.stack.push(Frame {
            owner: FrameOwner::Class(id),
            indent,
        });
        Step::Token(last_kind)
    }

    /// Accumulate the parenthesized base list. Comma-separated segments at
    /// nesting level 1 are joined from their name/operator tokens into a
    /// dotted name and resolved; entries that are arbitrary expressions
    /// degrade to whatever text was collected. Returns the kind of the
    /// closing token, or `None` if the stream ended first.
    fn parse_bases<I>(&mut self, tokens: &mut I, bases: &mut Vec<BaseRef>) -> Option<TokenKind>
    where
        I: Iterator<Item = Token>,
    {
        let mut level = 1usize;
        let mut segment: Vec<String> = Vec::new();
        loop {
            let tok = tokens.next()?;
            let text = tok.text.as_str();
            if (text == ")" || text == ",") && level == 1 {
                let joined = segment.concat();
                segment.clear();
                if !joined.is_empty() {
                    bases.push(self.resolve_base(joined));
                }
            }
            if text == "(" {
                level += 1;
            } else if text == ")" {
                level -= 1;
                if level == 0 {
                    return Some(tok.kind);
                }
            } else if text == "," && level == 1 {
                // segment boundary, flushed above
            } else if level == 1 && matches!(tok.kind, TokenKind::Name | TokenKind::Op) {
                segment.push(tok.text);
            }
            // tokens inside nested parens contribute nothing to the name
        }
    }

    /// Resolution order: current scan's registry, then `module.leaf`
    /// against the supplied index, then the raw text
    fn resolve_base(&self, joined: String) -> BaseRef {
        if self.contains_toplevel(&joined) {
            return BaseRef::Local(joined);
        }
        if let Some(dot) = joined.rfind('.') {
            let leaf = &joined[dot + 1..];
            let module = joined[..dot].rsplit('.').next().unwrap_or_default();
            if let Some(outline) = self.index.get(module) {
                if outline.contains(leaf) {
                    return BaseRef::External {
                        module: module.to_string(),
                        name: leaf.to_string(),
                    };
                }
            }
        }
        BaseRef::Name(joined)
    }

    fn contains_toplevel(&self, name: &str) -> bool {
        self.toplevel.iter().any(|(n, _)| n == name)
    }

    fn register(&mut self, name: String, slot: Slot) {
        match self.toplevel.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = slot,
            None => self.toplevel.push((name, slot)),
        }
    }

    fn note_blanks(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::Nl => self.blank_run += 1,
            // structural tokens neither start nor break a blank run
            TokenKind::Indent | TokenKind::Dedent | TokenKind::EndMarker => {}
            _ => self.blank_run = 0,
        }
    }

    fn into_outline(self) -> Outline {
        let Scanner {
            classes,
            functions,
            toplevel,
            ..
        } = self;
        let mut outline = Outline::new();
        let mut dropped = 0usize;
        for (_, slot) in toplevel {
            let def = match slot {
                Slot::Function(id) => Definition::Function(functions[id].clone()),
                Slot::Class(id) => {
                    let mut class = classes[id].clone();
                    class.methods.prune_malformed();
                    Definition::Class(class)
                }
            };
            // a closed end before the start marks the definition malformed
            if def.lines().is_malformed() {
                dropped += 1;
                continue;
            }
            outline.insert(def);
        }
        debug!(
            definitions = outline.len(),
            dropped, "structural scan complete"
        );
        outline
    }
}
