//! Tokenizer Adapter
//!
//! A line-based lexer that turns Python source text into the token stream
//! the structural scanner consumes. The contract mirrors the standard
//! `tokenize` module of the language runtime: names, operators, numbers,
//! strings and comments, plus the structural tokens — logical newline,
//! non-logical newline (blank/bracketed/comment-only lines), indent,
//! dedent and a final end marker.
//!
//! The lexer never fails. Unterminated strings are consumed to end of
//! line or stream, inconsistent dedents fall back to the nearest enclosing
//! level, and unrecognized bytes come out as one-character operator
//! tokens. A transiently invalid buffer mid-edit still produces a stream.
//!
//! End-of-stream contract (the scanner's cleanup step relies on this):
//! trailing dedents and the end marker are reported on the last physical
//! line of the source.

use std::collections::VecDeque;

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Name,
    /// Operator or punctuation
    Op,
    /// Numeric literal (consumed best-effort, never inspected downstream)
    Number,
    /// String literal, including prefix and quotes; may span lines
    Str,
    /// Comment text from `#` to end of line
    Comment,
    /// Logical newline: the line carried a statement
    Newline,
    /// Non-logical newline: blank line, comment-only line, or a physical
    /// newline inside open brackets
    Nl,
    /// Indentation increased at the start of a logical line
    Indent,
    /// Indentation decreased; one token per level popped
    Dedent,
    /// End of stream
    EndMarker,
}

/// A single token with its source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Start line (1-based)
    pub line: usize,
    /// Start column (0-based, in characters)
    pub col: usize,
    /// Line on which the token ends (1-based; differs from `line` only for
    /// multi-line strings)
    pub end_line: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        line: usize,
        col: usize,
        end_line: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            col,
            end_line,
        }
    }
}

/// Tokenizer configuration
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOptions {
    /// Column width of a tab stop when measuring indentation
    pub tab_size: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self { tab_size: 8 }
    }
}

/// Tokenize a whole source text into a vector
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

/// Streaming lexer over source lines
pub struct Tokenizer {
    lines: Vec<Vec<char>>,
    row: usize,
    col: usize,
    /// Expanded-column indent stack, seeded with level 0
    indents: Vec<usize>,
    /// Open bracket depth; newlines inside brackets are non-logical
    depth: usize,
    queue: VecDeque<Token>,
    at_line_start: bool,
    finished: bool,
    tab_size: usize,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self::with_options(source, TokenizerOptions::default())
    }

    pub fn with_options(source: &str, options: TokenizerOptions) -> Self {
        Self {
            lines: source.lines().map(|l| l.chars().collect()).collect(),
            row: 0,
            col: 0,
            indents: vec![0],
            depth: 0,
            queue: VecDeque::new(),
            at_line_start: true,
            finished: false,
            tab_size: options.tab_size,
        }
    }

    /// Number of physical lines in the source
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn handle_line_start(&mut self) {
        let row = self.row;
        let lineno = row + 1;
        let (width, idx) = measure_indent(&self.lines[row], self.tab_size);
        let line_len = self.lines[row].len();

        if idx >= line_len {
            // blank line: no indent processing
            self.queue
                .push_back(Token::new(TokenKind::Nl, "\n", lineno, idx, lineno));
            self.row += 1;
            self.col = 0;
            return;
        }

        if self.lines[row][idx] == '#' {
            // comment-only line: no indent processing either
            let text: String = self.lines[row][idx..].iter().collect();
            self.queue
                .push_back(Token::new(TokenKind::Comment, text, lineno, idx, lineno));
            self.queue
                .push_back(Token::new(TokenKind::Nl, "\n", lineno, line_len, lineno));
            self.row += 1;
            self.col = 0;
            return;
        }

        let top = *self.indents.last().unwrap_or(&0);
        if width > top {
            let ws: String = self.lines[row][..idx].iter().collect();
            self.indents.push(width);
            self.queue
                .push_back(Token::new(TokenKind::Indent, ws, lineno, 0, lineno));
        } else if width < top {
            while self.indents.last().is_some_and(|&t| t > width) {
                self.indents.pop();
                self.queue
                    .push_back(Token::new(TokenKind::Dedent, "", lineno, idx, lineno));
            }
            // a level that matches no enclosing indent is tolerated: the
            // line joins the nearest enclosing block
        }
        self.col = idx;
        self.at_line_start = false;
    }

    /// Lex one token from the current position. Returns `None` when the
    /// position advanced without producing a token (backslash continuation).
    fn lex(&mut self) -> Option<Token> {
        let row = self.row;
        let lineno = row + 1;
        let line_len = self.lines[row].len();

        // inter-token whitespace
        while self.col < line_len {
            let c = self.lines[row][self.col];
            if c == ' ' || c == '\t' || c == '\x0c' {
                self.col += 1;
            } else {
                break;
            }
        }

        if self.col >= line_len {
            let kind = if self.depth > 0 {
                TokenKind::Nl
            } else {
                TokenKind::Newline
            };
            let tok = Token::new(kind, "\n", lineno, line_len, lineno);
            self.row += 1;
            self.col = 0;
            self.at_line_start = true;
            return Some(tok);
        }

        let c = self.lines[row][self.col];

        // explicit line join: no token, the logical line continues
        if c == '\\' && self.col + 1 == line_len {
            self.row += 1;
            self.col = 0;
            return None;
        }

        if c == '#' {
            let start = self.col;
            let text: String = self.lines[row][start..].iter().collect();
            self.col = line_len;
            return Some(Token::new(TokenKind::Comment, text, lineno, start, lineno));
        }

        if let Some(quote_idx) = self.string_quote(row, self.col) {
            return Some(self.lex_string(quote_idx));
        }

        if c == '_' || c.is_alphabetic() {
            let start = self.col;
            while self.col < line_len {
                let ch = self.lines[row][self.col];
                if ch == '_' || ch.is_alphanumeric() {
                    self.col += 1;
                } else {
                    break;
                }
            }
            let text: String = self.lines[row][start..self.col].iter().collect();
            return Some(Token::new(TokenKind::Name, text, lineno, start, lineno));
        }

        if c.is_ascii_digit() || (c == '.' && self.digit_at(row, self.col + 1)) {
            let start = self.col;
            while self.col < line_len {
                let ch = self.lines[row][self.col];
                if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
                    self.col += 1;
                } else if (ch == '+' || ch == '-')
                    && self.col > start
                    && matches!(self.lines[row][self.col - 1], 'e' | 'E')
                {
                    self.col += 1;
                } else {
                    break;
                }
            }
            let text: String = self.lines[row][start..self.col].iter().collect();
            return Some(Token::new(TokenKind::Number, text, lineno, start, lineno));
        }

        Some(self.lex_op())
    }

    /// If a string literal starts at (row, col), return the index of its
    /// opening quote (past any r/b/u/f prefix)
    fn string_quote(&self, row: usize, col: usize) -> Option<usize> {
        let line = &self.lines[row];
        let mut i = col;
        let mut prefix = 0;
        while i < line.len()
            && prefix < 2
            && matches!(line[i], 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F')
        {
            i += 1;
            prefix += 1;
        }
        if i < line.len() && (line[i] == '"' || line[i] == '\'') {
            Some(i)
        } else {
            None
        }
    }

    fn lex_string(&mut self, qi: usize) -> Token {
        let row0 = self.row;
        let col0 = self.col;
        let lineno = row0 + 1;
        let quote = self.lines[row0][qi];
        let triple = qi + 2 < self.lines[row0].len()
            && self.lines[row0][qi + 1] == quote
            && self.lines[row0][qi + 2] == quote;

        let mut r = row0;
        let mut i = if triple { qi + 3 } else { qi + 1 };
        let (end_row, end_i) = 'outer: loop {
            if r >= self.lines.len() {
                // unterminated at end of stream
                let last = self.lines.len().saturating_sub(1);
                break (last, self.lines.get(last).map_or(0, |l| l.len()));
            }
            let len = self.lines[r].len();
            while i < len {
                let ch = self.lines[r][i];
                if ch == '\\' {
                    if i + 1 >= len {
                        // escaped newline: continue on the next line
                        r += 1;
                        i = 0;
                        continue 'outer;
                    }
                    i += 2;
                    continue;
                }
                if ch == quote {
                    if triple {
                        if i + 2 < len
                            && self.lines[r][i + 1] == quote
                            && self.lines[r][i + 2] == quote
                        {
                            break 'outer (r, i + 3);
                        }
                        i += 1;
                        continue;
                    }
                    break 'outer (r, i + 1);
                }
                i += 1;
            }
            if triple {
                r += 1;
                i = 0;
                continue;
            }
            // unterminated single-quoted string: stop at end of line
            break 'outer (r, len);
        };

        let text = if end_row == row0 {
            self.lines[row0][col0..end_i].iter().collect()
        } else {
            let mut s: String = self.lines[row0][col0..].iter().collect();
            for line in &self.lines[row0 + 1..end_row] {
                s.push('\n');
                s.extend(line.iter());
            }
            s.push('\n');
            s.extend(self.lines[end_row][..end_i].iter());
            s
        };
        self.row = end_row;
        self.col = end_i;
        Token::new(TokenKind::Str, text, lineno, col0, end_row + 1)
    }

    fn lex_op(&mut self) -> Token {
        const OPS3: [&str; 5] = ["**=", "//=", ">>=", "<<=", "..."];
        const OPS2: [&str; 19] = [
            "**", "//", "<<", ">>", "<=", ">=", "==", "!=", "->", ":=", "+=", "-=", "*=", "/=",
            "%=", "@=", "&=", "|=", "^=",
        ];

        let row = self.row;
        let lineno = row + 1;
        let start = self.col;
        let line = &self.lines[row];
        let take = |n: usize| -> String { line[start..(start + n).min(line.len())].iter().collect() };

        let text = {
            let three = take(3);
            if three.chars().count() == 3 && OPS3.contains(&three.as_str()) {
                three
            } else {
                let two = take(2);
                if two.chars().count() == 2 && OPS2.contains(&two.as_str()) {
                    two
                } else {
                    take(1)
                }
            }
        };

        match text.as_str() {
            "(" | "[" | "{" => self.depth += 1,
            ")" | "]" | "}" => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        self.col += text.chars().count();
        Token::new(TokenKind::Op, text, lineno, start, lineno)
    }

    fn digit_at(&self, row: usize, col: usize) -> bool {
        self.lines[row]
            .get(col)
            .is_some_and(|c| c.is_ascii_digit())
    }

    fn emit_eof(&mut self) {
        let last = self.lines.len();
        let dedent_line = last.max(1);
        while self.indents.len() > 1 {
            self.indents.pop();
            self.queue.push_back(Token::new(
                TokenKind::Dedent,
                "",
                dedent_line,
                0,
                dedent_line,
            ));
        }
        self.queue.push_back(Token::new(
            TokenKind::EndMarker,
            "",
            dedent_line,
            0,
            dedent_line,
        ));
        self.finished = true;
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(tok) = self.queue.pop_front() {
                return Some(tok);
            }
            if self.finished {
                return None;
            }
            if self.row >= self.lines.len() {
                self.emit_eof();
                continue;
            }
            if self.at_line_start && self.depth == 0 {
                self.handle_line_start();
                continue;
            }
            if let Some(tok) = self.lex() {
                return Some(tok);
            }
        }
    }
}

/// Measure a line's indentation: (expanded column width, index of the
/// first non-whitespace character)
fn measure_indent(line: &[char], tab_size: usize) -> (usize, usize) {
    let mut width = 0;
    let mut idx = 0;
    for &c in line {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / tab_size + 1) * tab_size,
            '\x0c' => width = 0,
            _ => break,
        }
        idx += 1;
    }
    (width, idx)
}
