//! Fold-Range Computation
//!
//! Turns a scanned outline into the line ranges an editor would collapse:
//! one range per top-level function and one per method. Classes
//! themselves stay visible so their method signatures remain browsable
//! when everything is folded.

use serde::Serialize;

use pyfold_outline::{Definition, LineRange, Outline};

/// A 1-based inclusive range of lines to collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldRange {
    pub start: usize,
    pub end: usize,
}

/// Compute fold ranges for an outline.
///
/// Ranges whose end is unknown (the stream ended before the block closed)
/// are skipped, and ends past `line_count` are clamped to it, so the
/// result is always addressable in a buffer of `line_count` lines.
pub fn fold_ranges(outline: &Outline, line_count: usize) -> Vec<FoldRange> {
    let mut folds = Vec::new();
    for def in outline.iter() {
        match def {
            Definition::Class(class) => {
                for method in class.methods.iter() {
                    push_fold(&mut folds, method.lines, line_count);
                }
            }
            Definition::Function(func) => push_fold(&mut folds, func.lines, line_count),
        }
    }
    folds
}

fn push_fold(folds: &mut Vec<FoldRange>, lines: LineRange, line_count: usize) {
    let Some(end) = lines.end else {
        return;
    };
    let end = end.min(line_count);
    if end >= lines.start {
        folds.push(FoldRange {
            start: lines.start,
            end,
        });
    }
}
