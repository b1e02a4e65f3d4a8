//! Plain-text rendering of scan results
//!
//! A compact, line-oriented listing: classes with their methods indented
//! beneath them, functions with their ranges. Unknown end lines render
//! as `?` rather than being hidden.

use std::fmt::Write;

use pyfold_outline::{Definition, LineRange, Outline};

fn range(lines: LineRange) -> String {
    match lines.end {
        Some(end) => format!("{}-{}", lines.start, end),
        None => format!("{}-?", lines.start),
    }
}

/// Render an outline as indented text, one definition per line
pub fn render_outline(outline: &Outline) -> String {
    let mut out = String::new();
    for def in outline.iter() {
        match def {
            Definition::Class(class) => {
                let _ = writeln!(out, "class {} {}", class.name, range(class.lines));
                for method in class.methods.iter() {
                    let _ = writeln!(out, "    {} {}", method.name, range(method.lines));
                }
            }
            Definition::Function(func) => {
                let _ = writeln!(out, "def {} {}", func.name, range(func.lines));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfold_outline::{scan_source, ModuleIndex};

    #[test]
    fn test_render_lists_classes_methods_and_functions() {
        let source = "class A:\n    def m(self):\n        pass\n\ndef f():\n    pass\n";
        let outline = scan_source(source, "mod", "mod.py", &ModuleIndex::new());
        let text = render_outline(&outline);
        assert_eq!(text, "class A 1-3\n    m 2-3\ndef f 5-6\n");
    }

    #[test]
    fn test_render_marks_unknown_ends() {
        use pyfold_outline::{ClassDef, Definition, Outline};
        let mut outline = Outline::new();
        outline.insert(Definition::Class(ClassDef::new(
            "mod",
            "A",
            vec![],
            "mod.py",
            1,
        )));
        let text = render_outline(&outline);
        assert_eq!(text, "class A 1-?\n");
    }

    #[test]
    fn test_render_empty_outline() {
        let outline = scan_source("x = 1\n", "mod", "mod.py", &ModuleIndex::new());
        assert!(render_outline(&outline).is_empty());
    }
}
