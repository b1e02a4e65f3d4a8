//! Benchmarks for the structural scanner
//!
//! Tracks the cost of a full tokenize-and-scan pass over synthetic modules
//! of increasing size. Run with: `cargo bench --bench scan`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pyfold_outline::{scan_source, tokenize, ModuleIndex};

/// Build a module with `classes` classes of `methods` methods each,
/// separated by blank lines, plus a handful of top-level functions.
fn synthetic_module(classes: usize, methods: usize) -> String {
    let mut src = String::new();
    for c in 0..classes {
        src.push_str(&format!("class Widget{c}(Base{c}):\n"));
        src.push_str("    \"\"\"Synthetic widget.\"\"\"\n\n");
        for m in 0..methods {
            src.push_str(&format!("    def method_{m}(self, value):\n"));
            src.push_str("        total = value + 1\n");
            src.push_str("        return total\n\n");
        }
    }
    for f in 0..classes {
        src.push_str(&format!("def helper_{f}(arg):\n"));
        src.push_str("    return arg * 2\n\n");
    }
    src
}

fn bench_tokenize(c: &mut Criterion) {
    let source = synthetic_module(20, 8);
    c.bench_function("tokenize_medium_module", |b| {
        b.iter(|| tokenize(black_box(&source)))
    });
}

fn bench_scan_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_source");
    let index = ModuleIndex::new();
    for classes in [5usize, 20, 80] {
        let source = synthetic_module(classes, 8);
        group.bench_with_input(
            BenchmarkId::from_parameter(classes),
            &source,
            |b, source| {
                b.iter(|| scan_source(black_box(source), "bench", "bench.py", &index));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_scan_source);
criterion_main!(benches);
