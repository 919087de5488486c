// SPDX-License-Identifier: PMPL-1.0-or-later
//! Benchmarks for the scan pipeline

use a11y_lens::config::Config;
use a11y_lens::contrast;
use a11y_lens::overlay::OverlayManager;
use a11y_lens::scanner::Scanner;
use a11y_lens::tree::{NodeId, Rect, SnapshotTree, TreeBuilder};
use a11y_lens::walker;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A page of `sections` sections, each with a heading, an image, a paragraph and a link
fn synthetic_page(sections: usize) -> (SnapshotTree, NodeId) {
    let mut b = TreeBuilder::new("html");
    b.attr(b.root(), "lang", "en");
    let head = b.element(b.root(), "head");
    let title = b.element(head, "title");
    b.text(title, "Catalogue");

    let body = b.element(b.root(), "body");
    b.background(body, "#ffffff").color(body, "#222222");

    let mut last_paragraph = body;
    for i in 0..sections {
        let y = i as f64 * 400.0;
        let section = b.element(body, "section");
        let h2 = b.element(section, "h2");
        b.text(h2, "Section");

        let img = b.element(section, "img");
        b.attr(img, "src", "photo.jpg").rect(img, Rect::new(0.0, y, 300.0, 200.0));
        if i % 3 == 0 {
            b.attr(img, "alt", "Product photo");
        }

        let p = b.element(section, "p");
        b.color(p, if i % 2 == 0 { "#767676" } else { "#999999" });
        b.text(p, "Lorem ipsum dolor sit amet");
        last_paragraph = p;

        let a = b.element(section, "a");
        b.attr(a, "href", "/item").rect(a, Rect::new(0.0, y + 220.0, 120.0, 20.0));
        b.text(a, if i % 4 == 0 { "read more" } else { "View product details" });
    }

    (b.build(), last_paragraph)
}

fn bench_walk(c: &mut Criterion) {
    let (tree, _) = synthetic_page(500);

    c.bench_function("walk_500_sections", |b| {
        b.iter(|| walker::walk(black_box(&tree), |node| {
            black_box(node);
        }))
    });
}

fn bench_scan(c: &mut Criterion) {
    let (tree, _) = synthetic_page(500);
    let scanner = Scanner::new(Config::default()).unwrap();

    c.bench_function("scan_500_sections", |b| b.iter(|| scanner.scan(black_box(&tree))));
}

fn bench_contrast(c: &mut Criterion) {
    let (tree, paragraph) = synthetic_page(50);

    c.bench_function("contrast_ratio", |b| {
        b.iter(|| contrast::ratio(black_box(&tree), black_box(paragraph)))
    });
}

fn bench_render_overlays(c: &mut Criterion) {
    let (tree, _) = synthetic_page(500);
    let report = Scanner::new(Config::default()).unwrap().scan(&tree);
    let mut manager = OverlayManager::default();

    c.bench_function("render_overlays", |b| {
        b.iter(|| manager.render(black_box(&tree), black_box(&report.issues)))
    });
}

criterion_group!(benches, bench_walk, bench_scan, bench_contrast, bench_render_overlays);
criterion_main!(benches);
