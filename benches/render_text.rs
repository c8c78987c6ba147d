// Run with:  cargo bench --bench render_text

use criterion::{criterion_group, criterion_main, Criterion};
use flipdot_framebuffer::font::{FontId, GlyphRenderer, NarrowFont};
use flipdot_framebuffer::PixelBuffer;
use std::hint::black_box;

fn render_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_text");
    let font = NarrowFont::new();

    group.bench_function("variable", |b| {
        b.iter(|| {
            font.render(black_box("Hello, flip-dot world!"), FontId::Variable)
                .unwrap()
        });
    });

    group.bench_function("mono", |b| {
        b.iter(|| font.render(black_box("12:34:56"), FontId::Mono).unwrap());
    });

    group.bench_function("render_and_blit", |b| {
        let mut canvas = PixelBuffer::new(84, 7);
        b.iter(|| {
            let text = font.render(black_box("Grüße ♥"), FontId::Variable).unwrap();
            canvas.fill(false);
            canvas.copy_buffer(&text, 10, 0);
            black_box(&canvas);
        });
    });

    group.finish();
}

criterion_group!(benches, render_text);
criterion_main!(benches);
