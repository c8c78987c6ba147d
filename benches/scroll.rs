// Run with:  cargo bench --bench scroll

use criterion::{criterion_group, criterion_main, Criterion};
use flipdot_framebuffer::PixelBuffer;
use std::hint::black_box;

fn checkerboard(width: usize, height: usize) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    for x in 0..width {
        for y in 0..height {
            buf.set_pixel(x, y, (x + y) % 2 == 0).unwrap();
        }
    }
    buf
}

fn scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");

    for (name, dx, dy) in [("left", -1, 0), ("right", 1, 0), ("up", 0, -1), ("down", 0, 1)] {
        group.bench_function(name, |b| {
            let mut buf = checkerboard(84, 7);
            b.iter(|| black_box(&mut buf).scroll(black_box(dx), black_box(dy)));
        });
    }

    group.bench_function("copy_buffer_strip", |b| {
        let strip = checkerboard(84, 24);
        let mut buf = PixelBuffer::new(84, 7);
        b.iter(|| {
            for top in 0..16 {
                black_box(&mut buf).copy_buffer(black_box(&strip), 0, -top);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, scroll);
criterion_main!(benches);
