// Run with:  cargo bench --bench set_pixel

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use flipdot_framebuffer::PixelBuffer;
use std::hint::black_box;

const WIDTH: usize = 84;
const HEIGHT: usize = 7;

fn set_pixel(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_pixel");
    group.throughput(Throughput::Elements((WIDTH * HEIGHT) as u64));

    group.bench_function("pixel_buffer", |b| {
        let mut buf = PixelBuffer::new(WIDTH, HEIGHT);

        b.iter(|| {
            for x in 0..WIDTH {
                for y in 0..HEIGHT {
                    black_box(&mut buf)
                        .set_pixel(black_box(x), black_box(y), black_box((x + y) % 2 == 0))
                        .unwrap();
                }
            }
        });
    });

    group.bench_function("get_pixel", |b| {
        let mut buf = PixelBuffer::new(WIDTH, HEIGHT);
        buf.fill(true);

        b.iter(|| {
            let mut set = 0;
            for x in 0..WIDTH {
                for y in 0..HEIGHT {
                    if black_box(&buf).get_pixel(x, y).unwrap() {
                        set += 1;
                    }
                }
            }
            black_box(set)
        });
    });

    group.finish();
}

criterion_group!(benches, set_pixel);
criterion_main!(benches);
