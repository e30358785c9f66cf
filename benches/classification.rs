use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use spice_scan::{classify, classify_debug, ClassifierConfig};

/// 640x480 frame with an elongated red body on a dark background
fn synthetic_frame() -> RgbImage {
    let mut image = RgbImage::from_pixel(640, 480, Rgb([20, 20, 20]));
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let (dx, dy) = ((x as f64 - 320.0) / 220.0, (y as f64 - 240.0) / 70.0);
        if dx * dx + dy * dy <= 1.0 {
            *pixel = Rgb([200, 69, 43]);
        }
    }
    image
}

fn benchmark_classification(c: &mut Criterion) {
    let frame = synthetic_frame();
    let config = ClassifierConfig::default();

    c.bench_function("classify_640x480", |b| {
        b.iter(|| classify(black_box(&frame)))
    });

    c.bench_function("classify_debug_640x480", |b| {
        b.iter(|| classify_debug(black_box(&frame), &config))
    });
}

criterion_group!(benches, benchmark_classification);
criterion_main!(benches);
