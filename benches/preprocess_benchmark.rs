use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use palyno::{preprocess_image, top_predictions, ClassMapping};
use std::io::Cursor;

fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn bench_preprocessing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Preprocessing");

    // Configure sampling
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // Thumbnail-sized upload
    let small = encode_png(64, 64);
    group.bench_function("thumbnail_64", |b| {
        b.iter(|| preprocess_image(black_box(&small)).unwrap())
    });

    // Typical camera upload
    let medium = encode_png(1024, 768);
    group.bench_function("camera_1024", |b| {
        b.iter(|| preprocess_image(black_box(&medium)).unwrap())
    });

    // Oversized upload that gets stretched down hard
    let large = encode_png(2560, 1920);
    group.bench_function("large_2560", |b| {
        b.iter(|| preprocess_image(black_box(&large)).unwrap())
    });

    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ranking");
    group.sample_size(50);

    let class_counts = [10usize, 100, 1000];
    for &count in &class_counts {
        let entries: Vec<String> = (0..count)
            .map(|i| format!("\"{}\": \"class name {}\"", i, i))
            .collect();
        let mapping = ClassMapping::from_json(&format!("{{{}}}", entries.join(", "))).unwrap();
        let scores: Vec<f32> = (0..count).map(|i| ((i * 37) % 100) as f32 / 100.0).collect();

        group.bench_function(format!("classes_{}", count), |b| {
            b.iter(|| top_predictions(black_box(&scores), &mapping, 3))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_preprocessing, bench_ranking);
criterion_main!(benches);
