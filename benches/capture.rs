use criterion::{criterion_group, criterion_main, Criterion, black_box};

use voxcopy::copy::{capture, codec, CaptureOptions};
use voxcopy::core::IVec3;
use voxcopy::world::{Level, Rank};

fn test_level(size: i32) -> Level {
    Level::flat("bench", size, size, size, size / 2)
}

fn bench_capture_64(c: &mut Criterion) {
    let level = test_level(64);
    let rank = Rank::new("bench", u64::MAX);
    let max = IVec3::splat(63);

    c.bench_function("capture_64", |b| {
        b.iter(|| {
            capture(black_box(&level), &rank, IVec3::ZERO, black_box(max), CaptureOptions::default())
        });
    });
}

fn bench_capture_air_32(c: &mut Criterion) {
    let level = test_level(32);
    let rank = Rank::new("bench", u64::MAX);
    let max = IVec3::splat(31);

    c.bench_function("capture_air_32", |b| {
        b.iter(|| {
            capture(black_box(&level), &rank, max, IVec3::ZERO, CaptureOptions { paste_air: true })
        });
    });
}

fn bench_encode_64(c: &mut Criterion) {
    let level = test_level(64);
    let rank = Rank::new("bench", u64::MAX);
    let buffer = capture(&level, &rank, IVec3::ZERO, IVec3::splat(63), CaptureOptions::default());

    c.bench_function("encode_64", |b| {
        b.iter(|| codec::encode(black_box(&buffer)));
    });
}

fn bench_decode_64(c: &mut Criterion) {
    let level = test_level(64);
    let rank = Rank::new("bench", u64::MAX);
    let buffer = capture(&level, &rank, IVec3::ZERO, IVec3::splat(63), CaptureOptions::default());
    let bytes = match codec::encode(&buffer) {
        Ok(bytes) => bytes,
        Err(e) => panic!("encode failed: {}", e),
    };

    c.bench_function("decode_64", |b| {
        b.iter(|| codec::BufferFormat::Current.decode(black_box(&bytes)));
    });
}

criterion_group!(
    benches,
    bench_capture_64,
    bench_capture_air_32,
    bench_encode_64,
    bench_decode_64,
);
criterion_main!(benches);
