use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rank_otsu_core::{Footprint, GrayImage};
use rank_otsu_filters::{rank_filter, RankOp};

fn synthetic(width: usize, height: usize) -> GrayImage {
    let data = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                let shade = (x * 170 / width) as u32 + 40;
                let ink = (x / 5 + y / 9) % 3 == 0;
                if ink {
                    (shade / 2) as u8
                } else {
                    shade as u8
                }
            })
        })
        .collect();
    GrayImage::from_raw(width, height, data).expect("valid")
}

fn bench_local_otsu(c: &mut Criterion) {
    let img = synthetic(384, 191);
    let mut group = c.benchmark_group("local_otsu");
    for radius in [3u32, 7, 15] {
        let fp = Footprint::disk(radius).expect("disk");
        group.bench_with_input(BenchmarkId::from_parameter(radius), &fp, |b, fp| {
            b.iter(|| rank_filter(black_box(&img.view()), fp, RankOp::Otsu, None))
        });
    }
    group.finish();
}

fn bench_median(c: &mut Criterion) {
    let img = synthetic(384, 191);
    let fp = Footprint::disk(7).expect("disk");
    c.bench_function("median_disk7", |b| {
        b.iter(|| rank_filter(black_box(&img.view()), &fp, RankOp::Median, None))
    });
}

criterion_group!(benches, bench_local_otsu, bench_median);
criterion_main!(benches);
