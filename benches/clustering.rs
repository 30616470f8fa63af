use cohort::{DataPoint, HierarchicalClustering, InitMethod, Kmeans, Linkage, OptimalKOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn synthetic(n: usize, d: usize) -> Vec<DataPoint> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            let v = (0..d).map(|_| rng.random::<f32>()).collect();
            DataPoint::new(format!("p{i}"), v)
        })
        .collect()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");
    let data = synthetic(1000, 16);

    group.bench_function("cluster_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new()
                .with_init(InitMethod::KmeansPlusPlus)
                .with_max_iter(10)
                .with_silhouette(false)
                .with_seed(42);
            model.cluster(black_box(&data), 10).unwrap();
        })
    });

    let small = synthetic(200, 16);
    group.bench_function("find_optimal_k_n200_d16", |b| {
        b.iter(|| {
            Kmeans::new()
                .with_seed(42)
                .find_optimal_k(black_box(&small), Some(8), &OptimalKOptions::default())
                .unwrap();
        })
    });

    group.finish();
}

fn bench_hierarchical(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchical");
    let data = synthetic(150, 16);

    for linkage in [Linkage::Single, Linkage::Average, Linkage::Ward] {
        group.bench_function(format!("{linkage:?}_n150_d16"), |b| {
            b.iter(|| {
                HierarchicalClustering::new(linkage)
                    .cluster(black_box(&data))
                    .unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_hierarchical);
criterion_main!(benches);
