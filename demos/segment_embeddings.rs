//! K-means, k search, and agglomerative clustering on a small 2D dataset.
//!
//! Run with `RUST_LOG=cohort=debug cargo run --example segment_embeddings`.

use cohort::{
    DataPoint, HierarchicalClustering, InitMethod, Kmeans, Linkage, OptimalKOptions, Partition,
    SelectionMethod,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three well-separated segments in 2D.
    let raw: [(&str, [f32; 2]); 12] = [
        ("acme", [0.0, 0.0]),
        ("globex", [0.1, 0.2]),
        ("initech", [0.2, 0.1]),
        ("umbrella", [-0.1, 0.1]),
        ("hooli", [5.0, 5.0]),
        ("vandelay", [5.1, 4.9]),
        ("stark", [4.9, 5.1]),
        ("wayne", [5.2, 5.2]),
        ("tyrell", [10.0, 0.0]),
        ("cyberdyne", [10.1, 0.1]),
        ("wonka", [9.9, -0.1]),
        ("soylent", [10.2, 0.2]),
    ];
    let points: Vec<DataPoint> = raw
        .iter()
        .map(|(name, v)| DataPoint::new(*name, v.to_vec()).with_metadata("plan", "trial"))
        .collect();

    let model = Kmeans::new().with_init(InitMethod::KmeansPlusPlus).with_seed(42);

    let search = model.find_optimal_k(
        &points,
        Some(6),
        &OptimalKOptions {
            method: SelectionMethod::Silhouette,
            ..Default::default()
        },
    )?;
    println!("=== k search ({:?}) ===", search.method);
    for s in &search.scores {
        println!("  k={} inertia={:.3} silhouette={:?}", s.k, s.inertia, s.silhouette);
    }
    println!("  optimal k = {}", search.optimal_k);

    let result = model.cluster(&points, search.optimal_k)?;
    println!(
        "\n=== K-means (k={}) converged={} iterations={} inertia={:.3} silhouette={:?} ===",
        search.optimal_k,
        result.converged,
        result.iterations,
        result.total_inertia,
        result.silhouette_score
    );
    for c in &result.clusters {
        println!("  cluster {} {:?}: {:?}", c.id, c.centroid, c.point_ids().collect::<Vec<_>>());
    }

    let tree = HierarchicalClustering::new(Linkage::Ward)
        .with_max_clusters(3)
        .cluster(&points)?;
    println!("\n=== Ward (max_clusters=3) silhouette={:.3} ===", tree.silhouette());
    for m in tree.dendrogram.merges() {
        println!(
            "  merge [{}] + [{}] at {:.3} -> size {}",
            m.cluster1, m.cluster2, m.distance, m.size
        );
    }

    println!("\n{}", serde_json::to_string_pretty(&tree.dendrogram)?);
    Ok(())
}
