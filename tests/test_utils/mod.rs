use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate synthetic test vectors with a deterministic pattern
#[allow(dead_code)]
pub fn create_test_vectors(n: usize, dim: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| {
            (0..dim)
                .map(|d| ((i * dim + d) as f32 * 0.1) % 50.0)
                .collect()
        })
        .collect()
}

/// Create synthetic data with well-separated clusters around distinct
/// centers, reproducible from `seed`.
/// Returns (data, true_labels)
#[allow(dead_code)]
pub fn create_gaussian_clusters(
    num_clusters: usize,
    points_per_cluster: usize,
    dim: usize,
    separation: f32,
    seed: u64,
) -> (Vec<Vec<f32>>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut data = Vec::with_capacity(num_clusters * points_per_cluster);
    let mut true_labels = Vec::with_capacity(num_clusters * points_per_cluster);

    for cluster_id in 0..num_clusters {
        // Create a center for this cluster
        let center: Vec<f32> = (0..dim)
            .map(|d| (cluster_id as f32) * separation + (d as f32) * 0.1)
            .collect();

        // Generate points around this center
        for _ in 0..points_per_cluster {
            true_labels.push(cluster_id);
            data.push(
                center
                    .iter()
                    .map(|&c| c + rng.gen_range(-0.5..0.5))
                    .collect(),
            );
        }
    }

    (data, true_labels)
}

/// Calculate squared Euclidean distance
#[allow(dead_code)]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Calculate the within-cluster sum of squares (inertia)
#[allow(dead_code)]
pub fn calculate_inertia(data: &[Vec<f32>], centroids: &[Vec<f32>], labels: &[i32]) -> f32 {
    let mut inertia = 0.0;
    for (point, &label) in data.iter().zip(labels) {
        assert!(label >= 0, "unassigned label in fitted model");
        inertia += euclidean_distance_squared(point, &centroids[label as usize]);
    }
    inertia
}

/// Verify that each point is assigned to its nearest centroid
#[allow(dead_code)]
pub fn verify_optimal_assignment(
    data: &[Vec<f32>],
    centroids: &[Vec<f32>],
    labels: &[i32],
) -> bool {
    for (point, &assigned) in data.iter().zip(labels) {
        if assigned < 0 {
            return false;
        }
        let assigned_dist = euclidean_distance_squared(point, &centroids[assigned as usize]);

        // Check if any other centroid is closer
        for centroid in centroids {
            let dist = euclidean_distance_squared(point, centroid);
            if dist < assigned_dist - 1e-5 {
                // Using small epsilon for floating point comparison
                return false;
            }
        }
    }
    true
}

/// Write a dataset in the engine's plain-text format.
#[allow(dead_code)]
pub fn write_dataset(path: &std::path::Path, data: &[Vec<f32>]) {
    let body = data
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    std::fs::write(path, body + "\n").expect("failed to write dataset");
}
