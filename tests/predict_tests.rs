mod test_utils;

use test_utils::*;
use vector_cluster::{ClusterError, KMeans, KMeansConfig};

fn model_with_two_centroids() -> KMeans<f32> {
    let mut kmeans: KMeans<f32> = KMeans::default();
    kmeans.set_centroids(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    kmeans
}

// ============================================================================
// Single-Point Prediction Tests
// ============================================================================

#[test]
fn test_predict_one_returns_nearest_centroid() {
    let kmeans = model_with_two_centroids();

    let (label, dist) = kmeans.predict_one(&[0.5, 1.5, 2.5]).expect("predict failed");
    assert_eq!(label, 0);
    assert!((dist - 0.75).abs() < 1e-6);

    let (label, _) = kmeans.predict_one(&[4.5, 5.5, 6.5]).expect("predict failed");
    assert_eq!(label, 1);
}

#[test]
fn test_predict_one_ties_go_to_first_centroid() {
    let mut kmeans: KMeans<f32> = KMeans::default();
    kmeans.set_centroids(vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![2.0, 2.0]]);

    let (label, _) = kmeans.predict_one(&[1.0, 1.0]).expect("predict failed");
    assert_eq!(label, 0, "equidistant centroids must resolve to the first");
}

#[test]
fn test_predict_one_dimension_mismatch() {
    let kmeans = model_with_two_centroids();

    let err = kmeans.predict_one(&[5.0, 6.0]).unwrap_err();
    assert!(
        matches!(
            err,
            ClusterError::Dimension {
                expected: 3,
                actual: 2
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn test_predict_against_empty_model_fails() {
    let kmeans: KMeans<f32> = KMeans::default();

    let err = kmeans.predict_one(&[1.0, 2.0]).unwrap_err();
    assert!(
        matches!(err, ClusterError::Dimension { expected: 0, .. }),
        "got {err:?}"
    );

    let err = kmeans.predict(&[vec![1.0, 2.0]]).unwrap_err();
    assert!(matches!(err, ClusterError::Dimension { expected: 0, .. }));
}

// ============================================================================
// Batch Prediction Tests
// ============================================================================

#[test]
fn test_batch_predict_preserves_input_order() {
    let mut kmeans = model_with_two_centroids();
    kmeans.set_num_threads(2);

    let points = vec![vec![0.5, 1.5, 2.5], vec![4.5, 5.5, 6.5]];
    let labels = kmeans.predict(&points).expect("predict failed");
    assert_eq!(labels, vec![0, 1]);
}

#[test]
fn test_batch_predict_is_all_or_nothing() {
    let mut kmeans = model_with_two_centroids();

    // One bad point among good ones must fail the whole batch, sequentially
    // and in parallel
    let points = vec![
        vec![0.5, 1.5, 2.5],
        vec![4.5, 5.5, 6.5],
        vec![5.0, 6.0], // wrong dimension
    ];

    let err = kmeans.predict(&points).unwrap_err();
    assert!(matches!(err, ClusterError::Dimension { .. }));

    kmeans.set_num_threads(2);
    let err = kmeans.predict(&points).unwrap_err();
    assert!(matches!(err, ClusterError::Dimension { .. }));
}

#[test]
fn test_batch_predict_thread_count_invariance() {
    // For a fixed centroid set, labels must be identical and identically
    // ordered no matter how many threads computed them
    let (data, _) = create_gaussian_clusters(4, 50, 6, 15.0, 55);
    let centroids: Vec<Vec<f32>> = (0..4)
        .map(|c| (0..6).map(|d| c as f32 * 15.0 + d as f32 * 0.1).collect())
        .collect();

    let mut sequential: KMeans<f32> = KMeans::default();
    sequential.set_centroids(centroids.clone());
    let labels_seq = sequential.predict(&data).expect("sequential predict");

    let mut parallel: KMeans<f32> = KMeans::default();
    parallel.set_centroids(centroids);
    parallel.set_num_threads(4);
    let labels_par = parallel.predict(&data).expect("parallel predict");

    assert_eq!(labels_seq, labels_par);
}

#[test]
fn test_predict_after_fit_matches_fitted_labels() {
    // A converged model predicts its own training data to the same labels
    // it recorded during the fit
    let (data, _) = create_gaussian_clusters(3, 25, 4, 18.0, 61);
    let mut kmeans: KMeans<f32> =
        KMeans::new(KMeansConfig::new(3).with_max_iter(200).with_seed(61));
    let outcome = kmeans.fit(&data).expect("fit failed");
    assert!(outcome.converged);

    let predicted = kmeans.predict(&data).expect("predict failed");
    let fitted: Vec<usize> = kmeans.labels().iter().map(|&l| l as usize).collect();
    assert_eq!(predicted, fitted);
}
