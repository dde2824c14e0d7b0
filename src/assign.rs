use rayon::prelude::*;

use crate::error::{ClusterError, Result};
use crate::utils::{squared_distance_unchecked, Scalar};

/// Index and squared distance of the centroid nearest to `point`.
///
/// Ties go to the first centroid scanned: the running minimum is only
/// replaced on a strict improvement. The point's dimension is validated
/// once against the first centroid; a centroid set with mixed dimensions is
/// not specially handled. An empty centroid set reports a dimension error
/// with `expected: 0`.
pub fn nearest_centroid<T: Scalar>(point: &[T], centroids: &[Vec<T>]) -> Result<(usize, T)> {
    let Some(first) = centroids.first() else {
        return Err(ClusterError::Dimension {
            expected: 0,
            actual: point.len(),
        });
    };
    if point.len() != first.len() {
        return Err(ClusterError::Dimension {
            expected: first.len(),
            actual: point.len(),
        });
    }

    let mut best = 0usize;
    let mut best_dist = T::max_value();
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance_unchecked(point, centroid);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    Ok((best, best_dist))
}

/// Nearest-centroid label for every point, in input order.
///
/// The parallel path maps each index independently and collects in order,
/// so the output is index-aligned with the input regardless of thread
/// scheduling. Any per-point failure fails the whole batch; no partial
/// result is returned.
pub fn assign_batch<T: Scalar>(
    points: &[Vec<T>],
    centroids: &[Vec<T>],
    parallel: bool,
) -> Result<Vec<usize>> {
    let label_of = |point: &Vec<T>| nearest_centroid(point, centroids).map(|(label, _)| label);
    if parallel {
        points.par_iter().map(label_of).collect()
    } else {
        points.iter().map(label_of).collect()
    }
}
