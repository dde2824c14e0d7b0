use rayon::prelude::*;

use crate::assign::nearest_centroid;
use crate::error::Result;
use crate::utils::Scalar;

/// Statistics of one assign-then-update iteration, consumed by the
/// convergence policy.
#[derive(Debug, Clone, Copy)]
pub struct IterationStats<T> {
    /// Samples whose label changed this iteration.
    pub reassigned: usize,
    /// Sum of squared distances from every sample to its assigned centroid.
    pub cost: T,
}

/// Per-lane accumulators for the parallel path. Each lane owns its own
/// instance, so the assignment loop runs without locks or atomics; the
/// lanes are combined by a single-threaded fold after the join.
struct LaneAccum<T> {
    sums: Vec<Vec<T>>,
    counts: Vec<usize>,
    members: Vec<Vec<usize>>,
    reassigned: usize,
    cost: T,
}

/// One sequential Lloyd iteration: assign every sample to its nearest
/// centroid, then recompute each non-empty cluster's centroid as the mean
/// of its members. Labels persist across iterations, so `reassigned`
/// reflects true label churn.
pub fn sequential_step<T: Scalar>(
    data: &[Vec<T>],
    centroids: &mut [Vec<T>],
    labels: &mut [i32],
    members: &mut [Vec<usize>],
) -> Result<IterationStats<T>> {
    for list in members.iter_mut() {
        list.clear();
    }

    let mut reassigned = 0usize;
    let mut cost = T::zero();
    for (i, point) in data.iter().enumerate() {
        let (label, dist) = nearest_centroid(point, centroids)?;
        cost = cost + dist;
        members[label].push(i);
        if label as i32 != labels[i] {
            reassigned += 1;
            labels[i] = label as i32;
        }
    }

    for (centroid, ids) in centroids.iter_mut().zip(members.iter()) {
        if ids.is_empty() {
            // Empty cluster: the previous centroid stays as it was.
            continue;
        }
        let count = T::from(ids.len()).unwrap_or_else(T::one);
        for slot in centroid.iter_mut() {
            *slot = T::zero();
        }
        for &id in ids {
            for (slot, &v) in centroid.iter_mut().zip(&data[id]) {
                *slot = *slot + v;
            }
        }
        for slot in centroid.iter_mut() {
            *slot = *slot / count;
        }
    }

    Ok(IterationStats { reassigned, cost })
}

/// One parallel Lloyd iteration with the same observable contract as
/// [`sequential_step`], up to floating-point summation order.
///
/// Samples are partitioned into contiguous lanes. Every lane reads the
/// centroid array as an immutable snapshot and writes labels only through
/// its own disjoint chunk; centroids are overwritten strictly after the
/// fork-join barrier. Lane results are concatenated in lane order, which
/// keeps membership lists in ascending sample order.
pub fn parallel_step<T: Scalar>(
    data: &[Vec<T>],
    centroids: &mut [Vec<T>],
    labels: &mut [i32],
    members: &mut [Vec<usize>],
    n_lanes: usize,
) -> Result<IterationStats<T>> {
    let k = centroids.len();
    let dim = centroids.first().map(|c| c.len()).unwrap_or(0);
    let n_lanes = n_lanes.max(1);
    let chunk = ((data.len() + n_lanes - 1) / n_lanes).max(1);

    let snapshot: &[Vec<T>] = centroids;
    let lanes = data
        .par_chunks(chunk)
        .zip(labels.par_chunks_mut(chunk))
        .enumerate()
        .map(|(lane, (points, lane_labels))| -> Result<LaneAccum<T>> {
            let base = lane * chunk;
            let mut acc = LaneAccum {
                sums: vec![vec![T::zero(); dim]; k],
                counts: vec![0; k],
                members: vec![Vec::new(); k],
                reassigned: 0,
                cost: T::zero(),
            };
            for (offset, point) in points.iter().enumerate() {
                let (label, dist) = nearest_centroid(point, snapshot)?;
                acc.cost = acc.cost + dist;
                acc.counts[label] += 1;
                acc.members[label].push(base + offset);
                if label as i32 != lane_labels[offset] {
                    acc.reassigned += 1;
                    lane_labels[offset] = label as i32;
                }
                for (slot, &v) in acc.sums[label].iter_mut().zip(point) {
                    *slot = *slot + v;
                }
            }
            Ok(acc)
        })
        .collect::<Result<Vec<_>>>()?;

    // Serial reduction; the only place cross-lane data is combined.
    for list in members.iter_mut() {
        list.clear();
    }
    let mut sums = vec![vec![T::zero(); dim]; k];
    let mut counts = vec![0usize; k];
    let mut reassigned = 0usize;
    let mut cost = T::zero();
    for lane in &lanes {
        reassigned += lane.reassigned;
        cost = cost + lane.cost;
        for c in 0..k {
            counts[c] += lane.counts[c];
            members[c].extend_from_slice(&lane.members[c]);
            for (slot, &v) in sums[c].iter_mut().zip(&lane.sums[c]) {
                *slot = *slot + v;
            }
        }
    }

    for c in 0..k {
        if counts[c] == 0 {
            continue;
        }
        let count = T::from(counts[c]).unwrap_or_else(T::one);
        for (slot, &sum) in centroids[c].iter_mut().zip(&sums[c]) {
            *slot = sum / count;
        }
    }

    Ok(IterationStats { reassigned, cost })
}
