use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use crate::assign::nearest_centroid;
use crate::error::{ClusterError, Result};
use crate::utils::{squared_distance_unchecked, Scalar};

/// Centroid seeding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMethod {
    /// k distinct samples drawn uniformly at random.
    Random,
    /// Weighted-farthest-point seeding (Arthur & Vassilvitskii).
    KMeansPlusPlus,
    /// Experimental k-means|| style oversampling (Bahmani et al.).
    /// `oversampling` is the expected number of candidates kept per round,
    /// `rounds` the number of oversampling rounds.
    KMeansParallel { oversampling: usize, rounds: usize },
}

impl fmt::Display for InitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitMethod::Random => write!(f, "random"),
            InitMethod::KMeansPlusPlus => write!(f, "k-means++"),
            InitMethod::KMeansParallel {
                oversampling,
                rounds,
            } => write!(f, "k-means|| (l={oversampling}, r={rounds})"),
        }
    }
}

/// Seed k initial centroids from the dataset.
///
/// Every variant returns full copies of k distinct samples, ordered by
/// ascending sample index. Label numbering in later iterations depends on
/// that ordering, so all variants draw into an ordered index set.
pub fn seed_centroids<T: Scalar>(
    method: InitMethod,
    data: &[Vec<T>],
    k: usize,
    rng: &mut StdRng,
    parallel: bool,
) -> Result<Vec<Vec<T>>> {
    if k == 0 {
        return Err(ClusterError::Config(
            "number of clusters must be positive".into(),
        ));
    }
    if data.len() < k {
        return Err(ClusterError::Config(format!(
            "cannot seed {k} clusters from {} samples",
            data.len()
        )));
    }

    let indices = match method {
        InitMethod::Random => random_indices(data.len(), k, rng),
        InitMethod::KMeansPlusPlus => plus_plus_indices(data, k, rng, parallel),
        InitMethod::KMeansParallel {
            oversampling,
            rounds,
        } => parallel_indices(data, k, oversampling, rounds, rng, parallel)?,
    };

    Ok(indices.iter().map(|&i| data[i].clone()).collect())
}

/// k distinct indices by rejection sampling against the already-chosen set.
fn random_indices(n: usize, k: usize, rng: &mut StdRng) -> BTreeSet<usize> {
    let mut chosen = BTreeSet::new();
    while chosen.len() < k {
        chosen.insert(rng.gen_range(0..n));
    }
    chosen
}

fn plus_plus_indices<T: Scalar>(
    data: &[Vec<T>],
    k: usize,
    rng: &mut StdRng,
    parallel: bool,
) -> BTreeSet<usize> {
    let mut chosen = BTreeSet::new();
    chosen.insert(rng.gen_range(0..data.len()));

    let mut dists = vec![T::zero(); data.len()];
    for step in 1..k {
        debug!("sampling centroid {step}");
        let total = min_distance_scan(data, &chosen, &mut dists, parallel);
        let index = weighted_pick(&dists, total, &chosen, rng);
        chosen.insert(index);
    }
    chosen
}

/// Fill `dists[i]` with the squared distance from sample i to its nearest
/// chosen centroid and return the sum. Read-only over the dataset, so the
/// parallel path is a plain map-reduce with no shared mutable state beyond
/// the final sum.
fn min_distance_scan<T: Scalar>(
    data: &[Vec<T>],
    chosen: &BTreeSet<usize>,
    dists: &mut [T],
    parallel: bool,
) -> T {
    let min_dist = |i: usize| {
        let mut min = T::max_value();
        for &c in chosen {
            let d = squared_distance_unchecked(&data[i], &data[c]);
            if d < min {
                min = d;
            }
        }
        min
    };

    if parallel {
        dists
            .par_iter_mut()
            .enumerate()
            .map(|(i, slot)| {
                *slot = min_dist(i);
                *slot
            })
            .sum()
    } else {
        let mut total = T::zero();
        for (i, slot) in dists.iter_mut().enumerate() {
            *slot = min_dist(i);
            total = total + *slot;
        }
        total
    }
}

/// Cumulative-sum threshold walk: draw a uniform cutoff in `[0, total)` and
/// select the first index whose running weight sum reaches it. An index
/// that was already chosen is rejected and the cutoff redrawn.
///
/// When `total` is zero every remaining sample coincides with a chosen one
/// and redrawing could never terminate; the first unchosen index is taken
/// instead.
fn weighted_pick<T: Scalar>(
    weights: &[T],
    total: T,
    chosen: &BTreeSet<usize>,
    rng: &mut StdRng,
) -> usize {
    if total <= T::zero() {
        return (0..weights.len())
            .find(|i| !chosen.contains(i))
            .unwrap_or(0);
    }

    loop {
        let cutoff = T::from(rng.gen::<f64>()).unwrap_or_else(T::zero) * total;
        let mut running = T::zero();
        let mut picked = weights.len() - 1;
        for (i, &w) in weights.iter().enumerate() {
            running = running + w;
            if running >= cutoff {
                picked = i;
                break;
            }
        }
        if !chosen.contains(&picked) {
            return picked;
        }
    }
}

/// Experimental k-means|| seeding.
///
/// Runs `rounds` rounds of independent oversampling, keeping each sample
/// with probability `min(1, l * d(x) / cost)`, then reduces the candidate
/// set to k with a threshold walk weighted by how many samples each
/// candidate is nearest to. The external contract matches k-means++:
/// k distinct samples in ascending index order. The multi-round schedule
/// is this crate's own judgment and may change; prefer k-means++ for
/// anything that needs stable behavior.
fn parallel_indices<T: Scalar>(
    data: &[Vec<T>],
    k: usize,
    oversampling: usize,
    rounds: usize,
    rng: &mut StdRng,
    parallel: bool,
) -> Result<BTreeSet<usize>> {
    let mut candidates = BTreeSet::new();
    candidates.insert(rng.gen_range(0..data.len()));

    let mut dists = vec![T::zero(); data.len()];
    let l = oversampling.max(1) as f64;
    for round in 0..rounds.max(1) {
        let cost = min_distance_scan(data, &candidates, &mut dists, parallel);
        debug!("oversampling round {round}: cost {cost}");
        if cost <= T::zero() {
            break;
        }
        for (i, &d) in dists.iter().enumerate() {
            let p = (l * (d / cost).to_f64().unwrap_or(0.0)).min(1.0);
            if rng.gen::<f64>() < p {
                candidates.insert(i);
            }
        }
    }

    // Oversampling can undershoot on small data; top up uniformly.
    while candidates.len() < k {
        candidates.insert(rng.gen_range(0..data.len()));
    }
    if candidates.len() == k {
        return Ok(candidates);
    }

    // Reduce: weight each candidate by the size of its tentative cluster.
    // The +1 keeps candidates that attracted no samples drawable, so the
    // walk below always terminates.
    let candidate_list: Vec<usize> = candidates.iter().copied().collect();
    let candidate_points: Vec<Vec<T>> = candidate_list.iter().map(|&i| data[i].clone()).collect();
    let mut weights = vec![T::one(); candidate_list.len()];
    for point in data {
        let (slot, _) = nearest_centroid(point, &candidate_points)?;
        weights[slot] = weights[slot] + T::one();
    }

    let total: T = weights.iter().copied().sum();
    let mut picked = BTreeSet::new();
    while picked.len() < k {
        let slot = weighted_pick(&weights, total, &picked, rng);
        picked.insert(slot);
    }
    Ok(picked.iter().map(|&slot| candidate_list[slot]).collect())
}
