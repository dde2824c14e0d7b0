use std::fmt::Display;
use std::iter::Sum;
use std::str::FromStr;

use num_traits::Float;

use crate::error::{ClusterError, Result};

/// Numeric element type of samples and centroids, `f32` or `f64` in
/// practice. Distance accumulation stays in this type to preserve the
/// precision behavior of the input data.
pub trait Scalar: Float + FromStr + Display + Send + Sync + Sum + 'static {}

impl<T> Scalar for T where T: Float + FromStr + Display + Send + Sync + Sum + 'static {}

/// Squared Euclidean distance between two same-length vectors.
///
/// The square root is deliberately skipped: every comparison in this crate
/// is between squared distances, where the ordering is identical.
pub fn squared_distance<T: Scalar>(a: &[T], b: &[T]) -> Result<T> {
    if a.len() != b.len() {
        return Err(ClusterError::Dimension {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(squared_distance_unchecked(a, b))
}

/// Hot-loop variant for callers that have already validated dimensions.
#[inline]
pub(crate) fn squared_distance_unchecked<T: Scalar>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y).powi(2)).sum()
}
