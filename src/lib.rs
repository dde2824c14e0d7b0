pub mod error;
pub use error::{ClusterError, Result};

pub mod init;
pub use init::InitMethod;

pub mod kmeans;
pub use kmeans::{FitOutcome, KMeans, KMeansConfig};

// Internal implementation modules (not part of the public API).
#[cfg(not(feature = "internal_tests"))]
mod assign;
#[cfg(feature = "internal_tests")]
pub mod assign;

#[cfg(not(feature = "internal_tests"))]
mod dataset;
#[cfg(feature = "internal_tests")]
pub mod dataset;

#[cfg(not(feature = "internal_tests"))]
mod lloyd;
#[cfg(feature = "internal_tests")]
pub mod lloyd;

#[cfg(not(feature = "internal_tests"))]
mod model;
#[cfg(feature = "internal_tests")]
pub mod model;

mod utils;
pub use utils::{squared_distance, Scalar};
