use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::dataset;
use crate::error::{ClusterError, Result};
use crate::utils::Scalar;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ClusterError + '_ {
    move |source| ClusterError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write centroids one per line, coordinates space-separated, in centroid
/// index order. Fails up front if the destination cannot be created.
///
/// Float values are written with `Display`, which prints the shortest
/// string that reparses to the identical value, so `save` followed by
/// `load` round-trips exactly.
pub fn save_centroids<T: Scalar>(path: impl AsRef<Path>, centroids: &[Vec<T>]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(io_err(path))?;
    let mut out = BufWriter::new(file);
    for centroid in centroids {
        let row = centroid
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{row}").map_err(io_err(path))?;
    }
    out.flush().map_err(io_err(path))
}

/// Parse a centroid file written by [`save_centroids`]. The format is the
/// same as a dataset file, so the same strict parser is used; the loaded
/// centroids must be rectangular.
pub fn load_centroids<T: Scalar>(path: impl AsRef<Path>) -> Result<Vec<Vec<T>>> {
    let centroids = dataset::load_points(path)?;
    dataset::check_dimensions(&centroids)?;
    Ok(centroids)
}

/// Write one integer label per line, in sample order.
pub fn save_labels(path: impl AsRef<Path>, labels: &[i32]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(io_err(path))?;
    let mut out = BufWriter::new(file);
    for label in labels {
        writeln!(out, "{label}").map_err(io_err(path))?;
    }
    out.flush().map_err(io_err(path))
}
