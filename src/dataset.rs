use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ClusterError, Result};
use crate::utils::Scalar;

/// Parse one whitespace-separated row of coordinates. `line_no` is 1-based.
fn parse_row<T: Scalar>(line: &str, line_no: usize) -> Result<Vec<T>> {
    let mut row = Vec::new();
    for token in line.split_whitespace() {
        let value = token.parse::<T>().map_err(|_| ClusterError::Parse {
            line: line_no,
            reason: format!("invalid numeric token \"{token}\""),
        })?;
        row.push(value);
    }
    if row.is_empty() {
        return Err(ClusterError::Parse {
            line: line_no,
            reason: "blank line".into(),
        });
    }
    Ok(row)
}

/// Load a plain-text dataset: one sample per line, coordinates separated by
/// whitespace, no header.
///
/// Parsing is strict. Blank and malformed lines are rejected at the
/// offending line instead of silently producing short rows that would only
/// surface later as a dimension mismatch.
pub fn load_points<T: Scalar>(path: impl AsRef<Path>) -> Result<Vec<Vec<T>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ClusterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| ClusterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        data.push(parse_row(&line, i + 1)?);
    }
    Ok(data)
}

/// Verify that every sample shares the dimension of the first one and
/// return that dimension. An empty dataset has dimension 0.
pub fn check_dimensions<T: Scalar>(data: &[Vec<T>]) -> Result<usize> {
    let dim = data.first().map(|row| row.len()).unwrap_or(0);
    for row in data {
        if row.len() != dim {
            return Err(ClusterError::Dimension {
                expected: dim,
                actual: row.len(),
            });
        }
    }
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_separated_coordinates() {
        let row: Vec<f32> = parse_row("1.5  -2.0\t3", 1).unwrap();
        assert_eq!(row, vec![1.5, -2.0, 3.0]);
    }

    #[test]
    fn rejects_non_numeric_tokens_with_line_number() {
        let err = parse_row::<f32>("1.0 oops 3.0", 7).unwrap_err();
        match err {
            ClusterError::Parse { line, reason } => {
                assert_eq!(line, 7);
                assert!(reason.contains("oops"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_lines() {
        assert!(matches!(
            parse_row::<f64>("   ", 3),
            Err(ClusterError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn consistent_dimensions_pass() {
        let data = vec![vec![1.0f32, 2.0], vec![3.0, 4.0]];
        assert_eq!(check_dimensions(&data).unwrap(), 2);
    }

    #[test]
    fn ragged_rows_are_reported() {
        let data = vec![vec![1.0f32, 2.0], vec![3.0]];
        assert!(matches!(
            check_dimensions(&data),
            Err(ClusterError::Dimension {
                expected: 2,
                actual: 1
            })
        ));
    }
}
