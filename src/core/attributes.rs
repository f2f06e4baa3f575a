/*!
# Attribute store

A dense table mapping original node IDs to fixed-dimension attribute
vectors. The dimension is inferred from the first non-empty line of the
attribute file; every later row must agree or the whole load fails.
*/

use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::core::error::{Error, Result};

/// Per-node attribute vectors, keyed by original node ID.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    dim: usize,
    max_id: usize,
    values: Vec<f64>,
    present: Vec<bool>,
}

impl AttributeTable {
    /// Attribute vector dimension (0 if the table is empty).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Attribute vector for `original_id`, or `None` if absent or the id is
    /// out of range.
    pub fn get(&self, original_id: usize) -> Option<&[f64]> {
        if self.dim == 0 || original_id > self.max_id || !self.present[original_id] {
            return None;
        }
        let start = original_id * self.dim;
        Some(&self.values[start..start + self.dim])
    }

    /// Cosine similarity between a node's attribute vector and a community
    /// centroid given as an unnormalized sum vector plus the community
    /// size. Returns 0.0 when either vector is absent or degenerate.
    pub fn cosine_to_comm(&self, original_id: usize, comm_sum: &[f64], comm_size: usize) -> f64 {
        if self.dim == 0 || comm_size == 0 {
            return 0.0;
        }
        let Some(x) = self.get(original_id) else {
            return 0.0;
        };
        let mut dot = 0.0f64;
        let mut nx = 0.0f64;
        let mut nc = 0.0f64;
        let size = comm_size as f64;
        for j in 0..self.dim {
            let cj = comm_sum[j] / size;
            let xj = x[j];
            dot += xj * cj;
            nx += xj * xj;
            nc += cj * cj;
        }
        if nx <= 0.0 || nc <= 0.0 {
            return 0.0;
        }
        dot / (nx.sqrt() * nc.sqrt())
    }

    /// Plain dot product between a node's attribute vector and a raw
    /// (not size-normalized) community sum vector.
    pub fn dot_to_comm_sum(&self, original_id: usize, comm_sum: &[f64]) -> f64 {
        if self.dim == 0 {
            return 0.0;
        }
        let Some(x) = self.get(original_id) else {
            return 0.0;
        };
        x.iter().zip(comm_sum.iter()).map(|(a, b)| a * b).sum()
    }

    /// Loads a whitespace-separated attribute file: `id v0 v1 … v(d-1)` per
    /// line. Lines with the wrong number of values (after the first
    /// established dimension) are recoverably skipped and logged, not
    /// treated as fatal, matching the first pass of the loader that
    /// establishes the dimension. Lines with an id beyond the maximum seen
    /// in the first pass are likewise skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<AttributeTable> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("{}: {}", path.display(), e)))?;

        let mut dim = None;
        let mut max_id = 0usize;
        for line in raw.lines() {
            let mut it = line.split_whitespace();
            let Some(id_tok) = it.next() else {
                continue;
            };
            let Ok(id) = id_tok.parse::<usize>() else {
                continue;
            };
            let d = it.count();
            if d == 0 {
                continue;
            }
            match dim {
                None => dim = Some(d),
                Some(expected) if expected != d => {
                    return Err(Error::dimension_mismatch(format!(
                        "{}: expected {} values per row, found {}",
                        path.display(),
                        expected,
                        d
                    )));
                }
                _ => {}
            }
            max_id = max_id.max(id);
        }

        let Some(dim) = dim else {
            return Ok(AttributeTable {
                dim: 0,
                max_id: 0,
                values: Vec::new(),
                present: Vec::new(),
            });
        };

        let mut values = vec![0.0f64; (max_id + 1) * dim];
        let mut present = vec![false; max_id + 1];
        let mut skipped = 0usize;

        for line in raw.lines() {
            let mut it = line.split_whitespace();
            let Some(id_tok) = it.next() else {
                continue;
            };
            let Ok(id) = id_tok.parse::<usize>() else {
                continue;
            };
            if id > max_id {
                skipped += 1;
                continue;
            }
            let mut filled = 0usize;
            for (j, tok) in it.enumerate().take(dim) {
                match tok.parse::<f64>() {
                    Ok(v) => {
                        values[id * dim + j] = v;
                        filled += 1;
                    }
                    Err(_) => break,
                }
            }
            if filled == dim {
                present[id] = true;
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            debug!(skipped, "skipped malformed attribute rows");
        }

        Ok(AttributeTable {
            dim,
            max_id,
            values,
            present,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_attrs(lines: &[&str]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "hilouvain-attrs-{}-{}.txt",
            std::process::id(),
            lines.len()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        for l in lines {
            writeln!(f, "{}", l).unwrap();
        }
        path
    }

    #[test]
    fn test_load_and_lookup() {
        let path = write_attrs(&["0 1.0 0.0", "2 0.0 1.0"]);
        let table = AttributeTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.dim(), 2);
        assert_eq!(table.get(0), Some(&[1.0, 0.0][..]));
        assert_eq!(table.get(1), None);
        assert_eq!(table.get(2), Some(&[0.0, 1.0][..]));
    }

    #[test]
    fn test_cosine_to_comm() {
        let path = write_attrs(&["0 1.0 0.0"]);
        let table = AttributeTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let comm_sum = vec![2.0, 0.0];
        let sim = table.cosine_to_comm(0, &comm_sum, 2);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_arity_is_skipped() {
        let path = write_attrs(&["0 1.0 0.0", "1 2.0"]);
        let table = AttributeTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(table.get(1), None);
    }
}
