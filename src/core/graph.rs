/*!
# CSR Graph

An undirected graph stored in compressed-sparse-row form: `cd` holds
cumulative degree offsets into `adj`, and `adj`/`weights` run in lock-step.
Every edge is stored twice (once from each endpoint), so `adj.len() == 2 * e`.

A graph produced by [`Graph::read_edge_list`] has local node IDs `0..n` that
already equal the original IDs (`map` is `None`). A graph produced by
[`mkchild`] carries a `map` back to whatever numbering its parent used, so a
leaf of the recursion can always report original IDs.
*/

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::error::{Error, Result};

/// A CSR adjacency representation of an undirected graph.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Number of nodes.
    pub n: usize,
    /// Number of (undirected) edges.
    pub e: usize,
    /// Cumulative degree offsets, length `n + 1`.
    pub cd: Vec<usize>,
    /// Neighbour list, length `2 * e`, indexed via `cd`.
    pub adj: Vec<usize>,
    /// Edge weights aligned with `adj`. `None` means every edge has weight 1.
    pub weights: Option<Vec<f64>>,
    /// Sum of all entries in `weights` (or `2 * e` when unweighted).
    pub total_weight: f64,
    /// Back-map from local node index to the original node ID. `None` at the
    /// root graph means identity.
    pub map: Option<Vec<usize>>,
}

impl Graph {
    /// Degree of local node `u`.
    pub fn degree(&self, u: usize) -> usize {
        self.cd[u + 1] - self.cd[u]
    }

    /// Neighbours of local node `u`.
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adj[self.cd[u]..self.cd[u + 1]]
    }

    /// Weight of the `k`-th entry in `adj` (the edge `adj[k]` is the target
    /// of), defaulting to 1.0 when the graph is unweighted.
    pub fn weight_at(&self, k: usize) -> f64 {
        match &self.weights {
            Some(w) => w[k],
            None => 1.0,
        }
    }

    /// Weighted degree (sum of incident edge weights) of local node `u`.
    pub fn weighted_degree(&self, u: usize) -> f64 {
        match &self.weights {
            Some(w) => w[self.cd[u]..self.cd[u + 1]].iter().sum(),
            None => self.degree(u) as f64,
        }
    }

    /// Maps a local node index to its original ID.
    pub fn original_id(&self, u: usize) -> usize {
        match &self.map {
            Some(m) => m[u],
            None => u,
        }
    }

    /// Reads an unweighted edge list (`u v` per line, whitespace separated,
    /// `#`-prefixed comments and blank lines skipped) and builds the CSR
    /// representation with a two-pass degree-counting construction.
    pub fn read_edge_list(path: impl AsRef<Path>) -> Result<Graph> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::io(format!("{}: {}", path.display(), e)))?;
        let mut edges: Vec<(usize, usize)> = Vec::new();
        let mut n = 0usize;
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut it = line.split_whitespace();
            let u: usize = it
                .next()
                .ok_or_else(|| malformed(path, lineno))?
                .parse()
                .map_err(|_| malformed(path, lineno))?;
            let v: usize = it
                .next()
                .ok_or_else(|| malformed(path, lineno))?
                .parse()
                .map_err(|_| malformed(path, lineno))?;
            n = n.max(u + 1).max(v + 1);
            edges.push((u, v));
        }

        let e = edges.len();
        let mut degree = vec![0usize; n];
        for &(u, v) in &edges {
            degree[u] += 1;
            degree[v] += 1;
        }

        let mut cd = vec![0usize; n + 1];
        for i in 0..n {
            cd[i + 1] = cd[i] + degree[i];
        }

        let mut adj = vec![0usize; 2 * e];
        let mut fill = vec![0usize; n];
        for (u, v) in edges {
            adj[cd[u] + fill[u]] = v;
            fill[u] += 1;
            adj[cd[v] + fill[v]] = u;
            fill[v] += 1;
        }

        Ok(Graph {
            n,
            e,
            cd,
            adj,
            weights: None,
            total_weight: (2 * e) as f64,
            map: None,
        })
    }
}

fn malformed(path: &Path, lineno: usize) -> Error {
    Error::invalid_format(format!("{}: line {}: expected two node ids", path.display(), lineno + 1))
}

/// Per-depth scratch state reused across sibling [`mkchild`] calls at the
/// same recursion depth. Built once per depth (when the first child of a
/// label set is requested) and released when the last child is built.
pub(crate) struct ChildScratch {
    nodes: Vec<usize>,
    new_index: Vec<usize>,
    cd: Vec<usize>,
    internal_edges: Vec<usize>,
}

/// Amortized construction of child subgraphs: groups nodes of `g` by `lab`
/// (`nlab` distinct labels) and returns the induced subgraph for community
/// `clab`. Depth `h` identifies which layer of the recursion this call
/// belongs to; calls with the same `h` and increasing `clab` reuse scratch
/// state computed on the first call (`clab == 0`) and release it on the
/// last (`clab == nlab - 1`).
pub fn mkchild(
    scratch: &mut HashMap<usize, ChildScratch>,
    g: &Graph,
    lab: &[usize],
    nlab: usize,
    h: usize,
    clab: usize,
) -> Graph {
    if clab == 0 {
        let mut degree = vec![0usize; nlab];
        for &l in lab.iter().take(g.n) {
            degree[l] += 1;
        }
        let mut cd = vec![0usize; nlab + 1];
        for i in 0..nlab {
            cd[i + 1] = cd[i] + degree[i];
        }

        let mut fill = vec![0usize; nlab];
        let mut nodes = vec![0usize; g.n];
        let mut new_index = vec![0usize; g.n];
        let mut internal_edges = vec![0usize; nlab];
        for u in 0..g.n {
            let lu = lab[u];
            nodes[cd[lu] + fill[lu]] = u;
            new_index[u] = fill[lu];
            fill[lu] += 1;
            for &v in g.neighbors(u) {
                if lu == lab[v] {
                    internal_edges[lu] += 1;
                }
            }
        }

        scratch.insert(
            h,
            ChildScratch {
                nodes,
                new_index,
                cd,
                internal_edges,
            },
        );
    }

    let s = scratch.get(&h).expect("mkchild called out of order");
    let lo = s.cd[clab];
    let hi = s.cd[clab + 1];
    let sub_n = hi - lo;
    let sub_e = s.internal_edges[clab] / 2;

    let mut sub_cd = vec![0usize; sub_n + 1];
    let mut sub_adj = vec![0usize; 2 * sub_e];
    let mut sub_map = vec![0usize; sub_n];

    let mut written = 0usize;
    for k in lo..hi {
        let u = s.nodes[k];
        let local_u = s.new_index[u];
        sub_map[local_u] = g.original_id(u);
        for &v in g.neighbors(u) {
            if lab[v] == clab {
                sub_adj[written] = s.new_index[v];
                written += 1;
            }
        }
        sub_cd[local_u + 1] = written;
    }

    if clab == nlab - 1 {
        scratch.remove(&h);
    }

    Graph {
        n: sub_n,
        e: sub_e,
        cd: sub_cd,
        adj: sub_adj,
        weights: None,
        total_weight: (2 * sub_e) as f64,
        map: Some(sub_map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_edges(lines: &[&str]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "hilouvain-test-{}-{}.txt",
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
    fn test_read_triangle() {
        let path = write_edges(&["0 1", "1 2", "2 0"]);
        let g = Graph::read_edge_list(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(g.n, 3);
        assert_eq!(g.e, 3);
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.degree(1), 2);
        assert_eq!(g.degree(2), 2);
        assert_eq!(g.adj.len(), 6);
    }

    #[test]
    fn test_read_skips_comments_and_blanks() {
        let path = write_edges(&["# a comment", "", "0 1", "  ", "1 2"]);
        let g = Graph::read_edge_list(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(g.n, 3);
        assert_eq!(g.e, 2);
    }

    #[test]
    fn test_mkchild_two_groups() {
        // path of 4: 0-1-2-3, split into {0,1} and {2,3}
        let path = write_edges(&["0 1", "1 2", "2 3"]);
        let g = Graph::read_edge_list(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let lab = vec![0usize, 0, 1, 1];
        let mut scratch = HashMap::new();
        let c0 = mkchild(&mut scratch, &g, &lab, 2, 0, 0);
        let c1 = mkchild(&mut scratch, &g, &lab, 2, 0, 1);

        assert_eq!(c0.n, 2);
        assert_eq!(c0.e, 1);
        assert_eq!(c0.map.unwrap(), vec![0, 1]);

        assert_eq!(c1.n, 2);
        assert_eq!(c1.e, 1);
        assert_eq!(c1.map.unwrap(), vec![2, 3]);

        assert!(scratch.is_empty());
    }
}
