/*!
# Hierarchy → vectors walk

Turns a hierarchy record stream into one embedding vector per leaf node by
walking it top-down: each interior node perturbs its accumulated vector by
an independent random draw scaled by `a^h` (the damping factor `a` raised
to the current depth `h`) before handing it to each child, and each leaf
emits one further independently perturbed copy per covered node.

The per-depth accumulator is a flat buffer indexed by `depth * k + dim`,
grown on demand and overwritten (never read back by a sibling after it
moves on) — the same depth-keyed amortized-scratch idiom
[`crate::core::graph::mkchild`] uses for subgraph induction.
*/

use std::io::Write;

use rand::Rng;

use crate::core::attributes::AttributeTable;
use crate::core::error::Result;
use crate::hierarchy::HierarchyReader;

fn rand1(rng: &mut impl Rng) -> f64 {
    2.0 * rng.random::<f64>() - 1.0
}

/// A random projection from attribute space (`d` dimensions) to embedding
/// space (`k` dimensions), entries drawn uniformly in `(-1, 1)/sqrt(k)`.
pub struct Projection {
    k: usize,
    d: usize,
    matrix: Vec<f64>,
}

impl Projection {
    pub fn sample(k: usize, d: usize, rng: &mut impl Rng) -> Projection {
        let scale = 1.0 / (k as f64).sqrt();
        let matrix = (0..k * d).map(|_| rand1(rng) * scale).collect();
        Projection { k, d, matrix }
    }

    /// The `j`-th coordinate of `x` projected into embedding space.
    pub fn coord(&self, x: &[f64], j: usize) -> f64 {
        let row = &self.matrix[j * self.d..(j + 1) * self.d];
        row.iter().zip(x.iter()).map(|(p, v)| p * v).sum()
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

fn ensure_capacity(vec: &mut Vec<f64>, depth: usize, k: usize) {
    let needed = (depth + 1) * k;
    if vec.len() < needed {
        vec.resize(needed, 0.0);
    }
}

/// Walks a hierarchy stream, writing `id v0 v1 … v(k-1)` per leaf node.
pub fn recvec(
    reader: &mut HierarchyReader,
    out: &mut dyn Write,
    k: usize,
    a: f64,
    rng: &mut impl Rng,
    vec: &mut Vec<f64>,
) -> Result<()> {
    let (h, c) = reader.next_record_header()?;
    let ah = a.powi(h as i32);
    ensure_capacity(vec, h, k);

    if c == 1 {
        let n = reader.next_usize()?;
        for _ in 0..n {
            let u = reader.next_usize()?;
            write!(out, "{u}")?;
            for j in 0..k {
                let value = vec[h * k + j] + rand1(rng) * ah;
                write!(out, " {value:e}")?;
            }
            writeln!(out)?;
        }
    } else {
        ensure_capacity(vec, h + 1, k);
        for _ in 0..c {
            for j in 0..k {
                vec[(h + 1) * k + j] = vec[h * k + j] + rand1(rng) * ah;
            }
            recvec(reader, out, k, a, rng, vec)?;
        }
    }
    Ok(())
}

/// Attributed variant of [`recvec`]: every leaf's vector additionally gets
/// `β · a^h · (P·x_u)[j]`, the node's attribute vector projected into
/// embedding space and scaled by the same depth damping as the stochastic
/// term.
pub fn recvec_attr(
    reader: &mut HierarchyReader,
    out: &mut dyn Write,
    k: usize,
    a: f64,
    beta: f64,
    attrs: &AttributeTable,
    projection: &Projection,
    rng: &mut impl Rng,
    vec: &mut Vec<f64>,
) -> Result<()> {
    let (h, c) = reader.next_record_header()?;
    let ah = a.powi(h as i32);
    ensure_capacity(vec, h, k);

    if c == 1 {
        let n = reader.next_usize()?;
        for _ in 0..n {
            let u = reader.next_usize()?;
            let x = attrs.get(u);
            write!(out, "{u}")?;
            for j in 0..k {
                let attr_term = match x {
                    Some(x) if attrs.dim() > 0 => beta * projection.coord(x, j) * ah,
                    _ => 0.0,
                };
                let value = vec[h * k + j] + rand1(rng) * ah + attr_term;
                write!(out, " {value:e}")?;
            }
            writeln!(out)?;
        }
    } else {
        ensure_capacity(vec, h + 1, k);
        for _ in 0..c {
            for j in 0..k {
                vec[(h + 1) * k + j] = vec[h * k + j] + rand1(rng) * ah;
            }
            recvec_attr(reader, out, k, a, beta, attrs, projection, rng, vec)?;
        }
    }
    Ok(())
}
