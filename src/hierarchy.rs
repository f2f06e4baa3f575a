/*!
# Hierarchy: recursive bisection driver and file format

[`build_hierarchy`] repeatedly partitions a graph, induces one child
subgraph per community via [`crate::core::graph::mkchild`], and recurses,
writing a pre-order depth-first record stream:

```text
h c           # interior node at depth h with c children, each follows immediately
h 1 n id0 id1 … id(n-1)   # leaf at depth h covering n original node ids
```

A node is a leaf either because its subgraph has no edges left, or because
the partitioner collapsed it to a single community (`nlab == 1`) — both
are written identically, so [`HierarchyReader`] never needs to
disambiguate the two causes.
*/

use std::io::Write;

use tracing::debug;

use crate::community::algorithm::Algorithm;
use crate::core::context::Context;
use crate::core::error::{Error, Result};
use crate::core::graph::{Graph, mkchild};

/// Runs the recursive bisection over `g`, writing the hierarchy record
/// stream to `out`.
pub fn build_hierarchy(
    algo: Algorithm,
    g: Graph,
    ctx: &mut Context,
    out: &mut dyn Write,
) -> Result<()> {
    recurs(algo, g, 0, ctx, out)
}

fn write_leaf(h: usize, g: &Graph, out: &mut dyn Write) -> Result<()> {
    write!(out, "{h} 1 {}", g.n)?;
    for i in 0..g.n {
        write!(out, " {}", g.original_id(i))?;
    }
    writeln!(out)?;
    Ok(())
}

fn recurs(algo: Algorithm, g: Graph, h: usize, ctx: &mut Context, out: &mut dyn Write) -> Result<()> {
    if g.e == 0 {
        return write_leaf(h, &g, out);
    }

    let (lab, nlab) = algo.partition(&g, ctx)?;
    if h == 0 {
        debug!(nlab, "first level partition computed");
    }

    if nlab == 1 {
        return write_leaf(h, &g, out);
    }

    writeln!(out, "{h} {nlab}")?;
    for clab in 0..nlab {
        let sg = mkchild(&mut ctx.mkchild_scratch, &g, &lab, nlab, h, clab);
        recurs(algo, sg, h + 1, ctx, out)?;
    }
    Ok(())
}

/// A pre-order hierarchy record stream, tokenized once and consumed
/// left-to-right by a recursive-descent reader (mirrors the recursive
/// writer above).
pub struct HierarchyReader<'a> {
    tokens: std::str::SplitAsciiWhitespace<'a>,
}

impl<'a> HierarchyReader<'a> {
    pub fn new(content: &'a str) -> HierarchyReader<'a> {
        HierarchyReader {
            tokens: content.split_ascii_whitespace(),
        }
    }

    fn next_token(&mut self) -> Result<&'a str> {
        self.tokens
            .next()
            .ok_or_else(|| Error::invalid_format("unexpected end of hierarchy stream"))
    }

    pub fn next_usize(&mut self) -> Result<usize> {
        self.next_token()?
            .parse()
            .map_err(|_| Error::invalid_format("expected an integer in hierarchy stream"))
    }

    /// A depth `h` and either `1` (leaf) or the child count `c >= 2`
    /// (interior) record header.
    pub fn next_record_header(&mut self) -> Result<(usize, usize)> {
        Ok((self.next_usize()?, self.next_usize()?))
    }
}
