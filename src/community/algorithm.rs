/*!
# Algorithm dispatch

The five partitioners selectable from the CLI, in the same order the
reference tool's `choose_partition` used: random, full (multi-level)
Louvain, one-level Louvain, label propagation, attributed Louvain.
*/

use tracing::debug;

use crate::community::label_propagation::label_propagation;
use crate::community::louvain::{louvain_attributed, louvain_complete, louvain_one_level};
use crate::community::random_partition::random_partition;
use crate::core::context::Context;
use crate::core::error::{Error, Result};
use crate::core::graph::Graph;

/// One of the five partitioning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Random,
    LouvainComplete,
    LouvainOneLevel,
    LabelPropagation,
    AttributedLouvain,
}

impl Algorithm {
    /// Maps the CLI's numeric `algo` argument (0-4) onto a variant.
    pub fn from_code(code: u8) -> Result<Algorithm> {
        match code {
            0 => Ok(Algorithm::Random),
            1 => Ok(Algorithm::LouvainComplete),
            2 => Ok(Algorithm::LouvainOneLevel),
            3 => Ok(Algorithm::LabelPropagation),
            4 => Ok(Algorithm::AttributedLouvain),
            other => Err(Error::invalid_argument(format!(
                "unknown partition algorithm code {other}, expected 0-4"
            ))),
        }
    }

    /// Runs the selected partitioner over `g`, returning `(labels, nlab)`.
    pub fn partition(&self, g: &Graph, ctx: &mut Context) -> Result<(Vec<usize>, usize)> {
        let result = match self {
            Algorithm::Random => random_partition(g.n, &mut ctx.rng),
            Algorithm::LouvainComplete => louvain_complete(g),
            Algorithm::LouvainOneLevel => louvain_one_level(g),
            Algorithm::LabelPropagation => label_propagation(g, &mut ctx.rng),
            Algorithm::AttributedLouvain => {
                let attrs = ctx.attrs.as_ref().ok_or_else(|| {
                    Error::invalid_argument("attributed Louvain requires an attribute table")
                })?;
                louvain_attributed(g, attrs, ctx.lambda)
            }
        };
        debug!(nodes = g.n, nlab = result.1, algorithm = ?self, "partitioned graph");
        Ok(result)
    }
}
