/*!
# Context

A single place to hold the state that the original recursive-bisection tool
kept in process globals: the attribute table, the attributed-Louvain
trade-off `λ`, the seeded RNG, and the per-depth scratch used by
[`crate::core::graph::mkchild`]. One `Context` is built per CLI invocation
and threaded by `&mut` reference through the recursion, so independent runs
(including concurrent tests) never share state.
*/

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::attributes::AttributeTable;

/// Per-invocation state threaded through the recursive bisection driver.
pub struct Context {
    pub attrs: Option<AttributeTable>,
    pub lambda: f64,
    pub rng: StdRng,
    pub(crate) mkchild_scratch: HashMap<usize, crate::core::graph::ChildScratch>,
}

impl Context {
    /// Builds a context with no attributes and a seed derived from the
    /// process clock, matching the original tool's `srand(time(NULL))`.
    pub fn new(seed: u64) -> Context {
        Context {
            attrs: None,
            lambda: 0.2,
            rng: StdRng::seed_from_u64(seed),
            mkchild_scratch: HashMap::new(),
        }
    }

    pub fn with_attributes(seed: u64, attrs: AttributeTable, lambda: f64) -> Context {
        Context {
            attrs: Some(attrs),
            lambda,
            rng: StdRng::seed_from_u64(seed),
            mkchild_scratch: HashMap::new(),
        }
    }
}
