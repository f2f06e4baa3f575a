/*!
# Label propagation

Relabels each node to the most frequent label among its neighbours,
breaking ties by a shuffled scan order so no label index is systematically
favoured; a node keeps its current label on an exact tie (strict `>`
comparison). Iterates shuffled full sweeps until one makes no change.
*/

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::graph::Graph;

/// Runs shuffled full sweeps of the neighbour-majority relabeling rule
/// until one makes no change, starting from whatever labels `lab` already
/// holds (it is not reset to identity first). Every entry of `lab` must be
/// `< g.n`. This is the reusable core of [`label_propagation`]; calling it
/// again on an already-converged `lab` is a no-op, which is the rule's
/// idempotence property.
pub fn converge_labels(g: &Graph, lab: &mut [usize], rng: &mut impl Rng) {
    let n = g.n;
    if n == 0 {
        return;
    }

    let mut nodes: Vec<usize> = (0..n).collect();
    let mut tab = vec![0usize; n];
    let mut list: Vec<usize> = Vec::new();

    loop {
        let mut changed = false;
        nodes.shuffle(rng);

        for &u in &nodes {
            list.clear();
            for &v in g.neighbors(u) {
                let l = lab[v];
                if tab[l] == 0 {
                    list.push(l);
                }
                tab[l] += 1;
            }

            let mut lmax = lab[u];
            let mut nmax = tab[lmax];

            list.shuffle(rng);
            for &l in &list {
                if tab[l] > nmax {
                    lmax = l;
                    nmax = tab[l];
                    changed = true;
                }
                tab[l] = 0;
            }
            lab[u] = lmax;
        }

        if !changed {
            break;
        }
    }
}

/// Runs label propagation to a fixed point and returns labels renumbered
/// to a dense `0..nlab` range; returns `(labels, nlab)`.
pub fn label_propagation(g: &Graph, rng: &mut impl Rng) -> (Vec<usize>, usize) {
    let n = g.n;
    let mut lab: Vec<usize> = (0..n).collect();
    if n == 0 {
        return (lab, 0);
    }

    converge_labels(g, &mut lab, rng);

    let mut new_id = vec![usize::MAX; n];
    let mut nlab = 0usize;
    for i in 0..n {
        let l = lab[i];
        if new_id[l] == usize::MAX {
            new_id[l] = nlab;
            nlab += 1;
        }
        lab[i] = new_id[l];
    }

    (lab, nlab)
}
