/*!
# Performance Benchmarks for hilouvain

Criterion benchmarks covering the recursive-bisection hot loop: building a
synthetic CSR graph, running each partitioner over it, and coarsening it
through the quotient-graph construction.
*/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hilouvain::community::label_propagation::label_propagation;
use hilouvain::community::louvain::{Partition, louvain_complete, louvain_one_level};
use hilouvain::community::random_partition::random_partition;
use hilouvain::core::graph::Graph;

/// Builds a sparse Erdos-Renyi-style undirected graph with `n` nodes and
/// edge probability `p`, seeded for reproducible benchmark runs.
fn erdos_renyi(n: usize, p: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.random::<f64>() < p {
                edges.push((u, v));
            }
        }
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

    Graph {
        n,
        e,
        cd,
        adj,
        weights: None,
        total_weight: (2 * e) as f64,
        map: None,
    }
}

fn bench_one_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("louvain_one_level");

    for size in [100, 500, 1000, 2000].iter() {
        let graph = erdos_renyi(*size, 0.02, 7);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = louvain_one_level(&graph);
                black_box(result)
            });
        });
    }
    group.finish();
}

fn bench_louvain_complete(c: &mut Criterion) {
    let mut group = c.benchmark_group("louvain_complete");
    group.sample_size(20);

    for size in [100, 500, 1000].iter() {
        let graph = erdos_renyi(*size, 0.02, 7);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = louvain_complete(&graph);
                black_box(result)
            });
        });
    }
    group.finish();
}

fn bench_label_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_propagation");

    for size in [100, 500, 1000, 2000].iter() {
        let graph = erdos_renyi(*size, 0.02, 7);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            let mut rng = StdRng::seed_from_u64(11);
            b.iter(|| {
                let result = label_propagation(&graph, &mut rng);
                black_box(result)
            });
        });
    }
    group.finish();
}

fn bench_random_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_partition");

    for size in [1000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut rng = StdRng::seed_from_u64(3);
            b.iter(|| {
                let result = random_partition(size, &mut rng);
                black_box(result)
            });
        });
    }
    group.finish();
}

fn bench_modularity(c: &mut Criterion) {
    let mut group = c.benchmark_group("modularity_evaluation");

    for size in [100, 500, 1000, 2000].iter() {
        let graph = erdos_renyi(*size, 0.02, 7);
        let mut partition = Partition::new(&graph, None);
        partition.one_level(&graph);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = partition.modularity(&graph);
                black_box(result)
            });
        });
    }
    group.finish();
}

criterion_group!(
    partitioners,
    bench_one_level,
    bench_louvain_complete,
    bench_label_propagation,
    bench_random_partition
);

criterion_group!(scoring, bench_modularity);

criterion_main!(partitioners, scoring);
