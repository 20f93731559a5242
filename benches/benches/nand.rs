// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_nand::{EvalScratch, GateId, Network};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_usize(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u32() as usize) % upper_exclusive
    }
}

/// Builds a random acyclic network of two-input gates.
///
/// Gate `i` reads either a signal or a gate with a smaller index on each slot,
/// which keeps the network acyclic.
fn build_dag<'s>(n: usize, signals: &'s [Cell<bool>], seed: u64) -> (Network<'s>, Vec<GateId>) {
    let mut net = Network::with_capacity(n);
    let mut rng = Lcg::new(seed);
    let mut gates = Vec::with_capacity(n);

    for i in 0..n {
        let g = net.create(2).expect("create never fails here");
        for slot in 0..2 {
            if i == 0 || rng.gen_range_usize(4) == 0 {
                let s = &signals[rng.gen_range_usize(signals.len())];
                net.connect_signal(s, g, slot).expect("slot is in range");
            } else {
                let producer = gates[rng.gen_range_usize(i)];
                net.connect_gate(producer, g, slot).expect("slot is in range");
            }
        }
        gates.push(g);
    }

    (net, gates)
}

/// Builds a chain of single-input gates `depth` long.
fn build_chain(depth: usize, signal: &Cell<bool>) -> (Network<'_>, GateId) {
    let mut net = Network::with_capacity(depth);
    let mut last = net.create(1).expect("create never fails here");
    net.connect_signal(signal, last, 0).expect("slot is in range");
    for _ in 1..depth {
        let next = net.create(1).expect("create never fails here");
        net.connect_gate(last, next, 0).expect("slot is in range");
        last = next;
    }
    (net, last)
}

fn bench_nand(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_nand");
    group.sample_size(50);

    let signals: Vec<Cell<bool>> = (0..16).map(|i| Cell::new(i % 3 == 0)).collect();

    for &n in &[256_usize, 4_096, 65_536] {
        group.bench_function(format!("evaluate_all(n={n})"), |b| {
            let (mut net, gates) = build_dag(n, &signals, 0x4E4D_0000_0000_0001);
            let mut scratch = EvalScratch::with_capacity(n);
            b.iter(|| {
                let eval = net
                    .evaluate_with_scratch(&gates, &mut scratch)
                    .expect("network is acyclic and fully connected");
                black_box(eval.critical_path());
            });
        });

        group.bench_function(format!("evaluate_last(n={n})"), |b| {
            let (mut net, gates) = build_dag(n, &signals, 0x4E4D_0000_0000_0002);
            let last = [gates[n - 1]];
            let mut scratch = EvalScratch::with_capacity(n);
            let mut out = [false];
            b.iter(|| {
                let len = net
                    .evaluate_into(&last, &mut out, &mut scratch)
                    .expect("network is acyclic and fully connected");
                black_box((len, out));
            });
        });

        group.bench_function(format!("rewire(n={n})"), |b| {
            b.iter_batched(
                || build_dag(n, &signals, 0x4E4D_0000_0000_0003),
                |(mut net, gates)| {
                    let mut rng = Lcg::new(0x4E4D_0000_0000_0004);
                    for _ in 0..n {
                        let consumer = 1 + rng.gen_range_usize(n - 1);
                        let producer = rng.gen_range_usize(consumer);
                        let slot = rng.gen_range_usize(2);
                        net.connect_gate(gates[producer], gates[consumer], slot)
                            .expect("slot is in range");
                    }
                    black_box(net);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("destroy_all(n={n})"), |b| {
            b.iter_batched(
                || build_dag(n, &signals, 0x4E4D_0000_0000_0005),
                |(mut net, gates)| {
                    for g in gates {
                        net.destroy(g);
                    }
                    black_box(net);
                },
                BatchSize::LargeInput,
            );
        });
    }

    for &depth in &[1_024_usize, 262_144] {
        group.bench_function(format!("evaluate_chain(depth={depth})"), |b| {
            let (mut net, last) = build_chain(depth, &signals[0]);
            let mut scratch = EvalScratch::with_capacity(depth);
            b.iter(|| {
                let eval = net
                    .evaluate_with_scratch(&[last], &mut scratch)
                    .expect("chain is fully connected");
                black_box(eval.signal(0));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_nand);
criterion_main!(benches);
