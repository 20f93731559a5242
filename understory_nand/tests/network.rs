// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_nand` crate.
//!
//! These exercise the public `Network` API end to end: how connections are
//! mirrored between producers and consumers, and how evaluation reports
//! outputs, critical paths, cycles, and disconnected inputs.

use core::cell::Cell;

use understory_nand::{
    Error, ErrorKind, EvalScratch, GateId, Input, InvalidArgument, Network, Signal,
};

/// Checks every fan-out entry of `producer` against the consumer slot it names.
fn assert_fan_out_mirrored(net: &Network<'_>, producer: GateId) {
    let dependents = net.dependents(producer).unwrap();
    assert_eq!(dependents.len(), net.fan_out(producer).unwrap());
    for (index, dep) in dependents.iter().enumerate() {
        assert_eq!(net.dependent_at(producer, index).unwrap(), dep.consumer);
        assert_eq!(
            net.input_at(dep.consumer, dep.slot).unwrap(),
            Input::Gate(producer),
            "entry {index} of {producer:?}"
        );
    }
}

#[test]
fn replacing_a_gate_input_shrinks_the_old_fan_out_by_one() {
    let s = Cell::new(true);
    let mut net = Network::new();
    let old = net.create(1).unwrap();
    let new = net.create(1).unwrap();
    let consumers: Vec<_> = (0..5).map(|_| net.create(2).unwrap()).collect();
    for &c in &consumers {
        net.connect_gate(old, c, 0).unwrap();
        net.connect_gate(old, c, 1).unwrap();
    }
    assert_eq!(net.fan_out(old).unwrap(), 10);

    net.connect_gate(new, consumers[1], 0).unwrap();
    assert_eq!(net.input_at(consumers[1], 0).unwrap(), Input::Gate(new));
    assert_eq!(net.fan_out(old).unwrap(), 9);
    assert_fan_out_mirrored(&net, old);

    net.connect_signal(&s, consumers[3], 1).unwrap();
    assert_eq!(
        net.input_at(consumers[3], 1).unwrap(),
        Input::Signal(Signal::new(&s))
    );
    assert_eq!(net.fan_out(old).unwrap(), 8);
    assert_fan_out_mirrored(&net, old);
    assert_fan_out_mirrored(&net, new);
}

#[test]
fn unresolved_input_leaves_the_network_reusable() {
    let s = Cell::new(true);
    let mut net = Network::new();
    let a = net.create(2).unwrap();
    let b = net.create(1).unwrap();
    net.connect_signal(&s, a, 0).unwrap();
    net.connect_gate(a, b, 0).unwrap();

    let err = net.evaluate(&[b]).unwrap_err();
    assert_eq!(err, Error::UnresolvedInput { gate: a, slot: 1 });
    assert_eq!(err.kind(), ErrorKind::UnresolvedInput);

    net.connect_signal(&s, a, 1).unwrap();
    let eval = net.evaluate(&[b]).unwrap();
    assert_eq!(eval.signals(), &[true]);
    assert_eq!(eval.critical_path(), 2);
}

#[test]
fn cycle_does_not_poison_later_evaluations() {
    let s = Cell::new(true);
    let mut net = Network::new();
    let x = net.create(2).unwrap();
    let y = net.create(1).unwrap();
    let z = net.create(1).unwrap();
    net.connect_signal(&s, x, 0).unwrap();
    net.connect_gate(z, x, 1).unwrap();
    net.connect_gate(x, y, 0).unwrap();
    net.connect_gate(y, z, 0).unwrap();

    let free = net.create(2).unwrap();
    net.connect_signal(&s, free, 0).unwrap();
    net.connect_signal(&s, free, 1).unwrap();

    let mut scratch = EvalScratch::new();
    let err = net.evaluate_with_scratch(&[y], &mut scratch).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CycleDetected);

    // `x` was marked during the failed call; it must evaluate normally now
    // that the loop is cut.
    let eval = net.evaluate_with_scratch(&[free], &mut scratch).unwrap();
    assert_eq!(eval.signals(), &[false]);

    net.connect_signal(&s, x, 1).unwrap();
    let eval = net.evaluate_with_scratch(&[z, free], &mut scratch).unwrap();
    // x = !(1 & 1) = 0, y = 1, z = 0
    assert_eq!(eval.signals(), &[false, false]);
    assert_eq!(eval.critical_path(), 3);
}

#[test]
fn single_gate_truth() {
    let t = Cell::new(true);
    let f = Cell::new(false);
    let mut net = Network::new();
    let g = net.create(2).unwrap();
    net.connect_signal(&t, g, 0).unwrap();
    net.connect_signal(&t, g, 1).unwrap();

    let eval = net.evaluate(&[g]).unwrap();
    assert_eq!(eval.signals(), &[false]);
    assert_eq!(eval.critical_path(), 1);

    net.connect_signal(&f, g, 1).unwrap();
    let eval = net.evaluate(&[g]).unwrap();
    assert_eq!(eval.signals(), &[true]);
    assert_eq!(eval.critical_path(), 1);
}

#[test]
fn three_gate_chain() {
    let t = Cell::new(true);
    let mut net = Network::new();
    let g1 = net.create(2).unwrap();
    let g2 = net.create(2).unwrap();
    let g3 = net.create(2).unwrap();
    net.connect_signal(&t, g1, 0).unwrap();
    net.connect_signal(&t, g1, 1).unwrap();
    for slot in 0..2 {
        net.connect_gate(g1, g2, slot).unwrap();
        net.connect_gate(g2, g3, slot).unwrap();
    }

    let eval = net.evaluate(&[g3]).unwrap();
    assert_eq!(eval.signals(), &[false]);
    assert_eq!(eval.critical_path(), 3);

    t.set(false);
    let eval = net.evaluate(&[g3]).unwrap();
    assert_eq!(eval.signals(), &[true]);
}

#[test]
fn destroying_a_shared_producer_empties_both_consumers() {
    let s = Cell::new(true);
    let mut net = Network::new();
    let p = net.create(1).unwrap();
    let c1 = net.create(2).unwrap();
    let c2 = net.create(1).unwrap();
    net.connect_signal(&s, p, 0).unwrap();
    net.connect_signal(&s, c1, 0).unwrap();
    net.connect_gate(p, c1, 1).unwrap();
    net.connect_gate(p, c2, 0).unwrap();
    assert!(net.evaluate(&[c1, c2]).is_ok());

    assert!(net.destroy(p));

    assert_eq!(net.input_at(c1, 1).unwrap(), Input::Empty);
    assert_eq!(net.input_at(c2, 0).unwrap(), Input::Empty);
    assert_eq!(
        net.evaluate(&[c1]),
        Err(Error::UnresolvedInput { gate: c1, slot: 1 })
    );
    assert_eq!(
        net.evaluate(&[c2]),
        Err(Error::UnresolvedInput { gate: c2, slot: 0 })
    );
}

#[test]
fn repeated_connect_is_idempotent() {
    let mut net = Network::new();
    let p = net.create(1).unwrap();
    let c = net.create(1).unwrap();

    net.connect_gate(p, c, 0).unwrap();
    net.connect_gate(p, c, 0).unwrap();

    assert_eq!(net.fan_out(p).unwrap(), 1);
    assert_fan_out_mirrored(&net, p);
}

#[test]
fn invalid_requests_are_rejected() {
    let s = Cell::new(true);
    let mut net = Network::new();
    let g = net.create(1).unwrap();
    net.connect_signal(&s, g, 0).unwrap();

    assert_eq!(
        net.evaluate(&[]),
        Err(Error::InvalidArgument(InvalidArgument::EmptyRequest))
    );
    assert_eq!(
        net.evaluate(&[g, g]),
        Err(Error::InvalidArgument(InvalidArgument::DuplicateGate(g)))
    );
    assert_eq!(
        net.connect_signal(&s, g, 1),
        Err(Error::InvalidArgument(InvalidArgument::SlotOutOfRange {
            gate: g,
            slot: 1,
            arity: 1
        }))
    );
    assert_eq!(
        net.input_at(g, 5).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );

    assert!(net.destroy(g));
    assert_eq!(
        net.evaluate(&[g]),
        Err(Error::InvalidArgument(InvalidArgument::StaleGate(g)))
    );
    assert_eq!(
        net.fan_out(g),
        Err(Error::InvalidArgument(InvalidArgument::StaleGate(g)))
    );
}

#[test]
fn wide_fan_out_tree() {
    // One source gate feeding a balanced binary tree of depth 6.
    let s = Cell::new(false);
    let mut net = Network::new();
    let root = net.create(1).unwrap();
    net.connect_signal(&s, root, 0).unwrap();

    let mut layer = vec![root];
    for _ in 0..6 {
        let mut next = Vec::new();
        for &g in &layer {
            for _ in 0..2 {
                let child = net.create(2).unwrap();
                net.connect_gate(g, child, 0).unwrap();
                net.connect_gate(g, child, 1).unwrap();
                next.push(child);
            }
        }
        layer = next;
    }

    assert_eq!(net.len(), 127);
    let eval = net.evaluate(&layer).unwrap();
    assert_eq!(eval.signals().len(), 64);
    assert_eq!(eval.critical_path(), 7);
    // The root is true and every layer inverts, so odd depths are true.
    assert!(eval.signals().iter().all(|&v| v));
}
