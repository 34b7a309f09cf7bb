use netree_common::db::parser::iccad;
use netree_common::geom::{GeomError, Point, Segment};
use netree_common::util::config::{GenerateConfig, StubPolicy, TopologyConfig};
use netree_common::util::generator::write_random_design;
use netree_router::report::Summary;
use netree_router::topology::{EndpointTable, SpanningForest, TopologyBuilder, TopologyError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

fn seg(a: (i32, i32), b: (i32, i32)) -> Segment {
    Segment::new(a.into(), b.into()).unwrap()
}

/// Component label per endpoint, computed by naive relabelling.
fn reference_labels(table: &EndpointTable, segments: &[Segment]) -> Vec<usize> {
    let mut label: Vec<usize> = (0..table.len()).collect();
    for s in segments {
        let a = label[table.index_of(s.source()).unwrap()];
        let b = label[table.index_of(s.target()).unwrap()];
        for l in label.iter_mut() {
            if *l == b {
                *l = a;
            }
        }
    }
    label
}

fn count_distinct(labels: &[usize]) -> usize {
    let mut v = labels.to_vec();
    v.sort_unstable();
    v.dedup();
    v.len()
}

fn random_segments(rng: &mut StdRng, count: usize, span: i32) -> Vec<Segment> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..span);
            let y = rng.gen_range(0..span);
            let mut other = rng.gen_range(0..span - 1);
            if rng.gen_bool(0.5) {
                if other >= y {
                    other += 1;
                }
                seg((x, y), (x, other))
            } else {
                if other >= x {
                    other += 1;
                }
                seg((x, y), (other, y))
            }
        })
        .collect()
}

#[test]
fn straight_chain_keeps_every_segment() {
    let pins = [p(0, 0), p(0, 3)];
    let segments = [seg((0, 0), (0, 1)), seg((0, 1), (0, 2)), seg((0, 2), (0, 3))];
    let tree = TopologyBuilder::default().build(&pins, &segments).unwrap();

    assert_eq!(tree.len(), 4);
    assert!(tree.redundant_segments().is_empty());
    assert_eq!(tree.root_point(), p(0, 0));
    assert_eq!(tree.pseudo_pins().count(), 2);
}

#[test]
fn shortcut_closing_a_cycle_is_discarded() {
    let pins = [p(0, 0), p(0, 3)];
    let segments = [
        seg((0, 0), (0, 1)),
        seg((0, 1), (0, 2)),
        seg((0, 2), (0, 3)),
        seg((0, 0), (0, 3)),
    ];
    let tree = TopologyBuilder::default().build(&pins, &segments).unwrap();

    assert_eq!(tree.redundant_segments(), &[seg((0, 0), (0, 3))]);
    assert!(tree.contains(p(0, 0)));
    assert!(tree.contains(p(0, 3)));
    let far = tree.find(p(0, 3)).unwrap();
    assert_eq!(*tree.path_to_root(far).last().unwrap(), tree.root());
}

#[test]
fn pin_off_the_wires_is_missing() {
    let pins = [p(0, 0), p(5, 5)];
    let segments = [seg((0, 0), (0, 4))];
    let err = TopologyBuilder::default()
        .build(&pins, &segments)
        .unwrap_err();
    assert_eq!(
        err,
        TopologyError::MissingPin {
            pin: 1,
            point: p(5, 5)
        }
    );
}

#[test]
fn two_islands_are_disconnected() {
    let pins = [p(0, 0), p(9, 9)];
    let segments = [seg((0, 0), (0, 2)), seg((9, 9), (9, 5))];
    let err = TopologyBuilder::default()
        .build(&pins, &segments)
        .unwrap_err();
    assert_eq!(err, TopologyError::DisconnectedNet { components: 2 });
}

#[test]
fn diagonal_segment_fails_construction() {
    assert_eq!(
        Segment::new(p(1, 1), p(2, 2)),
        Err(GeomError::InvalidSegment {
            from: p(1, 1),
            to: p(2, 2)
        })
    );
}

#[test]
fn dedup_preserves_components_and_is_acyclic() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.gen_range(1..40);
        let segments = random_segments(&mut rng, count, 6);
        let table = EndpointTable::from_segments(&segments);
        let forest = SpanningForest::build(&table, &segments);

        let full = reference_labels(&table, &segments);
        let kept = reference_labels(&table, forest.retained());
        for a in 0..table.len() {
            for b in 0..table.len() {
                assert_eq!(full[a] == full[b], kept[a] == kept[b], "seed {seed}");
            }
        }

        let components = count_distinct(&full);
        assert_eq!(forest.components(), components);
        assert_eq!(forest.retained().len(), table.len() - components);
        assert_eq!(count_distinct(&kept), components);
        assert_eq!(
            forest.retained().len() + forest.redundant().len(),
            segments.len()
        );
    }
}

#[test]
fn every_pin_is_covered_and_leaves_are_pins() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let root = p(rng.gen_range(0..8), rng.gen_range(0..8));
        let mut pins = vec![root];
        let mut segments = Vec::new();
        for _ in 0..rng.gen_range(1..6) {
            let pin = p(rng.gen_range(0..8), rng.gen_range(0..8));
            let bend = p(pin.x, root.y);
            if bend != root {
                segments.push(Segment::new(root, bend).unwrap());
            }
            if bend != pin {
                segments.push(Segment::new(bend, pin).unwrap());
            }
            pins.push(pin);
        }
        // Extra wiring that only adds redundancy or stubs.
        let extras: Vec<Segment> = random_segments(&mut rng, 3, 8)
            .into_iter()
            .filter(|s| {
                s.endpoints()
                    .iter()
                    .any(|e| segments.iter().any(|t| t.other(*e).is_some()))
            })
            .collect();
        segments.extend(extras);
        if segments.is_empty() {
            // Every pin landed on the root; no wire to rebuild.
            continue;
        }

        let tree = TopologyBuilder::default()
            .build(&pins, &segments)
            .unwrap_or_else(|err| panic!("seed {seed}: {err}"));
        for pin in &pins {
            assert!(tree.contains(*pin), "seed {seed}: {pin} missing");
        }
        assert!(tree.leaves().all(|n| !n.is_pseudo_pin()));
        assert_eq!(tree.segments().count(), tree.len() - 1);
    }
}

#[test]
fn building_is_deterministic() {
    let pins = [p(0, 0), p(4, 4), p(0, 4)];
    let segments = [
        seg((0, 0), (0, 4)),
        seg((0, 4), (4, 4)),
        seg((0, 0), (4, 0)),
        seg((4, 0), (4, 4)),
    ];
    let builder = TopologyBuilder::new(StubPolicy::Prune);
    let a = builder.build(&pins, &segments).unwrap();
    let b = builder.build(&pins, &segments).unwrap();
    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(a.redundant_segments(), &[seg((4, 0), (4, 4))]);
    // (4, 0) is left hanging by the discarded segment and gets pruned.
    assert_eq!(a.pruned_segments(), &[seg((0, 0), (4, 0))]);
}

#[test]
fn generated_design_builds_in_parallel_and_serially() {
    let params = GenerateConfig {
        rows: 16,
        cols: 16,
        cells: 60,
        nets: 40,
        pins_per_net: 4,
        redundancy: 0.3,
        seed: 42,
    };
    let mut buf = Vec::new();
    write_random_design(&mut buf, &params).unwrap();
    let design = iccad::parse_str(&String::from_utf8(buf).unwrap()).unwrap();

    let parallel = netree_router::run(&design, &TopologyConfig::default());
    let serial = netree_router::run(
        &design,
        &TopologyConfig {
            stub_policy: StubPolicy::Prune,
            parallel: false,
        },
    );

    let summary = Summary::from_outcomes(&parallel);
    assert_eq!(summary.nets, 40);
    assert!(summary.all_built(), "{summary:?}");
    assert_eq!(summary, Summary::from_outcomes(&serial));

    for (a, b) in parallel.iter().zip(&serial) {
        assert_eq!(a.net, b.net);
        let (ta, tb) = (a.result.as_ref().unwrap(), b.result.as_ref().unwrap());
        assert_eq!(ta.nodes(), tb.nodes());
    }
}
