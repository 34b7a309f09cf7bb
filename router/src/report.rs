use crate::NetOutcome;
use crate::topology::{NetTree, TopologyError};
use crate::utils::projection::planar_layers;
use netree_common::db::core::{Design, NetData, RouteSegment};
use netree_common::geom::coord::GridCoord;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub nets: usize,
    pub built: usize,
    pub failed: usize,
    pub missing_pin: usize,
    pub disconnected: usize,
    pub other_failures: usize,
    pub tree_nodes: usize,
    pub pseudo_pins: usize,
    pub redundant_segments: usize,
    pub pruned_segments: usize,
    pub wirelength: u64,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[NetOutcome]) -> Self {
        let mut summary = Summary {
            nets: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match &outcome.result {
                Ok(tree) => {
                    summary.built += 1;
                    summary.tree_nodes += tree.len();
                    summary.pseudo_pins += tree.pseudo_pins().count();
                    summary.redundant_segments += tree.redundant_segments().len();
                    summary.pruned_segments += tree.pruned_segments().len();
                    summary.wirelength += tree.wirelength();
                }
                Err(err) => {
                    summary.failed += 1;
                    match err {
                        TopologyError::MissingPin { .. } => summary.missing_pin += 1,
                        TopologyError::DisconnectedNet { .. } => summary.disconnected += 1,
                        _ => summary.other_failures += 1,
                    }
                }
            }
        }
        summary
    }

    pub fn all_built(&self) -> bool {
        self.failed == 0
    }
}

pub fn log_summary(design: &Design, outcomes: &[NetOutcome]) -> Summary {
    for outcome in outcomes {
        if let Err(err) = &outcome.result {
            let name = &design.nets[outcome.net.index()].name;
            log::error!("Net '{}': {}", name, err);
        }
    }

    let summary = Summary::from_outcomes(outcomes);
    log::info!(
        "Built {}/{} nets: {} nodes ({} pseudo-pins), wirelength {}",
        summary.built,
        summary.nets,
        summary.tree_nodes,
        summary.pseudo_pins,
        summary.wirelength
    );
    log::info!(
        "Discarded {} redundant segments, pruned {} stub segments",
        summary.redundant_segments,
        summary.pruned_segments
    );
    if summary.all_built() {
        log::info!("\x1b[32mPASS\x1b[0m: every net forms a tree.");
    } else {
        log::error!(
            "\x1b[31mFAIL\x1b[0m: {} nets failed ({} missing pin, {} disconnected, {} other)",
            summary.failed,
            summary.missing_pin,
            summary.disconnected,
            summary.other_failures
        );
    }
    summary
}

/// Serializable per-net record for the JSON report.
#[derive(Debug, Serialize)]
pub struct NetReport<'a> {
    pub net: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<&'a NetTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn net_reports<'a>(design: &'a Design, outcomes: &'a [NetOutcome]) -> Vec<NetReport<'a>> {
    outcomes
        .iter()
        .map(|outcome| {
            let net = design.nets[outcome.net.index()].name.as_str();
            match &outcome.result {
                Ok(tree) => NetReport {
                    net,
                    tree: Some(tree),
                    error: None,
                },
                Err(err) => NetReport {
                    net,
                    tree: None,
                    error: Some(err.to_string()),
                },
            }
        })
        .collect()
}

/// Route segments that rebuild `tree` in a design file: a via stack at
/// every node spanning the layers of its pins and wires, then each tree
/// edge on the layer it was routed on.
pub fn tree_routes(design: &Design, net: &NetData, tree: &NetTree) -> Vec<RouteSegment> {
    let layers = planar_layers(net);
    let mut routes = Vec::new();

    for node in tree.nodes() {
        let pin_layers = node
            .pins
            .iter()
            .map(|&pin| design.pin_layer(net.pins[pin]).index() as u32 + 1);
        let wire_layers = node
            .children
            .iter()
            .filter_map(|&child| tree.node(child).route)
            .chain(node.route)
            .map(|route| layers[route]);

        let mut span: Option<(u32, u32)> = None;
        for layer in pin_layers.chain(wire_layers) {
            span = Some(match span {
                Some((lo, hi)) => (lo.min(layer), hi.max(layer)),
                None => (layer, layer),
            });
        }
        if let Some((lo, hi)) = span {
            if lo < hi {
                routes.push(RouteSegment {
                    source: GridCoord::from_planar(node.point, lo),
                    target: GridCoord::from_planar(node.point, hi),
                });
            }
        }
    }

    for node in tree.nodes() {
        if let (Some(seg), Some(route)) = (node.uplink, node.route) {
            let layer = layers[route];
            routes.push(RouteSegment {
                source: GridCoord::from_planar(seg.source(), layer),
                target: GridCoord::from_planar(seg.target(), layer),
            });
        }
    }
    routes
}

/// Writes the `NumRoutes` section of a design file. Built nets get their
/// tree's routes; nets that failed keep their input routes.
pub fn write_routes<W: Write>(
    design: &Design,
    outcomes: &[NetOutcome],
    mut out: W,
) -> io::Result<usize> {
    let mut lines: Vec<(RouteSegment, &str)> = Vec::new();
    for outcome in outcomes {
        let net = &design.nets[outcome.net.index()];
        match &outcome.result {
            Ok(tree) => lines.extend(
                tree_routes(design, net, tree)
                    .into_iter()
                    .map(|route| (route, net.name.as_str())),
            ),
            Err(_) => lines.extend(
                net.route_segments
                    .iter()
                    .map(|&route| (route, net.name.as_str())),
            ),
        }
    }

    writeln!(out, "NumRoutes {}", lines.len())?;
    for (route, name) in &lines {
        writeln!(out, "{} {} {}", route.source, route.target, name)?;
    }
    out.flush()?;
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::TopologyBuilder;
    use netree_common::db::indices::NetId;
    use netree_common::db::parser::iccad;
    use netree_common::geom::{Point, Segment};
    use netree_common::util::config::{StubPolicy, TopologyConfig};

    #[test]
    fn summary_counts_by_kind() {
        let builder = TopologyBuilder::default();
        let line = vec![
            Segment::new(Point::new(0, 0), Point::new(0, 2)).unwrap(),
            Segment::new(Point::new(0, 2), Point::new(0, 0)).unwrap(),
        ];
        let outcomes = vec![
            NetOutcome {
                net: NetId::new(0),
                result: builder.build(&[Point::new(0, 0), Point::new(0, 2)], &line),
            },
            NetOutcome {
                net: NetId::new(1),
                result: builder.build(&[Point::new(5, 5)], &line),
            },
            NetOutcome {
                net: NetId::new(2),
                result: builder.build(&[], &[]),
            },
        ];

        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(summary.nets, 3);
        assert_eq!(summary.built, 1);
        assert_eq!(summary.missing_pin, 1);
        assert_eq!(summary.other_failures, 1);
        assert_eq!(summary.redundant_segments, 1);
        assert_eq!(summary.wirelength, 2);
        assert!(!summary.all_built());
    }

    const HEADER: &str = "\
MaxCellMove 0
GGridBoundaryIdx 1 1 5 5
NumLayer 2
Lay M1 1 H 10
Lay M2 2 V 10
NumNonDefaultSupplyGGrid 0
NumMasterCell 2
MasterCell MC1 1 0
Pin P1 M1
MasterCell MC2 1 0
Pin P1 M2
NumNeighborCellExtraDemand 0
NumCellInst 3
CellInst C1 MC1 1 1 Movable
CellInst C2 MC2 1 4 Movable
CellInst C3 MC1 4 4 Movable
NumNets 2
Net N1 3 NoCstr
Pin C1/P1
Pin C2/P1
Pin C3/P1
Net N2 2 NoCstr
Pin C1/P1
Pin C3/P1
";

    const ROUTES: &str = "\
NumRoutes 6
1 1 1 1 4 1 N1
1 4 1 1 4 2 N1
1 4 2 4 4 2 N1
4 4 1 4 4 2 N1
1 4 1 4 4 1 N1
2 2 1 2 3 1 N2
";

    fn build_all(text: &str) -> (Design, Vec<NetOutcome>) {
        let design = iccad::parse_str(text).unwrap();
        let config = TopologyConfig {
            stub_policy: StubPolicy::Prune,
            parallel: false,
        };
        let outcomes = crate::run(&design, &config);
        (design, outcomes)
    }

    #[test]
    fn routes_are_written_per_tree_edge_with_via_stacks() {
        let (design, outcomes) = build_all(&format!("{HEADER}{ROUTES}"));
        let mut buf = Vec::new();
        let count = write_routes(&design, &outcomes, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(count, 5);
        assert_eq!(
            text,
            "\
NumRoutes 5
1 4 1 1 4 2 N1
4 4 1 4 4 2 N1
1 1 1 1 4 1 N1
1 4 2 4 4 2 N1
2 2 1 2 3 1 N2
"
        );
    }

    #[test]
    fn written_routes_rebuild_the_same_trees() {
        let (design, outcomes) = build_all(&format!("{HEADER}{ROUTES}"));
        let mut buf = Vec::new();
        write_routes(&design, &outcomes, &mut buf).unwrap();
        let written = String::from_utf8(buf).unwrap();

        let (_, rebuilt) = build_all(&format!("{HEADER}{written}"));
        assert_eq!(rebuilt.len(), outcomes.len());
        for (a, b) in outcomes.iter().zip(&rebuilt) {
            match (&a.result, &b.result) {
                (Ok(ta), Ok(tb)) => {
                    assert_eq!(ta.len(), tb.len());
                    for (na, nb) in ta.nodes().iter().zip(tb.nodes()) {
                        assert_eq!(na.point, nb.point);
                        assert_eq!(na.parent, nb.parent);
                        assert_eq!(na.children, nb.children);
                        assert_eq!(na.pins, nb.pins);
                        assert_eq!(na.uplink, nb.uplink);
                    }
                    assert!(tb.redundant_segments().is_empty());
                }
                (Err(ea), Err(eb)) => assert_eq!(ea, eb),
                _ => panic!("net {} changed outcome", a.net),
            }
        }
    }
}
