use netree_common::db::core::{Design, NetData};
use netree_common::geom::{GeomError, Point, Segment};

/// Planar view of one net: pin locations in declaration order and the
/// non-via route segments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanarNet {
    pub pins: Vec<Point>,
    pub segments: Vec<Segment>,
    pub vias: usize,
}

pub fn project_net(design: &Design, net: &NetData) -> Result<PlanarNet, GeomError> {
    let pins: Vec<Point> = net.pins.iter().map(|&p| design.pin_position(p)).collect();

    let mut segments = Vec::with_capacity(net.route_segments.len());
    let mut vias = 0;
    for route in &net.route_segments {
        if route.is_via() {
            vias += 1;
            continue;
        }
        let seg = Segment::new(route.source.planar(), route.target.planar())?;
        for end in seg.endpoints() {
            if !design.boundary.contains(end) {
                log::warn!(
                    "Net '{}': route endpoint {} lies outside the grid boundary",
                    net.name,
                    end
                );
            }
        }
        segments.push(seg);
    }

    Ok(PlanarNet {
        pins,
        segments,
        vias,
    })
}

/// Layer of each segment `project_net` yields, in the same order.
pub fn planar_layers(net: &NetData) -> Vec<u32> {
    net.route_segments
        .iter()
        .filter(|route| !route.is_via())
        .map(|route| route.source.layer)
        .collect()
}
