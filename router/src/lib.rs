pub mod algo;
pub mod report;
pub mod topology;
pub mod utils;

use netree_common::db::core::{Design, NetData};
use netree_common::db::indices::NetId;
use netree_common::util::config::TopologyConfig;
use rayon::prelude::*;
use topology::{NetTree, TopologyBuilder, TopologyError};
use utils::projection::project_net;

/// Reconstruction result of one net.
#[derive(Debug)]
pub struct NetOutcome {
    pub net: NetId,
    pub result: Result<NetTree, TopologyError>,
}

impl NetOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Builds the tree of every net. A failing net never stops the others, and
/// outcomes come back in net order.
pub fn run(design: &Design, config: &TopologyConfig) -> Vec<NetOutcome> {
    log::info!(
        "Reconstructing {} nets (stub policy: {:?}, parallel: {})",
        design.num_nets(),
        config.stub_policy,
        config.parallel
    );
    let builder = TopologyBuilder::new(config.stub_policy);

    let build = |(idx, net): (usize, &NetData)| NetOutcome {
        net: NetId::new(idx),
        result: build_net(design, net, &builder),
    };

    if config.parallel {
        design.nets.par_iter().enumerate().map(build).collect()
    } else {
        design.nets.iter().enumerate().map(build).collect()
    }
}

pub fn build_net(
    design: &Design,
    net: &NetData,
    builder: &TopologyBuilder,
) -> Result<NetTree, TopologyError> {
    let planar = project_net(design, net)?;
    // Pins stacked in one gcell are joined by vias alone.
    if planar.segments.is_empty() {
        if let Some(tree) = NetTree::single_location(&planar.pins) {
            return Ok(tree);
        }
    }
    builder.build(&planar.pins, &planar.segments)
}
