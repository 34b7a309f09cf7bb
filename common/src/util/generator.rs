use crate::util::config::GenerateConfig;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};

const PINS_PER_MASTER: usize = 2;

pub fn generate_random_design(filename: &str, params: &GenerateConfig) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    write_random_design(&mut writer, params)?;
    writer.flush()
}

/// Writes a random but well-formed design. Every net is routed as a star of
/// L-shaped paths from its first pin, and some planar segments are repeated
/// on the second layer so the topology builder has redundancy to remove.
pub fn write_random_design<W: Write>(out: &mut W, params: &GenerateConfig) -> std::io::Result<()> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let rows = params.rows.max(1);
    let cols = params.cols.max(1);
    let redundancy = params.redundancy.clamp(0.0, 1.0);

    log::info!(
        "Generating design: {}x{} grid, {} cells, {} nets (redundancy {:.0}%)",
        rows,
        cols,
        params.cells,
        params.nets,
        redundancy * 100.0
    );

    writeln!(out, "MaxCellMove 0")?;
    writeln!(out, "GGridBoundaryIdx 1 1 {} {}", rows, cols)?;
    writeln!(out, "NumLayer 2")?;
    writeln!(out, "Lay M1 1 H 10")?;
    writeln!(out, "Lay M2 2 V 10")?;
    writeln!(out, "NumNonDefaultSupplyGGrid 0")?;
    writeln!(out, "NumMasterCell 1")?;
    writeln!(out, "MasterCell MC1 {} 0", PINS_PER_MASTER)?;
    for p in 0..PINS_PER_MASTER {
        writeln!(out, "Pin P{} M1", p + 1)?;
    }
    writeln!(out, "NumNeighborCellExtraDemand 0")?;

    let positions: Vec<(u32, u32)> = (0..params.cells)
        .map(|_| (rng.gen_range(1..=rows), rng.gen_range(1..=cols)))
        .collect();

    writeln!(out, "NumCellInst {}", params.cells)?;
    for (i, (row, col)) in positions.iter().enumerate() {
        writeln!(out, "CellInst C{} MC1 {} {} Movable", i + 1, row, col)?;
    }

    let mut routes: Vec<[u32; 7]> = Vec::new();
    writeln!(out, "NumNets {}", params.nets)?;
    for n in 0..params.nets {
        let pin_count = params.pins_per_net.min(params.cells);
        let members = sample(&mut rng, params.cells, pin_count).into_vec();

        writeln!(out, "Net N{} {} NoCstr", n + 1, members.len())?;
        for (j, &cell) in members.iter().enumerate() {
            writeln!(out, "Pin C{}/P{}", cell + 1, j % PINS_PER_MASTER + 1)?;
        }

        let net_start = routes.len();
        if let Some(&root_cell) = members.first() {
            let (r0, c0) = positions[root_cell];
            for &cell in &members[1..] {
                let (r, c) = positions[cell];
                if r != r0 {
                    routes.push([r0, c0, 1, r, c0, 1, n as u32]);
                }
                if c != c0 {
                    routes.push([r, c0, 1, r, c, 1, n as u32]);
                }
            }
        }

        let planar = routes.len() - net_start;
        for k in 0..planar {
            if rng.gen_bool(redundancy) {
                let [sr, sc, _, er, ec, _, net] = routes[net_start + k];
                routes.push([er, ec, 2, sr, sc, 2, net]);
            }
        }
    }

    writeln!(out, "NumRoutes {}", routes.len())?;
    for [sr, sc, sl, er, ec, el, net] in routes {
        writeln!(out, "{} {} {} {} {} {} N{}", sr, sc, sl, er, ec, el, net + 1)?;
    }
    Ok(())
}
