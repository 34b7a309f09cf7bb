use super::{ParseError, Tokens};
use crate::db::core::*;
use crate::db::indices::*;
use crate::geom::coord::GridCoord;
use crate::geom::rect::Rect;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

pub fn parse_file(path: &Path) -> Result<Design> {
    log::info!("Parsing design: {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read design file: {}", path.display()))?;
    let design =
        parse_str(&content).with_context(|| format!("Invalid design file: {}", path.display()))?;
    log::info!(
        "Parsed {} layers, {} master cells, {} cells, {} nets",
        design.layers.len(),
        design.master_cells.len(),
        design.num_cells(),
        design.num_nets()
    );
    Ok(design)
}

pub fn parse_str(content: &str) -> Result<Design, ParseError> {
    let mut design = Design::new();
    parse(&mut design, content)?;
    Ok(design)
}

pub fn parse(design: &mut Design, content: &str) -> Result<(), ParseError> {
    let mut tokens = Tokens::new(content);

    parse_grid(design, &mut tokens)?;
    parse_layers(design, &mut tokens)?;
    parse_supply_adjustments(design, &mut tokens)?;
    parse_master_cells(design, &mut tokens)?;
    parse_extra_demands(design, &mut tokens)?;
    parse_cells(design, &mut tokens)?;
    parse_nets(design, &mut tokens)?;
    parse_routes(design, &mut tokens)?;

    tokens.finish()
}

fn lookup<I: Copy>(
    map: &HashMap<String, I>,
    kind: &'static str,
    name: &str,
    tokens: &Tokens,
) -> Result<I, ParseError> {
    map.get(name).copied().ok_or_else(|| ParseError::UnknownName {
        kind,
        name: name.to_string(),
        position: tokens.position(),
    })
}

/// Row or column index. Planar points are `i32`, so larger values are
/// rejected here.
fn grid_index(tokens: &mut Tokens, expected: &'static str) -> Result<u32, ParseError> {
    let value: u32 = tokens.next_num(expected)?;
    if i32::try_from(value).is_err() {
        return Err(ParseError::Invalid {
            reason: format!("{expected} {value} exceeds {}", i32::MAX),
            position: tokens.position(),
        });
    }
    Ok(value)
}

fn layer_by_index(design: &Design, index: u32, tokens: &Tokens) -> Result<LayerId, ParseError> {
    if index == 0 || index as usize > design.layers.len() {
        return Err(ParseError::UnknownName {
            kind: "layer index",
            name: index.to_string(),
            position: tokens.position(),
        });
    }
    Ok(LayerId::new(index as usize - 1))
}

fn parse_grid(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // MaxCellMove <maxMoveCount>
    tokens.keyword("MaxCellMove")?;
    design.max_cell_move = tokens.next_num("max cell move count")?;

    // GGridBoundaryIdx <rowBeginIdx> <colBeginIdx> <rowEndIdx> <colEndIdx>
    tokens.keyword("GGridBoundaryIdx")?;
    let row_begin: i32 = tokens.next_num("row begin index")?;
    let col_begin: i32 = tokens.next_num("column begin index")?;
    let row_end: i32 = tokens.next_num("row end index")?;
    let col_end: i32 = tokens.next_num("column end index")?;

    design.boundary =
        Rect::new(col_end, col_begin, row_begin, row_end).map_err(|e| ParseError::Invalid {
            reason: e.to_string(),
            position: tokens.position(),
        })?;
    Ok(())
}

fn parse_layers(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // NumLayer <LayerCount>
    tokens.keyword("NumLayer")?;
    let count: usize = tokens.next_num("layer count")?;

    // Lay <layerName> <Idx> <RoutingDirection> <defaultSupplyOfOneGGrid>
    for i in 0..count {
        tokens.keyword("Lay")?;
        let name = tokens.next_str("layer name")?;
        let idx: usize = tokens.next_num("layer index")?;
        if idx != i + 1 {
            return Err(ParseError::OutOfOrder {
                kind: "layer",
                expected: (i + 1).to_string(),
                found: idx.to_string(),
                position: tokens.position(),
            });
        }
        let direction = match tokens.next_str("routing direction")? {
            "H" => LayerDirection::Horizontal,
            "V" => LayerDirection::Vertical,
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "H or V",
                    found: other.to_string(),
                    position: tokens.position(),
                });
            }
        };
        let supply: i32 = tokens.next_num("default supply")?;
        design.add_layer(name.to_string(), direction, supply);
    }
    Ok(())
}

fn parse_supply_adjustments(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // NumNonDefaultSupplyGGrid <nonDefaultSupplyGGridCount>
    tokens.keyword("NumNonDefaultSupplyGGrid")?;
    let count: usize = tokens.next_num("non-default supply count")?;

    // <rowIdx> <colIdx> <LayIdx> <incrOrDecrValue>
    design.supply_adjustments.reserve(count);
    for _ in 0..count {
        let row: u32 = tokens.next_num("row index")?;
        let col: u32 = tokens.next_num("column index")?;
        let layer_idx: u32 = tokens.next_num("layer index")?;
        let layer = layer_by_index(design, layer_idx, tokens)?;
        let delta: i32 = tokens.next_num("supply delta")?;
        design.supply_adjustments.push(SupplyAdjustment {
            row,
            col,
            layer,
            delta,
        });
    }
    Ok(())
}

fn parse_master_cells(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // NumMasterCell <masterCellCount>
    tokens.keyword("NumMasterCell")?;
    let count: usize = tokens.next_num("master cell count")?;

    // MasterCell <masterCellName> <pinCount> <blockageCount>
    for _ in 0..count {
        tokens.keyword("MasterCell")?;
        let name = tokens.next_str("master cell name")?.to_string();
        let pin_count: usize = tokens.next_num("pin count")?;
        let blkg_count: usize = tokens.next_num("blockage count")?;

        // Pin <pinName> <pinLayer>
        let mut pins = Vec::with_capacity(pin_count);
        for _ in 0..pin_count {
            tokens.keyword("Pin")?;
            let pin_name = tokens.next_str("pin name")?.to_string();
            let layer_name = tokens.next_str("pin layer")?;
            let layer = lookup(&design.layer_name_map, "layer", layer_name, tokens)?;
            pins.push(MasterPin {
                name: pin_name,
                layer,
            });
        }

        // Blkg <blockageName> <blockageLayer> <demand>
        let mut blockages = Vec::with_capacity(blkg_count);
        for _ in 0..blkg_count {
            tokens.keyword("Blkg")?;
            let blkg_name = tokens.next_str("blockage name")?.to_string();
            let layer_name = tokens.next_str("blockage layer")?;
            let layer = lookup(&design.layer_name_map, "layer", layer_name, tokens)?;
            let demand: u32 = tokens.next_num("blockage demand")?;
            blockages.push(Blockage {
                name: blkg_name,
                layer,
                demand,
            });
        }

        design.add_master_cell(MasterCellData {
            name,
            pins,
            blockages,
        });
    }
    Ok(())
}

fn parse_extra_demands(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // NumNeighborCellExtraDemand <count>
    tokens.keyword("NumNeighborCellExtraDemand")?;
    let count: usize = tokens.next_num("extra demand count")?;

    // sameGGrid <masterCellName1> <masterCellName2> <layerName> <demand>
    // adjHGGrid <masterCellName1> <masterCellName2> <layerName> <demand>
    for _ in 0..count {
        let kind = match tokens.next_str("sameGGrid or adjHGGrid")? {
            "sameGGrid" => ExtraDemandKind::SameGGrid,
            "adjHGGrid" => ExtraDemandKind::AdjHGGrid,
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "sameGGrid or adjHGGrid",
                    found: other.to_string(),
                    position: tokens.position(),
                });
            }
        };
        let first_name = tokens.next_str("master cell name")?;
        let first = lookup(&design.master_cell_name_map, "master cell", first_name, tokens)?;
        let second_name = tokens.next_str("master cell name")?;
        let second = lookup(&design.master_cell_name_map, "master cell", second_name, tokens)?;
        let layer_name = tokens.next_str("layer name")?;
        let layer = lookup(&design.layer_name_map, "layer", layer_name, tokens)?;
        let demand: u32 = tokens.next_num("extra demand")?;

        design.extra_demands.push(ExtraDemand {
            kind,
            first,
            second,
            layer,
            demand,
        });
    }
    Ok(())
}

fn parse_cells(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // NumCellInst <cellInstCount>
    tokens.keyword("NumCellInst")?;
    let count: usize = tokens.next_num("cell instance count")?;

    // CellInst <instName> <masterCellName> <gGridRowIdx> <gGridColIdx> <movableCstr>
    for _ in 0..count {
        tokens.keyword("CellInst")?;
        let name = tokens.next_str("instance name")?.to_string();
        let master_name = tokens.next_str("master cell name")?;
        let master = lookup(&design.master_cell_name_map, "master cell", master_name, tokens)?;
        let row = grid_index(tokens, "row index")?;
        let col = grid_index(tokens, "column index")?;
        let is_fixed = match tokens.next_str("Movable or Fixed")? {
            "Movable" => false,
            "Fixed" => true,
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "Movable or Fixed",
                    found: other.to_string(),
                    position: tokens.position(),
                });
            }
        };

        design.add_cell(CellData {
            name,
            master,
            row,
            col,
            is_fixed,
        });
    }
    Ok(())
}

fn parse_nets(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // NumNets <netCount>
    tokens.keyword("NumNets")?;
    let count: usize = tokens.next_num("net count")?;

    // Net <netName> <numPins> <minRoutingLayConstraint>
    for i in 0..count {
        tokens.keyword("Net")?;
        let name = tokens.next_str("net name")?;
        let expected = NetId::new(i).to_string();
        if name != expected {
            return Err(ParseError::OutOfOrder {
                kind: "net",
                expected,
                found: name.to_string(),
                position: tokens.position(),
            });
        }
        let pin_count: usize = tokens.next_num("pin count")?;
        let min_layer = match tokens.next_str("minimum routing layer")? {
            "NoCstr" => None,
            layer_name => Some(lookup(&design.layer_name_map, "layer", layer_name, tokens)?),
        };
        let net_id = design.add_net(name.to_string(), min_layer);

        // Pin <instName>/<masterPinName>
        for _ in 0..pin_count {
            tokens.keyword("Pin")?;
            let reference = tokens.next_str("<instName>/<masterPinName>")?;
            let (inst_name, pin_name) =
                reference
                    .split_once('/')
                    .ok_or_else(|| ParseError::UnexpectedToken {
                        expected: "<instName>/<masterPinName>",
                        found: reference.to_string(),
                        position: tokens.position(),
                    })?;
            let cell = lookup(&design.cell_name_map, "cell instance", inst_name, tokens)?;
            let master = &design.master_cells[design.cells[cell.index()].master.index()];
            let pin = master
                .pin_index(pin_name)
                .ok_or_else(|| ParseError::UnknownName {
                    kind: "master pin",
                    name: reference.to_string(),
                    position: tokens.position(),
                })?;
            design.nets[net_id.index()].pins.push(NetPin { cell, pin });
        }
    }
    Ok(())
}

fn parse_routes(design: &mut Design, tokens: &mut Tokens) -> Result<(), ParseError> {
    // NumRoutes <routeSegmentCount>
    tokens.keyword("NumRoutes")?;
    let count: usize = tokens.next_num("route segment count")?;

    // <sRowIdx> <sColIdx> <sLayIdx> <eRowIdx> <eColIdx> <eLayIdx> <netName>
    for _ in 0..count {
        let source = parse_coord(design, tokens)?;
        let target = parse_coord(design, tokens)?;
        let net_name = tokens.next_str("net name")?;
        let net = lookup(&design.net_name_map, "net", net_name, tokens)?;

        let changed = [
            source.row != target.row,
            source.col != target.col,
            source.layer != target.layer,
        ]
        .into_iter()
        .filter(|&c| c)
        .count();
        if changed != 1 {
            return Err(ParseError::MalformedRoute {
                net: net_name.to_string(),
                position: tokens.position(),
            });
        }

        design.nets[net.index()]
            .route_segments
            .push(RouteSegment { source, target });
    }
    log::debug!("Read {} route segments", count);
    Ok(())
}

fn parse_coord(design: &Design, tokens: &mut Tokens) -> Result<GridCoord, ParseError> {
    let row = grid_index(tokens, "row index")?;
    let col = grid_index(tokens, "column index")?;
    let layer: u32 = tokens.next_num("layer index")?;
    layer_by_index(design, layer, tokens)?;
    Ok(GridCoord::new(row, col, layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;

    const SAMPLE: &str = "\
MaxCellMove 1
GGridBoundaryIdx 1 1 5 5
NumLayer 2
Lay M1 1 H 10
Lay M2 2 V 8
NumNonDefaultSupplyGGrid 1
2 2 1 -3
NumMasterCell 2
MasterCell MC1 2 1
Pin P1 M1
Pin P2 M1
Blkg B1 M1 2
MasterCell MC2 1 0
Pin P1 M2
NumNeighborCellExtraDemand 1
sameGGrid MC1 MC2 M1 1
NumCellInst 3
CellInst C1 MC1 1 1 Movable
CellInst C2 MC2 1 4 Fixed
CellInst C3 MC1 3 4 Movable
NumNets 2
Net N1 2 NoCstr
Pin C1/P1
Pin C2/P1
Net N2 2 M2
Pin C2/P1
Pin C3/P2
NumRoutes 4
1 1 1 1 4 1 N1
1 4 1 1 4 2 N1
1 4 2 3 4 2 N2
1 4 1 1 4 2 N2
";

    #[test]
    fn parses_sample_design() {
        let design = parse_str(SAMPLE).unwrap();
        assert_eq!(design.max_cell_move, 1);
        assert_eq!(design.boundary.width(), 4);
        assert_eq!(design.layers.len(), 2);
        assert_eq!(design.layers[1].direction, LayerDirection::Vertical);
        assert_eq!(design.supply_adjustments[0].delta, -3);
        assert_eq!(design.master_cells[0].blockages[0].demand, 2);
        assert_eq!(design.extra_demands[0].kind, ExtraDemandKind::SameGGrid);
        assert!(design.cells[1].is_fixed);
        assert_eq!(design.num_nets(), 2);
        assert_eq!(design.nets[1].min_layer, Some(LayerId::new(1)));

        let n2 = &design.nets[1];
        assert_eq!(
            n2.pins,
            vec![
                NetPin {
                    cell: CellId::new(1),
                    pin: 0
                },
                NetPin {
                    cell: CellId::new(2),
                    pin: 1
                }
            ]
        );
        assert_eq!(design.pin_position(n2.pins[1]), Point::new(3, 4));
        assert_eq!(design.pin_layer(n2.pins[0]), LayerId::new(1));
        assert_eq!(design.nets[0].route_segments.len(), 2);
        assert!(design.nets[0].route_segments[1].is_via());
    }

    #[test]
    fn rejects_out_of_order_net() {
        let text = SAMPLE.replace("Net N2 2 M2", "Net N5 2 M2");
        assert!(matches!(
            parse_str(&text),
            Err(ParseError::OutOfOrder { kind: "net", .. })
        ));
    }

    #[test]
    fn rejects_diagonal_route() {
        let text = SAMPLE.replace("1 1 1 1 4 1 N1", "1 1 1 2 4 1 N1");
        assert!(matches!(
            parse_str(&text),
            Err(ParseError::MalformedRoute { .. })
        ));
    }

    #[test]
    fn rejects_unknown_pin_reference() {
        let text = SAMPLE.replace("Pin C3/P2", "Pin C3/P9");
        assert!(matches!(
            parse_str(&text),
            Err(ParseError::UnknownName {
                kind: "master pin",
                ..
            })
        ));
    }

    #[test]
    fn rejects_grid_index_beyond_i32() {
        let cell = SAMPLE.replace("CellInst C3 MC1 3 4", "CellInst C3 MC1 3000000000 4");
        assert!(matches!(
            parse_str(&cell),
            Err(ParseError::Invalid { .. })
        ));

        let route = SAMPLE.replace("1 4 2 3 4 2 N2", "1 4 2 2147483648 4 2 N2");
        assert!(matches!(
            parse_str(&route),
            Err(ParseError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_trailing_tokens() {
        let text = format!("{SAMPLE}extra");
        assert!(matches!(
            parse_str(&text),
            Err(ParseError::TrailingInput { .. })
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let text = SAMPLE.replace("1 4 1 1 4 2 N2\n", "");
        assert!(matches!(
            parse_str(&text),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }
}
