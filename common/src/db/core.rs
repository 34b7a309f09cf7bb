use crate::db::indices::*;
use crate::geom::coord::GridCoord;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerDirection {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug)]
pub struct LayerData {
    pub name: String,
    pub index: LayerId,
    pub direction: LayerDirection,
    pub default_supply: i32,
}

/// Supply change of one gcell on one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplyAdjustment {
    pub row: u32,
    pub col: u32,
    pub layer: LayerId,
    pub delta: i32,
}

#[derive(Clone, Debug)]
pub struct MasterPin {
    pub name: String,
    pub layer: LayerId,
}

#[derive(Clone, Debug)]
pub struct Blockage {
    pub name: String,
    pub layer: LayerId,
    pub demand: u32,
}

#[derive(Clone, Debug)]
pub struct MasterCellData {
    pub name: String,
    pub pins: Vec<MasterPin>,
    pub blockages: Vec<Blockage>,
}

impl MasterCellData {
    pub fn pin_index(&self, name: &str) -> Option<usize> {
        self.pins.iter().position(|p| p.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtraDemandKind {
    SameGGrid,
    AdjHGGrid,
}

#[derive(Clone, Copy, Debug)]
pub struct ExtraDemand {
    pub kind: ExtraDemandKind,
    pub first: MasterCellId,
    pub second: MasterCellId,
    pub layer: LayerId,
    pub demand: u32,
}

#[derive(Clone, Debug)]
pub struct CellData {
    pub name: String,
    pub master: MasterCellId,
    pub row: u32,
    pub col: u32,
    pub is_fixed: bool,
}

/// A net terminal: a master pin of a placed cell instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetPin {
    pub cell: CellId,
    pub pin: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSegment {
    pub source: GridCoord,
    pub target: GridCoord,
}

impl RouteSegment {
    pub fn is_via(&self) -> bool {
        self.source.same_gcell(&self.target)
    }
}

#[derive(Clone, Debug)]
pub struct NetData {
    pub name: String,
    pub min_layer: Option<LayerId>,
    pub pins: Vec<NetPin>,
    pub route_segments: Vec<RouteSegment>,
}

pub struct Design {
    pub max_cell_move: u32,
    pub boundary: Rect,
    pub layers: Vec<LayerData>,
    pub supply_adjustments: Vec<SupplyAdjustment>,
    pub master_cells: Vec<MasterCellData>,
    pub extra_demands: Vec<ExtraDemand>,
    pub cells: Vec<CellData>,
    pub nets: Vec<NetData>,

    pub layer_name_map: HashMap<String, LayerId>,
    pub master_cell_name_map: HashMap<String, MasterCellId>,
    pub cell_name_map: HashMap<String, CellId>,
    pub net_name_map: HashMap<String, NetId>,
}

impl Design {
    pub fn new() -> Self {
        Self {
            max_cell_move: 0,
            boundary: Rect::default(),
            layers: Vec::new(),
            supply_adjustments: Vec::new(),
            master_cells: Vec::new(),
            extra_demands: Vec::new(),
            cells: Vec::with_capacity(1000),
            nets: Vec::with_capacity(1000),
            layer_name_map: HashMap::new(),
            master_cell_name_map: HashMap::new(),
            cell_name_map: HashMap::new(),
            net_name_map: HashMap::new(),
        }
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }
    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    pub fn add_layer(&mut self, name: String, direction: LayerDirection, default_supply: i32) {
        let idx = LayerId::new(self.layers.len());
        self.layer_name_map.insert(name.clone(), idx);
        self.layers.push(LayerData {
            name,
            index: idx,
            direction,
            default_supply,
        });
    }

    pub fn add_master_cell(&mut self, master: MasterCellData) -> MasterCellId {
        let id = MasterCellId::new(self.master_cells.len());
        self.master_cell_name_map.insert(master.name.clone(), id);
        self.master_cells.push(master);
        id
    }

    pub fn add_cell(&mut self, cell: CellData) -> CellId {
        let id = CellId::new(self.cells.len());
        self.cell_name_map.insert(cell.name.clone(), id);
        self.cells.push(cell);
        id
    }

    pub fn add_net(&mut self, name: String, min_layer: Option<LayerId>) -> NetId {
        let id = NetId::new(self.nets.len());
        self.nets.push(NetData {
            name: name.clone(),
            min_layer,
            pins: Vec::new(),
            route_segments: Vec::new(),
        });
        self.net_name_map.insert(name, id);
        id
    }

    /// Planar location of a net terminal: the gcell of its cell instance.
    #[inline]
    pub fn pin_position(&self, pin: NetPin) -> Point {
        let cell = &self.cells[pin.cell.index()];
        Point::new(cell.row as i32, cell.col as i32)
    }

    pub fn pin_layer(&self, pin: NetPin) -> LayerId {
        let cell = &self.cells[pin.cell.index()];
        self.master_cells[cell.master.index()].pins[pin.pin].layer
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}
