use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub topology: TopologyConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_design_file")]
    pub design_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            design_file: default_design_file(),
        }
    }
}

/// What to do with a wire end that is neither a pin nor a junction.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StubPolicy {
    /// Remove stubs (repeatedly) so that every leaf is a declared pin.
    #[default]
    Prune,
    /// Fail the net.
    Reject,
    /// Leave stubs in the tree as non-pin leaves.
    Keep,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub stub_policy: StubPolicy,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            stub_policy: StubPolicy::default(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub tree_json: Option<String>,
    /// Design-file `NumRoutes` section rebuilt from the trees.
    #[serde(default)]
    pub routes_file: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(default = "default_cells")]
    pub cells: usize,
    #[serde(default = "default_nets")]
    pub nets: usize,
    #[serde(default = "default_pins_per_net")]
    pub pins_per_net: usize,
    #[serde(default = "default_redundancy")]
    pub redundancy: f64,
    #[serde(default)]
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            cells: default_cells(),
            nets: default_nets(),
            pins_per_net: default_pins_per_net(),
            redundancy: default_redundancy(),
            seed: 0,
        }
    }
}

fn default_design_file() -> String {
    "inputs/case1.txt".to_string()
}

fn default_parallel() -> bool {
    true
}

fn default_rows() -> u32 {
    32
}

fn default_cols() -> u32 {
    32
}

fn default_cells() -> usize {
    200
}

fn default_nets() -> usize {
    100
}

fn default_pins_per_net() -> usize {
    3
}

fn default_redundancy() -> f64 {
    0.1
}
