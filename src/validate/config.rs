use serde::{Deserialize, Serialize};

/// Which geometric test decides containment and overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapTest {
    /// Exact DE-9IM test on exterior shells: pieces overlap when their
    /// interiors intersect, and are contained when they lie within the parent.
    #[default]
    Interiors,
    /// Vertex heuristic: a vertex of one ring strictly inside the other means
    /// overlap; every vertex inside or on the parent means containment.
    /// Misses rings that cross edge-to-edge without enclosing a vertex.
    Vertices,
}

/// Tunables for the validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationConfig {
    pub overlap_test: OverlapTest,
    /// Allowed relative difference between the parent area and the summed subdivision areas.
    pub area_tolerance: f64,
    /// Required sum of allocation shares, compared exactly.
    pub share_total: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            overlap_test: OverlapTest::default(),
            area_tolerance: 0.001,
            share_total: 100.0,
        }
    }
}
