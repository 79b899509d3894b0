//! Hex cell state and the read-only query surface used by triangulation.
//!
//! Cells live in the [`crate::grid::HexGrid`] arena and refer to their
//! neighbors and owning chunk by index. Mutation goes through the grid so
//! river and road flags stay mirrored across shared edges.

use glam::Vec3;

use crate::coordinates::HexCoordinates;
use crate::direction::HexDirection;
use crate::edge::EdgeType;
use crate::metrics::HexMetrics;

pub type CellIndex = usize;

/// One bit per edge: set when a road crosses that edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RoadMask(u8);

impl RoadMask {
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11_1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, direction: HexDirection) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    pub fn set(&mut self, direction: HexDirection, state: bool) {
        if state {
            self.0 |= 1 << direction.index();
        } else {
            self.0 &= !(1 << direction.index());
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn directions(self) -> impl Iterator<Item = HexDirection> {
        HexDirection::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

#[derive(Clone, Debug)]
pub struct HexCell {
    pub(crate) index: CellIndex,
    pub(crate) coordinates: HexCoordinates,
    pub(crate) chunk: usize,
    pub(crate) position: Vec3,
    pub(crate) elevation: i32,
    pub(crate) water_level: i32,
    pub(crate) terrain_type_index: u8,
    pub(crate) incoming_river: Option<HexDirection>,
    pub(crate) outgoing_river: Option<HexDirection>,
    pub(crate) roads: RoadMask,
    pub(crate) neighbors: [Option<CellIndex>; 6],
}

impl HexCell {
    pub fn new(index: CellIndex, coordinates: HexCoordinates, chunk: usize, position: Vec3) -> Self {
        Self {
            index,
            coordinates,
            chunk,
            position,
            elevation: 0,
            water_level: 0,
            terrain_type_index: 0,
            incoming_river: None,
            outgoing_river: None,
            roads: RoadMask::default(),
            neighbors: [None; 6],
        }
    }

    pub fn index(&self) -> CellIndex {
        self.index
    }

    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Grid-local center, including the vertical elevation jitter.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn terrain_type_index(&self) -> u8 {
        self.terrain_type_index
    }

    /// Terrain type as the float the splat shader blends on.
    pub fn terrain_type(&self) -> f32 {
        self.terrain_type_index as f32
    }

    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    pub fn neighbor(&self, direction: HexDirection) -> Option<CellIndex> {
        self.neighbors[direction.index()]
    }

    pub fn edge_type_to(&self, other: &HexCell) -> EdgeType {
        EdgeType::between(self.elevation, other.elevation)
    }

    // =========================================================================
    // Derived heights
    // =========================================================================

    pub fn stream_bed_y(&self, metrics: &HexMetrics) -> f32 {
        metrics.stream_bed_y(self.elevation)
    }

    pub fn river_surface_y(&self, metrics: &HexMetrics) -> f32 {
        metrics.river_surface_y(self.elevation)
    }

    pub fn water_surface_y(&self, metrics: &HexMetrics) -> f32 {
        metrics.water_surface_y(self.water_level)
    }

    // =========================================================================
    // Rivers
    // =========================================================================

    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    pub fn has_incoming_river(&self) -> bool {
        self.incoming_river.is_some()
    }

    pub fn has_outgoing_river(&self) -> bool {
        self.outgoing_river.is_some()
    }

    pub fn has_river(&self) -> bool {
        self.has_incoming_river() || self.has_outgoing_river()
    }

    /// True for a river source or sink: exactly one of incoming/outgoing is set.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.has_incoming_river() != self.has_outgoing_river()
    }

    /// Edge of a source or sink, preferring the incoming edge.
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        self.incoming_river.or(self.outgoing_river)
    }

    pub fn has_incoming_river_through(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction)
    }

    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    // =========================================================================
    // Roads
    // =========================================================================

    pub fn roads(&self) -> RoadMask {
        self.roads
    }

    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads.contains(direction)
    }

    pub fn has_roads(&self) -> bool {
        !self.roads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> HexCell {
        HexCell::new(0, HexCoordinates::new(0, 0), 0, Vec3::ZERO)
    }

    #[test]
    fn test_river_begin_or_end_flags() {
        let mut c = cell();
        assert!(!c.has_river());
        assert!(!c.has_river_begin_or_end());

        c.outgoing_river = Some(HexDirection::NE);
        assert!(c.has_river());
        assert!(c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), Some(HexDirection::NE));

        c.incoming_river = Some(HexDirection::SW);
        assert!(c.has_river());
        assert!(!c.has_river_begin_or_end());
        assert!(c.has_river_through_edge(HexDirection::SW));
        assert!(c.has_river_through_edge(HexDirection::NE));
        assert!(!c.has_river_through_edge(HexDirection::E));
        assert!(c.has_incoming_river_through(HexDirection::SW));
        assert!(!c.has_incoming_river_through(HexDirection::NE));
    }

    #[test]
    fn test_underwater_requires_level_above_elevation() {
        let mut c = cell();
        c.elevation = 2;
        c.water_level = 2;
        assert!(!c.is_underwater());
        c.water_level = 3;
        assert!(c.is_underwater());
    }

    #[test]
    fn test_road_mask() {
        let mut mask = RoadMask::default();
        assert!(mask.is_empty());
        mask.set(HexDirection::E, true);
        mask.set(HexDirection::NW, true);
        assert!(mask.contains(HexDirection::E));
        assert!(!mask.contains(HexDirection::W));
        assert_eq!(mask.bits(), 0b10_0010);
        assert_eq!(mask.directions().collect::<Vec<_>>(), vec![HexDirection::E, HexDirection::NW]);
        mask.set(HexDirection::E, false);
        assert_eq!(mask.bits(), 0b10_0000);
        assert_eq!(RoadMask::from_bits(0xFF).bits(), 0b11_1111);
    }

    #[test]
    fn test_derived_heights_follow_levels() {
        let m = HexMetrics::default();
        let mut c = cell();
        c.elevation = 1;
        c.water_level = 3;
        assert!(c.stream_bed_y(&m) < c.river_surface_y(&m));
        assert!(c.river_surface_y(&m) < c.water_surface_y(&m));
    }
}
