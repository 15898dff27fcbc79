use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{GridConfig, GridError};

/// A grid-cell coordinate pair (column, row).
pub type GridPos = (usize, usize);

/// Occupancy state of a single cell. `Empty` is the initial state of every
/// cell; removal commands always return a cell to a prior valid state, never
/// to a "destroyed" one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellState {
    #[default]
    Empty,
    /// Empty ground carrying a zone marker.
    Zoned,
    /// Prepared ground a building may occupy.
    Foundation,
    Road,
    Building,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ZoneType {
    #[default]
    None,
    Residential,
    Commercial,
    Industrial,
}

/// Identifier shared by every cell of one building's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cell {
    pub state: CellState,
    pub zone: ZoneType,
    pub building_id: Option<BuildingId>,
    pub has_power: bool,
    pub has_water: bool,
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    #[inline]
    pub fn has_road(&self) -> bool {
        self.state == CellState::Road
    }

    #[inline]
    pub fn has_building(&self) -> bool {
        self.state == CellState::Building
    }

    /// A building may only go on prepared foundation.
    #[inline]
    pub fn can_build(&self) -> bool {
        self.state == CellState::Foundation
    }

    /// Foundation may go on empty ground, zoned or not.
    #[inline]
    pub fn can_place_foundation(&self) -> bool {
        matches!(self.state, CellState::Empty | CellState::Zoned)
    }
}

/// Cardinal directions in the fixed order the road-tiling bitmask uses:
/// N, E, S, W map to bits 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Bit assigned to this direction in the 4-neighbor adjacency mask.
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Direction::North => 1 << 0,
            Direction::East => 1 << 1,
            Direction::South => 1 << 2,
            Direction::West => 1 << 3,
        }
    }

    /// Grid-space offset: north is +row, east is +column.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }
}

/// Dense W×H cell grid plus the coordinate transforms between grid and world
/// space. Every in-bounds coordinate maps to exactly one cell for the grid's
/// whole lifetime.
///
/// Mutators enforce the per-cell state machine and silently ignore
/// out-of-range targets; area-level legality (footprints, adjacency) is the
/// placement validator's job and is checked by the command layer before
/// these are invoked.
#[derive(Resource)]
pub struct WorldGrid {
    config: GridConfig,
    cells: Vec<Cell>,
}

impl WorldGrid {
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self {
            cells: vec![Cell::default(); config.width * config.height],
            config,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.config.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.config.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.config.cell_size
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.config.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.config.width && y < self.config.height
    }

    /// True when every cell of the `size_x` × `size_z` rectangle anchored at
    /// `origin` is in bounds. Degenerate (zero-sized) rectangles are invalid.
    pub fn is_valid_area(&self, origin: GridPos, size_x: usize, size_z: usize) -> bool {
        size_x > 0
            && size_z > 0
            && origin.0 + size_x <= self.config.width
            && origin.1 + size_z <= self.config.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    // -----------------------------------------------------------------------
    // Coordinate transforms
    // -----------------------------------------------------------------------

    /// World position of the cell's center.
    pub fn grid_to_world(&self, x: usize, y: usize) -> Vec2 {
        let half = self.config.cell_size * 0.5;
        self.config.origin
            + Vec2::new(
                x as f32 * self.config.cell_size + half,
                y as f32 * self.config.cell_size + half,
            )
    }

    /// Inverse of [`grid_to_world`](Self::grid_to_world), unclamped: points
    /// outside the grid yield out-of-range (possibly negative) coordinates.
    pub fn world_to_grid(&self, world: Vec2) -> (i32, i32) {
        let local = (world - self.config.origin) / self.config.cell_size;
        (local.x.floor() as i32, local.y.floor() as i32)
    }

    /// As [`world_to_grid`](Self::world_to_grid), with each axis clamped
    /// into bounds.
    pub fn world_to_grid_clamped(&self, world: Vec2) -> GridPos {
        let (gx, gy) = self.world_to_grid(world);
        (
            gx.clamp(0, self.config.width as i32 - 1) as usize,
            gy.clamp(0, self.config.height as i32 - 1) as usize,
        )
    }

    // -----------------------------------------------------------------------
    // Neighborhood queries
    // -----------------------------------------------------------------------

    /// The in-bounds neighbor one step toward `dir`, if any.
    pub fn neighbor_toward(&self, (x, y): GridPos, dir: Direction) -> Option<GridPos> {
        let (dx, dy) = dir.delta();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.in_bounds(nx, ny).then_some((nx, ny))
    }

    /// Up to 4 cardinal neighbors in fixed N, E, S, W order, in-bounds only.
    /// Use `&result[..count]` to iterate over valid entries.
    pub fn neighbors4(&self, x: usize, y: usize) -> ([GridPos; 4], usize) {
        let mut result = [(0, 0); 4];
        let mut count = 0;
        for dir in Direction::CARDINAL {
            if let Some(pos) = self.neighbor_toward((x, y), dir) {
                result[count] = pos;
                count += 1;
            }
        }
        (result, count)
    }

    /// Cardinal neighbors (N, E, S, W) followed by diagonals (NE, SE, SW, NW),
    /// in-bounds only.
    pub fn neighbors8(&self, x: usize, y: usize) -> ([GridPos; 8], usize) {
        const DIAGONALS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
        let (cardinal, mut count) = self.neighbors4(x, y);
        let mut result = [(0, 0); 8];
        result[..count].copy_from_slice(&cardinal[..count]);
        for (dx, dy) in DIAGONALS {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if self.in_bounds(nx, ny) {
                result[count] = (nx, ny);
                count += 1;
            }
        }
        (result, count)
    }

    // -----------------------------------------------------------------------
    // State-machine mutators
    //
    // Out-of-range targets and unmet preconditions are silent no-ops. The
    // command layer validates legality first and reports success/failure.
    // -----------------------------------------------------------------------

    /// Raw state override. Used by save/load restoration; gameplay goes
    /// through the transition mutators below.
    pub fn set_state(&mut self, x: usize, y: usize, state: CellState) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.state = state;
        }
    }

    /// Zone the cell. An `Empty` cell becomes `Zoned`; clearing the zone of
    /// a `Zoned` cell returns it to `Empty`. Other states keep their
    /// occupancy and only carry the marker.
    pub fn set_zone(&mut self, x: usize, y: usize, zone: ZoneType) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.zone = zone;
            if cell.state == CellState::Empty && zone != ZoneType::None {
                cell.state = CellState::Zoned;
            } else if cell.state == CellState::Zoned && zone == ZoneType::None {
                cell.state = CellState::Empty;
            }
        }
    }

    pub fn set_power(&mut self, x: usize, y: usize, powered: bool) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.has_power = powered;
        }
    }

    pub fn set_water(&mut self, x: usize, y: usize, supplied: bool) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.has_water = supplied;
        }
    }

    pub fn place_foundation(&mut self, x: usize, y: usize) {
        if let Some(cell) = self.get_mut(x, y) {
            if cell.can_place_foundation() {
                cell.state = CellState::Foundation;
            }
        }
    }

    pub fn remove_foundation(&mut self, x: usize, y: usize) {
        if let Some(cell) = self.get_mut(x, y) {
            if cell.state == CellState::Foundation {
                cell.state = CellState::Empty;
            }
        }
    }

    pub fn place_building(&mut self, x: usize, y: usize, id: BuildingId) {
        if let Some(cell) = self.get_mut(x, y) {
            if cell.state == CellState::Foundation {
                cell.state = CellState::Building;
                cell.building_id = Some(id);
            }
        }
    }

    /// Demolish the building occupying the cell. The foundation underneath
    /// is retained, so rebuilding needs no new ground preparation.
    pub fn remove_building(&mut self, x: usize, y: usize) {
        if let Some(cell) = self.get_mut(x, y) {
            if cell.state == CellState::Building {
                cell.state = CellState::Foundation;
                cell.building_id = None;
            }
        }
    }

    /// Roads pave over empty, zoned, and foundation cells alike; the zone
    /// marker is cleared. Buildings and existing roads are left untouched.
    pub fn place_road(&mut self, x: usize, y: usize) {
        if let Some(cell) = self.get_mut(x, y) {
            if !matches!(cell.state, CellState::Building | CellState::Road) {
                cell.state = CellState::Road;
                cell.zone = ZoneType::None;
            }
        }
    }

    pub fn remove_road(&mut self, x: usize, y: usize) {
        if let Some(cell) = self.get_mut(x, y) {
            if cell.state == CellState::Road {
                cell.state = CellState::Empty;
            }
        }
    }

    /// Reset every cell to its initial state (whole-grid teardown; cells are
    /// never destroyed individually).
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn grid() -> WorldGrid {
        WorldGrid::new(GridConfig::new(64, 64)).unwrap()
    }

    #[test]
    fn test_grid_coord_roundtrip() {
        let grid = grid();
        for gx in [0, 13, 31, 63] {
            for gy in [0, 13, 31, 63] {
                let world = grid.grid_to_world(gx, gy);
                let (rx, ry) = grid.world_to_grid(world);
                assert_eq!((rx as usize, ry as usize), (gx, gy));
                assert!(grid.in_bounds(gx, gy));
            }
        }
    }

    #[test]
    fn test_grid_to_world_is_cell_center() {
        let grid = WorldGrid::new(GridConfig {
            origin: Vec2::new(-100.0, 40.0),
            ..GridConfig::new(32, 32)
        })
        .unwrap();
        let center = grid.grid_to_world(0, 0);
        assert_eq!(center, Vec2::new(-100.0 + 8.0, 40.0 + 8.0));
    }

    #[test]
    fn test_world_to_grid_unclamped_goes_negative() {
        let grid = grid();
        let (gx, gy) = grid.world_to_grid(Vec2::new(-50.0, -1.0));
        assert!(gx < 0 && gy < 0);
        assert_eq!(grid.world_to_grid_clamped(Vec2::new(-50.0, -1.0)), (0, 0));
        assert_eq!(
            grid.world_to_grid_clamped(Vec2::new(1e6, 1e6)),
            (63, 63)
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = grid();
        assert!(!grid.in_bounds(64, 0));
        assert!(!grid.in_bounds(0, 64));
        assert!(grid.get(64, 0).is_none());
        assert!(grid.get(0, 64).is_none());
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(WorldGrid::new(GridConfig::new(9, 64)).is_err());
        assert!(WorldGrid::new(GridConfig::new(64, 201)).is_err());
    }

    #[test]
    fn test_is_valid_area() {
        let grid = grid();
        assert!(grid.is_valid_area((0, 0), 64, 64));
        assert!(grid.is_valid_area((62, 62), 2, 2));
        assert!(!grid.is_valid_area((62, 62), 3, 2));
        assert!(!grid.is_valid_area((0, 0), 0, 1));
    }

    #[test]
    fn test_neighbors4_order_and_bounds() {
        let grid = grid();
        let (n, count) = grid.neighbors4(5, 5);
        assert_eq!(count, 4);
        // Fixed N, E, S, W order.
        assert_eq!(&n[..4], &[(5, 6), (6, 5), (5, 4), (4, 5)]);

        let (n, count) = grid.neighbors4(0, 0);
        assert_eq!(count, 2);
        assert_eq!(&n[..2], &[(0, 1), (1, 0)]);
    }

    #[test]
    fn test_neighbors8_corner() {
        let grid = grid();
        assert_eq!(grid.neighbors8(0, 0).1, 3);
        assert_eq!(grid.neighbors8(5, 5).1, 8);
        assert_eq!(grid.neighbors8(63, 63).1, 3);
    }

    #[test]
    fn test_mutators_ignore_out_of_range() {
        let mut grid = grid();
        grid.place_foundation(999, 0);
        grid.place_road(0, 999);
        grid.set_zone(999, 999, ZoneType::Residential);
        // Nothing observable changed.
        assert!(grid.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_foundation_lifecycle() {
        let mut grid = grid();
        grid.place_foundation(3, 3);
        assert!(grid.get(3, 3).unwrap().can_build());
        grid.remove_foundation(3, 3);
        assert!(grid.get(3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_building_removal_retains_foundation() {
        let mut grid = grid();
        grid.place_foundation(3, 3);
        grid.place_building(3, 3, BuildingId(7));
        assert!(grid.get(3, 3).unwrap().has_building());
        assert_eq!(grid.get(3, 3).unwrap().building_id, Some(BuildingId(7)));

        grid.remove_building(3, 3);
        let cell = grid.get(3, 3).unwrap();
        assert_eq!(cell.state, CellState::Foundation);
        assert_eq!(cell.building_id, None);

        // Rebuilding works without preparing new ground.
        grid.place_building(3, 3, BuildingId(8));
        assert!(grid.get(3, 3).unwrap().has_building());
    }

    #[test]
    fn test_building_requires_foundation() {
        let mut grid = grid();
        grid.place_building(2, 2, BuildingId(1));
        assert!(grid.get(2, 2).unwrap().is_empty());
    }

    #[test]
    fn test_road_clears_zone_marker() {
        let mut grid = grid();
        grid.set_zone(4, 4, ZoneType::Commercial);
        assert_eq!(grid.get(4, 4).unwrap().state, CellState::Zoned);

        grid.place_road(4, 4);
        let cell = grid.get(4, 4).unwrap();
        assert!(cell.has_road());
        assert_eq!(cell.zone, ZoneType::None);
    }

    #[test]
    fn test_road_does_not_pave_buildings() {
        let mut grid = grid();
        grid.place_foundation(2, 2);
        grid.place_building(2, 2, BuildingId(1));
        grid.place_road(2, 2);
        assert!(grid.get(2, 2).unwrap().has_building());
    }

    #[test]
    fn test_unzoning_returns_to_empty() {
        let mut grid = grid();
        grid.set_zone(1, 1, ZoneType::Industrial);
        grid.set_zone(1, 1, ZoneType::None);
        assert!(grid.get(1, 1).unwrap().is_empty());
    }

    #[test]
    fn test_zone_marker_survives_on_occupied_cells() {
        let mut grid = grid();
        grid.place_foundation(1, 1);
        grid.set_zone(1, 1, ZoneType::Residential);
        let cell = grid.get(1, 1).unwrap();
        assert_eq!(cell.state, CellState::Foundation);
        assert_eq!(cell.zone, ZoneType::Residential);
    }

    #[test]
    fn test_utility_flags() {
        let mut grid = grid();
        grid.set_power(6, 6, true);
        grid.set_water(6, 6, true);
        let cell = grid.get(6, 6).unwrap();
        assert!(cell.has_power && cell.has_water);

        grid.set_power(6, 6, false);
        assert!(!grid.get(6, 6).unwrap().has_power);
    }

    #[test]
    fn test_clear_resets_all_cells() {
        let mut grid = grid();
        grid.place_road(0, 0);
        grid.place_foundation(1, 0);
        grid.clear();
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }
}
