//! Road tile resolution: which visual variant and rotation represents a road
//! cell, derived solely from which of its 4 cardinal neighbors are roads.
//!
//! The adjacency bitmask (bit 0 = N, 1 = E, 2 = S, 3 = W) has 16 possible
//! values, each resolved through a fixed lookup table enumerated exhaustively
//! in tests. Resolution is a pure function of the grid; the engine only
//! caches results so renderers don't re-derive unchanged cells every frame.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::grid::{Direction, GridPos, WorldGrid};

/// The 6 visual road-tile categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadTileVariant {
    Isolated,
    End,
    Straight,
    Corner,
    TJunction,
    Cross,
}

impl RoadTileVariant {
    pub const COUNT: usize = 6;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            RoadTileVariant::Isolated => 0,
            RoadTileVariant::End => 1,
            RoadTileVariant::Straight => 2,
            RoadTileVariant::Corner => 3,
            RoadTileVariant::TJunction => 4,
            RoadTileVariant::Cross => 5,
        }
    }
}

/// Variant plus rotation for one road cell. Derived on demand, never stored
/// on the cell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadTileResolution {
    pub variant: RoadTileVariant,
    /// Clockwise rotation in degrees. Table entries are one of 0/90/180/270;
    /// engine resolutions fold in the variant's base offset mod 360.
    pub rotation_degrees: u16,
}

const fn res(variant: RoadTileVariant, rotation_degrees: u16) -> RoadTileResolution {
    RoadTileResolution {
        variant,
        rotation_degrees,
    }
}

/// Mask → (variant, rotation) for all 16 adjacency combinations.
///
/// Orientation conventions at rotation 0, rotating clockwise N→E→S→W:
/// - `End`: the single opening faces north.
/// - `Straight`: openings north and south.
/// - `Corner`: openings north and east.
/// - `TJunction`: keyed by the single *closed* side, which faces north.
/// - `Isolated`/`Cross` are symmetric; rotation is fixed at 0.
const TILE_LOOKUP: [RoadTileResolution; 16] = [
    res(RoadTileVariant::Isolated, 0),   // 0b0000 ----
    res(RoadTileVariant::End, 0),        // 0b0001 N
    res(RoadTileVariant::End, 90),       // 0b0010 E
    res(RoadTileVariant::Corner, 0),     // 0b0011 N+E
    res(RoadTileVariant::End, 180),      // 0b0100 S
    res(RoadTileVariant::Straight, 0),   // 0b0101 N+S
    res(RoadTileVariant::Corner, 90),    // 0b0110 E+S
    res(RoadTileVariant::TJunction, 270), // 0b0111 N+E+S (closed W)
    res(RoadTileVariant::End, 270),      // 0b1000 W
    res(RoadTileVariant::Corner, 270),   // 0b1001 N+W
    res(RoadTileVariant::Straight, 90),  // 0b1010 E+W
    res(RoadTileVariant::TJunction, 180), // 0b1011 N+E+W (closed S)
    res(RoadTileVariant::Corner, 180),   // 0b1100 S+W
    res(RoadTileVariant::TJunction, 90), // 0b1101 N+S+W (closed E)
    res(RoadTileVariant::TJunction, 0),  // 0b1110 E+S+W (closed N)
    res(RoadTileVariant::Cross, 0),      // 0b1111 all
];

/// Resolve an adjacency mask through the lookup table.
#[inline]
pub fn resolve_mask(mask: u8) -> RoadTileResolution {
    TILE_LOOKUP[(mask & 0x0F) as usize]
}

/// 4-bit road-adjacency mask for a cell: bit 0 = N, 1 = E, 2 = S, 3 = W.
pub fn adjacency_mask(grid: &WorldGrid, pos: GridPos) -> u8 {
    let mut mask = 0;
    for dir in Direction::CARDINAL {
        let is_road = grid
            .neighbor_toward(pos, dir)
            .and_then(|(nx, ny)| grid.get(nx, ny))
            .is_some_and(|c| c.has_road());
        if is_road {
            mask |= dir.bit();
        }
    }
    mask
}

/// Visual bindings for the 6 variants: asset keys the host's renderer maps to
/// meshes/sprites, plus per-variant base rotation offsets compensating each
/// source asset's default facing.
#[derive(Debug, Clone)]
pub struct RoadTileSet {
    bindings: [Option<String>; RoadTileVariant::COUNT],
    base_rotation_degrees: [u16; RoadTileVariant::COUNT],
    fallback_binding: String,
}

impl Default for RoadTileSet {
    fn default() -> Self {
        Self {
            bindings: [
                Some("road_isolated".into()),
                Some("road_end".into()),
                Some("road_straight".into()),
                Some("road_corner".into()),
                Some("road_t_junction".into()),
                Some("road_cross".into()),
            ],
            base_rotation_degrees: [0; RoadTileVariant::COUNT],
            fallback_binding: "road_fallback".into(),
        }
    }
}

impl RoadTileSet {
    pub fn new(
        bindings: [Option<String>; RoadTileVariant::COUNT],
        base_rotation_degrees: [u16; RoadTileVariant::COUNT],
        fallback_binding: impl Into<String>,
    ) -> Self {
        Self {
            bindings,
            base_rotation_degrees,
            fallback_binding: fallback_binding.into(),
        }
    }

    #[inline]
    pub fn base_rotation(&self, variant: RoadTileVariant) -> u16 {
        self.base_rotation_degrees[variant.index()]
    }

    /// Binding for a variant, substituting the fallback when none is
    /// configured. A missing binding is a content problem, not a logic error:
    /// it is logged and rendering continues with the placeholder.
    pub fn binding(&self, variant: RoadTileVariant) -> &str {
        match &self.bindings[variant.index()] {
            Some(binding) => binding,
            None => {
                warn!(
                    "no visual binding for road tile variant {:?}, substituting '{}'",
                    variant, self.fallback_binding
                );
                &self.fallback_binding
            }
        }
    }
}

/// Resolves road-tile variants and keeps a cache of resolved tiles for the
/// renderer. Every road edit invalidates at most the edited cell and its 4
/// cardinal neighbors, so recomputation cost is O(1) per edit regardless of
/// grid size.
#[derive(Resource, Default)]
pub struct RoadTilingEngine {
    tile_set: RoadTileSet,
    resolved: HashMap<GridPos, RoadTileResolution>,
}

impl RoadTilingEngine {
    pub fn new(tile_set: RoadTileSet) -> Self {
        Self {
            tile_set,
            resolved: HashMap::new(),
        }
    }

    #[inline]
    pub fn tile_set(&self) -> &RoadTileSet {
        &self.tile_set
    }

    /// Resolve a road cell from current adjacency, with the variant's base
    /// rotation offset folded in. `None` for non-road (or out-of-range) cells.
    pub fn resolve(&self, grid: &WorldGrid, pos: GridPos) -> Option<RoadTileResolution> {
        let cell = grid.get(pos.0, pos.1)?;
        if !cell.has_road() {
            return None;
        }
        let table = resolve_mask(adjacency_mask(grid, pos));
        Some(RoadTileResolution {
            variant: table.variant,
            rotation_degrees: (table.rotation_degrees + self.tile_set.base_rotation(table.variant))
                % 360,
        })
    }

    /// Cached resolution for a cell, if it is a known road cell.
    #[inline]
    pub fn resolved(&self, pos: GridPos) -> Option<RoadTileResolution> {
        self.resolved.get(&pos).copied()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Recompute the cache for `pos` and its in-bounds cardinal neighbors
    /// after a road was placed or removed there. Returns the number of cells
    /// recomputed (at most 5).
    pub fn refresh_around(&mut self, grid: &WorldGrid, pos: GridPos) -> usize {
        self.refresh_cell(grid, pos);
        let mut touched = 1;
        for dir in Direction::CARDINAL {
            if let Some(neighbor) = grid.neighbor_toward(pos, dir) {
                self.refresh_cell(grid, neighbor);
                touched += 1;
            }
        }
        touched
    }

    fn refresh_cell(&mut self, grid: &WorldGrid, pos: GridPos) {
        match self.resolve(grid, pos) {
            Some(resolution) => {
                self.resolved.insert(pos, resolution);
            }
            None => {
                self.resolved.remove(&pos);
            }
        }
    }

    /// Rebuild the whole cache from the grid (post-load reconstruction).
    pub fn rebuild_all(&mut self, grid: &WorldGrid) {
        self.resolved.clear();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.get(x, y).is_some_and(|c| c.has_road()) {
                    self.refresh_cell(grid, (x, y));
                }
            }
        }
    }
}
