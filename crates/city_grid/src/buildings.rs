//! Building command layer. A building occupies a rectangular footprint of
//! prepared foundation cells; placement is all-or-nothing, every footprint
//! cell carries the same id, and removal restores the foundation underneath.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::events::GridEvent;
use crate::grid::{BuildingId, GridPos, WorldGrid};
use crate::placement::{can_build_area, rect_cells, rotated_footprint};

/// Footprint record for one placed building, kept so whole-building removal
/// is O(footprint) instead of a grid scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingPlacement {
    pub origin: GridPos,
    /// Requested (pre-rotation) footprint.
    pub size_x: usize,
    pub size_z: usize,
    /// Quarter-turns, 0..=3. Odd values swap the footprint axes.
    pub rotation: u8,
}

impl BuildingPlacement {
    /// Effective post-rotation footprint.
    pub fn footprint(&self) -> (usize, usize) {
        rotated_footprint(self.size_x, self.size_z, self.rotation)
    }

    fn cells(&self) -> impl Iterator<Item = GridPos> {
        let (fx, fz) = self.footprint();
        rect_cells(self.origin, (self.origin.0 + fx - 1, self.origin.1 + fz - 1))
    }
}

#[derive(Resource, Default, Serialize, Deserialize)]
pub struct BuildingManager {
    next_id: u32,
    placements: HashMap<BuildingId, BuildingPlacement>,
}

impl BuildingManager {
    /// Place a building anchored at `origin`. The whole rotated footprint
    /// must be prepared foundation; on success every footprint cell is
    /// stamped with a fresh id and a single `BuildingPlaced` event carries
    /// the anchor. Ids increase monotonically and are never reused.
    pub fn try_place(
        &mut self,
        grid: &mut WorldGrid,
        events: &mut Events<GridEvent>,
        origin: GridPos,
        size_x: usize,
        size_z: usize,
        rotation: u8,
    ) -> Option<BuildingId> {
        let placement = BuildingPlacement {
            origin,
            size_x,
            size_z,
            rotation: rotation % 4,
        };
        let (fx, fz) = placement.footprint();
        if !can_build_area(grid, origin, fx, fz) {
            return None;
        }

        let id = BuildingId(self.next_id);
        self.next_id += 1;
        for (x, y) in placement.cells() {
            grid.place_building(x, y, id);
        }
        self.placements.insert(id, placement);
        events.send(GridEvent::BuildingPlaced { pos: origin, id });
        Some(id)
    }

    /// Demolish a building by id, restoring foundation on every footprint
    /// cell. One `BuildingRemoved` event carries the anchor.
    pub fn try_remove(
        &mut self,
        grid: &mut WorldGrid,
        events: &mut Events<GridEvent>,
        id: BuildingId,
    ) -> bool {
        let Some(placement) = self.placements.remove(&id) else {
            return false;
        };
        for (x, y) in placement.cells() {
            grid.remove_building(x, y);
        }
        events.send(GridEvent::BuildingRemoved {
            pos: placement.origin,
            id,
        });
        true
    }

    /// Demolish whatever building occupies `pos`, if any.
    pub fn try_remove_at(
        &mut self,
        grid: &mut WorldGrid,
        events: &mut Events<GridEvent>,
        pos: GridPos,
    ) -> bool {
        let Some(id) = grid.get(pos.0, pos.1).and_then(|c| c.building_id) else {
            return false;
        };
        self.try_remove(grid, events, id)
    }

    pub fn placement(&self, id: BuildingId) -> Option<&BuildingPlacement> {
        self.placements.get(&id)
    }

    pub fn count(&self) -> usize {
        self.placements.len()
    }
}
