//! Road command layer. Placement and removal validate against the cell state
//! machine, mutate the grid, keep the road adjacency graph current, refresh
//! the tiling cache for the edited cell and its cardinal neighbors, and emit
//! one domain event per changed cell.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::events::GridEvent;
use crate::grid::{CellState, GridPos, WorldGrid};
use crate::placement::manhattan_path;
use crate::road_tiles::RoadTilingEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoadNode(pub usize, pub usize);

/// Road commands plus the cell-level adjacency graph maintained for
/// traffic/routing collaborators. Nodes with degree >= 3 are tracked as
/// intersections.
#[derive(Resource, Default, Serialize, Deserialize)]
pub struct RoadManager {
    edges: HashMap<RoadNode, HashSet<RoadNode>>,
    intersections: HashSet<RoadNode>,
}

impl RoadManager {
    /// Pave a single cell. Fails without mutating when the target is out of
    /// range, already a road, or occupied by a building.
    pub fn try_place(
        &mut self,
        grid: &mut WorldGrid,
        tiles: &mut RoadTilingEngine,
        events: &mut Events<GridEvent>,
        pos: GridPos,
    ) -> bool {
        let paveable = grid
            .get(pos.0, pos.1)
            .is_some_and(|c| !matches!(c.state, CellState::Building | CellState::Road));
        if !paveable {
            return false;
        }

        grid.place_road(pos.0, pos.1);

        let node = RoadNode(pos.0, pos.1);
        self.edges.entry(node).or_default();
        let (neighbors, ncount) = grid.neighbors4(pos.0, pos.1);
        for &(nx, ny) in &neighbors[..ncount] {
            if grid.get(nx, ny).is_some_and(|c| c.has_road()) {
                let neighbor_node = RoadNode(nx, ny);
                self.edges.entry(node).or_default().insert(neighbor_node);
                self.edges.entry(neighbor_node).or_default().insert(node);
                self.update_intersection(neighbor_node);
            }
        }
        self.update_intersection(node);

        tiles.refresh_around(grid, pos);
        events.send(GridEvent::RoadBuilt { pos });
        true
    }

    /// Tear up a single road cell, returning it to empty ground.
    pub fn try_remove(
        &mut self,
        grid: &mut WorldGrid,
        tiles: &mut RoadTilingEngine,
        events: &mut Events<GridEvent>,
        pos: GridPos,
    ) -> bool {
        if !grid.get(pos.0, pos.1).is_some_and(|c| c.has_road()) {
            return false;
        }

        let node = RoadNode(pos.0, pos.1);
        if let Some(neighbors) = self.edges.remove(&node) {
            for neighbor in &neighbors {
                if let Some(set) = self.edges.get_mut(neighbor) {
                    set.remove(&node);
                }
                self.update_intersection(*neighbor);
            }
        }
        self.intersections.remove(&node);

        grid.remove_road(pos.0, pos.1);
        tiles.refresh_around(grid, pos);
        events.send(GridEvent::RoadRemoved { pos });
        true
    }

    /// Pave along the Manhattan path from `start` to `end` (horizontal run
    /// first). Ineligible cells are skipped; returns the count actually
    /// paved.
    pub fn place_line(
        &mut self,
        grid: &mut WorldGrid,
        tiles: &mut RoadTilingEngine,
        events: &mut Events<GridEvent>,
        start: GridPos,
        end: GridPos,
    ) -> usize {
        manhattan_path(start, end)
            .into_iter()
            .filter(|&pos| self.try_place(grid, tiles, events, pos))
            .count()
    }

    /// Removal counterpart of [`place_line`](Self::place_line).
    pub fn remove_line(
        &mut self,
        grid: &mut WorldGrid,
        tiles: &mut RoadTilingEngine,
        events: &mut Events<GridEvent>,
        start: GridPos,
        end: GridPos,
    ) -> usize {
        manhattan_path(start, end)
            .into_iter()
            .filter(|&pos| self.try_remove(grid, tiles, events, pos))
            .count()
    }

    fn update_intersection(&mut self, node: RoadNode) {
        let degree = self.edges.get(&node).map_or(0, |e| e.len());
        if degree >= 3 {
            self.intersections.insert(node);
        } else {
            self.intersections.remove(&node);
        }
    }

    pub fn is_road(&self, x: usize, y: usize) -> bool {
        self.edges.contains_key(&RoadNode(x, y))
    }

    pub fn is_intersection(&self, x: usize, y: usize) -> bool {
        self.intersections.contains(&RoadNode(x, y))
    }

    pub fn neighbors(&self, node: &RoadNode) -> Vec<RoadNode> {
        self.edges
            .get(node)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }
}
