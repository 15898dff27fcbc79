//! Spatial simulation core for a tile-based city builder: a dense cell grid
//! with a per-cell occupancy state machine, stateless placement validation,
//! adjacency-derived road tiling, and a command layer that emits domain
//! events for economy/population/presentation collaborators.
//!
//! The crate owns no rendering, money, or game rules; hosts mount
//! [`CityGridPlugin`] and drive the command layer from their own systems.
//! All resources are plain structs, so every piece is equally usable without
//! an `App` (see the module tests).

use bevy::prelude::*;

pub mod buildings;
pub mod config;
pub mod events;
pub mod foundations;
pub mod grid;
pub mod placement;
pub mod road_tiles;
pub mod roads;
pub mod zoning;

#[cfg(test)]
mod test_harness;

use crate::buildings::BuildingManager;
use crate::config::{GridConfig, GridError};
use crate::events::GridEvent;
use crate::grid::WorldGrid;
use crate::road_tiles::{RoadTileSet, RoadTilingEngine};
use crate::roads::RoadManager;

/// Mounts the simulation core on a host `App`: the grid, the road and
/// building managers, the tiling engine, and the `GridEvent` channel.
///
/// Construction validates the grid configuration up front, so a host that
/// accepts the plugin can no longer fail to initialize.
pub struct CityGridPlugin {
    config: GridConfig,
    tile_set: RoadTileSet,
}

impl CityGridPlugin {
    pub fn new(config: GridConfig, tile_set: RoadTileSet) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self { config, tile_set })
    }
}

impl Plugin for CityGridPlugin {
    fn build(&self, app: &mut App) {
        let grid = WorldGrid::new(self.config)
            .expect("config validated in CityGridPlugin::new");
        app.insert_resource(grid)
            .insert_resource(RoadManager::default())
            .insert_resource(BuildingManager::default())
            .insert_resource(RoadTilingEngine::new(self.tile_set.clone()))
            .add_event::<GridEvent>();
    }
}
