//! Headless integration test harness: wraps `bevy::app::App` +
//! [`CityGridPlugin`] so tests drive the command layer exactly the way a
//! host app would, without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::buildings::BuildingManager;
use crate::config::GridConfig;
use crate::events::GridEvent;
use crate::grid::{BuildingId, GridPos, WorldGrid, ZoneType};
use crate::road_tiles::{RoadTileResolution, RoadTileSet, RoadTilingEngine};
use crate::roads::RoadManager;
use crate::{foundations, zoning, CityGridPlugin};

pub struct TestCity {
    app: App,
}

impl TestCity {
    /// A 32x32 empty city with the default tile set.
    pub fn new() -> Self {
        Self::with_size(32, 32)
    }

    pub fn with_size(width: usize, height: usize) -> Self {
        let mut app = App::new();
        let plugin = CityGridPlugin::new(GridConfig::new(width, height), RoadTileSet::default())
            .expect("test grid config is valid");
        app.add_plugins(plugin);
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Commands (routed through the same managers a host app uses)
    // -----------------------------------------------------------------------

    pub fn build_road(&mut self, x: usize, y: usize) -> bool {
        self.with_road_tools(|roads, grid, tiles, events| {
            roads.try_place(grid, tiles, events, (x, y))
        })
    }

    pub fn demolish_road(&mut self, x: usize, y: usize) -> bool {
        self.with_road_tools(|roads, grid, tiles, events| {
            roads.try_remove(grid, tiles, events, (x, y))
        })
    }

    pub fn build_road_line(&mut self, start: GridPos, end: GridPos) -> usize {
        self.with_road_tools(|roads, grid, tiles, events| {
            roads.place_line(grid, tiles, events, start, end)
        })
    }

    pub fn prepare_rect(&mut self, start: GridPos, end: GridPos) -> usize {
        self.with_grid_and_events(|grid, events| foundations::place_rect(grid, events, start, end))
    }

    pub fn place_building(
        &mut self,
        origin: GridPos,
        size_x: usize,
        size_z: usize,
        rotation: u8,
    ) -> Option<BuildingId> {
        let world = self.app.world_mut();
        world.resource_scope(|world, mut manager: Mut<BuildingManager>| {
            world.resource_scope(|world, mut grid: Mut<WorldGrid>| {
                world.resource_scope(|_world, mut events: Mut<Events<GridEvent>>| {
                    manager.try_place(&mut grid, &mut events, origin, size_x, size_z, rotation)
                })
            })
        })
    }

    pub fn demolish_building_at(&mut self, pos: GridPos) -> bool {
        let world = self.app.world_mut();
        world.resource_scope(|world, mut manager: Mut<BuildingManager>| {
            world.resource_scope(|world, mut grid: Mut<WorldGrid>| {
                world.resource_scope(|_world, mut events: Mut<Events<GridEvent>>| {
                    manager.try_remove_at(&mut grid, &mut events, pos)
                })
            })
        })
    }

    pub fn zone_rect(&mut self, start: GridPos, end: GridPos, zone: ZoneType) -> usize {
        self.with_grid_and_events(|grid, events| zoning::paint_rect(grid, events, start, end, zone))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn grid(&self) -> &WorldGrid {
        self.app.world().resource::<WorldGrid>()
    }

    pub fn roads(&self) -> &RoadManager {
        self.app.world().resource::<RoadManager>()
    }

    pub fn buildings(&self) -> &BuildingManager {
        self.app.world().resource::<BuildingManager>()
    }

    pub fn resolved_tile(&self, pos: GridPos) -> Option<RoadTileResolution> {
        self.app
            .world()
            .resource::<RoadTilingEngine>()
            .resolved(pos)
    }

    pub fn road_cell_count(&self) -> usize {
        self.grid().cells().iter().filter(|c| c.has_road()).count()
    }

    /// Drain every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        self.app
            .world_mut()
            .resource_mut::<Events<GridEvent>>()
            .drain()
            .collect()
    }

    pub fn assert_resource_exists<T: Resource>(&self) {
        assert!(
            self.app.world().get_resource::<T>().is_some(),
            "resource {} missing",
            std::any::type_name::<T>()
        );
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn with_road_tools<R>(
        &mut self,
        f: impl FnOnce(
            &mut RoadManager,
            &mut WorldGrid,
            &mut RoadTilingEngine,
            &mut Events<GridEvent>,
        ) -> R,
    ) -> R {
        let world = self.app.world_mut();
        world.resource_scope(|world, mut roads: Mut<RoadManager>| {
            world.resource_scope(|world, mut grid: Mut<WorldGrid>| {
                world.resource_scope(|world, mut tiles: Mut<RoadTilingEngine>| {
                    world.resource_scope(|_world, mut events: Mut<Events<GridEvent>>| {
                        f(&mut roads, &mut grid, &mut tiles, &mut events)
                    })
                })
            })
        })
    }

    fn with_grid_and_events<R>(
        &mut self,
        f: impl FnOnce(&mut WorldGrid, &mut Events<GridEvent>) -> R,
    ) -> R {
        let world = self.app.world_mut();
        world.resource_scope(|world, mut grid: Mut<WorldGrid>| {
            world.resource_scope(|_world, mut events: Mut<Events<GridEvent>>| {
                f(&mut grid, &mut events)
            })
        })
    }
}
