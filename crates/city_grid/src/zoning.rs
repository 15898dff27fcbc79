//! Zone command layer. Zoning is a marker on top of the occupancy state:
//! empty ground flips to `Zoned`, occupied cells just carry the marker, and
//! game rules about what may grow where live in collaborating services.

use bevy::prelude::*;

use crate::events::GridEvent;
use crate::grid::{GridPos, WorldGrid, ZoneType};
use crate::placement::rect_cells;

/// Set one cell's zone. Returns `false` (no event) when the target is out of
/// range or already carries that zone.
pub fn set_zone(
    grid: &mut WorldGrid,
    events: &mut Events<GridEvent>,
    pos: GridPos,
    zone: ZoneType,
) -> bool {
    let changed = grid.get(pos.0, pos.1).is_some_and(|c| c.zone != zone);
    if !changed {
        return false;
    }
    grid.set_zone(pos.0, pos.1, zone);
    events.send(GridEvent::Zoned { pos, zone });
    true
}

/// Paint the inclusive rectangle with one zone, emitting one event per cell
/// actually changed. Returns the changed-cell count.
pub fn paint_rect(
    grid: &mut WorldGrid,
    events: &mut Events<GridEvent>,
    start: GridPos,
    end: GridPos,
    zone: ZoneType,
) -> usize {
    rect_cells(start, end)
        .filter(|&pos| set_zone(grid, events, pos, zone))
        .count()
}
