//! Foundation command layer: prepare ground so buildings can occupy it.
//! Stateless: validation comes from the cell predicates, mutation goes
//! through the grid's transition mutators, and every changed cell emits one
//! domain event.

use bevy::prelude::*;

use crate::events::GridEvent;
use crate::grid::{CellState, GridPos, WorldGrid};
use crate::placement::{manhattan_path, rect_cells};

/// Prepare a single cell. Fails (without mutating) on out-of-range targets
/// and on cells that are not empty ground.
pub fn try_place(grid: &mut WorldGrid, events: &mut Events<GridEvent>, pos: GridPos) -> bool {
    let placeable = grid
        .get(pos.0, pos.1)
        .is_some_and(|c| c.can_place_foundation());
    if !placeable {
        return false;
    }
    grid.place_foundation(pos.0, pos.1);
    events.send(GridEvent::FoundationPlaced { pos });
    true
}

/// Clear a prepared cell back to empty ground.
pub fn try_remove(grid: &mut WorldGrid, events: &mut Events<GridEvent>, pos: GridPos) -> bool {
    let removable = grid
        .get(pos.0, pos.1)
        .is_some_and(|c| c.state == CellState::Foundation);
    if !removable {
        return false;
    }
    grid.remove_foundation(pos.0, pos.1);
    events.send(GridEvent::FoundationRemoved { pos });
    true
}

/// Attempt placement on every cell of the inclusive rectangle spanned by the
/// two corners. Ineligible cells are skipped; returns the number of cells
/// actually changed, one event each.
pub fn place_rect(
    grid: &mut WorldGrid,
    events: &mut Events<GridEvent>,
    start: GridPos,
    end: GridPos,
) -> usize {
    rect_cells(start, end)
        .filter(|&pos| try_place(grid, events, pos))
        .count()
}

/// Rectangle counterpart of [`try_remove`]. Returns the count actually
/// cleared.
pub fn remove_rect(
    grid: &mut WorldGrid,
    events: &mut Events<GridEvent>,
    start: GridPos,
    end: GridPos,
) -> usize {
    rect_cells(start, end)
        .filter(|&pos| try_remove(grid, events, pos))
        .count()
}

/// Attempt placement along the Manhattan path from `start` to `end`.
pub fn place_line(
    grid: &mut WorldGrid,
    events: &mut Events<GridEvent>,
    start: GridPos,
    end: GridPos,
) -> usize {
    manhattan_path(start, end)
        .into_iter()
        .filter(|&pos| try_place(grid, events, pos))
        .count()
}
