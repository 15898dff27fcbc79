//! Stateless placement rules and the pure coordinate helpers shared by the
//! command layer. Nothing here mutates the grid.

use crate::grid::{GridPos, WorldGrid};

/// Every cell of the rectangle is in bounds and holds prepared foundation.
pub fn can_build_area(grid: &WorldGrid, origin: GridPos, size_x: usize, size_z: usize) -> bool {
    grid.is_valid_area(origin, size_x, size_z)
        && rect_cells(origin, (origin.0 + size_x - 1, origin.1 + size_z - 1))
            .all(|(x, y)| grid.get(x, y).is_some_and(|c| c.can_build()))
}

/// Every cell of the rectangle is in bounds and is empty ground (zoned or not).
pub fn can_place_foundation_area(
    grid: &WorldGrid,
    origin: GridPos,
    size_x: usize,
    size_z: usize,
) -> bool {
    grid.is_valid_area(origin, size_x, size_z)
        && rect_cells(origin, (origin.0 + size_x - 1, origin.1 + size_z - 1))
            .all(|(x, y)| grid.get(x, y).is_some_and(|c| c.can_place_foundation()))
}

/// True when any cardinal neighbor carries a road. Collaborators use this for
/// access/utility checks; the core itself does not enforce it.
pub fn has_adjacent_road(grid: &WorldGrid, (x, y): GridPos) -> bool {
    let (neighbors, count) = grid.neighbors4(x, y);
    neighbors[..count]
        .iter()
        .any(|&(nx, ny)| grid.get(nx, ny).is_some_and(|c| c.has_road()))
}

/// Effective footprint after rotation: odd quarter-turns swap the axes.
#[inline]
pub fn rotated_footprint(size_x: usize, size_z: usize, rotation: u8) -> (usize, usize) {
    if rotation % 2 == 1 {
        (size_z, size_x)
    } else {
        (size_x, size_z)
    }
}

/// Cells of the axis-aligned rectangle spanned by two corners, inclusive,
/// row-major.
pub fn rect_cells(a: GridPos, b: GridPos) -> impl Iterator<Item = GridPos> {
    let (min_x, max_x) = (a.0.min(b.0), a.0.max(b.0));
    let (min_y, max_y) = (a.1.min(b.1), a.1.max(b.1));
    (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| (x, y)))
}

/// L-shaped Manhattan path from `start` to `end`: the horizontal run is
/// emitted first, then the vertical run, both endpoints inclusive. The order
/// is significant; bulk road placement walks cells in exactly this sequence.
pub fn manhattan_path(start: GridPos, end: GridPos) -> Vec<GridPos> {
    let mut path = Vec::with_capacity(start.0.abs_diff(end.0) + start.1.abs_diff(end.1) + 1);
    let mut x = start.0;
    path.push(start);
    while x != end.0 {
        x = if x < end.0 { x + 1 } else { x - 1 };
        path.push((x, start.1));
    }
    let mut y = start.1;
    while y != end.1 {
        y = if y < end.1 { y + 1 } else { y - 1 };
        path.push((end.0, y));
    }
    path
}
