//! Outbound domain events. The command layer pushes one event per successful
//! single-cell mutation (bulk operations emit one per affected cell, building
//! commands one per footprint) into the host-owned `Events<GridEvent>`
//! channel; economy, population, and presentation collaborators subscribe via
//! ordinary `EventReader`s and the core never depends on any of them.

use bevy::prelude::*;

use crate::grid::{BuildingId, GridPos, ZoneType};

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    FoundationPlaced { pos: GridPos },
    FoundationRemoved { pos: GridPos },
    BuildingPlaced { pos: GridPos, id: BuildingId },
    BuildingRemoved { pos: GridPos, id: BuildingId },
    RoadBuilt { pos: GridPos },
    RoadRemoved { pos: GridPos },
    Zoned { pos: GridPos, zone: ZoneType },
}

impl GridEvent {
    /// Anchor coordinate the event refers to.
    pub fn pos(&self) -> GridPos {
        match *self {
            GridEvent::FoundationPlaced { pos }
            | GridEvent::FoundationRemoved { pos }
            | GridEvent::BuildingPlaced { pos, .. }
            | GridEvent::BuildingRemoved { pos, .. }
            | GridEvent::RoadBuilt { pos }
            | GridEvent::RoadRemoved { pos }
            | GridEvent::Zoned { pos, .. } => pos,
        }
    }
}
