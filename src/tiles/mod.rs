//! Per-sensor dashboard tiles and the liveness logic that drives them.

pub mod board;
pub mod snapshot;

pub use board::{AlertState, Tile, TileBoard, TileView};
pub use snapshot::{Liveness, Snapshot, apply_snapshot, apply_unreachable};
