//! Shared leaf types for the bending workspace: world positions, hotbar slots,
//! game modes, lock aliases and the process clock.

pub mod clock;
pub mod locks;
pub mod slot;
pub mod types;
pub mod world;

pub use clock::{Clock, ManualClock, SystemClock};
pub use slot::HotbarSlot;
pub use types::GameType;
pub use world::{Location, WorldId};
