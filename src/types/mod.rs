//! Type-safe wrappers and closed enums shared by every platform.

pub mod ids;
pub mod platform;
pub mod position;

pub use ids::Season;
pub use platform::Platform;
pub use position::{PlayerStatus, Position, RosterSlot};
