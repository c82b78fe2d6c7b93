//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per rendered frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod avatar;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use avatar::{Avatar, AvatarStatus};
pub use collision::{Segment, first_hit, point_hits_obstacle};
pub use obstacle::{Gap, Obstacle};
pub use state::{EndCause, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, autopilot_level, tick};
