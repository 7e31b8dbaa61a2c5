//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (batch order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod flow;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{Rect, aabb_overlap};
pub use snapshot::{ParticleView, RenderSnapshot, StarView, TargetView};
pub use spawn::{plan_batch, wave_labels};
pub use state::{
    AfterTransition, GameEvent, GamePhase, Particle, Player, Projectile, Session, Star, Target,
    Transition,
};
pub use tick::{TickInput, tick};
