//! Challenge Blaster - a falling-target arcade shooter and lead-capture funnel
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (entities, collisions, level flow)
//! - `recommend`: Hit-count ranking and product recommendations
//! - `catalog`: Priority label pool and product catalog
//! - `lead`: Lead record and transmission adapters
//! - `renderer`: WebGPU rendering pipeline
//! - `config`: Tunable session configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod lead;
pub mod recommend;
pub mod renderer;
pub mod share;
pub mod sim;

pub use config::{CaptureMode, GameConfig, LabelAssignment, SpawnPolicy};
pub use error::{ConfigError, LeadError, RenderError};

/// Fixed entity dimensions and per-tick motion constants
pub mod consts {
    /// Nominal display refresh rate; tick counts below assume it
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum ticks per displayed frame
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default playfield (canvas) size in pixels
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 700.0;
    /// Viewport space kept free around the playfield (width, height)
    pub const VIEWPORT_MARGIN: (f32, f32) = (20.0, 100.0);

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 8.0;
    /// Gap between the ship and the playfield bottom
    pub const PLAYER_BOTTOM_GAP: f32 = 20.0;
    /// Pointer tracking: fraction of the remaining distance covered per tick
    pub const POINTER_FOLLOW: f32 = 0.15;
    /// Pointer tracking dead zone (pixels)
    pub const POINTER_DEAD_ZONE: f32 = 5.0;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_HEIGHT: f32 = 15.0;
    pub const PROJECTILE_SPEED: f32 = 12.0;

    /// Targets
    pub const TARGET_WIDTH: f32 = 120.0;
    pub const TARGET_HEIGHT: f32 = 50.0;
    pub const TARGET_HEALTH: i32 = 1;

    /// Explosion particles
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;
    pub const PARTICLE_MIN_SIZE: f32 = 2.0;
    pub const PARTICLE_SIZE_RANGE: f32 = 4.0;
    pub const PARTICLE_DECAY: f32 = 0.03;

    /// Background stars
    pub const STAR_COUNT: usize = 100;
}
