//! Read-only view of a session for the presentation layer
//!
//! The renderer and the DOM overlay never touch [`Session`] directly; they
//! draw whatever the latest snapshot says.

use serde::Serialize;

use super::collision::Rect;
use super::state::{GamePhase, Session};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub rect: Rect,
    /// Raw label; line wrapping is a rendering concern
    pub label: String,
    pub color: [f32; 3],
    pub health: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub level: u32,
    pub wave: u32,
    pub score: u64,
    pub player: Rect,
    /// Ship hidden outside of play
    pub show_player: bool,
    pub projectiles: Vec<Rect>,
    pub targets: Vec<TargetView>,
    pub particles: Vec<ParticleView>,
    pub stars: Vec<StarView>,
    /// Centered transition text, if a transition is pending
    pub overlay: Option<String>,
}

impl Session {
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            width: self.config.playfield_width,
            height: self.config.playfield_height,
            phase: self.phase,
            level: self.level,
            wave: self.wave,
            score: self.score,
            player: self.player.bounds(),
            show_player: matches!(self.phase, GamePhase::Playing | GamePhase::Transition),
            projectiles: self.projectiles.iter().map(|p| p.bounds()).collect(),
            targets: self
                .targets
                .iter()
                .map(|t| TargetView {
                    rect: t.bounds(),
                    label: t.label.clone(),
                    color: t.color,
                    health: t.health,
                })
                .collect(),
            particles: self
                .particles
                .iter()
                .map(|p| ParticleView {
                    x: p.pos.x,
                    y: p.pos.y,
                    size: p.size,
                    color: p.color,
                    alpha: p.life.clamp(0.0, 1.0),
                })
                .collect(),
            stars: self
                .stars
                .iter()
                .map(|s| StarView {
                    x: s.pos.x,
                    y: s.pos.y,
                    size: s.size,
                    opacity: s.opacity,
                })
                .collect(),
            overlay: self.overlay_text().map(str::to_string),
        }
    }
}
