//! Turn a [`RenderSnapshot`] into one triangle list
//!
//! Draw order: stars, targets, projectiles, ship, particles. Text is not
//! drawn here; see [`super::labels`].

use glam::Vec2;

use super::shapes::{circle, ellipse, quad, rect_outline, ship};
use super::vertex::{Vertex, colors, with_alpha};
use crate::sim::{GamePhase, RenderSnapshot};

const STAR_SEGMENTS: u32 = 6;
const PARTICLE_SEGMENTS: u32 = 8;
const TARGET_BORDER: f32 = 2.0;

pub fn build_scene(snapshot: &RenderSnapshot) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for star in &snapshot.stars {
        vertices.extend(circle(
            Vec2::new(star.x, star.y),
            star.size,
            with_alpha(colors::STAR, star.opacity),
            STAR_SEGMENTS,
        ));
    }

    if !matches!(snapshot.phase, GamePhase::Playing | GamePhase::Transition) {
        return vertices;
    }

    for target in &snapshot.targets {
        vertices.extend(quad(&target.rect, colors::TARGET_FILL));
        vertices.extend(rect_outline(
            &target.rect,
            TARGET_BORDER,
            with_alpha(target.color, 1.0),
        ));
    }

    for shot in &snapshot.projectiles {
        vertices.extend(quad(shot, colors::PROJECTILE));
    }

    if snapshot.show_player {
        let player = &snapshot.player;
        vertices.extend(ship(player, colors::PLAYER));
        let cockpit = Vec2::new(
            player.pos.x + player.size.x / 2.0,
            player.pos.y + player.size.y * 0.4,
        );
        vertices.extend(ellipse(cockpit, Vec2::new(8.0, 12.0), colors::COCKPIT, 12));
    }

    for p in &snapshot.particles {
        vertices.extend(circle(
            Vec2::new(p.x, p.y),
            p.size,
            with_alpha(p.color, p.alpha),
            PARTICLE_SEGMENTS,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::Session;

    #[test]
    fn test_idle_scene_is_only_stars() {
        let session = Session::new(GameConfig::default(), 1);
        let verts = build_scene(&session.snapshot());
        let per_star = STAR_SEGMENTS as usize * 3;
        assert_eq!(verts.len(), session.stars.len() * per_star);
    }

    #[test]
    fn test_playing_scene_draws_targets_and_ship() {
        let mut session = Session::new(GameConfig::default(), 1);
        let idle = build_scene(&session.snapshot()).len();
        session.start();
        let playing = build_scene(&session.snapshot()).len();
        // Six targets (fill + outline) plus the ship and cockpit
        let targets = 6 * (6 + 24);
        let ship = 12 + 12 * 3;
        assert_eq!(playing, idle + targets + ship);
    }
}
