//! Per-frame simulation tick
//!
//! Motion is a fixed amount per tick. The driver runs [`tick`] from a 60 Hz
//! fixed-step accumulator, so a display frame may see zero or several ticks.

use glam::Vec2;
use rand::Rng;

use super::collision::aabb_overlap;
use super::state::{GameEvent, GamePhase, Particle, Projectile, Session, Target};
use crate::consts::*;

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left movement key held
    pub left: bool,
    /// Right movement key held
    pub right: bool,
    /// Pointer/touch x while pressed, in playfield pixels
    pub pointer_x: Option<f32>,
    /// Fire requested this tick (key press, tap, click)
    pub fire: bool,
}

/// Advance the session by one tick
pub fn tick(session: &mut Session, input: &TickInput) {
    session.time_ticks += 1;

    update_stars(session);

    match session.phase {
        GamePhase::Playing => {
            update_player(session, input);
            update_projectiles(session);
            for target in &mut session.targets {
                target.pos.y += session.speed;
            }
            resolve_hits(session);
            remove_missed(session);
            update_particles(session);

            if session.targets.is_empty() {
                session.on_batch_exhausted();
            }
        }
        GamePhase::Transition => {
            update_particles(session);
            session.advance_transition();
        }
        _ => update_particles(session),
    }
}

/// Movement, clamping, and rate-limited firing
fn update_player(session: &mut Session, input: &TickInput) {
    let width = session.config.playfield_width;
    let player = &mut session.player;

    if input.left {
        player.pos.x -= player.speed;
    }
    if input.right {
        player.pos.x += player.speed;
    }

    // Ease toward the pointer instead of snapping
    if let Some(pointer_x) = input.pointer_x {
        let desired = pointer_x - player.size.x / 2.0;
        let diff = desired - player.pos.x;
        if diff.abs() > POINTER_DEAD_ZONE {
            player.pos.x += diff * POINTER_FOLLOW;
        }
    }

    player.pos.x = player.pos.x.clamp(0.0, (width - player.size.x).max(0.0));

    session.fire_cooldown = session.fire_cooldown.saturating_sub(1);
    if input.fire && session.fire_cooldown == 0 {
        session.projectiles.push(Projectile::from_player(&session.player));
        session.fire_cooldown = session.config.fire_cooldown_ticks;
        session.emit(GameEvent::Fired);
    }
}

fn update_projectiles(session: &mut Session) {
    for shot in &mut session.projectiles {
        shot.pos.y -= shot.speed;
    }
    session.projectiles.retain(|p| p.bounds().bottom() >= 0.0);
}

/// Each target takes at most one projectile per tick; each projectile is
/// consumed by the first target it overlaps
fn resolve_hits(session: &mut Session) {
    let mut i = 0;
    while i < session.targets.len() {
        let bounds = session.targets[i].bounds();
        let hit = session
            .projectiles
            .iter()
            .position(|p| aabb_overlap(&p.bounds(), &bounds));

        if let Some(j) = hit {
            session.projectiles.remove(j);
            session.targets[i].health -= 1;
            if session.targets[i].health <= 0 {
                let target = session.targets.remove(i);
                destroy_target(session, target);
                continue;
            }
        }
        i += 1;
    }
}

fn destroy_target(session: &mut Session, target: Target) {
    let hits = session.hits.record(&target.label);
    session.score += session.config.score_per_hit;
    log::debug!("Hit '{}' ({}x), score {}", target.label, hits, session.score);

    explode(session, target.bounds().center(), target.color);
    session.emit(GameEvent::TargetDestroyed {
        label: target.label,
        hits,
    });
}

/// Burst of particles in the target's color
fn explode(session: &mut Session, center: Vec2, color: [f32; 3]) {
    for _ in 0..session.config.particle_burst {
        let vel = Vec2::new(
            (session.rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
            (session.rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
        );
        let size = PARTICLE_MIN_SIZE + session.rng.random::<f32>() * PARTICLE_SIZE_RANGE;
        session.particles.push(Particle {
            pos: center,
            vel,
            size,
            color,
            life: 1.0,
        });
    }
}

/// Targets past the bottom edge are gone for good; no penalty
fn remove_missed(session: &mut Session) {
    let height = session.config.playfield_height;
    let (kept, missed): (Vec<Target>, Vec<Target>) = std::mem::take(&mut session.targets)
        .into_iter()
        .partition(|t| t.pos.y <= height);
    session.targets = kept;

    for target in missed {
        log::debug!("Missed '{}'", target.label);
        session.emit(GameEvent::TargetMissed {
            label: target.label,
        });
    }
}

fn update_particles(session: &mut Session) {
    for particle in &mut session.particles {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    session.particles.retain(|p| p.life > 0.0);
}

/// Drift, twinkle, and wrap the background
fn update_stars(session: &mut Session) {
    let (width, height) = (
        session.config.playfield_width,
        session.config.playfield_height,
    );
    let time_secs = session.time_ticks as f32 / TICKS_PER_SECOND as f32;

    for star in &mut session.stars {
        star.pos.y += star.speed;
        star.opacity = 0.3 + (time_secs + star.pos.x).sin() * 0.3;
        if star.pos.y > height {
            star.pos.y = 0.0;
            star.pos.x = session.rng.random::<f32>() * width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, LabelAssignment};
    use crate::sim::state::Target;
    use proptest::prelude::*;

    fn fixed_config(levels: Vec<Vec<&str>>) -> GameConfig {
        GameConfig {
            labels: LabelAssignment::Fixed {
                levels: levels
                    .into_iter()
                    .map(|l| l.into_iter().map(String::from).collect())
                    .collect(),
            },
            ..GameConfig::default()
        }
    }

    /// Session in `Playing` with the given live targets and no projectiles
    fn playing_with(targets: Vec<Target>) -> Session {
        let mut session = Session::new(fixed_config(vec![vec!["A"], vec!["B"], vec!["C"]]), 42);
        session.start();
        session.targets = targets;
        session.drain_events();
        session
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_session_only_moves_stars() {
        let mut session = Session::new(GameConfig::default(), 1);
        let before = session.player.pos;
        let star_y = session.stars[0].pos.y;
        tick(
            &mut session,
            &TickInput {
                left: true,
                fire: true,
                ..Default::default()
            },
        );
        assert_eq!(session.player.pos, before);
        assert!(session.projectiles.is_empty());
        assert_ne!(session.stars[0].pos.y, star_y);
    }

    #[test]
    fn test_keys_move_and_clamp() {
        let mut session = playing_with(vec![Target::new(0.0, -500.0, "A", [1.0; 3])]);
        let start_x = session.player.pos.x;

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut session, &right);
        assert_eq!(session.player.pos.x, start_x + PLAYER_SPEED);

        // Both keys cancel out
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut session, &both);
        assert_eq!(session.player.pos.x, start_x + PLAYER_SPEED);

        for _ in 0..100 {
            tick(&mut session, &right);
        }
        assert_eq!(
            session.player.pos.x,
            session.config.playfield_width - PLAYER_WIDTH
        );
    }

    #[test]
    fn test_pointer_eases_toward_target() {
        let mut session = playing_with(vec![Target::new(0.0, -500.0, "A", [1.0; 3])]);
        session.player.pos.x = 0.0;

        let pointer = TickInput {
            pointer_x: Some(125.0),
            ..Default::default()
        };
        tick(&mut session, &pointer);
        // desired = 100, moves 15 % of the way
        assert!((session.player.pos.x - 15.0).abs() < 1e-4);

        // Inside the dead zone nothing happens
        session.player.pos.x = 97.0;
        tick(&mut session, &pointer);
        assert_eq!(session.player.pos.x, 97.0);
    }

    #[test]
    fn test_no_input_leaves_player_still() {
        let mut session = playing_with(vec![Target::new(0.0, -500.0, "A", [1.0; 3])]);
        let before = session.player.pos;
        tick(&mut session, &TickInput::default());
        assert_eq!(session.player.pos, before);
    }

    #[test]
    fn test_fire_within_cooldown_spawns_one_projectile() {
        let mut session = playing_with(vec![Target::new(0.0, -500.0, "A", [1.0; 3])]);
        tick(&mut session, &fire());
        tick(&mut session, &fire());
        assert_eq!(session.projectiles.len(), 1);

        let fired = session
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Fired)
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_fire_allowed_after_cooldown() {
        let mut session = playing_with(vec![Target::new(0.0, -5000.0, "A", [1.0; 3])]);
        tick(&mut session, &fire());
        for _ in 1..session.config.fire_cooldown_ticks {
            tick(&mut session, &TickInput::default());
        }
        tick(&mut session, &fire());
        assert_eq!(session.projectiles.len(), 2);
    }

    #[test]
    fn test_projectile_leaves_top() {
        let mut session = playing_with(vec![Target::new(0.0, -5000.0, "A", [1.0; 3])]);
        tick(&mut session, &fire());
        for _ in 0..100 {
            tick(&mut session, &TickInput::default());
        }
        assert!(session.projectiles.is_empty());
    }

    #[test]
    fn test_hit_scores_and_records() {
        // Target sits right above the ship's nose
        let mut session = playing_with(vec![]);
        let nose_x = session.player.pos.x + PLAYER_WIDTH / 2.0;
        let target_y = session.player.pos.y - 60.0;
        session.targets = vec![
            Target::new(nose_x - 60.0, target_y, "A", [1.0, 0.0, 0.0]),
            Target::new(0.0, -5000.0, "B", [1.0; 3]),
        ];

        tick(&mut session, &fire());
        for _ in 0..10 {
            if session.hits.get("A") > 0 {
                break;
            }
            tick(&mut session, &TickInput::default());
        }

        assert_eq!(session.hits.get("A"), 1);
        assert_eq!(session.score, 100);
        assert_eq!(session.targets.len(), 1);
        assert!(session.projectiles.is_empty());
        assert!(!session.particles.is_empty());
        assert!(session.particles.iter().all(|p| p.color == [1.0, 0.0, 0.0]));
        assert!(session.drain_events().contains(&GameEvent::TargetDestroyed {
            label: "A".to_string(),
            hits: 1
        }));
    }

    #[test]
    fn test_burst_size_is_configured() {
        let mut session = playing_with(vec![]);
        let target = Target::new(0.0, 0.0, "A", [1.0; 3]);
        destroy_target(&mut session, target);
        assert_eq!(session.particles.len(), 10);
        assert!(session.particles.iter().all(|p| p.life == 1.0));
    }

    #[test]
    fn test_projectile_resolves_against_one_target() {
        // Two stacked targets, one projectile overlapping both
        let mut session = playing_with(vec![
            Target::new(100.0, 100.0, "A", [1.0; 3]),
            Target::new(100.0, 110.0, "B", [1.0; 3]),
            Target::new(0.0, -5000.0, "C", [1.0; 3]),
        ]);
        session.speed = 0.0;
        session.projectiles.push(Projectile {
            pos: Vec2::new(150.0, 140.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: 0.0,
        });

        tick(&mut session, &TickInput::default());
        assert_eq!(session.hits.total(), 1);
        assert_eq!(session.score, 100);
        assert_eq!(session.targets.len(), 2);
    }

    #[test]
    fn test_tougher_target_survives_one_hit() {
        let mut tough = Target::new(100.0, 100.0, "A", [1.0; 3]);
        tough.health = 2;
        let mut session = playing_with(vec![tough]);
        session.speed = 0.0;
        session.projectiles.push(Projectile {
            pos: Vec2::new(150.0, 120.0),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: 0.0,
        });

        tick(&mut session, &TickInput::default());
        assert_eq!(session.targets[0].health, 1);
        assert_eq!(session.score, 0);
        assert!(session.hits.is_empty());
    }

    #[test]
    fn test_missed_target_is_dropped_without_score() {
        let height = GameConfig::default().playfield_height;
        let mut session = playing_with(vec![
            Target::new(0.0, height + 1.0, "A", [1.0; 3]),
            Target::new(0.0, -5000.0, "B", [1.0; 3]),
        ]);

        tick(&mut session, &TickInput::default());
        assert_eq!(session.targets.len(), 1);
        assert_eq!(session.targets[0].label, "B");
        assert_eq!(session.score, 0);
        assert!(session.hits.is_empty());
        assert!(session.drain_events().contains(&GameEvent::TargetMissed {
            label: "A".to_string()
        }));
    }

    #[test]
    fn test_particles_decay_and_vanish() {
        let mut session = playing_with(vec![Target::new(0.0, -5000.0, "A", [1.0; 3])]);
        session.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -1.0),
            size: 3.0,
            color: [1.0; 3],
            life: 1.0,
        });

        tick(&mut session, &TickInput::default());
        assert_eq!(session.particles[0].pos, Vec2::new(1.0, -1.0));
        assert!((session.particles[0].life - 0.97).abs() < 1e-6);

        for _ in 0..40 {
            tick(&mut session, &TickInput::default());
        }
        assert!(session.particles.is_empty());
    }

    #[test]
    fn test_stars_wrap_to_top() {
        let mut session = Session::new(GameConfig::default(), 1);
        session.stars[0].pos.y = session.config.playfield_height + 10.0;
        tick(&mut session, &TickInput::default());
        assert_eq!(session.stars[0].pos.y, 0.0);
        assert!(session.stars.iter().all(|s| (0.0..=0.6).contains(&s.opacity)));
    }

    #[test]
    fn test_clearing_last_target_ends_batch() {
        let height = GameConfig::default().playfield_height;
        let mut session = playing_with(vec![Target::new(0.0, height + 1.0, "A", [1.0; 3])]);
        tick(&mut session, &TickInput::default());
        assert!(session.targets.is_empty());
        assert_eq!(session.phase, GamePhase::Transition);
    }

    proptest! {
        #[test]
        fn prop_hit_counts_never_decrease(
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..400),
            seed in any::<u64>(),
        ) {
            let mut session = Session::new(GameConfig::default(), seed);
            session.start();

            let mut last_total = 0;
            let mut last_score = 0;
            for (left, right, fire) in inputs {
                let before: Vec<(String, u32)> =
                    session.hits.iter().map(|(l, h)| (l.to_string(), h)).collect();
                tick(&mut session, &TickInput { left, right, pointer_x: None, fire });

                for (label, hits) in before {
                    prop_assert!(session.hits.get(&label) >= hits);
                }
                prop_assert!(session.hits.total() >= last_total);
                prop_assert_eq!(
                    session.score - last_score,
                    u64::from(session.hits.total() - last_total) * 100
                );
                last_total = session.hits.total();
                last_score = session.score;
            }
        }
    }
}
