//! Session state and entity records
//!
//! Everything a playthrough mutates lives in [`Session`]. The driver owns
//! exactly one and passes it to [`super::tick`] once per frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::GameConfig;
use crate::consts::*;
use crate::lead::{LeadField, LeadInfo, LeadRecord};
use crate::recommend::{HitTally, Summary};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for the start action
    Start,
    /// Simulation running
    Playing,
    /// Non-interactive pause with overlay text
    Transition,
    /// Blocked on the lead-capture form shown after level n
    Gate(u32),
    /// Session over, summary on screen
    Final,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Transition => "transition",
            GamePhase::Gate(_) => "gate",
            GamePhase::Final => "final",
        }
    }
}

/// What happens when a transition timer runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AfterTransition {
    /// Spawn the next wave of the current level
    NextWave,
    /// Show the gate form that follows `level`
    OpenGate(u32),
    /// Move to the next level without a gate
    AdvanceLevel,
    /// Spawn the first batch of the (already advanced) level
    SpawnLevel,
    /// Show the final summary
    Final,
}

/// A pending one-shot timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub ticks_left: u32,
    /// Overlay text ("LEVEL COMPLETE!", "LEVEL 2", ...)
    pub text: String,
    pub then: AfterTransition,
}

/// Things the driver has to react to, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A projectile left the ship
    Fired,
    /// A target reached zero health
    TargetDestroyed { label: String, hits: u32 },
    /// A target drifted off the bottom
    TargetMissed { label: String },
    /// The live batch is empty
    BatchCleared { level: u32, wave: u32 },
    /// A gate form must be shown
    GateOpened { gate: u32, fields: Vec<LeadField> },
    /// A record is ready for the lead-capture adapter
    LeadReady(LeadRecord),
    /// The final screen must be shown
    SessionFinished(Summary),
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Player {
    /// Horizontally centered, just above the playfield bottom
    pub fn new(playfield_width: f32, playfield_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                playfield_width / 2.0 - PLAYER_WIDTH / 2.0,
                playfield_height - PLAYER_HEIGHT - PLAYER_BOTTOM_GAP,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// A shot travelling up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Projectile {
    /// Leaves from the nose of the ship
    pub fn from_player(player: &Player) -> Self {
        Self {
            pos: Vec2::new(
                player.pos.x + player.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
                player.pos.y,
            ),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// A falling labeled priority
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    pub size: Vec2,
    pub label: String,
    pub health: i32,
    pub color: [f32; 3],
}

impl Target {
    pub fn new(x: f32, y: f32, label: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(TARGET_WIDTH, TARGET_HEIGHT),
            label: label.into(),
            health: TARGET_HEALTH,
            color,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// An explosion fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: [f32; 3],
    pub life: f32, // 0-1, decreases every tick
}

/// A decorative background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
}

/// Complete state of one page's worth of play
pub struct Session {
    pub config: GameConfig,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// 1-based level counter
    pub level: u32,
    /// 1-based wave counter within the level
    pub wave: u32,
    pub score: u64,
    /// Current target fall speed (pixels per tick)
    pub speed: f32,
    pub time_ticks: u64,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    /// The live batch
    pub targets: Vec<Target>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    /// Per-label hits for the whole session
    pub hits: HitTally,
    pub lead: LeadInfo,
    /// Labels dealt to each level (index 0 = level 1)
    pub level_labels: Vec<Vec<String>>,
    /// Next label index for wave-based spawning
    pub(crate) wave_cursor: usize,
    pub transition: Option<Transition>,
    pub summary: Option<Summary>,
    pub(crate) lead_sent: bool,
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    /// Create an idle session with the given config and RNG seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(config.playfield_width, config.playfield_height);
        let speed = config.initial_speed;
        let mut session = Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            level: 1,
            wave: 1,
            score: 0,
            speed,
            time_ticks: 0,
            fire_cooldown: 0,
            player,
            projectiles: Vec::new(),
            targets: Vec::new(),
            particles: Vec::new(),
            stars: Vec::new(),
            hits: HitTally::new(),
            lead: LeadInfo::default(),
            level_labels: Vec::new(),
            wave_cursor: 0,
            transition: None,
            summary: None,
            lead_sent: false,
            events: Vec::new(),
        };
        session.create_stars();
        session.assign_labels();
        session
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Labels dealt to `level` (empty if none)
    pub fn labels_for_level(&self, level: u32) -> &[String] {
        level
            .checked_sub(1)
            .and_then(|i| self.level_labels.get(i as usize))
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Canvas size changed: re-anchor the ship and re-scatter the stars
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.config.playfield_width = width;
        self.config.playfield_height = height;
        self.player = Player::new(width, height);
        self.create_stars();
    }

    pub(crate) fn create_stars(&mut self) {
        let (w, h) = (self.config.playfield_width, self.config.playfield_height);
        self.stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(self.rng.random::<f32>() * w, self.rng.random::<f32>() * h),
                size: self.rng.random::<f32>() * 2.0 + 0.5,
                speed: self.rng.random::<f32>() * 0.5 + 0.1,
                opacity: self.rng.random::<f32>(),
            })
            .collect();
    }

    /// Deal labels to levels according to the configured assignment
    pub(crate) fn assign_labels(&mut self) {
        use crate::config::LabelAssignment;
        use rand::seq::SliceRandom;

        let levels = self.config.level_count as usize;
        self.level_labels = match &self.config.labels {
            LabelAssignment::Shuffled { counts } => {
                let mut pool = self.config.pool.clone();
                pool.shuffle(&mut self.rng);
                let mut start = 0;
                (0..levels)
                    .map(|i| {
                        let count = counts.get(i).copied().unwrap_or(0);
                        let end = (start + count).min(pool.len());
                        let dealt = pool[start..end].to_vec();
                        start = end;
                        dealt
                    })
                    .collect()
            }
            LabelAssignment::Fixed { levels: fixed } => (0..levels)
                .map(|i| fixed.get(i).cloned().unwrap_or_default())
                .collect(),
        };
    }
}
