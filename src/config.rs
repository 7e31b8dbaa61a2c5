//! Session configuration
//!
//! Every tunable constant of a playthrough lives here. Missing JSON keys
//! fall back to [`GameConfig::default`], so a host page can override just the
//! values it cares about.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, PRIORITY_POOL};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, TICKS_PER_SECOND, VIEWPORT_MARGIN};
use crate::error::ConfigError;
use crate::lead::LeadField;

/// Default lead-capture endpoint
pub const DEFAULT_LEAD_ENDPOINT: &str = "https://formspree.io/f/mgoonqza";

/// How a level's labels are turned into live target batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// The whole level is one batch
    FullLevel,
    /// Fixed-size waves cycling through the level's labels
    Waves { wave_size: usize, waves_per_level: u32 },
}

impl SpawnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnPolicy::FullLevel => "full-level",
            SpawnPolicy::Waves { .. } => "waves",
        }
    }

    /// Number of batches that make up one level
    pub fn waves_per_level(&self) -> u32 {
        match self {
            SpawnPolicy::FullLevel => 1,
            SpawnPolicy::Waves { waves_per_level, .. } => *waves_per_level,
        }
    }
}

/// How labels are distributed over levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelAssignment {
    /// Re-shuffle the pool at every start and deal `counts[i]` labels to level i+1
    Shuffled { counts: Vec<usize> },
    /// Same labels every playthrough
    Fixed { levels: Vec<Vec<String>> },
}

/// When lead data leaves the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Each gate submits its partial record immediately
    Progressive,
    /// One record at the end of the session
    #[default]
    Consolidated,
}

/// Random spawn distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Horizontal margin on both sides of the playfield
    pub margin: f32,
    /// Upper bound of the random offset of the first slot above the top edge
    pub initial_jitter: f32,
    /// Minimum vertical spacing between consecutive slots
    pub spacing_min: f32,
    /// Random spacing added on top of `spacing_min`
    pub spacing_range: f32,
    /// Probability of an extra breathing gap before a slot
    pub gap_chance: f64,
    /// Upper bound of the extra gap
    pub gap_max: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            margin: 15.0,
            initial_jitter: 100.0,
            spacing_min: 68.0,
            spacing_range: 112.0,
            gap_chance: 0.2,
            gap_max: 80.0,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Progression ===
    pub level_count: u32,
    pub labels: LabelAssignment,
    pub spawn_policy: SpawnPolicy,
    pub spawn: SpawnTuning,
    /// Target fall speed at level 1 (pixels per tick)
    pub initial_speed: f32,
    /// Added to the fall speed at every level transition
    pub speed_step: f32,

    // === Scoring ===
    pub score_per_hit: u64,
    pub particle_burst: usize,
    pub fire_cooldown_ticks: u32,

    // === Transitions ===
    /// Pause between batch exhaustion and the next screen
    pub complete_delay_ticks: u32,
    /// "LEVEL n" announcement before the next batch spawns
    pub level_intro_ticks: u32,

    // === Lead capture ===
    /// `gates[n - 1]` is shown after level n; levels without an entry go straight on
    pub gates: Vec<Vec<LeadField>>,
    pub capture_mode: CaptureMode,
    pub lead_endpoint: String,

    // === Recommendation ===
    pub pool: Vec<String>,
    pub catalog: Catalog,
    pub top_priorities: usize,
    pub top_products: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            level_count: 3,
            labels: LabelAssignment::Shuffled {
                counts: vec![6, 8, 9],
            },
            spawn_policy: SpawnPolicy::FullLevel,
            spawn: SpawnTuning::default(),
            initial_speed: 1.01,
            speed_step: 0.33,

            score_per_hit: 100,
            particle_burst: 10,
            // 200 ms
            fire_cooldown_ticks: TICKS_PER_SECOND / 5,

            // 1.5 s and 1 s
            complete_delay_ticks: TICKS_PER_SECOND * 3 / 2,
            level_intro_ticks: TICKS_PER_SECOND,

            gates: vec![
                vec![LeadField::Name, LeadField::Email],
                vec![LeadField::Organization, LeadField::Title],
            ],
            capture_mode: CaptureMode::Consolidated,
            lead_endpoint: DEFAULT_LEAD_ENDPOINT.to_string(),

            pool: PRIORITY_POOL.iter().map(|p| p.to_string()).collect(),
            catalog: Catalog::default(),
            top_priorities: 5,
            top_products: 3,
        }
    }
}

impl GameConfig {
    /// Wave-based variant: two targets at a time, faster ramp
    pub fn wave_preset() -> Self {
        Self {
            spawn_policy: SpawnPolicy::Waves {
                wave_size: 2,
                waves_per_level: 3,
            },
            spawn: SpawnTuning {
                spacing_min: 120.0,
                spacing_range: 80.0,
                gap_chance: 0.0,
                ..SpawnTuning::default()
            },
            initial_speed: 1.5,
            speed_step: 0.5,
            ..Self::default()
        }
    }

    /// Parse a JSON override document and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level_count == 0 {
            return Err(invalid("level_count", "must be at least 1"));
        }
        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return Err(invalid("playfield", "width and height must be positive"));
        }
        if self.initial_speed < 0.0 || self.speed_step < 0.0 {
            return Err(invalid("speed", "fall speed never decreases"));
        }
        if let SpawnPolicy::Waves {
            wave_size,
            waves_per_level,
        } = self.spawn_policy
        {
            if wave_size == 0 || waves_per_level == 0 {
                return Err(invalid(
                    "spawn_policy",
                    "wave_size and waves_per_level must be at least 1",
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.spawn.gap_chance) {
            return Err(invalid("spawn.gap_chance", "must be a probability"));
        }
        if self.spawn.spacing_min <= 0.0 || self.spawn.spacing_range < 0.0 {
            return Err(invalid("spawn.spacing", "spacing must be positive"));
        }
        if let LabelAssignment::Shuffled { counts } = &self.labels {
            let needed: usize = counts.iter().sum();
            if needed > self.pool.len() {
                return Err(invalid(
                    "labels",
                    format!("{} labels requested, pool holds {}", needed, self.pool.len()),
                ));
            }
        }
        Ok(())
    }

    /// Fields collected by the gate shown after `level`, if any
    pub fn gate_after(&self, level: u32) -> Option<&[LeadField]> {
        if level == 0 || level >= self.level_count {
            return None;
        }
        self.gates.get(level as usize - 1).map(|g| g.as_slice())
    }
}

/// Playfield size for a browser viewport: the default size, shrunk to fit
/// with a margin on small screens
pub fn fit_playfield(viewport_width: f32, viewport_height: f32) -> (f32, f32) {
    let (margin_w, margin_h) = VIEWPORT_MARGIN;
    (
        (viewport_width - margin_w).clamp(1.0, PLAYFIELD_WIDTH),
        (viewport_height - margin_h).clamp(1.0, PLAYFIELD_HEIGHT),
    )
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
