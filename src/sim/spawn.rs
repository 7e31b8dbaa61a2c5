//! Target batch planning
//!
//! Places a batch of labeled targets above the playfield so they drift in one
//! at a time at an irregular cadence.

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::Target;
use crate::catalog::target_color;
use crate::config::SpawnTuning;
use crate::consts::{TARGET_HEIGHT, TARGET_WIDTH};

/// Left edge of each horizontal band, as a fraction of the usable span
const BAND_STARTS: [f32; 3] = [0.0, 0.35, 0.7];
/// Width of each band, as a fraction of the usable span
const BAND_WIDTH: f32 = 0.3;

/// Build one batch containing every label exactly once.
///
/// x stays within `[margin, width - TARGET_WIDTH - margin]`; every target
/// starts fully above y = 0. The vertical slots are shuffled after the
/// horizontal positions are drawn, so spawn order and side are unrelated.
pub fn plan_batch<R: Rng + ?Sized>(
    labels: &[String],
    playfield_width: f32,
    tuning: &SpawnTuning,
    rng: &mut R,
) -> Vec<Target> {
    if labels.is_empty() {
        return Vec::new();
    }

    let min_x = tuning.margin;
    let span = (playfield_width - TARGET_WIDTH - 2.0 * tuning.margin).max(0.0);
    let gap_chance = tuning.gap_chance.clamp(0.0, 1.0);

    let mut y = -TARGET_HEIGHT - rng.random::<f32>() * tuning.initial_jitter;
    let mut xs = Vec::with_capacity(labels.len());
    let mut ys = Vec::with_capacity(labels.len());

    for _ in labels {
        let mut spacing = tuning.spacing_min + rng.random::<f32>() * tuning.spacing_range;
        // Occasional breathing room
        if rng.random_bool(gap_chance) {
            spacing += rng.random::<f32>() * tuning.gap_max;
        }
        y -= spacing;
        ys.push(y);

        let band = BAND_STARTS[rng.random_range(0..BAND_STARTS.len())];
        xs.push(min_x + span * (band + rng.random::<f32>() * BAND_WIDTH));
    }

    ys.shuffle(rng);

    labels
        .iter()
        .zip(xs.into_iter().zip(ys))
        .enumerate()
        .map(|(i, (label, (x, y)))| Target::new(x, y, label.as_str(), target_color(i)))
        .collect()
}

/// Labels for one wave: `wave_size` entries starting at `cursor`, wrapping
/// around the level's list
pub fn wave_labels(level_labels: &[String], cursor: usize, wave_size: usize) -> Vec<String> {
    if level_labels.is_empty() {
        return Vec::new();
    }
    (0..wave_size)
        .map(|i| level_labels[(cursor + i) % level_labels.len()].clone())
        .collect()
}
