//! Level and session flow
//!
//! Start -> Playing -> Transition -> Gate(n) -> Transition -> Playing ... -> Final.
//! Player actions arriving in the wrong phase are ignored. A pending
//! transition can't be replaced by another one.

use super::spawn::{plan_batch, wave_labels};
use super::state::{AfterTransition, GameEvent, GamePhase, Player, Session, Transition};
use crate::config::{CaptureMode, LabelAssignment, SpawnPolicy};
use crate::lead::{LeadField, LeadInfo, LeadRecord};
use crate::recommend::{Summary, summarize};

impl Session {
    /// Start action. Returns false if the session isn't waiting to start.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Start {
            return false;
        }

        self.level = 1;
        self.wave = 1;
        self.wave_cursor = 0;
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.fire_cooldown = 0;
        self.player = Player::new(self.config.playfield_width, self.config.playfield_height);
        self.projectiles.clear();
        self.targets.clear();
        self.particles.clear();
        self.transition = None;
        self.summary = None;
        self.lead_sent = false;
        if matches!(self.config.labels, LabelAssignment::Shuffled { .. }) {
            self.assign_labels();
        }

        log::info!(
            "Session started ({} spawning, speed {:.2})",
            self.config.spawn_policy.as_str(),
            self.speed
        );
        self.phase = GamePhase::Playing;
        self.spawn_batch();
        true
    }

    /// Play again: back to `Start` with a clean slate. The label pool and
    /// catalog are config and stay as they are.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Start;
        self.level = 1;
        self.wave = 1;
        self.wave_cursor = 0;
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.fire_cooldown = 0;
        self.player = Player::new(self.config.playfield_width, self.config.playfield_height);
        self.projectiles.clear();
        self.targets.clear();
        self.particles.clear();
        self.hits.clear();
        self.lead = LeadInfo::default();
        self.transition = None;
        self.summary = None;
        self.lead_sent = false;
        self.events.clear();
        log::info!("Session reset");
    }

    /// Gate form submitted. Only fields belonging to the open gate are kept.
    /// Returns false if no gate is open.
    pub fn submit_gate(&mut self, values: &[(LeadField, String)]) -> bool {
        let GamePhase::Gate(gate) = self.phase else {
            log::warn!("Gate submission ignored in phase '{}'", self.phase.as_str());
            return false;
        };

        let fields = self.config.gate_after(gate).unwrap_or(&[]).to_vec();
        for (field, value) in values {
            if fields.contains(field) {
                self.lead.set(*field, value.as_str());
            } else {
                log::warn!("Gate {} does not collect {:?}", gate, field);
            }
        }
        log::info!("Gate {} submitted", gate);

        if self.config.capture_mode == CaptureMode::Progressive {
            let summary = self.current_summary();
            let record = LeadRecord::partial(gate, &self.lead, self.score, &summary);
            self.emit(GameEvent::LeadReady(record));
        }

        self.advance_level();
        true
    }

    /// The live batch is empty. Ignored unless playing with no pending
    /// transition.
    pub(crate) fn on_batch_exhausted(&mut self) {
        if self.phase != GamePhase::Playing || self.transition.is_some() {
            return;
        }
        self.emit(GameEvent::BatchCleared {
            level: self.level,
            wave: self.wave,
        });

        let complete = self.config.complete_delay_ticks;
        if self.wave < self.config.spawn_policy.waves_per_level() {
            let text = format!("WAVE {}", self.wave + 1);
            self.begin_transition(text, self.config.level_intro_ticks, AfterTransition::NextWave);
        } else if self.level >= self.config.level_count {
            self.begin_transition("MISSION COMPLETE!", complete, AfterTransition::Final);
        } else if self.config.gate_after(self.level).is_some() {
            let then = AfterTransition::OpenGate(self.level);
            self.begin_transition("LEVEL COMPLETE!", complete, then);
        } else {
            self.begin_transition("LEVEL COMPLETE!", complete, AfterTransition::AdvanceLevel);
        }
    }

    /// Count down the pending transition; fire its action when it runs out
    pub(crate) fn advance_transition(&mut self) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        transition.ticks_left = transition.ticks_left.saturating_sub(1);
        if transition.ticks_left > 0 {
            return;
        }

        let then = transition.then;
        self.transition = None;
        match then {
            AfterTransition::NextWave => {
                self.wave += 1;
                self.phase = GamePhase::Playing;
                self.spawn_batch();
            }
            AfterTransition::OpenGate(gate) => {
                let fields = self.config.gate_after(gate).unwrap_or(&[]).to_vec();
                log::info!("Gate {} open", gate);
                self.phase = GamePhase::Gate(gate);
                self.emit(GameEvent::GateOpened { gate, fields });
            }
            AfterTransition::AdvanceLevel => self.advance_level(),
            AfterTransition::SpawnLevel => {
                self.phase = GamePhase::Playing;
                self.spawn_batch();
            }
            AfterTransition::Final => self.finish_session(),
        }
    }

    /// Overlay text of the pending transition, if any
    pub fn overlay_text(&self) -> Option<&str> {
        self.transition.as_ref().map(|t| t.text.as_str())
    }

    fn begin_transition(&mut self, text: impl Into<String>, ticks: u32, then: AfterTransition) {
        let text = text.into();
        log::info!("Transition: {} ({} ticks)", text, ticks);
        self.phase = GamePhase::Transition;
        self.transition = Some(Transition {
            ticks_left: ticks,
            text,
            then,
        });
    }

    /// Next level, faster targets, then the level announcement
    fn advance_level(&mut self) {
        self.level += 1;
        self.wave = 1;
        self.wave_cursor = 0;
        self.speed += self.config.speed_step;
        log::info!("Level {} (speed {:.2})", self.level, self.speed);
        let text = format!("LEVEL {}", self.level);
        self.begin_transition(text, self.config.level_intro_ticks, AfterTransition::SpawnLevel);
    }

    /// Replace the live batch with the next one for the current level/wave
    fn spawn_batch(&mut self) {
        let level_labels = self.labels_for_level(self.level);
        let labels = match self.config.spawn_policy {
            SpawnPolicy::FullLevel => level_labels.to_vec(),
            SpawnPolicy::Waves { wave_size, .. } => {
                let labels = wave_labels(level_labels, self.wave_cursor, wave_size);
                self.wave_cursor += wave_size;
                labels
            }
        };

        self.targets = plan_batch(
            &labels,
            self.config.playfield_width,
            &self.config.spawn,
            &mut self.rng,
        );
        log::info!(
            "Spawned {} targets (level {}, wave {})",
            self.targets.len(),
            self.level,
            self.wave
        );

        if self.targets.is_empty() {
            // A level with nothing to deal has no further waves either
            if self.labels_for_level(self.level).is_empty() {
                self.wave = self.wave.max(self.config.spawn_policy.waves_per_level());
            }
            self.on_batch_exhausted();
        }
    }

    fn current_summary(&self) -> Summary {
        summarize(
            &self.hits,
            &self.config.catalog,
            self.config.top_priorities,
            self.config.top_products,
        )
    }

    /// Final screen: compute the summary and emit the full lead record once
    fn finish_session(&mut self) {
        let summary = self.current_summary();
        self.phase = GamePhase::Final;
        log::info!(
            "Session finished: score {}, top priorities [{}], recommended [{}]",
            self.score,
            summary.format_priorities(),
            summary.recommended_names()
        );

        if !self.lead_sent {
            self.lead_sent = true;
            let record = LeadRecord::complete(&self.lead, self.score, &summary);
            self.emit(GameEvent::LeadReady(record));
        }
        self.summary = Some(summary.clone());
        self.emit(GameEvent::SessionFinished(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::lead::COMPLETE_RECORD_TYPE;
    use crate::sim::{TickInput, tick};

    fn fixed(levels: &[&[&str]]) -> GameConfig {
        GameConfig {
            labels: LabelAssignment::Fixed {
                levels: levels
                    .iter()
                    .map(|l| l.iter().map(|s| s.to_string()).collect())
                    .collect(),
            },
            ..GameConfig::default()
        }
    }

    fn idle(session: &mut Session, ticks: u32) {
        for _ in 0..ticks {
            tick(session, &TickInput::default());
        }
    }

    /// Drop the live batch off the bottom and let the next tick notice
    fn clear_batch(session: &mut Session) {
        let height = session.config.playfield_height;
        for target in &mut session.targets {
            target.pos.y = height + 1.0;
        }
        tick(session, &TickInput::default());
    }

    fn run_out_transition(session: &mut Session) {
        while session.phase == GamePhase::Transition {
            tick(session, &TickInput::default());
        }
    }

    fn gate1_values() -> Vec<(LeadField, String)> {
        vec![
            (LeadField::Name, "Ada".to_string()),
            (LeadField::Email, "ada@example.org".to_string()),
        ]
    }

    fn gate2_values() -> Vec<(LeadField, String)> {
        vec![
            (LeadField::Organization, "General".to_string()),
            (LeadField::Title, "CNO".to_string()),
        ]
    }

    fn lead_records(events: &[GameEvent]) -> Vec<LeadRecord> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LeadReady(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_spawns_first_level() {
        let mut session = Session::new(GameConfig::default(), 9);
        assert!(session.start());
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.targets.len(), 6);
        assert_eq!(session.speed, 1.01);

        // Second start is a no-op
        assert!(!session.start());
    }

    #[test]
    fn test_start_reshuffles_labels() {
        let mut session = Session::new(GameConfig::default(), 9);
        let before = session.level_labels.clone();
        session.start();
        // 23! orderings; a collision here means the shuffle never ran
        assert_ne!(session.level_labels, before);
    }

    #[test]
    fn test_full_session_flow() {
        let mut session = Session::new(GameConfig::default(), 11);
        session.start();
        assert_eq!(session.labels_for_level(1).len(), 6);

        clear_batch(&mut session);
        assert_eq!(session.phase, GamePhase::Transition);
        assert_eq!(session.overlay_text(), Some("LEVEL COMPLETE!"));

        run_out_transition(&mut session);
        assert_eq!(session.phase, GamePhase::Gate(1));
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::GateOpened {
            gate: 1,
            fields: vec![LeadField::Name, LeadField::Email],
        }));

        // Nothing moves while the gate is open
        let frozen = session.targets.len();
        idle(&mut session, 30);
        assert_eq!(session.phase, GamePhase::Gate(1));
        assert_eq!(session.targets.len(), frozen);

        assert!(session.submit_gate(&gate1_values()));
        assert_eq!(session.level, 2);
        assert!((session.speed - 1.34).abs() < 1e-5);
        assert_eq!(session.overlay_text(), Some("LEVEL 2"));
        run_out_transition(&mut session);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.targets.len(), 8);

        clear_batch(&mut session);
        run_out_transition(&mut session);
        assert_eq!(session.phase, GamePhase::Gate(2));
        assert!(session.submit_gate(&gate2_values()));
        run_out_transition(&mut session);
        assert_eq!(session.level, 3);
        assert_eq!(session.targets.len(), 9);

        clear_batch(&mut session);
        assert_eq!(session.overlay_text(), Some("MISSION COMPLETE!"));
        run_out_transition(&mut session);
        assert_eq!(session.phase, GamePhase::Final);

        let records = lead_records(&session.drain_events());
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.kind, COMPLETE_RECORD_TYPE);
        assert_eq!(record.name, "Ada");
        assert_eq!(record.email, "ada@example.org");
        assert_eq!(record.organization, "General");
        assert_eq!(record.title, "CNO");
        assert_eq!(record.score, 0);
        assert_eq!(session.summary, Some(Default::default()));

        // Final is terminal until reset; ticking emits nothing more
        idle(&mut session, 200);
        assert!(lead_records(&session.drain_events()).is_empty());
    }

    #[test]
    fn test_transition_delay_is_honored() {
        let mut session = Session::new(GameConfig::default(), 2);
        session.start();
        clear_batch(&mut session);

        let delay = session.config.complete_delay_ticks;
        idle(&mut session, delay - 1);
        assert_eq!(session.phase, GamePhase::Transition);
        idle(&mut session, 1);
        assert_eq!(session.phase, GamePhase::Gate(1));
    }

    #[test]
    fn test_transition_not_reentrant() {
        let mut session = Session::new(GameConfig::default(), 2);
        session.start();
        clear_batch(&mut session);
        let pending = session.transition.clone();

        session.on_batch_exhausted();
        assert_eq!(session.transition, pending);
        // Gate submissions during a transition are ignored too
        assert!(!session.submit_gate(&gate1_values()));
        assert_eq!(session.level, 1);
    }

    #[test]
    fn test_gate_ignores_foreign_fields() {
        let mut session = Session::new(GameConfig::default(), 2);
        session.start();
        clear_batch(&mut session);
        run_out_transition(&mut session);

        let mut values = gate1_values();
        values.push((LeadField::Title, "sneaky".to_string()));
        session.submit_gate(&values);
        assert_eq!(session.lead.name, "Ada");
        assert_eq!(session.lead.title, "");
    }

    #[test]
    fn test_progressive_capture_sends_each_gate() {
        let config = GameConfig {
            capture_mode: CaptureMode::Progressive,
            ..fixed(&[&["A"], &["B"], &["C"]])
        };
        let mut session = Session::new(config, 3);
        session.start();
        session.hits.record("A");

        clear_batch(&mut session);
        run_out_transition(&mut session);
        session.submit_gate(&gate1_values());
        let records = lead_records(&session.drain_events());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, "GATE 1 - Partial Lead");
        assert_eq!(records[0].name, "Ada");
        assert_eq!(records[0].top_priorities, "A (1x)");

        run_out_transition(&mut session);
        clear_batch(&mut session);
        run_out_transition(&mut session);
        session.submit_gate(&gate2_values());
        run_out_transition(&mut session);
        clear_batch(&mut session);
        run_out_transition(&mut session);

        let kinds: Vec<_> = lead_records(&session.drain_events())
            .into_iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, vec!["GATE 2 - Partial Lead", COMPLETE_RECORD_TYPE]);
    }

    #[test]
    fn test_empty_level_completes_immediately() {
        let mut session = Session::new(fixed(&[&[], &["B"], &["C"]]), 4);
        session.start();
        assert!(session.targets.is_empty());
        assert_eq!(session.phase, GamePhase::Transition);
        assert_eq!(session.overlay_text(), Some("LEVEL COMPLETE!"));
    }

    #[test]
    fn test_empty_level_skips_remaining_waves() {
        let config = GameConfig {
            spawn_policy: SpawnPolicy::Waves {
                wave_size: 2,
                waves_per_level: 3,
            },
            ..fixed(&[&[], &["B"], &["C"]])
        };
        let mut session = Session::new(config, 4);
        session.start();
        assert!(session.targets.is_empty());
        assert_eq!(session.overlay_text(), Some("LEVEL COMPLETE!"));

        run_out_transition(&mut session);
        assert_eq!(session.phase, GamePhase::Gate(1));
        session.submit_gate(&gate1_values());
        run_out_transition(&mut session);
        // Next level starts back at wave 1 with a full wave
        assert_eq!(session.wave, 1);
        assert_eq!(session.targets.len(), 2);
    }

    #[test]
    fn test_missing_gate_goes_straight_to_next_level() {
        let config = GameConfig {
            gates: vec![],
            ..fixed(&[&["A"], &["B"], &["C"]])
        };
        let mut session = Session::new(config, 4);
        session.start();
        clear_batch(&mut session);
        run_out_transition(&mut session);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.level, 2);
        assert_eq!(session.targets[0].label, "B");
    }

    #[test]
    fn test_wave_policy_cycles_labels() {
        let config = GameConfig {
            spawn_policy: SpawnPolicy::Waves {
                wave_size: 2,
                waves_per_level: 3,
            },
            ..fixed(&[&["A", "B", "C"], &["D"], &["E"]])
        };
        let mut session = Session::new(config, 5);
        session.start();

        let mut seen = Vec::new();
        for wave in 1..=3 {
            assert_eq!(session.wave, wave);
            let mut labels: Vec<_> = session.targets.iter().map(|t| t.label.clone()).collect();
            labels.sort();
            seen.push(labels);
            clear_batch(&mut session);
            if wave < 3 {
                assert_eq!(session.overlay_text(), Some(format!("WAVE {}", wave + 1).as_str()));
                run_out_transition(&mut session);
                assert_eq!(session.level, 1);
            }
        }
        assert_eq!(
            seen,
            vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["A".to_string(), "C".to_string()],
                vec!["B".to_string(), "C".to_string()],
            ]
        );

        run_out_transition(&mut session);
        assert_eq!(session.phase, GamePhase::Gate(1));
        session.submit_gate(&gate1_values());
        run_out_transition(&mut session);
        // Single-label level still spawns full waves by wrapping
        assert_eq!(session.targets.len(), 2);
        assert!(session.targets.iter().all(|t| t.label == "D"));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut session = Session::new(GameConfig::default(), 6);
        let catalog = session.config.catalog.clone();
        let pool = session.config.pool.clone();

        session.start();
        session.hits.record("Retention");
        session.score = 700;
        clear_batch(&mut session);
        run_out_transition(&mut session);
        session.submit_gate(&gate1_values());

        session.reset();
        assert_eq!(session.phase, GamePhase::Start);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
        assert!(session.hits.is_empty());
        assert_eq!(session.lead, LeadInfo::default());
        assert_eq!(session.speed, session.config.initial_speed);
        assert!(session.targets.is_empty());
        assert!(session.projectiles.is_empty());
        assert!(session.particles.is_empty());
        assert_eq!(session.config.catalog, catalog);
        assert_eq!(session.config.pool, pool);

        // And the next playthrough starts cleanly
        assert!(session.start());
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_replay_sends_a_fresh_record() {
        let mut session = Session::new(fixed(&[&["A"], &["B"], &["C"]]), 8);
        for _ in 0..2 {
            session.start();
            clear_batch(&mut session);
            run_out_transition(&mut session);
            session.submit_gate(&gate1_values());
            run_out_transition(&mut session);
            clear_batch(&mut session);
            run_out_transition(&mut session);
            session.submit_gate(&gate2_values());
            run_out_transition(&mut session);
            clear_batch(&mut session);
            run_out_transition(&mut session);
            assert_eq!(lead_records(&session.drain_events()).len(), 1);
            session.reset();
        }
    }
}
