//! Scripted player for headless runs
//!
//! Steers under the lowest target still above the ship and keeps the
//! trigger held. Gates are the caller's business.

use super::state::Session;
use super::tick::TickInput;

/// Input for the next tick
pub fn autopilot_input(session: &Session) -> TickInput {
    let ship_top = session.player.pos.y;
    let aim = session
        .targets
        .iter()
        .filter(|t| t.bounds().bottom() < ship_top)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|t| t.bounds().center().x);

    TickInput {
        pointer_x: aim,
        fire: true,
        ..TickInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::lead::LeadField;
    use crate::sim::{GameEvent, GamePhase, tick};

    #[test]
    fn test_autopilot_aims_at_lowest_target() {
        let mut session = Session::new(GameConfig::default(), 4);
        session.start();
        let lowest = session
            .targets
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|t| t.bounds().center().x);

        let input = autopilot_input(&session);
        assert!(input.fire);
        assert_eq!(input.pointer_x, lowest);
    }

    #[test]
    fn test_autopilot_plays_a_full_session() {
        let mut session = Session::new(GameConfig::default(), 21);
        session.start();

        let mut ticks = 0;
        while session.phase != GamePhase::Final && ticks < 50_000 {
            if let GamePhase::Gate(_) = session.phase {
                let values: Vec<_> = LeadField::ALL
                    .iter()
                    .map(|f| (*f, "autopilot".to_string()))
                    .collect();
                session.submit_gate(&values);
            }
            let input = autopilot_input(&session);
            tick(&mut session, &input);
            ticks += 1;
        }

        assert_eq!(session.phase, GamePhase::Final);
        assert!(session.score > 0);
        assert_eq!(session.score, 100 * u64::from(session.hits.total()));
        let finished = session
            .drain_events()
            .into_iter()
            .any(|e| matches!(e, GameEvent::SessionFinished(_)));
        assert!(finished);
    }
}
