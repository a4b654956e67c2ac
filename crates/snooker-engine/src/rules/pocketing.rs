//! What happens when a ball drops into a pocket.

use crate::api::types::BodyId;
use crate::core::time::Timestamp;
use crate::rules::balls::{Ball, BallColor, LiveBall};
use crate::rules::state::GameState;

const CUE_BALL_FOUL: &str = "Foul: cue ball pocketed, -1. Click in the D to place it again";
const OUT_OF_TURN_FOUL: &str = "Foul: coloured ball potted out of turn";

fn wrong_colour_foul(expected: BallColor) -> String {
    format!("Foul: you should have potted the {} ball", expected.name())
}

/// Apply the rules for a ball entering a pocket.
///
/// A ball that is no longer live (a duplicate sensor event for a ball that
/// has already been removed) is ignored. Returns whether anything happened.
pub fn on_ball_pocketed(state: &mut GameState, id: BodyId, now: Timestamp) -> bool {
    let Some(live) = state.remove(id) else {
        log::debug!("Ignoring pocket event for {:?}, not on the table", id);
        return false;
    };

    match live.ball {
        Ball::Cue => on_cue_ball_pocketed(state, now),
        Ball::Snooker { color } => {
            let respawning = on_snooker_ball_pocketed(state, &live, color, now);
            state.record_pocketed(color, respawning);
        }
    }
    true
}

/// Cue ball down: fixed penalty, foul alert and a respawn in the D.
/// The caller has already taken the ball off the table.
pub fn on_cue_ball_pocketed(state: &mut GameState, now: Timestamp) {
    let penalty = state.rules().cue_ball_penalty;
    state.adjust_score(-penalty);
    state.raise_alert(CUE_BALL_FOUL, now);
    let spot = state.layout().cue_respawn_spot();
    state.schedule_respawn(Ball::Cue, spot, now);
}

/// Returns whether the ball will come back.
fn on_snooker_ball_pocketed(state: &mut GameState, live: &LiveBall, color: BallColor, now: Timestamp) -> bool {
    if state.mode().colors_only() {
        // Offenders stay off the table in this mode
        return pot_in_order(state, live, color, now, false);
    }

    if color == BallColor::Red {
        state.adjust_score(live.ball.value());
        state.pot_red();
        return false;
    }

    if state.reds_remaining() > 0 {
        let penalty = state.rules().foul_penalty;
        state.raise_alert(OUT_OF_TURN_FOUL, now);
        state.adjust_score(-penalty);
        respawn_at_home(state, live.ball, now);
        return true;
    }

    pot_in_order(state, live, color, now, true)
}

fn pot_in_order(state: &mut GameState, live: &LiveBall, color: BallColor, now: Timestamp, respawn_on_foul: bool) -> bool {
    let expected = state.expected_color();
    if color == expected {
        state.adjust_score(live.ball.value());
        state.advance_expected_color();
        return false;
    }

    let penalty = state.rules().foul_penalty;
    state.raise_alert(&wrong_colour_foul(expected), now);
    state.adjust_score(-penalty);
    if respawn_on_foul {
        respawn_at_home(state, live.ball, now);
    }
    respawn_on_foul
}

fn respawn_at_home(state: &mut GameState, ball: Ball, now: Timestamp) {
    let home = state.registry().home_of(ball);
    state.schedule_respawn(ball, home, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::GameConfig;
    use crate::rules::balls::COLOR_ORDER;
    use crate::rules::setup::Mode;
    use crate::rules::state::HostCommand;
    use glam::Vec2;

    fn at(ms: f64) -> Timestamp {
        Timestamp {
            game_ms: ms,
            wall_ms: ms,
        }
    }

    fn state_in(mode: Mode) -> GameState {
        let mut s = GameState::new(&GameConfig::default());
        s.switch_mode(mode);
        s.drain_commands();
        s
    }

    fn id_of(s: &GameState, color: BallColor) -> BodyId {
        s.registry().iter().find(|b| b.ball.color() == color).map(|b| b.id).unwrap()
    }

    fn pot(s: &mut GameState, color: BallColor, ms: f64) {
        let id = id_of(s, color);
        assert!(on_ball_pocketed(s, id, at(ms)));
    }

    #[test]
    fn red_scores_one_and_never_returns() {
        let mut s = state_in(Mode::Regular);
        pot(&mut s, BallColor::Red, 0.0);
        assert_eq!(s.score(), 1);
        assert_eq!(s.reds_remaining(), 14);
        assert_eq!(s.registry().count_color(BallColor::Red), 14);
        assert_eq!(s.pending_respawns(), 0);
        assert_eq!(s.last_pocketed(), Some(BallColor::Red));
    }

    #[test]
    fn colour_out_of_turn_is_fouled_and_respawned_home() {
        let mut s = state_in(Mode::Regular);
        let home = s.layout().home_positions().get(BallColor::Blue).unwrap();
        pot(&mut s, BallColor::Blue, 0.0);
        assert_eq!(s.score(), -4);
        assert_eq!(s.registry().count_color(BallColor::Blue), 0);
        assert_eq!(s.alerts(0.0).count(), 1);

        s.fire_due_respawns(at(499.0));
        assert_eq!(s.registry().count_color(BallColor::Blue), 0);
        s.fire_due_respawns(at(500.0));
        let blue = s.registry().iter().find(|b| b.ball.color() == BallColor::Blue).unwrap();
        assert_eq!(blue.spawn_pos, home);
    }

    #[test]
    fn regular_colours_phase_follows_order() {
        let mut s = state_in(Mode::Regular);
        for _ in 0..15 {
            pot(&mut s, BallColor::Red, 0.0);
        }
        assert_eq!(s.reds_remaining(), 0);
        assert_eq!(s.score(), 15);

        pot(&mut s, BallColor::Yellow, 0.0);
        assert_eq!(s.score(), 17);
        assert_eq!(s.expected_color(), BallColor::Green);

        // Wrong colour: foul naming green, ball comes back
        pot(&mut s, BallColor::Pink, 0.0);
        assert_eq!(s.score(), 13);
        assert_eq!(s.expected_color(), BallColor::Green);
        let alert = s.alerts(0.0).last().unwrap().text.clone();
        assert!(alert.ends_with("you should have potted the green ball"), "{}", alert);
        s.fire_due_respawns(at(500.0));
        assert_eq!(s.registry().count_color(BallColor::Pink), 1);
    }

    #[test]
    fn colours_only_clears_in_order_for_27() {
        let mut s = state_in(Mode::ColorsOnly);
        for color in COLOR_ORDER {
            pot(&mut s, color, 0.0);
        }
        assert_eq!(s.score(), 27);
        assert_eq!(s.expected_color_index(), 0);
        assert!(s.registry().is_empty());
    }

    #[test]
    fn colours_only_offender_stays_down() {
        let mut s = state_in(Mode::ColorsOnly);
        pot(&mut s, BallColor::Black, 0.0);
        assert_eq!(s.score(), -4);
        assert_eq!(s.expected_color(), BallColor::Yellow);
        s.fire_due_respawns(at(10_000.0));
        assert_eq!(s.registry().count_color(BallColor::Black), 0);
        let cmds = s.drain_commands();
        assert!(cmds.contains(&HostCommand::BallPocketed {
            color: BallColor::Black,
            respawning: false
        }));
    }

    #[test]
    fn colours_before_reds_are_all_fouls() {
        let mut s = state_in(Mode::Regular);
        for color in [BallColor::Green, BallColor::Brown, BallColor::Yellow] {
            pot(&mut s, color, 0.0);
        }
        assert_eq!(s.score(), -12);
        assert_eq!(s.reds_remaining(), 15);
        assert_eq!(s.expected_color_index(), 0);
        assert_eq!(s.pending_respawns(), 3);
    }

    #[test]
    fn colours_only_wrong_ball_names_the_expected_one() {
        let mut s = state_in(Mode::ColorsOnly);
        pot(&mut s, BallColor::Green, 0.0);
        assert_eq!(s.score(), -4);
        assert_eq!(s.expected_color_index(), 0);
        let alert = s.alerts(0.0).last().unwrap().text.clone();
        assert!(alert.contains("yellow"), "{}", alert);
        s.fire_due_respawns(at(1_000.0));
        assert_eq!(s.registry().count_color(BallColor::Green), 0);
    }

    #[test]
    fn cue_ball_foul_respawns_in_the_d() {
        let mut s = state_in(Mode::Regular);
        let cue = s.place_cue_ball(Vec2::new(150.0, 200.0)).unwrap();
        assert!(on_ball_pocketed(&mut s, cue, at(0.0)));
        assert_eq!(s.score(), -1);
        assert!(!s.has_cue_ball());
        let alert = s.alerts(0.0).last().unwrap().text.clone();
        assert!(alert.contains("cue ball pocketed"));

        s.fire_due_respawns(at(500.0));
        let respawned = s.registry().cue().unwrap();
        assert_eq!(respawned.spawn_pos, s.layout().cue_respawn_spot());
    }

    #[test]
    fn hand_placed_cue_wins_over_respawn() {
        let mut s = state_in(Mode::Regular);
        let cue = s.place_cue_ball(Vec2::new(150.0, 200.0)).unwrap();
        on_ball_pocketed(&mut s, cue, at(0.0));
        let placed = s.place_cue_ball(Vec2::new(120.0, 210.0)).unwrap();
        s.fire_due_respawns(at(500.0));
        assert_eq!(s.registry().count_color(BallColor::White), 1);
        assert_eq!(s.registry().cue().map(|b| b.id), Some(placed));
    }

    #[test]
    fn duplicate_pocket_event_counts_once() {
        let mut s = state_in(Mode::Regular);
        let red = id_of(&s, BallColor::Red);
        assert!(on_ball_pocketed(&mut s, red, at(0.0)));
        assert!(!on_ball_pocketed(&mut s, red, at(0.0)));
        assert_eq!(s.score(), 1);
        assert_eq!(s.reds_remaining(), 14);
    }

    #[test]
    fn score_published_after_each_pot() {
        let mut s = state_in(Mode::Regular);
        pot(&mut s, BallColor::Red, 0.0);
        let cmds = s.drain_commands();
        assert!(cmds.contains(&HostCommand::ScoreChanged(1)));
        assert!(cmds.iter().any(|c| matches!(c, HostCommand::RemoveBody(_))));
    }
}
