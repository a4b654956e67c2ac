use crate::api::types::BodyId;
use crate::rules::registry::Registry;

/// What a started collision means to the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    NotRelevant,
    /// A live ball entered a pocket sensor.
    Pocketed { ball: BodyId, pocket: BodyId },
    /// The cue ball touched a snooker ball. Only drives the hit sound.
    CueStrike,
}

/// Classify one collision pair. Member order does not matter.
pub fn classify(a: BodyId, b: BodyId, registry: &Registry) -> Contact {
    match (registry.is_pocket(a), registry.is_pocket(b)) {
        (true, false) if registry.get(b).is_some() => return Contact::Pocketed { ball: b, pocket: a },
        (false, true) if registry.get(a).is_some() => return Contact::Pocketed { ball: a, pocket: b },
        (true, _) | (_, true) => return Contact::NotRelevant,
        _ => {}
    }

    match (registry.get(a), registry.get(b)) {
        (Some(x), Some(y)) if x.ball.is_cue() != y.ball.is_cue() => Contact::CueStrike,
        _ => Contact::NotRelevant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::TableConfig;
    use crate::rules::balls::{Ball, BallColor, LiveBall};
    use crate::rules::table::TableLayout;
    use glam::Vec2;

    const POCKET: BodyId = BodyId(100);
    const OTHER_POCKET: BodyId = BodyId(101);
    const CUSHION: BodyId = BodyId(200);
    const CUE: BodyId = BodyId(1);
    const RED: BodyId = BodyId(2);
    const BLUE: BodyId = BodyId(3);

    fn registry() -> Registry {
        let mut r = Registry::new(TableLayout::new(&TableConfig::default()));
        r.register_pocket(POCKET);
        r.register_pocket(OTHER_POCKET);
        for (id, ball) in [(CUE, Ball::Cue), (RED, Ball::snooker(BallColor::Red)), (BLUE, Ball::snooker(BallColor::Blue))] {
            let live = LiveBall {
                id,
                ball,
                spawn_pos: Vec2::ZERO,
                radius: 6.65,
            };
            assert!(r.insert(live).is_ok());
        }
        r
    }

    #[test]
    fn ball_in_pocket_either_order() {
        let r = registry();
        assert_eq!(classify(POCKET, RED, &r), Contact::Pocketed { ball: RED, pocket: POCKET });
        assert_eq!(classify(CUE, POCKET, &r), Contact::Pocketed { ball: CUE, pocket: POCKET });
    }

    #[test]
    fn cue_on_snooker_ball_is_a_strike() {
        let r = registry();
        assert_eq!(classify(CUE, BLUE, &r), Contact::CueStrike);
        assert_eq!(classify(RED, CUE, &r), Contact::CueStrike);
    }

    #[test]
    fn everything_else_is_ignored() {
        let r = registry();
        assert_eq!(classify(RED, BLUE, &r), Contact::NotRelevant);
        assert_eq!(classify(RED, CUSHION, &r), Contact::NotRelevant);
        assert_eq!(classify(POCKET, OTHER_POCKET, &r), Contact::NotRelevant);
        assert_eq!(classify(POCKET, CUSHION, &r), Contact::NotRelevant);
        // Ball already removed by an earlier event
        assert_eq!(classify(POCKET, BodyId(42), &r), Contact::NotRelevant);
    }
}
