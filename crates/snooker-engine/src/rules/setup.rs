//! Game modes and their opening layouts.

use glam::Vec2;

use crate::api::game::RulesConfig;
use crate::rules::balls::{Ball, BallColor, COLOR_ORDER};
use crate::rules::rng::Rng;
use crate::rules::table::{colors_at_home, TableLayout};

/// The four selectable game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Racked reds plus the colours on their spots.
    Regular,
    /// Reds scattered at random, no colours.
    RedsOnly,
    /// Colours and reds scattered at random.
    RedsAndColors,
    /// Colours on their spots, no reds. Bound to key `4` and left out of the
    /// on-screen help.
    ColorsOnly,
}

impl Mode {
    pub fn number(self) -> u32 {
        match self {
            Mode::Regular => 1,
            Mode::RedsOnly => 2,
            Mode::RedsAndColors => 3,
            Mode::ColorsOnly => 4,
        }
    }

    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Mode::Regular),
            2 => Some(Mode::RedsOnly),
            3 => Some(Mode::RedsAndColors),
            4 => Some(Mode::ColorsOnly),
            _ => None,
        }
    }

    /// Keyboard binding: the digit keys `1`-`4` (key codes 49-52).
    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match key_code {
            49..=52 => Self::from_number(key_code - 48),
            _ => None,
        }
    }

    /// Whether the expected-colour order is enforced from the first shot.
    pub fn colors_only(self) -> bool {
        self == Mode::ColorsOnly
    }
}

/// One ball of an opening layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub ball: Ball,
    pub pos: Vec2,
}

/// Everything a mode switch needs: where the balls go and how many reds the
/// rules should expect.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSetup {
    pub mode: Mode,
    pub placements: Vec<Placement>,
    pub reds_remaining: u32,
}

/// Build the opening layout for `mode`. The cue ball is never placed here:
/// after a switch the player puts it down by hand.
pub fn configure(mode: Mode, layout: &TableLayout, rules: &RulesConfig, rng: &mut Rng) -> ModeSetup {
    let count = rules.number_of_balls as usize;
    let red = |pos: Vec2| Placement {
        ball: Ball::snooker(BallColor::Red),
        pos,
    };

    let (placements, reds_remaining) = match mode {
        Mode::Regular => {
            let mut placements: Vec<Placement> = layout.rack(count).into_iter().map(red).collect();
            placements.extend(home_colors(layout));
            (placements, count as u32)
        }
        Mode::RedsOnly => {
            let placements = (0..count).map(|_| red(rng.point_in(&layout.safe_area))).collect();
            (placements, count as u32)
        }
        Mode::RedsAndColors => {
            let mut placements: Vec<Placement> = COLOR_ORDER
                .iter()
                .map(|&color| Placement {
                    ball: Ball::snooker(color),
                    pos: rng.point_in(&layout.safe_area),
                })
                .collect();
            let reds = count.saturating_sub(COLOR_ORDER.len());
            placements.extend((0..reds).map(|_| red(rng.point_in(&layout.safe_area))));
            (placements, reds as u32)
        }
        Mode::ColorsOnly => (home_colors(layout).collect(), 0),
    };

    ModeSetup {
        mode,
        placements,
        reds_remaining,
    }
}

fn home_colors(layout: &TableLayout) -> impl Iterator<Item = Placement> {
    colors_at_home(layout).into_iter().map(|(color, pos)| Placement {
        ball: Ball::snooker(color),
        pos,
    })
}
