//! Snooker ball data: colours, point values and the colour potting order.

use glam::Vec2;

use crate::api::types::BodyId;

/// The eight ball colours on a snooker table. White is only ever the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallColor {
    White,
    Red,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

/// Order in which the colours must be potted once the reds are gone.
pub const COLOR_ORDER: [BallColor; 6] = [
    BallColor::Yellow,
    BallColor::Green,
    BallColor::Brown,
    BallColor::Blue,
    BallColor::Pink,
    BallColor::Black,
];

impl BallColor {
    /// Point value. White is a penalty marker only and is never scored directly.
    pub fn value(self) -> i32 {
        match self {
            BallColor::White => -4,
            BallColor::Red => 1,
            BallColor::Yellow => 2,
            BallColor::Green => 3,
            BallColor::Brown => 4,
            BallColor::Blue => 5,
            BallColor::Pink => 6,
            BallColor::Black => 7,
        }
    }

    /// Lowercase name used in foul messages.
    pub fn name(self) -> &'static str {
        match self {
            BallColor::White => "white",
            BallColor::Red => "red",
            BallColor::Yellow => "yellow",
            BallColor::Green => "green",
            BallColor::Brown => "brown",
            BallColor::Blue => "blue",
            BallColor::Pink => "pink",
            BallColor::Black => "black",
        }
    }

    /// Stable index written into the ball buffer and game events.
    pub fn index(self) -> u32 {
        match self {
            BallColor::White => 0,
            BallColor::Red => 1,
            BallColor::Yellow => 2,
            BallColor::Green => 3,
            BallColor::Brown => 4,
            BallColor::Blue => 5,
            BallColor::Pink => 6,
            BallColor::Black => 7,
        }
    }

    /// True for the six colours that have a home spot.
    pub fn is_colored(self) -> bool {
        !matches!(self, BallColor::White | BallColor::Red)
    }
}

/// A ball's role on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ball {
    Cue,
    Snooker { color: BallColor },
}

impl Ball {
    pub fn snooker(color: BallColor) -> Self {
        debug_assert!(color != BallColor::White, "white is reserved for the cue ball");
        Ball::Snooker { color }
    }

    pub fn color(self) -> BallColor {
        match self {
            Ball::Cue => BallColor::White,
            Ball::Snooker { color } => color,
        }
    }

    pub fn value(self) -> i32 {
        self.color().value()
    }

    pub fn is_cue(self) -> bool {
        matches!(self, Ball::Cue)
    }
}

/// A ball currently on the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveBall {
    pub id: BodyId,
    pub ball: Ball,
    /// Position the ball was spawned at. The host owns the live position.
    pub spawn_pos: Vec2,
    pub radius: f32,
}
