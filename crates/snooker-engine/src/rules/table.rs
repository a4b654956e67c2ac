//! Table geometry: pockets, the baulk "D", colour spots and the rack.

use glam::Vec2;

use crate::api::game::TableConfig;
use crate::rules::balls::{BallColor, COLOR_ORDER};
use crate::rules::error::RulesError;

/// Ball diameter as a fraction of table width.
const BALL_DIAMETER_RATIO: f32 = 1.0 / 60.0;
/// Pocket radius as a fraction of table width.
const POCKET_RADIUS_RATIO: f32 = 1.0 / 66.0;
/// Pocket sensors reach past the visual hole so balls rolling along the
/// cushion still drop.
const POCKET_SENSOR_SCALE: f32 = 1.8;
const D_CENTER_RATIO: f32 = 0.25;
const D_RADIUS_RATIO: f32 = 0.1;
const RACK_ANCHOR_RATIO: f32 = 0.7;
/// Gap between racked balls, as a multiple of the diameter.
const RACK_SPACING: f32 = 1.05;
/// Green and yellow sit on the baulk line this far from the D centre,
/// as a fraction of the D radius.
const BAULK_SPOT_OFFSET: f32 = 0.625;
/// Keeps the respawned cue ball clear of the D's arc.
const CUE_SPOT_MARGIN: f32 = 5.0;
/// Random layouts keep this many ball diameters away from each cushion.
const SAFE_INSET_DIAMETERS: f32 = 1.5;
/// Gap between a randomly placed ball and the nearest pocket sensor.
const POCKET_CLEARANCE: f32 = 1.0;

/// A static rail, as an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cushion {
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// A pocket sensor zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub center: Vec2,
    pub sensor_radius: f32,
}

/// Axis-aligned rectangle used for random ball placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl SafeArea {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Fixed spot for each of the six colours. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct HomePositions {
    spots: [(BallColor, Vec2); 6],
}

impl HomePositions {
    pub fn get(&self, color: BallColor) -> Option<Vec2> {
        self.spots.iter().find(|(c, _)| *c == color).map(|(_, p)| *p)
    }

    /// Look up a spot, logging and falling back to the table origin when the
    /// colour has none.
    pub fn get_or_origin(&self, color: BallColor) -> Vec2 {
        match self.get(color).ok_or(RulesError::MissingHomePosition(color)) {
            Ok(pos) => pos,
            Err(e) => {
                log::error!("{}", e);
                Vec2::ZERO
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(BallColor, Vec2)> {
        self.spots.iter()
    }
}

/// Derived table layout. Everything is computed from [`TableConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub width: f32,
    pub height: f32,
    pub frame_width: f32,
    pub cushion_thickness: f32,
    pub ball_radius: f32,
    pub pockets: [Pocket; 6],
    pub d_center: Vec2,
    pub d_radius: f32,
    pub rack_anchor: Vec2,
    pub safe_area: SafeArea,
    home: HomePositions,
}

impl TableLayout {
    pub fn new(config: &TableConfig) -> Self {
        let width = config.width;
        let height = width / 2.0;
        let diameter = width * BALL_DIAMETER_RATIO;
        let ball_radius = diameter / 2.0;
        let center_y = height / 2.0;

        let pocket_radius = width * POCKET_RADIUS_RATIO;
        let edge = config.cushion_thickness + pocket_radius;
        let sensor_radius = pocket_radius * POCKET_SENSOR_SCALE;
        let pocket = |x: f32, y: f32| Pocket {
            center: Vec2::new(x, y),
            sensor_radius,
        };
        let pockets = [
            pocket(edge, edge),
            pocket(width - edge, edge),
            pocket(edge, height - edge),
            pocket(width - edge, height - edge),
            pocket(width / 2.0, edge),
            pocket(width / 2.0, height - edge),
        ];

        let d_center = Vec2::new(width * D_CENTER_RATIO, center_y);
        let d_radius = width * D_RADIUS_RATIO;
        let rack_anchor = Vec2::new(width * RACK_ANCHOR_RATIO, center_y);
        let baulk_offset = d_radius * BAULK_SPOT_OFFSET;

        let home = HomePositions {
            spots: [
                (BallColor::Yellow, Vec2::new(d_center.x, center_y + baulk_offset)),
                (BallColor::Green, Vec2::new(d_center.x, center_y - baulk_offset)),
                (BallColor::Brown, d_center),
                (BallColor::Blue, Vec2::new(width / 2.0, center_y)),
                (BallColor::Pink, Vec2::new(rack_anchor.x - diameter, center_y)),
                (BallColor::Black, Vec2::new(width - config.frame_width * 4.0, center_y)),
            ],
        };

        // Pocket sensors reach further in than the cushion inset, so the
        // rectangle also has to keep a whole ball clear of every sensor.
        let cushion_inset = config.cushion_thickness + diameter * SAFE_INSET_DIAMETERS;
        let pocket_inset = edge + sensor_radius + ball_radius + POCKET_CLEARANCE;
        let inset = cushion_inset.max(pocket_inset);
        let safe_area = SafeArea {
            min: Vec2::new(inset, inset),
            max: Vec2::new(width - inset, height - inset),
        };

        Self {
            width,
            height,
            frame_width: config.frame_width,
            cushion_thickness: config.cushion_thickness,
            ball_radius,
            pockets,
            d_center,
            d_radius,
            rack_anchor,
            safe_area,
            home,
        }
    }

    pub fn ball_diameter(&self) -> f32 {
        self.ball_radius * 2.0
    }

    pub fn home_positions(&self) -> &HomePositions {
        &self.home
    }

    /// Where a pocketed cue ball reappears: inside the D, towards its arc.
    pub fn cue_respawn_spot(&self) -> Vec2 {
        Vec2::new(
            self.d_center.x,
            self.d_center.y + self.d_radius - self.ball_radius - CUE_SPOT_MARGIN,
        )
    }

    /// The four rail cushions. Each spans the full rail; its inner face is
    /// `cushion_thickness` in from the table edge.
    pub fn cushions(&self) -> [Cushion; 4] {
        let t = self.cushion_thickness;
        let long = Vec2::new(self.width / 2.0, t / 2.0);
        let short = Vec2::new(t / 2.0, self.height / 2.0);
        [
            Cushion { center: Vec2::new(self.width / 2.0, t / 2.0), half_extents: long },
            Cushion { center: Vec2::new(self.width / 2.0, self.height - t / 2.0), half_extents: long },
            Cushion { center: Vec2::new(t / 2.0, self.height / 2.0), half_extents: short },
            Cushion { center: Vec2::new(self.width - t / 2.0, self.height / 2.0), half_extents: short },
        ]
    }

    /// Triangular rack of `count` balls with its apex on the rack anchor.
    pub fn rack(&self, count: usize) -> Vec<Vec2> {
        rack_positions(self.rack_anchor, self.ball_diameter(), count)
    }
}

/// Triangular rack layout, filled row by row from the apex.
/// The apex points left toward the baulk; rows spread right.
///
/// A triangular `count` fills exactly `floor((sqrt(8n + 1) - 1) / 2)` rows.
/// Otherwise one more partial row is started to place the remainder.
pub fn rack_positions(apex: Vec2, diameter: f32, count: usize) -> Vec<Vec2> {
    let spacing = diameter * RACK_SPACING;
    let row_step = spacing * 3f32.sqrt() / 2.0;

    let mut positions = Vec::with_capacity(count);
    let mut row = 0;
    while positions.len() < count {
        for col in 0..=row {
            if positions.len() == count {
                break;
            }
            let x = apex.x + row as f32 * row_step;
            let y = apex.y + (col as f32 - row as f32 / 2.0) * spacing;
            positions.push(Vec2::new(x, y));
        }
        row += 1;
    }
    positions
}

/// The six coloured balls in potting order, each at its home spot.
pub fn colors_at_home(layout: &TableLayout) -> Vec<(BallColor, Vec2)> {
    COLOR_ORDER
        .iter()
        .map(|&c| (c, layout.home_positions().get_or_origin(c)))
        .collect()
}
