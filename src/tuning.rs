//! Game balance and layout
//!
//! Every magic number of the level lives here. Units are pixels and seconds
//! (y points down, like the canvas).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Errors from loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("target grid is empty ({columns}x{rows})")]
    EmptyGrid { columns: u32, rows: u32 },
}

/// Level layout and physics thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Visible play field (width, height)
    pub play_size: Vec2,
    /// Gravity acceleration, px/s²
    pub gravity: Vec2,
    /// Linear damping applied to dynamic bodies
    pub air_friction: f32,

    pub ground_center: Vec2,
    pub ground_size: Vec2,

    /// Slingshot anchor; the projectile spawns here
    pub anchor: Vec2,
    pub projectile_radius: f32,
    /// Density relative to targets (1.0)
    pub projectile_density: f32,
    pub projectile_restitution: f32,

    /// Fraction of the link's stretch corrected per step
    pub link_stiffness: f32,
    /// Fraction of the projectile's velocity removed per step while linked
    pub link_damping: f32,
    /// Rest length of the link
    pub link_length: f32,
    /// Fraction of the pointer gap closed per step while dragging
    pub drag_stiffness: f32,

    /// Distance past `anchor.x` at which a fired projectile detaches
    pub release_offset: f32,
    /// Delay between release and arming the reset check
    pub reset_delay_secs: f32,
    /// How far outside the play field the projectile counts as gone
    pub offscreen_margin: f32,
    /// Below this speed (px/s) the projectile counts as stopped
    pub rest_speed: f32,
    /// Above this speed (px/s) any target contact destroys the target
    pub impact_speed: f32,

    /// Top-left corner of the target grid
    pub target_origin: Vec2,
    pub target_columns: u32,
    pub target_rows: u32,
    /// Edge length of a (square) target
    pub target_size: f32,
    pub points_per_target: u64,
    pub debris_per_target: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_size: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            gravity: Vec2::new(0.0, 1000.0),
            air_friction: 0.6,

            ground_center: Vec2::new(400.0, 380.0),
            ground_size: Vec2::new(810.0, 60.0),

            anchor: Vec2::new(150.0, 200.0),
            projectile_radius: 20.0,
            projectile_density: 2.0,
            projectile_restitution: 0.5,

            link_stiffness: 0.05,
            link_damping: 0.05,
            link_length: 1.0,
            drag_stiffness: 0.2,

            release_offset: 5.0,
            reset_delay_secs: 1.0,
            offscreen_margin: 50.0,
            // 0.2 px/step at 60 Hz
            rest_speed: 12.0,
            // 3 px/step at 60 Hz
            impact_speed: 180.0,

            // Bottom row rests on the ground top (y = 350)
            target_origin: Vec2::new(500.0, 230.0),
            target_columns: 4,
            target_rows: 3,
            target_size: 40.0,
            points_per_target: 100,
            debris_per_target: 12,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON object on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject layouts the game cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("play_size.x", self.play_size.x),
            ("play_size.y", self.play_size.y),
            ("ground_size.x", self.ground_size.x),
            ("ground_size.y", self.ground_size.y),
            ("projectile_radius", self.projectile_radius),
            ("projectile_density", self.projectile_density),
            ("link_stiffness", self.link_stiffness),
            ("drag_stiffness", self.drag_stiffness),
            ("rest_speed", self.rest_speed),
            ("impact_speed", self.impact_speed),
            ("target_size", self.target_size),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("air_friction", self.air_friction),
            ("link_damping", self.link_damping),
            ("link_length", self.link_length),
            ("release_offset", self.release_offset),
            ("reset_delay_secs", self.reset_delay_secs),
            ("offscreen_margin", self.offscreen_margin),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        if self.target_columns == 0 || self.target_rows == 0 {
            return Err(TuningError::EmptyGrid {
                columns: self.target_columns,
                rows: self.target_rows,
            });
        }
        Ok(())
    }

    /// Number of targets in a fresh grid
    pub fn target_count(&self) -> usize {
        (self.target_columns * self.target_rows) as usize
    }

    /// Centers of a fresh target grid, row-major from the top-left
    pub fn target_centers(&self) -> Vec<Vec2> {
        let half = self.target_size / 2.0;
        let mut centers = Vec::with_capacity(self.target_count());
        for row in 0..self.target_rows {
            for col in 0..self.target_columns {
                centers.push(
                    self.target_origin
                        + Vec2::new(
                            half + col as f32 * self.target_size,
                            half + row as f32 * self.target_size,
                        ),
                );
            }
        }
        centers
    }

    /// True when `pos` is beyond the play field by more than the margin
    /// (left, right, or below)
    pub fn is_out_of_bounds(&self, pos: Vec2) -> bool {
        let m = self.offscreen_margin;
        pos.x > self.play_size.x + m || pos.x < -m || pos.y > self.play_size.y + m
    }
}
