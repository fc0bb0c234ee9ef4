//! Scene building: game state to triangle list
//!
//! Everything is emitted in game coordinates (pixels, y down). The pipeline
//! maps them onto the surface.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::physics::BodyPose;
use crate::rotate;
use crate::sim::{Game, Particle, ParticleKind};

/// Circle tessellation for the ornament
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Width of the slingshot band
const BAND_WIDTH: f32 = 3.0;

/// Length of the post drawn under the anchor once the band lets go
const POST_LENGTH: f32 = 30.0;

/// Build the frame's vertices, back to front
pub fn build(game: &Game) -> Vec<Vertex> {
    let t = game.tuning();
    let mut vertices = Vec::with_capacity(2048);

    if let Some(ground) = game.ground_pose() {
        vertices.extend(shapes::rect(ground.pos, t.ground_size, ground.angle, colors::SNOW));
    }

    for pose in game.target_poses() {
        gift_box(&mut vertices, &pose, t.target_size);
    }

    if let Some(pose) = game.projectile_pose() {
        ornament(&mut vertices, &pose, t.projectile_radius);
    }

    // The band is drawn over the ornament
    match game.link_line() {
        Some((anchor, end)) => vertices.extend(shapes::line(anchor, end, BAND_WIDTH, colors::BAND)),
        None => vertices.extend(shapes::line(
            t.anchor,
            t.anchor + Vec2::new(0.0, POST_LENGTH),
            BAND_WIDTH,
            colors::BAND,
        )),
    }

    for particle in &game.state.particles {
        vertices.extend(debris(particle));
    }

    vertices
}

/// Green box with a gold ribbon cross
fn gift_box(out: &mut Vec<Vertex>, pose: &BodyPose, size: f32) {
    let band = size / 4.0;
    out.extend(shapes::rect(pose.pos, Vec2::splat(size), pose.angle, colors::GIFT_WRAP));
    out.extend(shapes::rect(pose.pos, Vec2::new(size, band), pose.angle, colors::RIBBON));
    out.extend(shapes::rect(pose.pos, Vec2::new(band, size), pose.angle, colors::RIBBON));
}

/// Red bauble with a highlight and a hanger cap, turning with the body
fn ornament(out: &mut Vec<Vertex>, pose: &BodyPose, radius: f32) {
    out.extend(shapes::circle(pose.pos, radius, colors::ORNAMENT, CIRCLE_SEGMENTS));

    let shine = pose.pos + rotate(Vec2::splat(-radius / 2.0), pose.angle);
    out.extend(shapes::circle(shine, radius / 4.0, colors::ORNAMENT_SHINE, CIRCLE_SEGMENTS / 2));

    let cap = pose.pos + rotate(Vec2::new(0.0, -radius), pose.angle);
    out.extend(shapes::rect(
        cap,
        Vec2::splat(radius / 2.0),
        pose.angle,
        colors::ORNAMENT_HANGER,
    ));
}

fn debris(particle: &Particle) -> [Vertex; 6] {
    let mut color = match particle.kind {
        ParticleKind::Wrapping => colors::GIFT_WRAP,
        ParticleKind::Ribbon => colors::RIBBON,
    };
    color[3] *= particle.life.clamp(0.0, 1.0);
    // Tumble as they fade
    let angle = particle.life * 6.0;
    shapes::rect(particle.pos, Vec2::splat(particle.size), angle, color)
}
