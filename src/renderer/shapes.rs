//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in game coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::rotate;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Two triangles covering the quad a-b-c-d (in winding order)
fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Filled rectangle of `size` centered on `center`, rotated by `angle`
pub fn rect(center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) -> [Vertex; 6] {
    let h = size / 2.0;
    let corner = |x: f32, y: f32| center + rotate(Vec2::new(x, y), angle);
    quad(
        corner(-h.x, -h.y),
        corner(h.x, -h.y),
        corner(h.x, h.y),
        corner(-h.x, h.y),
        color,
    )
}

/// Straight line of the given width from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(a + perp, b + perp, b - perp, a - perp, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(v: &Vertex) -> Vec2 {
        Vec2::new(v.position[0], v.position[1])
    }

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        assert!(verts.iter().all(|v| pos(v).length() <= 10.0 + 1e-4));
    }

    #[test]
    fn test_rect_axis_aligned() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 2.0), 0.0, [1.0; 4]);
        assert_eq!(pos(&verts[0]), Vec2::new(8.0, 19.0));
        assert_eq!(pos(&verts[2]), Vec2::new(12.0, 21.0));
    }

    #[test]
    fn test_rect_rotated_quarter_turn() {
        let verts = rect(Vec2::ZERO, Vec2::new(4.0, 2.0), std::f32::consts::FRAC_PI_2, [1.0; 4]);
        // (2, -1) turns into (1, 2)
        let p = pos(&verts[1]);
        assert!((p - Vec2::new(1.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_line_width() {
        let verts = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, [1.0; 4]);
        assert_eq!(pos(&verts[0]), Vec2::new(0.0, 2.0));
        assert_eq!(pos(&verts[2]), Vec2::new(10.0, -2.0));
    }

    #[test]
    fn test_degenerate_line_does_not_panic() {
        let verts = line(Vec2::ONE, Vec2::ONE, 3.0, [1.0; 4]);
        assert!(verts.iter().all(|v| pos(v) == Vec2::ONE));
    }
}
