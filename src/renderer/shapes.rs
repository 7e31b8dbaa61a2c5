//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in playfield pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Filled axis-aligned rectangle
pub fn quad(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    vec![
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside the rect
pub fn rect_outline(rect: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(rect.size.x / 2.0).min(rect.size.y / 2.0);
    let inner_h = rect.size.y - 2.0 * t;
    let edges = [
        Rect::new(rect.left(), rect.top(), rect.size.x, t),
        Rect::new(rect.left(), rect.bottom() - t, rect.size.x, t),
        Rect::new(rect.left(), rect.top() + t, t, inner_h),
        Rect::new(rect.right() - t, rect.top() + t, t, inner_h),
    ];
    edges.iter().flat_map(|edge| quad(edge, color)).collect()
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Arrowhead ship with a notched tail, filling `rect`
pub fn ship(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (x, y, w, h) = (rect.pos.x, rect.pos.y, rect.size.x, rect.size.y);
    let nose = Vec2::new(x + w / 2.0, y);
    let notch = Vec2::new(x + w / 2.0, y + h * 0.85);
    let right_tip = Vec2::new(x + w, y + h);
    let right_inner = Vec2::new(x + w * 0.8, y + h * 0.7);
    let left_inner = Vec2::new(x + w * 0.2, y + h * 0.7);
    let left_tip = Vec2::new(x, y + h);

    // Fan around the notch; the outline is star-shaped from there
    let outline = [nose, right_tip, right_inner, notch, left_inner, left_tip, nose];
    let mut vertices = Vec::with_capacity(18);
    for pair in outline.windows(2) {
        if pair[0] == notch || pair[1] == notch {
            continue;
        }
        vertices.push(Vertex::new(notch.x, notch.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}
