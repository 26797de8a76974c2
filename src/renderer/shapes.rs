//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Rgba, Vertex};
use super::{Layer, Surface};

/// Segment count that keeps edges smooth without flooding small shapes
fn segments_for(radius: f32) -> u32 {
    (radius * 0.75).clamp(12.0, 64.0) as u32
}

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [Rgba; 4]) {
    // corners: top-left, top-right, bottom-right, bottom-left
    let v = |i: usize| Vertex::new(corners[i].x, corners[i].y, colors[i]);
    out.extend_from_slice(&[v(0), v(1), v(2), v(0), v(2), v(3)]);
}

/// Axis-aligned rectangle, one colour
pub fn rect(min: Vec2, size: Vec2, color: Rgba) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let max = min + size;
    push_quad(
        &mut vertices,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        [color; 4],
    );
    vertices
}

/// Vertical gradient as one band per pair of adjacent stops
pub fn vertical_gradient(min: Vec2, size: Vec2, stops: &[(f32, Rgba)]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(stops.len().saturating_sub(1) * 6);

    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        let y0 = min.y + size.y * t0.clamp(0.0, 1.0);
        let y1 = min.y + size.y * t1.clamp(0.0, 1.0);
        if y1 <= y0 {
            continue;
        }
        push_quad(
            &mut vertices,
            [
                Vec2::new(min.x, y0),
                Vec2::new(min.x + size.x, y0),
                Vec2::new(min.x + size.x, y1),
                Vec2::new(min.x, y1),
            ],
            [c0, c0, c1, c1],
        );
    }

    vertices
}

/// Generate vertices for a filled ellipse. The centre and rim colours are
/// interpolated, so a differing `rim` gives a radial gradient.
pub fn ellipse(center: Vec2, radii: Vec2, color: Rgba, rim: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            rim,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            rim,
        ));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, color, segments)
}

/// Quarter-disc fan between two angles
fn corner_fan(out: &mut Vec<Vertex>, center: Vec2, radius: f32, start: f32, color: Rgba) {
    const STEPS: u32 = 6;
    for i in 0..STEPS {
        let a1 = start + (i as f32 / STEPS as f32) * PI / 2.0;
        let a2 = start + ((i + 1) as f32 / STEPS as f32) * PI / 2.0;
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * a1.cos(),
            center.y + radius * a1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * a2.cos(),
            center.y + radius * a2.sin(),
            color,
        ));
    }
}

/// Rectangle with rounded corners: a cross of two rects plus four corner fans
pub fn rounded_rect(min: Vec2, size: Vec2, corner: f32, color: Rgba) -> Vec<Vertex> {
    let r = corner.clamp(0.0, size.x.min(size.y) / 2.0);
    if r <= 0.0 {
        return rect(min, size, color);
    }

    let max = min + size;
    let mut vertices = rect(Vec2::new(min.x + r, min.y), Vec2::new(size.x - 2.0 * r, size.y), color);
    vertices.extend(rect(Vec2::new(min.x, min.y + r), Vec2::new(r, size.y - 2.0 * r), color));
    vertices.extend(rect(
        Vec2::new(max.x - r, min.y + r),
        Vec2::new(r, size.y - 2.0 * r),
        color,
    ));

    // y points down, so angles run clockwise on screen
    corner_fan(&mut vertices, Vec2::new(max.x - r, max.y - r), r, 0.0, color);
    corner_fan(&mut vertices, Vec2::new(min.x + r, max.y - r), r, PI / 2.0, color);
    corner_fan(&mut vertices, Vec2::new(min.x + r, min.y + r), r, PI, color);
    corner_fan(&mut vertices, Vec2::new(max.x - r, min.y + r), r, 1.5 * PI, color);

    vertices
}

/// Collects drawing calls as a triangle list in playfield pixels
#[derive(Debug, Default)]
pub struct VertexCanvas {
    vertices: Vec<Vertex>,
    /// Vertex offset at which each layer began
    layer_starts: Vec<(Layer, usize)>,
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertices drawn inside `layer`, empty if it never began
    pub fn layer_vertices(&self, layer: Layer) -> &[Vertex] {
        let Some(index) = self.layer_starts.iter().position(|(l, _)| *l == layer) else {
            return &[];
        };
        let start = self.layer_starts[index].1;
        let end = self
            .layer_starts
            .get(index + 1)
            .map_or(self.vertices.len(), |(_, s)| *s);
        &self.vertices[start..end]
    }

    /// Start a new frame, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.layer_starts.clear();
    }
}

impl Surface for VertexCanvas {
    fn begin_layer(&mut self, layer: Layer) {
        self.layer_starts.push((layer, self.vertices.len()));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.vertices.extend(rect(min, size, color));
    }

    fn fill_vertical_gradient(&mut self, min: Vec2, size: Vec2, stops: &[(f32, Rgba)]) {
        self.vertices.extend(vertical_gradient(min, size, stops));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.vertices
            .extend(circle(center, radius, color, segments_for(radius)));
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.vertices.extend(ellipse(
            center,
            Vec2::splat(radius),
            inner,
            outer,
            segments_for(radius),
        ));
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba) {
        self.vertices.extend(ellipse(
            center,
            radii,
            color,
            color,
            segments_for(radii.max_element()),
        ));
    }

    fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, corner: f32, color: Rgba) {
        self.vertices.extend(rounded_rect(min, size, corner, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;

    #[test]
    fn test_circle_triangle_count() {
        let vertices = circle(Vec2::ZERO, 10.0, colors::WHITE, 16);
        assert_eq!(vertices.len(), 48);
        // Every rim vertex sits on the radius
        for v in vertices.iter().skip(1).step_by(3) {
            let r = Vec2::from(v.position).length();
            assert!((r - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_gradient_skips_empty_bands() {
        let stops = [(0.0, colors::SKY), (0.5, colors::PERIWINKLE), (0.5, colors::WHITE), (1.0, colors::LAVENDER)];
        let vertices = vertical_gradient(Vec2::ZERO, Vec2::new(100.0, 200.0), &stops);
        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[0].color, colors::SKY);
        assert_eq!(vertices[2].position, [100.0, 100.0]);
    }

    #[test]
    fn test_rounded_rect_stays_inside_bounds() {
        let min = Vec2::new(10.0, 20.0);
        let size = Vec2::new(40.0, 60.0);
        for v in rounded_rect(min, size, 10.0, colors::WHITE) {
            assert!(v.position[0] >= min.x - 1e-3 && v.position[0] <= min.x + size.x + 1e-3);
            assert!(v.position[1] >= min.y - 1e-3 && v.position[1] <= min.y + size.y + 1e-3);
        }
    }

    #[test]
    fn test_canvas_tracks_layers() {
        let mut canvas = VertexCanvas::new();
        canvas.begin_layer(Layer::Background);
        canvas.fill_rect(Vec2::ZERO, Vec2::splat(5.0), colors::SKY);
        canvas.begin_layer(Layer::Ball);
        canvas.fill_circle(Vec2::splat(50.0), 10.0, colors::WHITE);

        assert_eq!(canvas.layer_vertices(Layer::Background).len(), 6);
        assert_eq!(canvas.layer_vertices(Layer::Ball).len(), 36);
        assert!(canvas.layer_vertices(Layer::Trail).is_empty());

        canvas.clear();
        assert!(canvas.vertices().is_empty());
    }
}
