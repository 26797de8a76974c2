//! 2-D drawing surface and WebGPU backend
//!
//! Scene code draws through the [`Surface`] trait in playfield pixels.
//! [`VertexCanvas`] tessellates those calls into coloured triangles and
//! [`RenderState`] uploads them to the GPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

use std::fmt;

use glam::Vec2;

pub use pipeline::RenderState;
pub use scene::render_scene;
pub use shapes::VertexCanvas;
pub use vertex::{Rgba, Vertex, colors};

/// Draw layers, in painting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Clouds,
    Ground,
    Ball,
    Characters,
    Particles,
    Trail,
}

impl Layer {
    pub const ORDER: [Layer; 7] = [
        Layer::Background,
        Layer::Clouds,
        Layer::Ground,
        Layer::Ball,
        Layer::Characters,
        Layer::Particles,
        Layer::Trail,
    ];
}

/// A 2-D drawing target. Coordinates are playfield pixels, y pointing down.
pub trait Surface {
    /// Marks the start of a layer. Later layers paint over earlier ones.
    fn begin_layer(&mut self, _layer: Layer) {}

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);

    /// Linear top-to-bottom gradient. `stops` are `(offset, colour)` with
    /// offsets in `[0, 1]` ascending.
    fn fill_vertical_gradient(&mut self, min: Vec2, size: Vec2, stops: &[(f32, Rgba)]);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Disc fading from `inner` at the centre to `outer` at the rim
    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba);

    fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, corner: f32, color: Rgba);

    /// Push the finished frame to the screen
    fn present(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Rendering failures
#[derive(Debug)]
pub enum RenderError {
    /// No GPU adapter matched the surface
    NoAdapter,
    /// Surface could not be created for the canvas
    CreateSurface(String),
    /// Device request failed
    RequestDevice(String),
    /// Frame acquisition failed in a way reconfiguring does not fix
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoAdapter => write!(f, "no suitable GPU adapter"),
            RenderError::CreateSurface(e) => write!(f, "failed to create surface: {e}"),
            RenderError::RequestDevice(e) => write!(f, "failed to create device: {e}"),
            RenderError::Surface(e) => write!(f, "surface error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}
