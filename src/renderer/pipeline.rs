//! WebGPU render pipeline setup

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::shapes::VertexCanvas;
use super::vertex::{Rgba, Vertex};
use super::{Layer, RenderError, Surface};

/// Main render state. Collects a frame through its [`VertexCanvas`] and
/// draws it as one triangle list on `present`.
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Backbuffer size in physical pixels
    pub size: (u32, u32),
    /// Playfield size the scene is drawn in (CSS pixels)
    pub viewport: Vec2,
    canvas: VertexCanvas,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        viewport: Vec2,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("hemi-bounce-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| RenderError::RequestDevice(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::CreateSurface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Placeholder buffer, replaced on every present
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            viewport,
            canvas: VertexCanvas::new(),
        })
    }

    /// Resize the backbuffer and the logical playfield it shows
    pub fn resize(&mut self, new_width: u32, new_height: u32, viewport: Vec2) {
        self.viewport = viewport;
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload the collected vertices and draw them
    fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = self
            .canvas
            .vertices()
            .iter()
            .map(|v| {
                let [x, y] = to_ndc(v.position, self.viewport);
                Vertex::new(x, y, v.color)
            })
            .collect();

        if !ndc_vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Playfield pixels (origin top-left, y down) to clip space
pub fn to_ndc(position: [f32; 2], viewport: Vec2) -> [f32; 2] {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return [0.0, 0.0];
    }
    [
        position[0] / viewport.x * 2.0 - 1.0,
        1.0 - position[1] / viewport.y * 2.0,
    ]
}

impl Surface for RenderState {
    fn begin_layer(&mut self, layer: Layer) {
        self.canvas.begin_layer(layer);
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.canvas.fill_rect(min, size, color);
    }

    fn fill_vertical_gradient(&mut self, min: Vec2, size: Vec2, stops: &[(f32, Rgba)]) {
        self.canvas.fill_vertical_gradient(min, size, stops);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.canvas.fill_circle(center, radius, color);
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.canvas.fill_radial_glow(center, radius, inner, outer);
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba) {
        self.canvas.fill_ellipse(center, radii, color);
    }

    fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, corner: f32, color: Rgba) {
        self.canvas.fill_rounded_rect(min, size, corner, color);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let result = match self.draw() {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Skip this frame; the next one draws into the fresh surface
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, dropping frame");
                Ok(())
            }
            Err(e) => Err(RenderError::from(e)),
        };
        self.canvas.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ndc_corners() {
        let viewport = Vec2::new(800.0, 400.0);
        assert_eq!(to_ndc([0.0, 0.0], viewport), [-1.0, 1.0]);
        assert_eq!(to_ndc([800.0, 400.0], viewport), [1.0, -1.0]);
        assert_eq!(to_ndc([400.0, 200.0], viewport), [0.0, 0.0]);
    }

    #[test]
    fn test_to_ndc_degenerate_viewport() {
        assert_eq!(to_ndc([5.0, 5.0], Vec2::ZERO), [0.0, 0.0]);
    }
}
