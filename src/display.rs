//! Presenting computed frames in a window.

use std::num::NonZeroU32;

use bytemuck::{Pod, Zeroable};
use log::{debug, info, warn};
use winit::window::Window;

use crate::{compute::Frame, error::Error, screen, uniform::Uniform};

/// Texture format of the uploaded frame. Sampling it onto an sRGB surface reproduces the stored bytes.
const FRAME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Scale applied to the full-surface quad so the frame keeps its aspect ratio.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    pub scale: [f32; 2],
    padding: [f32; 2],
}

impl Fit {
    pub fn letterbox(frame: screen::Size, surface: screen::Size) -> Self {
        let scale = if frame.is_empty() || surface.is_empty() {
            [1.0, 1.0]
        } else {
            let frame_aspect = frame.width as f32 / frame.height as f32;
            let surface_aspect = surface.width as f32 / surface.height as f32;
            if surface_aspect > frame_aspect {
                [frame_aspect / surface_aspect, 1.0]
            } else {
                [1.0, surface_aspect / frame_aspect]
            }
        };
        Self {
            scale,
            padding: [0.0; 2],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
    Shown,
    /// The surface has no area, e.g. while the window is minimised.
    Hidden,
    /// The surface was not ready; presenting again later may succeed.
    Skipped,
}

impl Presentation {
    pub fn should_retry(self) -> bool {
        self == Presentation::Skipped
    }
}

/// First sRGB format the surface supports, falling back to its preferred format.
pub fn preferred_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.describe().srgb)
        .or_else(|| formats.first().copied())
}

pub struct Display {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    render_bind_group: wgpu::BindGroup,
    frame_texture: wgpu::Texture,
    frame_size: screen::Size,
    fit: Uniform<Fit>,
}

impl Display {
    /// `window` must outlive the returned display.
    pub fn new(window: &Window, frame_size: screen::Size) -> Result<Self, Error> {
        let instance = wgpu::Instance::new(wgpu::Backends::all());

        let size = window.inner_size();
        let surface = unsafe { instance.create_surface(window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(Error::NoAdapter)?;
        info!("using adapter {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        let format = preferred_surface_format(&surface.get_supported_formats(&adapter))
            .ok_or(Error::NoSurfaceFormat)?;
        debug!("surface format {:?}", format);

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &surface_configuration);
        }

        let render_shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
        });

        let render_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("render-bind-group-layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: false },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("render-pipeline-layout"),
                bind_group_layouts: &[&render_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render-pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader_module,
                entry_point: "vertex_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &render_shader_module,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_configuration.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let frame_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame-texture"),
            size: extent(frame_size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAME_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        });
        let frame_texture_view = frame_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());

        let fit = Uniform::new(
            &device,
            "fit-buffer",
            Fit::letterbox(frame_size, size.into()),
        );

        let render_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("render-bind-group"),
            layout: &render_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&frame_texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: fit.binding_resource(),
                },
            ],
        });

        Ok(Self {
            surface,
            device,
            queue,
            surface_configuration,
            render_pipeline,
            render_bind_group,
            frame_texture,
            frame_size,
            fit,
        })
    }

    pub fn resize(&mut self, size: screen::Size) {
        debug!("resizing to {:?}", size);

        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        if !size.is_empty() {
            self.surface.configure(&self.device, &self.surface_configuration);
        }
        self.fit
            .write(&self.queue, Fit::letterbox(self.frame_size, size));
    }

    fn surface_size(&self) -> screen::Size {
        screen::Size::new(
            self.surface_configuration.width,
            self.surface_configuration.height,
        )
    }

    /// Upload a completed frame and show it.
    pub fn present(&mut self, frame: &Frame) -> Result<Presentation, Error> {
        debug_assert_eq!(frame.size(), self.frame_size);

        if self.surface_size().is_empty() {
            return Ok(Presentation::Hidden);
        }

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.frame_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.as_bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(4 * self.frame_size.width),
                rows_per_image: NonZeroU32::new(self.frame_size.height),
            },
            extent(self.frame_size),
        );

        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.surface_configuration);
                return Ok(Presentation::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out waiting for the surface");
                return Ok(Presentation::Skipped);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(Error::OutOfMemory),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut command_encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        command_encoder.push_debug_group("render-pass");
        {
            let mut render_pass = command_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.render_bind_group, &[]);
            render_pass.draw(0..4, 0..1);
        }
        command_encoder.pop_debug_group();

        self.queue.submit([command_encoder.finish()]);
        surface_texture.present();
        Ok(Presentation::Shown)
    }
}

fn extent(size: screen::Size) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_aspect_fills_the_surface() {
        let fit = Fit::letterbox(screen::Size::new(1500, 1000), screen::Size::new(1500, 1000));
        assert_eq!(fit.scale, [1.0, 1.0]);
    }

    #[test]
    fn wide_surface_gets_side_bars() {
        let fit = Fit::letterbox(screen::Size::new(1500, 1000), screen::Size::new(3000, 1000));
        assert_eq!(fit.scale, [0.5, 1.0]);
    }

    #[test]
    fn tall_surface_gets_top_and_bottom_bars() {
        let fit = Fit::letterbox(screen::Size::new(1500, 1000), screen::Size::new(1500, 2000));
        assert_eq!(fit.scale, [1.0, 0.5]);
    }

    #[test]
    fn srgb_surface_format_is_preferred() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            preferred_surface_format(&formats),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_the_first_surface_format() {
        let formats = [wgpu::TextureFormat::Rgba16Float, wgpu::TextureFormat::Bgra8Unorm];
        assert_eq!(
            preferred_surface_format(&formats),
            Some(wgpu::TextureFormat::Rgba16Float)
        );
        assert_eq!(preferred_surface_format(&[]), None);
    }

    #[test]
    fn only_unready_surfaces_are_retried() {
        assert!(Presentation::Skipped.should_retry());
        assert!(!Presentation::Hidden.should_retry());
        assert!(!Presentation::Shown.should_retry());
    }

    #[test]
    fn minimised_surface_is_left_alone() {
        let fit = Fit::letterbox(screen::Size::new(1500, 1000), screen::Size::new(0, 0));
        assert_eq!(fit.scale, [1.0, 1.0]);
    }
}
